const GB: f64 = 1_073_741_824.0;
const MB: f64 = 1_048_576.0;
const KB: f64 = 1_024.0;

/// Format a raw byte count into a human-readable string: "3.25 GB"
///
/// GB is the largest unit, so a 2 TiB volume reads "2048.00 GB".
pub fn format_size(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= GB      { format!("{:.2} GB", b / GB) }
    else if b >= MB { format!("{:.2} MB", b / MB) }
    else if b >= KB { format!("{:.2} KB", b / KB) }
    else            { format!("{:.2} Bytes", b) }
}

/// Bytes expressed as fractional gigabytes.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / GB
}

/// Format a gigabyte figure with two decimals: "7.81 GB"
pub fn format_gb(gb: f64) -> String {
    format!("{:.2} GB", gb)
}

/// Format a percentage with one decimal: "84.5%"
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}
