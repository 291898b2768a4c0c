use crate::actions::OptimizationTask;
use crate::ui::theme::Theme;
use std::io::{self, Write};

pub const BANNER: &str = "MyStation: Memory and data view. Simple.";

/// Title framed by `=` rules as wide as its longest line.
pub fn separator(out: &mut dyn Write, theme: &Theme, title: &str) -> io::Result<()> {
    let width = title.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let rule = "=".repeat(width);
    writeln!(out)?;
    writeln!(out, "{}", theme.header.apply(&rule))?;
    for line in title.lines() {
        writeln!(out, "{}", theme.title.apply(line))?;
    }
    writeln!(out, "{}", theme.header.apply(&rule))
}

fn entry(out: &mut dyn Write, theme: &Theme, number: &str, label: &str) -> io::Result<()> {
    writeln!(out, "{} {}", theme.item.apply(format!("{}.", number)), label)
}

pub fn top_menu(out: &mut dyn Write, theme: &Theme) -> io::Result<()> {
    let title = format!("{}\nv{}", BANNER, env!("CARGO_PKG_VERSION"));
    separator(out, theme, &title)?;
    entry(out, theme, "1", "Check Disks")?;
    writeln!(out, "{} Memory Monitoring{}", theme.item.apply("2."),
        theme.warn.apply(" (Warning: This feature overrides all others.)"))?;
    writeln!(out, "{} CPU Monitoring{}", theme.item.apply("3."),
        theme.warn.apply(" (Warning: This feature overrides all others.)"))?;
    entry(out, theme, "4", "Usage Graphs")?;
    entry(out, theme, "5", "View Processes")?;
    entry(out, theme, "6", "System Management")?;
    entry(out, theme, "7", "File Browser")?;
    entry(out, theme, "8", "System Optimization")?;
    entry(out, theme, "9", "Live Monitoring")?;
    writeln!(out, "{} Exit", theme.fail.apply("10."))
}

pub fn optimization_menu(out: &mut dyn Write, theme: &Theme, platform: &str) -> io::Result<()> {
    separator(out, theme, &format!("System Optimization ({})", platform))?;
    for (i, task) in OptimizationTask::ALL.iter().enumerate() {
        entry(out, theme, &(i + 1).to_string(), task.menu_label())?;
    }
    entry(out, theme, "8", "Disable Unnecessary Startup Programs")?;
    entry(out, theme, "9", "Run All Optimizations")?;
    writeln!(out, "{} Return to Main Menu", theme.warn.apply("0."))
}

pub fn management_menu(out: &mut dyn Write, theme: &Theme) -> io::Result<()> {
    separator(out, theme, "System Management")?;
    writeln!(out, "1. Reboot\n2. Shutdown\n3. Clear temp files")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl Fn(&mut dyn Write) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn separator_matches_longest_line() {
        let text = render(|out| separator(out, &Theme::mono(), "Disk: /\nlonger line"));
        assert_eq!(text, "\n===========\nDisk: /\nlonger line\n===========\n");
    }

    #[test]
    fn top_menu_lists_ten_items() {
        let text = render(|out| top_menu(out, &Theme::mono()));
        assert!(text.contains("1. Check Disks"));
        assert!(text.contains("8. System Optimization"));
        assert!(text.ends_with("10. Exit\n"));
    }

    #[test]
    fn optimization_menu_follows_task_order() {
        let text = render(|out| optimization_menu(out, &Theme::mono(), "POSIX"));
        assert!(text.contains("System Optimization (POSIX)"));
        assert!(text.contains("3. Clear DNS Cache"));
        assert!(text.contains("5. Optimize Disk Drives (Defrag)"));
        assert!(text.contains("9. Run All Optimizations"));
        assert!(text.ends_with("0. Return to Main Menu\n"));
    }
}
