use crate::collectors::disks::DiskProbe;
use crate::error::{Result, StationError};
use crate::models::outcome::{BatchReport, Outcome};
use crate::platform::{CommandRunner, PlatformCommands, RecycleBin};
use crate::util::cleanup;
use crate::util::human::format_size;
use std::fs;
use std::path::Path;

/// Maintenance tasks, in the order "run all" executes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationTask {
    CleanTemp,
    ClearUpdateCache,
    ClearDnsCache,
    ClearPrefetch,
    OptimizeDisks,
    EmptyRecycleBin,
    ClearEventLogs,
}

impl OptimizationTask {
    pub const ALL: [OptimizationTask; 7] = [
        OptimizationTask::CleanTemp,
        OptimizationTask::ClearUpdateCache,
        OptimizationTask::ClearDnsCache,
        OptimizationTask::ClearPrefetch,
        OptimizationTask::OptimizeDisks,
        OptimizationTask::EmptyRecycleBin,
        OptimizationTask::ClearEventLogs,
    ];

    pub fn menu_label(&self) -> &'static str {
        match self {
            Self::CleanTemp        => "Clean Temporary Files",
            Self::ClearUpdateCache => "Clear Update Cache",
            Self::ClearDnsCache    => "Clear DNS Cache",
            Self::ClearPrefetch    => "Clear Prefetch",
            Self::OptimizeDisks    => "Optimize Disk Drives (Defrag)",
            Self::EmptyRecycleBin  => "Clean Recycle Bin",
            Self::ClearEventLogs   => "Clear Event Logs",
        }
    }

    pub fn progress_label(&self) -> &'static str {
        match self {
            Self::CleanTemp        => "Cleaning temporary files",
            Self::ClearUpdateCache => "Clearing update cache",
            Self::ClearDnsCache    => "Clearing DNS cache",
            Self::ClearPrefetch    => "Clearing prefetch",
            Self::OptimizeDisks    => "Optimizing disks",
            Self::EmptyRecycleBin  => "Cleaning Recycle Bin",
            Self::ClearEventLogs   => "Clearing event logs",
        }
    }
}

/// Collaborators a task may touch.
pub struct ActionContext<'a> {
    pub platform: &'a dyn PlatformCommands,
    pub runner:   &'a dyn CommandRunner,
    pub disks:    &'a dyn DiskProbe,
}

/// Run one task; any error it raises becomes a failed outcome.
pub fn run_task(task: OptimizationTask, ctx: &ActionContext<'_>) -> Outcome {
    let outcome = match execute(task, ctx) {
        Ok(o)  => o,
        Err(e) => Outcome::failed(e.to_string()),
    };
    log_outcome(task, &outcome);
    outcome
}

fn log_outcome(task: OptimizationTask, outcome: &Outcome) {
    if outcome.succeeded {
        tracing::info!(?task, detail = %outcome.detail, "action succeeded");
    } else {
        tracing::warn!(?task, detail = %outcome.detail, "action failed");
    }
}

pub fn execute(task: OptimizationTask, ctx: &ActionContext<'_>) -> Result<Outcome> {
    match task {
        OptimizationTask::CleanTemp        => Ok(clean_temp(ctx.platform)),
        OptimizationTask::ClearUpdateCache => Ok(clear_update_cache(ctx.platform)),
        OptimizationTask::ClearDnsCache    => clear_dns_cache(ctx),
        OptimizationTask::ClearPrefetch    => Ok(clear_prefetch(ctx.platform)),
        OptimizationTask::OptimizeDisks    => optimize_disks(ctx),
        OptimizationTask::EmptyRecycleBin  => empty_recycle_bin(ctx),
        OptimizationTask::ClearEventLogs   => clear_event_logs(ctx),
    }
}

// ── Run all ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RunAllReport {
    pub results: Vec<(OptimizationTask, Outcome)>,
}

impl RunAllReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|(_, o)| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Execute `tasks` in order. An error from `exec` becomes that task's
/// failed outcome and the batch moves on.
pub fn run_batch<F>(tasks: &[OptimizationTask], mut exec: F) -> RunAllReport
where
    F: FnMut(OptimizationTask) -> Result<Outcome>,
{
    let mut report = RunAllReport::default();
    for &task in tasks {
        let outcome = exec(task).unwrap_or_else(|e| Outcome::failed(e.to_string()));
        log_outcome(task, &outcome);
        report.results.push((task, outcome));
    }
    report
}

// ── Individual tasks ──────────────────────────────────────────────────

fn clean_temp(platform: &dyn PlatformCommands) -> Outcome {
    let mut total = BatchReport::default();
    for dir in platform.temp_dirs().iter().filter(|d| d.exists()) {
        total.merge(cleanup::purge_files_recursive(dir));
    }
    let mut detail = format!("Cleaned {} of temporary files.", format_size(total.bytes_reclaimed));
    if total.failed > 0 {
        detail.push_str(&format!(" {} item(s) in use were skipped.", total.failed));
    }
    Outcome::ok(detail)
}

fn clear_update_cache(platform: &dyn PlatformCommands) -> Outcome {
    match platform.update_cache_dir() {
        Some(dir) if dir.exists() => match cleanup::reset_dir(&dir) {
            Ok(())  => Outcome::ok("Update cache cleared successfully."),
            Err(e)  => Outcome::failed(format!("Error clearing update cache: {}", e)),
        },
        _ => Outcome::failed("Update cache directory not found."),
    }
}

fn clear_dns_cache(ctx: &ActionContext<'_>) -> Result<Outcome> {
    let inv = ctx.platform.flush_dns().ok_or_else(|| {
        StationError::action("DNS flush", format!("not available on {}", ctx.platform.name()))
    })?;
    ctx.runner.run(&inv)?;
    Ok(Outcome::ok("DNS cache cleared successfully."))
}

fn clear_prefetch(platform: &dyn PlatformCommands) -> Outcome {
    match platform.prefetch_dir() {
        Some(dir) if dir.exists() => match cleanup::purge_top_level_files(&dir) {
            Ok(r) if r.failed == 0 => Outcome::ok("Prefetch files cleared successfully."),
            Ok(r)  => Outcome::ok(format!("Prefetch cleared; {} file(s) in use were skipped.", r.failed)),
            Err(e) => Outcome::failed(format!("Error clearing prefetch: {}", e)),
        },
        _ => Outcome::failed("Prefetch directory not found."),
    }
}

fn optimize_disks(ctx: &ActionContext<'_>) -> Result<Outcome> {
    let volumes = ctx.disks.list_volumes();
    if volumes.is_empty() {
        return Ok(Outcome::failed("No volumes to optimize."));
    }
    let mut failed = Vec::new();
    for volume in &volumes {
        let inv = ctx.platform.optimize_volume(volume).ok_or_else(|| {
            StationError::action("Disk optimization", format!("not available on {}", ctx.platform.name()))
        })?;
        if let Err(e) = ctx.runner.run(&inv) {
            failed.push(format!("{} ({})", volume, e));
        }
    }
    if failed.is_empty() {
        Ok(Outcome::ok("Disk optimization completed."))
    } else {
        Ok(Outcome::failed(format!("Optimization failed for {}", failed.join(", "))))
    }
}

fn empty_recycle_bin(ctx: &ActionContext<'_>) -> Result<Outcome> {
    match ctx.platform.recycle_bin() {
        Some(RecycleBin::Command(inv)) => {
            ctx.runner.run(&inv)?;
        }
        Some(RecycleBin::Directories(dirs)) => {
            let mut total = BatchReport::default();
            for dir in dirs.iter().filter(|d| d.exists()) {
                total.merge(cleanup::empty_dir(dir).map_err(|e| {
                    StationError::action("Cleaning Recycle Bin", e.to_string())
                })?);
            }
            if total.failed > 0 {
                return Ok(Outcome::failed(format!("{} item(s) could not be removed from the trash.", total.failed)));
            }
        }
        None => return Ok(Outcome::failed("Recycle Bin location not found.")),
    }
    Ok(Outcome::ok("Recycle Bin cleared successfully."))
}

fn clear_event_logs(ctx: &ActionContext<'_>) -> Result<Outcome> {
    let commands = ctx.platform.clear_event_logs();
    if commands.is_empty() {
        return Ok(Outcome::failed(format!("Event log clearing is not available on {}.", ctx.platform.name())));
    }
    let failures: Vec<String> = commands
        .iter()
        .filter_map(|inv| ctx.runner.run(inv).err().map(|e| e.to_string()))
        .collect();
    if failures.is_empty() {
        Ok(Outcome::ok("Event logs cleared successfully."))
    } else {
        Ok(Outcome::failed(failures.join("; ")))
    }
}

// ── Startup programs ──────────────────────────────────────────────────

/// Names of the entries in the startup folder.
pub fn list_startup(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

/// Remove one entry from the startup folder. Only bare names inside the
/// folder are accepted.
pub fn remove_startup(dir: &Path, name: &str) -> Outcome {
    let is_bare = Path::new(name).file_name().map(|f| f == name).unwrap_or(false);
    if !is_bare {
        return Outcome::failed(format!("{} is not a startup entry.", name));
    }
    let path = dir.join(name);
    if !path.exists() {
        return Outcome::failed(format!("{} not found in startup.", name));
    }
    match fs::remove_file(&path) {
        Ok(())  => Outcome::ok(format!("Removed {} from startup.", name)),
        Err(e)  => Outcome::failed(format!("Error removing {}: {}", name, e)),
    }
}
