use crate::actions::{self, ActionContext, OptimizationTask};
use crate::collectors::disks::{self, DiskProbe, SystemDisks};
use crate::collectors::files;
use crate::collectors::metrics::{MetricsSource, SysinfoMetrics};
use crate::config::Config;
use crate::error::StationError;
use crate::input::{ManageItem, OptimizeItem, TopItem};
use crate::models::outcome::Outcome;
use crate::models::usage::UsageRecord;
use crate::monitor::{self, KeyInterrupt, StopSignal};
use crate::platform::{self, CommandRunner, PlatformCommands, ShellRunner};
use crate::ui::charts::{ChartRenderer, TerminalCharts};
use crate::ui::console;
use crate::ui::theme::Theme;
use crate::util::history;
use crate::util::human::{format_percent, format_size};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::Path;

// ── Menu state machine ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    TopMenu,
    OptimizationSubmenu,
    Exited,
}

/// What a selection asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Top(TopItem),
    Optimize(OptimizeItem),
    Invalid,
}

/// Next state for `selection` typed at `state`. Unrecognized input keeps the state.
pub fn transition(state: MenuState, selection: &str) -> (MenuState, Command) {
    match state {
        MenuState::TopMenu => match TopItem::from_selection(selection) {
            Some(TopItem::Optimization) => (MenuState::OptimizationSubmenu, Command::Top(TopItem::Optimization)),
            Some(TopItem::Exit)         => (MenuState::Exited, Command::Top(TopItem::Exit)),
            Some(item)                  => (MenuState::TopMenu, Command::Top(item)),
            None                        => (MenuState::TopMenu, Command::Invalid),
        },
        MenuState::OptimizationSubmenu => match OptimizeItem::from_selection(selection) {
            Some(OptimizeItem::Back) => (MenuState::TopMenu, Command::Optimize(OptimizeItem::Back)),
            Some(item)               => (MenuState::OptimizationSubmenu, Command::Optimize(item)),
            None                     => (MenuState::OptimizationSubmenu, Command::Invalid),
        },
        MenuState::Exited => (MenuState::Exited, Command::Invalid),
    }
}

// ── Collaborators ─────────────────────────────────────────────────────

/// Everything the controller delegates to. Absent providers are `None`
/// and the menu items needing them report that instead of running.
pub struct Services {
    pub disks:    Box<dyn DiskProbe>,
    pub metrics:  Option<Box<dyn MetricsSource>>,
    pub platform: Box<dyn PlatformCommands>,
    pub runner:   Box<dyn CommandRunner>,
    pub charts:   Option<Box<dyn ChartRenderer>>,
    pub stop:     Box<dyn StopSignal>,
}

impl Services {
    pub fn detect() -> Self {
        Self {
            disks:    Box::new(SystemDisks),
            metrics:  SysinfoMetrics::new().map(|m| Box::new(m) as Box<dyn MetricsSource>),
            platform: platform::detect(),
            runner:   Box::new(ShellRunner),
            charts:   TerminalCharts::new().map(|c| Box::new(c) as Box<dyn ChartRenderer>),
            stop:     Box::new(KeyInterrupt::default()),
        }
    }
}

const METRICS: &str = "system metrics provider";
const CHARTS:  &str = "chart terminal";

// ── App ───────────────────────────────────────────────────────────────

pub struct App<R, W> {
    config:   Config,
    theme:    Theme,
    services: Services,
    input:    R,
    out:      W,

    pub state:          MenuState,
    pub last_selection: Option<String>,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(config: Config, theme: Theme, services: Services, input: R, out: W) -> Self {
        Self {
            config,
            theme,
            services,
            input,
            out,
            state:          MenuState::TopMenu,
            last_selection: None,
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Render, read, dispatch until Exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        while self.state != MenuState::Exited {
            self.render_menu()?;
            let prompt = match self.state {
                MenuState::OptimizationSubmenu => "Select optimization task: ",
                _                              => "Select a menu item: ",
            };
            match self.prompt(prompt)? {
                Some(selection) => self.handle_selection(&selection)?,
                None            => self.end_of_input(),
            }
        }
        Ok(())
    }

    fn render_menu(&mut self) -> io::Result<()> {
        match self.state {
            MenuState::TopMenu             => console::top_menu(&mut self.out, &self.theme),
            MenuState::OptimizationSubmenu => {
                console::optimization_menu(&mut self.out, &self.theme, self.services.platform.name())
            }
            MenuState::Exited              => Ok(()),
        }
    }

    /// Print `text` and read one line. None at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn end_of_input(&mut self) {
        tracing::info!("input closed, exiting");
        let _ = writeln!(self.out);
        self.state = MenuState::Exited;
    }

    pub fn handle_selection(&mut self, selection: &str) -> Result<()> {
        let (next, command) = transition(self.state, selection);
        tracing::debug!(selection, ?command, from = ?self.state, to = ?next, "menu selection");
        self.last_selection = Some(selection.to_string());
        self.state = next;

        match command {
            Command::Invalid => {
                writeln!(self.out, "{}", self.theme.fail.apply("Invalid choice. Please try again."))?;
            }
            Command::Top(item) => self.run_top(item)?,
            Command::Optimize(item) => self.run_optimize(item)?,
        }
        Ok(())
    }

    fn run_top(&mut self, item: TopItem) -> Result<()> {
        match item {
            TopItem::CheckDisks       => self.check_disks()?,
            TopItem::MemoryMonitor    => self.memory_monitor()?,
            TopItem::CpuMonitor       => self.cpu_monitor()?,
            TopItem::UsageGraphs      => self.usage_graphs()?,
            TopItem::Processes        => self.list_processes()?,
            TopItem::SystemManagement => self.system_management()?,
            TopItem::FileBrowser      => self.browse_files()?,
            TopItem::LiveMonitoring   => self.live_monitoring()?,
            TopItem::Optimization     => {}
            TopItem::Exit             => writeln!(self.out, "Exiting...")?,
        }
        Ok(())
    }

    fn run_optimize(&mut self, item: OptimizeItem) -> Result<()> {
        match item {
            OptimizeItem::Task(i) => {
                if let Some(&task) = OptimizationTask::ALL.get(i) {
                    self.run_task(task)?;
                }
            }
            OptimizeItem::StartupPrograms => self.manage_startup()?,
            OptimizeItem::RunAll          => self.run_all()?,
            OptimizeItem::Back            => {}
        }
        Ok(())
    }

    // ── Reporting helpers ──────────────────────────────────────────────

    fn report_missing(&mut self, what: &'static str) -> io::Result<()> {
        let err = StationError::MissingDependency(what);
        tracing::warn!(error = %err, "menu item skipped");
        writeln!(self.out, "{}", self.theme.fail.apply(format!("Error: {}.", err)))
    }

    fn report_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        let style = if outcome.succeeded { self.theme.ok } else { self.theme.fail };
        writeln!(self.out, "{}", style.apply(&outcome.detail))
    }

    // ── Top menu actions ───────────────────────────────────────────────

    fn check_disks(&mut self) -> Result<()> {
        let (snapshots, failures) = disks::probe_all(self.services.disks.as_ref());

        for s in &snapshots {
            console::separator(&mut self.out, &self.theme, &format!("Disk: {}", s.volume))?;
            writeln!(self.out, "{}", self.theme.ok.apply(format!("  Total size: {}", format_size(s.total_bytes))))?;
            let used = format!("  Used: {} ({})", format_size(s.used_bytes), format_percent(s.use_pct()));
            writeln!(self.out, "{}", self.theme.accent.apply(used))?;
            writeln!(self.out, "{}", self.theme.warn.apply(format!("  Free: {}", format_size(s.free_bytes))))?;
        }
        for e in &failures {
            writeln!(self.out, "{}", self.theme.fail.apply(format!("Skipped: {}", e)))?;
        }
        if snapshots.is_empty() {
            writeln!(self.out, "{}", self.theme.warn.apply("No volumes could be read; nothing saved."))?;
            return Ok(());
        }

        let path = self.config.general.history_file.clone();
        match history::append(&UsageRecord::now(snapshots), &path) {
            Ok(()) => writeln!(
                self.out,
                "{}",
                self.theme.info.apply(format!("\nData saved to '{}'", path.display()))
            )?,
            Err(e) => {
                tracing::warn!(error = %e, "history append failed");
                writeln!(self.out, "{}", self.theme.fail.apply(format!("Error: {}", e)))?;
            }
        }
        Ok(())
    }

    fn memory_monitor(&mut self) -> Result<()> {
        let interval = self.config.monitor_interval();
        let Some(metrics) = self.services.metrics.as_deref_mut() else {
            return Ok(self.report_missing(METRICS)?);
        };
        monitor::monitor_memory(metrics, self.services.stop.as_mut(), interval, &mut self.out, &self.theme)?;
        Ok(())
    }

    fn cpu_monitor(&mut self) -> Result<()> {
        let interval = self.config.monitor_interval();
        let Some(metrics) = self.services.metrics.as_deref_mut() else {
            return Ok(self.report_missing(METRICS)?);
        };
        monitor::monitor_cpu(metrics, self.services.stop.as_mut(), interval, &mut self.out, &self.theme)?;
        Ok(())
    }

    fn usage_graphs(&mut self) -> Result<()> {
        if self.services.charts.is_none() {
            return Ok(self.report_missing(CHARTS)?);
        }
        let path = self.config.general.history_file.clone();
        if !path.exists() {
            writeln!(self.out, "{}", self.theme.warn.apply("No data to display."))?;
            return Ok(());
        }
        let entries = history::parse_all(&path);
        if entries.is_empty() {
            writeln!(self.out, "{}", self.theme.warn.apply("No data to display."))?;
            return Ok(());
        }
        if let Some(charts) = self.services.charts.as_deref_mut() {
            if let Err(e) = charts.disk_usage(&entries, &self.theme) {
                tracing::warn!(error = %e, "disk usage chart failed");
                writeln!(self.out, "{}", self.theme.fail.apply(format!("Error drawing chart: {}", e)))?;
            }
        }
        Ok(())
    }

    fn list_processes(&mut self) -> Result<()> {
        let Some(metrics) = self.services.metrics.as_deref_mut() else {
            return Ok(self.report_missing(METRICS)?);
        };
        console::separator(&mut self.out, &self.theme, "System Processes")?;
        for p in metrics.processes() {
            writeln!(
                self.out,
                "PID: {} | {} | CPU: {:.1}% | RAM: {:.2}%",
                p.pid, p.name, p.cpu_percent, p.mem_percent
            )?;
        }
        Ok(())
    }

    fn system_management(&mut self) -> Result<()> {
        console::management_menu(&mut self.out, &self.theme)?;
        let Some(choice) = self.prompt("Choose an action: ")? else {
            self.end_of_input();
            return Ok(());
        };
        let outcome = match ManageItem::from_selection(&choice) {
            Some(ManageItem::Reboot) => {
                let inv = self.services.platform.reboot();
                self.run_command("Reboot", &inv)
            }
            Some(ManageItem::Shutdown) => {
                let inv = self.services.platform.shutdown();
                self.run_command("Shutdown", &inv)
            }
            Some(ManageItem::ClearTemp) => {
                actions::run_task(OptimizationTask::CleanTemp, &self.action_context())
            }
            None => {
                writeln!(self.out, "Invalid choice.")?;
                return Ok(());
            }
        };
        self.report_outcome(&outcome)?;
        Ok(())
    }

    fn run_command(&self, label: &str, inv: &platform::Invocation) -> Outcome {
        match self.services.runner.run(inv) {
            Ok(())  => Outcome::ok(format!("{} requested.", label)),
            Err(e)  => Outcome::failed(e.to_string()),
        }
    }

    fn browse_files(&mut self) -> Result<()> {
        console::separator(&mut self.out, &self.theme, "Local Filesystem")?;
        let Some(input) = self.prompt("Enter path to browse (default /): ")? else {
            self.end_of_input();
            return Ok(());
        };
        let path = if input.is_empty() { "/".to_string() } else { input };
        if !Path::new(&path).exists() {
            writeln!(self.out, "{}", self.theme.fail.apply("Path not found."))?;
            return Ok(());
        }
        match files::list_dir(Path::new(&path)) {
            Ok(entries) => {
                writeln!(self.out, "Files and folders in {}:", path)?;
                for e in entries {
                    writeln!(self.out, "{} - {}", e.name, format_size(e.bytes))?;
                }
            }
            Err(e) => writeln!(self.out, "{}", self.theme.fail.apply(format!("Cannot list {}: {}", path, e)))?,
        }
        Ok(())
    }

    fn live_monitoring(&mut self) -> Result<()> {
        if self.services.metrics.is_none() {
            return Ok(self.report_missing(METRICS)?);
        }
        if self.services.charts.is_none() {
            return Ok(self.report_missing(CHARTS)?);
        }
        let count = self.config.general.live_samples.max(1);
        let interval = self.config.monitor_interval();
        writeln!(
            self.out,
            "{}",
            self.theme.header.apply(format!("Starting {}-sample monitoring...", count))
        )?;
        self.out.flush()?;

        let samples = match self.services.metrics.as_deref_mut() {
            Some(metrics) => monitor::sample_live(metrics, count, interval),
            None          => None,
        };
        let Some(samples) = samples.filter(|s| !s.is_empty()) else {
            writeln!(self.out, "{}", self.theme.fail.apply("Metrics became unavailable during sampling."))?;
            return Ok(());
        };
        if let Some(charts) = self.services.charts.as_deref_mut() {
            if let Err(e) = charts.live(&samples, &self.theme) {
                tracing::warn!(error = %e, "live chart failed");
                writeln!(self.out, "{}", self.theme.fail.apply(format!("Error drawing chart: {}", e)))?;
            }
        }
        Ok(())
    }

    // ── Optimization submenu ───────────────────────────────────────────

    fn action_context(&self) -> ActionContext<'_> {
        ActionContext {
            platform: self.services.platform.as_ref(),
            runner:   self.services.runner.as_ref(),
            disks:    self.services.disks.as_ref(),
        }
    }

    fn run_task(&mut self, task: OptimizationTask) -> Result<()> {
        writeln!(self.out, "{}", self.theme.info.apply(format!("{}...", task.progress_label())))?;
        self.out.flush()?;
        let outcome = actions::run_task(task, &self.action_context());
        self.report_outcome(&outcome)?;
        Ok(())
    }

    fn run_all(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.theme.header.apply("Running all optimizations..."))?;

        let ctx = ActionContext {
            platform: self.services.platform.as_ref(),
            runner:   self.services.runner.as_ref(),
            disks:    self.services.disks.as_ref(),
        };
        let out = &mut self.out;
        let theme = &self.theme;
        let mut write_err: Option<io::Error> = None;

        let report = actions::run_batch(&OptimizationTask::ALL, |task| {
            let header = theme.info.apply(format!(">>> {}...", task.progress_label()));
            if let Err(e) = writeln!(out, "\n{}", header).and_then(|_| out.flush()) {
                write_err.get_or_insert(e);
            }
            actions::execute(task, &ctx)
        });
        if let Some(e) = write_err {
            return Err(e.into());
        }

        writeln!(self.out)?;
        for (task, outcome) in &report.results {
            if outcome.succeeded {
                writeln!(self.out, "  {} {}", self.theme.ok.apply("[ OK ]"), task.progress_label())?;
            } else {
                writeln!(
                    self.out,
                    "  {} {}: {}",
                    self.theme.fail.apply("[FAIL]"),
                    task.progress_label(),
                    outcome.detail
                )?;
            }
        }
        writeln!(self.out, "{} succeeded, {} failed", report.succeeded(), report.failed())?;
        writeln!(self.out, "{}", self.theme.ok.apply("\nAll optimizations completed!"))?;
        tracing::info!(succeeded = report.succeeded(), failed = report.failed(), "run all finished");
        Ok(())
    }

    fn manage_startup(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.theme.info.apply("Managing startup programs..."))?;
        let dir = match self.services.platform.startup_dir() {
            Some(d) if d.is_dir() => d,
            _ => {
                writeln!(self.out, "{}", self.theme.warn.apply("Startup folder not found."))?;
                return Ok(());
            }
        };
        let names = match actions::list_startup(&dir) {
            Ok(n)  => n,
            Err(e) => {
                let outcome = Outcome::failed(format!("Error managing startup programs: {}", e));
                self.report_outcome(&outcome)?;
                return Ok(());
            }
        };
        writeln!(self.out, "Startup programs location: {}", dir.display())?;
        writeln!(self.out, "List of startup programs:")?;
        for name in &names {
            writeln!(self.out, "  - {}", name)?;
        }

        let Some(remove) = self.prompt("Enter filename to remove from startup (or press Enter to skip): ")? else {
            self.end_of_input();
            return Ok(());
        };
        if !remove.is_empty() {
            let outcome = actions::remove_startup(&dir, &remove);
            self.report_outcome(&outcome)?;
        }
        Ok(())
    }
}
