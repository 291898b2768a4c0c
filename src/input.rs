use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Interrupt a running monitor / leave a chart.
    Stop,
    /// Any other key: dismisses a chart, ignored by monitors.
    Other,
    None,
}

pub fn handle_key(key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('q'), _)
        | (KeyCode::Esc, _) => Action::Stop,

        _ => Action::Other,
    }
}

// ── Menu selections ───────────────────────────────────────────────────

/// Top-level menu entries, numbered as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopItem {
    CheckDisks,
    MemoryMonitor,
    CpuMonitor,
    UsageGraphs,
    Processes,
    SystemManagement,
    FileBrowser,
    Optimization,
    LiveMonitoring,
    Exit,
}

impl TopItem {
    pub fn from_selection(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "1"  => Self::CheckDisks,
            "2"  => Self::MemoryMonitor,
            "3"  => Self::CpuMonitor,
            "4"  => Self::UsageGraphs,
            "5"  => Self::Processes,
            "6"  => Self::SystemManagement,
            "7"  => Self::FileBrowser,
            "8"  => Self::Optimization,
            "9"  => Self::LiveMonitoring,
            "10" => Self::Exit,
            _    => return None,
        })
    }
}

/// Optimization submenu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeItem {
    /// 1..=7, index into `OptimizationTask::ALL`
    Task(usize),
    StartupPrograms,
    RunAll,
    Back,
}

impl OptimizeItem {
    pub fn from_selection(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "0" => Self::Back,
            "8" => Self::StartupPrograms,
            "9" => Self::RunAll,
            n @ ("1" | "2" | "3" | "4" | "5" | "6" | "7") => Self::Task(n.parse::<usize>().ok()? - 1),
            _   => return None,
        })
    }
}

/// One-shot system management prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageItem {
    Reboot,
    Shutdown,
    ClearTemp,
}

impl ManageItem {
    pub fn from_selection(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Self::Reboot),
            "2" => Some(Self::Shutdown),
            "3" => Some(Self::ClearTemp),
            _   => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_q_and_esc_stop() {
        assert_eq!(handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Stop);
        assert_eq!(handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Stop);
        assert_eq!(handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)), Action::Stop);
        assert_eq!(handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)), Action::Other);
        assert_eq!(handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), Action::Other);
    }

    #[test]
    fn top_menu_numbers() {
        assert_eq!(TopItem::from_selection("1"), Some(TopItem::CheckDisks));
        assert_eq!(TopItem::from_selection(" 10\n"), Some(TopItem::Exit));
        assert_eq!(TopItem::from_selection("0"), None);
        assert_eq!(TopItem::from_selection("11"), None);
        assert_eq!(TopItem::from_selection("01"), None);
        assert_eq!(TopItem::from_selection("disks"), None);
    }

    #[test]
    fn optimize_menu_numbers() {
        assert_eq!(OptimizeItem::from_selection("1"), Some(OptimizeItem::Task(0)));
        assert_eq!(OptimizeItem::from_selection("7"), Some(OptimizeItem::Task(6)));
        assert_eq!(OptimizeItem::from_selection("8"), Some(OptimizeItem::StartupPrograms));
        assert_eq!(OptimizeItem::from_selection("9"), Some(OptimizeItem::RunAll));
        assert_eq!(OptimizeItem::from_selection("0"), Some(OptimizeItem::Back));
        assert_eq!(OptimizeItem::from_selection("10"), None);
    }
}
