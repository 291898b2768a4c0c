use crate::input::{handle_key, Action};
use crate::models::process::LiveSamples;
use crate::models::usage::HistoryEntry;
use crate::ui::theme::Theme;
use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io::{self, IsTerminal};
use std::time::Duration;

const BAR_WIDTH:  u16 = 7;
const BAR_GAP:    u16 = 1;
const GROUP_GAP:  u16 = 2;
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Draws charts for the operator.
pub trait ChartRenderer {
    fn disk_usage(&mut self, entries: &[HistoryEntry], theme: &Theme) -> Result<()>;
    fn live(&mut self, samples: &LiveSamples, theme: &Theme) -> Result<()>;
}

/// Full-screen charts in the alternate screen, dismissed with any key.
#[derive(Debug)]
pub struct TerminalCharts;

impl TerminalCharts {
    /// None when stdout is not a terminal (piped, redirected).
    pub fn new() -> Option<Self> {
        io::stdout().is_terminal().then_some(TerminalCharts)
    }

    fn show<F>(&self, draw: F) -> Result<()>
    where
        F: Fn(&mut Frame),
    {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let result = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| draw_until_key(&mut terminal, draw));
        restore_terminal()?;
        result
    }
}

fn draw_until_key<B, F>(terminal: &mut Terminal<B>, draw: F) -> Result<()>
where
    B: ratatui::backend::Backend,
    F: Fn(&mut Frame),
{
    loop {
        terminal.draw(|f| draw(f))?;
        if event::poll(POLL_TIMEOUT)? {
            if let Event::Key(key) = event::read()? {
                if handle_key(key) != Action::None {
                    return Ok(());
                }
            }
        }
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

impl ChartRenderer for TerminalCharts {
    fn disk_usage(&mut self, entries: &[HistoryEntry], theme: &Theme) -> Result<()> {
        self.show(|f| {
            let area = f.area();
            render_disk_usage(f, area, entries, theme)
        })
    }

    fn live(&mut self, samples: &LiveSamples, theme: &Theme) -> Result<()> {
        self.show(|f| {
            let area = f.area();
            render_live(f, area, samples, theme)
        })
    }
}

// ── Disk usage bars ─────────────────────────────────────────────────────

pub fn render_disk_usage(f: &mut Frame, area: Rect, entries: &[HistoryEntry], theme: &Theme) {
    let group_width = 2 * BAR_WIDTH + BAR_GAP + GROUP_GAP;
    let inner_width = area.width.saturating_sub(2);
    let fits = ((inner_width + GROUP_GAP) / group_width).max(1) as usize;
    let shown = &entries[entries.len().saturating_sub(fits)..];

    let title = if shown.len() < entries.len() {
        format!(" Disk Usage Overview (GB), last {} of {} entries ", shown.len(), entries.len())
    } else {
        " Disk Usage Overview (GB) ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_border)
        .title(Span::styled(title, theme.chart_title));

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 3 { return; }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let legend = Line::from(vec![
        Span::styled("■ Used  ", theme.chart_used),
        Span::styled("■ Free", theme.chart_free),
    ]);
    f.render_widget(Paragraph::new(legend), rows[0]);

    if shown.is_empty() {
        f.render_widget(Paragraph::new(Span::styled("No data to display.", theme.chart_text)), rows[1]);
    } else {
        let mut chart = BarChart::default()
            .bar_width(BAR_WIDTH)
            .bar_gap(BAR_GAP)
            .group_gap(GROUP_GAP);
        for entry in shown {
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(entry.volume.clone()))
                    .bars(&[gb_bar(entry.used_gb, theme.chart_used), gb_bar(entry.free_gb, theme.chart_free)]),
            );
        }
        f.render_widget(chart, rows[1]);
    }

    f.render_widget(Paragraph::new(Span::styled("Press any key to return", theme.chart_text)), rows[2]);
}

fn gb_bar(gb: f64, style: ratatui::style::Style) -> Bar<'static> {
    Bar::default()
        // hundredths keep the two recorded decimals in bar heights
        .value((gb.max(0.0) * 100.0).round() as u64)
        .text_value(format!("{:.1}", gb))
        .style(style)
}

// ── Live CPU / memory lines ─────────────────────────────────────────────

pub fn render_live(f: &mut Frame, area: Rect, samples: &LiveSamples, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let cpu: Vec<(f64, f64)> = points(&samples.cpu_percent);
    let mem: Vec<(f64, f64)> = points(&samples.mem_percent);
    let max_x = (samples.len().max(2) - 1) as f64;

    f.render_widget(percent_chart(&cpu, "CPU %", "CPU Load (%)", max_x, theme.chart_cpu, theme), rows[0]);
    f.render_widget(percent_chart(&mem, "Memory %", "Memory Usage (%)", max_x, theme.chart_mem, theme), rows[1]);
    f.render_widget(Paragraph::new(Span::styled("Press any key to return", theme.chart_text)), rows[2]);
}

fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
}

fn percent_chart<'a>(
    data:   &'a [(f64, f64)],
    name:   &'a str,
    y_title: &'a str,
    max_x:  f64,
    style:  ratatui::style::Style,
    theme:  &Theme,
) -> Chart<'a> {
    let dataset = Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(style)
        .data(data);

    Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.chart_border)
                .title(Span::styled(format!(" {} ", name), theme.chart_title)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("Time (s)", theme.chart_text))
                .style(theme.chart_text)
                .bounds([0.0, max_x])
                .labels(vec![Line::from("0"), Line::from(format!("{}", max_x as u64))]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(y_title, theme.chart_text))
                .style(theme.chart_text)
                .bounds([0.0, 100.0])
                .labels(vec![Line::from("0"), Line::from("50"), Line::from("100")]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn screen(width: u16, height: u16, draw: impl Fn(&mut Frame, Rect)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| {
            let area = f.area();
            draw(f, area)
        }).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn entry(volume: &str, used_gb: f64, free_gb: f64) -> HistoryEntry {
        HistoryEntry { volume: volume.into(), used_gb, free_gb }
    }

    #[test]
    fn bar_chart_labels_volumes() {
        let entries = vec![entry("C", 279.4, 186.26), entry("D", 12.0, 88.0)];
        let text = screen(80, 20, |f, area| render_disk_usage(f, area, &entries, &Theme::mono()));
        assert!(text.contains("Disk Usage Overview (GB)"));
        assert!(text.contains("279.4"));
        assert!(text.contains("88.0"));
        assert!(text.contains("Used"));
    }

    #[test]
    fn narrow_screen_shows_latest_entries() {
        let entries: Vec<_> = (0..10).map(|i| entry(&format!("V{}", i), 1.0, 2.0)).collect();
        let text = screen(60, 15, |f, area| render_disk_usage(f, area, &entries, &Theme::mono()));
        assert!(text.contains("last 3 of 10 entries"));
        assert!(text.contains("V9"));
        assert!(!text.contains("V0"));
    }

    #[test]
    fn empty_history_renders_notice() {
        let text = screen(60, 10, |f, area| render_disk_usage(f, area, &[], &Theme::mono()));
        assert!(text.contains("No data to display."));
    }

    #[test]
    fn live_chart_has_both_panels() {
        let samples = LiveSamples {
            cpu_percent: vec![5.0, 40.0, 90.0],
            mem_percent: vec![30.0, 31.0, 33.0],
        };
        let text = screen(80, 24, |f, area| render_live(f, area, &samples, &Theme::mono()));
        assert!(text.contains("CPU %"));
        assert!(text.contains("Memory %"));
        assert!(text.contains("Press any key to return"));
    }

    #[test]
    fn gb_bars_keep_two_decimals() {
        let bar = gb_bar(186.26, ratatui::style::Style::default());
        // Bar fields are private; rendering covers text, the debug form covers value.
        assert!(format!("{:?}", bar).contains("18626"));
    }
}
