//! Memory / CPU monitors and the bounded live sampler.
//!
//! The continuous monitors own the console until the operator interrupts
//! them; a [`StopSignal`] turns that interrupt into a loop exit.

use crate::collectors::metrics::MetricsSource;
use crate::input::{handle_key, Action};
use crate::models::process::LiveSamples;
use crate::ui::theme::Theme;
use crate::util::human::{format_gb, format_percent};
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Cancellation source for the unbounded monitors.
pub trait StopSignal {
    /// Start listening for the interrupt.
    fn arm(&mut self) -> io::Result<()>;

    /// Sleep up to `timeout`. Returns true once a stop was requested.
    fn wait(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Stop listening; must be safe to call after a failed `arm`.
    fn disarm(&mut self);
}

/// Reads Ctrl+C (also `q` / Esc) from the terminal in raw mode.
#[derive(Debug, Default)]
pub struct KeyInterrupt {
    raw: bool,
}

impl StopSignal for KeyInterrupt {
    fn arm(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw = true;
        Ok(())
    }

    fn wait(&mut self, timeout: Duration) -> io::Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            if event::poll(remaining)? {
                if let Event::Key(key) = event::read()? {
                    if handle_key(key) == Action::Stop {
                        return Ok(true);
                    }
                }
            }
        }
    }

    fn disarm(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
            self.raw = false;
        }
    }
}

/// How a monitor run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEnd {
    Stopped,
    Unavailable,
    /// The interrupt listener failed (no controlling terminal, read error).
    SignalLost(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSummary {
    pub end:     MonitorEnd,
    pub samples: usize,
    pub last:    Option<f64>,
}

/// Print memory usage in place every `interval` until stopped.
pub fn monitor_memory(
    metrics:  &mut dyn MetricsSource,
    stop:     &mut dyn StopSignal,
    interval: Duration,
    out:      &mut dyn Write,
    theme:    &Theme,
) -> io::Result<MonitorSummary> {
    run_loop(stop, out, theme, "Memory", |out| {
        let Some(mem) = metrics.memory_usage() else { return Ok(None) };
        let line = format!(
            "\rMemory: {} out of {} ({}) ",
            format_gb(mem.used_gb),
            format_gb(mem.total_gb),
            format_percent(mem.percent),
        );
        write!(out, "{}", theme.info.apply(line))?;
        Ok(Some(mem.percent))
    }, interval)
}

/// Print CPU load in place; each reading samples over `interval`.
pub fn monitor_cpu(
    metrics:  &mut dyn MetricsSource,
    stop:     &mut dyn StopSignal,
    interval: Duration,
    out:      &mut dyn Write,
    theme:    &Theme,
) -> io::Result<MonitorSummary> {
    run_loop(stop, out, theme, "CPU", |out| {
        let Some(load) = metrics.cpu_load_percent(interval) else { return Ok(None) };
        write!(out, "{}", theme.info.apply(format!("\rCPU Load: {} ", format_percent(load))))?;
        Ok(Some(load))
    }, interval)
}

/// Errors returned here come from `out` only; a failing stop signal ends
/// the run with [`MonitorEnd::SignalLost`].
fn run_loop<F>(
    stop:     &mut dyn StopSignal,
    out:      &mut dyn Write,
    theme:    &Theme,
    label:    &str,
    mut tick: F,
    interval: Duration,
) -> io::Result<MonitorSummary>
where
    F: FnMut(&mut dyn Write) -> io::Result<Option<f64>>,
{
    writeln!(out, "{}", theme.dim.apply("Press Ctrl+C to stop."))?;
    let result = match stop.arm() {
        Ok(())  => sample_until_stopped(stop, out, &mut tick, interval),
        Err(e)  => Ok(MonitorSummary { end: MonitorEnd::SignalLost(e.to_string()), samples: 0, last: None }),
    };
    stop.disarm();

    let summary = result?;
    writeln!(out)?;
    match &summary.end {
        MonitorEnd::Stopped => {
            writeln!(out, "{}", theme.warn.apply(format!("{} monitoring stopped.", label)))?;
        }
        MonitorEnd::Unavailable => {
            writeln!(out, "{}", theme.fail.apply(format!("{} metrics are unavailable.", label)))?;
        }
        MonitorEnd::SignalLost(reason) => {
            tracing::warn!(monitor = label, %reason, "interrupt listener failed");
            writeln!(
                out,
                "{}",
                theme.fail.apply(format!("{} monitoring cannot listen for Ctrl+C: {}", label, reason))
            )?;
        }
    }
    tracing::info!(monitor = label, samples = summary.samples, "monitor finished");
    Ok(summary)
}

fn sample_until_stopped<F>(
    stop:     &mut dyn StopSignal,
    out:      &mut dyn Write,
    tick:     &mut F,
    interval: Duration,
) -> io::Result<MonitorSummary>
where
    F: FnMut(&mut dyn Write) -> io::Result<Option<f64>>,
{
    let mut samples = 0;
    let mut last = None;
    loop {
        match tick(out)? {
            Some(v) => {
                samples += 1;
                last = Some(v);
            }
            None => return Ok(MonitorSummary { end: MonitorEnd::Unavailable, samples, last }),
        }
        out.flush()?;
        match stop.wait(interval) {
            Ok(false) => {}
            Ok(true)  => return Ok(MonitorSummary { end: MonitorEnd::Stopped, samples, last }),
            Err(e)    => return Ok(MonitorSummary { end: MonitorEnd::SignalLost(e.to_string()), samples, last }),
        }
    }
}

/// Take `count` CPU and memory readings, one per `interval`.
/// Returns None if the provider stops answering.
pub fn sample_live(metrics: &mut dyn MetricsSource, count: usize, interval: Duration) -> Option<LiveSamples> {
    let mut samples = LiveSamples::default();
    for _ in 0..count {
        samples.cpu_percent.push(metrics.cpu_load_percent(interval)?);
        samples.mem_percent.push(metrics.memory_usage()?.percent);
    }
    Some(samples)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::process::{MemoryUsage, ProcessInfo};

    /// Canned metrics that go dark after `available` readings.
    pub(crate) struct FakeMetrics {
        pub available: usize,
        pub reads:     usize,
    }

    impl FakeMetrics {
        pub fn new(available: usize) -> Self {
            Self { available, reads: 0 }
        }

        fn next(&mut self) -> Option<usize> {
            if self.reads >= self.available { return None; }
            self.reads += 1;
            Some(self.reads)
        }
    }

    impl MetricsSource for FakeMetrics {
        fn memory_usage(&mut self) -> Option<MemoryUsage> {
            let n = self.next()?;
            Some(MemoryUsage { total_gb: 16.0, used_gb: 4.0, percent: 25.0 + n as f64 })
        }

        fn cpu_load_percent(&mut self, _sampling: Duration) -> Option<f64> {
            self.next().map(|n| n as f64 * 10.0)
        }

        fn processes(&mut self) -> Box<dyn Iterator<Item = ProcessInfo> + '_> {
            Box::new(
                vec![
                    ProcessInfo { pid: 1, name: "init".into(), cpu_percent: 0.0, mem_percent: 0.1 },
                    ProcessInfo { pid: 42, name: "editor".into(), cpu_percent: 12.5, mem_percent: 3.25 },
                ]
                .into_iter(),
            )
        }
    }

    /// Fires after `after` waits.
    pub(crate) struct StopAfter {
        pub after: usize,
        pub waits: usize,
        pub armed: bool,
    }

    impl StopAfter {
        pub fn new(after: usize) -> Self {
            Self { after, waits: 0, armed: false }
        }
    }

    impl StopSignal for StopAfter {
        fn arm(&mut self) -> io::Result<()> {
            self.armed = true;
            Ok(())
        }

        fn wait(&mut self, _timeout: Duration) -> io::Result<bool> {
            assert!(self.armed, "wait before arm");
            self.waits += 1;
            Ok(self.waits >= self.after)
        }

        fn disarm(&mut self) {
            self.armed = false;
        }
    }

    /// Stop signal whose `arm` or `wait` fails.
    pub(crate) struct BrokenSignal {
        pub fail_arm: bool,
        pub disarmed: bool,
    }

    impl StopSignal for BrokenSignal {
        fn arm(&mut self) -> io::Result<()> {
            if self.fail_arm {
                return Err(io::Error::new(io::ErrorKind::Other, "not a tty"));
            }
            Ok(())
        }

        fn wait(&mut self, _timeout: Duration) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::Other, "event read failed"))
        }

        fn disarm(&mut self) {
            self.disarmed = true;
        }
    }

    /// Writer that refuses every write.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn memory_monitor_runs_until_stopped() {
        let mut metrics = FakeMetrics::new(usize::MAX);
        let mut stop = StopAfter::new(3);
        let mut out = Vec::new();

        let summary = monitor_memory(&mut metrics, &mut stop, Duration::ZERO, &mut out, &Theme::mono()).unwrap();

        assert_eq!(summary, MonitorSummary { end: MonitorEnd::Stopped, samples: 3, last: Some(28.0) });
        assert!(!stop.armed);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\rMemory: 4.00 GB out of 16.00 GB (28.0%)"));
        assert!(text.ends_with("Memory monitoring stopped.\n"));
    }

    #[test]
    fn cpu_monitor_reports_unavailable_provider() {
        let mut metrics = FakeMetrics::new(2);
        let mut stop = StopAfter::new(usize::MAX);
        let mut out = Vec::new();

        let summary = monitor_cpu(&mut metrics, &mut stop, Duration::ZERO, &mut out, &Theme::mono()).unwrap();

        assert_eq!(summary.end, MonitorEnd::Unavailable);
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.last, Some(20.0));
        assert!(String::from_utf8(out).unwrap().contains("CPU metrics are unavailable."));
    }

    #[test]
    fn failed_arm_ends_run_without_sampling() {
        let mut metrics = FakeMetrics::new(usize::MAX);
        let mut stop = BrokenSignal { fail_arm: true, disarmed: false };
        let mut out = Vec::new();

        let summary = monitor_memory(&mut metrics, &mut stop, Duration::ZERO, &mut out, &Theme::mono()).unwrap();

        assert_eq!(summary.end, MonitorEnd::SignalLost("not a tty".into()));
        assert_eq!(summary.samples, 0);
        assert_eq!(metrics.reads, 0);
        assert!(stop.disarmed);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Memory monitoring cannot listen for Ctrl+C: not a tty"));
    }

    #[test]
    fn failed_wait_keeps_samples_taken_so_far() {
        let mut metrics = FakeMetrics::new(usize::MAX);
        let mut stop = BrokenSignal { fail_arm: false, disarmed: false };
        let mut out = Vec::new();

        let summary = monitor_cpu(&mut metrics, &mut stop, Duration::ZERO, &mut out, &Theme::mono()).unwrap();

        assert_eq!(summary.end, MonitorEnd::SignalLost("event read failed".into()));
        assert_eq!(summary.samples, 1);
        assert_eq!(summary.last, Some(10.0));
        assert!(stop.disarmed);
    }

    #[test]
    fn output_failure_is_returned() {
        let mut metrics = FakeMetrics::new(usize::MAX);
        let mut stop = StopAfter::new(usize::MAX);
        let err = monitor_cpu(&mut metrics, &mut stop, Duration::ZERO, &mut ClosedPipe, &Theme::mono()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn live_sampling_is_bounded() {
        let mut metrics = FakeMetrics::new(usize::MAX);
        let samples = sample_live(&mut metrics, 10, Duration::ZERO).unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(metrics.reads, 20);
    }

    #[test]
    fn live_sampling_gives_up_when_provider_disappears() {
        let mut metrics = FakeMetrics::new(5);
        assert!(sample_live(&mut metrics, 10, Duration::ZERO).is_none());
    }
}
