//! Wall-clock timing of scans and of each scanner run

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Timer(Instant);

impl Timer {
    pub fn start() -> Self {
        Timer(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Render as "< 1ms", "456ms" or "1.23s"
pub fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        0 => "< 1ms".to_string(),
        ms if ms < 1000 => format!("{}ms", ms),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

/// Rows produced by one completed scanner and how long it took
#[derive(Debug, Clone)]
pub struct ScannerTiming {
    pub name: String,
    pub result_count: usize,
    /// Fetch plus evaluation
    pub duration: Duration,
}

impl ScannerTiming {
    pub fn new(name: &str, result_count: usize, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            result_count,
            duration,
        }
    }

    pub fn duration_formatted(&self) -> String {
        format_duration(self.duration)
    }
}

/// Timing attached to a [`ScanReport`](crate::rules::results::ScanReport).
/// Failed and cancelled scanners have no entry.
#[derive(Debug, Clone, Default)]
pub struct ScanTiming {
    scanners: Vec<ScannerTiming>,
    total_duration: Duration,
}

impl ScanTiming {
    pub fn add_scanner(&mut self, timing: ScannerTiming) {
        self.scanners.push(timing);
    }

    pub fn set_total_duration(&mut self, duration: Duration) {
        self.total_duration = duration;
    }

    pub fn scanners(&self) -> &[ScannerTiming] {
        &self.scanners
    }

    pub fn total_duration_formatted(&self) -> String {
        format_duration(self.total_duration)
    }
}
