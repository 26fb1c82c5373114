// Session metrics module
//
// Provides lightweight metrics tracking for monitoring a workbench session

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Session metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Metrics are collected throughout the application lifecycle and logged
/// on shutdown for a session summary.
#[derive(Debug)]
pub struct Metrics {
    /// Total number of commands that began executing
    pub commands_dispatched: AtomicU64,

    /// Commands the user backed out of (picker or prompt cancel)
    pub commands_cancelled: AtomicU64,

    /// Commands that finished with a failure outcome
    pub commands_failed: AtomicU64,

    /// Commands rejected because another one was still running
    pub commands_rejected_busy: AtomicU64,

    /// Total number of projects successfully loaded
    pub projects_loaded: AtomicUsize,

    /// Total number of exports that completed
    pub exports_completed: AtomicUsize,

    /// Total number of exports that failed
    pub exports_failed: AtomicUsize,

    /// Total number of files written by completed exports
    pub files_written: AtomicU64,

    /// Total export time in milliseconds
    pub total_export_time_ms: AtomicU64,

    /// Application start time
    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            commands_dispatched: AtomicU64::new(0),
            commands_cancelled: AtomicU64::new(0),
            commands_failed: AtomicU64::new(0),
            commands_rejected_busy: AtomicU64::new(0),
            projects_loaded: AtomicUsize::new(0),
            exports_completed: AtomicUsize::new(0),
            exports_failed: AtomicUsize::new(0),
            files_written: AtomicU64::new(0),
            total_export_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a command starting to execute
    pub fn record_dispatched(&self) {
        self.commands_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command cancelled by the user
    pub fn record_cancelled(&self) {
        self.commands_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command that finished with a failure
    pub fn record_failed(&self) {
        self.commands_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command rejected while another was running
    pub fn record_rejected_busy(&self) {
        self.commands_rejected_busy.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful project load
    pub fn record_project_loaded(&self) {
        self.projects_loaded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed export run
    pub fn record_export_completed(&self, files_written: usize, duration: Duration) {
        self.exports_completed.fetch_add(1, Ordering::Relaxed);
        self.files_written
            .fetch_add(files_written as u64, Ordering::Relaxed);
        self.total_export_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed export run
    pub fn record_export_failed(&self) {
        self.exports_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get average export time per completed run in milliseconds
    pub fn avg_export_time_ms(&self) -> f64 {
        let total = self.total_export_time_ms.load(Ordering::Relaxed);
        let count = self.exports_completed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        let uptime = self.uptime();
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", uptime.as_secs_f64());
        tracing::info!(
            "Commands: {} dispatched, {} cancelled, {} failed, {} rejected while busy",
            self.commands_dispatched.load(Ordering::Relaxed),
            self.commands_cancelled.load(Ordering::Relaxed),
            self.commands_failed.load(Ordering::Relaxed),
            self.commands_rejected_busy.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Projects loaded: {}",
            self.projects_loaded.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Exports: {} completed, {} failed, {} files written (avg: {:.2}ms per export)",
            self.exports_completed.load(Ordering::Relaxed),
            self.exports_failed.load(Ordering::Relaxed),
            self.files_written.load(Ordering::Relaxed),
            self.avg_export_time_ms()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
