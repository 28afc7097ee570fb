//! Default process gauges.
//!
//! Sampled from the OS with `sysinfo` on a fixed interval, never at scrape
//! time, so rendering `/metrics` stays a pure read.

use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::sync::broadcast;
use tokio::time;

use crate::observability::metrics::MetricsRegistry;

const RESIDENT_MEMORY: &str = "process_resident_memory_bytes";
const VIRTUAL_MEMORY: &str = "process_virtual_memory_bytes";
const CPU_USAGE: &str = "process_cpu_usage_percent";
const START_TIME: &str = "process_start_time_seconds";
const UPTIME: &str = "process_uptime_seconds";

/// Snapshot of the current process as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSample {
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
    pub cpu_percent: f32,
    pub start_time_secs: u64,
    pub uptime_secs: u64,
}

/// Periodically samples this process and publishes the gauges.
pub struct ProcessCollector {
    registry: MetricsRegistry,
    system: System,
    pid: Option<Pid>,
    interval: Duration,
}

impl ProcessCollector {
    /// Register the process gauges and publish a first sample immediately.
    pub fn new(registry: MetricsRegistry, interval: Duration) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "Process metrics unavailable on this platform");
                None
            }
        };

        registry.scoped(|| {
            metrics::describe_gauge!(RESIDENT_MEMORY, metrics::Unit::Bytes, "Resident memory size in bytes");
            metrics::describe_gauge!(VIRTUAL_MEMORY, metrics::Unit::Bytes, "Virtual memory size in bytes");
            metrics::describe_gauge!(CPU_USAGE, metrics::Unit::Percent, "CPU usage since the previous sample");
            metrics::describe_gauge!(START_TIME, metrics::Unit::Seconds, "Process start time since unix epoch");
            metrics::describe_gauge!(UPTIME, metrics::Unit::Seconds, "Seconds since the process started");
        });

        let mut collector = Self {
            registry,
            system: System::new(),
            pid,
            interval,
        };
        collector.collect();
        collector
    }

    /// Read the current process from the OS.
    pub fn sample(&mut self) -> Option<ProcessSample> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let process = self.system.process(pid)?;
        Some(ProcessSample {
            resident_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
            cpu_percent: process.cpu_usage(),
            start_time_secs: process.start_time(),
            uptime_secs: process.run_time(),
        })
    }

    /// Sample once and publish the gauges.
    pub fn collect(&mut self) {
        let Some(sample) = self.sample() else {
            return;
        };
        self.registry.scoped(|| {
            metrics::gauge!(RESIDENT_MEMORY).set(sample.resident_bytes as f64);
            metrics::gauge!(VIRTUAL_MEMORY).set(sample.virtual_bytes as f64);
            metrics::gauge!(CPU_USAGE).set(f64::from(sample.cpu_percent));
            metrics::gauge!(START_TIME).set(sample.start_time_secs as f64);
            metrics::gauge!(UPTIME).set(sample.uptime_secs as f64);
        });
    }

    /// Refresh gauges and exporter state until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Process collector starting");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.collect();
                    self.registry.run_upkeep();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Process collector received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
