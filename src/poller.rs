//! Polling loop around the scrape cycle.
//!
//! Runs cycles on a fixed interval until shutdown is requested. Cancellation
//! is cooperative and observed only between cycles: an in-flight cycle
//! always completes (or fails) before shutdown. There is no per-fetch
//! timeout, so a hung endpoint stalls the poller; that limitation is
//! accepted rather than papered over with retries the transport does not
//! promise.

use crate::cycle::ScrapeCycle;
use crate::dedup::SeenSet;
use crate::report::ReportSink;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::info;

/// Drives [`ScrapeCycle`] on a fixed interval and feeds a [`ReportSink`].
pub struct Poller<S: ReportSink> {
    cycle: ScrapeCycle,
    seen: SeenSet,
    interval: Duration,
    sink: S,
}

impl<S: ReportSink> Poller<S> {
    pub fn new(cycle: ScrapeCycle, interval: Duration, sink: S) -> Self {
        Self {
            cycle,
            seen: SeenSet::new(),
            interval,
            sink,
        }
    }

    /// Run until a Ctrl-C is received.
    ///
    /// The signal listener is spawned before the first cycle starts, so a
    /// Ctrl-C that lands mid-cycle is recorded and honored at the next
    /// cycle boundary rather than killing the process outright.
    pub async fn run(&mut self) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(true);
            }
        });
        self.run_until(shutdown_rx).await;
    }

    /// Run until the shutdown channel signals.
    ///
    /// Empty batches are not published; the operator only sees output when
    /// something new appeared. A signal that arrives while a cycle is in
    /// flight is observed right after that cycle; one that arrives while
    /// sleeping wakes the poller immediately. Either way the shutdown
    /// notice distinguishes a clean stop from a crash.
    pub async fn run_until(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval = ?self.interval, "Poller started");
        loop {
            self.run_once().await;
            // Cycle boundary: honor a signal that arrived mid-cycle.
            if *shutdown.borrow() {
                info!("Shutdown signal received; stopping poller");
                break;
            }
            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("Shutdown signal received; stopping poller");
                    break;
                }
            }
        }
        info!(seen = self.seen.len(), "Poller stopped");
    }

    /// Run a bounded number of cycles, without signal handling.
    ///
    /// Keeps shutdown semantics testable without real wall-clock waits:
    /// tests use a short interval instead of mocking time.
    pub async fn run_cycles(&mut self, cycles: usize) {
        info!(cycles, interval = ?self.interval, "Poller started for bounded run");
        for cycle in 0..cycles {
            self.run_once().await;
            if cycle + 1 < cycles {
                sleep(self.interval).await;
            }
        }
        info!(seen = self.seen.len(), "Bounded run complete");
    }

    async fn run_once(&mut self) {
        let batch = self.cycle.run(&mut self.seen).await;
        if !batch.is_empty() {
            self.sink.publish(&batch);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }
}
