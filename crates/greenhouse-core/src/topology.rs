//! Background polling of the number of active monitors.
//!
//! Only one transition matters: going from exactly one monitor to exactly
//! two, which usually means a laptop was docked again and saved windows
//! can go back where they were. The polling thread never touches window
//! state; it sends a [`TopologyEvent`] and the receiving side decides what
//! to do with it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::desktop::MonitorCounter;

/// Event produced by the topology monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyEvent {
    /// The monitor count went from one to two and positions are saved.
    MonitorsReconnected,
}

/// What a single sample means relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First sample; nothing to compare against.
    Baseline(usize),
    Unchanged,
    /// The 1 → 2 transition.
    Reconnected,
    /// Any other change in count.
    Changed { from: usize, to: usize },
}

/// Compares consecutive monitor counts.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    previous: Option<usize>,
}

impl TransitionDetector {
    /// Classifies `count` and makes it the new baseline.
    pub fn observe(&mut self, count: usize) -> Transition {
        let transition = match self.previous {
            None => Transition::Baseline(count),
            Some(1) if count == 2 => Transition::Reconnected,
            Some(prev) if prev == count => Transition::Unchanged,
            Some(prev) => Transition::Changed {
                from: prev,
                to: count,
            },
        };
        self.previous = Some(count);
        transition
    }
}

/// Handle to the running poll thread.
pub struct TopologyMonitor {
    active: Arc<AtomicBool>,
    done_rx: mpsc::Receiver<()>,
    thread: Option<thread::JoinHandle<()>>,
    stop_timeout: Duration,
}

impl TopologyMonitor {
    /// Spawns the poll loop.
    ///
    /// `gate` is consulted on every 1 → 2 transition; the event is only
    /// sent when it returns `true` (i.e. there is something to restore).
    /// The loop exits when stopped, when `tx` is disconnected, or when the
    /// counter fails.
    pub fn start<C, G>(
        counter: C,
        interval: Duration,
        stop_timeout: Duration,
        gate: G,
        tx: Sender<TopologyEvent>,
    ) -> Self
    where
        C: MonitorCounter,
        G: Fn() -> bool + Send + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let active_flag = active.clone();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let thread = thread::spawn(move || {
            // Dropped on exit, which wakes up `stop`.
            let _done = done_tx;
            poll_loop(&counter, interval, &active_flag, &gate, &tx);
        });
        log::info!("monitor topology polling started ({}ms)", interval.as_millis());

        Self {
            active,
            done_rx,
            thread: Some(thread),
            stop_timeout,
        }
    }

    /// Returns whether the poll thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Asks the loop to stop and waits up to the configured timeout.
    ///
    /// Returns `false` if the thread did not exit in time; it is then
    /// left detached and will exit after its current sleep.
    pub fn stop(&mut self) -> bool {
        let Some(thread) = self.thread.take() else {
            return true;
        };
        self.active.store(false, Ordering::Relaxed);

        match self.done_rx.recv_timeout(self.stop_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = thread.join();
                log::info!("monitor topology polling stopped");
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("monitor topology thread did not stop in time, detaching");
                false
            }
        }
    }
}

impl Drop for TopologyMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop<C: MonitorCounter>(
    counter: &C,
    interval: Duration,
    active: &AtomicBool,
    gate: &dyn Fn() -> bool,
    tx: &Sender<TopologyEvent>,
) {
    let mut detector = TransitionDetector::default();

    while active.load(Ordering::Relaxed) {
        let count = match counter.monitor_count() {
            Ok(count) => count,
            Err(e) => {
                log::error!("monitor count query failed, topology polling exits: {e}");
                return;
            }
        };

        match detector.observe(count) {
            Transition::Baseline(count) => log::debug!("monitor count baseline: {count}"),
            Transition::Unchanged => {}
            Transition::Changed { from, to } => {
                log::info!("monitor count changed: {from} -> {to}");
            }
            Transition::Reconnected => {
                log::info!("second monitor connected");
                if gate() {
                    if tx.send(TopologyEvent::MonitorsReconnected).is_err() {
                        return;
                    }
                } else {
                    log::debug!("no saved positions, ignoring reconnect");
                }
            }
        }

        thread::sleep(interval);
    }
}
