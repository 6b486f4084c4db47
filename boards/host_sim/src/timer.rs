// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! One-shot timer backed by a host thread.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use kernel::hil::time::Timer;

type Callback = Arc<dyn Fn() + Send + Sync>;

struct TimerState {
    deadline: Option<Instant>,
    callback: Option<Callback>,
    firing: bool,
    shutdown: bool,
}

struct Shared {
    state: Mutex<TimerState>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, TimerState>) -> MutexGuard<'a, TimerState> {
        self.changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Expiries run on a dedicated worker thread, one at a time.
///
/// `disarm(true)` must not be called from the expiry callback itself.
pub struct ThreadTimer {
    shared: Arc<Shared>,
}

impl ThreadTimer {
    pub fn new() -> ThreadTimer {
        let shared = Arc::new(Shared {
            state: Mutex::new(TimerState {
                deadline: None,
                callback: None,
                firing: false,
                shutdown: false,
            }),
            changed: Condvar::new(),
        });
        let worker = shared.clone();
        thread::spawn(move || Self::run(&worker));
        ThreadTimer { shared }
    }

    /// Set what runs on expiry. This is likely called in a board's `main.rs`.
    pub fn set_client<F: Fn() + Send + Sync + 'static>(&self, callback: F) {
        self.shared.lock().callback = Some(Arc::new(callback));
    }

    fn run(shared: &Shared) {
        let mut state = shared.lock();
        loop {
            if state.shutdown {
                return;
            }
            let deadline = match state.deadline {
                Some(deadline) => deadline,
                None => {
                    state = shared.wait(state);
                    continue;
                }
            };
            let now = Instant::now();
            if now < deadline {
                state = shared
                    .changed
                    .wait_timeout(state, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
                continue;
            }

            state.deadline = None;
            state.firing = true;
            let callback = state.callback.clone();
            drop(state);
            if let Some(callback) = callback {
                callback();
            }
            state = shared.lock();
            state.firing = false;
            shared.changed.notify_all();
        }
    }
}

impl Timer for ThreadTimer {
    fn arm(&self, delay_ms: u32) {
        let mut state = self.shared.lock();
        state.deadline = Some(Instant::now() + Duration::from_millis(u64::from(delay_ms)));
        self.shared.changed.notify_all();
    }

    fn disarm(&self, wait_for_callback: bool) {
        let mut state = self.shared.lock();
        state.deadline = None;
        self.shared.changed.notify_all();
        if wait_for_callback {
            while state.firing {
                state = self.shared.wait(state);
            }
        }
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        // The worker is not joined: the last reference may be dropped from
        // inside an expiry callback.
        self.shared.lock().shutdown = true;
        self.shared.changed.notify_all();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn fires_once_per_arm() {
        let timer = ThreadTimer::new();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        timer.set_client(move || {
            tx.lock().unwrap().send(()).unwrap();
        });

        timer.arm(5);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn disarm_cancels_pending_expiry() {
        let timer = ThreadTimer::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        timer.set_client(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        timer.arm(200);
        timer.disarm(true);
        thread::sleep(Duration::from_millis(300));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disarm_waits_for_running_callback() {
        let timer = Arc::new(ThreadTimer::new());
        let finished = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = mpsc::channel();
        let started_tx = Mutex::new(started_tx);
        let done = finished.clone();
        timer.set_client(move || {
            started_tx.lock().unwrap().send(()).unwrap();
            thread::sleep(Duration::from_millis(100));
            done.fetch_add(1, Ordering::SeqCst);
        });

        timer.arm(0);
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        timer.disarm(true);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
