use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Terminal events, delivered one at a time to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Polls crossterm events in a background thread.
///
/// The thread only forwards events; all state changes happen on the
/// thread that calls `next`. Call `stop` before handing the terminal to a
/// child process: it joins the thread so nothing else reads the tty.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

/// Longest single wait inside `event::poll`, which bounds how long `stop`
/// blocks.
const POLL_SLICE: Duration = Duration::from_millis(50);

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            // Initial tick so the first frame is drawn before any input
            if tx.send(AppEvent::Tick).is_err() {
                return;
            }
            let mut last_tick = Instant::now();
            while !stopped.load(Ordering::Acquire) {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO)
                    .min(POLL_SLICE);

                if event::poll(timeout).unwrap_or(false) {
                    if stopped.load(Ordering::Acquire) {
                        return;
                    }
                    if let Ok(evt) = event::read() {
                        let forwarded = match evt {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Some(AppEvent::Key(key))
                            }
                            CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = forwarded {
                            if tx.send(e).is_err() {
                                return;
                            }
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(AppEvent::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            rx,
            stop,
            handle: Some(handle),
        }
    }

    /// Get the next event (blocks until available).
    pub fn next(&self) -> Result<AppEvent> {
        Ok(self.rx.recv()?)
    }

    /// Stop polling and wait for the thread to exit. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop();
    }
}
