use minesweeper_core::Clock;
use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Everything the control thread reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Input(String),
    InputClosed,
    /// One second passed in the game with this generation.
    Tick(u64),
}

/// Ticks once per second on a background thread and posts [`Event::Tick`] to the control thread's queue.
#[derive(Debug)]
pub struct ThreadClock {
    generation: u64,
    interval: Duration,
    events: Sender<Event>,
    cancel: Option<Sender<()>>,
}

impl ThreadClock {
    pub fn new(generation: u64, events: Sender<Event>) -> Self {
        Self::with_interval(generation, events, Duration::from_secs(1))
    }

    pub fn with_interval(generation: u64, events: Sender<Event>, interval: Duration) -> Self {
        Self {
            generation,
            interval,
            events,
            cancel: None,
        }
    }
}

impl Clock for ThreadClock {
    fn start(&mut self) {
        if self.cancel.is_some() {
            log::warn!("Clock for game #{} already running", self.generation);
            return;
        }

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let events = self.events.clone();
        let generation = self.generation;
        let interval = self.interval;
        thread::spawn(move || {
            loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(Event::Tick(generation)).is_err() {
                            break;
                        }
                    }
                    // cancelled, either explicitly or by dropping the sender
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::trace!("Clock for game #{} stopped", generation);
        });
        self.cancel = Some(cancel_tx);
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl Drop for ThreadClock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Forwards stdin lines to the control thread until end of input.
pub fn spawn_input_reader(events: Sender<Event>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(Event::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    log::error!("Could not read input: {}", err);
                    break;
                }
            }
        }
        let _ = events.send(Event::InputClosed);
    });
}
