/// Periodic one-second ticker driving a session's elapsed time.
///
/// Implementations must deliver ticks back on the control thread (the session is not synchronized). `stop` may be
/// called more than once and must be a no-op after the first call.
pub trait Clock {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Creates the clock for each new session. `generation` identifies the session so stale ticks can be told apart.
pub trait ClockFactory {
    fn create(&mut self, generation: u64) -> Box<dyn Clock>;
}

impl<F> ClockFactory for F
where
    F: FnMut(u64) -> Box<dyn Clock>,
{
    fn create(&mut self, generation: u64) -> Box<dyn Clock> {
        self(generation)
    }
}

/// Clock that never ticks; elapsed time only moves when [`crate::GameSession::tick`] is called by hand.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManualClock;

impl Clock for ManualClock {
    fn start(&mut self) {}

    fn stop(&mut self) {}
}
