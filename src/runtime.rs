use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::trial::Direction;

/// Tick cadence of the render/poll loop, approximating a 60 Hz display
/// refresh so phase deadlines land within one frame of their target.
pub const REFRESH_INTERVAL_MS: u64 = 16;

/// What the session loop consumes. Terminal input is translated into these
/// at the source; a key outside the watched set never leaves this module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A left/right response key.
    Respond(Direction),
    /// The designated advance key (space).
    Advance,
    /// The designated escape action (esc or ctrl-c).
    Abort,
    Resize,
    Tick,
}

/// The watched-key set: arrow keys respond, space advances, esc and ctrl-c
/// abort. Anything else is dropped here.
pub fn watch_key(key: KeyEvent) -> Option<SessionEvent> {
    match key.code {
        KeyCode::Left => Some(SessionEvent::Respond(Direction::Left)),
        KeyCode::Right => Some(SessionEvent::Respond(Direction::Right)),
        KeyCode::Char(' ') => Some(SessionEvent::Advance),
        KeyCode::Esc => Some(SessionEvent::Abort),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Abort)
        }
        _ => None,
    }
}

/// A feed of session events. The binary wraps the terminal; tests push
/// events into a channel by hand.
pub trait EventSource: Send + 'static {
    /// Waits up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError>;
}

/// Terminal-backed feed: a reader thread pulls crossterm events, keeps key
/// presses that `watch_key` recognizes plus resizes, and forwards them over
/// a channel.
pub struct CrosstermEventSource {
    rx: Receiver<SessionEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let translated = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => watch_key(key),
                Ok(CtEvent::Resize(_, _)) => Some(SessionEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(ev) = translated {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How long a step blocks before giving up and ticking.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(REFRESH_INTERVAL_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-backed feed for headless tests: scripted events in, ticks on
/// timeout.
pub struct TestEventSource {
    rx: Receiver<SessionEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SessionEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the session one event at a time: buffered input first, a tick
/// once the interval passes with nothing to deliver.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn step(&self) -> SessionEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                SessionEvent::Tick
            }
        }
    }

    /// Drops whatever is already buffered, so a new trial never inherits a
    /// stale press from the previous one.
    pub fn drain(&self) {
        while self.event_source.recv_timeout(Duration::ZERO).is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn watched_keys_translate_to_domain_events() {
        assert_eq!(
            watch_key(press(KeyCode::Left)),
            Some(SessionEvent::Respond(Direction::Left))
        );
        assert_eq!(
            watch_key(press(KeyCode::Right)),
            Some(SessionEvent::Respond(Direction::Right))
        );
        assert_eq!(
            watch_key(press(KeyCode::Char(' '))),
            Some(SessionEvent::Advance)
        );
        assert_eq!(watch_key(press(KeyCode::Esc)), Some(SessionEvent::Abort));
        assert_eq!(
            watch_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(SessionEvent::Abort)
        );
    }

    #[test]
    fn unwatched_keys_are_dropped() {
        for code in [
            KeyCode::Char('x'),
            KeyCode::Char('c'), // plain c, no control
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Backspace,
            KeyCode::Enter,
        ] {
            assert_eq!(watch_key(press(code)), None, "{:?} should be dropped", code);
        }
    }

    #[test]
    fn empty_feed_yields_ticks() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        assert_eq!(runner.step(), SessionEvent::Tick);
    }

    #[test]
    fn buffered_events_arrive_before_ticks() {
        let (tx, rx) = mpsc::channel();
        tx.send(SessionEvent::Respond(Direction::Left)).unwrap();
        tx.send(SessionEvent::Resize).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(10)),
        );

        assert_eq!(runner.step(), SessionEvent::Respond(Direction::Left));
        assert_eq!(runner.step(), SessionEvent::Resize);
        assert_eq!(runner.step(), SessionEvent::Tick);
    }

    #[test]
    fn drain_discards_buffered_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(SessionEvent::Respond(Direction::Left)).unwrap();
        tx.send(SessionEvent::Advance).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        runner.drain();
        assert_eq!(runner.step(), SessionEvent::Tick);
    }
}
