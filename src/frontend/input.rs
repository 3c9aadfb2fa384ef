//! Keyboard input from the terminal
//!
//! A dedicated thread does the blocking `event::read()` calls and forwards
//! events over a channel; the tick thread only drains it.
//!
//! Terminals with keyboard enhancement report key releases. Classic terminals
//! only repeat presses, so a key counts as held while presses keep arriving
//! and a `KeyUp` is synthesized once they stop. A press that comes slower than
//! auto-repeat is a new tap and gets its own `KeyUp`/`KeyDown` pair.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::platform::{InputEvent, InputSource, Key};

/// A key stays held this long after its last press/repeat
pub const HOLD_WINDOW_MS: u64 = 150;
/// Longer window after the first press, covering the OS repeat delay
pub const INITIAL_HOLD_MS: u64 = 550;
/// Presses further apart than this are separate taps, not auto-repeat
pub const REPEAT_GAP_MS: u64 = 100;

/// Map a terminal key code onto a game key
pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Key::Right,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => Key::Other,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    last_seen_ms: u64,
    window_ms: u64,
}

/// Held-key bookkeeping; turns raw presses into down/up transitions
#[derive(Debug, Default)]
pub struct KeyTracker {
    held: HashMap<Key, HeldKey>,
    /// Release events are reported, so never expire keys
    releases_reported: bool,
}

impl KeyTracker {
    pub fn new(releases_reported: bool) -> Self {
        Self {
            held: HashMap::new(),
            releases_reported,
        }
    }

    /// Press or repeat; emits `KeyDown` on the transition and on every new tap
    pub fn press(&mut self, key: Key, now_ms: u64) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if let Some(held) = self.held.get_mut(&key) {
            let gap = now_ms.saturating_sub(held.last_seen_ms);
            if self.releases_reported || gap <= REPEAT_GAP_MS {
                held.last_seen_ms = now_ms;
                held.window_ms = HOLD_WINDOW_MS;
                return events;
            }
            // Released and pressed again without the terminal telling us
            events.extend(self.release(key));
        }

        self.held.insert(
            key,
            HeldKey {
                last_seen_ms: now_ms,
                window_ms: INITIAL_HOLD_MS,
            },
        );
        events.push(InputEvent::KeyDown(key));
        events
    }

    pub fn release(&mut self, key: Key) -> Option<InputEvent> {
        self.held.remove(&key).map(|_| InputEvent::KeyUp(key))
    }

    /// Synthesize `KeyUp` for keys whose presses stopped arriving
    pub fn expire(&mut self, now_ms: u64) -> Vec<InputEvent> {
        if self.releases_reported {
            return Vec::new();
        }
        let expired: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, h)| now_ms.saturating_sub(h.last_seen_ms) > h.window_ms)
            .map(|(k, _)| *k)
            .collect();
        expired.into_iter().filter_map(|k| self.release(k)).collect()
    }

    pub fn held(&self) -> HashSet<Key> {
        self.held.keys().copied().collect()
    }
}

/// `InputSource` backed by the crossterm event stream
pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    tracker: KeyTracker,
    clock: Instant,
}

impl TerminalInput {
    /// Start the reader thread
    pub fn spawn(releases_reported: bool) -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    // Receiver dropped, program exiting
                    break;
                }
            }
        });
        Self {
            rx,
            tracker: KeyTracker::new(releases_reported),
            clock: Instant::now(),
        }
    }

    fn translate(&mut self, key: KeyEvent, now_ms: u64) -> Vec<InputEvent> {
        if key.kind != KeyEventKind::Release && is_quit(&key) {
            return vec![InputEvent::Quit];
        }
        let mapped = map_key(key.code);
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.tracker.press(mapped, now_ms),
            KeyEventKind::Release => self.tracker.release(mapped).into_iter().collect(),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let now_ms = self.clock.elapsed().as_millis() as u64;
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(Event::Key(key)) => events.extend(self.translate(key, now_ms)),
                Ok(_) => {}
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("Input reader stopped");
                    events.push(InputEvent::Quit);
                    break;
                }
            }
        }
        events.extend(self.tracker.expire(now_ms));
        events
    }

    fn held_keys(&self) -> HashSet<Key> {
        self.tracker.held()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(KeyCode::Left), Key::Left);
        assert_eq!(map_key(KeyCode::Char('D')), Key::Right);
        assert_eq!(map_key(KeyCode::Char(' ')), Key::Space);
        assert_eq!(map_key(KeyCode::Esc), Key::Escape);
        assert_eq!(map_key(KeyCode::Char('X')), Key::Char('x'));
        assert_eq!(map_key(KeyCode::F(1)), Key::Other);
    }

    #[test]
    fn test_quit_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(is_quit(&ctrl_c));
        assert!(!is_quit(&plain_c));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_repeats_do_not_emit_key_down() {
        let mut t = KeyTracker::new(false);
        assert_eq!(t.press(Key::Left, 0), vec![InputEvent::KeyDown(Key::Left)]);
        assert!(t.press(Key::Left, 30).is_empty());
        assert!(t.held().contains(&Key::Left));
    }

    #[test]
    fn test_silence_synthesizes_key_up() {
        let mut t = KeyTracker::new(false);
        t.press(Key::Space, 0);
        assert!(t.expire(INITIAL_HOLD_MS).is_empty());
        assert_eq!(t.expire(INITIAL_HOLD_MS + 1), vec![InputEvent::KeyUp(Key::Space)]);
        assert!(t.held().is_empty());
    }

    #[test]
    fn test_repeat_shortens_window() {
        let mut t = KeyTracker::new(false);
        t.press(Key::Right, 0);
        t.press(Key::Right, 40);
        assert!(t.expire(40 + HOLD_WINDOW_MS).is_empty());
        assert_eq!(t.expire(41 + HOLD_WINDOW_MS), vec![InputEvent::KeyUp(Key::Right)]);
    }

    #[test]
    fn test_every_tap_fires() {
        let mut t = KeyTracker::new(false);
        let mut key_downs = 0;
        for now in (0..2000).step_by(16) {
            if now % 208 == 0 {
                key_downs += t
                    .press(Key::Space, now)
                    .iter()
                    .filter(|e| **e == InputEvent::KeyDown(Key::Space))
                    .count();
            }
            t.expire(now);
        }
        assert_eq!(key_downs, 10);
    }

    #[test]
    fn test_slow_press_is_a_new_tap() {
        let mut t = KeyTracker::new(false);
        t.press(Key::Space, 0);
        assert_eq!(
            t.press(Key::Space, REPEAT_GAP_MS + 1),
            vec![InputEvent::KeyUp(Key::Space), InputEvent::KeyDown(Key::Space)]
        );
        // Auto-repeat right after the tap stays a hold
        assert!(t.press(Key::Space, REPEAT_GAP_MS + 31).is_empty());
    }

    #[test]
    fn test_reported_releases_never_expire() {
        let mut t = KeyTracker::new(true);
        t.press(Key::Left, 0);
        assert!(t.expire(10_000).is_empty());
        assert_eq!(t.release(Key::Left), Some(InputEvent::KeyUp(Key::Left)));
        assert_eq!(t.release(Key::Left), None);
    }
}
