//! Count-prefix accumulation and multi-key chord matching for the modal
//! dispatcher (§4.H): `3dd`, `5j`, `gg`, `ZZ`.
//!
//! This crate does not know about editor modes or what a chord *does* —
//! that's `bim-actions`'s job. It only turns a stream of [`Key`]s into
//! `(count, chord)` pairs the dispatcher can act on.

use bim_events::{Key, KeyEvent};
use smallvec::SmallVec;

/// Accumulates a leading digit-run into a repeat count, vi-style: a leading
/// `0` is itself a motion (start-of-line) and does not start a count.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountAccumulator {
    value: Option<usize>,
}

impl CountAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one digit key. Returns `true` if the digit was consumed as part
    /// of a count (caller should not also treat it as a motion).
    pub fn feed_digit(&mut self, c: char) -> bool {
        match c.to_digit(10) {
            Some(0) if self.value.is_none() => false,
            Some(d) => {
                self.value = Some(self.value.unwrap_or(0) * 10 + d as usize);
                true
            }
            None => false,
        }
    }

    pub fn take(&mut self) -> Option<usize> {
        self.value.take()
    }

    pub fn is_accumulating(&self) -> bool {
        self.value.is_some()
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}

/// A registered multi-key chord, e.g. `dd`, `gg`, `ZZ`.
pub type Chord = SmallVec<[Key; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordResult<'a> {
    /// The buffer is a strict prefix of at least one registered chord;
    /// wait for more keys.
    Pending,
    /// The buffer exactly matches a registered chord.
    Matched(&'a str),
    /// The buffer cannot match anything; `first` is the key that should be
    /// replayed as an ordinary single-key action (the rest of the buffer,
    /// if any, is re-fed by the caller).
    NoMatch,
}

pub struct ChordMatcher {
    chords: Vec<(&'static str, Chord)>,
    buffer: Chord,
}

impl ChordMatcher {
    pub fn new() -> Self {
        Self {
            chords: Vec::new(),
            buffer: SmallVec::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, keys: &[Key]) {
        self.chords.push((name, SmallVec::from_slice(keys)));
    }

    pub fn buffer(&self) -> &[Key] {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feed one key event's key (modifiers are not part of chord matching
    /// in this design — chords are plain-character sequences).
    pub fn feed(&mut self, key: Key) -> ChordResultOwned {
        self.buffer.push(key);
        let mut any_prefix = false;
        for (name, chord) in &self.chords {
            if chord.len() >= self.buffer.len() && chord[..self.buffer.len()] == self.buffer[..] {
                any_prefix = true;
                if chord.len() == self.buffer.len() {
                    let name = *name;
                    self.buffer.clear();
                    return ChordResultOwned::Matched(name);
                }
            }
        }
        if any_prefix {
            ChordResultOwned::Pending
        } else {
            let drained: Vec<Key> = self.buffer.drain(..).collect();
            ChordResultOwned::NoMatch(drained)
        }
    }
}

impl Default for ChordMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordResultOwned {
    Pending,
    Matched(&'static str),
    NoMatch(Vec<Key>),
}

/// Convenience: classify a [`KeyEvent`] as a digit suitable for count
/// accumulation (no modifiers, plain `Char`).
pub fn as_plain_digit(ev: &KeyEvent) -> Option<char> {
    match ev.key {
        Key::Char(c) if c.is_ascii_digit() && ev.mods.is_empty() => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_accumulates_multi_digit() {
        let mut acc = CountAccumulator::new();
        assert!(acc.feed_digit('3'));
        assert!(acc.feed_digit('2'));
        assert_eq!(acc.take(), Some(32));
    }

    #[test]
    fn leading_zero_is_not_a_count() {
        let mut acc = CountAccumulator::new();
        assert!(!acc.feed_digit('0'));
        assert_eq!(acc.take(), None);
    }

    #[test]
    fn chord_matches_exact_sequence() {
        let mut m = ChordMatcher::new();
        m.register("dd", &[Key::Char('d'), Key::Char('d')]);
        m.register("gg", &[Key::Char('g'), Key::Char('g')]);
        assert_eq!(m.feed(Key::Char('d')), ChordResultOwned::Pending);
        assert_eq!(m.feed(Key::Char('d')), ChordResultOwned::Matched("dd"));
    }

    #[test]
    fn chord_no_match_returns_buffered_keys() {
        let mut m = ChordMatcher::new();
        m.register("dd", &[Key::Char('d'), Key::Char('d')]);
        assert_eq!(
            m.feed(Key::Char('x')),
            ChordResultOwned::NoMatch(vec![Key::Char('x')])
        );
    }
}
