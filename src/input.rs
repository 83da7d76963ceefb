//! Key model and the key-to-action mapping
//!
//! Input reaches the game as a blocking sequence of discrete key events
//! through the [`KeySource`] trait. During play, a static table maps each
//! recognized key to exactly one grid operation or meta action; anything
//! else maps to no action at all (not an error).
//!
//! The key surface is the platform's original one: rows scroll with a-d,
//! columns with 1-4, and the shifted variants reverse the direction. The
//! shifted digit row includes the international variants `"` (for 2) and
//! `£` (for 3) that some keyboards produce.

use crate::grid::{Direction, RotateOp};
use std::collections::HashMap;
use std::collections::VecDeque;

/// A single decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Left,
    Right,
}

/// What a key press means while a level is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Rotate(RotateOp),
    /// Abandon the level and return to the menu
    GiveUp,
    /// Leave the program from any state
    Exit,
}

lazy_static! {
    static ref KEY_ACTIONS: HashMap<Key, Action> = {
        use Direction::{Backward, Forward};
        let mut m = HashMap::new();
        // rows, forward
        m.insert(Key::Char('a'), Action::Rotate(RotateOp::Row(0, Forward)));
        m.insert(Key::Char('b'), Action::Rotate(RotateOp::Row(1, Forward)));
        m.insert(Key::Char('c'), Action::Rotate(RotateOp::Row(2, Forward)));
        m.insert(Key::Char('d'), Action::Rotate(RotateOp::Row(3, Forward)));
        // rows, reversed with shift
        m.insert(Key::Char('A'), Action::Rotate(RotateOp::Row(0, Backward)));
        m.insert(Key::Char('B'), Action::Rotate(RotateOp::Row(1, Backward)));
        m.insert(Key::Char('C'), Action::Rotate(RotateOp::Row(2, Backward)));
        m.insert(Key::Char('D'), Action::Rotate(RotateOp::Row(3, Backward)));
        // columns, forward
        m.insert(Key::Char('1'), Action::Rotate(RotateOp::Column(0, Forward)));
        m.insert(Key::Char('2'), Action::Rotate(RotateOp::Column(1, Forward)));
        m.insert(Key::Char('3'), Action::Rotate(RotateOp::Column(2, Forward)));
        m.insert(Key::Char('4'), Action::Rotate(RotateOp::Column(3, Forward)));
        // columns, reversed with shift
        m.insert(Key::Char('!'), Action::Rotate(RotateOp::Column(0, Backward)));
        m.insert(Key::Char('@'), Action::Rotate(RotateOp::Column(1, Backward)));
        m.insert(Key::Char('"'), Action::Rotate(RotateOp::Column(1, Backward)));
        m.insert(Key::Char('#'), Action::Rotate(RotateOp::Column(2, Backward)));
        m.insert(Key::Char('£'), Action::Rotate(RotateOp::Column(2, Backward)));
        m.insert(Key::Char('$'), Action::Rotate(RotateOp::Column(3, Backward)));
        // meta
        m.insert(Key::Char('q'), Action::GiveUp);
        m.insert(Key::Escape, Action::Exit);
        m
    };
}

/// Resolve a key to its in-game action, if it has one.
pub fn action_for(key: Key) -> Option<Action> {
    KEY_ACTIONS.get(&key).copied()
}

/// The unshifted key that performs `op`, for prompts and tests.
pub fn key_for_rotation(op: RotateOp) -> Key {
    KEY_ACTIONS
        .iter()
        .find_map(|(key, action)| match (key, action) {
            // prefer the canonical ASCII binding over international variants
            (Key::Char(c), Action::Rotate(bound)) if *bound == op && *c != '"' && *c != '£' => {
                Some(*key)
            }
            _ => None,
        })
        .expect("every rotation has a key binding")
}

/// A blocking, restartable source of key events.
///
/// Implementations decide where keys come from (a raw-mode terminal, a
/// scripted queue); consumers only ever see one event at a time.
pub trait KeySource {
    fn next_key(&mut self) -> Result<Key, String>;
}

/// Key source fed from a fixed script, for tests and piped playback.
pub struct ScriptedKeys {
    queue: VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        ScriptedKeys {
            queue: keys.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<Key, String> {
        self.queue
            .pop_front()
            .ok_or_else(|| "key script exhausted".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::{Backward, Forward};

    #[test]
    fn every_lane_and_direction_is_reachable() {
        for n in 0..4 {
            let row_fwd = action_for(Key::Char((b'a' + n) as char));
            assert_eq!(
                row_fwd,
                Some(Action::Rotate(RotateOp::Row(n as usize, Forward)))
            );

            let col_fwd = action_for(Key::Char((b'1' + n) as char));
            assert_eq!(
                col_fwd,
                Some(Action::Rotate(RotateOp::Column(n as usize, Forward)))
            );
        }
        assert_eq!(
            action_for(Key::Char('C')),
            Some(Action::Rotate(RotateOp::Row(2, Backward)))
        );
        assert_eq!(
            action_for(Key::Char('$')),
            Some(Action::Rotate(RotateOp::Column(3, Backward)))
        );
    }

    #[test]
    fn international_shifted_digits_are_accepted() {
        assert_eq!(action_for(Key::Char('"')), action_for(Key::Char('@')));
        assert_eq!(action_for(Key::Char('£')), action_for(Key::Char('#')));
    }

    #[test]
    fn unrecognized_keys_are_no_ops() {
        assert_eq!(action_for(Key::Char('z')), None);
        assert_eq!(action_for(Key::Enter), None);
        assert_eq!(action_for(Key::Left), None);
    }

    #[test]
    fn meta_keys_map_to_meta_actions() {
        assert_eq!(action_for(Key::Char('q')), Some(Action::GiveUp));
        assert_eq!(action_for(Key::Escape), Some(Action::Exit));
    }

    #[test]
    fn key_for_rotation_round_trips() {
        for n in 0..4 {
            for dir in [Forward, Backward] {
                for op in [RotateOp::Row(n, dir), RotateOp::Column(n, dir)] {
                    let key = key_for_rotation(op);
                    assert_eq!(action_for(key), Some(Action::Rotate(op)));
                }
            }
        }
    }

    #[test]
    fn scripted_keys_drain_in_order_then_error() {
        let mut keys = ScriptedKeys::new([Key::Char('1'), Key::Enter]);
        assert_eq!(keys.next_key().unwrap(), Key::Char('1'));
        assert_eq!(keys.next_key().unwrap(), Key::Enter);
        assert!(keys.next_key().is_err());
    }
}
