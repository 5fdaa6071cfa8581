use std::slice;

use sessview_sessions::{Role, Turn};

/// Offset/limit filter over 1-based user-turn numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    /// `0` means no upper bound.
    pub limit: usize,
}

impl Window {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Whether a turn carrying `turn_number` is displayed.
    pub fn contains(&self, turn_number: usize) -> bool {
        let above = self.offset == 0 || turn_number > self.offset;
        let below = self.limit == 0 || turn_number <= self.offset + self.limit;
        above && below
    }
}

/// Pairs each turn with its user-turn number.
///
/// A `user` turn increments the counter before it is yielded; every other
/// role reuses the most recent number (0 before the first user turn).
pub struct Numbered<'a> {
    turns: slice::Iter<'a, Turn>,
    current: usize,
}

impl<'a> Iterator for Numbered<'a> {
    type Item = (usize, &'a Turn);

    fn next(&mut self) -> Option<Self::Item> {
        let turn = self.turns.next()?;
        if turn.role == Role::User {
            self.current += 1;
        }
        Some((self.current, turn))
    }
}

pub fn numbered(turns: &[Turn]) -> Numbered<'_> {
    Numbered {
        turns: turns.iter(),
        current: 0,
    }
}
