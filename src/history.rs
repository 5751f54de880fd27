//! Shell-style command history with bidirectional recall.
//!
//! The buffer is `no_std` friendly (it only needs `alloc`). It never touches
//! a terminal itself: recall operations edit the caller's input line in
//! place, so the same logic drives the terminal front end and the tests.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

/// Append-only list of submitted commands plus a recall cursor.
///
/// `cursor == len()` means "not recalling": the input line holds whatever
/// the user is typing. While recalling, `scratch` keeps that in-progress
/// text so it can be restored when the user walks back down past the
/// newest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: usize,
    scratch: String,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted command and return to the live edit position.
    pub fn append(&mut self, command: &str) {
        self.entries.push(String::from(command));
        self.cursor = self.entries.len();
        self.scratch.clear();
    }

    /// Step to the previous (older) entry, writing it into `input`.
    ///
    /// Returns `false` and leaves `input` untouched when already at the
    /// oldest entry.
    pub fn recall_previous(&mut self, input: &mut String) -> bool {
        if self.cursor == 0 {
            return false;
        }
        if self.cursor == self.entries.len() {
            self.scratch.clear();
            self.scratch.push_str(input);
        }
        self.cursor -= 1;
        input.clear();
        input.push_str(&self.entries[self.cursor]);
        true
    }

    /// Step to the next (newer) entry, or back to the scratch text once the
    /// cursor reaches the live edit position.
    ///
    /// Returns `false` and leaves `input` untouched when not recalling.
    pub fn recall_next(&mut self, input: &mut String) -> bool {
        if self.cursor >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        input.clear();
        if self.cursor == self.entries.len() {
            input.push_str(&self.scratch);
        } else {
            input.push_str(&self.entries[self.cursor]);
        }
        true
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while an older entry is shown in place of the live input.
    pub fn is_recalling(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn scratch(&self) -> &str {
        &self.scratch
    }
}
