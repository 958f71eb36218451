//! Prompt input state: edit buffer, session history with a browse cursor,
//! and prefix completion over the vocabulary.

use crate::vocabulary::{SubVerb, Verb, Vocabulary};

#[derive(Debug, Clone, Default)]
pub struct PromptInput {
    buffer: String,
    /// Most recent first.
    history: Vec<String>,
    /// `None` while editing live, otherwise an index into `history`.
    cursor: Option<usize>,
    disabled: bool,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer from a keystroke. Browsing position is kept, so the
    /// next browse step continues from the loaded entry.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The cursor as a signed index, `-1` meaning live edit.
    pub fn cursor_index(&self) -> isize {
        self.cursor.map_or(-1, |idx| idx as isize)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Take the buffer as a command line. Blank buffers and disabled input
    /// are rejected and leave all state untouched.
    pub fn submit(&mut self) -> Option<String> {
        if self.disabled || self.buffer.trim().is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        self.history.insert(0, line.clone());
        self.cursor = None;
        Some(line)
    }

    /// Step towards older entries, stopping at the oldest.
    pub fn browse_older(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.cursor {
            None => 0,
            Some(idx) => (idx + 1).min(self.history.len() - 1),
        };
        self.cursor = Some(next);
        self.buffer = self.history[next].clone();
    }

    /// Step towards newer entries. Leaving the newest entry returns to live
    /// edit with an empty buffer.
    pub fn browse_newer(&mut self) {
        match self.cursor {
            None | Some(0) => {
                self.cursor = None;
                self.buffer.clear();
            }
            Some(idx) => {
                self.cursor = Some(idx - 1);
                self.buffer = self.history[idx - 1].clone();
            }
        }
    }

    /// Tab completion. Returns whether the buffer changed.
    pub fn complete(&mut self, vocab: &Vocabulary) -> bool {
        if self.disabled {
            return false;
        }
        match complete(&self.buffer, vocab) {
            Some(completed) => {
                self.buffer = completed;
                true
            }
            None => false,
        }
    }
}

/// Completion for a raw buffer, or `None` when nothing applies.
///
/// The first verb (declared order) that extends the lowercased buffer wins.
/// Otherwise `<ns> ` completes to the first sub-verb, and `<ns> <partial>`
/// (exactly one space) to the first sub-verb extending the partial. Exact
/// matches do not complete.
pub fn complete(buffer: &str, vocab: &Vocabulary) -> Option<String> {
    let lower = buffer.to_lowercase();

    if let Some(verb) = Verb::ALL
        .into_iter()
        .map(|verb| vocab.verb_name(verb))
        .find(|name| name.starts_with(&lower) && *name != lower)
    {
        return Some(verb.to_string());
    }

    let partial = lower
        .strip_prefix(vocab.namespace())
        .and_then(|rest| rest.strip_prefix(' '))?;
    if partial.contains(' ') {
        return None;
    }
    let sub = if partial.is_empty() {
        SubVerb::ALL[0]
    } else {
        SubVerb::ALL
            .into_iter()
            .find(|sub| sub.name().starts_with(partial) && sub.name() != partial)?
    };
    Some(vocab.command_for(sub))
}
