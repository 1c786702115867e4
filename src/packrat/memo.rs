//! Memoization table keyed by `(rule, start position)`.

use std::{collections::HashMap, hash::Hash};

use super::cursor::Position;

/// A span of the input, `start..end` in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte of the span.
    pub start: Position,
    /// One past the last byte of the span.
    pub end: Position,
}

impl Span {
    /// The span `start..end`.
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Outcome of applying a rule at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the rule matched.
    pub matched: bool,
    /// Where the cursor stands after the application. Equal to the start
    /// position when the rule failed.
    pub end: Position,
    /// Text consumed by the application.
    pub span: Span,
}

impl MatchResult {
    pub(crate) fn new(matched: bool, start: Position, end: Position) -> Self {
        MatchResult {
            matched,
            end,
            span: Span::new(start, end),
        }
    }
}

/// State of a memo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memo {
    /// The rule body is still being evaluated at this position.
    InProgress {
        /// Set once the rule re-entered itself at this position.
        left_recursive: bool,
    },
    /// The rule's final result at this position.
    Done(MatchResult),
}

/// A memoized `(rule, position)`.
#[derive(Debug, Clone, Copy)]
pub struct MemoEntry {
    /// In progress or done.
    pub state: Memo,
    /// Number of times this `(rule, position)` was requested.
    pub hits: u32,
}

impl MemoEntry {
    fn in_progress() -> Self {
        MemoEntry {
            state: Memo::InProgress {
                left_recursive: false,
            },
            hits: 1,
        }
    }
}

/// Per-run memo table.
#[derive(Debug)]
pub struct MemoTable<R> {
    entries: HashMap<(R, Position), MemoEntry>,
}

impl<R> Default for MemoTable<R> {
    fn default() -> Self {
        MemoTable {
            entries: HashMap::new(),
        }
    }
}

impl<R: Copy + Eq + Hash> MemoTable<R> {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was memoized yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry of `rule` at `pos`, without counting a visit.
    pub fn get(&self, rule: R, pos: Position) -> Option<&MemoEntry> {
        self.entries.get(&(rule, pos))
    }

    /// Looks up an entry, counting the visit.
    pub(crate) fn visit(&mut self, rule: R, pos: Position) -> Option<&mut MemoEntry> {
        let entry = self.entries.get_mut(&(rule, pos))?;
        entry.hits = entry.hits.saturating_add(1);
        Some(entry)
    }

    /// Installs the in-progress marker for a first visit.
    pub(crate) fn begin(&mut self, rule: R, pos: Position) {
        self.entries.insert((rule, pos), MemoEntry::in_progress());
    }

    /// Replaces the entry's state with a concrete result, returning the
    /// previous state.
    pub(crate) fn finish(&mut self, rule: R, pos: Position, result: MatchResult) -> Memo {
        let entry = self
            .entries
            .entry((rule, pos))
            .or_insert_with(MemoEntry::in_progress);
        std::mem::replace(&mut entry.state, Memo::Done(result))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{MatchResult, Memo, MemoTable};

    #[test]
    fn marker_then_result() {
        let mut memo = MemoTable::new();
        assert!(memo.visit('a', 0).is_none());
        memo.begin('a', 0);
        assert_eq!(
            memo.get('a', 0).map(|e| e.state),
            Some(Memo::InProgress {
                left_recursive: false
            })
        );

        let result = MatchResult::new(true, 0, 3);
        let previous = memo.finish('a', 0, result);
        assert_eq!(
            previous,
            Memo::InProgress {
                left_recursive: false
            }
        );

        let entry = memo.visit('a', 0).unwrap();
        assert_eq!(entry.state, Memo::Done(result));
        assert_eq!(entry.hits, 2);
        assert_eq!(result.span.len(), 3);
    }

    #[test]
    fn keyed_by_rule_and_position() {
        let mut memo = MemoTable::new();
        memo.begin('a', 0);
        memo.begin('a', 1);
        memo.begin('b', 0);
        assert_eq!(memo.len(), 3);
        assert!(memo.get('b', 1).is_none());
    }
}
