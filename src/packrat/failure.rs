//! Deepest-failure bookkeeping, used only for diagnostics.

use super::cursor::Position;

/// Remembers the furthest offset at which a rule failed during a run.
#[derive(Debug, Clone, Copy)]
pub struct FailureTracker<R> {
    deepest: Option<(R, Position)>,
}

impl<R> Default for FailureTracker<R> {
    fn default() -> Self {
        FailureTracker { deepest: None }
    }
}

impl<R: Copy> FailureTracker<R> {
    /// A tracker with no failure recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure of `rule` at `pos` if it is at least as deep as
    /// anything seen so far.
    pub fn record(&mut self, rule: R, pos: Position) {
        match self.deepest {
            Some((_, offset)) if pos < offset => {}
            _ => self.deepest = Some((rule, pos)),
        }
    }

    /// The rule that failed deepest.
    pub fn rule(&self) -> Option<R> {
        self.deepest.map(|(rule, _)| rule)
    }

    /// The offset of the deepest failure.
    pub fn offset(&self) -> Option<Position> {
        self.deepest.map(|(_, offset)| offset)
    }

    /// Both of the above.
    pub fn deepest(&self) -> Option<(R, Position)> {
        self.deepest
    }
}

/// 1-based line and column of a byte offset. The column counts
/// characters, not bytes.
pub fn line_column(input: &str, offset: Position) -> (usize, usize) {
    let mut offset = offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// The text of the 1-based line `line`, without its terminator.
pub fn line_text(input: &str, line: usize) -> &str {
    input
        .split('\n')
        .nth(line.saturating_sub(1))
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or("")
}
