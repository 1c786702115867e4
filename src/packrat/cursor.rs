//! Read position over an immutable input buffer.

/// A byte offset into the input, `0 <= pos <= len`.
pub type Position = usize;

/// The input being recognized and the current read position.
///
/// The buffer itself is never mutated, only the offset moves. Reads past
/// the end return `None` rather than panicking, so end of input is just
/// another way for a primitive to fail.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: Position,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// The whole input.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current read offset.
    pub fn pos(&self) -> Position {
        self.pos
    }

    /// Length of the input in bytes.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Whether the cursor stands at the end of the input.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Captures the current offset so it can be restored later.
    pub fn checkpoint(&self) -> Position {
        self.pos
    }

    /// Resets the offset to a previous checkpoint.
    pub fn restore(&mut self, pos: Position) {
        debug_assert!(pos <= self.input.len());
        self.pos = pos;
    }

    /// Moves forward by `n` bytes, failing (and not moving) if that would
    /// run past the end.
    pub fn advance_by(&mut self, n: usize) -> bool {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.input.len() => {
                self.pos = end;
                true
            }
            _ => false,
        }
    }

    /// The byte under the cursor.
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Consumes one byte.
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Consumes `literal` if the input continues with it.
    pub fn eat(&mut self, literal: &[u8]) -> bool {
        if self.input.as_bytes()[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// The text between two offsets, `None` when out of range or when
    /// the offsets split a multi-byte character.
    pub fn text_between(&self, start: Position, end: Position) -> Option<&'a str> {
        if start > end {
            return None;
        }
        self.input.get(start..end)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Cursor;

    #[test]
    fn checkpoint_and_restore() {
        let mut cursor = Cursor::new("abc");
        let start = cursor.checkpoint();
        assert_eq!(cursor.bump(), Some(b'a'));
        assert_eq!(cursor.bump(), Some(b'b'));
        assert_eq!(cursor.pos(), 2);
        cursor.restore(start);
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.peek(), Some(b'a'));
    }

    #[test]
    fn reads_past_end_fail() {
        let mut cursor = Cursor::new("a");
        assert!(cursor.advance_by(1));
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.bump(), None);
        assert!(!cursor.advance_by(1));
        assert!(!cursor.eat(b"x"));
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn eat_literal() {
        let mut cursor = Cursor::new("\r\n x");
        assert!(!cursor.eat(b"\n"));
        assert!(cursor.eat(b"\r\n"));
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn text_between_offsets() {
        let cursor = Cursor::new("user@example.com");
        assert_eq!(cursor.text_between(5, 16), Some("example.com"));
        assert_eq!(cursor.text_between(3, 2), None);
        assert_eq!(cursor.text_between(0, 40), None);

        let cursor = Cursor::new("é");
        assert_eq!(cursor.text_between(0, 1), None);
    }
}
