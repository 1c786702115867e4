//! Error type for the diagnostic path

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

use crate::packrat::{line_column, line_text, Position};

/// Where and why recognition stopped: the deepest failure of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    line: usize,
    column: usize,
    offset: Position,
    rule: &'static str,
    production: &'static str,
    found: Option<char>,
    line_text: String,
}

impl Diagnostic {
    pub(crate) fn new(
        input: &str,
        offset: Position,
        rule: &'static str,
        production: &'static str,
    ) -> Self {
        let (line, column) = line_column(input, offset);
        let mut boundary = offset.min(input.len());
        while !input.is_char_boundary(boundary) {
            boundary -= 1;
        }

        Diagnostic {
            line,
            column,
            offset,
            rule,
            production,
            found: input[boundary..].chars().next(),
            line_text: line_text(input, line).to_owned(),
        }
    }

    /// 1-based line of the failure
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the failure, in characters
    pub fn column(&self) -> usize {
        self.column
    }

    /// Byte offset of the failure
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Name of the rule that failed deepest
    pub fn rule(&self) -> &'static str {
        self.rule
    }

    /// Definition of the failed rule
    pub fn production(&self) -> &'static str {
        self.production
    }

    /// The character at the failure, `None` at end of input
    pub fn found(&self) -> Option<char> {
        self.found
    }

    /// The input line containing the failure
    pub fn line_text(&self) -> &str {
        &self.line_text
    }

    /// The offending line with a `^` under the failing column.
    ///
    /// ```text
    /// two@@signs.com
    ///     ^
    /// ```
    pub fn caret(&self) -> String {
        format!(
            "{}\n{}^",
            self.line_text,
            " ".repeat(self.column.saturating_sub(1))
        )
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "@{}:{} failed rule '{}', got ",
            self.line, self.column, self.rule
        )?;
        match self.found {
            Some(c) => write!(f, "'{}'", c.escape_debug()),
            None => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Errors returned by [`Validator::check`](crate::Validator::check)
pub enum ParseError {
    /// The input does not match the grammar
    Syntax(Diagnostic),
    /// Rule applications nested deeper than the configured limit
    TooDeep {
        /// The configured limit
        limit: usize,
    },
    /// The grammar has no rule by that name
    UnknownRule(String),
}

impl ParseError {
    /// The diagnostic of a syntax error
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ParseError::Syntax(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ParseError::Syntax(diagnostic) => Display::fmt(diagnostic, f),
            ParseError::TooDeep { limit } => {
                write!(f, "nesting deeper than {limit} rule applications")
            }
            ParseError::UnknownRule(name) => write!(f, "unknown rule '{name}'"),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Diagnostic, ParseError};

    #[test]
    fn display_and_caret() {
        let diagnostic = Diagnostic::new("two@@signs.com", 4, "domain", "dot-atom");
        assert_eq!(diagnostic.line(), 1);
        assert_eq!(diagnostic.column(), 5);
        assert_eq!(diagnostic.found(), Some('@'));
        assert_eq!(
            diagnostic.to_string(),
            "@1:5 failed rule 'domain', got '@'"
        );
        assert_eq!(diagnostic.caret(), "two@@signs.com\n    ^");
    }

    #[test]
    fn end_of_input_on_second_line() {
        let input = "a@b\r\n (c";
        let diagnostic = Diagnostic::new(input, input.len(), "comment", "\"(\" ...");
        assert_eq!((diagnostic.line(), diagnostic.column()), (2, 4));
        assert_eq!(diagnostic.found(), None);
        assert_eq!(diagnostic.line_text(), " (c");
        assert_eq!(
            ParseError::Syntax(diagnostic).to_string(),
            "@2:4 failed rule 'comment', got end of input"
        );
    }

    #[test]
    fn other_errors() {
        assert_eq!(
            ParseError::TooDeep { limit: 8 }.to_string(),
            "nesting deeper than 8 rule applications"
        );
        assert_eq!(
            ParseError::UnknownRule("nope".to_owned()).to_string(),
            "unknown rule 'nope'"
        );
        assert_eq!(ParseError::TooDeep { limit: 8 }.diagnostic(), None);
    }
}
