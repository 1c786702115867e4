//! A small packrat parsing engine.
//!
//! A [`Grammar`] is a closed set of [`Rule`]s and one function that
//! evaluates a rule body against a [`Parser`]. The parser owns the
//! cursor, the memo table and the failure tracker of a single run, and
//! offers the PEG combinators rule bodies are written with.
//!
//! Every combinator and primitive leaves the cursor where it was when it
//! fails, so alternatives can be chained with `||` and sequences with
//! `&&` inside [`Parser::seq`]:
//!
//! ```
//! use mailgrammar::packrat::{Grammar, Parser, Rule};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Digits {
//!     Number,
//!     Root,
//! }
//!
//! impl Rule for Digits {
//!     fn name(self) -> &'static str {
//!         match self {
//!             Digits::Number => "number",
//!             Digits::Root => "root",
//!         }
//!     }
//!
//!     fn production(self) -> &'static str {
//!         match self {
//!             Digits::Number => "[0-9]+",
//!             Digits::Root => "&[1-9] number !.",
//!         }
//!     }
//!
//!     fn all() -> &'static [Self] {
//!         &[Digits::Number, Digits::Root]
//!     }
//! }
//!
//! struct NoLeadingZero;
//!
//! impl Grammar for NoLeadingZero {
//!     type Rule = Digits;
//!
//!     const ROOT: Digits = Digits::Root;
//!
//!     fn eval(p: &mut Parser<'_, Self>, rule: Digits) -> bool {
//!         match rule {
//!             Digits::Number => p.bytes_while(|b| b.is_ascii_digit()),
//!             Digits::Root => p.seq(|p| {
//!                 p.and(|p| p.byte_range(b'1', b'9')) && p.apply(Digits::Number) && p.eof()
//!             }),
//!         }
//!     }
//! }
//!
//! assert!(Parser::new(&NoLeadingZero, "1024").parse_root());
//! assert!(!Parser::new(&NoLeadingZero, "0124").parse_root());
//! assert!(!Parser::new(&NoLeadingZero, "12a").parse_root());
//! assert_eq!(Digits::from_name("number"), Some(Digits::Number));
//! ```
//!
//! Left recursion is supported: a rule that re-enters itself at the same
//! position sees a failure, and once its body has produced a seed the
//! body is re-run until the match stops growing.

mod cursor;
mod failure;
mod memo;

use std::{fmt, hash::Hash};

pub use self::{
    cursor::{Cursor, Position},
    failure::{line_column, line_text, FailureTracker},
    memo::{MatchResult, Memo, MemoEntry, MemoTable, Span},
};

/// Default bound on nested rule applications in one run.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// A production of a [`Grammar`].
pub trait Rule: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Name as written in the RFC, e.g. `"dot-atom"`.
    fn name(self) -> &'static str;

    /// The production's definition, for diagnostics.
    fn production(self) -> &'static str;

    /// Every rule of the grammar, in declaration order.
    fn all() -> &'static [Self];

    /// Looks a rule up by its [`Rule::name`].
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|rule| rule.name() == name)
    }
}

/// A set of rules and the code that recognizes each of them.
pub trait Grammar: Sized {
    /// The productions of this grammar.
    type Rule: Rule;

    /// The rule a complete input must match.
    const ROOT: Self::Rule;

    /// Evaluates the body of `rule` at the parser's current position.
    ///
    /// Called by [`Parser::apply`], never directly: the body may leave
    /// the cursor anywhere on failure, `apply` restores it.
    fn eval(p: &mut Parser<'_, Self>, rule: Self::Rule) -> bool;
}

/// Declares a rule enum together with its [`Rule`] implementation.
macro_rules! rules {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => ($rule:literal, $production:literal),)*
        }
    ) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant,)*
        }

        impl $crate::packrat::Rule for $name {
            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $rule,)*
                }
            }

            fn production(self) -> &'static str {
                match self {
                    $($name::$variant => $production,)*
                }
            }

            fn all() -> &'static [Self] {
                &[$($name::$variant,)*]
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::packrat::Rule::name(*self))
            }
        }
    };
}

pub(crate) use rules;

/// One recognition run: input, position, memo table and failure state.
///
/// A run is created per call and thrown away afterwards; nothing in it is
/// shared with other runs.
pub struct Parser<'a, G: Grammar> {
    grammar: &'a G,
    cursor: Cursor<'a>,
    memo: MemoTable<G::Rule>,
    failure: FailureTracker<G::Rule>,
    current: Option<G::Rule>,
    depth: usize,
    max_depth: usize,
    exhausted: bool,
}

impl<'a, G: Grammar> Parser<'a, G> {
    /// A fresh run of `grammar` over `input`, starting at offset 0.
    pub fn new(grammar: &'a G, input: &'a str) -> Self {
        Parser {
            grammar,
            cursor: Cursor::new(input),
            memo: MemoTable::new(),
            failure: FailureTracker::new(),
            current: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            exhausted: false,
        }
    }

    /// Bounds the number of nested rule applications. Applications past
    /// the bound fail and mark the run as exhausted.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Runs `rule` from the current position.
    ///
    /// Returns `false` if the rule failed or if the nesting bound was hit
    /// anywhere during the run. The rule decides whether the whole input
    /// must be consumed.
    pub fn parse(&mut self, rule: G::Rule) -> bool {
        let matched = self.apply(rule);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rule = rule.name(),
            matched,
            exhausted = self.exhausted,
            end = self.cursor.pos(),
            deepest_failure = ?self.failure.offset(),
            "packrat run finished"
        );
        matched && !self.exhausted
    }

    /// Runs the grammar's root rule.
    pub fn parse_root(&mut self) -> bool {
        self.parse(G::ROOT)
    }

    /// The grammar being run.
    pub fn grammar(&self) -> &'a G {
        self.grammar
    }

    /// The read position.
    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    /// The whole input.
    pub fn input(&self) -> &'a str {
        self.cursor.input()
    }

    /// The current offset.
    pub fn pos(&self) -> Position {
        self.cursor.pos()
    }

    /// The memo table of this run.
    pub fn memo(&self) -> &MemoTable<G::Rule> {
        &self.memo
    }

    /// The deepest failure of this run so far.
    pub fn failure(&self) -> &FailureTracker<G::Rule> {
        &self.failure
    }

    /// Whether the nesting bound was hit during this run.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The nesting bound.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // Rule application

    /// Applies `rule` at the current position through the memo table.
    pub fn apply(&mut self, rule: G::Rule) -> bool {
        self.apply_result(rule).matched
    }

    /// Like [`Parser::apply`], returning the full result.
    pub fn apply_result(&mut self, rule: G::Rule) -> MatchResult {
        let start = self.cursor.pos();

        if let Some(entry) = self.memo.visit(rule, start) {
            match &mut entry.state {
                Memo::InProgress { left_recursive } => {
                    *left_recursive = true;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(rule = rule.name(), pos = start, "left recursion detected");
                    self.failure.record(rule, start);
                    return MatchResult::new(false, start, start);
                }
                Memo::Done(result) => {
                    let result = *result;
                    self.cursor.restore(result.end);
                    return result;
                }
            }
        }

        if self.depth >= self.max_depth {
            self.exhausted = true;
            self.failure.record(rule, start);
            return MatchResult::new(false, start, start);
        }

        self.memo.begin(rule, start);
        let result = self.evaluate(rule, start);
        let marker = self.memo.finish(rule, start, result);

        // no seed, nothing to grow
        if result.matched
            && matches!(
                marker,
                Memo::InProgress {
                    left_recursive: true
                }
            )
        {
            return self.grow(rule, start, result);
        }
        result
    }

    fn evaluate(&mut self, rule: G::Rule, start: Position) -> MatchResult {
        self.depth += 1;
        let outer = self.current.replace(rule);
        let matched = G::eval(self, rule);
        self.current = outer;
        self.depth -= 1;

        if !matched {
            self.cursor.restore(start);
            self.failure.record(rule, start);
        }
        MatchResult::new(matched, start, self.cursor.pos())
    }

    /// Re-runs a left-recursive rule with its best match memoized until
    /// an iteration fails to extend it.
    fn grow(&mut self, rule: G::Rule, start: Position, seed: MatchResult) -> MatchResult {
        let mut best = seed;
        loop {
            self.cursor.restore(start);
            let attempt = self.evaluate(rule, start);
            if !attempt.matched || attempt.end <= best.end {
                break;
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(rule = rule.name(), from = best.end, to = attempt.end, "seed grew");
            best = attempt;
            self.memo.finish(rule, start, best);
        }
        self.cursor.restore(best.end);
        best
    }

    // Combinators

    /// Sequence: runs `body`, restoring the cursor if it fails.
    pub fn seq(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.cursor.checkpoint();
        if body(self) {
            true
        } else {
            self.cursor.restore(start);
            false
        }
    }

    /// Ordered choice over rules: the first one that matches wins.
    pub fn choice(&mut self, rules: &[G::Rule]) -> bool {
        rules.iter().any(|&rule| self.apply(rule))
    }

    /// `body?`, always succeeds.
    pub fn opt(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        self.seq(body);
        true
    }

    /// `body*`, greedy, always succeeds.
    ///
    /// An iteration that matches without consuming anything ends the loop.
    pub fn many0(&mut self, mut body: impl FnMut(&mut Self) -> bool) -> bool {
        loop {
            let before = self.cursor.pos();
            if !self.seq(&mut body) || self.cursor.pos() == before {
                return true;
            }
        }
    }

    /// `body+`, fails only if the first iteration fails.
    pub fn many1(&mut self, mut body: impl FnMut(&mut Self) -> bool) -> bool {
        if !self.seq(&mut body) {
            return false;
        }
        self.many0(body)
    }

    /// Negative lookahead `!body`, never consumes.
    pub fn not(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.cursor.checkpoint();
        let matched = body(self);
        self.cursor.restore(start);
        if matched {
            self.miss()
        } else {
            true
        }
    }

    /// Positive lookahead `&body`, never consumes.
    ///
    /// The address grammars only need `!`; other grammars may use this.
    pub fn and(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.cursor.checkpoint();
        let matched = body(self);
        self.cursor.restore(start);
        matched
    }

    /// `< body >`: runs `body` and returns the span it consumed.
    pub fn capture(&mut self, body: impl FnOnce(&mut Self) -> bool) -> Option<Span> {
        let start = self.cursor.checkpoint();
        if self.seq(body) {
            Some(Span::new(start, self.cursor.pos()))
        } else {
            None
        }
    }

    /// The text of a captured span.
    pub fn text(&self, span: Span) -> Option<&'a str> {
        self.cursor.text_between(span.start, span.end)
    }

    /// Semantic predicate `&{ .. }` over a captured span. Zero-width.
    pub fn check(&mut self, span: Span, predicate: impl FnOnce(&str) -> bool) -> bool {
        if self.text(span).is_some_and(predicate) {
            true
        } else {
            self.miss()
        }
    }

    // Primitives

    /// `.`: any single byte.
    pub fn any(&mut self) -> bool {
        self.cursor.bump().is_some() || self.miss()
    }

    /// `!.`: end of input.
    pub fn eof(&mut self) -> bool {
        self.not(|p| p.any())
    }

    /// Exactly the byte `byte`.
    pub fn byte(&mut self, byte: u8) -> bool {
        self.byte_if(|b| b == byte)
    }

    /// A byte in `lo..=hi`.
    pub fn byte_range(&mut self, lo: u8, hi: u8) -> bool {
        self.byte_if(|b| (lo..=hi).contains(&b))
    }

    /// A byte accepted by `class`.
    pub fn byte_if(&mut self, class: impl FnOnce(u8) -> bool) -> bool {
        match self.cursor.peek() {
            Some(b) if class(b) => {
                self.cursor.bump();
                true
            }
            _ => self.miss(),
        }
    }

    /// A non-empty run of bytes accepted by `class`.
    pub fn bytes_while(&mut self, class: impl Fn(u8) -> bool) -> bool {
        if !self.byte_if(&class) {
            return false;
        }
        while self.cursor.peek().is_some_and(&class) {
            self.cursor.bump();
        }
        true
    }

    /// The literal string `literal`.
    pub fn literal(&mut self, literal: &str) -> bool {
        self.cursor.eat(literal.as_bytes()) || self.miss()
    }

    /// Records a failure of the rule being evaluated at the current
    /// position and returns `false`.
    fn miss(&mut self) -> bool {
        if let Some(rule) = self.current {
            self.failure.record(rule, self.cursor.pos());
        }
        false
    }
}

impl<G: Grammar> fmt::Debug for Parser<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("cursor", &self.cursor)
            .field("memoized", &self.memo.len())
            .field("failure", &self.failure.deepest())
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
