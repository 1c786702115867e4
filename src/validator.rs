//! Reusable validation policy and its entry points.

use crate::{
    packrat::{Grammar, Parser, Rule, DEFAULT_MAX_DEPTH},
    parsers::{DomainValidator, Hostname, Rfc2822, Rfc822},
    Diagnostic, ParseError,
};

/// Which address grammar to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Syntax {
    /// RFC 822.
    Legacy,
    /// RFC 2822, obsolete forms included.
    #[default]
    Modern,
}

/// What the whole input has to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Start {
    /// A mailbox or a group.
    #[default]
    Address,
    /// A bare `local-part@domain`.
    AddrSpec,
    /// A comma separated list of addresses. Only the modern grammar has
    /// one.
    AddressList,
}

impl Start {
    /// The root rule of this start, by name.
    pub fn rule_name(self) -> &'static str {
        match self {
            Start::Address => "root",
            Start::AddrSpec => "only_addr_spec",
            Start::AddressList => "only_address_list",
        }
    }
}

/// Address validation policy.
///
/// Built once and reused: every call runs a fresh parser over the input.
///
/// ```
/// use mailgrammar::Validator;
///
/// let strict = Validator::modern().addr_spec_only(true).validate_domain(true);
/// assert!(strict.validate("evan@foo.com"));
/// assert!(!strict.validate("evan@foo-.com"));
/// assert!(!strict.validate("Evan <evan@foo.com>"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Validator {
    syntax: Syntax,
    start: Start,
    validate_domain: bool,
    max_depth: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Validator {
            syntax: Syntax::Modern,
            start: Start::Address,
            validate_domain: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Validator {
    /// Recognizes RFC 2822 addresses.
    pub fn modern() -> Self {
        Self::default()
    }

    /// Recognizes RFC 822 addresses.
    pub fn legacy() -> Self {
        Validator {
            syntax: Syntax::Legacy,
            ..Self::default()
        }
    }

    /// Only accepts a bare `local-part@domain`.
    pub fn addr_spec_only(mut self, addr_spec_only: bool) -> Self {
        self.start = if addr_spec_only {
            Start::AddrSpec
        } else {
            Start::Address
        };
        self
    }

    /// Sets what the whole input has to be.
    pub fn start(mut self, start: Start) -> Self {
        self.start = start;
        self
    }

    /// Also checks domains against the host name rules.
    pub fn validate_domain(mut self, validate_domain: bool) -> Self {
        self.validate_domain = validate_domain;
        self
    }

    /// Bounds the nesting of rule applications, `256` by default.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether the whole of `input` matches.
    pub fn validate(&self, input: &str) -> bool {
        self.check(input).is_ok()
    }

    /// Like [`Validator::validate`], explaining a rejection.
    pub fn check(&self, input: &str) -> Result<(), ParseError> {
        self.check_rule(self.start.rule_name(), input)
    }

    /// Whether the whole of `input` matches the rule called `rule`, e.g.
    /// `"dot-atom"`. Unknown names never match.
    pub fn validate_rule(&self, rule: &str, input: &str) -> bool {
        self.check_rule(rule, input).is_ok()
    }

    /// Like [`Validator::validate_rule`], explaining a rejection.
    pub fn check_rule(&self, rule: &str, input: &str) -> Result<(), ParseError> {
        let domains: Option<&dyn DomainValidator> = if self.validate_domain {
            Some(&Hostname)
        } else {
            None
        };

        let result = match self.syntax {
            Syntax::Modern => {
                let grammar = domains.map_or_else(Rfc2822::new, Rfc2822::with_domain_validator);
                self.run(&grammar, rule, input)
            }
            Syntax::Legacy => {
                let grammar = domains.map_or_else(Rfc822::new, Rfc822::with_domain_validator);
                self.run(&grammar, rule, input)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            syntax = ?self.syntax,
            rule,
            validate_domain = self.validate_domain,
            accepted = result.is_ok(),
            "validated input"
        );
        result
    }

    fn run<G: Grammar>(&self, grammar: &G, rule: &str, input: &str) -> Result<(), ParseError> {
        let rule =
            G::Rule::from_name(rule).ok_or_else(|| ParseError::UnknownRule(rule.to_owned()))?;
        let mut parser = Parser::new(grammar, input).with_max_depth(self.max_depth);

        let matched = parser.parse(rule);
        let end = parser.pos();
        if matched && parser.eof() {
            return Ok(());
        }
        if parser.is_exhausted() {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }

        // a match that stops short of the end fails on the first leftover byte
        let (failed, offset) = match parser.failure().deepest() {
            Some((failed, offset)) if !matched || offset >= end => (failed, offset),
            _ => (rule, end),
        };
        Err(ParseError::Syntax(Diagnostic::new(
            input,
            offset,
            failed.name(),
            failed.production(),
        )))
    }
}
