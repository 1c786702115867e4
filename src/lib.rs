//! Mailgrammar recognizes email addresses with the grammars of [RFC 822]
//! and [RFC 2822], obsolete syntax included.
//!
//! Both grammars are written as parsing expression grammars and run by a
//! small packrat engine (see [`packrat`]), so any input is recognized in
//! time linear in its length, and deeply nested comments are cut off by a
//! configurable depth bound instead of overflowing the stack.
//!
//! ## Usage
//!
//! The free functions cover the common cases:
//!
//! ```rust
//! assert!(mailgrammar::validate("\"Fred Bloggs\"@example.com", false));
//! assert!(mailgrammar::validate_addr("simple@example.com", false));
//! assert!(!mailgrammar::validate("two@@signs.com", false));
//!
//! // host name rules only apply when asked for
//! assert!(mailgrammar::validate("evan@foo-.com", false));
//! assert!(!mailgrammar::validate("evan@foo-.com", true));
//!
//! assert!(mailgrammar::validate_legacy(
//!     "A Group:Chris Jones <c@a.test>,joe@where.test,John <jdoe@one.test>;",
//!     false,
//! ));
//! ```
//!
//! A [`Validator`] holds a reusable policy and can explain why an input
//! was rejected:
//!
//! ```rust
//! use mailgrammar::Validator;
//!
//! let validator = Validator::modern().addr_spec_only(true);
//! let error = validator.check("two@@signs.com").unwrap_err();
//! let diagnostic = error.diagnostic().unwrap();
//! assert_eq!(diagnostic.column(), 5);
//! println!("{error}\n{}", diagnostic.caret());
//! ```
//!
//! ## Features
//!
//! * **serde**: `Serialize` and `Deserialize` for [`Validator`]
//! * **tracing**: log every validation with `tracing`
//!
//! [RFC 822]: https://datatracker.ietf.org/doc/html/rfc822
//! [RFC 2822]: https://datatracker.ietf.org/doc/html/rfc2822

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    missing_debug_implementations,
    unstable_features,
    unused_import_braces,
    rust_2018_idioms
)]

mod error;
pub mod packrat;
pub mod parsers;
mod validator;

pub use crate::{
    error::{Diagnostic, ParseError},
    parsers::{DomainValidator, Hostname},
    validator::{Start, Syntax, Validator},
};

/// Validates a mailbox or group with the RFC 2822 grammar.
///
/// With `check_domain`, domains must also follow the host name rules.
pub fn validate(address: &str, check_domain: bool) -> bool {
    Validator::modern()
        .validate_domain(check_domain)
        .validate(address)
}

/// Validates a bare `local-part@domain` with the RFC 2822 grammar.
pub fn validate_addr(address: &str, check_domain: bool) -> bool {
    Validator::modern()
        .addr_spec_only(true)
        .validate_domain(check_domain)
        .validate(address)
}

/// Validates a comma separated list of addresses with the RFC 2822
/// grammar.
pub fn validate_list(addresses: &str, check_domain: bool) -> bool {
    Validator::modern()
        .start(Start::AddressList)
        .validate_domain(check_domain)
        .validate(addresses)
}

/// Validates a mailbox or group with the RFC 822 grammar.
pub fn validate_legacy(address: &str, check_domain: bool) -> bool {
    Validator::legacy()
        .validate_domain(check_domain)
        .validate(address)
}

/// Validates a bare `local-part@domain` with the RFC 822 grammar.
pub fn validate_legacy_addr(address: &str, check_domain: bool) -> bool {
    Validator::legacy()
        .addr_spec_only(true)
        .validate_domain(check_domain)
        .validate(address)
}

/// Checks a domain against the RFC 1123 host name rules.
pub fn validate_domain(domain: &str) -> bool {
    parsers::is_valid_hostname(domain)
}
