//! Host name rules of [RFC1123] section 2.1, used to check the domain
//! of an address when domain validation is enabled.
//!
//! [RFC1123]: https://datatracker.ietf.org/doc/html/rfc1123

use chumsky::prelude::*;
use idna::domain_to_ascii;

/// Longest label allowed between two dots.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest host name allowed.
pub const MAX_HOSTNAME_LEN: usize = 255;

/// Decides whether the domain part of an address is acceptable.
///
/// The grammars only check that a domain is syntactically well formed;
/// a `DomainValidator` adds a policy on top. Any `Fn(&str) -> bool` is a
/// validator.
pub trait DomainValidator {
    /// Whether `domain`, as matched by the grammar, is acceptable.
    fn is_valid_domain(&self, domain: &str) -> bool;
}

impl<F> DomainValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_domain(&self, domain: &str) -> bool {
        self(domain)
    }
}

/// Host name policy: dot separated labels of letters, digits and
/// hyphens, at most 63 characters each and 255 overall, never starting
/// or ending with a hyphen.
///
/// Internationalized names are converted to their ASCII form first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hostname;

impl DomainValidator for Hostname {
    fn is_valid_domain(&self, domain: &str) -> bool {
        is_valid_hostname(domain)
    }
}

/// Checks `domain` against the host name rules.
pub fn is_valid_hostname(domain: &str) -> bool {
    if domain.is_ascii() {
        return check_ascii(domain);
    }

    domain_to_ascii(domain)
        .map(|domain| check_ascii(&domain))
        .unwrap_or(false)
}

fn check_ascii(domain: &str) -> bool {
    domain.len() <= MAX_HOSTNAME_LEN && hostname().parse(domain).is_ok()
}

// 2.1  Host Names and Numbers
// https://datatracker.ietf.org/doc/html/rfc1123#section-2.1

// <let-dig-hyp> ::= <letter> | <digit> | "-"
fn let_dig_hyp() -> impl Parser<char, char, Error = Simple<char>> {
    filter(|c: &char| c.is_ascii_alphanumeric() || *c == '-')
}

// <label> ::= <let-dig> [ [ <ldh-str> ] <let-dig> ]
//
// One to 63 characters; RFC 1123 lets the first one be a digit.
fn label() -> impl Parser<char, String, Error = Simple<char>> {
    let_dig_hyp()
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|label, span| {
            if label.starts_with('-') || label.ends_with('-') {
                Err(Simple::custom(span, "label starts or ends with a hyphen"))
            } else if label.len() > MAX_LABEL_LEN {
                Err(Simple::custom(span, "label is longer than 63 characters"))
            } else {
                Ok(label)
            }
        })
}

// <hname> ::= <label> *[ "." <label> ]
fn hostname() -> impl Parser<char, Vec<String>, Error = Simple<char>> {
    label()
        .separated_by(just('.'))
        .at_least(1)
        .then_ignore(end())
}
