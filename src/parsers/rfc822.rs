//! Recognizer for the mailbox grammar of [RFC822]: Standard for the
//! Format of ARPA Internet Text Messages.
//!
//! The lexical tokens of section 3.3 are matched as runs of bytes rather
//! than one character at a time. Comments may appear between the tokens
//! of a structured field (`ocms`); white space only where a production
//! asks for it.
//!
//! [RFC822]: https://datatracker.ietf.org/doc/html/rfc822

use super::rfc1123::DomainValidator;
use crate::packrat::{rules, Grammar, Parser};

const HTAB: u8 = 0x09;
const LF: u8 = 0x0A;
const CR: u8 = 0x0D;
const SPACE: u8 = b' ';

rules! {
    /// Productions of the RFC 822 mailbox grammar.
    pub enum Rule {
        Htab => ("HTAB", "/\\x09/"),
        Lf => ("LF", "/\\x0A/"),
        Cr => ("CR", "/\\x0D/"),
        Space => ("SPACE", "\" \""),
        Hyphen => ("-", "SPACE*"),
        At => ("AT", "\"@\""),
        LwspChar => ("LWSP_char", "(SPACE | HTAB)"),
        Char => ("CHAR", "/[\\x00-\\x7f]/"),
        Ctl => ("CTL", "/[\\x00-\\x1f\\x7f]/"),
        Special => ("special", "/[\\]()<>@,;:\\\\\".\\[]/"),
        Crlf => ("CRLF", "CR LF"),
        LinearWhiteSpace => ("linear_white_space", "(CRLF? LWSP_char)+"),
        Atom => ("atom", "/[^\\]\\x00-\\x20 \\x7F\\x80-\\xFF()<>@,;:\\\\\".\\[]+/"),
        Ctext => ("ctext", "(/[^)\\\\\\x0D\\x80-\\xFF(]+/ | linear_white_space)"),
        Dtext => ("dtext", "(/[^\\]\\\\\\x0D\\x80-\\xFF\\[]+/ | linear_white_space)"),
        Qtext => ("qtext", "(/[^\"\\\\\\x0D\\x80-\\xFF]+/ | linear_white_space)"),
        QuotedPair => ("quoted_pair", "\"\\\\\" CHAR"),
        QuotedString => ("quoted_string", "\"\\\"\" (qtext | quoted_pair)* \"\\\"\""),
        DomainLiteral => ("domain_literal", "\"[\" (dtext | quoted_pair)* \"]\""),
        Comment => ("comment", "\"(\" (ctext | quoted_pair | comment)* \")\""),
        Ocms => ("ocms", "comment*"),
        Word => ("word", "(atom | quoted_string)"),
        Phrase => ("phrase", "(word -)+"),
        Valid => ("valid", "ocms address ocms"),
        Address => ("address", "(mailbox | group)"),
        Group => ("group", "phrase ocms \":\" ocms mailbox (ocms \",\" ocms mailbox)* ocms \";\""),
        Mailbox => ("mailbox", "(addr_spec | phrase - ocms - angle_addr)"),
        AngleAddr => ("angle_addr", "\"<\" ocms route? ocms addr_spec \">\""),
        Route => ("route", "(AT ocms domain)+ \":\""),
        AddrSpec => ("addr_spec", "local_part ocms \"@\" ocms domain"),
        LocalPart => ("local_part", "word ocms (\".\" ocms word)*"),
        Domain => ("domain", "< sub_domain ocms (\".\" ocms sub_domain)+ > &{ valid_domain(text) }"),
        SubDomain => ("sub_domain", "(domain_ref | domain_literal)"),
        DomainRef => ("domain_ref", "atom"),
        Root => ("root", "valid !."),
        OnlyAddrSpec => ("only_addr_spec", "ocms addr_spec ocms !."),
    }
}

use self::Rule as R;

/// The RFC 822 mailbox grammar.
///
/// A domain needs at least two sub-domains. With a [`DomainValidator`],
/// the whole text matched by `domain` must satisfy it as well.
#[derive(Clone, Copy, Default)]
pub struct Rfc822<'v> {
    domains: Option<&'v dyn DomainValidator>,
}

impl<'v> Rfc822<'v> {
    /// A grammar that only checks domain syntax.
    pub fn new() -> Self {
        Rfc822 { domains: None }
    }

    /// A grammar that also runs every domain through `validator`.
    pub fn with_domain_validator(validator: &'v dyn DomainValidator) -> Self {
        Rfc822 {
            domains: Some(validator),
        }
    }

    /// Whether domains go through a validator.
    pub fn validates_domains(&self) -> bool {
        self.domains.is_some()
    }
}

impl std::fmt::Debug for Rfc822<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rfc822")
            .field("validates_domains", &self.validates_domains())
            .finish()
    }
}

type P<'a, 'v> = Parser<'a, Rfc822<'v>>;

impl<'v> Grammar for Rfc822<'v> {
    type Rule = Rule;

    const ROOT: Rule = Rule::Root;

    fn eval(p: &mut P<'_, 'v>, rule: Rule) -> bool {
        match rule {
            R::Htab => p.byte(HTAB),
            R::Lf => p.byte(LF),
            R::Cr => p.byte(CR),
            R::Space => p.byte(SPACE),
            R::Hyphen => p.many0(|p| p.apply(R::Space)),
            R::At => p.byte(b'@'),
            R::LwspChar => p.choice(&[R::Space, R::Htab]),
            R::Char => p.byte_if(|b| b.is_ascii()),
            R::Ctl => p.byte_if(|b| b < 0x20 || b == 0x7f),
            R::Special => p.byte_if(is_special),
            R::Crlf => p.seq(|p| p.apply(R::Cr) && p.apply(R::Lf)),
            R::LinearWhiteSpace => linear_white_space(p),
            R::Atom => p.bytes_while(is_atom_char),
            R::Ctext => {
                p.bytes_while(|b| !matches!(b, b'(' | b')' | b'\\' | CR) && b.is_ascii())
                    || p.apply(R::LinearWhiteSpace)
            }
            R::Dtext => {
                p.bytes_while(|b| !matches!(b, b'[' | b']' | b'\\' | CR) && b.is_ascii())
                    || p.apply(R::LinearWhiteSpace)
            }
            R::Qtext => {
                p.bytes_while(|b| !matches!(b, b'"' | b'\\' | CR) && b.is_ascii())
                    || p.apply(R::LinearWhiteSpace)
            }
            R::QuotedPair => p.seq(|p| p.byte(b'\\') && p.apply(R::Char)),
            R::QuotedString => quoted_string(p),
            R::DomainLiteral => domain_literal(p),
            R::Comment => comment(p),
            R::Ocms => p.many0(|p| p.apply(R::Comment)),
            R::Word => p.choice(&[R::Atom, R::QuotedString]),
            R::Phrase => p.many1(|p| p.apply(R::Word) && p.apply(R::Hyphen)),
            R::Valid => p.seq(|p| p.apply(R::Ocms) && p.apply(R::Address) && p.apply(R::Ocms)),
            R::Address => p.choice(&[R::Mailbox, R::Group]),
            R::Group => group(p),
            R::Mailbox => mailbox(p),
            R::AngleAddr => angle_addr(p),
            R::Route => route(p),
            R::AddrSpec => addr_spec(p),
            R::LocalPart => local_part(p),
            R::Domain => domain(p),
            R::SubDomain => p.choice(&[R::DomainRef, R::DomainLiteral]),
            R::DomainRef => p.apply(R::Atom),
            R::Root => p.seq(|p| p.apply(R::Valid) && p.eof()),
            R::OnlyAddrSpec => p.seq(|p| {
                p.apply(R::Ocms) && p.apply(R::AddrSpec) && p.apply(R::Ocms) && p.eof()
            }),
        }
    }
}

// 3.3.  LEXICAL TOKENS
// https://datatracker.ietf.org/doc/html/rfc822#section-3.3

// specials    =  "(" / ")" / "<" / ">" / "@"  ; Must be in quoted-
//             /  "," / ";" / ":" / "\" / <">  ;  string, to use
//             /  "." / "[" / "]"              ;  within a word.
fn is_special(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'.' | b'[' | b']'
    )
}

// atom        =  1*<any CHAR except specials, SPACE and CTLs>
fn is_atom_char(b: u8) -> bool {
    (0x21..0x7f).contains(&b) && !is_special(b)
}

// linear-white-space =  1*([CRLF] LWSP-char)  ; semantics = SPACE
//                                             ; CRLF => folding
fn linear_white_space(p: &mut P<'_, '_>) -> bool {
    p.many1(|p| p.opt(|p| p.apply(R::Crlf)) && p.apply(R::LwspChar))
}

// quoted-string = <"> *(qtext/quoted-pair) <">; Regular qtext or
//                                             ;   quoted chars.
fn quoted_string(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.byte(b'"')
            && p.many0(|p| p.apply(R::Qtext) || p.apply(R::QuotedPair))
            && p.byte(b'"')
    })
}

// domain-literal =  "[" *(dtext / quoted-pair) "]"
fn domain_literal(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.byte(b'[')
            && p.many0(|p| p.apply(R::Dtext) || p.apply(R::QuotedPair))
            && p.byte(b']')
    })
}

// comment     =  "(" *(ctext / quoted-pair / comment) ")"
fn comment(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.byte(b'(')
            && p.many0(|p| p.choice(&[R::Ctext, R::QuotedPair, R::Comment]))
            && p.byte(b')')
    })
}

// 6.1.  SYNTAX
// https://datatracker.ietf.org/doc/html/rfc822#section-6.1

// group       =  phrase ":" [#mailbox] ";"
//
// At least one mailbox is required here.
fn group(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.apply(R::Phrase)
            && p.apply(R::Ocms)
            && p.byte(b':')
            && p.apply(R::Ocms)
            && p.apply(R::Mailbox)
            && p.many0(|p| {
                p.apply(R::Ocms) && p.byte(b',') && p.apply(R::Ocms) && p.apply(R::Mailbox)
            })
            && p.apply(R::Ocms)
            && p.byte(b';')
    })
}

// mailbox     =  addr-spec                    ; simple address
//             /  phrase route-addr            ; name & addr-spec
fn mailbox(p: &mut P<'_, '_>) -> bool {
    p.apply(R::AddrSpec)
        || p.seq(|p| {
            p.apply(R::Phrase)
                && p.apply(R::Hyphen)
                && p.apply(R::Ocms)
                && p.apply(R::Hyphen)
                && p.apply(R::AngleAddr)
        })
}

// route-addr  =  "<" [route] addr-spec ">"
fn angle_addr(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.byte(b'<')
            && p.apply(R::Ocms)
            && p.opt(|p| p.apply(R::Route))
            && p.apply(R::Ocms)
            && p.apply(R::AddrSpec)
            && p.byte(b'>')
    })
}

// route       =  1#("@" domain) ":"           ; path-relative
fn route(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.many1(|p| p.apply(R::At) && p.apply(R::Ocms) && p.apply(R::Domain)) && p.byte(b':')
    })
}

// addr-spec   =  local-part "@" domain        ; global address
fn addr_spec(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.apply(R::LocalPart)
            && p.apply(R::Ocms)
            && p.byte(b'@')
            && p.apply(R::Ocms)
            && p.apply(R::Domain)
    })
}

// local-part  =  word *("." word)             ; uninterpreted
//                                             ; case-preserved
fn local_part(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.apply(R::Word)
            && p.apply(R::Ocms)
            && p.many0(|p| p.byte(b'.') && p.apply(R::Ocms) && p.apply(R::Word))
    })
}

// domain      =  sub-domain *("." sub-domain)
//
// Two sub-domains at least, so a bare host name is rejected.
fn domain(p: &mut P<'_, '_>) -> bool {
    let validator = p.grammar().domains;
    p.seq(|p| {
        let Some(span) = p.capture(|p| {
            p.apply(R::SubDomain)
                && p.apply(R::Ocms)
                && p.many1(|p| p.byte(b'.') && p.apply(R::Ocms) && p.apply(R::SubDomain))
        }) else {
            return false;
        };
        match validator {
            Some(validator) => p.check(span, |domain| validator.is_valid_domain(domain)),
            None => true,
        }
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Rfc822, Rule};
    use crate::packrat::{Parser, Rule as _};

    fn matches(rule: Rule, input: &str) -> Option<usize> {
        let grammar = Rfc822::new();
        let mut parser = Parser::new(&grammar, input);
        parser.parse(rule).then(|| parser.pos())
    }

    #[test]
    fn lexical_tokens() {
        assert_eq!(matches(Rule::Atom, "jdoe@one.test"), Some(4));
        assert_eq!(matches(Rule::Atom, "a b"), Some(1));
        assert_eq!(matches(Rule::Atom, "(a)"), None);
        assert_eq!(matches(Rule::Atom, "é"), None);
        assert_eq!(matches(Rule::LinearWhiteSpace, " \r\n\t x"), Some(5));
        assert_eq!(matches(Rule::LinearWhiteSpace, "\r\nx"), None);
        assert_eq!(matches(Rule::Hyphen, "x"), Some(0));
    }

    #[test]
    fn quoted_text() {
        assert_eq!(matches(Rule::QuotedString, "\"a b\\\" c\"d"), Some(9));
        assert_eq!(matches(Rule::QuotedString, "\"a\rb\""), None);
        assert_eq!(matches(Rule::DomainLiteral, "[127.0.0.1]"), Some(11));
        assert_eq!(matches(Rule::DomainLiteral, "[a[b]"), None);
    }

    #[test]
    fn comments_nest() {
        assert_eq!(matches(Rule::Comment, "(Chris's host.)x"), Some(15));
        assert_eq!(matches(Rule::Comment, "(a (b) \\( c)"), Some(12));
        assert_eq!(matches(Rule::Ocms, "(a)(b) x"), Some(6));
        assert_eq!(matches(Rule::Comment, "(a"), None);
    }

    #[test]
    fn domain_needs_two_sub_domains() {
        assert_eq!(matches(Rule::Domain, "one.test"), Some(8));
        assert_eq!(matches(Rule::Domain, "a.b.c"), Some(5));
        assert_eq!(matches(Rule::Domain, "[1.2.3.4].net"), Some(13));
        assert_eq!(matches(Rule::Domain, "com"), None);
        assert_eq!(matches(Rule::Domain, "[::1]"), None);
    }

    #[test]
    fn phrases_and_routes() {
        assert_eq!(matches(Rule::Phrase, "John Q. Public"), Some(6));
        assert!(matches(Rule::Mailbox, "John <jdoe@one.test>").is_some());
        assert!(matches(Rule::AngleAddr, "<@a.test@b.test:joe@c.test>").is_some());
    }

    #[test]
    fn domain_validator_sees_whole_domain() {
        let seen = std::cell::RefCell::new(Vec::new());
        let record = |domain: &str| {
            seen.borrow_mut().push(domain.to_owned());
            true
        };
        let grammar = Rfc822::with_domain_validator(&record);
        let mut parser = Parser::new(&grammar, "joe@where(x).test");
        assert!(parser.parse(Rule::OnlyAddrSpec));
        assert_eq!(seen.borrow().as_slice(), ["where(x).test"]);

        let reject = |_: &str| false;
        let grammar = Rfc822::with_domain_validator(&reject);
        let mut parser = Parser::new(&grammar, "joe@where.test");
        assert!(!parser.parse(Rule::OnlyAddrSpec));
    }

    #[test]
    fn every_rule_is_named() {
        for rule in Rule::all() {
            assert_eq!(Rule::from_name(rule.name()), Some(*rule));
        }
        assert_eq!(Rule::from_name("-"), Some(Rule::Hyphen));
        assert_eq!(Rule::from_name("only_addr_spec"), Some(Rule::OnlyAddrSpec));
    }
}
