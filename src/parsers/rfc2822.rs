//! Recognizer for the address grammar of [RFC2822]: Internet Message
//! Format, including the obsolete syntax of section 4 which keeps
//! RFC 822 addresses valid.
//!
//! Productions are transcribed as PEGs: alternatives are ordered and
//! repetitions are greedy, so e.g. `CFWS` never gives back a trailing
//! comment to a later element.
//!
//! [RFC2822]: https://datatracker.ietf.org/doc/html/rfc2822

use super::rfc1123::DomainValidator;
use crate::packrat::{rules, Grammar, Parser};

const HTAB: u8 = 0x09;
const LF: u8 = 0x0A;
const CR: u8 = 0x0D;
const DQUOTE: u8 = 0x22;

rules! {
    /// Productions of the RFC 2822 address grammar.
    pub enum Rule {
        Wsp => ("WSP", "(\" \" | d(9))"),
        Lf => ("LF", "/\\x0A/"),
        Cr => ("CR", "/\\x0D/"),
        Crlf => ("CRLF", "CR LF"),
        Alpha => ("ALPHA", "/[A-Za-z]/"),
        Digit => ("DIGIT", "/[0-9]/"),
        NoWsCtl => ("NO-WS-CTL", "(d_btw(1,8) | d(11) | d(12) | d_btw(14,31) | d(127))"),
        Text => ("text", "(d_btw(1,9) | d(11) | d(12) | d_btw(14,127) | obs-text)"),
        QuotedPair => ("quoted-pair", "(\"\\\\\" text | obs-qp)"),
        Fws => ("FWS", "((WSP* CRLF)? WSP+ | obs-FWS)"),
        Ctext => ("ctext", "(NO-WS-CTL | d_btw(33,39) | d_btw(42,91) | d_btw(93,126))"),
        Ccontent => ("ccontent", "(ctext | quoted-pair | comment)"),
        Comment => ("comment", "\"(\" (FWS? ccontent)* FWS? \")\""),
        Cfws => ("CFWS", "(FWS? comment)* (FWS? comment | FWS)"),
        Atext => ("atext", "(ALPHA | DIGIT | \"!\" | \"#\" | \"$\" | \"%\" | \"&\" | \"'\" | \"*\" | \"+\" | \"-\" | \"/\" | \"=\" | \"?\" | \"^\" | \"_\" | \"`\" | \"{\" | \"|\" | \"}\" | \"~\")"),
        Atom => ("atom", "CFWS? atext+ CFWS?"),
        DotAtom => ("dot-atom", "CFWS? dot-atom-text CFWS?"),
        DotAtomText => ("dot-atom-text", "atext+ (\".\" atext+)*"),
        Qtext => ("qtext", "(NO-WS-CTL | d(33) | d_btw(35,91) | d_btw(93,126))"),
        Qcontent => ("qcontent", "(qtext | quoted-pair)"),
        QuotedString => ("quoted-string", "CFWS? \"\\\"\" (FWS? qcontent)* FWS? \"\\\"\" CFWS?"),
        Word => ("word", "(atom | quoted-string)"),
        Phrase => ("phrase", "(word+ | obs-phrase)"),
        Utext => ("utext", "(NO-WS-CTL | d_btw(33,126) | obs-utext)"),
        Unstructured => ("unstructured", "(FWS? utext)* FWS?"),
        Address => ("address", "(mailbox | group)"),
        Mailbox => ("mailbox", "(name-addr | addr-spec)"),
        NameAddr => ("name-addr", "display-name? angle-addr"),
        AngleAddr => ("angle-addr", "(CFWS? \"<\" addr-spec \">\" CFWS? | obs-angle-addr)"),
        Group => ("group", "display-name \":\" (mailbox-list | CFWS)? \";\" CFWS?"),
        DisplayName => ("display-name", "phrase"),
        MailboxList => ("mailbox-list", "(mailbox (\",\" mailbox)* | obs-mbox-list)"),
        AddressList => ("address-list", "(address (\",\" address)* | obs-addr-list)"),
        AddrSpec => ("addr-spec", "local-part \"@\" domain"),
        LocalPart => ("local-part", "(dot-atom | quoted-string | obs-local-part)"),
        Domain => ("domain", "(< dot-atom > &{ valid_domain(text) } | domain-literal | < obs-domain > &{ valid_domain(text) })"),
        DomainLiteral => ("domain-literal", "CFWS? \"[\" (FWS? dcontent)* FWS? \"]\" CFWS?"),
        Dcontent => ("dcontent", "(dtext | quoted-pair)"),
        Dtext => ("dtext", "(NO-WS-CTL | d_btw(33,90) | d_btw(94,126))"),
        ObsQp => ("obs-qp", "\"\\\\\" d_btw(0,127)"),
        ObsText => ("obs-text", "LF* CR* (obs-char LF* CR*)*"),
        ObsChar => ("obs-char", "(d_btw(0,9) | d(11) | d(12) | d_btw(14,127))"),
        ObsUtext => ("obs-utext", "obs-text"),
        ObsPhrase => ("obs-phrase", "word (word | \".\" | CFWS)*"),
        ObsPhraseList => ("obs-phrase-list", "(phrase | (phrase? CFWS? \",\" CFWS?)+ phrase?)"),
        ObsFws => ("obs-FWS", "WSP+ (CRLF WSP+)*"),
        ObsAngleAddr => ("obs-angle-addr", "CFWS? \"<\" obs-route? addr-spec \">\" CFWS?"),
        ObsRoute => ("obs-route", "CFWS? obs-domain-list \":\" CFWS?"),
        ObsDomainList => ("obs-domain-list", "\"@\" domain ((CFWS | \",\")* CFWS? \"@\" domain)*"),
        ObsLocalPart => ("obs-local-part", "word (\".\" word)*"),
        ObsDomain => ("obs-domain", "atom (\".\" atom)*"),
        ObsMboxList => ("obs-mbox-list", "(address? CFWS? \",\" CFWS?)+ address?"),
        ObsAddrList => ("obs-addr-list", "(address? CFWS? \",\" CFWS?)+ address?"),
        Root => ("root", "address !."),
        OnlyAddrSpec => ("only_addr_spec", "addr-spec !."),
        OnlyAddressList => ("only_address_list", "(address-list !. | obs-addr-list !.)"),
    }
}

use self::Rule as R;

/// The RFC 2822 address grammar.
///
/// Without a [`DomainValidator`] only the syntax of the domain is
/// checked. With one, the text matched by the `dot-atom` and `obs-domain`
/// forms of `domain` must also satisfy it; domain literals never go
/// through the validator.
#[derive(Clone, Copy, Default)]
pub struct Rfc2822<'v> {
    domains: Option<&'v dyn DomainValidator>,
}

impl<'v> Rfc2822<'v> {
    /// A grammar that only checks domain syntax.
    pub fn new() -> Self {
        Rfc2822 { domains: None }
    }

    /// A grammar that also runs host name domains through `validator`.
    pub fn with_domain_validator(validator: &'v dyn DomainValidator) -> Self {
        Rfc2822 {
            domains: Some(validator),
        }
    }

    /// Whether domains go through a validator.
    pub fn validates_domains(&self) -> bool {
        self.domains.is_some()
    }
}

impl std::fmt::Debug for Rfc2822<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rfc2822")
            .field("validates_domains", &self.validates_domains())
            .finish()
    }
}

type P<'a, 'v> = Parser<'a, Rfc2822<'v>>;

impl<'v> Grammar for Rfc2822<'v> {
    type Rule = Rule;

    const ROOT: Rule = Rule::Root;

    fn eval(p: &mut P<'_, 'v>, rule: Rule) -> bool {
        match rule {
            R::Wsp => wsp(p),
            R::Lf => p.byte(LF),
            R::Cr => p.byte(CR),
            R::Crlf => crlf(p),
            R::Alpha => p.byte_if(|b| b.is_ascii_alphabetic()),
            R::Digit => p.byte_if(|b| b.is_ascii_digit()),
            R::NoWsCtl => no_ws_ctl(p),
            R::Text => text(p),
            R::QuotedPair => quoted_pair(p),
            R::Fws => fws(p),
            R::Ctext => ctext(p),
            R::Ccontent => p.choice(&[R::Ctext, R::QuotedPair, R::Comment]),
            R::Comment => comment(p),
            R::Cfws => cfws(p),
            R::Atext => atext(p),
            R::Atom => atom(p),
            R::DotAtom => dot_atom(p),
            R::DotAtomText => dot_atom_text(p),
            R::Qtext => qtext(p),
            R::Qcontent => p.choice(&[R::Qtext, R::QuotedPair]),
            R::QuotedString => quoted_string(p),
            R::Word => p.choice(&[R::Atom, R::QuotedString]),
            R::Phrase => phrase(p),
            R::Utext => utext(p),
            R::Unstructured => unstructured(p),
            R::Address => p.choice(&[R::Mailbox, R::Group]),
            R::Mailbox => p.choice(&[R::NameAddr, R::AddrSpec]),
            R::NameAddr => name_addr(p),
            R::AngleAddr => angle_addr(p),
            R::Group => group(p),
            R::DisplayName => p.apply(R::Phrase),
            R::MailboxList => mailbox_list(p),
            R::AddressList => address_list(p),
            R::AddrSpec => addr_spec(p),
            R::LocalPart => p.choice(&[R::DotAtom, R::QuotedString, R::ObsLocalPart]),
            R::Domain => domain(p),
            R::DomainLiteral => domain_literal(p),
            R::Dcontent => p.choice(&[R::Dtext, R::QuotedPair]),
            R::Dtext => dtext(p),
            R::ObsQp => obs_qp(p),
            R::ObsText => obs_text(p),
            R::ObsChar => obs_char(p),
            R::ObsUtext => p.apply(R::ObsText),
            R::ObsPhrase => obs_phrase(p),
            R::ObsPhraseList => obs_phrase_list(p),
            R::ObsFws => obs_fws(p),
            R::ObsAngleAddr => obs_angle_addr(p),
            R::ObsRoute => obs_route(p),
            R::ObsDomainList => obs_domain_list(p),
            R::ObsLocalPart => obs_local_part(p),
            R::ObsDomain => obs_domain(p),
            R::ObsMboxList | R::ObsAddrList => obs_list(p),
            R::Root => p.seq(|p| p.apply(R::Address) && p.eof()),
            R::OnlyAddrSpec => p.seq(|p| p.apply(R::AddrSpec) && p.eof()),
            R::OnlyAddressList => only_address_list(p),
        }
    }
}

fn opt_fws(p: &mut P<'_, '_>) -> bool {
    p.opt(|p| p.apply(R::Fws))
}

fn opt_cfws(p: &mut P<'_, '_>) -> bool {
    p.opt(|p| p.apply(R::Cfws))
}

// 6.1  Core Rules
// https://datatracker.ietf.org/doc/html/rfc2234#section-6.1

// WSP            =  SP / HTAB
//                        ; white space
fn wsp(p: &mut P<'_, '_>) -> bool {
    p.byte(b' ') || p.byte(HTAB)
}

// CRLF           =  CR LF
//                        ; Internet standard newline
fn crlf(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::Cr) && p.apply(R::Lf))
}

// 3.2.1. Primitive Tokens
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.1

// NO-WS-CTL       =       %d1-8 /         ; US-ASCII control characters
//                         %d11 /          ;  that do not include the
//                         %d12 /          ;  carriage return, line feed,
//                         %d14-31 /       ;  and white space characters
//                         %d127
fn no_ws_ctl(p: &mut P<'_, '_>) -> bool {
    p.byte_if(|b| matches!(b, 1..=8 | 11 | 12 | 14..=31 | 127))
}

// text            =       %d1-9 /         ; Characters excluding CR and LF
//                         %d11 /
//                         %d12 /
//                         %d14-127 /
//                         obs-text
fn text(p: &mut P<'_, '_>) -> bool {
    p.byte_if(|b| matches!(b, 1..=9 | 11 | 12 | 14..=127)) || p.apply(R::ObsText)
}

// 3.2.2. Quoted characters
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.2

// quoted-pair     =       ("\" text) / obs-qp
fn quoted_pair(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.byte(b'\\') && p.apply(R::Text)) || p.apply(R::ObsQp)
}

// 3.2.3. Folding white space and comments
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.3

// FWS             =       ([*WSP CRLF] 1*WSP) /   ; Folding white space
//                         obs-FWS
fn fws(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.opt(|p| p.many0(|p| p.apply(R::Wsp)) && p.apply(R::Crlf))
            && p.many1(|p| p.apply(R::Wsp))
    }) || p.apply(R::ObsFws)
}

// ctext           =       NO-WS-CTL /     ; Non white space controls
//
//                         %d33-39 /       ; The rest of the US-ASCII
//                         %d42-91 /       ;  characters not including "(",
//                         %d93-126        ;  ")", or "\"
fn ctext(p: &mut P<'_, '_>) -> bool {
    p.apply(R::NoWsCtl) || p.byte_if(|b| matches!(b, 33..=39 | 42..=91 | 93..=126))
}

// comment         =       "(" *([FWS] ccontent) [FWS] ")"
fn comment(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.byte(b'(')
            && p.many0(|p| opt_fws(p) && p.apply(R::Ccontent))
            && opt_fws(p)
            && p.byte(b')')
    })
}

// CFWS            =       *([FWS] comment) (([FWS] comment) / FWS)
fn cfws(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.many0(|p| opt_fws(p) && p.apply(R::Comment))
            && (p.seq(|p| opt_fws(p) && p.apply(R::Comment)) || p.apply(R::Fws))
    })
}

// 3.2.4. Atom
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.4

// atext           =       ALPHA / DIGIT / ; Any character except controls,
//                         "!" / "#" /     ;  SP, and specials.
//                         "$" / "%" /     ;  Used for atoms
//                         "&" / "'" /
//                         "*" / "+" /
//                         "-" / "/" /
//                         "=" / "?" /
//                         "^" / "_" /
//                         "`" / "{" /
//                         "|" / "}" /
//                         "~"
fn atext(p: &mut P<'_, '_>) -> bool {
    p.apply(R::Alpha)
        || p.apply(R::Digit)
        || p.byte_if(|b| {
            matches!(
                b,
                b'!' | b'#'
                    | b'$'
                    | b'%'
                    | b'&'
                    | b'\''
                    | b'*'
                    | b'+'
                    | b'-'
                    | b'/'
                    | b'='
                    | b'?'
                    | b'^'
                    | b'_'
                    | b'`'
                    | b'{'
                    | b'|'
                    | b'}'
                    | b'~'
            )
        })
}

// atom            =       [CFWS] 1*atext [CFWS]
fn atom(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| opt_cfws(p) && p.many1(|p| p.apply(R::Atext)) && opt_cfws(p))
}

// dot-atom        =       [CFWS] dot-atom-text [CFWS]
fn dot_atom(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| opt_cfws(p) && p.apply(R::DotAtomText) && opt_cfws(p))
}

// dot-atom-text   =       1*atext *("." 1*atext)
fn dot_atom_text(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.many1(|p| p.apply(R::Atext))
            && p.many0(|p| p.byte(b'.') && p.many1(|p| p.apply(R::Atext)))
    })
}

// 3.2.5. Quoted strings
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.5

// qtext           =       NO-WS-CTL /     ; Non white space controls
//
//                         %d33 /          ; The rest of the US-ASCII
//                         %d35-91 /       ;  characters not including "\"
//                         %d93-126        ;  or the quote character
fn qtext(p: &mut P<'_, '_>) -> bool {
    p.apply(R::NoWsCtl) || p.byte_if(|b| matches!(b, 33 | 35..=91 | 93..=126))
}

// quoted-string   =       [CFWS]
//                         DQUOTE *([FWS] qcontent) [FWS] DQUOTE
//                         [CFWS]
fn quoted_string(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        opt_cfws(p)
            && p.byte(DQUOTE)
            && p.many0(|p| opt_fws(p) && p.apply(R::Qcontent))
            && opt_fws(p)
            && p.byte(DQUOTE)
            && opt_cfws(p)
    })
}

// 3.2.6. Miscellaneous tokens
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.6

// phrase          =       1*word / obs-phrase
fn phrase(p: &mut P<'_, '_>) -> bool {
    p.many1(|p| p.apply(R::Word)) || p.apply(R::ObsPhrase)
}

// utext           =       NO-WS-CTL /     ; Non white space controls
//                         %d33-126 /      ; The rest of US-ASCII
//                         obs-utext
fn utext(p: &mut P<'_, '_>) -> bool {
    p.apply(R::NoWsCtl) || p.byte_range(33, 126) || p.apply(R::ObsUtext)
}

// unstructured    =       *([FWS] utext) [FWS]
fn unstructured(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.many0(|p| opt_fws(p) && p.apply(R::Utext)) && opt_fws(p))
}

// 3.4. Address Specification
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.4

// name-addr       =       [display-name] angle-addr
fn name_addr(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.opt(|p| p.apply(R::DisplayName)) && p.apply(R::AngleAddr))
}

// angle-addr      =       [CFWS] "<" addr-spec ">" [CFWS] / obs-angle-addr
fn angle_addr(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        opt_cfws(p)
            && p.byte(b'<')
            && p.apply(R::AddrSpec)
            && p.byte(b'>')
            && opt_cfws(p)
    }) || p.apply(R::ObsAngleAddr)
}

// group           =       display-name ":" [mailbox-list / CFWS] ";"
//                         [CFWS]
fn group(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.apply(R::DisplayName)
            && p.byte(b':')
            && p.opt(|p| p.apply(R::MailboxList) || p.apply(R::Cfws))
            && p.byte(b';')
            && opt_cfws(p)
    })
}

// mailbox-list    =       (mailbox *("," mailbox)) / obs-mbox-list
fn mailbox_list(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::Mailbox) && p.many0(|p| p.byte(b',') && p.apply(R::Mailbox)))
        || p.apply(R::ObsMboxList)
}

// address-list    =       (address *("," address)) / obs-addr-list
fn address_list(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::Address) && p.many0(|p| p.byte(b',') && p.apply(R::Address)))
        || p.apply(R::ObsAddrList)
}

// 3.4.1. Addr-spec specification
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.4.1

// addr-spec       =       local-part "@" domain
fn addr_spec(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::LocalPart) && p.byte(b'@') && p.apply(R::Domain))
}

// domain          =       dot-atom / domain-literal / obs-domain
//
// The dot-atom and obs-domain forms are also run through the domain
// validator, if there is one.
fn domain(p: &mut P<'_, '_>) -> bool {
    validated_domain(p, R::DotAtom)
        || p.apply(R::DomainLiteral)
        || validated_domain(p, R::ObsDomain)
}

fn validated_domain(p: &mut P<'_, '_>, rule: Rule) -> bool {
    let Some(validator) = p.grammar().domains else {
        return p.apply(rule);
    };

    p.seq(|p| match p.capture(|p| p.apply(rule)) {
        Some(span) => p.check(span, |domain| validator.is_valid_domain(domain)),
        None => false,
    })
}

// domain-literal  =       [CFWS] "[" *([FWS] dcontent) [FWS] "]" [CFWS]
fn domain_literal(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        opt_cfws(p)
            && p.byte(b'[')
            && p.many0(|p| opt_fws(p) && p.apply(R::Dcontent))
            && opt_fws(p)
            && p.byte(b']')
            && opt_cfws(p)
    })
}

// dtext           =       NO-WS-CTL /     ; Non white space controls
//
//                         %d33-90 /       ; The rest of the US-ASCII
//                         %d94-126        ;  characters not including "[",
//                                         ;  "]", or "\"
fn dtext(p: &mut P<'_, '_>) -> bool {
    p.apply(R::NoWsCtl) || p.byte_if(|b| matches!(b, 33..=90 | 94..=126))
}

// 4.1. Miscellaneous obsolete tokens
// https://datatracker.ietf.org/doc/html/rfc2822#section-4.1

// obs-qp          =       "\" (%d0-127)
fn obs_qp(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.byte(b'\\') && p.byte_range(0, 127))
}

// obs-text        =       *LF *CR *(obs-char *LF *CR)
fn obs_text(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.many0(|p| p.apply(R::Lf))
            && p.many0(|p| p.apply(R::Cr))
            && p.many0(|p| {
                p.apply(R::ObsChar) && p.many0(|p| p.apply(R::Lf)) && p.many0(|p| p.apply(R::Cr))
            })
    })
}

// obs-char        =       %d0-9 / %d11 /          ; %d0-127 except CR and
//                         %d12 / %d14-127         ;  LF
fn obs_char(p: &mut P<'_, '_>) -> bool {
    p.byte_if(|b| matches!(b, 0..=9 | 11 | 12 | 14..=127))
}

// obs-phrase      =       word *(word / "." / CFWS)
fn obs_phrase(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.apply(R::Word) && p.many0(|p| p.apply(R::Word) || p.byte(b'.') || p.apply(R::Cfws))
    })
}

// obs-phrase-list =       phrase / 1*([phrase] [CFWS] "," [CFWS]) [phrase]
fn obs_phrase_list(p: &mut P<'_, '_>) -> bool {
    p.apply(R::Phrase)
        || p.seq(|p| {
            p.many1(|p| {
                p.opt(|p| p.apply(R::Phrase)) && opt_cfws(p) && p.byte(b',') && opt_cfws(p)
            }) && p.opt(|p| p.apply(R::Phrase))
        })
}

// 4.2. Obsolete folding white space
// https://datatracker.ietf.org/doc/html/rfc2822#section-4.2

// obs-FWS         =       1*WSP *(CRLF 1*WSP)
fn obs_fws(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.many1(|p| p.apply(R::Wsp))
            && p.many0(|p| p.apply(R::Crlf) && p.many1(|p| p.apply(R::Wsp)))
    })
}

// 4.4. Obsolete Addressing
// https://datatracker.ietf.org/doc/html/rfc2822#section-4.4

// obs-angle-addr  =       [CFWS] "<" [obs-route] addr-spec ">" [CFWS]
fn obs_angle_addr(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        opt_cfws(p)
            && p.byte(b'<')
            && p.opt(|p| p.apply(R::ObsRoute))
            && p.apply(R::AddrSpec)
            && p.byte(b'>')
            && opt_cfws(p)
    })
}

// obs-route       =       [CFWS] obs-domain-list ":" [CFWS]
fn obs_route(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| opt_cfws(p) && p.apply(R::ObsDomainList) && p.byte(b':') && opt_cfws(p))
}

// obs-domain-list =       "@" domain *(*(CFWS / ",") [CFWS] "@" domain)
fn obs_domain_list(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.byte(b'@')
            && p.apply(R::Domain)
            && p.many0(|p| {
                p.many0(|p| p.apply(R::Cfws) || p.byte(b','))
                    && opt_cfws(p)
                    && p.byte(b'@')
                    && p.apply(R::Domain)
            })
    })
}

// obs-local-part  =       word *("." word)
fn obs_local_part(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::Word) && p.many0(|p| p.byte(b'.') && p.apply(R::Word)))
}

// obs-domain      =       atom *("." atom)
fn obs_domain(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::Atom) && p.many0(|p| p.byte(b'.') && p.apply(R::Atom)))
}

// obs-mbox-list   =       1*([mailbox] [CFWS] "," [CFWS]) [mailbox]
// obs-addr-list   =       1*([address] [CFWS] "," [CFWS]) [address]
//
// Both accept any address in the elements.
fn obs_list(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| {
        p.many1(|p| {
            p.opt(|p| p.apply(R::Address)) && opt_cfws(p) && p.byte(b',') && opt_cfws(p)
        }) && p.opt(|p| p.apply(R::Address))
    })
}

// The first alternative of address-list commits after a single address,
// so a list with empty elements only matches through obs-addr-list.
fn only_address_list(p: &mut P<'_, '_>) -> bool {
    p.seq(|p| p.apply(R::AddressList) && p.eof()) || p.seq(|p| p.apply(R::ObsAddrList) && p.eof())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Rfc2822, Rule};
    use crate::packrat::{Parser, Rule as _};

    fn matches(rule: Rule, input: &str) -> Option<usize> {
        let grammar = Rfc2822::new();
        let mut parser = Parser::new(&grammar, input);
        parser.parse(rule).then(|| parser.pos())
    }

    #[test]
    fn folding_white_space() {
        assert_eq!(matches(Rule::Fws, " \t x"), Some(3));
        assert_eq!(matches(Rule::Fws, " \r\n x"), Some(4));
        assert_eq!(matches(Rule::Fws, "\r\n\tx"), Some(3));
        assert_eq!(matches(Rule::Fws, " \r\n \r\n x"), Some(4));
        assert_eq!(matches(Rule::ObsFws, " \r\n \r\n x"), Some(7));
        assert_eq!(matches(Rule::Fws, "\r\nx"), None);
        assert_eq!(matches(Rule::Fws, "x"), None);
    }

    #[test]
    fn comments_nest() {
        assert_eq!(matches(Rule::Comment, "(a (b) \\) c)x"), Some(12));
        assert_eq!(matches(Rule::Comment, "(a (b)"), None);
    }

    #[test]
    fn cfws_must_end_in_whitespace_or_comment() {
        assert_eq!(matches(Rule::Cfws, " (c) x"), Some(5));
        assert_eq!(matches(Rule::Cfws, "(a)(b)"), None);
        assert_eq!(matches(Rule::Cfws, "(a) (b)x"), None);
        assert_eq!(matches(Rule::Cfws, "(a) (b) x"), Some(8));
    }

    #[test]
    fn dot_atom_takes_every_label() {
        assert_eq!(matches(Rule::DotAtomText, "a.b.c"), Some(5));
        assert_eq!(matches(Rule::DotAtomText, "a.b."), Some(3));
        assert_eq!(matches(Rule::DotAtom, " a.b.c x"), Some(7));
        assert_eq!(matches(Rule::Domain, "a.b.c"), Some(5));
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(matches(Rule::QuotedString, "\"Fred Bloggs\"@"), Some(13));
        assert_eq!(matches(Rule::QuotedString, "\"a\\\"b\""), Some(6));
        assert_eq!(matches(Rule::QuotedString, "\"open"), None);
    }

    #[test]
    fn obsolete_route() {
        assert!(matches(Rule::ObsRoute, "@a.test,@b.test:").is_some());
        assert!(matches(Rule::AngleAddr, "<@a.test,@b.test:joe@c.test>").is_some());
    }

    #[test]
    fn obsolete_lists_allow_empty_elements() {
        assert!(matches(Rule::OnlyAddressList, "a@b.c,,d@e.f").is_some());
        assert!(matches(Rule::OnlyAddressList, ", a@b.c ,").is_some());
        assert!(matches(Rule::ObsPhraseList, "a, b,,c").is_some());
    }

    #[test]
    fn unstructured_text_terminates() {
        assert_eq!(matches(Rule::Unstructured, "any text at all"), Some(15));
        assert_eq!(matches(Rule::Unstructured, ""), Some(0));
    }

    #[test]
    fn domain_validator_is_consulted() {
        let only_test = |domain: &str| domain.ends_with(".test");
        let grammar = Rfc2822::with_domain_validator(&only_test);

        let mut parser = Parser::new(&grammar, "joe@where.test");
        assert!(parser.parse(Rule::OnlyAddrSpec));

        let mut parser = Parser::new(&grammar, "joe@where.example");
        assert!(!parser.parse(Rule::OnlyAddrSpec));

        // literals are not host names
        let mut parser = Parser::new(&grammar, "joe@[127.0.0.1]");
        assert!(parser.parse(Rule::OnlyAddrSpec));
    }

    #[test]
    fn every_rule_is_named() {
        for rule in Rule::all() {
            assert_eq!(Rule::from_name(rule.name()), Some(*rule));
            assert!(!rule.production().is_empty());
        }
        assert_eq!(Rule::from_name("obs-FWS"), Some(Rule::ObsFws));
    }
}
