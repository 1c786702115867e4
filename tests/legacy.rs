use mailgrammar::{validate_legacy, validate_legacy_addr, Validator};

const VALID: &[&str] = &[
    "simple@example.com",
    "\"Abc@def\"@example.com",
    "\"Fred Bloggs\"@example.com",
    "\"Joe\\Blow\"@example.com",
    "customer/department=shipping@example.com",
    "$A12345@example.com",
    "!def!xyz%abc@example.com",
    "c@(Chris's host.)public.example",
    "A Group:Chris Jones <c@a.test>,joe@where.test,John <jdoe@one.test>;",
    "l3tt3rsAndNumb3rs@domain.com",
    "has-dash@domain.com",
    "hasApostrophe.o'leary@domain.org",
    "uncommonTLD@domain.museum",
    "lettersInDomain@911.com",
    "underscore_inLocal@domain.net",
    "IPInsteadOfDomain@127.0.0.1",
    "subdomain@sub.domain.com",
    "local@dash-inDomain.com",
    "dot.inLocal@foo.com",
    "a@singleLetterLocal.org",
    "singleLetterDomain@x.org",
    "&*=?^+{}'~@validCharsInLocal.net",
    "foor@bar.newTLD",
    "(before)joe@where.test(after)",
    "joe(a).(b)smith@(c)where(d).(e)test",
    "John <@relay.test@node.test:joe@where.test>",
    "joe@[10.0.0.1].test",
];

const INVALID: &[&str] = &[
    "",
    "NotAnEmail",
    "@NotAnEmail",
    "nodomain@",
    "missingDomain@.com",
    "@missingLocal.org",
    "missingatSign.net",
    "missingDot@com",
    "two@@signs.com",
    "colonButNoPort@127.0.0.1:",
    ".localStartsWithDot@domain.com",
    "localEndsWithDot.@domain.com",
    "two..consecutiveDots@domain.com",
    "missingTLD@domain.",
    "! \"#$%(),/;<>[]`|@CharsInLocal.org",
    "CharsInDomain@! \"#$%(),/;<>_[]`|.org",
    "shortipv6@[::1]",
    "toomanyoctets@[2001:0DB7:1982:A098:2001:0DB7:1982:A098:8991]",
    "garbageipv6@[nthueonthueonhurc]",
    "Empty group:;",
    "joe@where.test ",
    "joe . smith @ where . test",
    "Joe Q. <joe@where.test>",
    "joe@where.test, jane@where.test",
    "\u{e9}mile@example.com",
];

#[test]
fn valid_addresses() {
    for address in VALID {
        assert!(validate_legacy(address, false), "{address:?}");
    }
}

#[test]
fn invalid_addresses() {
    for address in INVALID {
        assert!(!validate_legacy(address, false), "{address:?}");
    }
}

#[test]
fn addr_spec_only() {
    for address in [
        "l3tt3rsAndNumb3rs@domain.com",
        "has-dash@domain.com",
        "(x)joe@where.test(y)",
        "\"Fred Bloggs\"@example.com",
    ] {
        assert!(validate_legacy_addr(address, false), "{address:?}");
    }

    for address in [
        "John <jdoe@one.test>",
        "A Group:joe@where.test;",
        "joe@where",
    ] {
        assert!(!validate_legacy_addr(address, false), "{address:?}");
    }
}

#[test]
fn host_names_when_asked() {
    for address in [
        "evan@foo.com",
        "evan@blah.foo.com",
        "evan@foo-bar.com",
        "evan@3foo-4bar.com",
        "c@(Chris's host.)public.example",
    ] {
        assert!(validate_legacy(address, true), "{address:?}");
    }

    for address in ["evan@-foo.com", "evan@foo-.com", "evan@foo.c$m"] {
        assert!(!validate_legacy(address, true), "{address:?}");
        assert!(validate_legacy(address, false), "{address:?}");
    }
}

// Line folding is only understood inside quoted strings, comments and
// domain literals.
#[test]
fn folded_white_space() {
    let validator = Validator::legacy();
    assert!(validator.validate("\"Joe\r\n Smith\"@where.test"));
    assert!(validator.validate("joe@where.test(a\r\n\tcomment)"));
    assert!(!validator.validate("\"Joe\r\nSmith\"@where.test"));
}
