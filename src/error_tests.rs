use crate::error::{Error, ErrorKind};

#[test]
fn kind_display_is_kebab_case() {
    let cases = [
        (
            ErrorKind::KindConflict {
                path: "a.b".into(),
            },
            "kind-conflict",
        ),
        (ErrorKind::InvalidInsertionTarget, "invalid-insertion-target"),
        (
            ErrorKind::UnresolvablePath { path: "x".into() },
            "unresolvable-path",
        ),
        (ErrorKind::UnexpectedEof, "unexpected-eof"),
        (ErrorKind::UnterminatedString, "unterminated-string"),
        (ErrorKind::InvalidNumber, "invalid-number"),
        (ErrorKind::UnquotedString, "unquoted-string"),
        (ErrorKind::MultilineStringKey, "multiline-string-key"),
        (ErrorKind::InvalidEscape('z'), "invalid-escape"),
    ];
    for (kind, expected) in cases {
        assert_eq!(kind.to_string(), expected);
        // Debug delegates to Display.
        assert_eq!(format!("{kind:?}"), expected);
    }
}

#[test]
fn error_display_includes_line_when_known() {
    let e = Error::new(
        ErrorKind::KindConflict {
            path: "t.a".into(),
        },
        Some(3),
    );
    assert_eq!(
        e.to_string(),
        "existing node at `t.a` has an incompatible kind (line 3)"
    );

    let e = Error::new(ErrorKind::UnterminatedString, None);
    assert_eq!(e.to_string(), "unterminated string");
}

#[test]
fn error_display_escapes_whitespace_chars() {
    let e = Error::new(ErrorKind::Unexpected('\r'), Some(1));
    assert_eq!(e.to_string(), "unexpected character found: `\\r` (line 1)");

    let e = Error::new(ErrorKind::InvalidCharInString('\n'), None);
    assert_eq!(e.to_string(), "invalid character in string: `\\n`");
}

#[test]
fn wanted_formats_both_sides() {
    let e = Error::new(
        ErrorKind::Wanted {
            expected: "a right bracket",
            found: "eof",
        },
        Some(2),
    );
    assert_eq!(e.to_string(), "expected a right bracket, found eof (line 2)");
}

#[test]
fn from_kind_and_line() {
    let e = Error::from((ErrorKind::InvalidNumber, 12));
    assert_eq!(e.line, Some(12));
    assert!(matches!(e.kind, ErrorKind::InvalidNumber));
}
