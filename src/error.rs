use std::fmt::{self, Debug, Display};

/// Error raised while classifying lines or building the tree.
#[derive(Debug, Clone)]
pub struct Error {
    /// The error kind.
    pub kind: ErrorKind,
    /// 1-based source line of the offending structural line, when known.
    pub line: Option<u32>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, line: Option<u32>) -> Error {
        Error { kind, line }
    }
}

impl std::error::Error for Error {}

impl From<(ErrorKind, u32)> for Error {
    fn from((kind, line): (ErrorKind, u32)) -> Self {
        Self {
            kind,
            line: Some(line),
        }
    }
}

/// The kinds of error that can occur.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// A final path segment already exists with a kind incompatible with the
    /// operation attempted on it, e.g. opening `[[x]]` where `x` is a
    /// key-value.
    KindConflict {
        /// The full path of the conflicting node.
        path: String,
    },

    /// A key-value line arrived while the current scope root cannot host
    /// key-values. Internal-consistency fault; not user-recoverable.
    InvalidInsertionTarget,

    /// A dotted path would have to descend through a terminal (non-table)
    /// node.
    UnresolvablePath {
        /// The full path up to and including the segment that failed.
        path: String,
    },

    /// EOF was reached when looking for a value.
    UnexpectedEof,

    /// An unexpected character was encountered.
    Unexpected(char),

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A string was still open when the line or file ended.
    UnterminatedString,

    /// An invalid character not allowed in a string was found.
    InvalidCharInString(char),

    /// An invalid character was found as an escape.
    InvalidEscape(char),

    /// An invalid character was found in a hex escape.
    InvalidHexEscape(char),

    /// An invalid escape value was specified in a hex escape in a string.
    ///
    /// Valid values are in the plane of unicode codepoints.
    InvalidEscapeValue(u32),

    /// A number failed to parse.
    InvalidNumber,

    /// Unquoted string was found when quoted one was expected.
    UnquotedString,

    /// Multiline strings are not allowed for keys.
    MultilineStringKey,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::KindConflict { .. } => "kind-conflict",
            Self::InvalidInsertionTarget => "invalid-insertion-target",
            Self::UnresolvablePath { .. } => "unresolvable-path",
            Self::UnexpectedEof => "unexpected-eof",
            Self::Unexpected(..) => "unexpected",
            Self::Wanted { .. } => "wanted",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::InvalidNumber => "invalid-number",
            Self::UnquotedString => "unquoted-string",
            Self::MultilineStringKey => "multiline-string-key",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::KindConflict { path } => {
                write!(f, "existing node at `{path}` has an incompatible kind")
            }
            ErrorKind::InvalidInsertionTarget => {
                f.write_str("current scope cannot host key-value entries")
            }
            ErrorKind::UnresolvablePath { path } => {
                write!(f, "path `{path}` descends through a non-table node")
            }
            ErrorKind::UnexpectedEof => f.write_str("unexpected eof encountered"),
            ErrorKind::Unexpected(c) => {
                write!(f, "unexpected character found: `{}`", Escape(*c))
            }
            ErrorKind::Wanted { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::InvalidCharInString(c) => {
                write!(f, "invalid character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidHexEscape(c) => {
                write!(f, "invalid hex escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscapeValue(v) => write!(f, "invalid escape value: `{v}`"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::UnquotedString => {
                f.write_str("invalid value, did you mean to use a quoted string?")
            }
            ErrorKind::MultilineStringKey => {
                f.write_str("multiline strings are not allowed for key")
            }
        }?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;
