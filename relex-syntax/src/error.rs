use std::fmt;

/// An error that occurred while parsing a pattern.
///
/// The position is a byte offset into the pattern. The `Display` impl shows
/// the pattern with a caret under the offending position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    pub(crate) kind: ErrorKind,
    pub(crate) pattern: String,
    pub(crate) pos: usize,
}

/// The kind of a parse error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A backslash was the last character of the pattern.
    EscapeUnexpectedEof,
    /// A `[` was never closed by a `]`.
    ClassUnclosed,
    /// A character class with no members, e.g. `[]`.
    ClassEmpty,
    /// A class range whose start comes after its end, e.g. `[z-a]`.
    ClassRangeInvalid {
        /// The first symbol of the range.
        start: char,
        /// The last symbol of the range.
        end: char,
    },
    /// A `(` was never closed by a `)`.
    GroupUnclosed,
    /// A `)` without a matching `(`. This is also what trailing input after
    /// a complete expression looks like.
    GroupUnopened,
    /// An alternative with nothing in it, e.g. `a|`, `|a`, `()` or an
    /// empty pattern.
    EmptyAlternative,
    /// A repetition operator with nothing to repeat, e.g. `*a` or `a|+`.
    RepetitionMissing,
    /// Groups were nested deeper than the configured limit.
    NestLimitExceeded(u32),
}

impl Error {
    /// The kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The pattern that failed to parse.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The byte offset in the pattern at which the error was detected.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Patterns may legitimately contain newlines, in which case a caret
        // line would be misleading.
        if self.pattern.contains('\n') {
            return write!(
                f,
                "regex parse error at byte {}: {}",
                self.pos, self.kind
            );
        }
        let column = self.pattern[..self.pos].chars().count();
        writeln!(f, "regex parse error:")?;
        writeln!(f, "    {}", self.pattern)?;
        writeln!(f, "    {}^", " ".repeat(column))?;
        write!(f, "error: {}", self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::EscapeUnexpectedEof => {
                write!(f, "incomplete escape sequence, reached end of pattern")
            }
            ErrorKind::ClassUnclosed => write!(f, "unclosed character class"),
            ErrorKind::ClassEmpty => write!(f, "empty character class"),
            ErrorKind::ClassRangeInvalid { start, end } => write!(
                f,
                "invalid character class range {:?}-{:?}, \
                 the start must be <= the end",
                start, end
            ),
            ErrorKind::GroupUnclosed => write!(f, "unclosed group"),
            ErrorKind::GroupUnopened => {
                write!(f, "unopened group, or trailing input after expression")
            }
            ErrorKind::EmptyAlternative => write!(f, "empty alternative"),
            ErrorKind::RepetitionMissing => {
                write!(f, "repetition operator missing expression")
            }
            ErrorKind::NestLimitExceeded(limit) => {
                write!(f, "exceed the maximum number of nested groups ({})", limit)
            }
        }
    }
}
