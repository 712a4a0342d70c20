use std::fmt;

use relex_automata::BuildError;

/// An error that occurred while building a lexer or tokenizing with one.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Error {
    /// The pattern of a token definition could not be compiled.
    ///
    /// This includes syntax errors in the pattern as well as automata that
    /// grew past a configured size limit.
    Pattern {
        /// The name of the token whose pattern failed.
        name: String,
        /// The underlying error.
        source: BuildError,
    },
    /// No token matched the input at some position.
    Lex(LexError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Pattern { ref source, .. } => Some(source),
            Error::Lex(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Pattern { ref name, ref source } => {
                write!(f, "invalid pattern for token '{}': ", name)?;
                match source.syntax_error() {
                    Some(err) => write!(f, "{}", err),
                    None => write!(f, "{}", source),
                }
            }
            Error::Lex(ref err) => err.fmt(f),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Error {
        Error::Lex(err)
    }
}

/// An error returned when no token matches a nonempty prefix of the
/// remaining input.
///
/// Tokenizing stops at the first such position; there is no recovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexError {
    pub(crate) offset: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl LexError {
    /// The byte offset into the input at which no token matched.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The line of the offending position, starting at `1`.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column of the offending position in characters, starting at `1`.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl std::error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no token matches at line {}, column {} (byte offset {})",
            self.line, self.column, self.offset
        )
    }
}
