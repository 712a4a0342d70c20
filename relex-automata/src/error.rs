use std::fmt;

/// An error that occurred while building or transforming an automaton.
///
/// This covers pattern syntax errors (when building straight from a pattern
/// string), configured size limits being exceeded, and automata that violate
/// their structural invariants.
#[derive(Clone, Debug)]
pub struct BuildError {
    kind: BuildErrorKind,
}

/// The kind of a [`BuildError`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildErrorKind {
    /// The pattern could not be parsed.
    Syntax(relex_syntax::Error),
    /// Construction would have needed more states than the configured limit.
    TooManyStates {
        /// The configured limit.
        limit: usize,
    },
    /// A state was referenced that is not in the automaton's state set.
    UnknownState {
        /// Debug representation of the offending state.
        state: String,
        /// Where the state was referenced, e.g. "initial state".
        role: &'static str,
    },
    /// A transition was labelled with a symbol outside the alphabet.
    UnknownSymbol {
        /// The offending symbol.
        symbol: char,
    },
    /// A state renaming mapped two distinct states to the same name.
    NonInjectiveRemap,
    /// Partition refinement produced an empty block.
    EmptyBlock,
    /// An internal invariant of one of the algorithms was violated.
    Internal(&'static str),
}

impl BuildError {
    /// The kind of this error.
    pub fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }

    /// If this error came from parsing a pattern, return the syntax error.
    pub fn syntax_error(&self) -> Option<&relex_syntax::Error> {
        match self.kind {
            BuildErrorKind::Syntax(ref err) => Some(err),
            _ => None,
        }
    }

    /// If this error came from exceeding a size limit, return the limit.
    pub fn size_limit(&self) -> Option<usize> {
        match self.kind {
            BuildErrorKind::TooManyStates { limit } => Some(limit),
            _ => None,
        }
    }

    pub(crate) fn syntax(err: relex_syntax::Error) -> BuildError {
        BuildError { kind: BuildErrorKind::Syntax(err) }
    }

    pub(crate) fn too_many_states(limit: usize) -> BuildError {
        BuildError { kind: BuildErrorKind::TooManyStates { limit } }
    }

    pub(crate) fn unknown_state<S: fmt::Debug>(
        state: &S,
        role: &'static str,
    ) -> BuildError {
        BuildError {
            kind: BuildErrorKind::UnknownState {
                state: format!("{:?}", state),
                role,
            },
        }
    }

    pub(crate) fn unknown_symbol(symbol: char) -> BuildError {
        BuildError { kind: BuildErrorKind::UnknownSymbol { symbol } }
    }

    pub(crate) fn non_injective_remap() -> BuildError {
        BuildError { kind: BuildErrorKind::NonInjectiveRemap }
    }

    pub(crate) fn empty_block() -> BuildError {
        BuildError { kind: BuildErrorKind::EmptyBlock }
    }

    pub(crate) fn internal(msg: &'static str) -> BuildError {
        BuildError { kind: BuildErrorKind::Internal(msg) }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            BuildErrorKind::Syntax(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BuildErrorKind::Syntax(_) => write!(f, "error parsing pattern"),
            BuildErrorKind::TooManyStates { limit } => write!(
                f,
                "automaton exceeds the size limit of {} states",
                limit
            ),
            BuildErrorKind::UnknownState { ref state, role } => write!(
                f,
                "{} {} is not in the automaton's state set",
                role, state
            ),
            BuildErrorKind::UnknownSymbol { symbol } => write!(
                f,
                "transition on {:?} which is not in the alphabet",
                symbol
            ),
            BuildErrorKind::NonInjectiveRemap => {
                write!(f, "state renaming maps distinct states to one state")
            }
            BuildErrorKind::EmptyBlock => {
                write!(f, "partition refinement produced an empty block")
            }
            BuildErrorKind::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

/// An error returned when two automata that must share an alphabet do not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlphabetMismatch {
    pub(crate) left: std::collections::BTreeSet<char>,
    pub(crate) right: std::collections::BTreeSet<char>,
}

impl AlphabetMismatch {
    /// The alphabet of the left-hand automaton.
    pub fn left(&self) -> &std::collections::BTreeSet<char> {
        &self.left
    }

    /// The alphabet of the right-hand automaton.
    pub fn right(&self) -> &std::collections::BTreeSet<char> {
        &self.right
    }
}

impl std::error::Error for AlphabetMismatch {}

impl fmt::Display for AlphabetMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alphabets of the two automata differ: {:?} != {:?}",
            self.left, self.right
        )
    }
}
