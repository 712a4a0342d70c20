use std::collections::{BTreeMap, BTreeSet};

use relex_syntax::{ast::Regex, ParserBuilder};

use crate::{
    error::BuildError,
    nfa::{NFA, StateAllocator, StateId, Symbol},
};

/// The configuration used for a Thompson NFA compiler.
#[derive(Clone, Debug, Default)]
pub struct Config {
    size_limit: Option<usize>,
    syntax: ParserBuilder,
}

impl Config {
    /// Return a new default Thompson NFA compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set a limit on the number of states a single compilation may create.
    ///
    /// When the limit is exceeded, compilation stops and returns an error.
    /// By default there is no limit.
    pub fn size_limit(mut self, limit: Option<usize>) -> Config {
        self.size_limit = limit;
        self
    }

    /// Set the syntax configuration used by [`Compiler::build`].
    pub fn syntax(mut self, syntax: ParserBuilder) -> Config {
        self.syntax = syntax;
        self
    }

    pub fn get_size_limit(&self) -> Option<usize> {
        self.size_limit
    }
}

/// Compiles a regular expression into a Thompson NFA.
///
/// Every operator has a fixed automaton shape:
///
/// * `c`: two states joined by a transition on `c`.
/// * epsilon: a single accepting state.
/// * `LR`: the final state of `L` gets an epsilon transition to the start of
///   `R`.
/// * `L|R`, `E*`, `E+`, `E?`: a new start and a new final state joined to the
///   sub-automata with epsilon transitions.
/// * `[c1..cn]`: two states joined by one transition per member.
///
/// The compiler walks the expression with an explicit stack, so deeply
/// nested expressions don't use a proportional amount of call stack.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: Config,
}

/// A piece of an NFA under construction, with exactly one entry and one exit.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fragment {
    pub(crate) start: StateId,
    pub(crate) end: StateId,
}

/// What's left to do for one node of the expression.
enum Frame<'r> {
    /// Compile the node, scheduling its children first if it has any.
    Expand(&'r Regex),
    /// The children of this node are on the fragment stack; combine them.
    Assemble(&'r Regex),
}

impl Compiler {
    /// Create a new compiler with the default configuration.
    pub fn new() -> Compiler {
        Compiler::default()
    }

    /// Apply the given configuration, replacing the previous one.
    pub fn configure(&mut self, config: Config) -> &mut Compiler {
        self.config = config;
        self
    }

    /// Parse the pattern and compile it into an NFA.
    pub fn build(&self, pattern: &str) -> Result<NFA, BuildError> {
        let regex = self
            .config
            .syntax
            .build()
            .parse(pattern)
            .map_err(BuildError::syntax)?;
        self.compile(&regex)
    }

    /// Compile the expression into an NFA whose states are numbered from
    /// `0`.
    pub fn compile(&self, regex: &Regex) -> Result<NFA, BuildError> {
        self.compile_with(regex, &mut StateAllocator::new())
    }

    /// Compile the expression into an NFA, drawing state IDs from `ids`.
    ///
    /// Automata compiled from the same allocator never share a state ID.
    pub fn compile_with(
        &self,
        regex: &Regex,
        ids: &mut StateAllocator,
    ) -> Result<NFA, BuildError> {
        let mut builder = Builder {
            ids,
            limit: self.config.size_limit,
            alphabet: BTreeSet::new(),
            states: BTreeSet::new(),
            transitions: BTreeMap::new(),
        };

        let mut frames = vec![Frame::Expand(regex)];
        let mut fragments: Vec<Fragment> = vec![];
        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Expand(node) => match *node {
                    Regex::Literal(c) => fragments.push(builder.literal(c)?),
                    Regex::Epsilon => fragments.push(builder.epsilon()?),
                    Regex::CharacterClass(ref set) => {
                        fragments.push(builder.class(set)?)
                    }
                    Regex::Concatenation(ref left, ref right)
                    | Regex::Alternation(ref left, ref right) => {
                        frames.push(Frame::Assemble(node));
                        frames.push(Frame::Expand(right));
                        frames.push(Frame::Expand(left));
                    }
                    Regex::KleeneStar(ref inner)
                    | Regex::Plus(ref inner)
                    | Regex::Question(ref inner) => {
                        frames.push(Frame::Assemble(node));
                        frames.push(Frame::Expand(inner));
                    }
                },
                Frame::Assemble(node) => {
                    let fragment = match *node {
                        Regex::Concatenation(..) => {
                            let right = pop(&mut fragments)?;
                            let left = pop(&mut fragments)?;
                            builder.concat(left, right)
                        }
                        Regex::Alternation(..) => {
                            let right = pop(&mut fragments)?;
                            let left = pop(&mut fragments)?;
                            builder.alternate(left, right)?
                        }
                        Regex::KleeneStar(_) => {
                            let inner = pop(&mut fragments)?;
                            builder.star(inner)?
                        }
                        Regex::Plus(_) => {
                            let inner = pop(&mut fragments)?;
                            builder.plus(inner)?
                        }
                        Regex::Question(_) => {
                            let inner = pop(&mut fragments)?;
                            let empty = builder.epsilon()?;
                            builder.alternate(inner, empty)?
                        }
                        Regex::Literal(_)
                        | Regex::Epsilon
                        | Regex::CharacterClass(_) => {
                            return Err(BuildError::internal(
                                "leaf node scheduled for assembly",
                            ))
                        }
                    };
                    fragments.push(fragment);
                }
            }
        }
        let root = pop(&mut fragments)?;
        let nfa = NFA::new(
            builder.alphabet,
            builder.states,
            root.start,
            builder.transitions,
            std::iter::once(root.end).collect(),
        )?;
        debug!(
            "compiled Thompson NFA with {} states and {} symbols",
            nfa.state_len(),
            nfa.alphabet().len()
        );
        Ok(nfa)
    }
}

fn pop(fragments: &mut Vec<Fragment>) -> Result<Fragment, BuildError> {
    // Children are always compiled before their parent is assembled.
    fragments
        .pop()
        .ok_or_else(|| BuildError::internal("Thompson fragment stack underflow"))
}

/// The states and transitions of the automaton being compiled.
struct Builder<'a> {
    ids: &'a mut StateAllocator,
    limit: Option<usize>,
    alphabet: BTreeSet<char>,
    states: BTreeSet<StateId>,
    transitions: BTreeMap<(StateId, Symbol), BTreeSet<StateId>>,
}

impl<'a> Builder<'a> {
    fn add_state(&mut self) -> Result<StateId, BuildError> {
        if let Some(limit) = self.limit {
            if self.states.len() >= limit {
                return Err(BuildError::too_many_states(limit));
            }
        }
        let id = self.ids.fresh();
        self.states.insert(id);
        Ok(id)
    }

    fn add_transition(&mut self, from: StateId, sym: Symbol, to: StateId) {
        if let Symbol::Char(c) = sym {
            self.alphabet.insert(c);
        }
        self.transitions.entry((from, sym)).or_default().insert(to);
    }

    fn literal(&mut self, c: char) -> Result<Fragment, BuildError> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_transition(start, Symbol::Char(c), end);
        Ok(Fragment { start, end })
    }

    fn epsilon(&mut self) -> Result<Fragment, BuildError> {
        let id = self.add_state()?;
        Ok(Fragment { start: id, end: id })
    }

    fn class(&mut self, set: &BTreeSet<char>) -> Result<Fragment, BuildError> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        for &c in set.iter() {
            self.add_transition(start, Symbol::Char(c), end);
        }
        Ok(Fragment { start, end })
    }

    fn concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
        self.add_transition(left.end, Symbol::Epsilon, right.start);
        Fragment { start: left.start, end: right.end }
    }

    fn alternate(
        &mut self,
        left: Fragment,
        right: Fragment,
    ) -> Result<Fragment, BuildError> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_transition(start, Symbol::Epsilon, left.start);
        self.add_transition(start, Symbol::Epsilon, right.start);
        self.add_transition(left.end, Symbol::Epsilon, end);
        self.add_transition(right.end, Symbol::Epsilon, end);
        Ok(Fragment { start, end })
    }

    fn star(&mut self, inner: Fragment) -> Result<Fragment, BuildError> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_transition(start, Symbol::Epsilon, inner.start);
        self.add_transition(start, Symbol::Epsilon, end);
        self.add_transition(inner.end, Symbol::Epsilon, inner.start);
        self.add_transition(inner.end, Symbol::Epsilon, end);
        Ok(Fragment { start, end })
    }

    fn plus(&mut self, inner: Fragment) -> Result<Fragment, BuildError> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_transition(start, Symbol::Epsilon, inner.start);
        self.add_transition(inner.end, Symbol::Epsilon, inner.start);
        self.add_transition(inner.end, Symbol::Epsilon, end);
        Ok(Fragment { start, end })
    }
}
