use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::BuildError;

/// A state ID in an automaton.
pub type StateId = usize;

/// The label of an NFA transition: either a symbol or the empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A transition that consumes no input.
    Epsilon,
    /// A transition that consumes exactly this symbol.
    Char(char),
}

/// Hands out fresh state IDs.
///
/// Every state synthesized by the Thompson compiler gets its ID from an
/// allocator, never from a global counter. Compilations that share an
/// allocator never produce overlapping IDs, and compilations with their own
/// allocator are reproducible.
#[derive(Clone, Debug, Default)]
pub struct StateAllocator {
    next: StateId,
}

impl StateAllocator {
    /// Create an allocator whose first ID is `0`.
    pub fn new() -> StateAllocator {
        StateAllocator { next: 0 }
    }

    /// Create an allocator whose first ID is `first`.
    pub fn starting_at(first: StateId) -> StateAllocator {
        StateAllocator { next: first }
    }

    /// Return an ID that this allocator has never returned before.
    pub fn fresh(&mut self) -> StateId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The ID the next call to `fresh` will return.
    pub fn peek(&self) -> StateId {
        self.next
    }
}

/// A set of NFA states, used as the state of a DFA built by subset
/// construction.
///
/// The states are kept sorted and deduplicated, so two configurations with
/// the same members are equal and hash the same regardless of how they were
/// built.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Configuration(Vec<StateId>);

impl Configuration {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[StateId] {
        &self.0
    }
}

impl FromIterator<StateId> for Configuration {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Configuration {
        let mut ids: Vec<StateId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Configuration(ids)
    }
}

impl From<BTreeSet<StateId>> for Configuration {
    fn from(set: BTreeSet<StateId>) -> Configuration {
        // Already sorted and unique.
        Configuration(set.into_iter().collect())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

/// A nondeterministic finite automaton with epsilon transitions.
///
/// The transition relation maps a state and a label to a set of states.
/// An `NFA` always satisfies its structural invariants: the initial state,
/// every accepting state and every state mentioned by a transition belong to
/// the state set, and every non-epsilon label belongs to the alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NFA {
    alphabet: BTreeSet<char>,
    states: BTreeSet<StateId>,
    start: StateId,
    transitions: BTreeMap<(StateId, Symbol), BTreeSet<StateId>>,
    accepting: BTreeSet<StateId>,
}

impl NFA {
    /// Build an NFA from its parts, checking the structural invariants.
    pub fn new(
        alphabet: BTreeSet<char>,
        states: BTreeSet<StateId>,
        start: StateId,
        transitions: BTreeMap<(StateId, Symbol), BTreeSet<StateId>>,
        accepting: BTreeSet<StateId>,
    ) -> Result<NFA, BuildError> {
        if !states.contains(&start) {
            return Err(BuildError::unknown_state(&start, "initial state"));
        }
        if let Some(s) = accepting.iter().find(|&s| !states.contains(s)) {
            return Err(BuildError::unknown_state(s, "accepting state"));
        }
        for (&(from, sym), targets) in transitions.iter() {
            if !states.contains(&from) {
                return Err(BuildError::unknown_state(&from, "transition source"));
            }
            if let Symbol::Char(c) = sym {
                if !alphabet.contains(&c) {
                    return Err(BuildError::unknown_symbol(c));
                }
            }
            if let Some(to) = targets.iter().find(|&s| !states.contains(s)) {
                return Err(BuildError::unknown_state(to, "transition target"));
            }
        }
        Ok(NFA { alphabet, states, start, transitions, accepting })
    }

    /// The symbols this automaton is defined over. Never includes epsilon.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn state_len(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accepting(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    /// Returns true if any state in the configuration is accepting.
    pub fn is_accepting_configuration(&self, config: &Configuration) -> bool {
        config.iter().any(|id| self.is_accepting(id))
    }

    /// Every transition as a `(from, label, to)` triple, in order.
    pub fn transitions(
        &self,
    ) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.transitions.iter().flat_map(|(&(from, sym), targets)| {
            targets.iter().map(move |&to| (from, sym, to))
        })
    }

    /// The states directly reachable from `from` over a transition labelled
    /// `sym`.
    pub fn next_states(
        &self,
        from: StateId,
        sym: Symbol,
    ) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.get(&(from, sym)).into_iter().flatten().copied()
    }

    /// The set of states reachable from `id` using only epsilon transitions,
    /// including `id` itself.
    pub fn epsilon_closure(&self, id: StateId) -> Configuration {
        self.epsilon_closure_of(std::iter::once(id))
    }

    /// The union of the epsilon closures of every given state.
    pub fn epsilon_closure_of<I>(&self, ids: I) -> Configuration
    where
        I: IntoIterator<Item = StateId>,
    {
        let mut closure = BTreeSet::new();
        let mut stack = vec![];
        for id in ids {
            if closure.insert(id) {
                stack.push(id);
            }
        }
        while let Some(id) = stack.pop() {
            for next in self.next_states(id, Symbol::Epsilon) {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }
        Configuration::from(closure)
    }

    /// Every state reachable from a member of `config` by consuming `c`,
    /// before taking the epsilon closure.
    pub fn step(&self, config: &Configuration, c: char) -> BTreeSet<StateId> {
        config
            .iter()
            .flat_map(|id| self.next_states(id, Symbol::Char(c)))
            .collect()
    }

    /// Returns true if the automaton accepts exactly `word`.
    pub fn accepts(&self, word: &str) -> bool {
        crate::matcher::Matcher::new(self).is_match(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[StateId]) -> BTreeSet<StateId> {
        ids.iter().copied().collect()
    }

    // 0 -e-> 1 -a-> 2 -e-> 3, 2 -e-> 0
    fn sample() -> NFA {
        let mut transitions = BTreeMap::new();
        transitions.insert((0, Symbol::Epsilon), set(&[1]));
        transitions.insert((1, Symbol::Char('a')), set(&[2]));
        transitions.insert((2, Symbol::Epsilon), set(&[3, 0]));
        NFA::new(['a'].into_iter().collect(), set(&[0, 1, 2, 3]), 0, transitions, set(&[3]))
            .unwrap()
    }

    #[test]
    fn closure() {
        let nfa = sample();
        assert_eq!(nfa.epsilon_closure(0).as_slice(), &[0, 1]);
        assert_eq!(nfa.epsilon_closure(2).as_slice(), &[0, 1, 2, 3]);
        assert_eq!(nfa.epsilon_closure(3).as_slice(), &[3]);
        assert_eq!(nfa.epsilon_closure_of([1, 3]).as_slice(), &[1, 3]);
    }

    #[test]
    fn step() {
        let nfa = sample();
        let start = nfa.epsilon_closure(nfa.start());
        assert_eq!(nfa.step(&start, 'a'), set(&[2]));
        assert!(nfa.step(&start, 'b').is_empty());
    }

    #[test]
    fn configuration_is_canonical() {
        let a: Configuration = vec![3, 1, 2, 1].into_iter().collect();
        let b = Configuration::from(set(&[1, 2, 3]));
        assert_eq!(a, b);
        assert!(a.contains(2));
        assert!(!a.contains(4));
        assert_eq!(format!("{:?}", a), "{1, 2, 3}");
    }

    #[test]
    fn allocator() {
        let mut ids = StateAllocator::starting_at(5);
        assert_eq!(ids.fresh(), 5);
        assert_eq!(ids.fresh(), 6);
        assert_eq!(ids.peek(), 7);
    }

    #[test]
    fn invariants_are_checked() {
        let err = NFA::new(BTreeSet::new(), set(&[0]), 1, BTreeMap::new(), set(&[]))
            .unwrap_err();
        assert_eq!(
            err.kind(),
            &crate::BuildErrorKind::UnknownState {
                state: "1".to_string(),
                role: "initial state"
            }
        );

        let err = NFA::new(BTreeSet::new(), set(&[0]), 0, BTreeMap::new(), set(&[2]))
            .unwrap_err();
        assert!(matches!(err.kind(), crate::BuildErrorKind::UnknownState { role: "accepting state", .. }));

        let mut transitions = BTreeMap::new();
        transitions.insert((0, Symbol::Char('x')), set(&[0]));
        let err = NFA::new(BTreeSet::new(), set(&[0]), 0, transitions, set(&[]))
            .unwrap_err();
        assert_eq!(err.kind(), &crate::BuildErrorKind::UnknownSymbol { symbol: 'x' });

        let mut transitions = BTreeMap::new();
        transitions.insert((0, Symbol::Epsilon), set(&[9]));
        let err = NFA::new(BTreeSet::new(), set(&[0]), 0, transitions, set(&[]))
            .unwrap_err();
        assert!(matches!(err.kind(), crate::BuildErrorKind::UnknownState { role: "transition target", .. }));
    }
}
