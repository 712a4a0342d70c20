use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Debug;

use crate::{error::BuildError, nfa::StateId};

/// A deterministic finite automaton.
///
/// Each `(state, symbol)` pair has at most one successor. The transition
/// function may be partial: a missing transition means the input is rejected
/// from that point on. No dead state is ever added implicitly.
///
/// The state type is generic so that the output of subset construction can
/// keep its [`Configuration`](crate::nfa::Configuration) states, which is
/// useful when inspecting how a DFA relates to the NFA it came from. Use
/// [`DFA::relabel`] to get a DFA with dense integer states.
///
/// A `DFA` always satisfies its structural invariants: the initial state and
/// every accepting state belong to the state set, and every transition goes
/// between members of the state set on a symbol of the alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DFA<S = StateId> {
    alphabet: BTreeSet<char>,
    states: BTreeSet<S>,
    start: S,
    transitions: BTreeMap<(S, char), S>,
    accepting: BTreeSet<S>,
}

impl<S: Clone + Ord + Debug> DFA<S> {
    /// Build a DFA from its parts, checking the structural invariants.
    pub fn new(
        alphabet: BTreeSet<char>,
        states: BTreeSet<S>,
        start: S,
        transitions: BTreeMap<(S, char), S>,
        accepting: BTreeSet<S>,
    ) -> Result<DFA<S>, BuildError> {
        if !states.contains(&start) {
            return Err(BuildError::unknown_state(&start, "initial state"));
        }
        if let Some(s) = accepting.iter().find(|&s| !states.contains(s)) {
            return Err(BuildError::unknown_state(s, "accepting state"));
        }
        for ((from, c), to) in transitions.iter() {
            if !states.contains(from) {
                return Err(BuildError::unknown_state(from, "transition source"));
            }
            if !alphabet.contains(c) {
                return Err(BuildError::unknown_symbol(*c));
            }
            if !states.contains(to) {
                return Err(BuildError::unknown_state(to, "transition target"));
            }
        }
        Ok(DFA { alphabet, states, start, transitions, accepting })
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn states(&self) -> &BTreeSet<S> {
        &self.states
    }

    pub fn state_len(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> &S {
        &self.start
    }

    pub fn accepting(&self) -> &BTreeSet<S> {
        &self.accepting
    }

    pub fn is_accepting(&self, state: &S) -> bool {
        self.accepting.contains(state)
    }

    /// The successor of `from` on `c`, if the transition is defined.
    pub fn next_state(&self, from: &S, c: char) -> Option<&S> {
        self.transitions.get(&(from.clone(), c))
    }

    /// Every transition as a `(from, symbol, to)` triple, in order.
    pub fn transitions(&self) -> impl Iterator<Item = (&S, char, &S)> + '_ {
        self.transitions.iter().map(|((from, c), to)| (from, *c, to))
    }

    pub fn transition_len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if every state has a transition on every symbol.
    pub fn is_total(&self) -> bool {
        self.transitions.len() == self.states.len() * self.alphabet.len()
    }

    /// Returns true if the DFA accepts exactly `word`.
    ///
    /// A symbol outside the alphabet, or any undefined transition, rejects.
    pub fn accepts(&self, word: &str) -> bool {
        let mut current = &self.start;
        for c in word.chars() {
            match self.next_state(current, c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_accepting(current)
    }

    /// The states reachable from the initial state, found by breadth first
    /// search.
    pub fn reachable(&self) -> BTreeSet<S> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.start.clone());
        queue.push_back(self.start.clone());
        while let Some(state) = queue.pop_front() {
            for &c in self.alphabet.iter() {
                if let Some(next) = self.next_state(&state, c) {
                    if seen.insert(next.clone()) {
                        queue.push_back(next.clone());
                    }
                }
            }
        }
        seen
    }

    /// Rename every state through `f`.
    ///
    /// This fails if `f` maps two distinct states to the same name, since
    /// that would merge states and could change the language.
    pub fn map_states<T, F>(&self, mut f: F) -> Result<DFA<T>, BuildError>
    where
        T: Clone + Ord + Debug,
        F: FnMut(&S) -> T,
    {
        let renamed: BTreeMap<&S, T> =
            self.states.iter().map(|s| (s, f(s))).collect();
        let states: BTreeSet<T> = renamed.values().cloned().collect();
        if states.len() != renamed.len() {
            return Err(BuildError::non_injective_remap());
        }
        let name = |s: &S| -> Result<T, BuildError> {
            renamed
                .get(s)
                .cloned()
                .ok_or_else(|| BuildError::unknown_state(s, "renamed state"))
        };
        let mut transitions = BTreeMap::new();
        for ((from, c), to) in self.transitions.iter() {
            transitions.insert((name(from)?, *c), name(to)?);
        }
        let accepting = self
            .accepting
            .iter()
            .map(|s| name(s))
            .collect::<Result<BTreeSet<T>, BuildError>>()?;
        DFA::new(
            self.alphabet.clone(),
            states,
            name(&self.start)?,
            transitions,
            accepting,
        )
    }

    /// Rename states to `0..n` in the order of the state set.
    pub fn relabel(&self) -> DFA<StateId> {
        let index: BTreeMap<&S, StateId> =
            self.states.iter().enumerate().map(|(i, s)| (s, i)).collect();
        // DFA::new checked that every endpoint is in `states`.
        let id = |s: &S| index[s];
        DFA {
            alphabet: self.alphabet.clone(),
            states: (0..self.states.len()).collect(),
            start: id(&self.start),
            transitions: self
                .transitions
                .iter()
                .map(|((from, c), to)| ((id(from), *c), id(to)))
                .collect(),
            accepting: self.accepting.iter().map(id).collect(),
        }
    }

    /// Return an equivalent DFA with the fewest states.
    ///
    /// See [`minimize`](crate::minimize::minimize).
    pub fn minimize(&self) -> Result<DFA<S>, BuildError> {
        crate::minimize::minimize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    fn ids(ids: &[StateId]) -> BTreeSet<StateId> {
        ids.iter().copied().collect()
    }

    // Accepts a(ba)*, over {a, b, c}. State 3 is unreachable.
    fn sample() -> DFA {
        let mut transitions = BTreeMap::new();
        transitions.insert((0, 'a'), 1);
        transitions.insert((1, 'b'), 2);
        transitions.insert((2, 'a'), 1);
        transitions.insert((3, 'c'), 0);
        DFA::new(chars("abc"), ids(&[0, 1, 2, 3]), 0, transitions, ids(&[1]))
            .unwrap()
    }

    #[test]
    fn accepts() {
        let dfa = sample();
        assert!(dfa.accepts("a"));
        assert!(dfa.accepts("aba"));
        assert!(!dfa.accepts(""));
        assert!(!dfa.accepts("ab"));
        assert!(!dfa.accepts("ac"));
        assert!(!dfa.accepts("x"));
    }

    #[test]
    fn reachable() {
        assert_eq!(sample().reachable(), ids(&[0, 1, 2]));
    }

    #[test]
    fn partiality() {
        let dfa = sample();
        assert!(!dfa.is_total());
        assert_eq!(dfa.next_state(&1, 'a'), None);
        assert_eq!(dfa.next_state(&1, 'b'), Some(&2));
        assert_eq!(dfa.transition_len(), 4);
    }

    #[test]
    fn map_states() {
        let dfa = sample();
        let shifted = dfa.map_states(|s| s + 10).unwrap();
        assert_eq!(shifted.start(), &10);
        assert_eq!(shifted.accepting(), &ids(&[11]));
        assert_eq!(shifted.next_state(&12, 'a'), Some(&11));
        assert!(shifted.accepts("aba"));

        let err = dfa.map_states(|s| s / 2).unwrap_err();
        assert_eq!(err.kind(), &crate::BuildErrorKind::NonInjectiveRemap);
    }

    #[test]
    fn relabel() {
        let dfa = sample().map_states(|s| format!("q{}", s)).unwrap();
        let dense = dfa.relabel();
        assert_eq!(dense, sample());
    }

    #[test]
    fn relabel_sparse_states() {
        let mut transitions = BTreeMap::new();
        transitions.insert((30, 'a'), 10);
        transitions.insert((10, 'b'), 20);
        let dfa =
            DFA::new(chars("ab"), ids(&[10, 20, 30]), 30, transitions, ids(&[20]))
                .unwrap();
        let dense = dfa.relabel();
        assert_eq!(dense.states(), &ids(&[0, 1, 2]));
        assert_eq!(dense.start(), &2);
        assert_eq!(dense.next_state(&2, 'a'), Some(&0));
        assert_eq!(dense.next_state(&0, 'b'), Some(&1));
        assert_eq!(dense.next_state(&1, 'a'), None);
        assert!(dense.is_accepting(&1));
        assert!(dense.accepts("ab"));
    }

    #[test]
    fn invariants_are_checked() {
        let mut transitions = BTreeMap::new();
        transitions.insert((0, 'a'), 5);
        let err = DFA::new(chars("a"), ids(&[0]), 0, transitions, ids(&[]))
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::BuildErrorKind::UnknownState { role: "transition target", .. }
        ));

        let mut transitions = BTreeMap::new();
        transitions.insert((0, 'b'), 0);
        let err = DFA::new(chars("a"), ids(&[0]), 0, transitions, ids(&[]))
            .unwrap_err();
        assert_eq!(
            err.kind(),
            &crate::BuildErrorKind::UnknownSymbol { symbol: 'b' }
        );

        let err = DFA::new(chars("a"), ids(&[0]), 0, BTreeMap::new(), ids(&[1]))
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::BuildErrorKind::UnknownState { role: "accepting state", .. }
        ));
    }
}
