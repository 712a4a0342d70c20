//! Subset construction: converts an NFA into an equivalent DFA.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    dfa::DFA,
    error::BuildError,
    nfa::{Configuration, NFA},
};

/// Converts an NFA into a DFA by subset construction.
///
/// Each DFA state is a [`Configuration`]: an epsilon-closed set of NFA
/// states. The initial state is the closure of the NFA's initial state, and
/// a configuration accepts when it contains an accepting NFA state.
///
/// Only configurations reachable from the initial one are built. A symbol
/// that leads nowhere from a configuration gets no transition at all, so the
/// result is usually partial and never contains the empty configuration.
#[derive(Clone, Debug, Default)]
pub struct Determinizer {
    state_limit: Option<usize>,
}

impl Determinizer {
    /// Create a new determinizer with no state limit.
    pub fn new() -> Determinizer {
        Determinizer::default()
    }

    /// Set a limit on the number of DFA states subset construction may
    /// create.
    ///
    /// Subset construction can take exponential time and space in the size
    /// of the NFA. When the limit is exceeded, construction stops and returns
    /// an error. By default there is no limit.
    pub fn state_limit(&mut self, limit: Option<usize>) -> &mut Determinizer {
        self.state_limit = limit;
        self
    }

    /// Run subset construction on the given NFA.
    pub fn run(&self, nfa: &NFA) -> Result<DFA<Configuration>, BuildError> {
        let start = nfa.epsilon_closure(nfa.start());
        let mut states = BTreeSet::new();
        let mut transitions = BTreeMap::new();
        let mut uncompiled = vec![];

        self.add_state(&mut states, start.clone())?;
        uncompiled.push(start.clone());
        while let Some(config) = uncompiled.pop() {
            for &c in nfa.alphabet().iter() {
                let moved = nfa.step(&config, c);
                if moved.is_empty() {
                    continue;
                }
                let next = nfa.epsilon_closure_of(moved);
                if !states.contains(&next) {
                    self.add_state(&mut states, next.clone())?;
                    uncompiled.push(next.clone());
                }
                transitions.insert((config.clone(), c), next);
            }
        }

        let accepting = states
            .iter()
            .filter(|config| nfa.is_accepting_configuration(config))
            .cloned()
            .collect();
        let dfa =
            DFA::new(nfa.alphabet().clone(), states, start, transitions, accepting)?;
        debug!(
            "determinized {} NFA states into {} DFA states",
            nfa.state_len(),
            dfa.state_len()
        );
        Ok(dfa)
    }

    fn add_state(
        &self,
        states: &mut BTreeSet<Configuration>,
        config: Configuration,
    ) -> Result<(), BuildError> {
        if let Some(limit) = self.state_limit {
            if states.len() >= limit {
                return Err(BuildError::too_many_states(limit));
            }
        }
        trace!("new DFA state {:?}", config);
        states.insert(config);
        Ok(())
    }
}

/// Run subset construction with the default configuration.
pub fn determinize(nfa: &NFA) -> Result<DFA<Configuration>, BuildError> {
    Determinizer::new().run(nfa)
}
