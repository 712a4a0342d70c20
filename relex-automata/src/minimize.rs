//! DFA minimization by partition refinement.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use crate::{dfa::DFA, error::BuildError};

/// Return an equivalent DFA with the fewest states, using Hopcroft's
/// algorithm.
///
/// The result accepts exactly the same language as `dfa` and never has more
/// states. Each state of the result is named after the smallest member of the
/// group of original states it stands for, so minimizing an already minimal
/// DFA returns an identical DFA.
///
/// Transition functions are treated as partial. Refinement only follows
/// transitions that exist, and no dead state is added to make the DFA total.
/// Unreachable states are kept.
pub fn minimize<S: Clone + Ord + Debug>(
    dfa: &DFA<S>,
) -> Result<DFA<S>, BuildError> {
    Minimizer::new(dfa)?.run()
}

/// The state of one run of Hopcroft's algorithm.
///
/// The algorithm is mostly taken from Wikipedia:
/// https://en.wikipedia.org/wiki/DFA_minimization#Hopcroft's_algorithm
///
/// States are referred to by their position in the DFA's ordered state set,
/// and symbols by their position in the ordered alphabet.
struct Minimizer<'a, S> {
    dfa: &'a DFA<S>,
    states: Vec<&'a S>,
    /// For each state and symbol, the states with a transition on that symbol
    /// into the state.
    in_transitions: Vec<Vec<Vec<usize>>>,
    /// The current partition. Each block is kept sorted.
    partitions: Vec<Vec<usize>>,
    /// The block each state currently belongs to.
    block_of: Vec<usize>,
    /// Blocks still to be used as splitters.
    waiting: Vec<usize>,
    in_waiting: Vec<bool>,
}

impl<'a, S: Clone + Ord + Debug> Minimizer<'a, S> {
    fn new(dfa: &'a DFA<S>) -> Result<Minimizer<'a, S>, BuildError> {
        let states: Vec<&S> = dfa.states().iter().collect();
        let index: BTreeMap<&S, usize> =
            states.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        let symbols: BTreeMap<char, usize> =
            dfa.alphabet().iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let mut in_transitions =
            vec![vec![vec![]; symbols.len()]; states.len()];
        for (from, c, to) in dfa.transitions() {
            let from = *index
                .get(from)
                .ok_or_else(|| BuildError::unknown_state(from, "transition source"))?;
            let to = *index
                .get(to)
                .ok_or_else(|| BuildError::unknown_state(to, "transition target"))?;
            let sym =
                *symbols.get(&c).ok_or_else(|| BuildError::unknown_symbol(c))?;
            in_transitions[to][sym].push(from);
        }

        let (accepting, rejecting): (Vec<usize>, Vec<usize>) =
            (0..states.len()).partition(|&i| dfa.is_accepting(states[i]));
        let partitions: Vec<Vec<usize>> = [accepting, rejecting]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();
        let mut block_of = vec![0; states.len()];
        for (block, members) in partitions.iter().enumerate() {
            for &s in members.iter() {
                block_of[s] = block;
            }
        }
        let waiting = (0..partitions.len()).collect();
        let in_waiting = vec![true; partitions.len()];
        Ok(Minimizer {
            dfa,
            states,
            in_transitions,
            partitions,
            block_of,
            waiting,
            in_waiting,
        })
    }

    fn run(mut self) -> Result<DFA<S>, BuildError> {
        let symbol_len = self.dfa.alphabet().len();
        let mut incoming: Vec<usize> = vec![];
        let mut marked = vec![false; self.states.len()];
        let mut touched: BTreeMap<usize, Vec<usize>> = BTreeMap::new();

        while let Some(set) = self.waiting.pop() {
            self.in_waiting[set] = false;
            // The splitter may itself be split below, so work on a snapshot.
            let splitter = self.partitions[set].clone();
            for sym in 0..symbol_len {
                self.find_incoming_to(sym, &splitter, &mut incoming);
                // No state moves into the splitter on this symbol, so no
                // block can be split by it.
                if incoming.is_empty() {
                    continue;
                }

                touched.clear();
                for &s in incoming.iter() {
                    marked[s] = true;
                    touched.entry(self.block_of[s]).or_default().push(s);
                }
                for (&block, inside) in touched.iter_mut() {
                    if inside.len() == self.partitions[block].len() {
                        continue;
                    }
                    let outside: Vec<usize> = self.partitions[block]
                        .iter()
                        .copied()
                        .filter(|&s| !marked[s])
                        .collect();
                    let new = self.partitions.len();
                    for &s in outside.iter() {
                        self.block_of[s] = new;
                    }
                    self.partitions[block] = std::mem::take(inside);
                    self.partitions.push(outside);
                    self.in_waiting.push(false);

                    if self.in_waiting[block] {
                        self.push_waiting(new);
                    } else if self.partitions[block].len()
                        <= self.partitions[new].len()
                    {
                        self.push_waiting(block);
                    } else {
                        self.push_waiting(new);
                    }
                }
                for &s in incoming.iter() {
                    marked[s] = false;
                }
            }
        }
        debug!(
            "minimized {} DFA states into {} states",
            self.states.len(),
            self.partitions.len()
        );
        self.quotient()
    }

    /// Collect into `incoming` every state with a transition on `sym` into a
    /// member of `set`, sorted and without duplicates.
    fn find_incoming_to(&self, sym: usize, set: &[usize], incoming: &mut Vec<usize>) {
        incoming.clear();
        for &s in set.iter() {
            incoming.extend_from_slice(&self.in_transitions[s][sym]);
        }
        incoming.sort_unstable();
        incoming.dedup();
    }

    fn push_waiting(&mut self, block: usize) {
        self.waiting.push(block);
        self.in_waiting[block] = true;
    }

    /// Build the DFA whose states are the blocks of the final partition.
    fn quotient(&self) -> Result<DFA<S>, BuildError> {
        let mut representatives: Vec<&S> = Vec::with_capacity(self.partitions.len());
        for block in self.partitions.iter() {
            // Blocks are sorted, so the first member is the smallest.
            let &first = block.first().ok_or_else(BuildError::empty_block)?;
            representatives.push(self.states[first]);
        }
        let index: BTreeMap<&S, usize> =
            self.states.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        let rep = |s: &S| -> Result<S, BuildError> {
            let i = index
                .get(s)
                .ok_or_else(|| BuildError::unknown_state(s, "minimized state"))?;
            Ok(representatives[self.block_of[*i]].clone())
        };

        let states: BTreeSet<S> =
            representatives.iter().map(|&s| s.clone()).collect();
        let mut transitions = BTreeMap::new();
        for (from, c, to) in self.dfa.transitions() {
            transitions.insert((rep(from)?, c), rep(to)?);
        }
        let accepting = self
            .dfa
            .accepting()
            .iter()
            .map(|s| rep(s))
            .collect::<Result<BTreeSet<S>, BuildError>>()?;
        DFA::new(
            self.dfa.alphabet().clone(),
            states,
            rep(self.dfa.start())?,
            transitions,
            accepting,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compiler::Compiler, determinize::determinize, nfa::StateId};

    fn dfa<S: Clone + Ord + Debug>(
        alphabet: &str,
        states: &[S],
        start: S,
        transitions: &[(S, char, S)],
        accepting: &[S],
    ) -> DFA<S> {
        DFA::new(
            alphabet.chars().collect(),
            states.iter().cloned().collect(),
            start,
            transitions
                .iter()
                .map(|(from, c, to)| ((from.clone(), *c), to.clone()))
                .collect(),
            accepting.iter().cloned().collect(),
        )
        .unwrap()
    }

    #[test]
    fn no_accepting_no_transitions() {
        let input: DFA<StateId> = dfa("a", &[0, 1], 0, &[], &[]);
        let min = minimize(&input).unwrap();
        assert_eq!(min.state_len(), 1);
        assert_eq!(min.start(), &0);
        assert!(min.accepting().is_empty());
        assert_eq!(min.transition_len(), 0);
    }

    #[test]
    fn textbook() {
        // {a, b} and {c, d, e} are equivalent groups, f is a trap.
        let input = dfa(
            "01",
            &['a', 'b', 'c', 'd', 'e', 'f'],
            'a',
            &[
                ('a', '0', 'b'),
                ('a', '1', 'c'),
                ('b', '0', 'a'),
                ('b', '1', 'd'),
                ('c', '0', 'e'),
                ('c', '1', 'f'),
                ('d', '0', 'e'),
                ('d', '1', 'f'),
                ('e', '0', 'e'),
                ('e', '1', 'f'),
                ('f', '0', 'f'),
                ('f', '1', 'f'),
            ],
            &['c', 'd', 'e'],
        );
        let expected = dfa(
            "01",
            &['a', 'c', 'f'],
            'a',
            &[
                ('a', '0', 'a'),
                ('a', '1', 'c'),
                ('c', '0', 'c'),
                ('c', '1', 'f'),
                ('f', '0', 'f'),
                ('f', '1', 'f'),
            ],
            &['c'],
        );
        assert_eq!(minimize(&input).unwrap(), expected);
    }

    #[test]
    fn partial() {
        // ab|cb
        let input: DFA<StateId> = dfa(
            "abc",
            &[0, 1, 2, 3, 4],
            0,
            &[(0, 'a', 1), (0, 'c', 2), (1, 'b', 3), (2, 'b', 4)],
            &[3, 4],
        );
        let expected = dfa(
            "abc",
            &[0, 1, 3],
            0,
            &[(0, 'a', 1), (0, 'c', 1), (1, 'b', 3)],
            &[3],
        );
        let min = minimize(&input).unwrap();
        assert_eq!(min, expected);
        assert!(!min.is_total());
    }

    #[test]
    fn missing_transition_is_not_a_dead_state() {
        // 1 has an explicit transition to a rejecting state and 2 has none.
        // Both reject everything, but only explicit transitions are compared,
        // so they stay apart.
        let input: DFA<StateId> = dfa(
            "a",
            &[0, 1, 2, 3],
            0,
            &[(0, 'a', 1), (1, 'a', 3)],
            &[],
        );
        let min = minimize(&input).unwrap();
        assert!(min.state_len() < input.state_len());
        assert!(min.next_state(&1, 'a').is_some());
    }

    #[test]
    fn exactly_two_cs() {
        let nfa = Compiler::new().build("(a|b)*c(a|b)*c(a|b)*").unwrap();
        let dfa = determinize(&nfa).unwrap();
        let min = minimize(&dfa).unwrap();
        assert!(min.state_len() <= dfa.state_len());
        assert_eq!(min.state_len(), 3);
        for word in ["cc", "abcabcab", "acbc", "ccab"] {
            assert!(min.accepts(word), "{:?}", word);
        }
        for word in ["", "abc", "c", "ccc", "cacbc"] {
            assert!(!min.accepts(word), "{:?}", word);
        }
    }

    #[test]
    fn idempotent() {
        for pattern in ["(a|b)*abb", "a*b*", "[abc]+|ab", "(ab|a)(bc|c)"] {
            let nfa = Compiler::new().build(pattern).unwrap();
            let once = minimize(&determinize(&nfa).unwrap()).unwrap();
            let twice = minimize(&once).unwrap();
            assert_eq!(once, twice, "pattern {:?}", pattern);
        }
    }

    #[test]
    fn keeps_unreachable_states() {
        let input: DFA<StateId> =
            dfa("a", &[0, 1, 2], 0, &[(0, 'a', 1), (2, 'a', 1)], &[1]);
        let min = minimize(&input).unwrap();
        // 0 and 2 are equivalent, so only the unreachable name disappears.
        assert_eq!(min.state_len(), 2);
        assert_eq!(min.reachable().len(), 2);
    }

    /// A small random DFA over {a, b}, usually partial, possibly with dead
    /// and unreachable states.
    #[derive(Clone, Debug)]
    struct ArbDFA(DFA<StateId>);

    impl quickcheck::Arbitrary for ArbDFA {
        fn arbitrary(g: &mut quickcheck::Gen) -> ArbDFA {
            use quickcheck::Arbitrary;

            let n = 1 + usize::arbitrary(g) % 6;
            let alphabet: BTreeSet<char> = ['a', 'b'].into_iter().collect();
            let mut transitions = BTreeMap::new();
            for s in 0..n {
                for &c in alphabet.iter() {
                    if bool::arbitrary(g) {
                        transitions.insert((s, c), usize::arbitrary(g) % n);
                    }
                }
            }
            let accepting = (0..n).filter(|_| bool::arbitrary(g)).collect();
            ArbDFA(
                DFA::new(alphabet, (0..n).collect(), 0, transitions, accepting)
                    .unwrap(),
            )
        }
    }

    #[test]
    fn random_dfas() {
        fn prop(dfa: ArbDFA) -> bool {
            let min = minimize(&dfa.0).unwrap();
            min.state_len() <= dfa.0.state_len()
                && crate::equivalence::equivalent(&dfa.0, &min).unwrap()
                && minimize(&min).unwrap() == min
        }
        quickcheck::QuickCheck::new()
            .tests(2_000)
            .quickcheck(prop as fn(ArbDFA) -> bool);
    }
}
