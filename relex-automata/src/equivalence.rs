/*!
Language comparisons between DFAs.

Both helpers walk the product of two automata from their initial states. A
transition missing from the right hand automaton is treated as a move to an
implicit rejecting sink, which is the complement of a partial DFA. Neither
automaton is modified and no sink state is ever materialized.
*/

use std::collections::{BTreeSet, VecDeque};
use std::fmt::Debug;

use crate::{dfa::DFA, error::AlphabetMismatch};

/// Returns true if every word accepted by `a` is accepted by `b`.
///
/// This checks that the product of `a` and the complement of `b` has no
/// reachable accepting state. Both automata must have the same alphabet.
pub fn is_subset<S, T>(a: &DFA<S>, b: &DFA<T>) -> Result<bool, AlphabetMismatch>
where
    S: Clone + Ord + Debug,
    T: Clone + Ord + Debug,
{
    check_alphabets(a, b)?;

    let start = (a.start().clone(), Some(b.start().clone()));
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start.clone());
    queue.push_back(start);
    while let Some((p, q)) = queue.pop_front() {
        let right_accepts = q.as_ref().map_or(false, |q| b.is_accepting(q));
        if a.is_accepting(&p) && !right_accepts {
            return Ok(false);
        }
        for &c in a.alphabet().iter() {
            // Once the left side has no transition it can never accept again,
            // so there is nothing to find down this path.
            let p2 = match a.next_state(&p, c) {
                Some(p2) => p2,
                None => continue,
            };
            let q2 = q.as_ref().and_then(|q| b.next_state(q, c));
            let next = (p2.clone(), q2.cloned());
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    Ok(true)
}

/// Returns true if `a` and `b` accept exactly the same language.
pub fn equivalent<S, T>(a: &DFA<S>, b: &DFA<T>) -> Result<bool, AlphabetMismatch>
where
    S: Clone + Ord + Debug,
    T: Clone + Ord + Debug,
{
    Ok(is_subset(a, b)? && is_subset(b, a)?)
}

/// Returns true if `dfa` accepts no word at all.
pub fn is_empty<S: Clone + Ord + Debug>(dfa: &DFA<S>) -> bool {
    dfa.reachable().iter().all(|s| !dfa.is_accepting(s))
}

fn check_alphabets<S, T>(a: &DFA<S>, b: &DFA<T>) -> Result<(), AlphabetMismatch>
where
    S: Clone + Ord + Debug,
    T: Clone + Ord + Debug,
{
    if a.alphabet() != b.alphabet() {
        return Err(AlphabetMismatch {
            left: a.alphabet().clone(),
            right: b.alphabet().clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compiler::Compiler, determinize::determinize, nfa::Configuration};

    fn dfa(pattern: &str) -> DFA<Configuration> {
        determinize(&Compiler::new().build(pattern).unwrap()).unwrap()
    }

    #[test]
    fn equal_languages() {
        assert!(equivalent(&dfa("(a|b)*"), &dfa("(a*b*)*")).unwrap());
        assert!(equivalent(&dfa("a(ba)*"), &dfa("(ab)*a")).unwrap());
        assert!(equivalent(&dfa("[ab]+"), &dfa("(a|b)(a|b)*")).unwrap());
    }

    #[test]
    fn unequal_languages() {
        assert!(!equivalent(&dfa("a*b"), &dfa("a+b")).unwrap());
        assert!(!equivalent(&dfa("ab|ba"), &dfa("ab|ab")).unwrap());
    }

    #[test]
    fn subset() {
        assert!(is_subset(&dfa("a+b"), &dfa("a*b")).unwrap());
        assert!(!is_subset(&dfa("a*b"), &dfa("a+b")).unwrap());
    }

    #[test]
    fn minimized_is_equivalent() {
        let original = dfa("(a|b)*abb(a|b)*");
        let min = original.minimize().unwrap();
        assert!(min.state_len() <= original.state_len());
        assert!(equivalent(&original, &min).unwrap());
        assert!(equivalent(&original, &min.relabel()).unwrap());
    }

    #[test]
    fn alphabet_mismatch() {
        let err = equivalent(&dfa("a|b"), &dfa("a|c")).unwrap_err();
        assert_eq!(err.left(), &['a', 'b'].into_iter().collect::<BTreeSet<_>>());
        assert_eq!(err.right(), &['a', 'c'].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn empty() {
        let nfa = Compiler::new().build("a").unwrap();
        assert!(!is_empty(&determinize(&nfa).unwrap()));

        let dead = DFA::new(
            ['a'].into_iter().collect(),
            [0usize, 1].into_iter().collect(),
            0,
            std::iter::once(((0, 'a'), 0)).collect(),
            [1usize].into_iter().collect(),
        )
        .unwrap();
        assert!(is_empty(&dead));
    }
}
