/*!
Finite automata for relex patterns.

This crate turns a parsed [`relex_syntax`] expression into a recognizer in
three stages, each a pure function of the previous stage's output:

1. [`Compiler`] performs Thompson construction, producing an [`NFA`] with
   epsilon transitions.
2. [`determinize`](determinize::determinize) performs subset construction,
   producing a [`DFA`] whose states are epsilon-closed sets of NFA states.
3. [`minimize`](minimize::minimize) merges equivalent DFA states with
   Hopcroft's partition refinement algorithm.

DFAs here are allowed to be partial. A missing transition rejects, and no
stage ever adds a dead state to make a DFA total.

# Example

```
use relex_automata::{determinize::determinize, Compiler};

let nfa = Compiler::new().build("(a|b)*abb")?;
let dfa = determinize(&nfa)?;
let min = dfa.minimize()?;

assert!(nfa.accepts("babb"));
assert!(dfa.accepts("babb"));
assert!(min.accepts("babb"));
assert!(!min.accepts("abba"));
assert!(min.state_len() <= dfa.state_len());
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **logging** - Emit debug messages about the size of each automaton built
  through the `log` crate.
*/

#![deny(missing_docs)]

#[macro_use]
mod macros;

#[allow(missing_docs)]
pub mod compiler;
#[allow(missing_docs)]
pub mod dfa;
pub mod determinize;
pub mod equivalence;
pub mod matcher;
pub mod minimize;
#[allow(missing_docs)]
pub mod nfa;

mod error;

pub use crate::{
    compiler::Compiler,
    dfa::DFA,
    error::{AlphabetMismatch, BuildError, BuildErrorKind},
    matcher::Matcher,
    nfa::{Configuration, NFA, StateAllocator, StateId, Symbol},
};
