//! Thompson simulation of an NFA over an input string.

use crate::nfa::{Configuration, NFA};

/// Executes an NFA against input by tracking the set of live states.
///
/// This is the classic Thompson simulation: the current configuration is
/// always epsilon-closed, and each input symbol moves every live state at
/// once. It never backtracks, so it runs in time proportional to the input
/// length times the number of NFA states.
#[derive(Clone, Debug)]
pub struct Matcher<'a> {
    nfa: &'a NFA,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA.
    pub fn new(nfa: &'a NFA) -> Matcher<'a> {
        Matcher { nfa }
    }

    /// Returns true if the NFA accepts the whole input.
    pub fn is_match(&self, input: &str) -> bool {
        let mut current = self.start();
        for c in input.chars() {
            current = self.advance(&current, c);
            if current.is_empty() {
                return false;
            }
        }
        self.nfa.is_accepting_configuration(&current)
    }

    /// Returns the length in bytes of the longest prefix of `input` that the
    /// NFA accepts, or `None` if it accepts no prefix at all (not even the
    /// empty one).
    pub fn longest_prefix(&self, input: &str) -> Option<usize> {
        let mut current = self.start();
        let mut longest =
            self.nfa.is_accepting_configuration(&current).then_some(0);
        for (at, c) in input.char_indices() {
            current = self.advance(&current, c);
            if current.is_empty() {
                break;
            }
            if self.nfa.is_accepting_configuration(&current) {
                longest = Some(at + c.len_utf8());
            }
        }
        longest
    }

    fn start(&self) -> Configuration {
        self.nfa.epsilon_closure(self.nfa.start())
    }

    fn advance(&self, current: &Configuration, c: char) -> Configuration {
        self.nfa.epsilon_closure_of(self.nfa.step(current, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    fn nfa(pattern: &str) -> NFA {
        Compiler::new().build(pattern).unwrap()
    }

    #[test]
    fn simple_match() {
        let nfa = nfa("ab");
        let matcher = Matcher::new(&nfa);

        assert!(matcher.is_match("ab"));
        assert!(!matcher.is_match("ac"));
        assert!(!matcher.is_match("a"));
        assert!(!matcher.is_match("abb"));
    }

    #[test]
    fn simple_char_match() {
        let nfa = nfa("a");
        let matcher = Matcher::new(&nfa);

        assert!(matcher.is_match("a"));
        assert!(!matcher.is_match("b"));
        assert!(!matcher.is_match(""));
    }

    #[test]
    fn class_match() {
        let nfa = nfa("[a-c]");
        let matcher = Matcher::new(&nfa);

        assert!(matcher.is_match("a"));
        assert!(matcher.is_match("c"));
        assert!(!matcher.is_match("d"));
        assert!(!matcher.is_match(""));
        assert!(!matcher.is_match("ab"));
    }

    #[test]
    fn empty_match() {
        let nfa = nfa("a*");
        let matcher = Matcher::new(&nfa);

        assert!(matcher.is_match(""));
        assert!(matcher.is_match("aaaa"));
        assert!(!matcher.is_match("ab"));
    }

    #[test]
    fn longest_prefix() {
        let nfa = nfa("ab*");
        let matcher = Matcher::new(&nfa);

        assert_eq!(matcher.longest_prefix("abbbc"), Some(4));
        assert_eq!(matcher.longest_prefix("a"), Some(1));
        assert_eq!(matcher.longest_prefix("ba"), None);
        assert_eq!(matcher.longest_prefix(""), None);

        let nfa = self::nfa("a?");
        let matcher = Matcher::new(&nfa);
        assert_eq!(matcher.longest_prefix("b"), Some(0));
    }

    #[test]
    fn longest_prefix_counts_bytes() {
        let nfa = nfa("é+");
        let matcher = Matcher::new(&nfa);

        assert_eq!(matcher.longest_prefix("ééx"), Some(4));
    }
}
