/*!
The abstract syntax tree produced by the parser.

The tree is a closed set of node kinds. Every consumer (the Thompson compiler
in particular) matches on it exhaustively, so adding a node kind is a compile
error everywhere it needs handling.
*/

use std::collections::BTreeSet;

/// A regular expression over single symbols.
///
/// Nodes own their children, so a tree can never contain sharing or cycles.
/// Dropping, cloning and comparing trees use a heap allocated stack instead
/// of recursion, so arbitrarily deep trees can be handled without exhausting
/// the call stack. The `Debug` impl is derived and does recurse.
#[derive(Debug)]
pub enum Regex {
    /// Matches exactly one occurrence of the symbol.
    Literal(char),
    /// Matches the empty string.
    Epsilon,
    /// Matches the left expression followed by the right expression.
    Concatenation(Box<Regex>, Box<Regex>),
    /// Matches either the left or the right expression.
    Alternation(Box<Regex>, Box<Regex>),
    /// Matches zero or more repetitions of the inner expression.
    KleeneStar(Box<Regex>),
    /// Matches one or more repetitions of the inner expression.
    Plus(Box<Regex>),
    /// Matches the inner expression or the empty string. Equivalent to
    /// `Alternation(inner, Epsilon)`.
    Question(Box<Regex>),
    /// Matches any single symbol in the set.
    CharacterClass(BTreeSet<char>),
}

impl Regex {
    pub fn literal(c: char) -> Regex {
        Regex::Literal(c)
    }

    pub fn concat(left: Regex, right: Regex) -> Regex {
        Regex::Concatenation(Box::new(left), Box::new(right))
    }

    pub fn alternate(left: Regex, right: Regex) -> Regex {
        Regex::Alternation(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Regex) -> Regex {
        Regex::KleeneStar(Box::new(inner))
    }

    pub fn plus(inner: Regex) -> Regex {
        Regex::Plus(Box::new(inner))
    }

    pub fn question(inner: Regex) -> Regex {
        Regex::Question(Box::new(inner))
    }

    pub fn class<I: IntoIterator<Item = char>>(chars: I) -> Regex {
        Regex::CharacterClass(chars.into_iter().collect())
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        match *self {
            Regex::Literal(_) | Regex::Epsilon | Regex::CharacterClass(_) => {
                true
            }
            Regex::Concatenation(..)
            | Regex::Alternation(..)
            | Regex::KleeneStar(_)
            | Regex::Plus(_)
            | Regex::Question(_) => false,
        }
    }

    /// The set of every symbol mentioned anywhere in the expression.
    pub fn alphabet(&self) -> BTreeSet<char> {
        let mut alphabet = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match *node {
                Regex::Literal(c) => {
                    alphabet.insert(c);
                }
                Regex::Epsilon => {}
                Regex::CharacterClass(ref set) => {
                    alphabet.extend(set.iter().copied());
                }
                Regex::Concatenation(ref l, ref r)
                | Regex::Alternation(ref l, ref r) => {
                    stack.push(r);
                    stack.push(l);
                }
                Regex::KleeneStar(ref e)
                | Regex::Plus(ref e)
                | Regex::Question(ref e) => stack.push(e),
            }
        }
        alphabet
    }

    /// The height of the tree. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            match *node {
                Regex::Concatenation(ref l, ref r)
                | Regex::Alternation(ref l, ref r) => {
                    stack.push((r, depth + 1));
                    stack.push((l, depth + 1));
                }
                Regex::KleeneStar(ref e)
                | Regex::Plus(ref e)
                | Regex::Question(ref e) => stack.push((e, depth + 1)),
                _ => {}
            }
        }
        max
    }
}

impl Clone for Regex {
    fn clone(&self) -> Regex {
        let mut copy = Regex::Epsilon;
        let mut stack = vec![(self, &mut copy)];
        while let Some((src, dst)) = stack.pop() {
            // Children start out as placeholders and are filled in when
            // their pair is popped.
            *dst = match *src {
                Regex::Literal(c) => Regex::Literal(c),
                Regex::Epsilon => Regex::Epsilon,
                Regex::CharacterClass(ref set) => {
                    Regex::CharacterClass(set.clone())
                }
                Regex::Concatenation(..) => Regex::Concatenation(
                    Box::new(Regex::Epsilon),
                    Box::new(Regex::Epsilon),
                ),
                Regex::Alternation(..) => Regex::Alternation(
                    Box::new(Regex::Epsilon),
                    Box::new(Regex::Epsilon),
                ),
                Regex::KleeneStar(_) => {
                    Regex::KleeneStar(Box::new(Regex::Epsilon))
                }
                Regex::Plus(_) => Regex::Plus(Box::new(Regex::Epsilon)),
                Regex::Question(_) => {
                    Regex::Question(Box::new(Regex::Epsilon))
                }
            };
            match (src, dst) {
                (Regex::Concatenation(sl, sr), Regex::Concatenation(dl, dr))
                | (Regex::Alternation(sl, sr), Regex::Alternation(dl, dr)) => {
                    stack.push((&**sr, &mut **dr));
                    stack.push((&**sl, &mut **dl));
                }
                (Regex::KleeneStar(s), Regex::KleeneStar(d))
                | (Regex::Plus(s), Regex::Plus(d))
                | (Regex::Question(s), Regex::Question(d)) => {
                    stack.push((&**s, &mut **d));
                }
                _ => {}
            }
        }
        copy
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Regex) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            match (a, b) {
                (Regex::Literal(x), Regex::Literal(y)) if x == y => {}
                (Regex::Epsilon, Regex::Epsilon) => {}
                (Regex::CharacterClass(x), Regex::CharacterClass(y))
                    if x == y => {}
                (Regex::Concatenation(l1, r1), Regex::Concatenation(l2, r2))
                | (Regex::Alternation(l1, r1), Regex::Alternation(l2, r2)) => {
                    stack.push((&**r1, &**r2));
                    stack.push((&**l1, &**l2));
                }
                (Regex::KleeneStar(x), Regex::KleeneStar(y))
                | (Regex::Plus(x), Regex::Plus(y))
                | (Regex::Question(x), Regex::Question(y)) => {
                    stack.push((&**x, &**y));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Regex {}

impl Drop for Regex {
    fn drop(&mut self) {
        use std::mem;

        match *self {
            Regex::Literal(_) | Regex::Epsilon | Regex::CharacterClass(_) => {
                return
            }
            Regex::Concatenation(ref l, ref r)
            | Regex::Alternation(ref l, ref r)
                if l.is_leaf() && r.is_leaf() =>
            {
                return
            }
            Regex::KleeneStar(ref e)
            | Regex::Plus(ref e)
            | Regex::Question(ref e)
                if e.is_leaf() =>
            {
                return
            }
            _ => {}
        }

        let mut stack = vec![mem::replace(self, Regex::Epsilon)];
        while let Some(mut node) = stack.pop() {
            match node {
                Regex::Concatenation(ref mut l, ref mut r)
                | Regex::Alternation(ref mut l, ref mut r) => {
                    stack.push(mem::replace(&mut **l, Regex::Epsilon));
                    stack.push(mem::replace(&mut **r, Regex::Epsilon));
                }
                Regex::KleeneStar(ref mut e)
                | Regex::Plus(ref mut e)
                | Regex::Question(ref mut e) => {
                    stack.push(mem::replace(&mut **e, Regex::Epsilon));
                }
                Regex::Literal(_)
                | Regex::Epsilon
                | Regex::CharacterClass(_) => {}
            }
            // `node` only has leaf children at this point, so dropping it
            // returns early above.
        }
    }
}
