/*!
This crate compiles regular expressions into finite automata and uses them to
split text into tokens.

Each pattern goes through a fixed pipeline:

1. [`syntax`] parses the pattern into an abstract syntax tree.
2. [`automata::Compiler`] builds a Thompson NFA from the tree.
3. [`automata::determinize`] turns the NFA into a DFA by subset
   construction.
4. [`automata::minimize`] merges equivalent DFA states.

A [`Lexer`] runs that pipeline once for every token definition and then scans
input by maximal munch: at each position the longest nonempty match wins, and
ties go to the token defined first.

# Example

```
use relex::Lexer;

let lexer = Lexer::new([
    ("number", "[0-9]+"),
    ("ident", "[a-z_][a-z_0-9]*"),
    ("op", "\\+|\\*|="),
    ("space", "\\ +"),
])?;

let lexemes = lexer.tokenize("x = y1 + 42")?;
let names: Vec<&str> = lexemes.iter().map(|l| l.name()).collect();
assert_eq!(
    names,
    vec!["ident", "space", "op", "space", "ident", "space", "op", "space", "number"],
);
assert_eq!(lexemes[4].as_str(), "y1");
assert_eq!(lexemes[8].range(), 9..11);
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Pattern syntax

Patterns support literals, `\` escapes (`\n` is a newline), character classes
like `[a-z_]`, grouping with `( )`, alternation with `|` and the postfix
operators `*`, `+` and `?`. Whitespace other than a newline is ignored unless
escaped, so a literal space is written `\ `.

# Crate features

* **logging** - Emit messages through the `log` crate about the automata
  built for each token and the lexemes produced while scanning.
*/

#![deny(missing_docs)]

#[macro_use]
mod macros;

pub use relex_automata as automata;
pub use relex_syntax as syntax;

pub use crate::{
    error::{Error, LexError},
    lexer::{tokenize, Lexeme, Lexer, LexerBuilder},
};

mod error;
mod lexer;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
