/*!
This crate provides a parser for the small regular expression language used
by `relex` token definitions.

The language has literals, `\` escapes (with `\n` meaning a newline),
character classes such as `[a-z_]`, grouping with `( )`, alternation with `|`
and the postfix operators `*`, `+` and `?`. Whitespace other than a newline
is insignificant unless escaped.

```
use relex_syntax::{ast::Regex, parse};

let re = parse("a|b*")?;
assert_eq!(
    re,
    Regex::alternate(Regex::literal('a'), Regex::star(Regex::literal('b'))),
);
# Ok::<(), relex_syntax::Error>(())
```
*/

#![deny(missing_docs)]

pub use crate::{
    error::{Error, ErrorKind},
    parser::{Parser, ParserBuilder},
};

#[allow(missing_docs)]
pub mod ast;
mod error;
mod parser;

/// Parse the pattern with the default configuration.
pub fn parse(pattern: &str) -> Result<ast::Regex, Error> {
    Parser::new().parse(pattern)
}
