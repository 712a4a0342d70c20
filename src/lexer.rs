use std::ops::Range;

use relex_automata::{
    compiler::{self, Compiler},
    determinize::Determinizer,
    DFA, StateId,
};
use relex_syntax::ParserBuilder;

use crate::error::{Error, LexError};

/// A builder for a [`Lexer`].
///
/// This permits configuring how each token pattern is compiled. The
/// configuration only affects construction; scanning behaves the same way
/// regardless.
#[derive(Clone, Debug)]
pub struct LexerBuilder {
    minimize: bool,
    syntax: ParserBuilder,
    thompson: compiler::Config,
    dfa_state_limit: Option<usize>,
}

impl Default for LexerBuilder {
    fn default() -> LexerBuilder {
        LexerBuilder::new()
    }
}

impl LexerBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> LexerBuilder {
        LexerBuilder {
            minimize: true,
            syntax: ParserBuilder::new(),
            thompson: compiler::Config::new(),
            dfa_state_limit: None,
        }
    }

    /// Build a lexer from an ordered sequence of `(name, pattern)` token
    /// definitions.
    ///
    /// Every pattern is compiled here, once. The first pattern that fails to
    /// compile is reported along with the name of its token.
    pub fn build<I, N, P>(&self, definitions: I) -> Result<Lexer, Error>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<str>,
    {
        let mut compiler = Compiler::new();
        compiler.configure(self.thompson.clone().syntax(self.syntax.clone()));
        let mut determinizer = Determinizer::new();
        determinizer.state_limit(self.dfa_state_limit);

        let mut rules = vec![];
        for (name, pattern) in definitions {
            let name = name.into();
            let pattern = pattern.as_ref();
            let compiled = compiler
                .build(pattern)
                .and_then(|nfa| determinizer.run(&nfa))
                .and_then(|dfa| {
                    if self.minimize {
                        dfa.minimize()
                    } else {
                        Ok(dfa)
                    }
                });
            let dfa = match compiled {
                Ok(dfa) => dfa.relabel(),
                Err(source) => return Err(Error::Pattern { name, source }),
            };
            debug!(
                "compiled token '{}' ({:?}) into a DFA with {} states",
                name,
                pattern,
                dfa.state_len()
            );
            rules.push(Rule { name, pattern: pattern.to_string(), dfa });
        }
        Ok(Lexer { rules })
    }

    /// Whether to minimize each token's DFA. Enabled by default.
    ///
    /// Minimization never changes which lexemes are produced. It only makes
    /// the cached automata smaller.
    pub fn minimize(&mut self, yes: bool) -> &mut LexerBuilder {
        self.minimize = yes;
        self
    }

    /// Set the syntax configuration used to parse token patterns.
    pub fn syntax(&mut self, config: ParserBuilder) -> &mut LexerBuilder {
        self.syntax = config;
        self
    }

    /// Set the Thompson NFA configuration used to compile token patterns.
    ///
    /// The syntax configuration set with [`LexerBuilder::syntax`] takes
    /// precedence over the one inside `config`.
    pub fn thompson(&mut self, config: compiler::Config) -> &mut LexerBuilder {
        self.thompson = config;
        self
    }

    /// Set a limit on the number of DFA states built for any one token.
    pub fn dfa_state_limit(&mut self, limit: Option<usize>) -> &mut LexerBuilder {
        self.dfa_state_limit = limit;
        self
    }
}

#[derive(Clone, Debug)]
struct Rule {
    name: String,
    pattern: String,
    dfa: DFA<StateId>,
}

/// A longest-match tokenizer over a fixed, ordered list of token
/// definitions.
///
/// At each position the lexer runs the DFA of every token from its initial
/// state and keeps the longest nonempty match. When two tokens match the same
/// longest prefix, the one defined first wins. If nothing matches, scanning
/// fails at that position.
///
/// A `Lexer` is immutable once built, so one instance can be shared between
/// threads and used for any number of concurrent scans.
///
/// # Example
///
/// ```
/// use relex::Lexer;
///
/// let lexer = Lexer::new([("ones", "11+"), ("pair", "01|10"), ("other", "0|1")])?;
/// let lexemes: Vec<(&str, &str)> = lexer
///     .tokenize("1001")?
///     .iter()
///     .map(|l| (l.name(), l.as_str()))
///     .collect();
/// assert_eq!(lexemes, vec![("pair", "10"), ("pair", "01")]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Lexer {
    rules: Vec<Rule>,
}

impl Lexer {
    /// Build a lexer with the default configuration.
    ///
    /// See [`LexerBuilder::build`].
    pub fn new<I, N, P>(definitions: I) -> Result<Lexer, Error>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<str>,
    {
        LexerBuilder::new().build(definitions)
    }

    /// Split `text` into lexemes.
    ///
    /// The lexemes cover the whole input in order, with no gaps and no
    /// overlaps. Empty input yields no lexemes.
    pub fn tokenize<'a>(
        &'a self,
        text: &'a str,
    ) -> Result<Vec<Lexeme<'a>>, LexError> {
        let mut lexemes = vec![];
        let (mut at, mut line, mut column) = (0, 1, 1);
        while at < text.len() {
            let (rule, len) = match self.longest_match(&text[at..]) {
                Some(found) => found,
                None => return Err(LexError { offset: at, line, column }),
            };
            let lexeme = Lexeme {
                name: &self.rules[rule].name,
                text: &text[at..at + len],
                start: at,
            };
            trace!("lexeme {} {:?} at {}", lexeme.name, lexeme.text, at);
            for c in lexeme.text.chars() {
                if c == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
            lexemes.push(lexeme);
            at += len;
        }
        Ok(lexemes)
    }

    /// Find the token with the longest nonempty match at the start of
    /// `haystack`, returning its index and the match length in bytes.
    fn longest_match(&self, haystack: &str) -> Option<(usize, usize)> {
        let mut current: Vec<Option<StateId>> =
            self.rules.iter().map(|r| Some(*r.dfa.start())).collect();
        let mut best: Option<(usize, usize)> = None;
        for (i, c) in haystack.char_indices() {
            let len = i + c.len_utf8();
            let mut alive = false;
            for (rule, state) in current.iter_mut().enumerate() {
                let dfa = &self.rules[rule].dfa;
                *state = match *state {
                    Some(id) => dfa.next_state(&id, c).copied(),
                    None => continue,
                };
                let id = match *state {
                    Some(id) => id,
                    None => continue,
                };
                alive = true;
                // Strictly longer only, so the first token to reach a given
                // length keeps it.
                if dfa.is_accepting(&id) && best.map_or(true, |(_, n)| len > n) {
                    best = Some((rule, len));
                }
            }
            if !alive {
                break;
            }
        }
        best
    }

    /// The token names, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// The pattern of the first token with the given name.
    pub fn pattern(&self, name: &str) -> Option<&str> {
        self.rule(name).map(|r| r.pattern.as_str())
    }

    /// The cached DFA of the first token with the given name.
    pub fn dfa(&self, name: &str) -> Option<&DFA<StateId>> {
        self.rule(name).map(|r| &r.dfa)
    }

    /// The number of token definitions.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the lexer has no token definitions.
    ///
    /// Such a lexer accepts only empty input.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

/// A single token matched by a [`Lexer`].
///
/// The lifetime `'a` refers to both the lexer, which owns the token name,
/// and the text that was scanned.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Lexeme<'a> {
    name: &'a str,
    text: &'a str,
    start: usize,
}

impl<'a> Lexeme<'a> {
    /// The name of the token that matched.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The matched text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// The byte offset in the input at which this lexeme starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The byte offset in the input just past the end of this lexeme.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// The byte range of this lexeme in the input.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

impl<'a> std::fmt::Debug for Lexeme<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexeme")
            .field("name", &self.name)
            .field("text", &self.text)
            .field("start", &self.start)
            .field("end", &self.end())
            .finish()
    }
}

/// Build a lexer from `definitions` and tokenize `text` with it, returning
/// owned `(name, lexeme)` pairs.
///
/// This is a convenience for one-off scans. Build a [`Lexer`] once and reuse
/// it when scanning more than one input.
pub fn tokenize<I, N, P>(
    definitions: I,
    text: &str,
) -> Result<Vec<(String, String)>, Error>
where
    I: IntoIterator<Item = (N, P)>,
    N: Into<String>,
    P: AsRef<str>,
{
    let lexer = Lexer::new(definitions)?;
    let lexemes = lexer.tokenize(text)?;
    Ok(lexemes
        .iter()
        .map(|l| (l.name().to_string(), l.as_str().to_string()))
        .collect())
}
