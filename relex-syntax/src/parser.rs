use std::collections::BTreeSet;

use crate::{
    ast::Regex,
    error::{Error, ErrorKind},
};

/// A builder for a regular expression parser.
///
/// This builder permits modifying configuration options for the parser.
#[derive(Clone, Debug)]
pub struct ParserBuilder {
    ignore_whitespace: bool,
    nest_limit: u32,
}

impl Default for ParserBuilder {
    fn default() -> ParserBuilder {
        ParserBuilder::new()
    }
}

impl ParserBuilder {
    /// Create a new parser builder with a default configuration.
    pub fn new() -> ParserBuilder {
        ParserBuilder { ignore_whitespace: true, nest_limit: u32::MAX }
    }

    /// Build a parser from this configuration.
    pub fn build(&self) -> Parser {
        Parser {
            ignore_whitespace: self.ignore_whitespace,
            nest_limit: self.nest_limit,
        }
    }

    /// When enabled (the default), whitespace other than `\n` outside of
    /// character classes is insignificant. An actual newline character is
    /// always a literal, and escaped whitespace is always a literal.
    pub fn ignore_whitespace(&mut self, yes: bool) -> &mut ParserBuilder {
        self.ignore_whitespace = yes;
        self
    }

    /// Set the maximum nesting depth of groups.
    ///
    /// By default nesting is effectively unlimited. A limit of `0` forbids
    /// groups entirely.
    pub fn nest_limit(&mut self, limit: u32) -> &mut ParserBuilder {
        self.nest_limit = limit;
        self
    }
}

/// A regular expression parser.
///
/// The grammar, from lowest to highest precedence:
///
/// ```text
/// alternation   := concatenation ('|' concatenation)*
/// concatenation := postfix postfix*
/// postfix       := atom ('*' | '+' | '?')*
/// atom          := literal | class | '(' alternation ')'
/// ```
///
/// Concatenations nest to the right, alternations to the left.
#[derive(Clone, Debug)]
pub struct Parser {
    ignore_whitespace: bool,
    nest_limit: u32,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    /// Create a new parser with a default configuration.
    pub fn new() -> Parser {
        ParserBuilder::new().build()
    }

    /// Parse the pattern into an abstract syntax tree.
    pub fn parse(&self, pattern: &str) -> Result<Regex, Error> {
        let tokens = tokenize(pattern, self.ignore_whitespace)?;
        ParserI { pattern, tokens, nest_limit: self.nest_limit }.parse()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum TokenKind {
    Literal(char),
    Class(BTreeSet<char>),
    OpenGroup,
    CloseGroup,
    Alternate,
    Star,
    Plus,
    Question,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Token {
    kind: TokenKind,
    /// Byte offset of the first character of the token.
    pos: usize,
}

fn error(pattern: &str, kind: ErrorKind, pos: usize) -> Error {
    Error { kind, pattern: pattern.to_string(), pos }
}

fn tokenize(pattern: &str, ignore_whitespace: bool) -> Result<Vec<Token>, Error> {
    let mut tokens = vec![];
    let mut chars = pattern.char_indices();
    while let Some((pos, c)) = chars.next() {
        let kind = match c {
            '\n' => TokenKind::Literal('\n'),
            c if ignore_whitespace && c.is_whitespace() => continue,
            '\\' => match chars.next() {
                Some((_, 'n')) => TokenKind::Literal('\n'),
                Some((_, c)) => TokenKind::Literal(c),
                None => {
                    return Err(error(
                        pattern,
                        ErrorKind::EscapeUnexpectedEof,
                        pos,
                    ))
                }
            },
            '(' => TokenKind::OpenGroup,
            ')' => TokenKind::CloseGroup,
            '|' => TokenKind::Alternate,
            '*' => TokenKind::Star,
            '+' => TokenKind::Plus,
            '?' => TokenKind::Question,
            '[' => {
                let body_start = pos + 1;
                let close = match pattern[body_start..].find(']') {
                    Some(len) => body_start + len,
                    None => {
                        return Err(error(
                            pattern,
                            ErrorKind::ClassUnclosed,
                            pos,
                        ))
                    }
                };
                let set = parse_class_body(pattern, body_start, close)?;
                if set.is_empty() {
                    return Err(error(pattern, ErrorKind::ClassEmpty, pos));
                }
                for (i, _) in chars.by_ref() {
                    if i == close {
                        break;
                    }
                }
                TokenKind::Class(set)
            }
            c => TokenKind::Literal(c),
        };
        tokens.push(Token { kind, pos });
    }
    Ok(tokens)
}

/// Parses the raw body of a character class, i.e., everything between `[`
/// and `]`. The body has no escapes or metacharacters: every character is a
/// member, and `x-y` adds the inclusive range from `x` to `y`.
fn parse_class_body(
    pattern: &str,
    start: usize,
    end: usize,
) -> Result<BTreeSet<char>, Error> {
    let members: Vec<(usize, char)> = pattern[start..end]
        .char_indices()
        .map(|(i, c)| (start + i, c))
        .collect();
    let mut set = BTreeSet::new();
    let mut j = 0;
    while j < members.len() {
        if j + 2 < members.len() && members[j + 1].1 == '-' {
            let (pos, lo) = members[j];
            let hi = members[j + 2].1;
            if lo > hi {
                return Err(error(
                    pattern,
                    ErrorKind::ClassRangeInvalid { start: lo, end: hi },
                    pos,
                ));
            }
            set.extend(lo..=hi);
            j += 3;
        } else {
            set.insert(members[j].1);
            j += 1;
        }
    }
    Ok(set)
}

/// The internal parser state for a single pattern.
///
/// Groups are parsed with an explicit stack of frames rather than by
/// recursion, so nesting depth is bounded only by `nest_limit`.
struct ParserI<'p> {
    pattern: &'p str,
    tokens: Vec<Token>,
    nest_limit: u32,
}

/// A group that is still being parsed, or the top level of the pattern.
struct Frame {
    /// Position of the opening parenthesis. `None` at the top level.
    open: Option<usize>,
    /// The alternatives completed so far.
    alternation: Option<Regex>,
    /// The items of the alternative currently being parsed.
    concat: Vec<Regex>,
}

impl Frame {
    fn new(open: Option<usize>) -> Frame {
        Frame { open, alternation: None, concat: vec![] }
    }

    /// Close the current alternative and return the whole alternation.
    ///
    /// An alternative with no items is an error reported at `pos`.
    fn take_alternation(
        &mut self,
        pattern: &str,
        pos: usize,
    ) -> Result<Regex, Error> {
        let mut items = std::mem::take(&mut self.concat);
        let mut regex = match items.pop() {
            Some(last) => last,
            None => {
                return Err(error(pattern, ErrorKind::EmptyAlternative, pos))
            }
        };
        while let Some(prev) = items.pop() {
            regex = Regex::concat(prev, regex);
        }
        Ok(match self.alternation.take() {
            None => regex,
            Some(left) => Regex::alternate(left, regex),
        })
    }
}

impl<'p> ParserI<'p> {
    fn parse(self) -> Result<Regex, Error> {
        let ParserI { pattern, tokens, nest_limit } = self;
        let mut parents: Vec<Frame> = vec![];
        let mut frame = Frame::new(None);
        for Token { kind, pos } in tokens {
            match kind {
                TokenKind::Literal(c) => frame.concat.push(Regex::Literal(c)),
                TokenKind::Class(set) => {
                    frame.concat.push(Regex::CharacterClass(set))
                }
                TokenKind::Star | TokenKind::Plus | TokenKind::Question => {
                    let inner = match frame.concat.pop() {
                        Some(inner) => inner,
                        None => {
                            return Err(error(
                                pattern,
                                ErrorKind::RepetitionMissing,
                                pos,
                            ))
                        }
                    };
                    frame.concat.push(match kind {
                        TokenKind::Star => Regex::star(inner),
                        TokenKind::Plus => Regex::plus(inner),
                        _ => Regex::question(inner),
                    });
                }
                TokenKind::Alternate => {
                    let left = frame.take_alternation(pattern, pos)?;
                    frame.alternation = Some(left);
                }
                TokenKind::OpenGroup => {
                    if parents.len() >= nest_limit as usize {
                        return Err(error(
                            pattern,
                            ErrorKind::NestLimitExceeded(nest_limit),
                            pos,
                        ));
                    }
                    let group = Frame::new(Some(pos));
                    parents.push(std::mem::replace(&mut frame, group));
                }
                TokenKind::CloseGroup => {
                    let group = frame.take_alternation(pattern, pos)?;
                    frame = match parents.pop() {
                        Some(parent) => parent,
                        None => {
                            return Err(error(
                                pattern,
                                ErrorKind::GroupUnopened,
                                pos,
                            ))
                        }
                    };
                    frame.concat.push(group);
                }
            }
        }
        if let Some(open) = frame.open {
            return Err(error(pattern, ErrorKind::GroupUnclosed, open));
        }
        frame.take_alternation(pattern, pattern.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str) -> Regex {
        Parser::new().parse(pattern).unwrap()
    }

    fn parse_err(pattern: &str) -> (ErrorKind, usize) {
        let err = Parser::new().parse(pattern).unwrap_err();
        (err.kind().clone(), err.position())
    }

    fn lit(c: char) -> Regex {
        Regex::literal(c)
    }

    #[test]
    fn single_literal() {
        assert_eq!(parse("a"), lit('a'));
    }

    #[test]
    fn concatenation_nests_right() {
        assert_eq!(
            parse("abc"),
            Regex::concat(lit('a'), Regex::concat(lit('b'), lit('c')))
        );
    }

    #[test]
    fn alternation_nests_left() {
        assert_eq!(
            parse("a|b|c"),
            Regex::alternate(Regex::alternate(lit('a'), lit('b')), lit('c'))
        );
    }

    #[test]
    fn precedence() {
        // Postfix binds tighter than concatenation, which binds tighter
        // than alternation.
        assert_eq!(
            parse("ab*|c"),
            Regex::alternate(
                Regex::concat(lit('a'), Regex::star(lit('b'))),
                lit('c'),
            )
        );
        assert_eq!(
            parse("(a|b)c"),
            Regex::concat(Regex::alternate(lit('a'), lit('b')), lit('c'))
        );
    }

    #[test]
    fn postfix_stacks() {
        assert_eq!(
            parse("a*+?"),
            Regex::question(Regex::plus(Regex::star(lit('a'))))
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(parse(r"\*"), lit('*'));
        assert_eq!(parse(r"\n"), lit('\n'));
        assert_eq!(parse(r"\\"), lit('\\'));
        assert_eq!(parse(r"\ "), lit(' '));
        assert_eq!(parse(r"\(\)"), Regex::concat(lit('('), lit(')')));
    }

    #[test]
    fn whitespace() {
        assert_eq!(parse("a b\t c"), parse("abc"));
        assert_eq!(parse("a\nb"), Regex::concat(lit('a'), Regex::concat(lit('\n'), lit('b'))));

        let re = ParserBuilder::new().ignore_whitespace(false).build().parse("a b").unwrap();
        assert_eq!(re, Regex::concat(lit('a'), Regex::concat(lit(' '), lit('b'))));
    }

    #[test]
    fn classes() {
        assert_eq!(parse("[abc]"), Regex::class(['a', 'b', 'c']));
        assert_eq!(parse("[a-c]"), Regex::class(['a', 'b', 'c']));
        assert_eq!(parse("[0-2x-z_]"), Regex::class("012xyz_".chars()));
        // A '-' that cannot form a range is a member.
        assert_eq!(parse("[a-]"), Regex::class(['a', '-']));
        assert_eq!(parse("[-a]"), Regex::class(['a', '-']));
        // Class bodies are raw.
        assert_eq!(parse("[ *|]"), Regex::class([' ', '*', '|']));
        assert_eq!(
            parse("[ab]+x"),
            Regex::concat(Regex::plus(Regex::class(['a', 'b'])), lit('x'))
        );
    }

    #[test]
    fn closing_bracket_outside_class_is_literal() {
        assert_eq!(parse("]"), lit(']'));
    }

    #[test]
    fn errors() {
        assert_eq!(parse_err(""), (ErrorKind::EmptyAlternative, 0));
        assert_eq!(parse_err("a|"), (ErrorKind::EmptyAlternative, 2));
        assert_eq!(parse_err("|a"), (ErrorKind::EmptyAlternative, 0));
        assert_eq!(parse_err("()"), (ErrorKind::EmptyAlternative, 1));
        assert_eq!(parse_err("(a"), (ErrorKind::GroupUnclosed, 0));
        assert_eq!(parse_err("x(a|(b)"), (ErrorKind::GroupUnclosed, 1));
        assert_eq!(parse_err("a("), (ErrorKind::GroupUnclosed, 1));
        assert_eq!(parse_err("a)"), (ErrorKind::GroupUnopened, 1));
        assert_eq!(parse_err("*a"), (ErrorKind::RepetitionMissing, 0));
        assert_eq!(parse_err("a|?"), (ErrorKind::RepetitionMissing, 2));
        assert_eq!(parse_err("ab\\"), (ErrorKind::EscapeUnexpectedEof, 2));
        assert_eq!(parse_err("a[bc"), (ErrorKind::ClassUnclosed, 1));
        assert_eq!(parse_err("[]"), (ErrorKind::ClassEmpty, 0));
        assert_eq!(
            parse_err("a[z-a]"),
            (ErrorKind::ClassRangeInvalid { start: 'z', end: 'a' }, 2)
        );
    }

    #[test]
    fn nest_limit() {
        let parser = ParserBuilder::new().nest_limit(2).build();
        assert!(parser.parse("((a))").is_ok());
        let err = parser.parse("(((a)))").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NestLimitExceeded(2));
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn deeply_nested_groups() {
        let pattern = format!("{}a{}", "(".repeat(300), ")".repeat(300));
        assert_eq!(parse(&pattern), lit('a'));

        let pattern = format!("{}b{}", "(a".repeat(100_000), ")".repeat(100_000));
        let re = parse(&pattern);
        assert_eq!(re.depth(), 100_001);
        assert_eq!(re.alphabet(), ['a', 'b'].into_iter().collect());

        let (kind, pos) = parse_err(&format!("{}a{}", "(".repeat(300), ")".repeat(299)));
        assert_eq!((kind, pos), (ErrorKind::GroupUnclosed, 0));
    }

    #[test]
    fn long_concatenation() {
        let pattern = "ab".repeat(50_000);
        let re = parse(&pattern);
        assert_eq!(re.depth(), 100_000);
    }

    #[test]
    fn error_display() {
        let err = Parser::new().parse("ab(c").unwrap_err();
        let expected = "\
regex parse error:
    ab(c
      ^
error: unclosed group";
        assert_eq!(err.to_string(), expected);
    }
}
