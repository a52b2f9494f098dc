//! Shell-style glob patterns for filtering reference iteration.
//!
//! Supported syntax:
//! - `*` matches any run of characters, including `/`
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[!a-z]` / `[^a-z]` match one character from a class
//! - `\x` matches `x` literally
//!
//! An unterminated `[` is treated as a literal bracket.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    Star,
    Class { negated: bool, items: Vec<ClassItem> },
}

impl Token {
    fn matches(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => *l == c,
            Token::AnyChar => true,
            Token::Star => false,
            Token::Class { negated, items } => {
                let hit = items.iter().any(|item| match item {
                    ClassItem::Char(x) => *x == c,
                    ClassItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
                });
                hit != *negated
            }
        }
    }
}

/// A compiled glob pattern.
#[derive(Clone, PartialEq, Eq)]
pub struct Glob {
    pattern: String,
    tokens: Vec<Token>,
}

impl Glob {
    /// Compile a pattern. Every string is a valid pattern.
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' => {
                    // Runs of stars collapse to one.
                    if tokens.last() != Some(&Token::Star) {
                        tokens.push(Token::Star);
                    }
                    i += 1;
                }
                '?' => {
                    tokens.push(Token::AnyChar);
                    i += 1;
                }
                '\\' if i + 1 < chars.len() => {
                    tokens.push(Token::Literal(chars[i + 1]));
                    i += 2;
                }
                '[' => match parse_class(&chars, i + 1) {
                    Some((token, next)) => {
                        tokens.push(token);
                        i = next;
                    }
                    None => {
                        tokens.push(Token::Literal('['));
                        i += 1;
                    }
                },
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }
        Self {
            pattern: pattern.to_string(),
            tokens,
        }
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if `text` matches the whole pattern.
    pub fn is_match(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        let (mut p, mut t) = (0usize, 0usize);
        // Position of the last star and the text offset it is currently
        // absorbing up to.
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            if let Some(token) = self.tokens.get(p) {
                if *token == Token::Star {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                if token.matches(text[t]) {
                    p += 1;
                    t += 1;
                    continue;
                }
            }
            match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            }
        }

        self.tokens[p..].iter().all(|tok| *tok == Token::Star)
    }
}

/// Parse a bracket class starting just after `[`. Returns the token and the
/// index after the closing `]`, or `None` if the class is unterminated.
fn parse_class(chars: &[char], start: usize) -> Option<(Token, usize)> {
    let mut i = start;
    let mut negated = false;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        negated = true;
        i += 1;
    }

    let mut items = Vec::new();
    let first = i;
    loop {
        let c = *chars.get(i)?;
        if c == ']' && i > first {
            return Some((Token::Class { negated, items }, i + 1));
        }
        let (lo, after) = if c == '\\' {
            (*chars.get(i + 1)?, i + 2)
        } else {
            (c, i + 1)
        };
        if chars.get(after) == Some(&'-') && chars.get(after + 1).is_some_and(|c| *c != ']') {
            let hi = chars[after + 1];
            items.push(ClassItem::Range(lo, hi));
            i = after + 2;
        } else {
            items.push(ClassItem::Char(lo));
            i = after;
        }
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glob({:?})", self.pattern)
    }
}
