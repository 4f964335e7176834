use crate::error::ResolutionError;
use std::fmt;

/// Symbolic expression tree, written as s-expressions: `(Read vUSDC totalSupply)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Atom(String),
    List(Vec<Event>),
}

impl Event {
    pub fn atom(raw: impl Into<String>) -> Self {
        Self::Atom(raw.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|s| Self::Atom(s.into())).collect())
    }

    pub fn parse(raw: &str) -> Result<Self, ResolutionError> {
        let tokens = tokenize(raw)?;
        let mut pos = 0;
        let event = parse_expr(raw, &tokens, &mut pos)?;
        if pos != tokens.len() {
            return Err(malformed(raw, "trailing input after expression"));
        }
        Ok(event)
    }

    /// Leading atom of a list, e.g. `Read` in `(Read vUSDC totalSupply)`.
    pub fn head(&self) -> Option<&str> {
        match self {
            Self::List(items) => match items.first() {
                Some(Self::Atom(head)) => Some(head.as_str()),
                _ => None,
            },
            Self::Atom(_) => None,
        }
    }

    pub fn args(&self) -> &[Event] {
        match self {
            Self::List(items) if !items.is_empty() => &items[1..],
            _ => &[],
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Word(String),
}

fn malformed(raw: &str, reason: &str) -> ResolutionError {
    ResolutionError::Malformed {
        expr: raw.to_string(),
        reason: reason.to_string(),
    }
}

fn tokenize(raw: &str) -> Result<Vec<Token>, ResolutionError> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();
    while let Some(&ch) = chars.peek() {
        match ch {
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            '"' => {
                chars.next();
                let mut word = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => word.push(c),
                        None => return Err(malformed(raw, "unterminated string")),
                    }
                }
                tokens.push(Token::Word(word));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }
    Ok(tokens)
}

fn parse_expr(raw: &str, tokens: &[Token], pos: &mut usize) -> Result<Event, ResolutionError> {
    match tokens.get(*pos) {
        None => Err(malformed(raw, "empty expression")),
        Some(Token::Close) => Err(malformed(raw, "unexpected `)`")),
        Some(Token::Word(word)) => {
            *pos += 1;
            Ok(Event::Atom(word.clone()))
        }
        Some(Token::Open) => {
            *pos += 1;
            let mut items = Vec::new();
            loop {
                match tokens.get(*pos) {
                    None => return Err(malformed(raw, "missing `)`")),
                    Some(Token::Close) => {
                        *pos += 1;
                        return Ok(Event::List(items));
                    }
                    Some(_) => items.push(parse_expr(raw, tokens, pos)?),
                }
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(word) => {
                if word.is_empty() || word.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
                    write!(f, "\"{word}\"")
                } else {
                    f.write_str(word)
                }
            }
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}
