//! Brace-depth parser for hierarchy text.

use std::str::FromStr;

use super::{Hierarchy, NodeId};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Comma,
    Scalar(&'a str),
}

/// Split text into `(byte offset, token)` pairs; whitespace separates
/// tokens and is otherwise ignored.
fn tokenize(text: &str) -> Vec<(usize, Token<'_>)> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let token = match c {
            '{' => Token::Open,
            '}' => Token::Close,
            ',' => Token::Comma,
            c if c.is_whitespace() => continue,
            _ => {
                let mut end = pos + c.len_utf8();
                while let Some(&(next, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '}' | ',') {
                        break;
                    }
                    end = next + c.len_utf8();
                    chars.next();
                }
                Token::Scalar(&text[pos..end])
            }
        };
        tokens.push((pos, token));
    }
    tokens
}

/// What the parser accepts next.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    /// A scalar or `{`
    Item,
    /// A scalar, `{` or `}` right after an opening brace
    ItemOrClose,
    /// `,` or `}` after a completed item
    SeparatorOrClose,
    /// Nothing; the top item is complete
    End,
}

impl<T: FromStr> Hierarchy<T> {
    /// Parse bracket text such as `{{1, 2}, {3, 4}}`.
    ///
    /// Scalars are parsed with `T::from_str`, so floats use `.` as the
    /// decimal separator. A bare scalar yields a one-node hierarchy.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::Hierarchy;
    ///
    /// let h = Hierarchy::<f64>::parse("{{1, 2.5}, {3, 4}}").unwrap();
    /// assert_eq!(h.rank(), 2);
    /// assert!(Hierarchy::<f64>::parse("{{1, 2}").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut stack: Vec<NodeId> = Vec::new();
        let mut nodes: Option<Hierarchy<T>> = None;
        let mut expect = Expect::Item;

        for (pos, token) in tokenize(text) {
            match token {
                Token::Open | Token::Scalar(_) => {
                    if !matches!(expect, Expect::Item | Expect::ItemOrClose) {
                        return Err(unexpected(pos, token, expect));
                    }
                    let value = match token {
                        Token::Scalar(s) => Some(s.parse::<T>().map_err(|_| {
                            Error::parse(pos, format!("invalid scalar '{}'", s))
                        })?),
                        _ => None,
                    };
                    let is_group = value.is_none();
                    let id = if let Some(leader) = stack.last().copied() {
                        nodes
                            .as_mut()
                            .ok_or_else(|| unexpected(pos, token, Expect::End))?
                            .append(leader, value)
                    } else if nodes.is_none() {
                        let h = match value {
                            Some(v) => Hierarchy::from_value(v),
                            None => Hierarchy::new_group(),
                        };
                        let top = h.top();
                        nodes = Some(h);
                        top
                    } else {
                        return Err(unexpected(pos, token, Expect::End));
                    };
                    if is_group {
                        stack.push(id);
                        expect = Expect::ItemOrClose;
                    } else {
                        expect = after_item(&stack);
                    }
                }
                Token::Comma => {
                    if expect != Expect::SeparatorOrClose {
                        return Err(unexpected(pos, token, expect));
                    }
                    expect = Expect::Item;
                }
                Token::Close => {
                    if !matches!(expect, Expect::ItemOrClose | Expect::SeparatorOrClose) {
                        return Err(unexpected(pos, token, expect));
                    }
                    stack.pop();
                    expect = after_item(&stack);
                }
            }
        }

        match nodes {
            None => Err(Error::parse(0, "empty input")),
            Some(_) if !stack.is_empty() => Err(Error::parse(
                text.len(),
                format!("unbalanced braces: {} group(s) not closed", stack.len()),
            )),
            Some(h) => {
                tracing::debug!(nodes = h.len(), bytes = text.len(), "parsed hierarchy");
                Ok(h)
            }
        }
    }
}

impl<T: FromStr> FromStr for Hierarchy<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Hierarchy::parse(s)
    }
}

fn after_item(stack: &[NodeId]) -> Expect {
    if stack.is_empty() {
        Expect::End
    } else {
        Expect::SeparatorOrClose
    }
}

fn unexpected(pos: usize, token: Token<'_>, expect: Expect) -> Error {
    let found = match token {
        Token::Open => "'{'".to_string(),
        Token::Close => "'}'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Scalar(s) => format!("'{}'", s),
    };
    let reason = match (token, expect) {
        (Token::Close, Expect::Item) => "trailing ',' before '}'".to_string(),
        (Token::Close, Expect::End) => "unbalanced braces: unmatched '}'".to_string(),
        (_, Expect::End) => format!("unexpected {} after the top item", found),
        (_, Expect::SeparatorOrClose) => format!("expected ',' or '}}', found {}", found),
        _ => format!("unexpected {}", found),
    };
    Error::parse(pos, reason)
}
