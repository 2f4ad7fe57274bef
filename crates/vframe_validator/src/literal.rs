//! Restricted literal parser.
//!
//! Container columns accept text holding a container literal, e.g. `"[1, 2]"`.
//! This parser understands exactly these forms and nothing else:
//!
//! | Syntax | Result |
//! |---|---|
//! | `[a, b]` | list |
//! | `(a, b)`, `(a,)`, `()` | tuple |
//! | `{a, b}`, `set()` | set |
//! | `{k: v}`, `{}` | dictionary |
//!
//! Elements are scalars only: integers, floats, single- or double-quoted
//! strings, `True`, `False` and `None`. Nested containers, names and any
//! other expression are rejected. A parenthesised scalar without a comma,
//! such as `(1)`, is that scalar. Trailing commas are allowed.

use thiserror::Error;
use vframe_core::Value;

/// Errors raised by [`parse_literal`]. Positions are character offsets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// Input ended inside a literal
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Character that cannot start or continue the literal
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedChar {
        /// Offending character
        found: char,
        /// Character offset
        position: usize,
    },

    /// Container used as an element
    #[error("Nested containers are not supported (position {position})")]
    NestedContainer {
        /// Character offset
        position: usize,
    },

    /// Bare name other than `True`, `False`, `None` or `set()`
    #[error("Unknown name '{name}' at position {position}")]
    UnknownName {
        /// The name
        name: String,
        /// Character offset
        position: usize,
    },

    /// Malformed or out-of-range number
    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber {
        /// Number text
        text: String,
        /// Character offset
        position: usize,
    },

    /// String literal without a closing quote
    #[error("Unterminated string starting at position {position}")]
    UnterminatedString {
        /// Offset of the opening quote
        position: usize,
    },

    /// Escape sequence other than `\\`, `\'`, `\"`, `\n`, `\t`, `\r`
    #[error("Unsupported escape '\\{found}' at position {position}")]
    InvalidEscape {
        /// Character after the backslash
        found: char,
        /// Character offset
        position: usize,
    },

    /// Input continues after a complete literal
    #[error("Unexpected trailing input at position {position}")]
    TrailingInput {
        /// Character offset
        position: usize,
    },
}

type Result<T> = std::result::Result<T, LiteralError>;

/// Parses a container or scalar literal.
///
/// # Example
///
/// ```rust
/// use vframe_validator::parse_literal;
/// use vframe_core::Value;
///
/// assert_eq!(
///     parse_literal("[1, 'a', None]").unwrap(),
///     Value::List(vec![Value::Int(1), Value::from("a"), Value::Null])
/// );
/// assert!(parse_literal("__import__('os')").is_err());
/// ```
pub fn parse_literal(text: &str) -> Result<Value> {
    let mut parser = Parser::new(text);
    let value = parser.parse_top()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some(_) => Err(LiteralError::TrailingInput {
            position: parser.pos,
        }),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.unexpected(c)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    /// Error for the character just consumed.
    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::UnexpectedChar {
            found,
            position: self.pos - 1,
        }
    }

    fn parse_top(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            Some('[') => {
                self.pos += 1;
                self.parse_items(']').map(Value::List)
            }
            Some('(') => {
                self.pos += 1;
                self.parse_parens()
            }
            Some('{') => {
                self.pos += 1;
                self.parse_braces()
            }
            Some(c) if is_name_start(c) => {
                let (name, start) = self.parse_name();
                if name == "set" {
                    self.expect('(')?;
                    self.expect(')')?;
                    Ok(Value::Set(Vec::new()))
                } else {
                    name_scalar(name, start)
                }
            }
            _ => self.parse_scalar(),
        }
    }

    /// Comma-separated scalars up to `close`, which is consumed.
    fn parse_items(&mut self, close: char) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_scalar()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn parse_parens(&mut self) -> Result<Value> {
        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(Value::Tuple(Vec::new()));
        }

        let first = self.parse_scalar()?;
        self.skip_ws();
        match self.bump() {
            Some(')') => Ok(first),
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.parse_items(')')?);
                Ok(Value::Tuple(items))
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn parse_braces(&mut self) -> Result<Value> {
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Value::Dict(Vec::new()));
        }

        let first = self.parse_scalar()?;
        self.skip_ws();
        if self.peek() == Some(':') {
            return self.parse_dict_entries(first);
        }

        match self.bump() {
            Some('}') => Ok(Value::set([first])),
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.parse_items('}')?);
                Ok(Value::set(items))
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn parse_dict_entries(&mut self, first_key: Value) -> Result<Value> {
        let mut pairs = Vec::new();
        let mut key = first_key;
        loop {
            self.expect(':')?;
            let value = self.parse_scalar()?;
            pairs.push((key, value));

            self.skip_ws();
            match self.bump() {
                Some('}') => break,
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        break;
                    }
                    key = self.parse_scalar()?;
                }
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
        Ok(Value::dict(pairs))
    }

    fn parse_scalar(&mut self) -> Result<Value> {
        self.skip_ws();
        let position = self.pos;
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[' | '(' | '{') => Err(LiteralError::NestedContainer { position }),
            Some(quote @ ('\'' | '"')) => self.parse_string(quote),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if is_name_start(c) => {
                let (name, start) = self.parse_name();
                self.skip_ws();
                if name == "set" && self.peek() == Some('(') {
                    Err(LiteralError::NestedContainer { position: start })
                } else {
                    name_scalar(name, start)
                }
            }
            Some(c) => {
                self.pos += 1;
                Err(self.unexpected(c))
            }
        }
    }

    fn parse_name(&mut self) -> (String, usize) {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        (self.chars[start..self.pos].iter().collect(), start)
    }

    fn parse_string(&mut self, quote: char) -> Result<Value> {
        let start = self.pos;
        self.pos += 1;
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnterminatedString { position: start }),
                Some(c) if c == quote => return Ok(Value::Str(text)),
                Some('\\') => {
                    let escaped = match self.bump() {
                        None => return Err(LiteralError::UnterminatedString { position: start }),
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(c @ ('\\' | '\'' | '"')) => c,
                        Some(found) => {
                            return Err(LiteralError::InvalidEscape {
                                found,
                                position: self.pos - 1,
                            });
                        }
                    };
                    text.push(escaped);
                }
                Some(c) => text.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-')
                && matches!(self.chars.get(self.pos - 1), Some('e' | 'E'));
            if c.is_ascii_alphanumeric() || c == '.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        let invalid = || LiteralError::InvalidNumber {
            text: text.clone(),
            position: start,
        };

        if !text.bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().map(Value::Float).map_err(|_| invalid())
        } else {
            text.parse::<i64>().map(Value::Int).map_err(|_| invalid())
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn name_scalar(name: String, position: usize) -> Result<Value> {
    match name.as_str() {
        "True" => Ok(Value::Bool(true)),
        "False" => Ok(Value::Bool(false)),
        "None" => Ok(Value::Null),
        _ => Err(LiteralError::UnknownName { name, position }),
    }
}
