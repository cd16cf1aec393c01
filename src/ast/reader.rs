//! Reader for the `s(:type, child, ...)` notation produced by [`Node::inspect`].

use std::sync::Arc;

use crate::error::ReadError;

use super::node::Node;
use super::symbol::Symbol;
use super::value::Value;

/// Parses a single node, e.g. `s(:add, s(:integer, 1), s(:integer, 2))`.
pub fn read(source: &str) -> Result<Node, ReadError> {
    let mut reader = Reader::new(source);
    reader.skip_whitespace();
    let node = reader.node()?;
    reader.finish()?;
    Ok(node)
}

/// Parses any value: a node, a list or a scalar.
pub fn read_value(source: &str) -> Result<Value, ReadError> {
    let mut reader = Reader::new(source);
    let value = reader.value()?;
    reader.finish()?;
    Ok(value)
}

struct Reader<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Reader<'src> {
    fn new(source: &'src str) -> Self {
        Reader { source, pos: 0 }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, f: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&f) {
            self.bump();
        }
    }

    fn skip_whitespace(&mut self) {
        self.bump_while(char::is_whitespace);
    }

    fn unexpected(&self, expected: &'static str) -> ReadError {
        match self.peek() {
            Some(found) => ReadError::Unexpected { found, offset: self.pos, expected },
            None => ReadError::UnexpectedEof { expected },
        }
    }

    fn finish(&mut self) -> Result<(), ReadError> {
        self.skip_whitespace();
        if self.pos < self.source.len() {
            return Err(ReadError::TrailingInput { offset: self.pos });
        }
        Ok(())
    }

    fn node(&mut self) -> Result<Node, ReadError> {
        if !(self.peek() == Some('s') && self.second() == Some('(')) {
            return Err(self.unexpected("`s(`"));
        }
        self.bump();
        self.bump();
        self.skip_whitespace();
        if self.peek() != Some(':') {
            return Err(self.unexpected("a node type symbol"));
        }
        let node_type = self.symbol()?;

        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(')') => {
                    self.bump();
                    break;
                }
                Some(',') => {
                    self.bump();
                    children.push(self.value()?);
                }
                _ => return Err(self.unexpected("`,` or `)`")),
            }
        }
        Ok(Node::new(node_type, children))
    }

    fn value(&mut self) -> Result<Value, ReadError> {
        self.skip_whitespace();
        match self.peek() {
            Some('s') if self.second() == Some('(') => self.node().map(Value::Node),
            Some(':') => self.symbol().map(Value::Sym),
            Some('"') => self.string().map(|s| Value::Str(Arc::from(s))),
            Some('[') => self.list(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn symbol(&mut self) -> Result<Symbol, ReadError> {
        self.bump();
        if self.peek() == Some('"') {
            return self.string().map(Symbol::from);
        }
        let start = self.pos;
        if matches!(self.peek(), Some('$' | '@')) {
            self.bump();
        }
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
            return Err(self.unexpected("a symbol name"));
        }
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if matches!(self.peek(), Some('?' | '!' | '=')) {
            self.bump();
        }
        Ok(Symbol::intern(&self.source[start..self.pos]))
    }

    fn string(&mut self) -> Result<String, ReadError> {
        self.bump();
        let mut out = String::new();
        loop {
            let escape_at = self.pos;
            match self.bump() {
                None => return Err(ReadError::UnexpectedEof { expected: "closing `\"`" }),
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.escape(escape_at)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, offset: usize) -> Result<char, ReadError> {
        let c = match self.bump() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('u') => {
                if self.bump() != Some('{') {
                    return Err(ReadError::InvalidEscape { offset });
                }
                let start = self.pos;
                self.bump_while(|c| c.is_ascii_hexdigit());
                let digits = &self.source[start..self.pos];
                if self.bump() != Some('}') {
                    return Err(ReadError::InvalidEscape { offset });
                }
                u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(ReadError::InvalidEscape { offset })?
            }
            _ => return Err(ReadError::InvalidEscape { offset }),
        };
        Ok(c)
    }

    fn list(&mut self) -> Result<Value, ReadError> {
        self.bump();
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Value::List(items.into()));
        }
        loop {
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(Value::List(items.into()));
                }
                _ => return Err(self.unexpected("`,` or `]`")),
            }
        }
    }

    fn number(&mut self) -> Result<Value, ReadError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
            if self.rest().starts_with("inf") {
                self.pos += "inf".len();
                return Ok(Value::Float(f64::NEG_INFINITY));
            }
        }
        self.bump_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek() == Some('.') && self.second().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.bump_while(|c| c.is_ascii_digit());
        }

        let text = &self.source[start..self.pos];
        let invalid = || ReadError::InvalidNumber { text: text.to_string(), offset: start };
        if is_float {
            text.parse::<f64>().map(Value::Float).map_err(|_| invalid())
        } else {
            text.parse::<i64>().map(Value::Int).map_err(|_| invalid())
        }
    }

    fn word(&mut self) -> Result<Value, ReadError> {
        let start = self.pos;
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        match &self.source[start..self.pos] {
            "nil" => Ok(Value::Nil),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "NaN" => Ok(Value::Float(f64::NAN)),
            "inf" => Ok(Value::Float(f64::INFINITY)),
            _ => {
                self.pos = start;
                Err(self.unexpected("a value"))
            }
        }
    }
}
