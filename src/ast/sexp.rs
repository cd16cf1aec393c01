//! Textual renderings of nodes and the `s(...)` builder sugar.
//!
//! Three renderings are provided:
//!
//! - [`Node::to_sexp`]: `(type child ...)`, the human-oriented form. Underscores in
//!   the type are shown as dashes; node children start a new line, indented by two
//!   spaces per nesting level.
//! - [`Node::inspect`]: `s(:type, child, ...)`, which reads back into an equal
//!   node with [`crate::ast::reader::read`].
//! - [`Node::to_sexp_array`]: the same tree as nested lists of values, the type
//!   first.

use std::fmt::Write as _;

use super::node::Node;
use super::symbol::Symbol;
use super::value::Value;

const INDENT: &str = "  ";

impl Node {
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self, 0, &mut out);
        out
    }

    pub fn inspect(&self) -> String {
        let mut out = String::new();
        write_inspect(self, 0, &mut out);
        out
    }

    pub fn to_sexp_array(&self) -> Value {
        let items: Vec<Value> = std::iter::once(Value::Sym(self.node_type().clone()))
            .chain(self.children().iter().map(|child| match child {
                Value::Node(node) => node.to_sexp_array(),
                other => other.clone(),
            }))
            .collect();
        Value::List(items.into())
    }
}

fn fancy_type(node_type: &Symbol) -> String {
    node_type.as_str().replace('_', "-")
}

fn write_sexp(node: &Node, level: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(level));
    out.push('(');
    out.push_str(&fancy_type(node.node_type()));
    for child in node.children().iter() {
        match child {
            Value::Node(inner) => {
                out.push('\n');
                write_sexp(inner, level + 1, out);
            }
            scalar => {
                out.push(' ');
                write_value(scalar, out);
            }
        }
    }
    out.push(')');
}

fn write_inspect(node: &Node, level: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(level));
    let _ = write!(out, "s({:?}", node.node_type());
    for child in node.children().iter() {
        match child {
            Value::Node(inner) => {
                out.push_str(",\n");
                write_inspect(inner, level + 1, out);
            }
            scalar => {
                out.push_str(", ");
                write_value(scalar, out);
            }
        }
    }
    out.push(')');
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Nil => out.push_str("nil"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => {
            let _ = write!(out, "{f:?}");
        }
        Value::Str(s) => out.push_str(&quote_str(s)),
        Value::Sym(symbol) => {
            let _ = write!(out, "{symbol:?}");
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Node(node) => write_inspect(node, 0, out),
    }
}

/// Renders a single value the way it appears inside `inspect` output.
pub fn inspect_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Double-quotes `s`, escaping quotes, backslashes and control characters.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Function form of the builder sugar: `s("add", [lhs, rhs])`.
pub fn s<K, I>(node_type: K, children: I) -> Node
where
    K: Into<Symbol>,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Node::new(node_type, children)
}

/// Builds a node from a type and any number of children convertible to
/// [`Value`](crate::ast::Value):
///
/// ```
/// use astkit::{s, ast::sym};
///
/// let node = s!("gasgn", sym("$foo"), s!("integer", 1));
/// assert_eq!(node.inspect(), "s(:gasgn, :$foo,\n  s(:integer, 1))");
/// ```
#[macro_export]
macro_rules! s {
    ($node_type:expr $(,)?) => {
        $crate::ast::Node::leaf($node_type)
    };
    ($node_type:expr, $($child:expr),+ $(,)?) => {
        $crate::ast::Node::new($node_type, [$($crate::ast::Value::from($child)),+])
    };
}
