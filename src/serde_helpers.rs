//! Serde support for trees.
//!
//! Nodes serialize in the structural array form of [`Node::to_sexp_array`]:
//! `[":type", child, ...]`. Symbols become strings prefixed with `:`, nil
//! becomes unit (`null` in JSON). Properties and the variant are not part of
//! the structural form and are not serialized.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::ast::{Node, Symbol, Value};

/// Serialize a symbol as `":name"`.
pub fn serialize_symbol<S>(symbol: &Symbol, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&format_args!(":{symbol}"))
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_symbol(self, serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Sym(symbol) => serialize_symbol(symbol, serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.children().len() + 1))?;
        seq.serialize_element(self.node_type())?;
        for child in self {
            seq.serialize_element(child)?;
        }
        seq.end()
    }
}
