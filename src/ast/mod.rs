//! Immutable, structurally comparable syntax tree nodes.
//!
//! The tree format is grammar-agnostic: a node is a symbolic type tag plus an
//! ordered list of children, where each child is either another node or an
//! opaque scalar [`Value`].

pub mod node;
pub mod reader;
pub mod sexp;
pub mod symbol;
pub mod value;
pub mod variant;

pub use node::{Children, Node, Properties, StrictKey, ToAst, props};
pub use reader::{read, read_value};
pub use sexp::s;
pub use symbol::Symbol;
pub use value::{Value, sym};
pub use variant::{Factory, NodeParts, Variant};
