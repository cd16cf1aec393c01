use std::fmt;
use std::hash::{Hash, Hasher};

use super::node::{Children, Node, Properties};
use super::symbol::Symbol;

/// The raw fields a node is assembled from.
#[derive(Clone)]
pub struct NodeParts {
    pub node_type: Symbol,
    pub children: Children,
    pub properties: Properties,
}

/// Factory signature for a variant: receives the variant itself and the parts,
/// and must produce a node (normally via [`Node::from_parts`]).
pub type Factory = fn(Variant, NodeParts) -> Node;

/// The runtime kind of a node.
///
/// Plain nodes use [`Variant::PLAIN`]. Callers that need their own kinds of node
/// (nodes carrying declared properties, nodes that normalize their fields when
/// built) declare a constant `Variant` with a name and optionally a factory.
/// [`Node::updated`] always rebuilds through the receiver's variant, so a node
/// never loses its kind when it is modified.
///
/// Two variants are the same when their names are equal.
#[derive(Clone, Copy)]
pub struct Variant {
    name: &'static str,
    factory: Factory,
}

impl Variant {
    pub const PLAIN: Variant = Variant::new("Node");

    pub const fn new(name: &'static str) -> Self {
        Variant { name, factory: Node::from_parts }
    }

    pub const fn with_factory(name: &'static str, factory: Factory) -> Self {
        Variant { name, factory }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a node of this variant.
    pub fn instantiate(self, parts: NodeParts) -> Node {
        (self.factory)(self, parts)
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variant {}

impl Hash for Variant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variant").field(&self.name).finish()
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::PLAIN
    }
}
