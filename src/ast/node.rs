//! The immutable tree node.
//!
//! A [`Node`] is a cheap handle (`Arc`) over a frozen record of type tag,
//! children, properties and variant. Nothing mutates a node after it has been
//! built: every "modification" returns a new handle, and the unchanged children
//! are shared between the old and the new tree.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Shl};
use std::sync::Arc;

use archery::ArcK;
use rpds::{RedBlackTreeMap, Vector};

use super::symbol::Symbol;
use super::value::Value;
use super::variant::{NodeParts, Variant};

pub type Children = Vector<Value, ArcK>;
pub type Properties = RedBlackTreeMap<Symbol, Value, ArcK>;

/// Conversion capability accepted by processors: anything that is, or can
/// present itself as, a [`Node`].
pub trait ToAst {
    fn to_ast(&self) -> Node;
}

impl<T: ToAst + ?Sized> ToAst for &T {
    fn to_ast(&self) -> Node {
        (**self).to_ast()
    }
}

impl<T: ToAst + ?Sized> ToAst for Box<T> {
    fn to_ast(&self) -> Node {
        (**self).to_ast()
    }
}

struct NodeData {
    node_type: Symbol,
    children: Children,
    properties: Properties,
    variant: Variant,
}

#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    /// Creates a plain node.
    pub fn new<K, I>(node_type: K, children: I) -> Self
    where
        K: Into<Symbol>,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::new_with_properties(node_type, children, Properties::new_with_ptr_kind())
    }

    /// Creates a plain node without children.
    pub fn leaf<K: Into<Symbol>>(node_type: K) -> Self {
        Self::new(node_type, std::iter::empty::<Value>())
    }

    /// Creates a plain node carrying extension properties.
    pub fn new_with_properties<K, I>(node_type: K, children: I, properties: Properties) -> Self
    where
        K: Into<Symbol>,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::build(Variant::PLAIN, node_type, children, properties)
    }

    /// Creates a node of the given variant through the variant's factory.
    pub fn build<K, I>(variant: Variant, node_type: K, children: I, properties: Properties) -> Self
    where
        K: Into<Symbol>,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        variant.instantiate(NodeParts {
            node_type: node_type.into(),
            children: children.into_iter().map(Into::into).collect(),
            properties,
        })
    }

    /// Assembles a node from already-prepared parts without running any
    /// factory. This is the default factory of every variant.
    pub fn from_parts(variant: Variant, parts: NodeParts) -> Self {
        Node(Arc::new(NodeData {
            node_type: parts.node_type,
            children: parts.children,
            properties: parts.properties,
            variant,
        }))
    }

    /// The node's type tag, e.g. `:add`.
    pub fn node_type(&self) -> &Symbol {
        &self.0.node_type
    }

    /// All children in order, scalars included. The vector is shared with
    /// every node derived from this one.
    pub fn children(&self) -> &Children {
        &self.0.children
    }

    pub fn child(&self, index: usize) -> Option<&Value> {
        self.0.children.get(index)
    }

    /// Iterates over the children that are nodes, skipping scalars.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.0.children.iter().filter_map(Value::as_node)
    }

    /// Extra attributes applied at construction. They take no part in
    /// equality or hashing.
    pub fn properties(&self) -> &Properties {
        &self.0.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.0.properties.get(name)
    }

    /// The variant this node was built with; [`updated`](Node::updated) and
    /// friends rebuild through it.
    pub fn variant(&self) -> Variant {
        self.0.variant
    }

    /// True when both handles point at the same node instance.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Returns a node with the given fields replaced.
    ///
    /// `None` keeps the current type or children. New properties are merged over
    /// the current ones. When the result would equal this node (same type,
    /// structurally equal children, same merged properties) `self` is returned
    /// without allocating, so handlers may call this unconditionally.
    ///
    /// The returned node is built by this node's variant.
    pub fn updated(
        &self,
        node_type: Option<Symbol>,
        children: Option<Vec<Value>>,
        properties: Option<Properties>,
    ) -> Node {
        let node_type = node_type.unwrap_or_else(|| self.0.node_type.clone());
        let properties = match properties {
            Some(extra) => merge_properties(&self.0.properties, &extra),
            None => self.0.properties.clone(),
        };
        let same_children = children
            .as_ref()
            .is_none_or(|new| new.len() == self.0.children.len() && new.iter().eq(self.0.children.iter()));

        if node_type == self.0.node_type
            && same_children
            && properties_eq(&properties, &self.0.properties)
        {
            return self.clone();
        }

        let children = match children {
            Some(new) => new.into_iter().collect(),
            None => self.0.children.clone(),
        };
        self.0.variant.instantiate(NodeParts {
            node_type,
            children,
            properties,
        })
    }

    pub fn with_type<K: Into<Symbol>>(&self, node_type: K) -> Node {
        self.updated(Some(node_type.into()), None, None)
    }

    pub fn with_children<I>(&self, children: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.updated(None, Some(children.into_iter().map(Into::into).collect()), None)
    }

    pub fn with_property<K: Into<Symbol>, V: Into<Value>>(&self, name: K, value: V) -> Node {
        let extra = Properties::new_with_ptr_kind().insert(name.into(), value.into());
        self.updated(None, None, Some(extra))
    }

    /// Appends every element of `items` as additional children.
    pub fn concat<I>(&self, items: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut children = self.0.children.clone();
        let before = children.len();
        for item in items {
            children.push_back_mut(item.into());
        }
        if children.len() == before {
            return self.clone();
        }
        self.rebuild_with(children)
    }

    /// Appends a single child.
    pub fn append<V: Into<Value>>(&self, child: V) -> Node {
        self.rebuild_with(self.0.children.push_back(child.into()))
    }

    fn rebuild_with(&self, children: Children) -> Node {
        self.0.variant.instantiate(NodeParts {
            node_type: self.0.node_type.clone(),
            children,
            properties: self.0.properties.clone(),
        })
    }

    /// Strict equality: like `==`, and additionally requires the same variant
    /// here and in every nested node.
    pub fn eql(&self, other: &Node) -> bool {
        Node::ptr_eq(self, other)
            || (self.0.variant == other.0.variant
                && self.0.node_type == other.0.node_type
                && self.0.children.len() == other.0.children.len()
                && self.0.children.iter().zip(other.0.children.iter()).all(|(a, b)| a.strict_eq(b)))
    }

    /// Hash consistent with [`eql`](Node::eql): the variant of this node and
    /// of every nested node is mixed in.
    pub fn strict_hash<H: Hasher>(&self, state: &mut H) {
        self.0.node_type.hash(state);
        self.0.variant.hash(state);
        state.write_usize(self.0.children.len());
        for child in self.0.children.iter() {
            child.strict_hash(state);
        }
    }

    fn structurally_eq(&self, other: &Node) -> bool {
        self.0.node_type == other.0.node_type
            && self.0.children.len() == other.0.children.len()
            && self.0.children.iter().eq(other.0.children.iter())
    }

    /// The type followed by the children, for slice-pattern matching:
    ///
    /// ```ignore
    /// if let [Value::Sym(t), Value::Sym(name), value] = node.deconstruct().as_slice() { .. }
    /// ```
    pub fn deconstruct(&self) -> Vec<Value> {
        std::iter::once(Value::Sym(self.0.node_type.clone()))
            .chain(self.0.children.iter().cloned())
            .collect()
    }
}

/// Builds a property map from `(name, value)` pairs.
pub fn props<I, K, V>(entries: I) -> Properties
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Symbol>,
    V: Into<Value>,
{
    let mut properties = Properties::new_with_ptr_kind();
    for (name, value) in entries {
        properties.insert_mut(name.into(), value.into());
    }
    properties
}

fn merge_properties(base: &Properties, extra: &Properties) -> Properties {
    extra
        .iter()
        .fold(base.clone(), |merged, (name, value)| merged.insert(name.clone(), value.clone()))
}

fn properties_eq(a: &Properties, b: &Properties) -> bool {
    a.size() == b.size() && a.iter().eq(b.iter())
}

impl ToAst for Node {
    fn to_ast(&self) -> Node {
        self.clone()
    }
}

impl<T: ToAst + ?Sized> PartialEq<T> for Node {
    fn eq(&self, other: &T) -> bool {
        let other = other.to_ast();
        Node::ptr_eq(self, &other) || self.structurally_eq(&other)
    }
}

impl Eq for Node {}

// Consistent with `==`, which ignores the variant. `StrictKey` adds it back.
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node_type.hash(state);
        state.write_usize(self.0.children.len());
        for child in self.0.children.iter() {
            child.hash(state);
        }
    }
}

/// Map key comparing nodes strictly (see [`Node::eql`]).
#[derive(Clone, Debug)]
pub struct StrictKey(pub Node);

impl PartialEq for StrictKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eql(&other.0)
    }
}

impl Eq for StrictKey {}

impl Hash for StrictKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.strict_hash(state);
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Value;
    type IntoIter = rpds::vector::Iter<'a, Value, ArcK>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.children.iter()
    }
}

impl<V: Into<Value>> Add<Vec<V>> for &Node {
    type Output = Node;

    fn add(self, items: Vec<V>) -> Node {
        self.concat(items)
    }
}

impl<V: Into<Value>> Add<Vec<V>> for Node {
    type Output = Node;

    fn add(self, items: Vec<V>) -> Node {
        self.concat(items)
    }
}

impl Add<&Node> for &Node {
    type Output = Node;

    fn add(self, other: &Node) -> Node {
        self.concat(other.children().iter().cloned())
    }
}

impl<V: Into<Value>> Shl<V> for &Node {
    type Output = Node;

    fn shl(self, child: V) -> Node {
        self.append(child)
    }
}

impl<V: Into<Value>> Shl<V> for Node {
    type Output = Node;

    fn shl(self, child: V) -> Node {
        self.append(child)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sexp())
    }
}
