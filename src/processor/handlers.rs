use std::fmt;

use rustc_hash::FxHashMap;

use crate::ast::{Node, Symbol, Value};

use super::dispatch::Processor;

/// A handler method: receives the processor and the node being dispatched.
/// `Ok(None)` means "no replacement" and yields the original node.
pub type Handler<P> = fn(&mut P, &Node) -> Result<Option<Value>, <P as Processor>::Error>;

/// Type tag to handler lookup table.
///
/// Build it with the [`handlers!`](crate::handlers) macro, which follows the
/// `on_<type>` naming convention, or register handlers explicitly. A table
/// holds plain function pointers, so it can live in a processor field or in a
/// `static`.
pub struct HandlerTable<P: Processor> {
    map: FxHashMap<Symbol, Handler<P>>,
}

impl<P: Processor> HandlerTable<P> {
    pub fn new() -> Self {
        HandlerTable { map: FxHashMap::default() }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<K: Into<Symbol>>(mut self, node_type: K, handler: Handler<P>) -> Self {
        self.register(node_type, handler);
        self
    }

    /// Registers `handler` for `node_type`, returning the handler it replaced.
    pub fn register<K: Into<Symbol>>(&mut self, node_type: K, handler: Handler<P>) -> Option<Handler<P>> {
        self.map.insert(node_type.into(), handler)
    }

    pub fn get(&self, node_type: &Symbol) -> Option<Handler<P>> {
        self.map.get(node_type).copied()
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.map.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.map.keys()
    }
}

impl<P: Processor> Default for HandlerTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Processor> Clone for HandlerTable<P> {
    fn clone(&self) -> Self {
        HandlerTable { map: self.map.clone() }
    }
}

impl<P: Processor> fmt::Debug for HandlerTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.map.keys().map(Symbol::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("HandlerTable").field("tags", &tags).finish()
    }
}

/// Builds a [`HandlerTable`].
///
/// With explicit handlers:
///
/// ```ignore
/// handlers!(Counter { "def" => Counter::on_def, "lvar" => Counter::visit_variable })
/// ```
///
/// With the naming convention, where each listed tag `foo` is routed to the
/// method `on_foo`:
///
/// ```ignore
/// handlers!(Counter: root, def, body)
/// ```
#[macro_export]
macro_rules! handlers {
    ($processor:ty { $($tag:literal => $handler:path),* $(,)? }) => {
        $crate::processor::HandlerTable::<$processor>::new()
            $(.with($tag, $handler))*
    };
    ($processor:ty : $($tag:ident),+ $(,)?) => {
        $crate::__private::paste! {
            $crate::processor::HandlerTable::<$processor>::new()
                $(.with(stringify!($tag), <$processor>::[<on_ $tag>]))+
        }
    };
}
