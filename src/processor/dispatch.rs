use tracing::trace;

use crate::ast::{Node, ToAst, Value};
use crate::error::ProcessError;

use super::handlers::HandlerTable;

/// Input accepted by [`Processor::process`].
///
/// Anything implementing [`ToAst`] converts to its node. A [`Value`] converts
/// when it holds a node; `Value::Nil` is the absent input, and every other
/// payload lacks the conversion capability.
pub trait ProcessInput {
    fn to_process_input(&self) -> Result<Option<Node>, ProcessError>;
}

impl<T: ToAst + ?Sized> ProcessInput for T {
    fn to_process_input(&self) -> Result<Option<Node>, ProcessError> {
        Ok(Some(self.to_ast()))
    }
}

impl ProcessInput for Value {
    fn to_process_input(&self) -> Result<Option<Node>, ProcessError> {
        match self {
            Value::Nil => Ok(None),
            Value::Node(node) => Ok(Some(node.clone())),
            other => Err(ProcessError::MissingConversionCapability {
                found: other.kind_name(),
                repr: format!("{other:?}"),
            }),
        }
    }
}

/// A dispatch-by-type tree processor.
///
/// Implementors expose a [`HandlerTable`] mapping type tags to handler
/// methods and may override [`handler_missing`](Processor::handler_missing).
/// Any state the handlers need (counters, symbol tables, options) lives in the
/// implementing struct.
pub trait Processor: Sized {
    /// Error type of the handlers. The dispatcher's own failures convert into it.
    type Error: From<ProcessError>;

    fn handlers(&self) -> &HandlerTable<Self>;

    /// Invoked for nodes whose type has no registered handler. Returning
    /// `Ok(None)` passes the node through unchanged.
    fn handler_missing(&mut self, _node: &Node) -> Result<Option<Value>, Self::Error> {
        Ok(None)
    }

    /// Dispatches one node to its handler.
    ///
    /// Returns `Value::Nil` for nil input. When the handler (or
    /// `handler_missing`) produces nothing or nil, the input node itself is
    /// returned; otherwise the handler's value is returned as is.
    fn process<I: ProcessInput + ?Sized>(&mut self, input: &I) -> Result<Value, Self::Error> {
        let Some(node) = input.to_process_input()? else {
            return Ok(Value::Nil);
        };

        let handler = self.handlers().get(node.node_type());
        trace!(node_type = %node.node_type(), handled = handler.is_some(), "dispatch");

        let result = match handler {
            Some(handler) => handler(self, &node)?,
            None => self.handler_missing(&node)?,
        };
        Ok(match result {
            None | Some(Value::Nil) => Value::Node(node),
            Some(value) => value,
        })
    }

    /// Processes every element in order. A `&Node` iterates over its children.
    fn process_all<'a, I, T>(&mut self, nodes: I) -> Result<Vec<Value>, Self::Error>
    where
        I: IntoIterator<Item = &'a T>,
        T: ProcessInput + ?Sized + 'a,
    {
        nodes.into_iter().map(|node| self.process(node)).collect()
    }

    /// Processes the node children of `node` and rebuilds it from the results.
    /// Scalar children are kept as they are. If every child comes back
    /// unchanged, `node` itself is returned.
    fn process_children(&mut self, node: &Node) -> Result<Node, Self::Error> {
        let mut children = Vec::with_capacity(node.children().len());
        for child in node {
            children.push(match child {
                Value::Node(inner) => self.process(inner)?,
                scalar => scalar.clone(),
            });
        }
        Ok(node.with_children(children))
    }
}
