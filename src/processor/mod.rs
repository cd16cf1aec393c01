//! Dispatch-by-type tree processing.
//!
//! A [`Processor`] routes each node to the handler registered for its type
//! tag, falling back to [`Processor::handler_missing`]. Dispatch is a single,
//! non-recursive step: handlers decide whether and how to descend by calling
//! [`Processor::process`] or [`Processor::process_all`] on children, and build
//! the resulting tree bottom-up from the returned values.
//!
//! ```
//! use astkit::ast::{Node, Value};
//! use astkit::error::ProcessError;
//! use astkit::processor::{HandlerTable, Processor};
//! use astkit::{handlers, s};
//!
//! struct Fold {
//!     handlers: HandlerTable<Fold>,
//! }
//!
//! impl Fold {
//!     fn on_add(&mut self, node: &Node) -> Result<Option<Value>, ProcessError> {
//!         let terms = self.process_all(node)?;
//!         let sum: Option<i64> = terms
//!             .iter()
//!             .map(|term| term.as_node().and_then(|n| n.child(0)).and_then(Value::as_int))
//!             .sum();
//!         Ok(sum.map(|total| s!("integer", total).into()))
//!     }
//! }
//!
//! impl Processor for Fold {
//!     type Error = ProcessError;
//!
//!     fn handlers(&self) -> &HandlerTable<Self> {
//!         &self.handlers
//!     }
//! }
//!
//! let mut fold = Fold { handlers: handlers!(Fold: add) };
//! let tree = s!("add", s!("integer", 1), s!("add", s!("integer", 2), s!("integer", 3)));
//! assert_eq!(fold.process(&tree).unwrap(), Value::from(s!("integer", 6)));
//! ```

mod dispatch;
mod handlers;
pub mod pipeline;

pub use dispatch::{ProcessInput, Processor};
pub use handlers::{Handler, HandlerTable};
pub use pipeline::{Pass, Pipeline, Transform, pass_fn};
