pub mod ast;
pub mod cli;
pub mod error;
pub mod logging;
pub mod processor;
pub mod serde_helpers;

pub use ast::{Node, Symbol, ToAst, Value, Variant, sym};
pub use error::{PipelineError, ProcessError, ReadError};
pub use processor::{HandlerTable, Processor};

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
}
