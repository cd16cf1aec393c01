use thiserror::Error;

/// Boxed error returned by a pipeline pass.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the dispatcher itself. Handler errors are the
/// processor's own type and pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("cannot process {found} `{repr}`: value does not support to_ast")]
    MissingConversionCapability { found: &'static str, repr: String },
}

/// Errors from reading the `s(:type, ...)` notation. Offsets are byte offsets
/// into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("unexpected {found:?} at offset {offset}, expected {expected}")]
    Unexpected {
        found: char,
        offset: usize,
        expected: &'static str,
    },

    #[error("invalid number `{text}` at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transform `{0}` is already registered")]
    DuplicateTransform(String),

    #[error("transform `{id}` depends on unknown transform `{dependency}`")]
    UnknownDependency { id: String, dependency: String },

    #[error("transform dependencies form a cycle through `{0}`")]
    Cycle(String),

    #[error("transform `{id}` failed")]
    Transform {
        id: String,
        #[source]
        source: BoxError,
    },

    #[error("transform `{id}` returned a {found} instead of a node")]
    NotANode { id: String, found: &'static str },
}
