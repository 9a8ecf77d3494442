//! # Error Taxonomy
//!
//! Every failure the compilation engine can produce is recoverable and lands in one
//! of three buckets:
//!
//! * [`ConstructionError`]: a property or option could not be built at all.
//! * [`ValidationError`]: a cross-property or cross-entity rule was violated.
//! * [`CompositionError`]: an aggregate references a constituent it does not hold.
//!
//! [`QcmdError`] wraps all three so call sites can use a single `?`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QcmdError {
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("property key cannot be empty")]
    EmptyKey,
    #[error("invalid property key '{0}': keys cannot contain ',', '=' or whitespace")]
    InvalidKey(String),
    #[error("option flag cannot be empty")]
    EmptyFlag,
    #[error("invalid option flag '{0}': flags are given without a leading dash and without whitespace")]
    InvalidFlag(String),
    #[error("invalid option name '{0}': names cannot contain '='")]
    InvalidName(String),
    #[error("positional argument '{flag}' cannot carry a name or properties")]
    PositionalWithArguments { flag: String },
    #[error("-{flag} takes a single verbatim argument and cannot carry properties")]
    RawWithProperties { flag: String },
    #[error("-{flag} requires an argument")]
    MissingArgument { flag: String },
    #[error("cannot parse an option from an empty token list")]
    NoTokens,
    #[error("'{0}' is not a key=value element")]
    MalformedProperty(String),
    #[error("option '{flag}' has unexpected trailing tokens")]
    TrailingTokens { flag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("property '{key}' is already set on -{flag} and is not repeatable")]
    DuplicateKey { flag: String, key: String },
    #[error("a cpu specification takes one id or an inclusive range, got {count} values")]
    CpuArity { count: usize },
    #[error("cpu range {start}-{end} is reversed")]
    InvalidCpuRange { start: u32, end: u32 },
    #[error("'{second}' cannot be set because '{first}' is already set")]
    ExclusiveAttributes { first: String, second: String },
    #[error("-{flag}: '{key}' cannot be combined with {reason}")]
    IncompatibleProperties {
        flag: String,
        key: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("{relation} references node {node}, which was never added")]
    UnknownNode { relation: String, node: u32 },
    #[error("node {node} has already been added")]
    DuplicateNode { node: u32 },
    #[error("{entry} is missing a required '{attribute}'")]
    MissingAttribute { entry: String, attribute: String },
}
