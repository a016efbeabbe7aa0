use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("variable {0} not found")]
    UnboundIdentifier(String),
    #[error("type {0} not found")]
    UnboundTypeIdentifier(String),
}

/// Types are stored already rendered against the context they were found in
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("variable {0} not found")]
    UnboundIdentifier(String),
    #[error("{0} does not name a term")]
    WrongBinding(String),
    #[error("expected type {expected} but got {found} instead")]
    TypeMismatch { expected: String, found: String },
    #[error("label {0} not found")]
    LabelNotFound(String),
    #[error("no case for label {0}")]
    MissingBranch(String),
    #[error("case expression has no branches")]
    EmptyCase,
    #[error("expected a function type but got {0}")]
    NonFunctionApplied(String),
    #[error("can only project record types, got {0}")]
    NonRecordProjected(String),
    #[error("can only case on variant types, got {0}")]
    NonVariantCased(String),
    #[error("tag annotation must be a variant type, got {0}")]
    NonVariantAnnotation(String),
}

/// Raised by a single evaluation step when the term is a normal form
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("no rule applies")]
    NoRuleApplies,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("name error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("type error: {0}")]
    Type(#[from] TypeError),
}
