use lalrpop_util::lalrpop_mod;

pub mod assoclist;
pub mod context;
pub mod errors;
pub mod eval;
pub mod program;
pub mod resolve;
pub mod syntax;
pub mod typecheck;
pub mod wasm;

lalrpop_mod!(#[allow(clippy::all)] pub grammar);

pub use crate::eval::{evaluate, EvalMode};
pub use crate::resolve::resolve_command as resolve;
pub use crate::syntax::{render, RenderMode};
pub use crate::typecheck::type_of;
