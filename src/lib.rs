//! Control-flow unwarping: turns a CFG of warp-terminated basic blocks into a
//! structured AST of `if`/`while`/`repeat`/`for` statements and reconstructed
//! `and`/`or` expressions.
//!
//! # Scope
//!
//! This crate owns exactly the unwarping core: [`block`] and [`warp`] define the
//! input graph, [`ast`] defines the output tree, and [`unwarp::primary_pass`] /
//! [`unwarp::final_pass`] are the two calls that turn one into the other. Bytecode
//! decoding, slot allocation beyond the one cleanup step the logical-expression
//! reducer needs (see [`slotworks`]), and source pretty-printing all live outside
//! this crate.
//!
//! # Panicking
//!
//! Nothing here panics on malformed *input data* — a CFG that doesn't match the
//! shapes this core expects produces an [`error::Error`], not a panic. `expect()`
//! calls that do appear guard invariants this core itself is responsible for
//! upholding between steps (e.g. a statements-list never ending up with a stray
//! missing nested body), not anything a caller's graph can trigger.
//!
//! # Missing features
//!
//! No goto/label support: warps that don't fit `Flow`/`Jump`/`Conditional`/the two
//! loop headers/`End` are out of scope (see the crate's data model notes).

pub mod ast;
pub mod block;
pub mod body;
pub mod error;
pub mod prelude;
pub mod slotworks;
pub mod unwarp;
pub mod warp;

pub use crate::body::Body;
pub use crate::error::{Error, Result};

/// Runs both passes over `root` to completion, leaving every reachable statements-list
/// holding `Body::Statements`.
pub fn unwarp(arena: &mut block::Arena, root: &mut Body) -> Result<()> {
    unwarp::primary_pass(arena, root)?;
    unwarp::final_pass(arena, root)
}
