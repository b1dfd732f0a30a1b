//! dmdoc — API documentation for D projects, cross-referenced through a symbol database.
//!
//! The pipeline runs in two phases over the compiler's JSON output:
//! [`symbols::gather`] records every documented symbol, then [`writer`]
//! renders each module with every code reference resolved against the
//! frozen [`symbols::SymbolDatabase`].

pub mod ast;
pub mod comment;
pub mod error;
pub mod frontend;
pub mod macros;
pub mod render;
pub mod symbols;
pub mod writer;

pub use error::{DocError, Result};
