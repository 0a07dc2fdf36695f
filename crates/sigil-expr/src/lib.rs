//! Combinator expression trees
//!
//! The syntactic side of the sigil engine: the vertex alphabet and the
//! ordered expression tree that the type engine assigns signatures to.

pub mod tree;
pub mod vertex;

pub use tree::{ExprTree, NodeId};
pub use vertex::{Argument, Builtin, SymbolKind, Vertex};
