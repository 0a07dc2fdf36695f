//! Sigil Type Engine
//!
//! A structural type system over combinator expression trees: assigns a
//! type term to every expression, reduces applications by matching formal
//! inputs against actual argument types, decides an inheritance lattice
//! with unions, a variadic tail marker, and lambda arrows, and infers
//! per-placeholder input types into a closed signature.
//!
//! The engine is a pure, single-threaded computation over interned terms;
//! typing failures stay in-band as `ill_formed` subterms and structured
//! diagnostics flow through an injected sink.

#![warn(missing_docs)]

pub mod context;
pub mod diag;
pub mod env;
pub mod error;
pub mod infer;
pub mod inherit;
pub mod intersect;
pub mod oracle;
pub mod reduce;
pub mod syntax;
pub mod ty;

pub use context::TypeContext;
pub use diag::{CollectingSink, DiagnosticSink, Location, NullSink, TypeDiagnostic};
pub use env::ArgumentEnv;
pub use error::TypeError;
pub use infer::{
    contains_all_args_up_to, explicit_arity, infer_arity, infer_type, type_of,
};
pub use inherit::{equal_types, inherits};
pub use intersect::intersect;
pub use oracle::SignatureStore;
pub use reduce::{reduce, Trace};
pub use syntax::{parse, print};
pub use ty::{PrimitiveType, Type, TypeId};
