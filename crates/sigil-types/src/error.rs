//! Type system errors
//!
//! Only parse and structural errors at the external interface escape as
//! `Err`; typing failures stay in-band as `ill_formed` subterms.

use thiserror::Error;

/// Errors that can occur at the type-engine interface
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// Unrecognized token in a type expression
    #[error("unrecognized type token '{token}'")]
    UnexpectedToken {
        /// The rejected token
        token: String,
    },

    /// `#0` or a malformed placeholder token
    #[error("placeholder indices count from 1; '{token}' is not valid")]
    InvalidPlaceholder {
        /// The rejected token
        token: String,
    },

    /// Input ended while a term was still open
    #[error("unexpected end of type expression")]
    UnexpectedEnd,

    /// Leftover tokens after a complete term
    #[error("unexpected trailing token '{token}' after type expression")]
    TrailingToken {
        /// The first leftover token
        token: String,
    },

    /// Leaf token written with children
    #[error("'{token}' is a leaf type and takes no children")]
    UnexpectedChildren {
        /// The leaf token
        token: String,
    },

    /// Operator written with too few children
    #[error("'{operator}' requires at least one child")]
    MissingChildren {
        /// The operator token
        operator: String,
    },

    /// `arg_list` with a child count other than one
    #[error("arg_list takes exactly one child, got {actual}")]
    ArgListArity {
        /// Observed child count
        actual: usize,
    },

    /// No signature registered for a symbol
    #[error("no signature registered for {kind} '{name}'")]
    UndefinedSymbol {
        /// Namespace of the symbol
        kind: String,
        /// Symbol name
        name: String,
    },
}
