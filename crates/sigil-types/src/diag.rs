//! Typing diagnostics and the sink they are emitted through
//!
//! The reducer and the inference driver report failures as structured
//! diagnostics while rewriting the offending subterm to `ill_formed`.
//! Diagnostics flow through an injected [`DiagnosticSink`]; the contract
//! is fire-and-forget, the engine never retries or suspends on a sink.

use std::fmt;

use thiserror::Error;

/// Where in an expression tree a diagnostic points
///
/// `expr_index` is the pre-order index of the offending node; both it and
/// the rendered snippet are absent when the reducer ran without a
/// reference expression tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    /// Name of the procedure being typed
    pub procedure: String,
    /// Pre-order index of the offending node
    pub expr_index: Option<usize>,
    /// Rendered subexpression at the offending node
    pub snippet: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.procedure.is_empty() {
            write!(f, " in procedure '{}'", self.procedure)?;
        }
        if let Some(index) = self.expr_index {
            write!(f, " at pre-order index {}", index)?;
        }
        if let Some(snippet) = &self.snippet {
            write!(f, " (subexpression '{}')", snippet)?;
        }
        Ok(())
    }
}

/// A typing failure reported by the reducer or the inference driver
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeDiagnostic {
    /// The head of an application is not typed as a function
    #[error("type reduction error{location}: the operator is not typed as a function but as {observed}")]
    NotAFunction {
        /// Offending position
        location: Location,
        /// Observed operator type
        observed: String,
    },

    /// Too few or too many actual arguments
    #[error(
        "type reduction error{location}: got {actual} argument(s) but the operator takes {}",
        required_arguments(.declared, .variadic)
    )]
    WrongArgumentCount {
        /// Offending position
        location: Location,
        /// Number of arguments applied
        actual: usize,
        /// Number of inputs the operator declares
        declared: usize,
        /// Whether the operator's last input is a variadic tail
        variadic: bool,
    },

    /// An argument neither inherits from the expected input nor can be
    /// partially applied to it
    #[error(
        "type reduction error{location}: {} has type {observed} which does not inherit from {expected}",
        offending_argument(.position, .via_output)
    )]
    InputMismatch {
        /// Offending position
        location: Location,
        /// 1-based position of the argument within the application
        position: usize,
        /// Observed type (of the argument's output when `via_output`)
        observed: String,
        /// Expected input type
        expected: String,
        /// True when the argument was a function whose output was checked
        via_output: bool,
    },

    /// An argument reference at a position its parent's signature
    /// does not cover
    #[error(
        "type inference error{location}: placeholder #{index} sits at position {position} \
         which its parent's signature does not cover"
    )]
    MalformedArgument {
        /// Offending position
        location: Location,
        /// Placeholder index
        index: u32,
        /// 0-based sibling position under the parent operator
        position: usize,
    },
}

fn required_arguments(declared: &usize, variadic: &bool) -> String {
    if *variadic {
        format!("{} or more", declared - 1)
    } else {
        format!("exactly {}", declared)
    }
}

fn offending_argument(position: &usize, via_output: &bool) -> String {
    if *via_output {
        format!("the output of argument {}", position)
    } else {
        format!("argument {}", position)
    }
}

/// Receiver for typing diagnostics
pub trait DiagnosticSink {
    /// Deliver one diagnostic. Fire-and-forget: failures to record are
    /// the sink's own business.
    fn report(&mut self, diagnostic: TypeDiagnostic);
}

/// A sink that discards every diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: TypeDiagnostic) {}
}

/// A sink that accumulates diagnostics for later inspection
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Vec<TypeDiagnostic>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics collected so far, in emission order
    pub fn diagnostics(&self) -> &[TypeDiagnostic] {
        &self.diagnostics
    }

    /// Check if nothing was reported
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics collected
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Consume the sink, yielding the collected diagnostics
    pub fn into_diagnostics(self) -> Vec<TypeDiagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: TypeDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
