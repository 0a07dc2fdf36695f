//! Core type-term definitions for the sigil type system

use std::fmt;

/// Unique identifier for a type term in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Primitive (leaf) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    /// The `boolean` type
    Boolean,
    /// The `contin` type (continuous values)
    Contin,
    /// The `action_result` type
    ActionResult,
    /// The `definite_object` type
    DefiniteObject,
    /// The `action_definite_object` type
    ActionDefiniteObject,
    /// The `indefinite_object` type
    IndefiniteObject,
    /// The `message` type
    Message,
    /// The `action_symbol` type
    ActionSymbol,
    /// The `wild_card` type
    WildCard,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Contin => write!(f, "contin"),
            PrimitiveType::ActionResult => write!(f, "action_result"),
            PrimitiveType::DefiniteObject => write!(f, "definite_object"),
            PrimitiveType::ActionDefiniteObject => write!(f, "action_definite_object"),
            PrimitiveType::IndefiniteObject => write!(f, "indefinite_object"),
            PrimitiveType::Message => write!(f, "message"),
            PrimitiveType::ActionSymbol => write!(f, "action_symbol"),
            PrimitiveType::WildCard => write!(f, "wild_card"),
        }
    }
}

/// Function-arrow type: inputs and one output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LambdaType {
    /// Input types, in order; a trailing [`Type::ArgList`] marks a variadic tail
    pub inputs: Vec<TypeId>,
    /// Output type
    pub output: TypeId,
}

/// A not-yet-reduced application of an operator type to argument types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationType {
    /// Type of the operator
    pub operator: TypeId,
    /// Types of the applied arguments, in order
    pub args: Vec<TypeId>,
}

/// Sum type: any of the member types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    /// Member types, kept in the canonical structural order
    pub members: Vec<TypeId>,
}

/// Variadic-tail marker inside a lambda's input list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgListType {
    /// Element type accepted by the tail
    pub element: TypeId,
}

/// The core type-term representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive leaf type
    Primitive(PrimitiveType),

    /// Unresolved argument placeholder `#N` (1-based)
    Argument(u32),

    /// Function-arrow type
    Lambda(LambdaType),

    /// Pending application, dissolved by reduction
    Application(ApplicationType),

    /// Sum type
    Union(UnionType),

    /// Variadic-tail marker
    ArgList(ArgListType),

    /// Top of the inheritance lattice
    Unknown,

    /// Bottom of the inheritance lattice; marks a typing failure
    IllFormed,
}

impl Type {
    /// Check if this term is a primitive leaf
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Check if this term is an argument placeholder
    pub fn is_argument(&self) -> bool {
        matches!(self, Type::Argument(_))
    }

    /// Check if this term is a lambda
    pub fn is_lambda(&self) -> bool {
        matches!(self, Type::Lambda(_))
    }

    /// Check if this term is an application
    pub fn is_application(&self) -> bool {
        matches!(self, Type::Application(_))
    }

    /// Check if this term is a union
    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    /// Check if this term is an arg-list marker
    pub fn is_arg_list(&self) -> bool {
        matches!(self, Type::ArgList(_))
    }

    /// Check if this term is the unknown type
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Check if this term is the ill-formed type
    pub fn is_ill_formed(&self) -> bool {
        matches!(self, Type::IllFormed)
    }

    /// Get the primitive if this is a primitive leaf
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Get the lambda if this is a lambda
    pub fn as_lambda(&self) -> Option<&LambdaType> {
        match self {
            Type::Lambda(l) => Some(l),
            _ => None,
        }
    }

    /// Get the union if this is a union
    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Type::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Get the arg-list marker if this is one
    pub fn as_arg_list(&self) -> Option<&ArgListType> {
        match self {
            Type::ArgList(a) => Some(a),
            _ => None,
        }
    }

    /// Child terms in order (inputs before output for lambdas, operator
    /// before arguments for applications)
    pub fn children(&self) -> Vec<TypeId> {
        match self {
            Type::Lambda(l) => {
                let mut out = l.inputs.clone();
                out.push(l.output);
                out
            }
            Type::Application(a) => {
                let mut out = vec![a.operator];
                out.extend_from_slice(&a.args);
                out
            }
            Type::Union(u) => u.members.clone(),
            Type::ArgList(a) => vec![a.element],
            _ => Vec::new(),
        }
    }

    /// Rank used by the canonical structural ordering: operator tags first,
    /// then primitives, then the lattice extremes, then placeholders by index.
    pub(crate) fn tag_order(&self) -> (u8, u32) {
        match self {
            Type::Lambda(_) => (0, 0),
            Type::Application(_) => (1, 0),
            Type::Union(_) => (2, 0),
            Type::ArgList(_) => (3, 0),
            Type::Primitive(p) => (4, *p as u32),
            Type::Unknown => (5, 0),
            Type::IllFormed => (6, 0),
            Type::Argument(n) => (7, *n),
        }
    }
}

/// Clamp an input index against a signed arity.
///
/// For a variadic arity (negative), indices at or past the variadic tail
/// collapse to the tail's position; fixed arities pass the index through.
pub fn convert_index(arity: i32, index: i32) -> i32 {
    let ap = -arity;
    if ap > 0 && index >= ap {
        ap - 1
    } else {
        index
    }
}

/// Minimum number of arguments admitted by a signed arity.
pub fn abs_min_arity(arity: i32) -> i32 {
    if arity < 0 {
        -arity - 1
    } else {
        arity
    }
}
