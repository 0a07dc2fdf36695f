//! The vertex alphabet
//!
//! Every node of an expression tree carries a [`Vertex`]: either a built-in
//! operator, an argument reference, a literal, or a symbol from one of the
//! open namespaces (actions, perceptions, procedures) whose signatures are
//! registered with the type engine rather than baked in.

use std::fmt;

/// A 1-based reference to an input of the enclosing signature (`#N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argument {
    idx: u32,
}

impl Argument {
    /// Create an argument reference. Indices count from 1.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is zero.
    pub fn new(idx: u32) -> Self {
        assert!(idx > 0, "argument indices count from 1");
        Argument { idx }
    }

    /// The 1-based index.
    pub fn idx(&self) -> u32 {
        self.idx
    }

    /// The index shifted to count from 0.
    pub fn idx_from_zero(&self) -> usize {
        (self.idx - 1) as usize
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.idx)
    }
}

/// Built-in operators with fixed, engine-known signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Boolean constant `true`
    True,
    /// Boolean constant `false`
    False,
    /// Variadic boolean conjunction
    And,
    /// Variadic boolean disjunction
    Or,
    /// Boolean negation
    Not,
    /// Variadic continuous addition
    Plus,
    /// Variadic continuous multiplication
    Times,
    /// Continuous comparison, yields boolean
    Greater,
    /// Conditional over continuous branches
    ContinIf,
    /// Conditional over boolean branches
    BooleanIf,
    /// Sequential conjunction of action results
    AndSeq,
    /// Sequential disjunction of action results
    OrSeq,
    /// Unconditional sequential execution of actions
    ExecSeq,
}

impl Builtin {
    /// The printed operator name.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::True => "true",
            Builtin::False => "false",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Not => "not",
            Builtin::Plus => "plus",
            Builtin::Times => "times",
            Builtin::Greater => "greater",
            Builtin::ContinIf => "contin_if",
            Builtin::BooleanIf => "boolean_if",
            Builtin::AndSeq => "and_seq",
            Builtin::OrSeq => "or_seq",
            Builtin::ExecSeq => "exec_seq",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The open signature namespaces.
///
/// Symbols of these kinds resolve their types through a registry at
/// inference time; the engine knows nothing about them up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Elementary action
    Action,
    /// Built-in action
    BuiltinAction,
    /// Perception predicate
    Perception,
    /// Reference to a named procedure
    Procedure,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Action => write!(f, "action"),
            SymbolKind::BuiltinAction => write!(f, "builtin action"),
            SymbolKind::Perception => write!(f, "perception"),
            SymbolKind::Procedure => write!(f, "procedure"),
        }
    }
}

/// A node label in an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertex {
    /// Built-in operator
    Builtin(Builtin),
    /// Argument reference `#N`
    Argument(Argument),
    /// Continuous literal
    Contin(f64),
    /// Definite object; `action` marks the action-flavored variant
    DefiniteObject {
        /// Object name
        name: String,
        /// Whether this is an action definite object
        action: bool,
    },
    /// Indefinite object
    IndefiniteObject(String),
    /// Message literal
    Message(String),
    /// Elementary action symbol, typed through the registry
    Action(String),
    /// Built-in action symbol, typed through the registry
    BuiltinAction(String),
    /// Perception symbol, typed through the registry
    Perception(String),
    /// Named procedure reference, typed through the registry
    Procedure(String),
    /// Action symbol literal
    ActionSymbol(String),
    /// Wild card
    WildCard,
}

impl Vertex {
    /// Build an argument-reference vertex for the 1-based index `idx`.
    pub fn argument(idx: u32) -> Self {
        Vertex::Argument(Argument::new(idx))
    }

    /// True for [`Vertex::Builtin`].
    pub fn is_builtin(&self) -> bool {
        matches!(self, Vertex::Builtin(_))
    }

    /// True for [`Vertex::Argument`].
    pub fn is_argument(&self) -> bool {
        matches!(self, Vertex::Argument(_))
    }

    /// True for [`Vertex::Contin`].
    pub fn is_contin(&self) -> bool {
        matches!(self, Vertex::Contin(_))
    }

    /// True for [`Vertex::DefiniteObject`].
    pub fn is_definite_object(&self) -> bool {
        matches!(self, Vertex::DefiniteObject { .. })
    }

    /// True for [`Vertex::IndefiniteObject`].
    pub fn is_indefinite_object(&self) -> bool {
        matches!(self, Vertex::IndefiniteObject(_))
    }

    /// True for [`Vertex::Message`].
    pub fn is_message(&self) -> bool {
        matches!(self, Vertex::Message(_))
    }

    /// True for [`Vertex::Action`].
    pub fn is_action(&self) -> bool {
        matches!(self, Vertex::Action(_))
    }

    /// True for [`Vertex::BuiltinAction`].
    pub fn is_builtin_action(&self) -> bool {
        matches!(self, Vertex::BuiltinAction(_))
    }

    /// True for [`Vertex::Perception`].
    pub fn is_perception(&self) -> bool {
        matches!(self, Vertex::Perception(_))
    }

    /// True for [`Vertex::Procedure`].
    pub fn is_procedure(&self) -> bool {
        matches!(self, Vertex::Procedure(_))
    }

    /// True for [`Vertex::ActionSymbol`].
    pub fn is_action_symbol(&self) -> bool {
        matches!(self, Vertex::ActionSymbol(_))
    }

    /// True for [`Vertex::WildCard`].
    pub fn is_wild_card(&self) -> bool {
        matches!(self, Vertex::WildCard)
    }

    /// The argument reference, if this vertex is one.
    pub fn as_argument(&self) -> Option<Argument> {
        match self {
            Vertex::Argument(a) => Some(*a),
            _ => None,
        }
    }

    /// The registry namespace this vertex resolves through, if any.
    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        match self {
            Vertex::Action(_) => Some(SymbolKind::Action),
            Vertex::BuiltinAction(_) => Some(SymbolKind::BuiltinAction),
            Vertex::Perception(_) => Some(SymbolKind::Perception),
            Vertex::Procedure(_) => Some(SymbolKind::Procedure),
            _ => None,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Builtin(b) => write!(f, "{}", b),
            Vertex::Argument(a) => write!(f, "{}", a),
            Vertex::Contin(c) => write!(f, "{}", c),
            Vertex::DefiniteObject { name, .. } => write!(f, "{}", name),
            Vertex::IndefiniteObject(name) => write!(f, "{}", name),
            Vertex::Message(text) => write!(f, "message:{}", text),
            Vertex::Action(name) => write!(f, "{}", name),
            Vertex::BuiltinAction(name) => write!(f, "{}", name),
            Vertex::Perception(name) => write!(f, "{}", name),
            Vertex::Procedure(name) => write!(f, "{}", name),
            Vertex::ActionSymbol(name) => write!(f, "{}", name),
            Vertex::WildCard => write!(f, "_*_"),
        }
    }
}
