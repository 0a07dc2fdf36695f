//! Vertex oracles: declared types for expression-tree vertices
//!
//! Built-in operators carry engine-known signatures; symbols from the open
//! namespaces (actions, perceptions, procedures) resolve through a
//! [`SignatureStore`] registered by the evaluator. An unregistered symbol
//! types as `ill_formed`, keeping the failure in-band.

use rustc_hash::FxHashMap;
use sigil_expr::{Builtin, SymbolKind, Vertex};

use crate::context::TypeContext;
use crate::error::TypeError;
use crate::ty::{convert_index, TypeId};

/// Registry of declared signatures for open-namespace symbols
#[derive(Debug, Clone, Default)]
pub struct SignatureStore {
    signatures: FxHashMap<(SymbolKind, String), TypeId>,
}

impl SignatureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the signature of a symbol
    pub fn register(&mut self, kind: SymbolKind, name: impl Into<String>, ty: TypeId) {
        self.signatures.insert((kind, name.into()), ty);
    }

    /// Look up the signature of a symbol
    pub fn lookup(&self, kind: SymbolKind, name: &str) -> Option<TypeId> {
        self.signatures.get(&(kind, name.to_string())).copied()
    }

    /// Resolve a symbol's signature, returning an error if not registered
    pub fn resolve(&self, kind: SymbolKind, name: &str) -> Result<TypeId, TypeError> {
        self.lookup(kind, name)
            .ok_or_else(|| TypeError::UndefinedSymbol {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }
}

/// Declared signature of a built-in operator
pub fn builtin_type(ctx: &mut TypeContext, builtin: Builtin) -> TypeId {
    let boolean = ctx.boolean_type();
    let contin = ctx.contin_type();
    let action_result = ctx.action_result_type();
    match builtin {
        Builtin::True | Builtin::False => boolean,
        Builtin::And | Builtin::Or => {
            let tail = ctx.arg_list_type(boolean);
            ctx.lambda_type(vec![tail], boolean)
        }
        Builtin::Not => ctx.lambda_type(vec![boolean], boolean),
        Builtin::Plus | Builtin::Times => {
            let tail = ctx.arg_list_type(contin);
            ctx.lambda_type(vec![tail], contin)
        }
        Builtin::Greater => ctx.lambda_type(vec![contin, contin], boolean),
        Builtin::ContinIf => ctx.lambda_type(vec![boolean, contin, contin], contin),
        Builtin::BooleanIf => ctx.lambda_type(vec![boolean, boolean, boolean], boolean),
        Builtin::AndSeq | Builtin::OrSeq | Builtin::ExecSeq => {
            let tail = ctx.arg_list_type(action_result);
            ctx.lambda_type(vec![tail], action_result)
        }
    }
}

/// Raw declared type of a vertex
pub fn type_of_vertex(ctx: &mut TypeContext, store: &SignatureStore, vertex: &Vertex) -> TypeId {
    match vertex {
        Vertex::Builtin(b) => builtin_type(ctx, *b),
        Vertex::Argument(a) => ctx.argument_type(a.idx()),
        Vertex::Contin(_) => ctx.contin_type(),
        Vertex::DefiniteObject { action, .. } => {
            if *action {
                ctx.action_definite_object_type()
            } else {
                ctx.definite_object_type()
            }
        }
        Vertex::IndefiniteObject(_) => ctx.indefinite_object_type(),
        Vertex::Message(_) => ctx.message_type(),
        Vertex::ActionSymbol(_) => ctx.action_symbol_type(),
        Vertex::WildCard => ctx.wild_card_type(),
        Vertex::Action(name) => resolve_symbol(ctx, store, SymbolKind::Action, name),
        Vertex::BuiltinAction(name) => {
            resolve_symbol(ctx, store, SymbolKind::BuiltinAction, name)
        }
        Vertex::Perception(name) => resolve_symbol(ctx, store, SymbolKind::Perception, name),
        Vertex::Procedure(name) => resolve_symbol(ctx, store, SymbolKind::Procedure, name),
    }
}

fn resolve_symbol(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    kind: SymbolKind,
    name: &str,
) -> TypeId {
    store
        .lookup(kind, name)
        .unwrap_or_else(|| ctx.ill_formed_type())
}

/// Output type of a vertex: the `R` of its declared lambda, or the
/// declared type itself; argument vertices answer `unknown`
pub fn output_type_of_vertex(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    vertex: &Vertex,
) -> TypeId {
    if vertex.is_argument() {
        return ctx.unknown_type();
    }
    let ty = type_of_vertex(ctx, store, vertex);
    ctx.output_type(ty)
}

/// The `i`-th declared input type of a vertex (0-based)
///
/// Variadic signatures clamp trailing indices to the tail element; a
/// fixed signature answers `None` past its last input. Argument vertices
/// answer `unknown` at every index.
pub fn input_type_of_vertex(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    vertex: &Vertex,
    i: i32,
) -> Option<TypeId> {
    if vertex.is_argument() {
        return Some(ctx.unknown_type());
    }
    let ty = type_of_vertex(ctx, store, vertex);
    let arity = ctx.arity(ty);
    if arity == 0 {
        return None;
    }
    if arity > 0 && i >= arity {
        return None;
    }
    let inputs = ctx.input_types(ty);
    Some(inputs[convert_index(arity, i) as usize])
}

/// Signed arity of a vertex
///
/// Argument vertices count as unary; everything else reports the arity
/// of its declared type (0 for literals and other non-functions).
pub fn vertex_arity(ctx: &mut TypeContext, store: &SignatureStore, vertex: &Vertex) -> i32 {
    if vertex.is_argument() {
        return 1;
    }
    let ty = type_of_vertex(ctx, store, vertex);
    ctx.arity(ty)
}
