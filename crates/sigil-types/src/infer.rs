//! The inference driver
//!
//! Walks an expression tree bottom-up: assembles a raw type term from the
//! vertex oracles, tightens per-placeholder types from the contexts each
//! placeholder appears in, reduces the whole term, and closes it by
//! binding the placeholder types as leading inputs of an outer lambda.

use sigil_expr::{ExprTree, NodeId, Vertex};

use crate::context::TypeContext;
use crate::diag::{DiagnosticSink, Location, TypeDiagnostic};
use crate::env::ArgumentEnv;
use crate::intersect::intersect;
use crate::oracle::{
    input_type_of_vertex, output_type_of_vertex, type_of_vertex, vertex_arity, SignatureStore,
};
use crate::reduce::{reduce, Trace};
use crate::ty::TypeId;

/// Raw type term of an expression tree
///
/// Leaves carry their declared type; an internal node becomes
/// `application(type-of-operator, child terms…)`. No checking happens
/// here; the reducer is what dissolves the applications.
pub fn type_of(ctx: &mut TypeContext, store: &SignatureStore, tree: &ExprTree) -> TypeId {
    type_of_at(ctx, store, tree, tree.root())
}

/// Raw type term of the subtree rooted at `node`
pub fn type_of_at(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    tree: &ExprTree,
    node: NodeId,
) -> TypeId {
    let vertex_ty = type_of_vertex(ctx, store, tree.vertex(node));
    if tree.is_leaf(node) {
        return vertex_ty;
    }
    let args: Vec<TypeId> = tree
        .children(node)
        .iter()
        .map(|&child| type_of_at(ctx, store, tree, child))
        .collect();
    ctx.application_type(vertex_ty, args)
}

/// Contextual constraint on a node, read off its parent's signature
///
/// The parent's declared input type at the node's sibling position; the
/// whole term is `ill_formed` when the position falls outside a fixed
/// signature. A node with children additionally wraps the constraint in
/// a lambda over its children's output types (placeholder children read
/// their current binding from `env`).
pub fn context_type(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    tree: &ExprTree,
    node: NodeId,
    env: &ArgumentEnv,
) -> TypeId {
    let mut res = ctx.unknown_type();
    if let Some(parent) = tree.parent(node) {
        let position = tree.sibling_index(node) as i32;
        let arity = vertex_arity(ctx, store, tree.vertex(parent));
        if arity < 0 || (arity > 0 && position < arity) {
            res = input_type_of_vertex(ctx, store, tree.vertex(parent), position)
                .unwrap_or_else(|| ctx.ill_formed_type());
        } else {
            return ctx.ill_formed_type();
        }
    }
    if !tree.is_leaf(node) {
        let inputs: Vec<TypeId> = tree
            .children(node)
            .iter()
            .map(|&child| match tree.vertex(child) {
                Vertex::Argument(a) => env.get_or_unknown(ctx, a.idx()),
                v => output_type_of_vertex(ctx, store, v),
            })
            .collect();
        res = ctx.lambda_type(inputs, res);
    }
    res
}

/// Tighten the argument-type table from every placeholder occurrence
///
/// Each `#N` leaf contributes its context type, intersected into the
/// table entry for `N`. A placeholder at a position its parent's
/// signature does not cover is reported through the sink and poisons its
/// entry with `ill_formed`.
pub fn infer_argument_types(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    tree: &ExprTree,
    env: &mut ArgumentEnv,
    procedure: &str,
    sink: &mut dyn DiagnosticSink,
) {
    let leaves: Vec<NodeId> = tree.leaves().collect();
    for leaf in leaves {
        let Some(argument) = tree.vertex(leaf).as_argument() else {
            continue;
        };
        let context = context_type(ctx, store, tree, leaf, env);
        if ctx.get_unchecked(context).is_ill_formed() {
            sink.report(TypeDiagnostic::MalformedArgument {
                location: Location {
                    procedure: procedure.to_string(),
                    expr_index: Some(tree.pre_order_index(leaf)),
                    snippet: Some(tree.render(leaf)),
                },
                index: argument.idx(),
                position: tree.sibling_index(leaf),
            });
        }
        let current = env.get_or_unknown(ctx, argument.idx());
        let tightened = intersect(ctx, current, context);
        env.set(argument.idx(), tightened);
    }
}

/// Bind the argument-type table as leading inputs of the closed term
///
/// A term that is already a lambda gets the placeholder types spliced in
/// front of its existing inputs; anything else is wrapped in a fresh
/// lambda. An empty table leaves the term untouched.
pub fn insert_argument_types(ctx: &mut TypeContext, env: &ArgumentEnv, ty: TypeId) -> TypeId {
    if env.is_empty() {
        return ty;
    }
    let mut inputs = env.types(ctx);
    match ctx.get_unchecked(ty).as_lambda().cloned() {
        Some(lambda) => {
            inputs.extend(lambda.inputs);
            ctx.lambda_type(inputs, lambda.output)
        }
        None => ctx.lambda_type(inputs, ty),
    }
}

/// Closed, reduced signature of an expression tree
pub fn infer_type(
    ctx: &mut TypeContext,
    store: &SignatureStore,
    tree: &ExprTree,
    procedure: &str,
    sink: &mut dyn DiagnosticSink,
) -> TypeId {
    let raw = type_of(ctx, store, tree);
    let mut env = ArgumentEnv::new();
    infer_argument_types(ctx, store, tree, &mut env, procedure, sink);
    let reduced = reduce(ctx, raw, &env, Some(Trace::root(tree)), procedure, sink);
    insert_argument_types(ctx, &env, reduced)
}

/// Closed-form arity of an expression tree
///
/// Sums the arities of the leaves; a variadic leaf makes the whole
/// expression variadic over whatever was accumulated so far.
pub fn infer_arity(ctx: &mut TypeContext, store: &SignatureStore, tree: &ExprTree) -> i32 {
    let mut arity = 0i32;
    for leaf in tree.leaves() {
        let va = vertex_arity(ctx, store, tree.vertex(leaf));
        if va > 0 {
            arity += va;
        } else if va < 0 {
            return va - arity;
        }
    }
    arity
}

/// Highest placeholder index mentioned in the tree, 0 when none occurs
pub fn explicit_arity(tree: &ExprTree) -> i32 {
    tree.leaves()
        .filter_map(|leaf| tree.vertex(leaf).as_argument())
        .map(|a| a.idx() as i32)
        .max()
        .unwrap_or(0)
}

/// Check that every placeholder index in `1..=n` occurs and none exceeds `n`
pub fn contains_all_args_up_to(tree: &ExprTree, n: i32) -> bool {
    if n <= 0 {
        return true;
    }
    let mut seen = vec![false; n as usize];
    for leaf in tree.leaves() {
        if let Some(argument) = tree.vertex(leaf).as_argument() {
            let idx = argument.idx_from_zero();
            if idx < seen.len() {
                seen[idx] = true;
            } else {
                return false;
            }
        }
    }
    seen.iter().all(|&b| b)
}
