//! The inheritance judge
//!
//! Decides the subtype relation `t1 <: t2` ("t1 inherits from t2"): a
//! value of type `t1` may be used wherever `t2` is required. `unknown` is
//! the top of the lattice and `ill_formed` the bottom; unions are handled
//! member-wise and lambda arrows are contravariant in their inputs.

use crate::context::TypeContext;
use crate::ty::{Type, TypeId};

/// Check whether `sub` inherits from `sup` (`sub <: sup`)
///
/// The rules apply in a fixed priority order; in particular an
/// unreduced `application` on the left never inherits (the judge
/// assumes its inputs are reduced), and `ill_formed` takes precedence
/// over the `unknown`-is-top rule.
pub fn inherits(ctx: &TypeContext, sub: TypeId, sup: TypeId) -> bool {
    let sub_ty = ctx.get_unchecked(sub);
    let sup_ty = ctx.get_unchecked(sup);

    match (sub_ty, sup_ty) {
        // every member of the union must inherit from sup
        (Type::Union(u), _) => u.members.iter().all(|&member| inherits(ctx, member, sup)),

        // sub must inherit from at least one member of the union
        (_, Type::Union(u)) => u.members.iter().any(|&member| inherits(ctx, sub, member)),

        // arrow rule: same input count, contravariant inputs with an
        // exemption for unknown on the supertype side, covariant output
        (Type::Lambda(l1), Type::Lambda(l2)) => {
            if l1.inputs.len() != l2.inputs.len() {
                return false;
            }
            let inputs_ok = l1.inputs.iter().zip(&l2.inputs).all(|(&i1, &i2)| {
                inherits(ctx, i2, i1) || ctx.get_unchecked(i2).is_unknown()
            });
            inputs_ok && inherits(ctx, l1.output, l2.output)
        }

        // unreduced applications are not inhabitable
        (Type::Application(_), _) => false,

        // variadic tails compare element-wise
        (Type::ArgList(a1), Type::ArgList(a2)) => inherits(ctx, a1.element, a2.element),

        // nothing inherits from or into ill_formed
        (Type::IllFormed, _) | (_, Type::IllFormed) => false,

        // everything left inherits from unknown
        (_, Type::Unknown) => true,

        // remaining pairs are leaves or mismatched operators: interning
        // makes tag equality id equality
        _ => sub == sup,
    }
}

/// Check whether two terms are equal under mutual inheritance
pub fn equal_types(ctx: &TypeContext, a: TypeId, b: TypeId) -> bool {
    inherits(ctx, a, b) && inherits(ctx, b, a)
}
