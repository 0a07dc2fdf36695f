//! Type intersection, the meet of the inheritance lattice
//!
//! Used by the inference driver to tighten a placeholder's type when the
//! same index appears in several contexts: the result inherits from both
//! operands whenever it is well-formed.

use crate::context::TypeContext;
use crate::diag::NullSink;
use crate::env::ArgumentEnv;
use crate::inherit::inherits;
use crate::reduce::reduce;
use crate::ty::{Type, TypeId};

/// Greatest lower bound of two terms
///
/// When one operand inherits from the other, the lower one wins. Unions
/// intersect pairwise; lambdas of equal arity intersect input-wise by
/// union (contravariance) and output-wise by intersection. Terms with no
/// common lower bound meet at `ill_formed`.
pub fn intersect(ctx: &mut TypeContext, a: TypeId, b: TypeId) -> TypeId {
    if inherits(ctx, a, b) {
        return a;
    }
    if inherits(ctx, b, a) {
        return b;
    }

    let ta = ctx.get_unchecked(a).clone();
    let tb = ctx.get_unchecked(b).clone();
    match (ta, tb) {
        (Type::Union(u1), Type::Union(u2)) => {
            let mut members = Vec::new();
            for &m1 in &u1.members {
                for &m2 in &u2.members {
                    let meet = intersect(ctx, m1, m2);
                    if ctx.well_formed(meet) {
                        members.push(meet);
                    }
                }
            }
            if members.is_empty() {
                ctx.ill_formed_type()
            } else {
                ctx.union_type(members)
            }
        }

        (Type::Lambda(l1), Type::Lambda(l2)) => {
            if l1.inputs.len() != l2.inputs.len() {
                return ctx.ill_formed_type();
            }
            let inputs: Vec<TypeId> = l1
                .inputs
                .iter()
                .zip(&l2.inputs)
                .map(|(&i1, &i2)| ctx.union_type(vec![i1, i2]))
                .collect();
            let output = intersect(ctx, l1.output, l2.output);
            let lam = ctx.lambda_type(inputs, output);
            reduce(ctx, lam, &ArgumentEnv::new(), None, "", &mut NullSink)
        }

        (Type::Unknown, _) => b,
        (_, Type::Unknown) => a,

        (Type::IllFormed, _) | (_, Type::IllFormed) => ctx.ill_formed_type(),

        _ => ctx.ill_formed_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inherit::inherits;

    #[test]
    fn test_inherit_shortcuts() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let u = ctx.union_type(vec![b, c]);
        let unknown = ctx.unknown_type();

        assert_eq!(intersect(&mut ctx, b, b), b);
        assert_eq!(intersect(&mut ctx, b, unknown), b);
        assert_eq!(intersect(&mut ctx, unknown, b), b);
        assert_eq!(intersect(&mut ctx, b, u), b);
        assert_eq!(intersect(&mut ctx, u, b), b);
    }

    #[test]
    fn test_disjoint_primitives() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let ill = ctx.ill_formed_type();
        assert_eq!(intersect(&mut ctx, b, c), ill);
    }

    #[test]
    fn test_ill_formed_absorbs() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let ill = ctx.ill_formed_type();
        assert_eq!(intersect(&mut ctx, b, ill), ill);
        assert_eq!(intersect(&mut ctx, ill, b), ill);
    }

    #[test]
    fn test_union_intersection() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let m = ctx.message_type();
        let u1 = ctx.union_type(vec![b, c]);
        let u2 = ctx.union_type(vec![c, m]);

        // union(boolean contin) ∩ union(contin message) = contin
        assert_eq!(intersect(&mut ctx, u1, u2), c);

        let sym = ctx.action_symbol_type();
        let u3 = ctx.union_type(vec![m, sym]);
        let ill = ctx.ill_formed_type();
        assert_eq!(intersect(&mut ctx, u1, u3), ill);
    }

    #[test]
    fn test_lambda_intersection() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();

        // ->(boolean boolean) ∩ ->(contin boolean)
        //   = ->(union(boolean contin) boolean)
        let f1 = ctx.lambda_type(vec![b], b);
        let f2 = ctx.lambda_type(vec![c], b);
        let meet = intersect(&mut ctx, f1, f2);

        let u = ctx.union_type(vec![b, c]);
        let expected = ctx.lambda_type(vec![u], b);
        assert_eq!(meet, expected);

        // the meet is a lower bound of both operands
        assert!(inherits(&ctx, meet, f1));
        assert!(inherits(&ctx, meet, f2));
    }

    #[test]
    fn test_lambda_arity_mismatch() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let ill = ctx.ill_formed_type();
        let f1 = ctx.lambda_type(vec![b], b);
        let f2 = ctx.lambda_type(vec![b, b], b);
        assert_eq!(intersect(&mut ctx, f1, f2), ill);
    }

    #[test]
    fn test_lambda_output_meets() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let ill = ctx.ill_formed_type();

        // outputs with no common lower bound poison the meet
        let f1 = ctx.lambda_type(vec![b], b);
        let f2 = ctx.lambda_type(vec![c], c);
        let meet = intersect(&mut ctx, f1, f2);
        let u = ctx.union_type(vec![b, c]);
        let expected = ctx.lambda_type(vec![u], ill);
        assert_eq!(meet, expected);
        assert!(!ctx.well_formed(meet));
    }
}
