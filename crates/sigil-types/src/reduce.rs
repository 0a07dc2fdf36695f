//! The reducer
//!
//! Normalizes a type term: applications of lambdas dissolve into their
//! output after arity and input checks, unions drop members subsumed by
//! other members, placeholders resolve through the argument-type table.
//! Every failure rewrites the offending subterm to `ill_formed` and
//! reports one diagnostic; reduction of the surrounding term continues.
//!
//! The pass is persistent rather than in-place: it returns the id of the
//! normalized term, equal to what an in-place rewrite would have left.

use sigil_expr::{ExprTree, NodeId};

use crate::context::TypeContext;
use crate::diag::{DiagnosticSink, Location, TypeDiagnostic};
use crate::env::ArgumentEnv;
use crate::inherit::inherits;
use crate::ty::{Type, TypeId};

/// Focus of a reduction over a reference expression tree, carried for
/// diagnostics only
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    /// The expression tree being typed
    pub tree: &'a ExprTree,
    /// The node the term under reduction was assembled from
    pub node: NodeId,
}

impl<'a> Trace<'a> {
    /// Focus on the root of `tree`
    pub fn root(tree: &'a ExprTree) -> Self {
        Trace {
            tree,
            node: tree.root(),
        }
    }

    fn at(self, node: NodeId) -> Self {
        Trace { node, ..self }
    }

    fn location(self, procedure: &str) -> Location {
        Location {
            procedure: procedure.to_string(),
            expr_index: Some(self.tree.pre_order_index(self.node)),
            snippet: Some(self.tree.render(self.node)),
        }
    }
}

fn location(trace: Option<Trace<'_>>, procedure: &str) -> Location {
    match trace {
        Some(t) => t.location(procedure),
        None => Location {
            procedure: procedure.to_string(),
            ..Location::default()
        },
    }
}

/// Reduce `ty` to normal form under the argument-type table `env`
///
/// `trace` optionally ties the term to the expression tree it was
/// assembled from, enriching diagnostics with pre-order indices and
/// subexpression snippets; `procedure` names the enclosing procedure.
pub fn reduce(
    ctx: &mut TypeContext,
    ty: TypeId,
    env: &ArgumentEnv,
    trace: Option<Trace<'_>>,
    procedure: &str,
    sink: &mut dyn DiagnosticSink,
) -> TypeId {
    match ctx.get_unchecked(ty).clone() {
        Type::Lambda(l) => {
            let inputs: Vec<TypeId> = l
                .inputs
                .iter()
                .map(|&input| reduce(ctx, input, env, trace, procedure, sink))
                .collect();
            let output = reduce(ctx, l.output, env, trace, procedure, sink);
            ctx.lambda_type(inputs, output)
        }

        Type::Application(app) => {
            reduce_application(ctx, app.operator, &app.args, env, trace, procedure, sink)
        }

        Type::Union(u) => {
            let mut members: Vec<TypeId> = u
                .members
                .iter()
                .map(|&member| reduce(ctx, member, env, trace, procedure, sink))
                .collect();
            // drop any member subsumed by another
            let mut i = 0;
            while i < members.len() {
                let subsumed = (0..members.len())
                    .any(|j| j != i && inherits(ctx, members[i], members[j]));
                if subsumed {
                    members.remove(i);
                } else {
                    i += 1;
                }
            }
            ctx.union_type(members)
        }

        Type::ArgList(a) => {
            let element = reduce(ctx, a.element, env, trace, procedure, sink);
            ctx.arg_list_type(element)
        }

        // placeholders read their binding as-is; tying them back to the
        // enclosing signature happens when the driver closes the term
        Type::Argument(idx) => env.get_or_unknown(ctx, idx),

        _ => ty,
    }
}

/// Resolve `application(operator, args)`
///
/// The operator is matched against a lambda shape without being reduced
/// first; argument and input terms are reduced pairwise as a cursor walks
/// the input schedule. A lambda argument whose output inherits from the
/// expected input is accepted as a partial application: its own inputs
/// are spliced into the schedule and surface as leading inputs of the
/// result.
fn reduce_application(
    ctx: &mut TypeContext,
    operator: TypeId,
    args: &[TypeId],
    env: &ArgumentEnv,
    trace: Option<Trace<'_>>,
    procedure: &str,
    sink: &mut dyn DiagnosticSink,
) -> TypeId {
    let Some(lambda) = ctx.get_unchecked(operator).as_lambda().cloned() else {
        sink.report(TypeDiagnostic::NotAFunction {
            location: location(trace, procedure),
            observed: ctx.display(operator),
        });
        return ctx.ill_formed_type();
    };

    let declared = lambda.inputs.len();
    let variadic = lambda
        .inputs
        .last()
        .is_some_and(|&last| ctx.get_unchecked(last).is_arg_list());

    if (variadic && args.len() < declared - 1) || (!variadic && args.len() != declared) {
        sink.report(TypeDiagnostic::WrongArgumentCount {
            location: location(trace, procedure),
            actual: args.len(),
            declared,
            variadic,
        });
        return ctx.ill_formed_type();
    }

    // cursor over the input schedule; consumed inputs are removed,
    // inlined partial-application inputs pile up in front of the cursor
    let mut schedule = lambda.inputs.clone();
    let mut cursor = 0usize;
    let mut reached_tail = false;

    for (pos, &arg) in args.iter().enumerate() {
        if ctx.get_unchecked(schedule[cursor]).is_arg_list() {
            reached_tail = true;
        }

        // the focus node's children line up with the applied arguments
        // when the term came from the driver; keep the outer focus when
        // the shapes diverge
        let arg_trace = trace.map(|t| match t.tree.children(t.node).get(pos) {
            Some(&child) => t.at(child),
            None => t,
        });
        let arg_reduced = reduce(ctx, arg, env, arg_trace, procedure, sink);
        let input_reduced = reduce(ctx, schedule[cursor], env, trace, procedure, sink);
        schedule[cursor] = input_reduced;

        let expected = if reached_tail {
            match ctx.get_unchecked(input_reduced) {
                Type::ArgList(a) => a.element,
                _ => input_reduced,
            }
        } else {
            input_reduced
        };

        if inherits(ctx, arg_reduced, expected) {
            // accepted as-is
        } else if let Some(arg_lambda) = ctx.get_unchecked(arg_reduced).as_lambda().cloned() {
            if inherits(ctx, arg_lambda.output, expected) {
                // partial application: its inputs become pending inputs
                // of the enclosing signature
                for (k, &input) in arg_lambda.inputs.iter().enumerate() {
                    schedule.insert(cursor + k, input);
                }
                cursor += arg_lambda.inputs.len();
            } else {
                sink.report(TypeDiagnostic::InputMismatch {
                    location: location(arg_trace, procedure),
                    position: pos + 1,
                    observed: ctx.display(arg_lambda.output),
                    expected: ctx.display(expected),
                    via_output: true,
                });
                return ctx.ill_formed_type();
            }
        } else {
            sink.report(TypeDiagnostic::InputMismatch {
                location: location(arg_trace, procedure),
                position: pos + 1,
                observed: ctx.display(arg_reduced),
                expected: ctx.display(expected),
                via_output: false,
            });
            return ctx.ill_formed_type();
        }

        if !reached_tail {
            schedule.remove(cursor);
        }
    }

    // a residual variadic tail is dropped from the schedule
    if reached_tail || variadic {
        schedule.remove(cursor);
    }

    // whatever is left on the schedule (inlined partial-application
    // inputs) turns the result into a function of those inputs
    if schedule.is_empty() {
        reduce(ctx, lambda.output, env, trace, procedure, sink)
    } else {
        ctx.lambda_type(schedule, lambda.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{CollectingSink, NullSink};

    fn reduce_plain(ctx: &mut TypeContext, ty: TypeId) -> TypeId {
        reduce(ctx, ty, &ArgumentEnv::new(), None, "", &mut NullSink)
    }

    #[test]
    fn test_primitives_fixed() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let unknown = ctx.unknown_type();
        assert_eq!(reduce_plain(&mut ctx, b), b);
        assert_eq!(reduce_plain(&mut ctx, unknown), unknown);
    }

    #[test]
    fn test_application_dissolves() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let lam = ctx.lambda_type(vec![b, b], b);
        let app = ctx.application_type(lam, vec![b, b]);
        assert_eq!(reduce_plain(&mut ctx, app), b);
    }

    #[test]
    fn test_application_arity_mismatch() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let ill = ctx.ill_formed_type();
        let lam = ctx.lambda_type(vec![b, b], b);
        let app = ctx.application_type(lam, vec![b]);

        let mut sink = CollectingSink::new();
        let out = reduce(&mut ctx, app, &ArgumentEnv::new(), None, "p", &mut sink);
        assert_eq!(out, ill);
        assert!(matches!(
            sink.diagnostics()[0],
            TypeDiagnostic::WrongArgumentCount {
                actual: 1,
                declared: 2,
                variadic: false,
                ..
            }
        ));
    }

    #[test]
    fn test_application_input_mismatch() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let ill = ctx.ill_formed_type();
        let lam = ctx.lambda_type(vec![b], b);
        let app = ctx.application_type(lam, vec![c]);

        let mut sink = CollectingSink::new();
        let out = reduce(&mut ctx, app, &ArgumentEnv::new(), None, "p", &mut sink);
        assert_eq!(out, ill);
        assert!(matches!(
            sink.diagnostics()[0],
            TypeDiagnostic::InputMismatch {
                position: 1,
                via_output: false,
                ..
            }
        ));
    }

    #[test]
    fn test_application_non_function_operator() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let ill = ctx.ill_formed_type();
        let app = ctx.application_type(b, vec![b]);

        let mut sink = CollectingSink::new();
        let out = reduce(&mut ctx, app, &ArgumentEnv::new(), None, "p", &mut sink);
        assert_eq!(out, ill);
        assert!(matches!(
            sink.diagnostics()[0],
            TypeDiagnostic::NotAFunction { .. }
        ));
    }

    #[test]
    fn test_variadic_application() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let tail = ctx.arg_list_type(b);
        let and = ctx.lambda_type(vec![tail], b);

        // zero arguments past the fixed prefix is fine
        let none = ctx.application_type(and, vec![]);
        assert_eq!(reduce_plain(&mut ctx, none), and);

        let three = ctx.application_type(and, vec![b, b, b]);
        assert_eq!(reduce_plain(&mut ctx, three), b);
    }

    #[test]
    fn test_variadic_with_fixed_prefix() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let tail = ctx.arg_list_type(c);
        let lam = ctx.lambda_type(vec![b, tail], c);

        // just the fixed prefix
        let short = ctx.application_type(lam, vec![b]);
        assert_eq!(reduce_plain(&mut ctx, short), c);

        // prefix plus tail arguments
        let long = ctx.application_type(lam, vec![b, c, c]);
        assert_eq!(reduce_plain(&mut ctx, long), c);

        // missing the fixed prefix
        let ill = ctx.ill_formed_type();
        let lam2 = ctx.lambda_type(vec![b, b, tail], c);
        let too_short = ctx.application_type(lam2, vec![b]);
        assert_eq!(reduce_plain(&mut ctx, too_short), ill);
    }

    #[test]
    fn test_partial_application_inlines_inputs() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();

        // not : ->(boolean boolean) applied where a boolean is expected,
        // via a function argument ->(contin boolean)
        let g = ctx.lambda_type(vec![c], b);
        let not = ctx.lambda_type(vec![b], b);
        let app = ctx.application_type(not, vec![g]);

        let out = reduce_plain(&mut ctx, app);
        let expected = ctx.lambda_type(vec![c], b);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_partial_application_output_mismatch() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let ill = ctx.ill_formed_type();

        // ->(boolean contin) has output contin where boolean is expected
        let g = ctx.lambda_type(vec![b], c);
        let not = ctx.lambda_type(vec![b], b);
        let app = ctx.application_type(not, vec![g]);

        let mut sink = CollectingSink::new();
        let out = reduce(&mut ctx, app, &ArgumentEnv::new(), None, "p", &mut sink);
        assert_eq!(out, ill);
        assert!(matches!(
            sink.diagnostics()[0],
            TypeDiagnostic::InputMismatch {
                via_output: true,
                ..
            }
        ));
    }

    #[test]
    fn test_union_subsumed_members_dropped() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let unknown = ctx.unknown_type();

        // boolean and contin both inherit from unknown
        let u = ctx.union_type(vec![b, unknown, c]);
        assert_eq!(reduce_plain(&mut ctx, u), unknown);

        let plain = ctx.union_type(vec![b, c]);
        assert_eq!(reduce_plain(&mut ctx, plain), plain);
    }

    #[test]
    fn test_placeholder_substitution() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let unknown = ctx.unknown_type();
        let a1 = ctx.argument_type(1);
        let a2 = ctx.argument_type(2);

        let mut env = ArgumentEnv::new();
        env.set(1, b);

        assert_eq!(
            reduce(&mut ctx, a1, &env, None, "", &mut NullSink),
            b
        );
        // unbound placeholders default to unknown
        assert_eq!(
            reduce(&mut ctx, a2, &env, None, "", &mut NullSink),
            unknown
        );
    }

    #[test]
    fn test_placeholders_inside_lambda() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let a1 = ctx.argument_type(1);
        let lam = ctx.lambda_type(vec![a1], c);

        let mut env = ArgumentEnv::new();
        env.set(1, b);

        let out = reduce(&mut ctx, lam, &env, None, "", &mut NullSink);
        let expected = ctx.lambda_type(vec![b], c);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_idempotence() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let tail = ctx.arg_list_type(b);
        let and = ctx.lambda_type(vec![tail], b);
        let app = ctx.application_type(and, vec![b, b]);
        let u = ctx.union_type(vec![app, c]);

        let once = reduce_plain(&mut ctx, u);
        let twice = reduce_plain(&mut ctx, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_application() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();

        // f : ->(boolean boolean), g : ->(contin boolean)
        // application(f application(g contin)) reduces to boolean
        let f = ctx.lambda_type(vec![b], b);
        let g = ctx.lambda_type(vec![c], b);
        let inner = ctx.application_type(g, vec![c]);
        let outer = ctx.application_type(f, vec![inner]);
        assert_eq!(reduce_plain(&mut ctx, outer), b);
    }
}
