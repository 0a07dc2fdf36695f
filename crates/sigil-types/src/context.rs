//! Type context: interning and projections over type terms

use std::cmp::Ordering;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::syntax;
use crate::ty::{ApplicationType, ArgListType, LambdaType, PrimitiveType, Type, TypeId, UnionType};

/// Type context that owns every type term of a typing session
///
/// Terms are interned: structurally identical subtrees share one [`TypeId`],
/// so equality of canonical terms is id equality and subtree copies are
/// free. Reduction and inference build new terms instead of mutating,
/// which keeps intermediate terms valid for diagnostics.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all terms, indexed by TypeId
    types: Vec<Arc<Type>>,

    /// Reverse mapping from term to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Create a new context with the leaf types pre-interned
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
        };

        ctx.intern(Type::Primitive(PrimitiveType::Boolean));
        ctx.intern(Type::Primitive(PrimitiveType::Contin));
        ctx.intern(Type::Primitive(PrimitiveType::ActionResult));
        ctx.intern(Type::Primitive(PrimitiveType::DefiniteObject));
        ctx.intern(Type::Primitive(PrimitiveType::ActionDefiniteObject));
        ctx.intern(Type::Primitive(PrimitiveType::IndefiniteObject));
        ctx.intern(Type::Primitive(PrimitiveType::Message));
        ctx.intern(Type::Primitive(PrimitiveType::ActionSymbol));
        ctx.intern(Type::Primitive(PrimitiveType::WildCard));
        ctx.intern(Type::Unknown);
        ctx.intern(Type::IllFormed);

        ctx
    }

    /// Intern a term, returning its TypeId
    ///
    /// If an identical term exists, returns the existing TypeId.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Arc::new(ty.clone()));
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a term by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize).map(|arc| arc.as_ref())
    }

    /// Get a term by its TypeId, panicking if it doesn't exist
    ///
    /// # Panics
    ///
    /// Panics if the TypeId is invalid
    pub fn get_unchecked(&self, id: TypeId) -> &Type {
        self.get(id).expect("invalid TypeId")
    }

    /// Number of interned terms
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // Constructors. These enforce the structural invariants: singleton
    // collapses, union canonicalization, exactly one arg_list child.

    /// Get a primitive leaf type
    pub fn primitive_type(&mut self, p: PrimitiveType) -> TypeId {
        self.intern(Type::Primitive(p))
    }

    /// Get the boolean type
    pub fn boolean_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::Boolean)
    }

    /// Get the contin type
    pub fn contin_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::Contin)
    }

    /// Get the action_result type
    pub fn action_result_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::ActionResult)
    }

    /// Get the definite_object type
    pub fn definite_object_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::DefiniteObject)
    }

    /// Get the action_definite_object type
    pub fn action_definite_object_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::ActionDefiniteObject)
    }

    /// Get the indefinite_object type
    pub fn indefinite_object_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::IndefiniteObject)
    }

    /// Get the message type
    pub fn message_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::Message)
    }

    /// Get the action_symbol type
    pub fn action_symbol_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::ActionSymbol)
    }

    /// Get the wild_card type
    pub fn wild_card_type(&mut self) -> TypeId {
        self.primitive_type(PrimitiveType::WildCard)
    }

    /// Get the unknown type (top of the lattice)
    pub fn unknown_type(&mut self) -> TypeId {
        self.intern(Type::Unknown)
    }

    /// Get the ill_formed type (bottom of the lattice)
    pub fn ill_formed_type(&mut self) -> TypeId {
        self.intern(Type::IllFormed)
    }

    /// Get the placeholder type `#idx`
    ///
    /// # Panics
    ///
    /// Panics if `idx` is zero; placeholder indices count from 1.
    pub fn argument_type(&mut self, idx: u32) -> TypeId {
        assert!(idx > 0, "placeholder indices count from 1");
        self.intern(Type::Argument(idx))
    }

    /// Create a lambda type
    ///
    /// A lambda with no inputs degenerates to its output.
    pub fn lambda_type(&mut self, inputs: Vec<TypeId>, output: TypeId) -> TypeId {
        if inputs.is_empty() {
            return output;
        }
        self.intern(Type::Lambda(LambdaType { inputs, output }))
    }

    /// Create an application type
    ///
    /// An application with no arguments collapses to its operator.
    pub fn application_type(&mut self, operator: TypeId, args: Vec<TypeId>) -> TypeId {
        if args.is_empty() {
            return operator;
        }
        self.intern(Type::Application(ApplicationType { operator, args }))
    }

    /// Create a union type in canonical form
    ///
    /// Nested unions are flattened, members are sorted by the structural
    /// order and deduplicated, and a singleton collapses to its member.
    /// Subtype-based member elimination is the reducer's job, not the
    /// constructor's. An empty member list yields `ill_formed`.
    pub fn union_type(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            if let Some(Type::Union(u)) = self.get(member) {
                flat.extend_from_slice(&u.members);
            } else {
                flat.push(member);
            }
        }

        flat.sort_unstable_by(|&a, &b| self.compare(a, b));
        flat.dedup();

        match flat.len() {
            0 => self.ill_formed_type(),
            1 => flat[0],
            _ => self.intern(Type::Union(UnionType { members: flat })),
        }
    }

    /// Create an arg-list marker around `element`
    pub fn arg_list_type(&mut self, element: TypeId) -> TypeId {
        self.intern(Type::ArgList(ArgListType { element }))
    }

    // Projections.

    /// Output type: the `R` of a lambda, the term itself otherwise
    pub fn output_type(&self, ty: TypeId) -> TypeId {
        match self.get_unchecked(ty) {
            Type::Lambda(l) => l.output,
            _ => ty,
        }
    }

    /// Input types of a lambda, with arg-list markers stripped to their
    /// element; empty for non-lambdas
    pub fn input_types(&self, ty: TypeId) -> Vec<TypeId> {
        match self.get_unchecked(ty) {
            Type::Lambda(l) => l
                .inputs
                .iter()
                .map(|&input| match self.get_unchecked(input) {
                    Type::ArgList(a) => a.element,
                    _ => input,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Signed arity: input count of a lambda, negated when the last input
    /// is a variadic tail; 0 for non-functions
    pub fn arity(&self, ty: TypeId) -> i32 {
        match self.get_unchecked(ty) {
            Type::Lambda(l) => {
                let k = l.inputs.len() as i32;
                let variadic = l
                    .inputs
                    .last()
                    .is_some_and(|&last| self.get_unchecked(last).is_arg_list());
                if variadic {
                    -k
                } else {
                    k
                }
            }
            _ => 0,
        }
    }

    /// Count inputs of a lambda that are exactly the given primitive
    ///
    /// Counts direct input children only: a variadic `arg_list(contin)`
    /// tail does not count as `contin`.
    pub fn primitive_arity(&self, ty: TypeId, p: PrimitiveType) -> i32 {
        match self.get_unchecked(ty) {
            Type::Lambda(l) => l
                .inputs
                .iter()
                .filter(|&&input| self.get_unchecked(input).as_primitive() == Some(p))
                .count() as i32,
            _ => 0,
        }
    }

    /// Count boolean inputs at the top level of a lambda
    pub fn boolean_arity(&self, ty: TypeId) -> i32 {
        self.primitive_arity(ty, PrimitiveType::Boolean)
    }

    /// Count contin inputs at the top level of a lambda
    pub fn contin_arity(&self, ty: TypeId) -> i32 {
        self.primitive_arity(ty, PrimitiveType::Contin)
    }

    /// Count action_result inputs at the top level of a lambda
    pub fn action_result_arity(&self, ty: TypeId) -> i32 {
        self.primitive_arity(ty, PrimitiveType::ActionResult)
    }

    /// Check that no ill_formed node occurs anywhere in the term
    pub fn well_formed(&self, ty: TypeId) -> bool {
        let mut stack = vec![ty];
        while let Some(id) = stack.pop() {
            let term = self.get_unchecked(id);
            if term.is_ill_formed() {
                return false;
            }
            stack.extend(term.children());
        }
        true
    }

    /// Canonical structural order: tag rank first, then children
    /// lexicographically
    pub fn compare(&self, a: TypeId, b: TypeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let ta = self.get_unchecked(a);
        let tb = self.get_unchecked(b);
        ta.tag_order()
            .cmp(&tb.tag_order())
            .then_with(|| {
                let ca = ta.children();
                let cb = tb.children();
                for (&x, &y) in ca.iter().zip(cb.iter()) {
                    let ord = self.compare(x, y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                ca.len().cmp(&cb.len())
            })
    }

    /// Canonical textual form of a term
    pub fn display(&self, ty: TypeId) -> String {
        syntax::print(self, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning() {
        let mut ctx = TypeContext::new();
        let b1 = ctx.boolean_type();
        let b2 = ctx.boolean_type();
        assert_eq!(b1, b2);

        let c = ctx.contin_type();
        let l1 = ctx.lambda_type(vec![b1, c], b1);
        let l2 = ctx.lambda_type(vec![b1, c], b1);
        assert_eq!(l1, l2);
    }

    #[test]
    fn test_lambda_collapse() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        assert_eq!(ctx.lambda_type(vec![], b), b);
    }

    #[test]
    fn test_application_collapse() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        assert_eq!(ctx.application_type(b, vec![]), b);
    }

    #[test]
    fn test_union_canonicalization() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();

        // order-insensitive, duplicates collapse
        let u1 = ctx.union_type(vec![b, c]);
        let u2 = ctx.union_type(vec![c, b, c]);
        assert_eq!(u1, u2);

        // singleton collapses
        assert_eq!(ctx.union_type(vec![b]), b);

        // nested unions flatten
        let m = ctx.message_type();
        let nested = ctx.union_type(vec![u1, m]);
        match ctx.get_unchecked(nested) {
            Type::Union(u) => assert_eq!(u.members.len(), 3),
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_arity() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();

        let fixed = ctx.lambda_type(vec![b, c], b);
        assert_eq!(ctx.arity(fixed), 2);

        let tail = ctx.arg_list_type(b);
        let variadic = ctx.lambda_type(vec![tail], b);
        assert_eq!(ctx.arity(variadic), -1);

        let mixed = ctx.lambda_type(vec![c, tail], b);
        assert_eq!(ctx.arity(mixed), -2);

        assert_eq!(ctx.arity(b), 0);
    }

    #[test]
    fn test_projections() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let tail = ctx.arg_list_type(c);
        let lam = ctx.lambda_type(vec![b, tail], c);

        assert_eq!(ctx.output_type(lam), c);
        assert_eq!(ctx.output_type(b), b);

        // arg-list stripped to its element
        assert_eq!(ctx.input_types(lam), vec![b, c]);
        assert!(ctx.input_types(b).is_empty());
    }

    #[test]
    fn test_primitive_counters() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let lam = ctx.lambda_type(vec![b, c, b], c);

        assert_eq!(ctx.boolean_arity(lam), 2);
        assert_eq!(ctx.contin_arity(lam), 1);
        assert_eq!(ctx.action_result_arity(lam), 0);

        // the variadic tail is an arg_list child, not a contin child
        let tail = ctx.arg_list_type(c);
        let variadic = ctx.lambda_type(vec![tail], c);
        assert_eq!(ctx.contin_arity(variadic), 0);
    }

    #[test]
    fn test_well_formed() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let ill = ctx.ill_formed_type();

        assert!(ctx.well_formed(b));
        assert!(!ctx.well_formed(ill));

        let lam = ctx.lambda_type(vec![b], ill);
        assert!(!ctx.well_formed(lam));
    }

    #[test]
    fn test_compare_total_order() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let a1 = ctx.argument_type(1);
        let a2 = ctx.argument_type(2);

        assert_eq!(ctx.compare(b, b), Ordering::Equal);
        assert_eq!(ctx.compare(b, c), Ordering::Less);
        assert_eq!(ctx.compare(a1, a2), Ordering::Less);
        // operators sort before leaves
        let lam = ctx.lambda_type(vec![b], c);
        assert_eq!(ctx.compare(lam, b), Ordering::Less);
    }

    #[test]
    #[should_panic]
    fn test_argument_zero_rejected() {
        let mut ctx = TypeContext::new();
        let _ = ctx.argument_type(0);
    }
}
