//! The argument-type table
//!
//! A sparse, 1-indexed mapping from placeholder index to type term; the
//! closure environment the inference driver threads through reduction.
//! Missing entries read as `unknown`.

use crate::context::TypeContext;
use crate::ty::TypeId;

/// Argument-type table: placeholder index (1-based) to type term
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentEnv {
    slots: Vec<Option<TypeId>>,
}

impl ArgumentEnv {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind placeholder `idx` to `ty`, padding any gap with unset slots
    ///
    /// # Panics
    ///
    /// Panics if `idx` is zero.
    pub fn set(&mut self, idx: u32, ty: TypeId) {
        assert!(idx > 0, "placeholder indices count from 1");
        let slot = (idx - 1) as usize;
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(ty);
    }

    /// The binding for placeholder `idx`, if any
    pub fn get(&self, idx: u32) -> Option<TypeId> {
        if idx == 0 {
            return None;
        }
        self.slots.get((idx - 1) as usize).copied().flatten()
    }

    /// The binding for placeholder `idx`, defaulting to `unknown`
    pub fn get_or_unknown(&self, ctx: &mut TypeContext, idx: u32) -> TypeId {
        self.get(idx).unwrap_or_else(|| ctx.unknown_type())
    }

    /// Highest placeholder index with a slot (bound or padded)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no placeholder has been bound
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slot types in index order, unset slots read as `unknown`
    pub fn types(&self, ctx: &mut TypeContext) -> Vec<TypeId> {
        self.slots
            .iter()
            .map(|slot| slot.unwrap_or_else(|| ctx.unknown_type()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_binding() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let unknown = ctx.unknown_type();

        let mut env = ArgumentEnv::new();
        assert!(env.is_empty());

        env.set(3, b);
        assert_eq!(env.len(), 3);
        assert_eq!(env.get(3), Some(b));
        assert_eq!(env.get(1), None);
        assert_eq!(env.get_or_unknown(&mut ctx, 1), unknown);
        assert_eq!(env.get_or_unknown(&mut ctx, 9), unknown);
    }

    #[test]
    fn test_types_in_order() {
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        let c = ctx.contin_type();
        let unknown = ctx.unknown_type();

        let mut env = ArgumentEnv::new();
        env.set(1, b);
        env.set(3, c);
        assert_eq!(env.types(&mut ctx), vec![b, unknown, c]);
    }

    #[test]
    #[should_panic]
    fn test_zero_index_rejected() {
        let mut env = ArgumentEnv::new();
        let mut ctx = TypeContext::new();
        let b = ctx.boolean_type();
        env.set(0, b);
    }
}
