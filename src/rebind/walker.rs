use std::collections::HashSet;

use super::annotations::AnnotationAccessor;
use super::hierarchy::{AncestorLookup, MethodRef};

/// Walks override chains and keeps, per inheritance branch, the nearest
/// declaration that takes part in the rebind protocol. Non-participating
/// declarations in between are skipped without ending the search.
pub struct OverrideWalker<'a, L: ?Sized, A: ?Sized> {
    lookup: &'a L,
    annotations: &'a A,
}

impl<'a, L: ?Sized, A: AnnotationAccessor + ?Sized> OverrideWalker<'a, L, A> {
    pub fn new(lookup: &'a L, annotations: &'a A) -> Self {
        Self { lookup, annotations }
    }

    pub fn nearest_annotated_ancestors<'p>(&self, method: &MethodRef<'p>) -> Vec<MethodRef<'p>>
    where
        L: AncestorLookup<'p>,
    {
        let mut settled = HashSet::new();
        let mut nearest = Vec::new();
        for ancestor in self.lookup.find_overridden_declarations(method) {
            if settled.contains(&ancestor.branch) {
                continue;
            }
            if self.annotations.participates(&ancestor.decl.method.node) {
                settled.insert(ancestor.branch);
                nearest.push(ancestor.decl);
            } else {
                tracing::trace!(
                    ancestor = %ancestor.decl.describe(),
                    "skipping non-rebind override"
                );
            }
        }
        nearest
    }
}
