//! The reference table: resolved targets of `$ref` pointers.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::types::TypeDescriptor;

/// Pointer-keyed table of resolved schemas.
///
/// Entries are write-once: a second insert for a pointer that is already
/// present is ignored, so the first resolution wins. Iteration follows
/// insertion order.
///
/// ## Examples
///
/// ```
/// use bindery_define::{Primitive, RefTable, TypeDescriptor};
///
/// let mut refs = RefTable::default();
/// let pointer = "#/components/schemas/Id";
/// assert!(refs.insert(pointer, TypeDescriptor::Primitive(Primitive::Int64)));
/// assert!(!refs.insert(pointer, TypeDescriptor::Primitive(Primitive::String)));
///
/// assert_eq!(refs.get(pointer), Some(&TypeDescriptor::Primitive(Primitive::Int64)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RefTable {
    entries: IndexMap<String, TypeDescriptor>,
    recursive: HashSet<String>,
}

impl RefTable {
    /// Inserts a resolved schema. Returns `false` if the pointer was already present.
    pub fn insert(&mut self, pointer: impl Into<String>, descriptor: TypeDescriptor) -> bool {
        let pointer = pointer.into();
        if self.entries.contains_key(&pointer) {
            return false;
        }
        self.entries.insert(pointer, descriptor);
        true
    }

    /// Looks up a pointer.
    pub fn get(&self, pointer: &str) -> Option<&TypeDescriptor> {
        self.entries.get(pointer)
    }

    /// Returns `true` if the pointer has been resolved.
    pub fn contains(&self, pointer: &str) -> bool {
        self.entries.contains_key(pointer)
    }

    /// Follows reference placeholders until a concrete descriptor is found.
    ///
    /// Returns `None` for a dangling pointer.
    pub fn resolve<'a>(&'a self, ty: &'a TypeDescriptor) -> Option<&'a TypeDescriptor> {
        let mut current = ty;
        let mut hops = 0;
        while let TypeDescriptor::RefType { pointer } = current {
            current = self.entries.get(pointer)?;
            hops += 1;
            if hops > self.entries.len() {
                return None;
            }
        }
        Some(current)
    }

    /// Marks a pointer as reached while it was still being resolved.
    pub fn mark_recursive(&mut self, pointer: impl Into<String>) {
        self.recursive.insert(pointer.into());
    }

    /// Returns `true` if the pointer participates in a reference cycle.
    pub fn is_recursive(&self, pointer: &str) -> bool {
        self.recursive.contains(pointer)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of resolved pointers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    #[test]
    fn resolve_follows_chains() {
        let mut refs = RefTable::default();
        refs.insert("#/components/schemas/A", TypeDescriptor::reference("#/components/schemas/B"));
        refs.insert("#/components/schemas/B", TypeDescriptor::Primitive(Primitive::Boolean));

        let start = TypeDescriptor::reference("#/components/schemas/A");
        assert_eq!(
            refs.resolve(&start),
            Some(&TypeDescriptor::Primitive(Primitive::Boolean))
        );
    }

    #[test]
    fn resolve_dangling_pointer() {
        let refs = RefTable::default();
        assert_eq!(refs.resolve(&TypeDescriptor::reference("#/components/schemas/Missing")), None);
    }

    #[test]
    fn resolve_cycle_terminates() {
        let mut refs = RefTable::default();
        refs.insert("#/a", TypeDescriptor::reference("#/b"));
        refs.insert("#/b", TypeDescriptor::reference("#/a"));
        assert_eq!(refs.resolve(&TypeDescriptor::reference("#/a")), None);
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut refs = RefTable::default();
        refs.insert("#/z", TypeDescriptor::FileUpload);
        refs.insert("#/a", TypeDescriptor::FileUpload);
        let keys: Vec<_> = refs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["#/z", "#/a"]);
    }

    #[test]
    fn recursive_marks() {
        let mut refs = RefTable::default();
        refs.mark_recursive("#/components/schemas/Node");
        assert!(refs.is_recursive("#/components/schemas/Node"));
        assert!(!refs.is_recursive("#/components/schemas/Leaf"));
    }
}
