//! Resource Handle - Identity references to shared resources
//!
//! Resources are owned by the asset library and shared between every place
//! that uses them. A handle compares and hashes by the identity of the
//! allocation it points to, never by the resource's value, so two materials
//! with identical properties are still two distinct resources.

use core::hash::{Hash, Hasher};
use core::ops::Deref;
use std::sync::Arc;

/// Strong, identity-compared handle to a shared resource
pub struct ResourceHandle<T> {
    data: Arc<T>,
}

impl<T> ResourceHandle<T> {
    /// Wrap a freshly created resource
    pub fn new(resource: T) -> Self {
        Self {
            data: Arc::new(resource),
        }
    }

    /// Identity key of the underlying allocation
    #[inline]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.data) as *const () as usize
    }

    /// Check whether two handles point to the same resource
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T> Deref for ResourceHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl<T> PartialEq for ResourceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<T> Eq for ResourceHandle<T> {}

impl<T> Hash for ResourceHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("resource", &*self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, PartialEq)]
    struct TestResource(u32);

    #[test]
    fn test_handle_identity() {
        let a = ResourceHandle::new(TestResource(1));
        let b = ResourceHandle::new(TestResource(1));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_handle_hash_by_identity() {
        let a = ResourceHandle::new(TestResource(7));
        let b = ResourceHandle::new(TestResource(7));

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(a.clone());
        set.insert(b);

        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }
}
