//! Component kind identity.
//!
//! Every component kind used with a [`Registry`](crate::registry::Registry) is
//! assigned a small sequential [`ComponentTypeId`] the first time it is seen.
//! The id doubles as the bit position inside a
//! [`Signature`](crate::signature::Signature), so at most
//! [`MAX_COMPONENTS`] distinct kinds can ever be registered.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::signature::MAX_COMPONENTS;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Marker for types that can be stored as components.
///
/// Components are plain data; any `'static` type qualifies.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

// ---------------------------------------------------------------------------
// ComponentTypeId
// ---------------------------------------------------------------------------

/// Opaque, lightweight identifier for a registered component kind.
///
/// Always `< MAX_COMPONENTS`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub(crate) u32);

impl ComponentTypeId {
    /// The bit index this kind occupies in a signature.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ComponentRegistry
// ---------------------------------------------------------------------------

/// Explicit table mapping Rust types to [`ComponentTypeId`]s.
///
/// Ids are handed out sequentially starting at 0. A type keeps its id for the
/// lifetime of the table, so calling [`register`](Self::register) once per
/// kind at startup makes ids independent of first-use order.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentTypeId>,
    /// Indexed by `ComponentTypeId.0`.
    names: Vec<&'static str>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register component kind `T`, returning its id.
    ///
    /// Registering an already-known kind returns the existing id.
    ///
    /// # Panics
    ///
    /// Panics if `T` would be the 33rd distinct kind: the id would not fit in
    /// a [`Signature`](crate::signature::Signature).
    pub fn register<T: Component>(&mut self) -> ComponentTypeId {
        let rust_type_id = TypeId::of::<T>();
        if let Some(&existing) = self.by_type.get(&rust_type_id) {
            return existing;
        }

        assert!(
            self.names.len() < MAX_COMPONENTS,
            "cannot register component '{}': all {} component ids are taken ({:?})",
            type_name::<T>(),
            MAX_COMPONENTS,
            self.names
        );

        let id = ComponentTypeId(self.names.len() as u32);
        self.names.push(type_name::<T>());
        self.by_type.insert(rust_type_id, id);
        id
    }

    /// The id of `T`, registering it on first use.
    #[inline]
    pub fn id_of<T: Component>(&mut self) -> ComponentTypeId {
        self.register::<T>()
    }

    /// Look up `T` without registering it.
    pub fn lookup<T: Component>(&self) -> Option<ComponentTypeId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Rust type name of a registered kind.
    pub fn name_of(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no kind has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
