//! Core type identity for the typeweave dataflow system.
//!
//! Every value flowing through a compiled plan is addressed by its
//! [`TypeKey`]: a stable, comparable key derived from the Rust type of the
//! value. Producers (seeds and builders) register under the key of the type
//! they yield, and consumers resolve their inputs by key lookup. This is
//! the deterministic, comparable type-key scheme the engine relies on
//! instead of any name-based reflection.
//!
//! # Examples
//!
//! ```rust
//! use typeweave::types::TypeKey;
//!
//! #[derive(Clone)]
//! struct GrossPrice(i64);
//!
//! let key = TypeKey::of::<GrossPrice>();
//! assert_eq!(key, TypeKey::of::<GrossPrice>());
//! assert_eq!(key.short_name(), "GrossPrice");
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identity of a data shape within a plan.
///
/// Two values share a `TypeKey` iff they are the same Rust type. Equality
/// and hashing use only the underlying [`TypeId`]; the type name is carried
/// for diagnostics and for deterministic orderings (error listings, DOT
/// output), where `TypeId`'s opaque value would not be reproducible across
/// builds.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key of type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully-qualified name of the underlying type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Trailing path segment of the type name, e.g. `"pricing::GrossPrice"`
    /// becomes `"GrossPrice"`. Used for labels; not guaranteed unique.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    /// Orders by type name first so listings are reproducible across
    /// builds; falls back to `TypeId` only to keep the order total.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
