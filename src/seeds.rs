//! Seed types and values.
//!
//! A *seed* is a dependency-free producer: a value the caller supplies at
//! the start of each run. The set of seed types is fixed at compile time
//! through the [`SeedSet`] tuple passed to
//! [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile); only
//! the types matter there, no values are constructed. At run time the same
//! trait moves the concrete values into the run's value map.
//!
//! `SeedSet` is implemented for tuples of one to four distinct types;
//! single seeds are written `(seed,)`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::builders::BoxedValue;
use crate::types::TypeKey;

/// Collected seed values for one run. Opaque to callers; filled by
/// [`SeedSet::store`].
#[derive(Default)]
pub struct SeedValues {
    pub(crate) map: FxHashMap<TypeKey, BoxedValue>,
}

/// A tuple of seed types (and, at run time, seed values).
///
/// `keys` is the type-level half used by `compile::<S>()`; `store` is the
/// value-level half used by `run`. The two halves always agree because
/// both are derived from the same tuple.
pub trait SeedSet: Send + 'static {
    /// Keys of every seed in this set, in tuple order.
    fn keys() -> Vec<TypeKey>;

    /// Move the concrete seed values into a run's value map.
    fn store(self, into: &mut SeedValues);
}

macro_rules! impl_seed_set {
    ($($seed:ident $idx:tt),+) => {
        impl<$($seed,)+> SeedSet for ($($seed,)+)
        where
            $($seed: Send + Sync + 'static,)+
        {
            fn keys() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$seed>(),)+]
            }

            fn store(self, into: &mut SeedValues) {
                $(into.map.insert(TypeKey::of::<$seed>(), Arc::new(self.$idx) as BoxedValue);)+
            }
        }
    };
}

impl_seed_set!(S0 0);
impl_seed_set!(S0 0, S1 1);
impl_seed_set!(S0 0, S1 1, S2 2);
impl_seed_set!(S0 0, S1 1, S2 2, S3 3);
