//! Type-indexed store of the values computed by one run.
//!
//! [`Outputs`] is the read-only result handed back by
//! [`Plan::run`](crate::plan::Plan::run). Values are queried by type with
//! [`Outputs::get`], never by downcasting raw handles: the accessor either
//! returns a strongly-typed clone or [`OutputsError::ValueNotComputed`].

use std::fmt;

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::builders::BoxedValue;
use crate::types::TypeKey;

/// Values produced by one run, indexed by [`TypeKey`].
///
/// Cheap to clone (slots are shared allocations) and independent of the
/// plan and of any other run. A run that failed part-way exposes its
/// partially filled `Outputs` through
/// [`RunError::partial`](crate::schedulers::RunError::partial); anything
/// downstream of the failure reports [`OutputsError::ValueNotComputed`].
#[derive(Clone, Default)]
pub struct Outputs {
    values: FxHashMap<TypeKey, BoxedValue>,
}

impl Outputs {
    pub(crate) fn from_values(values: FxHashMap<TypeKey, BoxedValue>) -> Self {
        Self { values }
    }

    /// The computed value of type `T`.
    ///
    /// # Errors
    ///
    /// [`OutputsError::ValueNotComputed`] if the plan has no producer for
    /// `T`, or the run stopped before `T`'s builder completed.
    pub fn get<T>(&self) -> Result<T, OutputsError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.values
            .get(&TypeKey::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
            .ok_or(OutputsError::ValueNotComputed {
                type_name: std::any::type_name::<T>(),
            })
    }

    /// Whether a value of type `T` was computed.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeKey::of::<T>())
    }

    /// Number of computed values, seeds included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of every computed type, sorted for reproducible output.
    #[must_use]
    pub fn computed_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.values.keys().map(TypeKey::name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Outputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outputs")
            .field("computed", &self.computed_types())
            .finish()
    }
}

/// Errors from querying [`Outputs`].
#[derive(Debug, Error, Diagnostic)]
pub enum OutputsError {
    /// The queried type was never produced by this run.
    #[error("value of type {type_name} was not computed by this run")]
    #[diagnostic(
        code(typeweave::outputs::value_not_computed),
        help(
            "The plan may have no producer for this type, or the run failed before reaching its builder."
        )
    )]
    ValueNotComputed { type_name: &'static str },
}
