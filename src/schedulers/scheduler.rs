//! Level-at-a-time scheduler driving builder execution.

use std::sync::Arc;

use miette::Diagnostic;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, warn};
use uuid::Uuid;

use crate::builders::{BoxedValue, BuilderCtx, BuilderError};
use crate::config::RunConfig;
use crate::outputs::Outputs;
use crate::plan::Plan;
use crate::seeds::SeedValues;
use crate::types::TypeKey;

/// Failure of one run of a plan.
///
/// The first failing builder wins: later failures and late outputs do not
/// change the reported error. Failure and cancellation variants expose the
/// values that did complete through [`partial`](Self::partial); there is no
/// partial-success contract beyond querying that store.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    /// The seed values handed to `run` do not match the types fixed at
    /// compile time.
    #[error("seed type mismatch: plan expects [{expected}], run was given [{provided}]")]
    #[diagnostic(
        code(typeweave::run::seed_type_mismatch),
        help("Pass exactly one value for each seed type the plan was compiled with.")
    )]
    SeedTypeMismatch { expected: String, provided: String },

    /// The first builder failure of the run.
    #[error("builder of {type_name} failed: {source}")]
    #[diagnostic(code(typeweave::run::builder_failed))]
    Builder {
        type_name: &'static str,
        source: BuilderError,
        partial: Outputs,
    },

    /// The caller's cancellation token stopped the run before every node
    /// completed.
    #[error("run cancelled before completion")]
    #[diagnostic(code(typeweave::run::cancelled))]
    Cancelled { partial: Outputs },
}

impl RunError {
    /// Values that finished before the run stopped. Seeds are always
    /// present; anything downstream of the failure is absent.
    #[must_use]
    pub fn partial(&self) -> Option<&Outputs> {
        match self {
            RunError::Builder { partial, .. } | RunError::Cancelled { partial } => Some(partial),
            RunError::SeedTypeMismatch { .. } => None,
        }
    }
}

/// Shared per-run mutable state.
///
/// The value map is written once per slot; the first-error slot is a
/// single-writer-wins race resolved under its mutex.
struct RunState {
    values: RwLock<FxHashMap<TypeKey, BoxedValue>>,
    first_error: Mutex<Option<(TypeKey, BuilderError)>>,
    cancellation: CancellationToken,
}

/// Level-at-a-time concurrent executor for compiled plans.
pub(crate) struct Scheduler {
    max_concurrency: Option<usize>,
}

impl Scheduler {
    pub(crate) fn from_config(config: &RunConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency(),
        }
    }

    /// Execute `plan` against the stored seed values.
    ///
    /// Walks the levels in order; within a level every builder runs on its
    /// own task, optionally gated by a semaphore. After the first failure
    /// (or caller cancellation) no new builder is launched; in-flight
    /// builders are awaited and their late results are ignored.
    pub(crate) async fn execute(
        &self,
        plan: &Plan,
        seeds: SeedValues,
        cancellation: CancellationToken,
    ) -> Result<Outputs, RunError> {
        let run_id = Uuid::new_v4();
        let span = debug_span!("plan_run", run_id = %run_id, nodes = plan.node_count());
        self.execute_levels(plan, seeds, cancellation, run_id)
            .instrument(span)
            .await
    }

    async fn execute_levels(
        &self,
        plan: &Plan,
        seeds: SeedValues,
        cancellation: CancellationToken,
        run_id: Uuid,
    ) -> Result<Outputs, RunError> {
        let state = Arc::new(RunState {
            values: RwLock::new(seeds.map),
            first_error: Mutex::new(None),
            cancellation,
        });
        let permits = self
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));

        for level in plan.levels() {
            if state.cancellation.is_cancelled() {
                break;
            }

            let mut tasks: JoinSet<()> = JoinSet::new();
            for key in level {
                let node = plan.node(*key);
                let Some(spec) = node.spec() else {
                    continue;
                };
                let inputs: Option<Vec<BoxedValue>> = {
                    let values = state.values.read();
                    spec.inputs()
                        .iter()
                        .map(|dep| values.get(dep).cloned())
                        .collect()
                };
                // An absent input means an earlier level was cut short; the
                // node counts as skipped.
                let Some(inputs) = inputs else {
                    continue;
                };

                let callable = spec.callable();
                let state = Arc::clone(&state);
                let permits = permits.clone();
                let output = node.output();
                let name = spec.name();
                tasks.spawn(async move {
                    let _permit = match &permits {
                        Some(semaphore) => Some(
                            semaphore
                                .acquire()
                                .await
                                .expect("run semaphore is never closed"),
                        ),
                        None => None,
                    };
                    if state.cancellation.is_cancelled() {
                        debug!(builder = name, "skipped: run already cancelled");
                        return;
                    }

                    let ctx = BuilderCtx::new(run_id, name, state.cancellation.child_token());
                    match callable.invoke(ctx, inputs).await {
                        Ok(value) => {
                            state.values.write().insert(output, value);
                            debug!(builder = name, "builder completed");
                        }
                        Err(err) => {
                            let mut slot = state.first_error.lock();
                            if slot.is_none() {
                                warn!(builder = name, error = %err, "builder failed; cancelling run");
                                *slot = Some((output, err));
                                state.cancellation.cancel();
                            } else {
                                debug!(builder = name, error = %err, "late failure ignored");
                            }
                        }
                    }
                });
            }

            while let Some(joined) = tasks.join_next().await {
                if let Err(join_err) = joined
                    && join_err.is_panic()
                {
                    // Tasks are never aborted, so this is a builder panic;
                    // surface it to the caller unchanged.
                    std::panic::resume_unwind(join_err.into_panic());
                }
            }
            if state.first_error.lock().is_some() {
                break;
            }
        }

        let values = std::mem::take(&mut *state.values.write());
        let outputs = Outputs::from_values(values);
        if let Some((key, err)) = state.first_error.lock().take() {
            return Err(RunError::Builder {
                type_name: key.name(),
                source: err,
                partial: outputs,
            });
        }
        if outputs.len() != plan.node_count() {
            return Err(RunError::Cancelled { partial: outputs });
        }
        Ok(outputs)
    }
}
