//! Execution configuration for compiled plans.

/// Configuration applied to every run of a compiled
/// [`Plan`](crate::plan::Plan).
///
/// Attach it before compiling via
/// [`GraphBuilder::with_run_config`](crate::graphs::GraphBuilder::with_run_config);
/// the plan carries it for the rest of its life.
#[derive(Clone, Debug)]
pub struct RunConfig {
    max_concurrency: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Self::resolve_max_concurrency(None),
        }
    }
}

impl RunConfig {
    /// Environment variable consulted by [`Default`] when no explicit limit
    /// is configured.
    pub const MAX_CONCURRENCY_ENV: &'static str = "TYPEWEAVE_MAX_CONCURRENCY";

    fn resolve_max_concurrency(provided: Option<usize>) -> Option<usize> {
        if provided.is_some() {
            return provided;
        }
        dotenvy::dotenv().ok();
        std::env::var(Self::MAX_CONCURRENCY_ENV)
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|limit| *limit > 0)
    }

    #[must_use]
    pub fn new(max_concurrency: Option<usize>) -> Self {
        Self {
            max_concurrency: Self::resolve_max_concurrency(max_concurrency),
        }
    }

    /// Cap on concurrently executing builders within one run. `None` lets
    /// every ready builder run at once.
    #[must_use]
    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Limit concurrent builder execution; a limit of zero is clamped to one.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Remove any concurrency limit.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.max_concurrency = None;
        self
    }
}
