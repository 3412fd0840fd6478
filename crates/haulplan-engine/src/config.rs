/// Thresholds used when turning raw solver output into a plan and report
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Shipments, slacks and duals smaller than this are reported as zero
    pub primal_epsilon: f64,
    /// Shadow prices at or below this magnitude are left out of the binding map
    pub binding_threshold: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            primal_epsilon: 1e-6,
            binding_threshold: 1e-4,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub tolerances: Tolerances,
    /// Pivot budget per simplex phase; exceeding it yields an ERROR status
    pub max_iterations: usize,
    /// Smallest magnitude the simplex treats as non-zero when pivoting
    pub pivot_tolerance: f64,
    /// Degenerate pivots in a row before the simplex falls back to Bland's rule
    pub degenerate_pivot_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_iterations: 10000,
            pivot_tolerance: 1e-9,
            degenerate_pivot_limit: 50,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primal_epsilon(mut self, epsilon: f64) -> Self {
        self.tolerances.primal_epsilon = epsilon;
        self
    }

    pub fn with_binding_threshold(mut self, threshold: f64) -> Self {
        self.tolerances.binding_threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    pub fn with_degenerate_pivot_limit(mut self, limit: usize) -> Self {
        self.degenerate_pivot_limit = limit;
        self
    }
}
