/// The result of solving an LP problem
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable (empty unless optimal)
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Detailed analysis
    pub analysis: Analysis,
    /// Simplex pivots performed across both phases
    pub iterations: usize,
    /// Diagnostic for non-optimal outcomes
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// Solver encountered an error
    Error,
}

/// Detailed analysis of the optimal solution
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    /// Shadow prices (dual values) for each constraint, in constraint order.
    /// The value is the rate of change of the optimal objective per unit
    /// increase of the constraint's right-hand side.
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable
    /// For non-basic variables, indicates how much cost must change to enter solution
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Shadow price value
    pub value: f64,
    /// Unused room in the constraint at the optimum (zero when tight)
    pub slack: f64,
    /// Interpretation
    pub interpretation: String,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Reduced cost
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

impl Solution {
    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::without_values(SolutionStatus::Infeasible, f64::INFINITY, message.into())
    }

    pub fn unbounded() -> Self {
        Self::without_values(
            SolutionStatus::Unbounded,
            f64::NEG_INFINITY,
            "Objective can be improved without limit".to_string(),
        )
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::without_values(SolutionStatus::Error, f64::NAN, message.into())
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    fn without_values(status: SolutionStatus, objective_value: f64, message: String) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value,
            analysis: Analysis::empty(),
            iterations: 0,
            message: Some(message),
        }
    }
}

impl Analysis {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shadow price of a named constraint
    pub fn shadow_price(&self, constraint: &str) -> Option<&ShadowPrice> {
        self.shadow_prices.iter().find(|sp| sp.constraint == constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_optimal_solutions_carry_no_values() {
        let infeasible = Solution::infeasible("lower bound above upper bound");
        assert_eq!(infeasible.status, SolutionStatus::Infeasible);
        assert!(infeasible.values.is_empty());
        assert_eq!(infeasible.message.as_deref(), Some("lower bound above upper bound"));

        let error = Solution::error("iteration limit").with_iterations(42);
        assert_eq!(error.status, SolutionStatus::Error);
        assert_eq!(error.iterations, 42);
        assert!(!error.is_optimal());
        assert!(error.analysis.shadow_prices.is_empty());
    }
}
