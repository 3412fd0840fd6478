use std::collections::BTreeMap;
use std::fmt;

use haulplan_lp::SolutionStatus;
use thiserror::Error;

use crate::formulate::ConstraintId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SolveStatus {
    /// A minimum-cost plan was found
    Optimal,
    /// Requirements cannot be met within the capacities
    Infeasible,
    /// The objective has no lower bound
    Unbounded,
    /// Numerical trouble or the iteration budget ran out
    Error,
}

/// Dual information for one constraint at the optimum
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintDual {
    /// Change in total cost per unit increase of the constraint's bound.
    /// Never positive for supply rows, never negative for demand rows.
    pub shadow_price: f64,
    /// Unused capacity (supply) or over-delivery (demand)
    pub slack: f64,
}

/// Tons shipped on every route of a solved model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "PlanData", try_from = "PlanData"))]
pub struct ShipmentPlan {
    origins: Vec<String>,
    destinations: Vec<String>,
    /// Row-major origin x destination
    tons: Vec<f64>,
}

/// A plan table whose size does not match its origins and destinations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Plan has {tons} entries for {origins} origins x {destinations} destinations")]
pub struct PlanShapeError {
    pub origins: usize,
    pub destinations: usize,
    pub tons: usize,
}

/// Unchecked wire shape of a [`ShipmentPlan`]
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PlanData {
    origins: Vec<String>,
    destinations: Vec<String>,
    tons: Vec<f64>,
}

/// Outcome of one solve. Owned by the caller and never modified.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResult {
    status: SolveStatus,
    message: Option<String>,
    plan: Option<ShipmentPlan>,
    total_cost: f64,
    constraints: BTreeMap<ConstraintId, ConstraintDual>,
    /// Row-major per-route reduced costs; empty unless optimal
    reduced_costs: Vec<f64>,
    iterations: usize,
}

impl SolveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::Error => "ERROR",
        }
    }
}

impl From<SolutionStatus> for SolveStatus {
    fn from(status: SolutionStatus) -> Self {
        match status {
            SolutionStatus::Optimal => SolveStatus::Optimal,
            SolutionStatus::Infeasible => SolveStatus::Infeasible,
            SolutionStatus::Unbounded => SolveStatus::Unbounded,
            SolutionStatus::Error => SolveStatus::Error,
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ShipmentPlan {
    pub(crate) fn new(origins: Vec<String>, destinations: Vec<String>, tons: Vec<f64>) -> Self {
        debug_assert_eq!(tons.len(), origins.len() * destinations.len());
        Self {
            origins,
            destinations,
            tons,
        }
    }

    /// Build a plan, checking that `tons` is a non-empty origin x destination table
    pub fn try_new(origins: Vec<String>, destinations: Vec<String>, tons: Vec<f64>) -> Result<Self, PlanShapeError> {
        if origins.is_empty() || destinations.is_empty() || tons.len() != origins.len() * destinations.len() {
            return Err(PlanShapeError {
                origins: origins.len(),
                destinations: destinations.len(),
                tons: tons.len(),
            });
        }
        Ok(Self {
            origins,
            destinations,
            tons,
        })
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Tons by position
    pub fn tons(&self, origin: usize, destination: usize) -> f64 {
        self.tons[origin * self.destinations.len() + destination]
    }

    /// Tons by id
    pub fn get(&self, origin: &str, destination: &str) -> Option<f64> {
        let i = self.origins.iter().position(|o| o == origin)?;
        let j = self.destinations.iter().position(|d| d == destination)?;
        Some(self.tons(i, j))
    }

    /// Dense origin x destination table, zeros included
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.tons
            .chunks(self.destinations.len())
            .map(|row| row.to_vec())
            .collect()
    }

    /// Every route with its tons, origin-major
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        let n_dest = self.destinations.len();
        self.tons.iter().enumerate().map(move |(k, &tons)| {
            (
                self.origins[k / n_dest].as_str(),
                self.destinations[k % n_dest].as_str(),
                tons,
            )
        })
    }

    /// Total tons leaving an origin
    pub fn shipped_from(&self, origin: usize) -> f64 {
        let n_dest = self.destinations.len();
        self.tons[origin * n_dest..(origin + 1) * n_dest].iter().sum()
    }

    /// Total tons arriving at a destination
    pub fn delivered_to(&self, destination: usize) -> f64 {
        self.tons
            .iter()
            .skip(destination)
            .step_by(self.destinations.len())
            .sum()
    }

    pub fn total_tons(&self) -> f64 {
        self.tons.iter().sum()
    }
}

#[cfg(feature = "serde")]
impl TryFrom<PlanData> for ShipmentPlan {
    type Error = PlanShapeError;

    fn try_from(data: PlanData) -> Result<Self, Self::Error> {
        ShipmentPlan::try_new(data.origins, data.destinations, data.tons)
    }
}

#[cfg(feature = "serde")]
impl From<ShipmentPlan> for PlanData {
    fn from(plan: ShipmentPlan) -> Self {
        PlanData {
            origins: plan.origins,
            destinations: plan.destinations,
            tons: plan.tons,
        }
    }
}

impl SolveResult {
    pub(crate) fn optimal(
        plan: ShipmentPlan,
        total_cost: f64,
        constraints: BTreeMap<ConstraintId, ConstraintDual>,
        reduced_costs: Vec<f64>,
        iterations: usize,
    ) -> Self {
        Self {
            status: SolveStatus::Optimal,
            message: None,
            plan: Some(plan),
            total_cost,
            constraints,
            reduced_costs,
            iterations,
        }
    }

    pub(crate) fn failed(status: SolveStatus, message: String, total_cost: f64, iterations: usize) -> Self {
        Self {
            status,
            message: Some(message),
            plan: None,
            total_cost,
            constraints: BTreeMap::new(),
            reduced_costs: Vec::new(),
            iterations,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Diagnostic for non-optimal outcomes
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Present only when the status is OPTIMAL
    pub fn plan(&self) -> Option<&ShipmentPlan> {
        self.plan.as_ref()
    }

    /// LP objective value; infinite or NaN when no plan exists
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Shadow price and slack of every constraint, keyed by id
    pub fn constraints(&self) -> &BTreeMap<ConstraintId, ConstraintDual> {
        &self.constraints
    }

    pub fn dual(&self, id: &ConstraintId) -> Option<&ConstraintDual> {
        self.constraints.get(id)
    }

    pub fn shadow_price(&self, id: &ConstraintId) -> Option<f64> {
        self.dual(id).map(|d| d.shadow_price)
    }

    /// How far a route's unit cost must fall before it would carry freight
    pub fn reduced_cost(&self, origin: usize, destination: usize) -> Option<f64> {
        let n_dest = self.plan.as_ref()?.destinations.len();
        self.reduced_costs.get(origin * n_dest + destination).copied()
    }

    /// Simplex pivots spent on this solve
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ShipmentPlan {
        ShipmentPlan::new(
            vec!["A".to_string(), "B".to_string()],
            vec!["X".to_string(), "Y".to_string(), "Z".to_string()],
            vec![10.0, 0.0, 5.0, 1.0, 2.0, 0.0],
        )
    }

    #[test]
    fn test_plan_accessors() {
        let plan = plan();

        assert_eq!(plan.get("B", "Y"), Some(2.0));
        assert_eq!(plan.get("C", "Y"), None);
        assert_eq!(plan.shipped_from(0), 15.0);
        assert_eq!(plan.delivered_to(0), 11.0);
        assert_eq!(plan.delivered_to(2), 5.0);
        assert_eq!(plan.total_tons(), 18.0);
        assert_eq!(plan.matrix(), vec![vec![10.0, 0.0, 5.0], vec![1.0, 2.0, 0.0]]);

        let routes: Vec<_> = plan.iter().filter(|(_, _, t)| *t > 0.0).collect();
        assert_eq!(routes[2], ("B", "X", 1.0));
    }

    #[test]
    fn test_plan_shape_is_checked() {
        let err = ShipmentPlan::try_new(vec!["A".to_string()], vec![], vec![]).unwrap_err();
        assert_eq!(err.destinations, 0);

        let err = ShipmentPlan::try_new(vec!["A".to_string()], vec!["X".to_string(), "Y".to_string()], vec![1.0])
            .unwrap_err();
        assert_eq!(err.to_string(), "Plan has 1 entries for 1 origins x 2 destinations");

        assert!(ShipmentPlan::try_new(vec!["A".to_string()], vec!["X".to_string()], vec![3.0]).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_plan_shape() {
        let empty = r#"{"origins":["A"],"destinations":[],"tons":[]}"#;
        assert!(serde_json::from_str::<ShipmentPlan>(empty).is_err());

        let short = r#"{"origins":["A","B"],"destinations":["X"],"tons":[1.0]}"#;
        assert!(serde_json::from_str::<ShipmentPlan>(short).is_err());

        let json = serde_json::to_string(&plan()).unwrap();
        let back: ShipmentPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan());
        assert_eq!(back.matrix().len(), 2);
    }

    #[test]
    fn test_failed_result_has_no_plan() {
        let result = SolveResult::failed(SolveStatus::Infeasible, "short".to_string(), f64::INFINITY, 3);

        assert_eq!(result.status(), SolveStatus::Infeasible);
        assert!(result.plan().is_none());
        assert!(result.constraints().is_empty());
        assert_eq!(result.reduced_cost(0, 0), None);
        assert_eq!(result.message(), Some("short"));
        assert_eq!(result.status().to_string(), "INFEASIBLE");
    }
}
