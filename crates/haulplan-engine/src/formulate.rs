use std::fmt;
use std::str::FromStr;

use haulplan_lp::{ConstraintOp, LpProblem};
use thiserror::Error;
use tracing::debug;

use crate::model::ProblemModel;

/// Stable identifier of a formulated constraint, rendered as
/// `supply:<origin>` or `demand:<destination>`.
///
/// Ordered like the LP rows: every supply row before any demand row, then by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum ConstraintId {
    /// Shipments out of an origin stay within its capacity
    Supply(String),
    /// Shipments into a destination cover its requirement
    Demand(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid constraint id: {0}")]
pub struct ParseConstraintIdError(String);

/// An LP ready for the solver, plus the maps needed to read its answer back
#[derive(Debug, Clone)]
pub struct Formulation {
    pub lp: LpProblem,
    /// (origin position, destination position) of each LP variable
    pub routes: Vec<(usize, usize)>,
    /// Identifier of each LP row
    pub constraints: Vec<ConstraintId>,
}

impl ConstraintId {
    pub fn supply(origin: impl Into<String>) -> Self {
        ConstraintId::Supply(origin.into())
    }

    pub fn demand(destination: impl Into<String>) -> Self {
        ConstraintId::Demand(destination.into())
    }

    /// The origin or destination id this constraint belongs to
    pub fn location(&self) -> &str {
        match self {
            ConstraintId::Supply(id) | ConstraintId::Demand(id) => id,
        }
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintId::Supply(origin) => write!(f, "supply:{}", origin),
            ConstraintId::Demand(destination) => write!(f, "demand:{}", destination),
        }
    }
}

impl FromStr for ConstraintId {
    type Err = ParseConstraintIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("supply", origin)) => Ok(ConstraintId::supply(origin)),
            Some(("demand", destination)) => Ok(ConstraintId::demand(destination)),
            _ => Err(ParseConstraintIdError(s.to_string())),
        }
    }
}

impl From<ConstraintId> for String {
    fn from(id: ConstraintId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ConstraintId {
    type Error = ParseConstraintIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Translate a model into a minimisation LP.
///
/// One non-negative variable per route (origin-major, destination-minor),
/// then one `<= capacity` row per origin followed by one `>= requirement`
/// row per destination.
pub fn formulate(model: &ProblemModel) -> Formulation {
    let n_origins = model.origins().len();
    let n_dest = model.destinations().len();
    let n_vars = n_origins * n_dest;

    let mut names = Vec::with_capacity(n_vars);
    let mut costs = Vec::with_capacity(n_vars);
    let mut routes = Vec::with_capacity(n_vars);
    for (i, origin) in model.origins().iter().enumerate() {
        for (j, destination) in model.destinations().iter().enumerate() {
            names.push(format!("route:{}->{}", origin.id, destination.id));
            costs.push(model.unit_cost(i, j));
            routes.push((i, j));
        }
    }

    let mut lp = LpProblem::new(names);
    lp.set_objective(costs, true);

    let mut constraints = Vec::with_capacity(n_origins + n_dest);

    // Supply: sum over destinations <= capacity
    for (i, origin) in model.origins().iter().enumerate() {
        let mut coeffs = vec![0.0; n_vars];
        coeffs[i * n_dest..(i + 1) * n_dest].fill(1.0);
        let id = ConstraintId::supply(&origin.id);
        lp.add_constraint(id.to_string(), coeffs, ConstraintOp::Le, origin.capacity);
        constraints.push(id);
    }

    // Demand: sum over origins >= requirement
    for (j, destination) in model.destinations().iter().enumerate() {
        let mut coeffs = vec![0.0; n_vars];
        for i in 0..n_origins {
            coeffs[i * n_dest + j] = 1.0;
        }
        let id = ConstraintId::demand(&destination.id);
        lp.add_constraint(id.to_string(), coeffs, ConstraintOp::Ge, destination.requirement);
        constraints.push(id);
    }

    debug!(
        variables = lp.num_variables(),
        constraints = lp.num_constraints(),
        "formulated transportation LP"
    );

    Formulation {
        lp,
        routes,
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CostMatrix, Destination, Origin};

    fn model() -> ProblemModel {
        ProblemModel::new(
            vec![Origin::new("A", 50.0), Origin::new("B", 100.0)],
            vec![
                Destination::new("X", 60.0),
                Destination::new("Y", 50.0),
                Destination::new("Z", 0.0),
            ],
            CostMatrix::from_rows(
                &["A", "B"],
                &["X", "Y", "Z"],
                &[vec![4.0, 6.0, 1.0], vec![5.0, 3.0, 2.0]],
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_formulation_shape() {
        let formulation = formulate(&model());
        let lp = &formulation.lp;

        assert_eq!(lp.num_variables(), 6);
        assert_eq!(lp.num_constraints(), 5);
        assert!(lp.objective.minimize);
        assert_eq!(lp.objective.coefficients, vec![4.0, 6.0, 1.0, 5.0, 3.0, 2.0]);
        assert_eq!(lp.variables[4], "route:B->Y");
        assert_eq!(formulation.routes[4], (1, 1));

        let supply_b = &lp.constraints[1];
        assert_eq!(supply_b.name, "supply:B");
        assert_eq!(supply_b.op, ConstraintOp::Le);
        assert_eq!(supply_b.rhs, 100.0);
        assert_eq!(supply_b.coefficients, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

        let demand_y = &lp.constraints[3];
        assert_eq!(demand_y.name, "demand:Y");
        assert_eq!(demand_y.op, ConstraintOp::Ge);
        assert_eq!(demand_y.rhs, 50.0);
        assert_eq!(demand_y.coefficients, vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);

        assert_eq!(formulation.constraints[4], ConstraintId::demand("Z"));
    }

    #[test]
    fn test_formulation_is_deterministic() {
        let a = formulate(&model());
        let b = formulate(&model());

        assert_eq!(a.lp.variables, b.lp.variables);
        assert_eq!(a.constraints, b.constraints);
        for (x, y) in a.lp.constraints.iter().zip(&b.lp.constraints) {
            assert_eq!(x.coefficients, y.coefficients);
            assert_eq!(x.rhs, y.rhs);
        }
    }

    #[test]
    fn test_constraint_id_round_trip() {
        let id: ConstraintId = "supply:Indian River, FL".parse().unwrap();
        assert_eq!(id, ConstraintId::supply("Indian River, FL"));
        assert_eq!(id.location(), "Indian River, FL");
        assert_eq!(ConstraintId::demand("Atlanta, GA").to_string(), "demand:Atlanta, GA");
        assert!("capacity:A".parse::<ConstraintId>().is_err());
    }
}
