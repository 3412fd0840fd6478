use thiserror::Error;

/// Represents a linear programming problem
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpProblem {
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function coefficients (costs)
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Name/label for the constraint, reported back with its shadow price
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// Structural problems detected before the simplex runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Objective has {found} coefficients but the problem has {expected} variables")]
    ObjectiveLength { expected: usize, found: usize },
    #[error("Constraint {name} has {found} coefficients but the problem has {expected} variables")]
    ConstraintLength {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Non-finite coefficient in {0}")]
    NonFinite(String),
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }

    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }
}

impl Constraint {
    /// Left-hand side value for a given assignment
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    /// Distance between the bound and the left-hand side, positive when the
    /// constraint is satisfied with room to spare and negative when violated
    pub fn slack(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.op {
            ConstraintOp::Le => self.rhs - lhs,
            ConstraintOp::Ge => lhs - self.rhs,
            ConstraintOp::Eq => -(lhs - self.rhs).abs(),
        }
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: true,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of an assignment
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    /// Check dimensions and finiteness of every coefficient
    pub fn validate(&self) -> Result<(), ProblemError> {
        let n = self.num_variables();
        if self.objective.coefficients.len() != n {
            return Err(ProblemError::ObjectiveLength {
                expected: n,
                found: self.objective.coefficients.len(),
            });
        }
        if self.objective.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ProblemError::NonFinite("objective".to_string()));
        }

        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(ProblemError::ConstraintLength {
                    name: c.name.clone(),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|x| !x.is_finite()) {
                return Err(ProblemError::NonFinite(c.name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_catches_length_mismatch() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("short", vec![1.0], ConstraintOp::Le, 4.0);

        assert_eq!(
            problem.validate(),
            Err(ProblemError::ConstraintLength {
                name: "short".to_string(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_validate_catches_non_finite() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![f64::NAN], true);

        assert_eq!(problem.validate(), Err(ProblemError::NonFinite("objective".to_string())));
    }

    #[test]
    fn test_slack_by_operator() {
        let values = [2.0, 3.0];
        let le = Constraint {
            name: "le".to_string(),
            coefficients: vec![1.0, 1.0],
            op: ConstraintOp::Le,
            rhs: 8.0,
        };
        let ge = Constraint {
            name: "ge".to_string(),
            coefficients: vec![1.0, 1.0],
            op: ConstraintOp::Ge,
            rhs: 4.0,
        };

        assert!((le.slack(&values) - 3.0).abs() < 1e-12);
        assert!((ge.slack(&values) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_objective() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);

        assert!((problem.evaluate(&[2.0, 3.0]) - 8.0).abs() < 1e-12);
    }
}
