mod problem;
mod simplex;
mod solution;

pub use problem::{Constraint, ConstraintOp, LpProblem, Objective, ProblemError};
pub use simplex::Solver;
pub use solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolutionStatus};
