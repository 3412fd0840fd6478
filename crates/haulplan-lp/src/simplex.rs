use tracing::{debug, info, warn};

use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolutionStatus};

/// Scale applied to the pivot tolerance when deciding whether a primal or
/// dual quantity is numerically zero relative to the problem's magnitudes.
const ZERO_SCALE: f64 = 10.0;

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Consecutive degenerate pivots tolerated before switching to Bland's rule
    degenerate_pivot_limit: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            degenerate_pivot_limit: 50,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_degenerate_pivot_limit(mut self, limit: usize) -> Self {
        self.degenerate_pivot_limit = limit;
        self
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        if let Err(e) = problem.validate() {
            warn!(error = %e, "rejecting malformed LP");
            return Solution::error(e.to_string());
        }

        let mut tableau = self.build_tableau(problem);
        debug!(
            variables = tableau.n_vars,
            constraints = tableau.n_rows(),
            artificials = tableau.n_artificial,
            "built simplex tableau"
        );

        // Phase 1: Find initial basic feasible solution
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau) {
                PhaseOne::Feasible => {}
                PhaseOne::Infeasible(residual) => {
                    info!(residual, iterations = tableau.iterations, "LP is infeasible");
                    return Solution::infeasible(format!(
                        "No assignment satisfies every constraint (artificial residual {:.6})",
                        residual
                    ))
                    .with_iterations(tableau.iterations);
                }
                PhaseOne::Failed(message) => {
                    warn!(%message, "phase 1 failed");
                    return Solution::error(message).with_iterations(tableau.iterations);
                }
            }
        }

        // Phase 2: Optimize, never letting artificials re-enter
        let exclude_from = tableau.art_start();
        match self.run(&mut tableau, exclude_from) {
            SimplexResult::Optimal => {}
            SimplexResult::Unbounded => {
                info!(iterations = tableau.iterations, "LP is unbounded");
                return Solution::unbounded().with_iterations(tableau.iterations);
            }
            SimplexResult::IterationLimit => {
                warn!(limit = self.max_iterations, "phase 2 hit the iteration limit");
                return Solution::error(format!(
                    "Phase 2 did not converge within {} iterations",
                    self.max_iterations
                ))
                .with_iterations(tableau.iterations);
            }
        }

        let solution = self.extract_solution(&tableau, problem);
        info!(
            status = ?solution.status,
            objective = solution.objective_value,
            iterations = solution.iterations,
            "simplex finished"
        );
        solution
    }

    fn build_tableau(&self, problem: &LpProblem) -> Tableau {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // Rows with a negative right-hand side are negated so every basic
        // variable starts non-negative.
        let rows: Vec<(Vec<f64>, ConstraintOp, f64, bool)> = problem
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    let negated = c.coefficients.iter().map(|x| -x).collect();
                    (negated, c.op.flipped(), -c.rhs, true)
                } else {
                    (c.coefficients.clone(), c.op, c.rhs, false)
                }
            })
            .collect();

        // Count slack and artificial variables needed
        let mut n_slack = 0;
        let mut n_artificial = 0;
        for (_, op, _, _) in &rows {
            match op {
                ConstraintOp::Le => n_slack += 1,
                ConstraintOp::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                ConstraintOp::Eq => n_artificial += 1,
            }
        }

        let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS
        let total_rows = n_constraints + 1; // +1 for objective
        let rhs_col = total_cols - 1;

        let rhs_scale = rows.iter().map(|(_, _, rhs, _)| *rhs).fold(0.0, f64::max);
        let cost_scale = problem
            .objective
            .coefficients
            .iter()
            .map(|c| c.abs())
            .fold(0.0, f64::max);

        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; total_rows],
            basic_vars: vec![0; n_constraints],
            dual_columns: Vec::with_capacity(n_constraints),
            n_vars,
            n_slack,
            n_artificial,
            iterations: 0,
            primal_tolerance: self.tolerance * ZERO_SCALE * (1.0 + rhs_scale),
            dual_tolerance: self.tolerance * ZERO_SCALE * (1.0 + cost_scale),
        };

        // Fill in constraint rows
        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, (coefficients, op, rhs, flipped)) in rows.into_iter().enumerate() {
            tableau.data[i][..n_vars].copy_from_slice(&coefficients);
            tableau.data[i][rhs_col] = rhs;

            // Add slack/surplus/artificial
            match op {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    tableau.dual_columns.push(DualColumn { col: slack_idx, sign: 1.0, flipped });
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    tableau.dual_columns.push(DualColumn { col: slack_idx, sign: -1.0, flipped });
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    tableau.dual_columns.push(DualColumn { col: artificial_idx, sign: 1.0, flipped });
                    artificial_idx += 1;
                }
            }
        }

        // Objective row (last row)
        // Simplex maximizes, so for minimization we negate the coefficients
        let obj_row = n_constraints;
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            tableau.data[obj_row][j] = if problem.objective.minimize { -coef } else { coef };
        }

        tableau
    }

    fn phase1(&self, tableau: &mut Tableau) -> PhaseOne {
        // Auxiliary objective: maximize -sum(artificials)
        let obj_row = tableau.n_rows();
        let n_cols = tableau.n_cols();
        let art_start = tableau.art_start();

        let original = std::mem::replace(&mut tableau.data[obj_row], vec![0.0; n_cols]);
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[obj_row][j] = -1.0;
        }

        // Price out the artificials that start in the basis
        for i in 0..obj_row {
            if tableau.basic_vars[i] >= art_start {
                let row = tableau.data[i].clone();
                for (target, value) in tableau.data[obj_row].iter_mut().zip(&row) {
                    *target += value;
                }
            }
        }

        match self.run(tableau, n_cols - 1) {
            SimplexResult::Optimal => {}
            SimplexResult::Unbounded => {
                return PhaseOne::Failed("Phase 1 objective became unbounded".to_string());
            }
            SimplexResult::IterationLimit => {
                return PhaseOne::Failed(format!(
                    "Phase 1 did not converge within {} iterations",
                    self.max_iterations
                ));
            }
        }

        let rhs_col = n_cols - 1;
        let residual: f64 = (0..obj_row)
            .filter(|&i| tableau.basic_vars[i] >= art_start)
            .map(|i| tableau.data[i][rhs_col].max(0.0))
            .sum();
        if residual > tableau.primal_tolerance {
            return PhaseOne::Infeasible(residual);
        }

        self.drive_out_artificials(tableau);

        // Restore original objective and price out the current basis
        tableau.data[obj_row] = original;
        for i in 0..obj_row {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[obj_row][basic];
            if ratio != 0.0 {
                let row = tableau.data[i].clone();
                for (target, value) in tableau.data[obj_row].iter_mut().zip(&row) {
                    *target -= ratio * value;
                }
            }
        }

        debug!(iterations = tableau.iterations, "phase 1 found a feasible basis");
        PhaseOne::Feasible
    }

    /// Pivot zero-valued artificials out of the basis so phase 2 cannot
    /// raise them above zero. Rows with no usable column are redundant and
    /// stay as they are.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let art_start = tableau.art_start();
        for i in 0..tableau.n_rows() {
            if tableau.basic_vars[i] < art_start {
                continue;
            }
            let candidate = (0..art_start)
                .filter(|&j| tableau.data[i][j].abs() > self.tolerance)
                .max_by(|&a, &b| tableau.data[i][a].abs().total_cmp(&tableau.data[i][b].abs()));
            match candidate {
                Some(col) => tableau.pivot(i, col),
                None => debug!(row = i, "redundant constraint row left with artificial basis"),
            }
        }
    }

    /// Pivot until no column below `exclude_from` can improve the objective
    fn run(&self, tableau: &mut Tableau, exclude_from: usize) -> SimplexResult {
        let mut degenerate_streak = 0;
        let mut bland = false;

        for _ in 0..self.max_iterations {
            let Some(pivot_col) = self.find_pivot_column(tableau, exclude_from, bland) else {
                return SimplexResult::Optimal;
            };
            let Some((pivot_row, ratio)) = self.find_pivot_row(tableau, pivot_col) else {
                return SimplexResult::Unbounded;
            };

            if ratio <= self.tolerance {
                degenerate_streak += 1;
                if !bland && degenerate_streak > self.degenerate_pivot_limit {
                    debug!(streak = degenerate_streak, "switching to Bland's rule");
                    bland = true;
                }
            } else {
                degenerate_streak = 0;
            }

            tableau.pivot(pivot_row, pivot_col);
        }

        if self.find_pivot_column(tableau, exclude_from, bland).is_none() {
            SimplexResult::Optimal
        } else {
            SimplexResult::IterationLimit
        }
    }

    fn find_pivot_column(&self, tableau: &Tableau, exclude_from: usize, bland: bool) -> Option<usize> {
        let obj_row = &tableau.data[tableau.n_rows()];
        let mut candidates = (0..exclude_from).filter(|&j| obj_row[j] > self.tolerance);

        if bland {
            // Lowest index improving column
            return candidates.next();
        }

        // Most positive reduced cost
        candidates.max_by(|&a, &b| obj_row[a].total_cmp(&obj_row[b]))
    }

    fn find_pivot_row(&self, tableau: &Tableau, col: usize) -> Option<(usize, f64)> {
        let rhs_col = tableau.n_cols() - 1;

        let mut best: Option<(usize, f64)> = None;
        for i in 0..tableau.n_rows() {
            let val = tableau.data[i][col];
            if val <= self.tolerance {
                continue;
            }
            let ratio = tableau.data[i][rhs_col].max(0.0) / val;
            best = match best {
                None => Some((i, ratio)),
                Some((row, min_ratio)) => {
                    if ratio < min_ratio - self.tolerance {
                        Some((i, ratio))
                    } else if ratio <= min_ratio + self.tolerance
                        && tableau.basic_vars[i] < tableau.basic_vars[row]
                    {
                        // Ties go to the lowest basic index, as Bland's rule requires
                        Some((i, ratio))
                    } else {
                        Some((row, min_ratio))
                    }
                }
            };
        }

        best
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &LpProblem) -> Solution {
        let n_vars = problem.num_variables();
        let rhs_col = tableau.n_cols() - 1;

        // Extract variable values
        let mut values = vec![0.0; n_vars];
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < n_vars {
                let value = tableau.data[i][rhs_col];
                if value < -tableau.primal_tolerance {
                    return Solution::error(format!(
                        "Numerical instability: {} has value {:.6e} in the final basis",
                        problem.variables[basic], value
                    ))
                    .with_iterations(tableau.iterations);
                }
                values[basic] = value.max(0.0);
            }
        }

        // A basis that drifted away from feasibility is reported, never returned
        for c in &problem.constraints {
            let slack = c.slack(&values);
            if slack < -tableau.primal_tolerance {
                return Solution::error(format!(
                    "Numerical instability: {} ({}) violated by {:.6e}",
                    c.name,
                    c.op.symbol(),
                    -slack
                ))
                .with_iterations(tableau.iterations);
            }
        }

        let objective_value = problem.evaluate(&values);
        let analysis = self.analyze(tableau, problem, &values);

        Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            analysis,
            iterations: tableau.iterations,
            message: None,
        }
    }

    fn analyze(&self, tableau: &Tableau, problem: &LpProblem, values: &[f64]) -> Analysis {
        let obj_row = &tableau.data[tableau.n_rows()];
        let minimize = problem.objective.minimize;

        // Shadow prices: reduced cost of each row's unit column, converted to
        // d(objective)/d(rhs) for the constraint as written
        let mut shadow_prices = Vec::with_capacity(problem.num_constraints());
        for (constraint, dual_col) in problem.constraints.iter().zip(&tableau.dual_columns) {
            let mut value = obj_row[dual_col.col] / dual_col.sign;
            if !minimize {
                value = -value;
            }
            if dual_col.flipped {
                value = -value;
            }
            if value.abs() < tableau.dual_tolerance {
                value = 0.0;
            }

            let mut slack = constraint.slack(values).max(0.0);
            if slack < tableau.primal_tolerance {
                slack = 0.0;
            }

            let interpretation = if value == 0.0 {
                "Non-binding constraint".to_string()
            } else if value > 0.0 {
                format!("Increasing RHS by 1 unit would increase the objective by {:.4}", value)
            } else {
                format!("Increasing RHS by 1 unit would decrease the objective by {:.4}", -value)
            };

            shadow_prices.push(ShadowPrice {
                constraint: constraint.name.clone(),
                value,
                slack,
                interpretation,
            });
        }

        // Reduced costs: how far a non-basic variable's coefficient must move
        // in the improving direction before it enters the basis
        let reduced_costs = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, var_name)| {
                let is_basic = tableau.basic_vars.contains(&j);
                let mut rc = if is_basic { 0.0 } else { -obj_row[j] };
                if rc.abs() < tableau.dual_tolerance {
                    rc = 0.0;
                }
                ReducedCost {
                    variable: var_name.clone(),
                    value: values[j],
                    reduced_cost: rc,
                    is_basic,
                }
            })
            .collect();

        // Binding constraints
        let binding_constraints = shadow_prices
            .iter()
            .filter(|sp| sp.value != 0.0)
            .map(|sp| sp.constraint.clone())
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            binding_constraints,
        }
    }
}

struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    /// Column whose reduced cost yields each constraint's dual
    dual_columns: Vec<DualColumn>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    iterations: usize,
    primal_tolerance: f64,
    dual_tolerance: f64,
}

struct DualColumn {
    col: usize,
    /// Coefficient of the column in its own row (+1 slack/artificial, -1 surplus)
    sign: f64,
    /// Row was negated during construction
    flipped: bool,
}

impl Tableau {
    fn n_rows(&self) -> usize {
        self.data.len() - 1
    }

    fn n_cols(&self) -> usize {
        self.data[0].len()
    }

    fn art_start(&self) -> usize {
        self.n_vars + self.n_slack
    }

    fn pivot(&mut self, row: usize, col: usize) {
        // Update basic variable
        self.basic_vars[row] = col;

        // Scale pivot row
        let pivot_val = self.data[row][col];
        for value in &mut self.data[row] {
            *value /= pivot_val;
        }

        // Eliminate column in other rows
        let pivot_row = self.data[row].clone();
        for (i, current) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = current[col];
            if factor == 0.0 {
                continue;
            }
            for (value, p) in current.iter_mut().zip(&pivot_row) {
                *value -= factor * p;
            }
            current[col] = 0.0;
        }

        self.iterations += 1;
    }
}

enum SimplexResult {
    Optimal,
    Unbounded,
    IterationLimit,
}

enum PhaseOne {
    Feasible,
    Infeasible(f64),
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;

    fn shadow(solution: &Solution, name: &str) -> f64 {
        solution
            .analysis
            .shadow_price(name)
            .map(|sp| sp.value)
            .unwrap_or_else(|| panic!("no shadow price for {}", name))
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=3, y=1, obj=11
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false); // maximize
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solver = Solver::new();
        let solution = solver.solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);

        // One more unit of room goes to y (+2); one more unit of x replaces a y (+1)
        assert!((shadow(&solution, "sum") - 2.0).abs() < 1e-6);
        assert!((shadow(&solution, "x_max") - 1.0).abs() < 1e-6);
        assert_eq!(shadow(&solution, "y_max"), 0.0);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solver = Solver::new();
        let solution = solver.solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);

        // Lower bound: each extra unit is bought at y's price
        assert!((shadow(&solution, "sum") - 3.0).abs() < 1e-6);
        // Upper bound on the cheap variable: relaxing it saves 3 - 2
        assert!((shadow(&solution, "x_max") + 1.0).abs() < 1e-6);
        assert_eq!(shadow(&solution, "y_max"), 0.0);

        let y_max = solution.analysis.shadow_price("y_max").unwrap();
        assert!((y_max.slack - 2.0).abs() < 1e-6);
        assert_eq!(solution.analysis.binding_constraints, vec!["sum".to_string(), "x_max".to_string()]);
    }

    #[test]
    fn test_equality_constraint_dual() {
        // Minimize x + 2y s.t. x + y = 10, x <= 4 -> x=4, y=6, obj=16
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("total", vec![1.0, 1.0], ConstraintOp::Eq, 10.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 4.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 16.0).abs() < 1e-6);
        assert!((shadow(&solution, "total") - 2.0).abs() < 1e-6);
        assert!((shadow(&solution, "x_max") + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_rhs_row_is_flipped() {
        // Minimize x s.t. -x <= -3 (x >= 3)
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("floor", vec![-1.0], ConstraintOp::Le, -3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6);
        // Raising the rhs from -3 toward 0 loosens the floor
        assert!((shadow(&solution, "floor") + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reduced_costs() {
        // Minimize 2x + 5y s.t. x + y >= 3 -> y stays out, must get 3 cheaper to enter
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 5.0], true);
        problem.add_constraint("need", vec![1.0, 1.0], ConstraintOp::Ge, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        let x = &solution.analysis.reduced_costs[0];
        let y = &solution.analysis.reduced_costs[1];
        assert!(x.is_basic);
        assert_eq!(x.reduced_cost, 0.0);
        assert!(!y.is_basic);
        assert!((y.reduced_cost - 3.0).abs() < 1e-6, "rc = {}", y.reduced_cost);
    }

    #[test]
    fn test_degenerate_transportation_problem() {
        // Balanced 3x4 transportation problem: every basis is degenerate
        let supply = [150.0, 170.0, 200.0];
        let demand = [140.0, 130.0, 120.0, 130.0];
        let costs = [
            [500.0, 700.0, 800.0, 1200.0],
            [400.0, 600.0, 300.0, 1000.0],
            [900.0, 850.0, 650.0, 400.0],
        ];

        let names = (0..12).map(|k| format!("x{}", k)).collect();
        let mut problem = LpProblem::new(names);
        problem.set_objective(costs.iter().flatten().copied().collect(), true);
        for (i, &cap) in supply.iter().enumerate() {
            let mut coeffs = vec![0.0; 12];
            coeffs[i * 4..i * 4 + 4].fill(1.0);
            problem.add_constraint(format!("supply{}", i), coeffs, ConstraintOp::Le, cap);
        }
        for (j, &req) in demand.iter().enumerate() {
            let mut coeffs = vec![0.0; 12];
            for i in 0..3 {
                coeffs[i * 4 + j] = 1.0;
            }
            problem.add_constraint(format!("demand{}", j), coeffs, ConstraintOp::Ge, req);
        }

        let solution = Solver::new().with_degenerate_pivot_limit(0).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 254500.0).abs() < 1e-6, "obj = {}", solution.objective_value);
        for sp in &solution.analysis.shadow_prices {
            assert_eq!(sp.slack, 0.0, "{} has slack {}", sp.constraint, sp.slack);
        }
    }

    #[test]
    fn test_no_constraints() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![4.0], true);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.values, vec![0.0]);
        assert_eq!(solution.objective_value, 0.0);
    }

    #[test]
    fn test_unbounded() {
        // Maximize x with only a lower bound
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("floor", vec![1.0], ConstraintOp::Ge, 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_iteration_limit_reports_error() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);

        let solution = Solver::new().with_max_iterations(0).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Error);
        assert!(solution.values.is_empty());
        assert!(solution.message.unwrap().contains("did not converge"));
    }

    #[test]
    fn test_malformed_problem_reports_error() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Error);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let solver = Solver::new();
        let solution = solver.solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.values.is_empty());
    }
}
