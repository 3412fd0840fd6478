use std::collections::BTreeMap;

use haulplan_lp::Solver;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{ShipmentReport, aggregate};
use crate::config::EngineConfig;
use crate::error::MalformedProblem;
use crate::formulate::{ConstraintId, formulate};
use crate::model::{CostMatrix, Destination, Origin, ProblemModel};
use crate::result::{ConstraintDual, ShipmentPlan, SolveResult, SolveStatus};

/// Formulates, solves and aggregates transportation problems.
///
/// Holds configuration only; every solve builds its own LP and result, so
/// one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    solver: Solver,
}

/// Objective response to a one-constraint what-if change
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Probe {
    pub constraint: ConstraintId,
    /// Amount added to the constraint's bound
    pub step: f64,
    pub base_status: SolveStatus,
    pub probed_status: SolveStatus,
    pub base_cost: f64,
    pub probed_cost: f64,
    /// (probed cost - base cost) / step, when both solves are optimal
    pub marginal_cost: Option<f64>,
    /// Shadow price the base solve reported for the constraint
    pub shadow_price: Option<f64>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let solver = Solver::new()
            .with_max_iterations(config.max_iterations)
            .with_tolerance(config.pivot_tolerance)
            .with_degenerate_pivot_limit(config.degenerate_pivot_limit);
        Self { config, solver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Formulate and solve one model
    #[instrument(skip_all, fields(origins = model.origins().len(), destinations = model.destinations().len()))]
    pub fn solve_model(&self, model: &ProblemModel) -> SolveResult {
        let eps = self.config.tolerances.primal_epsilon;

        // With every lane open, capacity short of requirement is the only way to be infeasible
        let capacity = model.total_capacity();
        let requirement = model.total_requirement();
        if requirement > capacity + eps {
            info!(capacity, requirement, "total requirement exceeds total capacity");
            return SolveResult::failed(
                SolveStatus::Infeasible,
                format!(
                    "Total requirement {:.3} exceeds total capacity {:.3}",
                    requirement, capacity
                ),
                f64::INFINITY,
                0,
            );
        }

        let formulation = formulate(model);
        let solution = self.solver.solve(&formulation.lp);

        let status = SolveStatus::from(solution.status);
        if status != SolveStatus::Optimal {
            let message = solution
                .message
                .unwrap_or_else(|| format!("Solver finished with status {}", status));
            warn!(%status, %message, "no transportation plan");
            return SolveResult::failed(status, message, solution.objective_value, solution.iterations);
        }

        let n_dest = model.destinations().len();
        let mut tons = vec![0.0; model.num_routes()];
        let mut reduced_costs = vec![0.0; model.num_routes()];
        for (k, &(i, j)) in formulation.routes.iter().enumerate() {
            tons[i * n_dest + j] = clean(solution.values[k], eps);
            reduced_costs[i * n_dest + j] = clean(solution.analysis.reduced_costs[k].reduced_cost, eps);
        }

        let constraints: BTreeMap<ConstraintId, ConstraintDual> = formulation
            .constraints
            .iter()
            .zip(&solution.analysis.shadow_prices)
            .map(|(id, sp)| {
                let dual = ConstraintDual {
                    shadow_price: clean(sp.value, eps),
                    slack: clean(sp.slack, eps),
                };
                (id.clone(), dual)
            })
            .collect();

        let plan = ShipmentPlan::new(
            model.origins().iter().map(|o| o.id.clone()).collect(),
            model.destinations().iter().map(|d| d.id.clone()).collect(),
            tons,
        );

        info!(
            total_cost = solution.objective_value,
            iterations = solution.iterations,
            "transportation plan found"
        );

        SolveResult::optimal(
            plan,
            solution.objective_value,
            constraints,
            reduced_costs,
            solution.iterations,
        )
    }

    /// Aggregate a result produced for `model`
    pub fn report(&self, model: &ProblemModel, result: &SolveResult) -> ShipmentReport {
        aggregate(model, result, &self.config.tolerances)
    }

    /// Formulate, solve and aggregate in one step
    pub fn run(&self, model: &ProblemModel) -> ShipmentReport {
        let result = self.solve_model(model);
        self.report(model, &result)
    }

    /// Solve independent models in parallel, results in input order
    pub fn solve_batch(&self, models: &[ProblemModel]) -> Vec<SolveResult> {
        debug!(models = models.len(), "solving batch");
        models.par_iter().map(|model| self.solve_model(model)).collect()
    }

    /// Re-solve with one origin's capacity raised by `step`
    pub fn capacity_probe(&self, model: &ProblemModel, origin: &str, step: f64) -> Result<Probe, MalformedProblem> {
        let i = model
            .origin_position(origin)
            .ok_or_else(|| MalformedProblem::UnknownOrigin(origin.to_string()))?;
        let probed = model.with_capacity(origin, model.origins()[i].capacity + step)?;
        Ok(self.probe(model, &probed, ConstraintId::supply(origin), step))
    }

    /// Re-solve with one destination's requirement raised by `step`
    pub fn requirement_probe(
        &self,
        model: &ProblemModel,
        destination: &str,
        step: f64,
    ) -> Result<Probe, MalformedProblem> {
        let j = model
            .destination_position(destination)
            .ok_or_else(|| MalformedProblem::UnknownDestination(destination.to_string()))?;
        let probed = model.with_requirement(destination, model.destinations()[j].requirement + step)?;
        Ok(self.probe(model, &probed, ConstraintId::demand(destination), step))
    }

    fn probe(&self, model: &ProblemModel, probed_model: &ProblemModel, constraint: ConstraintId, step: f64) -> Probe {
        let base = self.solve_model(model);
        let probed = self.solve_model(probed_model);

        let marginal_cost = (base.is_optimal() && probed.is_optimal() && step != 0.0)
            .then(|| (probed.total_cost() - base.total_cost()) / step);
        debug!(%constraint, step, ?marginal_cost, "probe finished");

        Probe {
            shadow_price: base.shadow_price(&constraint),
            constraint,
            step,
            base_status: base.status(),
            probed_status: probed.status(),
            base_cost: base.total_cost(),
            probed_cost: probed.total_cost(),
            marginal_cost,
        }
    }
}

/// Validate the inputs and solve them with the default configuration
pub fn solve(
    origins: Vec<Origin>,
    destinations: Vec<Destination>,
    costs: CostMatrix,
) -> Result<SolveResult, MalformedProblem> {
    let model = ProblemModel::new(origins, destinations, costs)?;
    Ok(Engine::default().solve_model(&model))
}

fn clean(value: f64, eps: f64) -> f64 {
    if value.abs() < eps { 0.0 } else { value }
}
