use std::collections::BTreeMap;

use tracing::warn;

use crate::config::Tolerances;
use crate::formulate::ConstraintId;
use crate::model::ProblemModel;
use crate::result::{SolveResult, SolveStatus};

/// One route that carries freight in the plan
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteFlow {
    pub origin: String,
    pub destination: String,
    pub tons: f64,
    pub unit_cost: f64,
    /// tons x unit cost
    pub line_cost: f64,
}

/// A route left empty, with the cut in unit cost it needs to be used
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdleRoute {
    pub origin: String,
    pub destination: String,
    pub unit_cost: f64,
    pub reduced_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginUsage {
    pub origin: String,
    pub capacity: f64,
    pub shipped: f64,
    pub unused: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationReceipt {
    pub destination: String,
    pub requirement: f64,
    pub received: f64,
    /// Tons delivered beyond the requirement
    pub surplus: f64,
}

/// Everything a presentation layer needs to draw an optimal plan
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanSummary {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    /// Dense origin x destination tons, explicit zeros included
    pub matrix: Vec<Vec<f64>>,
    /// Routes carrying more than the primal epsilon, origin-major
    pub routes: Vec<RouteFlow>,
    /// LP objective value
    pub total_cost: f64,
    /// Constraints whose shadow price magnitude exceeds the binding threshold
    pub binding: BTreeMap<ConstraintId, f64>,
    pub origin_usage: Vec<OriginUsage>,
    pub destination_receipts: Vec<DestinationReceipt>,
    pub idle_routes: Vec<IdleRoute>,
}

/// Aggregated view of a [`SolveResult`]; non-optimal outcomes carry only
/// the status and the diagnostic
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipmentReport {
    pub status: SolveStatus,
    pub message: Option<String>,
    pub summary: Option<PlanSummary>,
}

impl ShipmentReport {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

impl PlanSummary {
    pub fn line_cost_total(&self) -> f64 {
        self.routes.iter().map(|r| r.line_cost).sum()
    }
}

/// Turn a solve result for `model` into a shipment report
pub fn aggregate(model: &ProblemModel, result: &SolveResult, tolerances: &Tolerances) -> ShipmentReport {
    let plan = match result.plan() {
        Some(plan) if result.is_optimal() => plan,
        _ => {
            return ShipmentReport {
                status: result.status(),
                message: result.message().map(str::to_string),
                summary: None,
            };
        }
    };

    let origins_match = plan.origins().iter().eq(model.origins().iter().map(|o| &o.id));
    let destinations_match = plan.destinations().iter().eq(model.destinations().iter().map(|d| &d.id));
    if !origins_match || !destinations_match {
        warn!("solve result does not belong to the model being aggregated");
        return ShipmentReport {
            status: SolveStatus::Error,
            message: Some(format!(
                "Plan covers {} origins x {} destinations but the model has {} x {}, or the ids differ",
                plan.origins().len(),
                plan.destinations().len(),
                model.origins().len(),
                model.destinations().len()
            )),
            summary: None,
        };
    }

    let eps = tolerances.primal_epsilon;
    let mut routes = Vec::new();
    let mut idle_routes = Vec::new();
    for (i, origin) in model.origins().iter().enumerate() {
        for (j, destination) in model.destinations().iter().enumerate() {
            let tons = plan.tons(i, j);
            let unit_cost = model.unit_cost(i, j);
            if tons > eps {
                routes.push(RouteFlow {
                    origin: origin.id.clone(),
                    destination: destination.id.clone(),
                    tons,
                    unit_cost,
                    line_cost: tons * unit_cost,
                });
            } else {
                idle_routes.push(IdleRoute {
                    origin: origin.id.clone(),
                    destination: destination.id.clone(),
                    unit_cost,
                    reduced_cost: result.reduced_cost(i, j).unwrap_or(0.0),
                });
            }
        }
    }

    let origin_usage = model
        .origins()
        .iter()
        .enumerate()
        .map(|(i, origin)| {
            let shipped = plan.shipped_from(i);
            OriginUsage {
                origin: origin.id.clone(),
                capacity: origin.capacity,
                shipped,
                unused: clean(origin.capacity - shipped, eps),
            }
        })
        .collect();

    let destination_receipts = model
        .destinations()
        .iter()
        .enumerate()
        .map(|(j, destination)| {
            let received = plan.delivered_to(j);
            DestinationReceipt {
                destination: destination.id.clone(),
                requirement: destination.requirement,
                received,
                surplus: clean(received - destination.requirement, eps),
            }
        })
        .collect();

    let binding = result
        .constraints()
        .iter()
        .filter(|(_, dual)| dual.shadow_price.abs() > tolerances.binding_threshold)
        .map(|(id, dual)| (id.clone(), dual.shadow_price))
        .collect();

    let summary = PlanSummary {
        origins: plan.origins().to_vec(),
        destinations: plan.destinations().to_vec(),
        matrix: plan.matrix(),
        routes,
        total_cost: result.total_cost(),
        binding,
        origin_usage,
        destination_receipts,
        idle_routes,
    };

    let line_total = summary.line_cost_total();
    if (line_total - summary.total_cost).abs() > eps * (1.0 + summary.total_cost.abs()) {
        warn!(
            line_total,
            total_cost = summary.total_cost,
            "route line costs do not add up to the objective"
        );
    }

    ShipmentReport {
        status: SolveStatus::Optimal,
        message: None,
        summary: Some(summary),
    }
}

fn clean(value: f64, eps: f64) -> f64 {
    if value.abs() <= eps { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::model::{CostMatrix, Destination, Origin};

    fn model() -> ProblemModel {
        ProblemModel::new(
            vec![Origin::new("A", 50.0), Origin::new("B", 100.0)],
            vec![Destination::new("X", 60.0), Destination::new("Y", 50.0)],
            CostMatrix::from_rows(&["A", "B"], &["X", "Y"], &[vec![4.0, 6.0], vec![5.0, 3.0]]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_report_for_optimal_plan() {
        // A -> X 50, B -> X 10, B -> Y 50; cost 200 + 50 + 150
        let model = model();
        let engine = Engine::default();
        let result = engine.solve_model(&model);
        let report = aggregate(&model, &result, &Tolerances::default());

        assert!(report.is_optimal());
        let summary = report.summary.unwrap();
        assert!((summary.total_cost - 400.0).abs() < 1e-6, "total = {}", summary.total_cost);
        assert!((summary.line_cost_total() - summary.total_cost).abs() < 1e-6);

        assert_eq!(summary.matrix.len(), 2);
        assert_eq!(summary.matrix[0].len(), 2);
        assert_eq!(summary.matrix[0][1], 0.0);
        assert!((summary.matrix[1][0] - 10.0).abs() < 1e-6);

        assert_eq!(summary.routes.len(), 3);
        let a_x = &summary.routes[0];
        assert_eq!((a_x.origin.as_str(), a_x.destination.as_str()), ("A", "X"));
        assert!((a_x.line_cost - 200.0).abs() < 1e-6);

        // B has 40 tons spare, so only A and the destinations bind
        let binding: Vec<String> = summary.binding.keys().map(|id| id.to_string()).collect();
        assert_eq!(binding, vec!["supply:A", "demand:X", "demand:Y"]);
        assert!((summary.binding[&ConstraintId::supply("A")] + 1.0).abs() < 1e-6);

        assert!((summary.origin_usage[1].unused - 40.0).abs() < 1e-6);
        assert_eq!(summary.origin_usage[0].unused, 0.0);
        assert_eq!(summary.destination_receipts[0].surplus, 0.0);

        // A -> Y costs 6 against duals u_A + v_Y = -1 + 3
        let a_y = summary
            .idle_routes
            .iter()
            .find(|r| r.origin == "A" && r.destination == "Y")
            .unwrap();
        assert!((a_y.reduced_cost - 4.0).abs() < 1e-6, "rc = {}", a_y.reduced_cost);
    }

    #[test]
    fn test_binding_threshold_drops_small_prices() {
        let model = model();
        let result = Engine::default().solve_model(&model);
        let tolerances = Tolerances {
            binding_threshold: 2.0,
            ..Tolerances::default()
        };

        let summary = aggregate(&model, &result, &tolerances).summary.unwrap();

        // Only demand:X (5) and demand:Y (3) exceed the threshold
        assert_eq!(summary.binding.len(), 2);
        assert!(!summary.binding.contains_key(&ConstraintId::supply("A")));
    }

    #[test]
    fn test_report_rejects_result_of_another_model() {
        let small = ProblemModel::new(
            vec![Origin::new("A", 10.0)],
            vec![Destination::new("X", 5.0)],
            CostMatrix::from_rows(&["A"], &["X"], &[vec![1.0]]).unwrap(),
        )
        .unwrap();
        let engine = Engine::default();
        let result = engine.solve_model(&small);
        assert!(result.is_optimal());

        let report = aggregate(&model(), &result, &Tolerances::default());
        assert_eq!(report.status, SolveStatus::Error);
        assert!(report.summary.is_none());
        assert!(report.message.unwrap().contains("1 origins x 1 destinations"));

        // Same shape, different ids
        let other = ProblemModel::new(
            vec![Origin::new("P", 50.0), Origin::new("B", 100.0)],
            vec![Destination::new("X", 60.0), Destination::new("Y", 50.0)],
            CostMatrix::from_rows(&["P", "B"], &["X", "Y"], &[vec![4.0, 6.0], vec![5.0, 3.0]]).unwrap(),
        )
        .unwrap();
        let report = engine.report(&model(), &engine.solve_model(&other));
        assert_eq!(report.status, SolveStatus::Error);
    }

    #[test]
    fn test_report_for_infeasible_plan() {
        let model = model().with_requirement("X", 200.0).unwrap();
        let result = Engine::default().solve_model(&model);
        let report = aggregate(&model, &result, &Tolerances::default());

        assert_eq!(report.status, SolveStatus::Infeasible);
        assert!(report.summary.is_none());
        assert!(report.message.is_some());
    }
}
