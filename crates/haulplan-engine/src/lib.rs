//! Minimum-cost transportation planning.
//!
//! A [`ProblemModel`] of origins, destinations and unit costs is formulated
//! as a linear program, solved with the simplex in `haulplan-lp`, and
//! aggregated into a shipment report with binding constraints and their
//! shadow prices.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod formulate;
pub mod model;
pub mod result;

pub use aggregate::{DestinationReceipt, IdleRoute, OriginUsage, PlanSummary, RouteFlow, ShipmentReport, aggregate};
pub use config::{EngineConfig, Tolerances};
pub use engine::{Engine, Probe, solve};
pub use error::MalformedProblem;
pub use formulate::{ConstraintId, Formulation, ParseConstraintIdError, formulate};
pub use model::{CostEntry, CostMatrix, Destination, Origin, ProblemInput, ProblemModel, Route};
pub use result::{ConstraintDual, PlanShapeError, ShipmentPlan, SolveResult, SolveStatus};
