use thiserror::Error;

/// Structural defects in a transportation problem, raised before any solve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedProblem {
    #[error("At least one origin is required")]
    NoOrigins,
    #[error("At least one destination is required")]
    NoDestinations,
    #[error("Duplicate origin: {0}")]
    DuplicateOrigin(String),
    #[error("Duplicate destination: {0}")]
    DuplicateDestination(String),
    #[error("Origin {origin} has negative capacity {value}")]
    NegativeCapacity { origin: String, value: f64 },
    #[error("Destination {destination} has negative requirement {value}")]
    NegativeRequirement { destination: String, value: f64 },
    #[error("Route {origin} -> {destination} has negative unit cost {value}")]
    NegativeCost {
        origin: String,
        destination: String,
        value: f64,
    },
    #[error("Non-finite value for {0}")]
    NonFinite(String),
    #[error("Missing cost for route {origin} -> {destination}")]
    MissingCost { origin: String, destination: String },
    #[error("Duplicate cost for route {origin} -> {destination}")]
    DuplicateCost { origin: String, destination: String },
    #[error("Unknown origin: {0}")]
    UnknownOrigin(String),
    #[error("Unknown destination: {0}")]
    UnknownDestination(String),
    #[error("Cost row {row} has {found} entries but there are {expected} destinations")]
    CostShape { row: usize, expected: usize, found: usize },
    #[error("Cost table has {found} rows but there are {expected} origins")]
    CostRows { expected: usize, found: usize },
}
