use std::collections::{HashMap, HashSet};

use crate::error::MalformedProblem;

/// A supply location with the tons it can ship this period
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Origin {
    pub id: String,
    pub capacity: f64,
}

/// A demand location with the tons it must receive this period
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub id: String,
    pub requirement: f64,
}

/// Unit cost of one origin -> destination lane
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostEntry {
    pub origin: String,
    pub destination: String,
    pub cost: f64,
}

/// Unit shipping costs keyed by (origin, destination).
///
/// Entries are kept in insertion order and are only checked when a
/// [`ProblemModel`] is built from them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CostMatrix {
    entries: Vec<CostEntry>,
}

/// An (origin, destination) pair with its unit cost, derived from a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub unit_cost: f64,
}

/// A validated transportation problem.
///
/// Every origin and destination id is unique, every quantity is finite and
/// non-negative, and a unit cost exists for the full origin x destination
/// cross product. Total capacity and total requirement may differ.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ProblemInput", into = "ProblemInput"))]
pub struct ProblemModel {
    origins: Vec<Origin>,
    destinations: Vec<Destination>,
    /// Row-major origin x destination unit costs
    unit_costs: Vec<f64>,
    origin_index: HashMap<String, usize>,
    destination_index: HashMap<String, usize>,
}

/// Unvalidated problem data as supplied by a caller
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemInput {
    pub origins: Vec<Origin>,
    pub destinations: Vec<Destination>,
    pub costs: CostMatrix,
}

impl Origin {
    pub fn new(id: impl Into<String>, capacity: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }
}

impl Destination {
    pub fn new(id: impl Into<String>, requirement: f64) -> Self {
        Self {
            id: id.into(),
            requirement,
        }
    }
}

impl CostMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, origin: impl Into<String>, destination: impl Into<String>, cost: f64) {
        self.entries.push(CostEntry {
            origin: origin.into(),
            destination: destination.into(),
            cost,
        });
    }

    /// Build from a dense table: one row per origin, one column per destination
    pub fn from_rows<O, D>(origins: &[O], destinations: &[D], rows: &[Vec<f64>]) -> Result<Self, MalformedProblem>
    where
        O: AsRef<str>,
        D: AsRef<str>,
    {
        if rows.len() != origins.len() {
            return Err(MalformedProblem::CostRows {
                expected: origins.len(),
                found: rows.len(),
            });
        }

        let mut matrix = Self::new();
        for (row, (origin, costs)) in origins.iter().zip(rows).enumerate() {
            if costs.len() != destinations.len() {
                return Err(MalformedProblem::CostShape {
                    row,
                    expected: destinations.len(),
                    found: costs.len(),
                });
            }
            for (destination, &cost) in destinations.iter().zip(costs) {
                matrix.insert(origin.as_ref(), destination.as_ref(), cost);
            }
        }

        Ok(matrix)
    }

    pub fn entries(&self) -> &[CostEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O, D> FromIterator<(O, D, f64)> for CostMatrix
where
    O: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (O, D, f64)>>(iter: I) -> Self {
        let mut matrix = Self::new();
        for (origin, destination, cost) in iter {
            matrix.insert(origin, destination, cost);
        }
        matrix
    }
}

impl ProblemModel {
    /// Validate the inputs and build a model; nothing is clamped or coerced
    pub fn new(
        origins: Vec<Origin>,
        destinations: Vec<Destination>,
        costs: CostMatrix,
    ) -> Result<Self, MalformedProblem> {
        if origins.is_empty() {
            return Err(MalformedProblem::NoOrigins);
        }
        if destinations.is_empty() {
            return Err(MalformedProblem::NoDestinations);
        }

        let mut origin_index = HashMap::with_capacity(origins.len());
        for (i, origin) in origins.iter().enumerate() {
            if !origin.capacity.is_finite() {
                return Err(MalformedProblem::NonFinite(format!("capacity of {}", origin.id)));
            }
            if origin.capacity < 0.0 {
                return Err(MalformedProblem::NegativeCapacity {
                    origin: origin.id.clone(),
                    value: origin.capacity,
                });
            }
            if origin_index.insert(origin.id.clone(), i).is_some() {
                return Err(MalformedProblem::DuplicateOrigin(origin.id.clone()));
            }
        }

        let mut destination_index = HashMap::with_capacity(destinations.len());
        for (j, destination) in destinations.iter().enumerate() {
            if !destination.requirement.is_finite() {
                return Err(MalformedProblem::NonFinite(format!("requirement of {}", destination.id)));
            }
            if destination.requirement < 0.0 {
                return Err(MalformedProblem::NegativeRequirement {
                    destination: destination.id.clone(),
                    value: destination.requirement,
                });
            }
            if destination_index.insert(destination.id.clone(), j).is_some() {
                return Err(MalformedProblem::DuplicateDestination(destination.id.clone()));
            }
        }

        let n_dest = destinations.len();
        let mut unit_costs = vec![0.0; origins.len() * n_dest];
        let mut seen = HashSet::with_capacity(costs.len());
        for entry in costs.entries() {
            let i = *origin_index
                .get(&entry.origin)
                .ok_or_else(|| MalformedProblem::UnknownOrigin(entry.origin.clone()))?;
            let j = *destination_index
                .get(&entry.destination)
                .ok_or_else(|| MalformedProblem::UnknownDestination(entry.destination.clone()))?;

            if !entry.cost.is_finite() {
                return Err(MalformedProblem::NonFinite(format!(
                    "cost of {} -> {}",
                    entry.origin, entry.destination
                )));
            }
            if entry.cost < 0.0 {
                return Err(MalformedProblem::NegativeCost {
                    origin: entry.origin.clone(),
                    destination: entry.destination.clone(),
                    value: entry.cost,
                });
            }
            if !seen.insert((i, j)) {
                return Err(MalformedProblem::DuplicateCost {
                    origin: entry.origin.clone(),
                    destination: entry.destination.clone(),
                });
            }
            unit_costs[i * n_dest + j] = entry.cost;
        }

        // Complete bipartite coverage
        for (i, origin) in origins.iter().enumerate() {
            for (j, destination) in destinations.iter().enumerate() {
                if !seen.contains(&(i, j)) {
                    return Err(MalformedProblem::MissingCost {
                        origin: origin.id.clone(),
                        destination: destination.id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            origins,
            destinations,
            unit_costs,
            origin_index,
            destination_index,
        })
    }

    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn origin_position(&self, id: &str) -> Option<usize> {
        self.origin_index.get(id).copied()
    }

    pub fn destination_position(&self, id: &str) -> Option<usize> {
        self.destination_index.get(id).copied()
    }

    /// Unit cost by position
    pub fn unit_cost(&self, origin: usize, destination: usize) -> f64 {
        self.unit_costs[origin * self.destinations.len() + destination]
    }

    /// Unit cost by id
    pub fn cost(&self, origin: &str, destination: &str) -> Option<f64> {
        let i = self.origin_position(origin)?;
        let j = self.destination_position(destination)?;
        Some(self.unit_cost(i, j))
    }

    /// All routes, origin-major in input order
    pub fn routes(&self) -> impl Iterator<Item = Route<'_>> + '_ {
        self.origins.iter().enumerate().flat_map(move |(i, origin)| {
            self.destinations.iter().enumerate().map(move |(j, destination)| Route {
                origin: &origin.id,
                destination: &destination.id,
                unit_cost: self.unit_cost(i, j),
            })
        })
    }

    pub fn num_routes(&self) -> usize {
        self.unit_costs.len()
    }

    pub fn total_capacity(&self) -> f64 {
        self.origins.iter().map(|o| o.capacity).sum()
    }

    pub fn total_requirement(&self) -> f64 {
        self.destinations.iter().map(|d| d.requirement).sum()
    }

    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.total_capacity() - self.total_requirement()).abs() <= tolerance
    }

    /// The cost table as a [`CostMatrix`]
    pub fn cost_matrix(&self) -> CostMatrix {
        self.routes()
            .map(|r| (r.origin, r.destination, r.unit_cost))
            .collect()
    }

    /// A copy of this model with one origin's capacity replaced
    pub fn with_capacity(&self, origin: &str, capacity: f64) -> Result<Self, MalformedProblem> {
        let i = self
            .origin_position(origin)
            .ok_or_else(|| MalformedProblem::UnknownOrigin(origin.to_string()))?;
        let mut origins = self.origins.clone();
        origins[i].capacity = capacity;
        Self::new(origins, self.destinations.clone(), self.cost_matrix())
    }

    /// A copy of this model with one destination's requirement replaced
    pub fn with_requirement(&self, destination: &str, requirement: f64) -> Result<Self, MalformedProblem> {
        let j = self
            .destination_position(destination)
            .ok_or_else(|| MalformedProblem::UnknownDestination(destination.to_string()))?;
        let mut destinations = self.destinations.clone();
        destinations[j].requirement = requirement;
        Self::new(self.origins.clone(), destinations, self.cost_matrix())
    }

    /// A copy of this model with one route's unit cost replaced
    pub fn with_cost(&self, origin: &str, destination: &str, cost: f64) -> Result<Self, MalformedProblem> {
        if self.origin_position(origin).is_none() {
            return Err(MalformedProblem::UnknownOrigin(origin.to_string()));
        }
        if self.destination_position(destination).is_none() {
            return Err(MalformedProblem::UnknownDestination(destination.to_string()));
        }
        let costs = self
            .routes()
            .map(|r| {
                let unit_cost = if r.origin == origin && r.destination == destination {
                    cost
                } else {
                    r.unit_cost
                };
                (r.origin, r.destination, unit_cost)
            })
            .collect();
        Self::new(self.origins.clone(), self.destinations.clone(), costs)
    }
}

impl TryFrom<ProblemInput> for ProblemModel {
    type Error = MalformedProblem;

    fn try_from(input: ProblemInput) -> Result<Self, Self::Error> {
        Self::new(input.origins, input.destinations, input.costs)
    }
}

impl From<ProblemModel> for ProblemInput {
    fn from(model: ProblemModel) -> Self {
        let costs = model.cost_matrix();
        Self {
            origins: model.origins,
            destinations: model.destinations,
            costs,
        }
    }
}
