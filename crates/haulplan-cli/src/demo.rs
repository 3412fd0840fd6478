use haulplan_engine::{CostMatrix, Destination, MalformedProblem, Origin, ProblemModel};

const REGIONS: [(&str, f64); 3] = [
    ("Indian River, FL", 150.0),
    ("Rio Grande Valley, TX", 170.0),
    ("Central Valley, CA", 200.0),
];

const DISTRIBUTION_CENTRES: [(&str, f64); 4] = [
    ("Atlanta, GA", 140.0),
    ("Chicago, IL", 130.0),
    ("Dallas, TX", 120.0),
    ("Los Angeles, CA", 130.0),
];

/// USD per ton, one row per region
const COSTS: [[f64; 4]; 3] = [
    [500.0, 700.0, 800.0, 1200.0],
    [400.0, 600.0, 300.0, 1000.0],
    [900.0, 850.0, 650.0, 400.0],
];

/// Weekly orange shipments from three growing regions to four distribution centres
pub fn citrus_growers() -> Result<ProblemModel, MalformedProblem> {
    let origins: Vec<Origin> = REGIONS.iter().map(|&(id, tons)| Origin::new(id, tons)).collect();
    let destinations: Vec<Destination> = DISTRIBUTION_CENTRES
        .iter()
        .map(|&(id, tons)| Destination::new(id, tons))
        .collect();

    let origin_ids: Vec<&str> = REGIONS.iter().map(|(id, _)| *id).collect();
    let destination_ids: Vec<&str> = DISTRIBUTION_CENTRES.iter().map(|(id, _)| *id).collect();
    let rows: Vec<Vec<f64>> = COSTS.iter().map(|row| row.to_vec()).collect();
    let costs = CostMatrix::from_rows(&origin_ids, &destination_ids, &rows)?;

    ProblemModel::new(origins, destinations, costs)
}
