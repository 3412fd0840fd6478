use haulplan_engine::{PlanSummary, ShipmentReport};

const LABEL_WIDTH: usize = 24;
const CELL_WIDTH: usize = 16;

pub fn print_report(report: &ShipmentReport, analysis: bool) {
    println!("Status: {}", report.status);
    let Some(summary) = &report.summary else {
        if let Some(message) = &report.message {
            println!("{}", message);
        }
        return;
    };

    println!("Total cost: {:.2}", summary.total_cost);
    println!();
    print_matrix(summary);
    println!();

    println!("Routes:");
    for route in &summary.routes {
        println!(
            "  {:>w$} -> {:<w$} {:10.1} t @ {:8.2} = {:12.2}",
            route.origin,
            route.destination,
            route.tons,
            route.unit_cost,
            route.line_cost,
            w = LABEL_WIDTH
        );
    }
    println!();

    if summary.binding.is_empty() {
        println!("No strongly binding constraints detected.");
    } else {
        println!("Binding constraints and shadow prices:");
        for (id, price) in &summary.binding {
            println!("  {:40} {:12.2}", id.to_string(), price);
        }
    }

    if analysis {
        println!();
        println!("Origin utilisation:");
        for usage in &summary.origin_usage {
            println!(
                "  {:w$} {:10.1} / {:10.1} t ({:.1} unused)",
                usage.origin,
                usage.shipped,
                usage.capacity,
                usage.unused,
                w = LABEL_WIDTH
            );
        }
        println!();
        println!("Destination receipts:");
        for receipt in &summary.destination_receipts {
            println!(
                "  {:w$} {:10.1} / {:10.1} t ({:.1} surplus)",
                receipt.destination,
                receipt.received,
                receipt.requirement,
                receipt.surplus,
                w = LABEL_WIDTH
            );
        }
        println!();
        println!("Idle routes (unit cost must fall by):");
        for route in summary.idle_routes.iter().filter(|r| r.reduced_cost > 0.0) {
            println!(
                "  {:>w$} -> {:<w$} {:10.2}",
                route.origin,
                route.destination,
                route.reduced_cost,
                w = LABEL_WIDTH
            );
        }
    }
}

fn print_matrix(summary: &PlanSummary) {
    println!("Shipment plan (tons):");
    print!("  {:w$}", "", w = LABEL_WIDTH);
    for destination in &summary.destinations {
        print!("{:>w$}", truncate(destination, CELL_WIDTH - 1), w = CELL_WIDTH);
    }
    println!();

    for (origin, row) in summary.origins.iter().zip(&summary.matrix) {
        print!("  {:w$}", truncate(origin, LABEL_WIDTH - 1), w = LABEL_WIDTH);
        for tons in row {
            print!("{:>w$.1}", tons, w = CELL_WIDTH);
        }
        println!();
    }
}

fn truncate(label: &str, max: usize) -> &str {
    match label.char_indices().nth(max) {
        Some((idx, _)) => &label[..idx],
        None => label,
    }
}
