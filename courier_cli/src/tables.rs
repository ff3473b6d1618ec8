use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use courier_dispatch::{
    clock::format_clock,
    solver::{dispatcher::DispatchReport, status::PresentedStatus},
};

fn optional<T>(value: Option<T>, format: impl Fn(T) -> String) -> String {
    value.map(format).unwrap_or_else(|| String::from("-"))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn status_table(statuses: &[PresentedStatus]) -> Table {
    let mut table = new_table(vec![
        "Package", "Address", "Zip", "Deadline", "Status", "Truck", "Departed", "Delivered",
        "Notes",
    ]);

    for status in statuses {
        table.add_row(vec![
            status.package_id.to_string(),
            status.address.clone(),
            status.zip.clone(),
            status.deadline.clone(),
            status.status.to_string(),
            optional(status.vehicle, |vehicle| vehicle.to_string()),
            optional(status.depart_time, format_clock),
            optional(status.delivery_time, format_clock),
            status.notes.clone(),
        ]);
    }

    table
}

pub fn report_table(report: &DispatchReport) -> Table {
    let mut table = new_table(vec!["Truck", "Departed", "Stops", "Miles", "Last stop", "Route"]);

    for route in &report.routes {
        let order = route
            .route()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            route.vehicle.to_string(),
            format_clock(route.depart_time),
            route.stops.len().to_string(),
            format!("{:.1}", route.miles),
            format_clock(route.finish_time()),
            order,
        ]);
    }

    table.add_row(vec![
        String::from("Total"),
        String::new(),
        report
            .routes
            .iter()
            .map(|route| route.stops.len())
            .sum::<usize>()
            .to_string(),
        format!("{:.1}", report.total_miles),
        String::new(),
        String::new(),
    ]);

    table
}
