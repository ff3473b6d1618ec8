use std::path::PathBuf;

use clap::{Parser, Subcommand};
use courier_dispatch::{
    clock::format_clock,
    json::fleet_plan::FleetPlan,
    problem::package::PackageId,
    solver::status::{package_status, snapshot},
};
use jiff::civil::Time;
use tracing::info;

mod delivery_day;
mod parsers;
mod tables;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,

    /// Folder holding packages.csv, addresses.csv and distances.csv
    /// (default: $COURIER_DATA_DIR, then ./csv)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON fleet plan (default: the stock three-truck day)
    #[arg(long, global = true)]
    plan: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Every package at the end of the day, with per-truck mileage
    Report {
        /// Report time (default: the plan's end of day)
        #[arg(long, value_parser = parsers::parse_time)]
        at: Option<Time>,
    },
    /// One package at a given time
    Package {
        #[arg(value_parser = parsers::parse_package_id)]
        id: u32,

        #[arg(long, value_parser = parsers::parse_time)]
        at: Time,
    },
    /// Every package at a given time
    Snapshot {
        #[arg(long, value_parser = parsers::parse_time)]
        at: Time,

        #[arg(long)]
        json: bool,
    },
    /// Prints the default fleet plan as JSON
    Plan,
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Plan = cli.command {
        println!("{}", FleetPlan::default().to_json()?);
        return Ok(());
    }

    let data_dir = delivery_day::resolve_data_dir(cli.data);
    let plan = delivery_day::read_plan(cli.plan.as_deref())?;
    let day = delivery_day::run(&data_dir, plan)?;

    match cli.command {
        Commands::Report { at } => {
            let at = at.unwrap_or(day.plan.end_of_day);
            info!("Delivery status at {}", format_clock(at));

            println!("{}", tables::status_table(&snapshot(&day.problem, at)));
            println!("{}", tables::report_table(&day.report));
            println!("Total mileage: {:.1}", day.report.total_miles);
        }
        Commands::Package { id, at } => {
            let status = package_status(&day.problem, PackageId::new(id), at)?;

            println!("{status}");
            println!("{}", tables::status_table(&[status]));
        }
        Commands::Snapshot { at, json } => {
            let statuses = snapshot(&day.problem, at);

            if json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                println!("{}", tables::status_table(&statuses));
            }
        }
        Commands::Plan => {}
    }

    info!(
        vehicles = day.vehicles.len(),
        total_miles = day.report.total_miles,
        "Done"
    );

    Ok(())
}
