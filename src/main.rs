use clap::{Args, Parser, Subcommand};
use property_value_analysis::config::AppConfig;
use property_value_analysis::error::AppError;
use property_value_analysis::statistics::{
    sales_from_path, street_trees_from_path, PropertyValueStatistics,
};
use property_value_analysis::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Property Value Analysis",
    about = "Average property sale prices on streets with tall and short trees",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the tall/short tree price averages (default command)
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ReportArgs {
    /// Override the configured property sales CSV path
    #[arg(long)]
    sales_csv: Option<PathBuf>,
    /// Override the configured street tree survey JSON path
    #[arg(long)]
    street_trees: Option<PathBuf>,
    /// Additional tree categories to average beyond tall and short
    #[arg(long = "category")]
    categories: Vec<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let Command::Report(args) = cli
        .command
        .unwrap_or_else(|| Command::Report(ReportArgs::default()));

    let config = AppConfig::load();
    telemetry::init(&config.telemetry)?;

    run_report(args, &config)
}

fn run_report(mut args: ReportArgs, config: &AppConfig) -> Result<(), AppError> {
    let sales_path = args
        .sales_csv
        .take()
        .unwrap_or_else(|| config.data.sales_csv.clone());
    let trees_path = args
        .street_trees
        .take()
        .unwrap_or_else(|| config.data.street_trees_json.clone());

    let property_sales = sales_from_path(&sales_path)?;
    info!(
        records = property_sales.len(),
        path = %sales_path.display(),
        "loaded property sales export"
    );

    let street_trees = street_trees_from_path(&trees_path)?;
    let statistics = PropertyValueStatistics::new(property_sales, &street_trees)?;
    info!(
        streets = statistics.street_trees().len(),
        path = %trees_path.display(),
        "flattened street tree survey"
    );

    println!(
        "Average property price on streets with tall trees: {:.2}",
        statistics.average_price_tall_trees()
    );
    println!(
        "Average property price on streets with short trees: {:.2}",
        statistics.average_price_short_trees()
    );

    for category in &args.categories {
        println!(
            "Average property price on streets with {category} trees: {:.2}",
            statistics.average_price_for_category(category)
        );
    }

    Ok(())
}
