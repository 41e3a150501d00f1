// Entry point and high-level CLI flow.
//
// Every render loads and cleans the CSV from scratch, applies the filter
// chosen on the command line and prints one dashboard view:
// - With a subcommand the selected view(s) render once and the program exits.
// - Without one an interactive menu lets the user pick views repeatedly;
//   each pick reloads the file.
mod cleaner;
mod company;
mod couriers;
mod dashboard;
mod error;
mod filter;
mod loader;
mod output;
mod restaurants;
mod types;
mod util;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueHint};
use dashboard::{RenderOptions, View};
use error::{ReportError, ReportResult};
use filter::FilterParams;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Delivery logistics dashboard over a CSV of orders",
    long_about = None
)]
struct Cli {
    /// Delivery dataset to load
    #[arg(short, long, default_value = "train.csv", value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Keep orders placed on or before this day (DD-MM-YYYY); defaults to the latest order
    #[arg(long, value_name = "DD-MM-YYYY")]
    until: Option<String>,

    /// Accepted traffic densities (comma separated or repeated); defaults to all
    #[arg(long, value_delimiter = ',')]
    traffic: Vec<String>,

    /// Rows shown per table
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Export every table of the rendered view as CSV/JSON into this directory
    #[arg(long, value_hint = ValueHint::DirPath)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Order volumes by day, traffic, city and week
    Company,
    /// Courier ratings and delivery speed
    Couriers,
    /// Delivery time and distance by city
    Restaurants,
    /// All three views
    All,
}

impl Command {
    fn views(self) -> Vec<View> {
        match self {
            Command::Company => vec![View::Company],
            Command::Couriers => vec![View::Couriers],
            Command::Restaurants => vec![View::Restaurants],
            Command::All => View::ALL.to_vec(),
        }
    }
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask the user whether to go back to the view selection menu.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to View Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        // EOF behaves like "N".
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn parse_until(cli: &Cli) -> ReportResult<Option<NaiveDate>> {
    cli.until
        .as_deref()
        .map(|s| {
            util::parse_date_dmy(s)
                .map_err(|e| ReportError::InvalidArgument(format!("--until {s:?}: {e}")))
        })
        .transpose()
}

/// One full render: load, clean, filter, aggregate, print.
fn render_view(cli: &Cli, view: View) -> ReportResult<()> {
    let until = parse_until(cli)?;
    let (data, load_report) = loader::load_and_clean(&cli.input)?;
    println!(
        "Processing dataset... ({} rows loaded)",
        util::format_int(load_report.total_rows)
    );
    if let (Some(first), Some(last)) = (load_report.first_date, load_report.last_date) {
        println!("Orders from {} to {}", first.format("%d/%m/%Y"), last.format("%d/%m/%Y"));
    }
    if load_report.missing_traffic > 0 {
        println!(
            "Note: {} rows have no traffic density; pass --traffic NaN to include them.",
            util::format_int(load_report.missing_traffic)
        );
    }
    println!(
        "Info: missing age {}, rating {}, weather {}, city {}, multiple deliveries {}.",
        util::format_int(load_report.missing_age),
        util::format_int(load_report.missing_rating),
        util::format_int(load_report.missing_weather),
        util::format_int(load_report.missing_city),
        util::format_int(load_report.missing_multiple_deliveries)
    );

    let params = FilterParams::resolve(&data, until, &cli.traffic);
    info!(until = %params.until, traffic = ?params.traffic, "filter selected");
    let filtered = filter::apply(&data, &params);
    println!();

    let opts = RenderOptions {
        rows: cli.rows,
        export_dir: cli.export_dir.clone(),
    };
    let written = dashboard::render(view, &filtered, &opts)?;
    for path in written {
        println!("(Exported to {})", path.display());
    }
    Ok(())
}

fn run_menu(cli: &Cli) {
    loop {
        println!("Select Dashboard View:");
        println!("[1] Company");
        println!("[2] Couriers");
        println!("[3] Restaurants\n");
        let Some(choice) = read_choice() else {
            println!("Exiting the program.");
            break;
        };
        let view = match choice.as_str() {
            "1" => View::Company,
            "2" => View::Couriers,
            "3" => View::Restaurants,
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
                continue;
            }
        };
        println!();
        if let Err(e) = render_view(cli, view) {
            error!(error = %e, "render aborted");
            eprintln!("Failed to render view: {}\n", e);
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(command) => {
            for view in command.views() {
                render_view(&cli, view).with_context(|| {
                    format!("rendering {} from {}", view.title(), cli.input.display())
                })?;
            }
        }
        None => run_menu(&cli),
    }
    Ok(())
}
