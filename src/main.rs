use bumuk::api::{ProjectionArgs, build_compute_response, build_input, run_http_server};
use bumuk::core::{CurrencyFormatter, Projection, RupiahFormatter, Session};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bumuk",
    about = "Retirement savings projection: monthly compounding plus the 4% rule"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the calculator page and JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print a projection table to stdout
    Project {
        #[command(flatten)]
        args: ProjectionArgs,
        #[arg(long, help = "Print the API response body instead of a table")]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project { args, json } => {
            let mut session = Session::new();
            let projection = match session.compute(build_input(&args)) {
                Ok(projection) => projection,
                Err(e) => {
                    eprintln!("Projection error: {e}");
                    std::process::exit(1);
                }
            };

            if json {
                let response = build_compute_response(projection, args.end_year, &RupiahFormatter);
                match serde_json::to_string_pretty(&response) {
                    Ok(body) => println!("{body}"),
                    Err(e) => {
                        eprintln!("Serialization error: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print_report(projection, &RupiahFormatter);
            }
        }
    }
}

fn print_report(projection: &Projection, formatter: &impl CurrencyFormatter) {
    let input = &projection.input;
    let summary = &projection.summary;

    println!(
        "Projection {} -> {} ({:.2}% yearly, {} monthly deposit)",
        input.start_year,
        input.end_year,
        input.annual_interest_rate_percent,
        formatter.format(input.monthly_deposit)
    );
    println!("{:>6} {:>24}", "Year", "Balance");
    println!("{}", "-".repeat(31));
    for row in projection.trajectory.rows() {
        println!("{:>6} {:>24}", row.year, formatter.format(row.balance));
    }

    println!();
    println!(
        "Without interest: {} ({})",
        formatter.format(summary.no_interest_balance),
        summary.percent_uplift
    );
    println!(
        "4% rule from {}: {} per month, {} per year",
        input.end_year,
        formatter.format(summary.monthly_withdrawal),
        formatter.format(summary.annual_withdrawal)
    );
}
