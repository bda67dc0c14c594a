//! Metals dashboard CLI
//!
//! Usage:
//!   metals-dashboard fields --metal Gold
//!   metals-dashboard view --metal All --field Close --start 2020-01-01
//!   metals-dashboard forecast --metal Silver --years 2 --json
//!   metals-dashboard export --metal Gold --output gold.csv

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metals_dashboard::report::{render_correlation, render_outcome, render_view};
use metals_dashboard::{Dashboard, DashboardConfig, MetalChoice, Selection};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "metals-dashboard", version)]
#[command(about = "Explore and forecast Gold, Platinum and Silver prices")]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the price fields available for a metal
    Fields {
        #[arg(long, default_value = "Gold")]
        metal: MetalChoice,
    },
    /// Trend, distribution, moving average and forecast panels
    View(SelectionArgs),
    /// Forecast panel only
    Forecast(SelectionArgs),
    /// Correlation matrix across every metal
    Correlate(SelectionArgs),
    /// Write the filtered data table as CSV
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file; the configured export path when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// Gold, Platinum, Silver or All
    #[arg(long, default_value = "Gold")]
    metal: MetalChoice,
    /// Price field such as Close
    #[arg(long)]
    field: Option<String>,
    /// First date of the range (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last date of the range (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Moving average window, 1 to 30
    #[arg(long)]
    window: Option<usize>,
    /// Forecast length in years, 1 to 5
    #[arg(long)]
    years: Option<usize>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl SelectionArgs {
    fn to_selection(&self, dashboard: &Dashboard) -> Selection {
        let mut selection = dashboard
            .selection(self.metal.clone())
            .with_range(self.start, self.end);
        if let Some(field) = &self.field {
            selection = selection.with_field(field.clone());
        }
        if let Some(window) = self.window {
            selection = selection.with_window(window);
        }
        if let Some(years) = self.years {
            selection = selection.with_forecast_years(years);
        }
        selection
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metals_dashboard=info,metal_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let dashboard = Dashboard::from_config(config).context("loading price data")?;

    match cli.command {
        Commands::Fields { metal } => {
            for field in dashboard.fields(&metal)? {
                println!("{}", field);
            }
        }
        Commands::View(args) => {
            let view = dashboard.evaluate(&args.to_selection(&dashboard))?;
            if args.json {
                println!("{}", view.to_json()?);
            } else {
                print!("{}", render_view(&view));
            }
        }
        Commands::Forecast(args) => {
            let view = dashboard.evaluate(&args.to_selection(&dashboard))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view.forecast)?);
            } else {
                print!("{}", render_outcome(&view.forecast));
            }
        }
        Commands::Correlate(args) => {
            let selection = args.to_selection(&dashboard);
            let selection = Selection {
                metal: MetalChoice::All,
                ..selection
            };
            let view = dashboard.evaluate(&selection)?;
            if let Some(matrix) = &view.correlation {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(matrix)?);
                } else {
                    print!("{}", render_correlation(matrix));
                }
            }
        }
        Commands::Export { selection, output } => {
            let view = dashboard.evaluate(&selection.to_selection(&dashboard))?;
            let path = output.unwrap_or_else(|| dashboard.config().export_path.clone());
            dashboard.export(&view, &path)?;
            info!(path = %path.display(), rows = view.table.len(), "export finished");
            println!("Wrote {} rows to {}", view.table.len(), path.display());
        }
    }

    Ok(())
}
