//! anchor - concrete anchor capacity checks from the command line
//!
//! ```text
//! anchor products
//! anchor grade C25/30
//! anchor check HUS4-H-12M-79.9 --gap 1.0 --edge 100 --tension 4 --shear 2
//! anchor batch checks.json --output results.json
//! ```

mod check;
mod units;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anchor_core::catalog::{self, ProductCatalog};
use anchor_core::file_io;
use anchor_core::{
    evaluate_batch, evaluate_product_string, fck_to_grade, grade_to_fck, CapacityResult, CheckOutcome,
    DesignSettings,
};
use anyhow::Context;
use clap::ArgAction;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::check::CheckArgs;
use crate::units::ForceUnit;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Design settings file (coefficients, interaction limit, embedment policy)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Product catalog file replacing the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Force unit for text output and demand flags
    #[arg(long, value_enum, default_value_t, global = true)]
    units: ForceUnit,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// List catalog products with their diameters and grades
    Products,

    /// Convert between a grade label (C25/30) and a cylinder strength (MPa)
    Grade {
        /// Grade label or cylinder strength in MPa
        value: String,
    },

    /// Evaluate one anchor configuration
    Check(Box<CheckArgs>),

    /// Evaluate a JSON file of checks
    Batch {
        /// JSON array of checks
        input: PathBuf,

        /// Write the outcomes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = <Cli as clap::Parser>::parse();
    setup_logging(cli.verbose);

    match cli.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

impl Cli {
    /// Returns `Ok(false)` when a loaded check fails its interaction limit.
    fn run(self) -> anyhow::Result<bool> {
        let settings = self.load_settings()?;
        let custom = self.load_catalog()?;
        let catalog = match &custom {
            Some(custom) => custom,
            None => catalog::builtin(),
        };

        match &self.command {
            Command::Products => {
                self.products(catalog)?;
                Ok(true)
            }
            Command::Grade { value } => {
                self.grade(value)?;
                Ok(true)
            }
            Command::Check(args) => self.check(catalog, args, &settings),
            Command::Batch { input, output } => self.batch(catalog, input, output.as_deref(), &settings),
        }
    }

    fn load_settings(&self) -> anyhow::Result<DesignSettings> {
        match &self.settings {
            Some(path) => file_io::load_settings(path)
                .with_context(|| format!("Failed to load settings from {}", path.display())),
            None => Ok(DesignSettings::default()),
        }
    }

    fn load_catalog(&self) -> anyhow::Result<Option<ProductCatalog>> {
        self.catalog
            .as_deref()
            .map(|path| {
                file_io::load_catalog(path)
                    .with_context(|| format!("Failed to load catalog from {}", path.display()))
            })
            .transpose()
    }

    fn products(&self, catalog: &ProductCatalog) -> anyhow::Result<()> {
        let summaries = catalog.summaries();
        if self.json {
            return print_json(&summaries);
        }

        for summary in &summaries {
            let diameters: Vec<String> = summary.diameters_mm.iter().map(|d| format!("M{d}")).collect();
            let grades: Vec<String> = summary.grades.iter().map(ToString::to_string).collect();
            println!("{} ({}, {})", summary.name, summary.kind, summary.approval);
            println!("  {}", summary.description);
            println!("  Diameters: {}", diameters.join(", "));
            println!("  Grades:    {}", grades.join(", "));
        }
        Ok(())
    }

    fn grade(&self, value: &str) -> anyhow::Result<()> {
        let (label, fck) = match value.trim().parse::<f64>() {
            Ok(fck) => (fck_to_grade(fck)?.to_string(), fck),
            Err(_) => (value.trim().to_string(), grade_to_fck(value)?),
        };

        if self.json {
            return print_json(&serde_json::json!({ "grade": label, "fck_mpa": fck }));
        }
        println!("{label}  f_ck = {fck} MPa");
        Ok(())
    }

    fn check(&self, catalog: &ProductCatalog, args: &CheckArgs, settings: &DesignSettings) -> anyhow::Result<bool> {
        let config = args.configuration();
        let demand = args.demand(self.units);
        let result = evaluate_product_string(catalog, &args.designation, &config, demand, settings)
            .with_context(|| format!("Failed to evaluate {}", args.designation))?;

        if self.json {
            print_json(&result)?;
        } else {
            print!("{}", result.format_report());
            if self.units != ForceUnit::Kn {
                print_resistance_summary(&result, self.units);
            }
        }
        Ok(result.passes().unwrap_or(true))
    }

    fn batch(
        &self,
        catalog: &ProductCatalog,
        input: &Path,
        output: Option<&Path>,
        settings: &DesignSettings,
    ) -> anyhow::Result<bool> {
        let checks = file_io::load_checks(input)
            .with_context(|| format!("Failed to load checks from {}", input.display()))?;
        let outcomes = evaluate_batch(catalog, &checks, settings);

        if let Some(path) = output {
            file_io::save_results(&outcomes, path)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
        } else if self.json {
            print_json(&outcomes)?;
        }

        if output.is_some() || !self.json {
            print_batch_table(&outcomes, self.units);
        }
        Ok(outcomes.iter().all(CheckOutcome::is_ok))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_resistance_summary(result: &CapacityResult, unit: ForceUnit) {
    let show = |kn: Option<f64>| match kn {
        Some(kn) => unit.format(kn).to_string(),
        None => "unbounded".to_string(),
    };
    println!(
        "Design resistance: N_Rd = {}, V_Rd = {}",
        show(result.tension_capacity_kn()),
        show(result.shear_capacity_kn())
    );
}

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_batch_table(outcomes: &[CheckOutcome], unit: ForceUnit) {
    println!("{:<16} {:<14} {:>14} {:>14} {:>8}", "Label", "Product", "N_Rd", "V_Rd", "Util.");
    for outcome in outcomes {
        match (&outcome.result, &outcome.error) {
            (Some(result), _) => {
                let show = |kn: Option<f64>| kn.map_or_else(|| "-".to_string(), |kn| unit.format(kn).to_string());
                let utilization = result
                    .interaction
                    .map_or_else(|| "-".to_string(), |check| format!("{:.3}", check.utilization));
                println!(
                    "{:<16} {:<14} {:>14} {:>14} {:>8} {}",
                    outcome.label,
                    outcome.product,
                    show(result.tension_capacity_kn()),
                    show(result.shear_capacity_kn()),
                    utilization,
                    status_icon(outcome.is_ok())
                );
            }
            (None, Some(error)) => {
                println!(
                    "{:<16} {:<14} {} [{}] {}",
                    outcome.label,
                    outcome.product,
                    status_icon(false),
                    error.error_code(),
                    error
                );
            }
            (None, None) => {}
        }
    }
}
