use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use error_stack::{Report, ResultExt};
use itertools::Itertools;
use tracing::info;

use plantsin::de::ReadSettings;
use plantsin::files::{self, FileError, FileResult, DEFAULT_INPUT, DEFAULT_OUTPUT};
use plantsin::validate::validate;

#[derive(Parser)]
#[command(name = "plantsin", about = "Check and rewrite SOILCO2/AgroC plants.in files")]
struct Cli {
    /// Accept short tables and one-column rows, padding them with zeros
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report its structure and any implausible values
    Check {
        #[arg(default_value = DEFAULT_INPUT)]
        file: PathBuf,
    },
    /// Load a file and write it back in the canonical layout
    Rewrite {
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,
        #[arg(default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Change the number of rows of one table; new rows are `0 0`
    Resize {
        file: PathBuf,
        /// Table number, 1 to 17
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=17))]
        table: u8,
        #[arg(long)]
        rows: usize,
        /// Plant type number, starting at 1
        #[arg(long, default_value_t = 1)]
        plant_type: usize,
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = ReadSettings::default()
        .strict_tables(!cli.lenient)
        .strict_cells(!cli.lenient);

    let result = match cli.command {
        Commands::Check { file } => check(&file, settings),
        Commands::Rewrite { input, output } => rewrite(&input, &output, settings),
        Commands::Resize { file, table, rows, plant_type, output } => {
            resize(&file, usize::from(table), rows, plant_type, &output, settings)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn check(file: &Path, settings: ReadSettings) -> FileResult<()> {
    let record = files::load_custom(file, settings)?;

    println!("{}: version {}, {} plant type(s)", file.display(), record.version, record.num_plant_types());
    for (i, plant) in record.plant_types.iter().enumerate() {
        println!("  {}. {} (table rows: {})", i + 1, plant.name, plant.table_row_counts.iter().join(" "));
    }

    let issues = validate(&record);
    if issues.is_empty() {
        println!("no issues found");
    } else {
        println!("{} issue(s):", issues.len());
        for issue in issues {
            println!("  {issue}");
        }
    }
    Ok(())
}

fn rewrite(input: &Path, output: &Path, settings: ReadSettings) -> FileResult<()> {
    let record = files::load_custom(input, settings)?;
    files::save(&record, output)
}

fn resize(file: &Path, table: usize, rows: usize, plant_type: usize, output: &Path, settings: ReadSettings) -> FileResult<()> {
    let mut record = files::load_custom(file, settings)?;
    let n_types = record.num_plant_types();

    let plant = record.plant_type_mut(plant_type)
        .ok_or_else(|| Report::new(FileError::Format))
        .attach_printable_lazy(|| format!("plant type {plant_type} does not exist, the file has {n_types}"))?;

    let old = plant.table_row_counts[table - 1];
    plant.resize_table(table - 1, rows);
    info!(plant_type, table, old, new = rows, "resized table");

    files::save(&record, output)
}
