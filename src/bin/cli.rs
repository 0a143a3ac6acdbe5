//! Command-line interface for rheos
//!
//! # Usage
//!
//! ```bash
//! # List the standard models
//! rheos models
//!
//! # Show the moduli of a model, optionally from a JSON definition
//! rheos describe maxwell
//! rheos describe --file my_model.json
//!
//! # Evaluate all moduli at a few points
//! rheos eval maxwell -p eta=2 -p k=1 --at 0,0.5,1
//!
//! # Print a stored record
//! rheos load record.json
//!
//! # Predict the response to a stored loading history
//! rheos predict maxwell -p eta=2 -p k=1 --data strain.json --output stress.json
//! ```
//!
//! Set `RUST_LOG=debug` to trace binding and file access.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rheos::{
    info::{class_details, class_table, evaluation_table},
    io::{load_frequency_series, load_model, load_time_series, save_time_series},
    model::{catalog, lookup, ModelClass},
    model::values::{ParameterAssignment, ParameterValues},
    predict::predict,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the models of the standard catalog
    Models,
    /// Show the moduli, constraint and lineage of a model
    Describe {
        #[command(flatten)]
        model: ModelArgs,

        /// Parameters to freeze before describing
        #[arg(short, long = "freeze")]
        frozen: Vec<ParameterAssignment>,
    },
    /// Evaluate every available modulus of a bound model
    Eval {
        #[command(flatten)]
        model: ModelArgs,

        /// Parameter values as name=value
        #[arg(short, long = "param")]
        params: Vec<ParameterAssignment>,

        /// Times or angular frequencies to evaluate at
        #[arg(long, value_delimiter = ',', required = true)]
        at: Vec<f64>,
    },
    /// Print a record stored as JSON
    Load {
        path: PathBuf,

        /// Read a frequency series instead of a time series
        #[arg(long)]
        frequency: bool,
    },
    /// Predict the missing stress or strain of a stored record
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        /// Parameter values as name=value
        #[arg(short, long = "param")]
        params: Vec<ParameterAssignment>,

        /// Record holding only strain or only stress
        #[arg(short, long)]
        data: PathBuf,

        /// Where to save the prediction, printed if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ModelArgs {
    /// Name of a catalog model
    #[arg(required_unless_present = "file")]
    name: Option<String>,

    /// JSON model definition to use instead of a catalog model
    #[arg(long, conflicts_with = "name")]
    file: Option<PathBuf>,
}

impl ModelArgs {
    fn resolve(&self) -> Result<ModelClass, Box<dyn std::error::Error>> {
        match (&self.file, &self.name) {
            (Some(path), _) => Ok(load_model(path)?),
            (None, Some(name)) => Ok(lookup(name)?.clone()),
            (None, None) => Err("either a model name or --file is required".into()),
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Models => {
            println!("{}", class_table(catalog()));
        }
        Commands::Describe { model, frozen } => {
            let mut class = model.resolve()?;
            if !frozen.is_empty() {
                class = class.freeze(&frozen.into_iter().collect::<ParameterValues>())?;
            }
            println!("{}", class_details(&class));
        }
        Commands::Eval { model, params, at } => {
            let class = model.resolve()?;
            let instance = class.bind(&params.into_iter().collect::<ParameterValues>())?;
            if !instance.constraint_holds() {
                eprintln!(
                    "{}: parameters violate the constraint '{}'",
                    "Warning".bold().yellow(),
                    class.constraint()
                );
            }
            let points: Vec<_> = at.into_iter().map(|x| x as rheos::precision::Real).collect();
            println!("{}", instance.describe());
            println!("{}", evaluation_table(&instance, &points));
        }
        Commands::Load { path, frequency } => {
            if frequency {
                println!("{}", load_frequency_series(path)?);
            } else {
                println!("{}", load_time_series(path)?);
            }
        }
        Commands::Predict {
            model,
            params,
            data,
            output,
        } => {
            let class = model.resolve()?;
            let instance = class.bind(&params.into_iter().collect::<ParameterValues>())?;
            let record = load_time_series(data)?;
            let predicted = predict(&instance, &record)?;

            match output {
                Some(path) => {
                    save_time_series(&path, &predicted)?;
                    println!("{} {}", "Saved".bold().green(), path.display());
                }
                None => println!("{}", predicted),
            }
        }
    }

    Ok(())
}

pub fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("{}: {}", "Error".bold().red(), error);
        std::process::exit(1);
    }
}
