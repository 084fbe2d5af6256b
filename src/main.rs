use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rebindc::config::ValidatorConfig;
use rebindc::diagnostics::{CompileError, Verdict};

#[derive(Parser)]
#[command(name = "rebindc", version, about = "Validate rebind annotations on overriding methods")]
struct Cli {
    /// Path to rebind.toml (defaults to the nearest one above the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every compilation unit of one or more declaration models
    Check {
        /// Declaration model files (JSON), validated as one program
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Validate units one after another instead of in parallel
        #[arg(long)]
        serial: bool,
        /// Print `Line N:` diagnostics even when source text is available
        #[arg(long)]
        plain: bool,
        /// Print all diagnostics to stdout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the rebind contract of every well-formed rebind method as JSON
    Contracts {
        /// Declaration model files (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

const EXIT_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn load_config(path: Option<&Path>) -> Result<ValidatorConfig, CompileError> {
    match path {
        Some(path) => ValidatorConfig::load(path),
        None => {
            let cwd = std::env::current_dir().map_err(|e| CompileError::io(Path::new("."), e))?;
            ValidatorConfig::discover(&cwd)
        }
    }
}

fn check(
    files: &[PathBuf],
    mut config: ValidatorConfig,
    serial: bool,
    plain: bool,
    json: bool,
) -> Result<bool, CompileError> {
    if serial {
        config.validation.parallel = false;
    }
    let mut program = rebindc::model::load_programs(files)?;
    if plain {
        for unit in &mut program.units {
            unit.source = None;
        }
    }
    let report = rebindc::check_program(&program, &config)?;

    if json {
        let out = serde_json::to_string_pretty(&report.diagnostics())
            .map_err(|e| CompileError::model(format!("failed to serialize diagnostics: {e}")))?;
        println!("{out}");
    }

    let color = std::io::stderr().is_terminal();
    eprint!("{}", rebindc::render_report(&program, &report, color));

    let verdicts = report.verdicts();
    let units = verdicts.len();
    let failed = verdicts.iter().filter(|(_, v)| *v == Verdict::Failed).count();
    if failed == 0 {
        eprintln!("rebindc: {units} unit(s) checked, no errors");
    } else {
        eprintln!("rebindc: {failed} of {units} unit(s) failed");
    }
    Ok(report.is_clean())
}

fn contracts(files: &[PathBuf], config: &ValidatorConfig) -> Result<(), CompileError> {
    let program = rebindc::model::load_programs(files)?;
    let contracts = rebindc::contracts_of(&program, config)?;
    let out = serde_json::to_string_pretty(&contracts)
        .map_err(|e| CompileError::model(format!("failed to serialize contracts: {e}")))?;
    println!("{out}");
    Ok(())
}

fn main() -> ExitCode {
    rebindc::tracing_config::init_tracing();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Check { files, serial, plain, json } => {
            match check(&files, config, serial, plain, json) {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::from(EXIT_FAILED),
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        Commands::Contracts { files } => match contracts(&files, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}
