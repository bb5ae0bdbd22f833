//! ctree core: empirical statistics of context-tree sources.
//!
//! The main entry point for ct-core, handling:
//! - Sequence generation from a context-tree model
//! - Streaming estimation of occurrence and transition probabilities
//! - Log-likelihood of input/response pairs
//! - Model checks

use clap::{Args, Parser, Subcommand};
use ct_common::error::format_error_human;
use ct_common::{Error, OutputFormat, StructuredError, SCHEMA_VERSION};
use ct_config::{load_model, load_settings, LoadedSettings, ResponseAlignment};
use ct_core::exit_codes::ExitCode;
use ct_core::logging::{init_logging, verbosity_filter, LogConfig, LogFormat, Stage};
use ct_core::output::{render, render_estimation};
use ct_core::run::{run_check, run_estimation, run_likelihood, SequenceInput};
use ct_core::sampling::{seeded_rng, MarkovSource};
use ct_core::sequence::read_symbols;
use ct_core::tree::{to_finite_markov, ContextModel};
use std::io::{BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// ctree core - empirical context-tree statistics
#[derive(Parser)]
#[command(name = "ct-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to settings.json
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate occurrence, transition and entropy-rate statistics
    Estimate(EstimateArgs),

    /// Generate a sequence from a model (whitespace-separated symbols)
    Generate(GenerateArgs),

    /// Log-likelihood of a response sequence given an input sequence
    Likelihood(LikelihoodArgs),

    /// Validate a model file and check that its tree is complete
    Check(CheckArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Model file (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Estimate from this sequence file instead of generating one
    #[arg(long)]
    sequence: Option<PathBuf>,

    /// Length of the generated sequence
    #[arg(long)]
    length: Option<usize>,

    /// RNG seed for generation
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Model file (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Number of symbols
    #[arg(long)]
    length: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct LikelihoodArgs {
    /// Model file (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Input sequence file
    #[arg(long)]
    input: PathBuf,

    /// Response sequence file
    #[arg(long)]
    response: PathBuf,

    /// Response alignment: next (default) or same
    #[arg(long)]
    alignment: Option<ResponseAlignment>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Model file (JSON)
    #[arg(long)]
    model: PathBuf,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        verbosity_filter(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    if let Err(e) = init_logging(&log_config) {
        eprintln!("ct-core: logging disabled: {}", e);
    }

    let exit_code = match cli.command {
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
        command => match load_settings(cli.global.settings.as_deref()) {
            Ok(loaded) => {
                debug!(
                    stage = %Stage::Init,
                    source = %loaded.source,
                    path = ?loaded.path,
                    "settings loaded"
                );
                let result = match command {
                    Commands::Estimate(args) => cmd_estimate(&cli.global, &loaded, &args),
                    Commands::Generate(args) => cmd_generate(&loaded, &args),
                    Commands::Likelihood(args) => cmd_likelihood(&cli.global, &loaded, &args),
                    Commands::Check(args) => cmd_check(&cli.global, &loaded, &args),
                    Commands::Version => Ok(()),
                };
                match result {
                    Ok(()) => ExitCode::Clean,
                    Err(e) => output_error(&cli.global, &e),
                }
            }
            Err(e) => output_error(&cli.global, &Error::from(e)),
        },
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn load_context_model(path: &Path) -> Result<ContextModel, Error> {
    let spec = load_model(path)?;
    let model = ContextModel::from_spec(&spec)?;
    info!(
        stage = %Stage::Init,
        model = %path.display(),
        height = model.height(),
        contexts = model.tree().len(),
        "model loaded"
    );
    Ok(model)
}

fn print_payload(text: &str) -> Result<(), Error> {
    debug!(stage = %Stage::Report, bytes = text.len(), "writing report");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", text.trim_end())?;
    Ok(())
}

fn cmd_estimate(
    global: &GlobalOpts,
    loaded: &LoadedSettings,
    args: &EstimateArgs,
) -> Result<(), Error> {
    let model = load_context_model(&args.model)?;
    let mut settings = loaded.settings.clone();
    if let Some(length) = args.length {
        settings.sequence_length = length;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let input = match &args.sequence {
        Some(path) => SequenceInput::Symbols {
            path: path.clone(),
            symbols: read_symbols(path, model.alphabet())?,
        },
        None => SequenceInput::Generate {
            length: settings.sequence_length,
            seed: settings.seed,
        },
    };

    let report = run_estimation(&model, input, &settings)?;
    print_payload(&render_estimation(&report, global.format)?)
}

fn cmd_generate(loaded: &LoadedSettings, args: &GenerateArgs) -> Result<(), Error> {
    let model = load_context_model(&args.model)?;
    let settings = &loaded.settings;
    let length = args.length.unwrap_or(settings.sequence_length);
    if length == 0 {
        return Err(Error::InvalidSequence(
            "sequence length must be positive".to_string(),
        ));
    }
    let seed = args.seed.or(settings.seed);

    let markov = if model.height() > 0 {
        Some(to_finite_markov(&model, settings.max_table_entries)?)
    } else {
        None
    };
    let source = MarkovSource::new(&model, markov.as_ref(), seeded_rng(seed))?;
    info!(stage = %Stage::Sequence, length, seed = ?seed, "generating sequence");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (i, symbol) in source.take(length).enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        out.write_all(model.alphabet().decode(symbol)?.as_bytes())?;
    }
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn cmd_likelihood(
    global: &GlobalOpts,
    loaded: &LoadedSettings,
    args: &LikelihoodArgs,
) -> Result<(), Error> {
    let model = load_context_model(&args.model)?;
    let input = read_symbols(&args.input, model.alphabet())?;
    let response = read_symbols(&args.response, model.alphabet())?;
    let alignment = args
        .alignment
        .unwrap_or(loaded.settings.response_alignment);

    let report = run_likelihood(&model, &input, &response, alignment)?;
    print_payload(&render(&report, global.format)?)
}

fn cmd_check(global: &GlobalOpts, loaded: &LoadedSettings, args: &CheckArgs) -> Result<(), Error> {
    let model = load_context_model(&args.model)?;
    let report = run_check(&model, &loaded.settings)?;
    print_payload(&render(&report, global.format)?)?;
    match report.uncovered_past {
        None => Ok(()),
        Some(past) => Err(Error::IncompleteTree { past }),
    }
}

/// Output an error in the appropriate format on stderr.
fn output_error(global: &GlobalOpts, error: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(error);
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": StructuredError::from(error),
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .unwrap_or_else(|_| StructuredError::from(error).to_json())
            );
        }
        OutputFormat::Summary => {
            eprintln!("error [{}]: {}", error.code(), error);
        }
        OutputFormat::Md => {
            eprintln!(
                "{}",
                format_error_human(error, std::io::stderr().is_terminal())
            );
        }
    }
    exit_code
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "ct_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&version_info).unwrap_or_default()
            );
        }
        _ => {
            println!("ct-core {}", env!("CARGO_PKG_VERSION"));
        }
    }
}
