// sqlprobe-cli/src/main.rs
// ============================================================================
// Module: SQL Probe CLI Entry Point
// Description: Command dispatcher for probe runs and configuration tooling.
// Purpose: Trigger verification runs against a SQLite store from a terminal.
// Dependencies: clap, sqlprobe-config, sqlprobe-core, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The SQL Probe CLI loads `sqlprobe.toml`, opens the configured store, and
//! runs the verification pipeline. Each run prints exactly one
//! `RESULT: <text>` line on stdout; structured events go to the configured
//! sink. With `--repeat` the operator is asked on stdin before every further
//! run. All user-facing strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use sqlprobe_cli::i18n::Locale;
use sqlprobe_cli::repeat::NextStep;
use sqlprobe_cli::repeat::RepeatPlan;
use sqlprobe_cli::repeat::confirms_repeat;
use sqlprobe_cli::t;
use sqlprobe_config::EventSinkKind;
use sqlprobe_config::LoggingConfig;
use sqlprobe_config::SqlProbeConfig;
use sqlprobe_config::config_toml_example;
use sqlprobe_core::FileEventSink;
use sqlprobe_core::HarnessEventSink;
use sqlprobe_core::MAX_CHAR_COUNT;
use sqlprobe_core::MAX_RECORD_COUNT;
use sqlprobe_core::NoopEventSink;
use sqlprobe_core::StderrEventSink;
use sqlprobe_core::generate_values;
use sqlprobe_core::record_id;
use sqlprobe_core::run_and_report;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum total characters the `values` command will generate.
const MAX_VALUES_TOTAL_CHARS: usize = 64 * 1024 * 1024;
/// Number of trailing characters shown per value by the `values` command.
const VALUE_TAIL_CHARS: usize = 12;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "SQLPROBE_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "sqlprobe", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `SQLPROBE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output languages accepted by `--lang`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LangArg {
    /// English.
    En,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the verification pipeline against the configured store.
    Run(RunCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print statistics for generated test values.
    Values(ValuesCommand),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to `sqlprobe.toml` or `SQLPROBE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Ask on stdin before every further run.
    #[arg(long, conflicts_with = "iterations")]
    repeat: bool,
    /// Total number of runs to perform without asking.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    iterations: Option<u32>,
    /// Discard structured events regardless of `[logging]`.
    #[arg(long)]
    quiet_events: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
    /// Print an example config with every default spelled out.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to `sqlprobe.toml` or `SQLPROBE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `values`.
#[derive(Args, Debug)]
struct ValuesCommand {
    /// Characters per value.
    #[arg(long, value_name = "N")]
    chars: usize,
    /// Number of values.
    #[arg(long, value_name = "M")]
    records: usize,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    resolve_locale(cli.lang, env_lang.as_deref())?;

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(command).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Values(command) => command_values(&command),
    }
}

/// Resolves the output locale from `--lang` or the environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(LangArg::En) = lang {
        return Ok(Locale::En);
    }
    match env_lang {
        None => Ok(Locale::En),
        Some(value) => Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        }),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes probe runs until the repeat plan stops.
///
/// The exit code reflects the last run.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = SqlProbeConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let sink = build_event_sink(&config.logging, command.quiet_events)?;
    let opener = config.store.sqlite_opener();
    let options = config.store.open_options();
    let mut plan = RepeatPlan::from_flags(command.repeat, command.iterations);

    loop {
        let mut write_error: Option<std::io::Error> = None;
        let mut reporter = |text: &str| {
            if let Err(err) = write_stdout_line(&t!("run.result", text = text)) {
                write_error = Some(err);
            }
        };
        let outcome =
            run_and_report(&opener, &options, &config.harness, sink.as_ref(), &mut reporter)
                .await;
        if let Some(err) = write_error {
            return Err(CliError::new(output_error("stdout", &err)));
        }

        let again = match plan.advance() {
            NextStep::Stop => false,
            NextStep::Continue => true,
            NextStep::Confirm => confirm_repeat().await?,
        };
        if !again {
            return Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
    }
}

/// Builds the event sink selected by `[logging]`.
fn build_event_sink(logging: &LoggingConfig, quiet: bool) -> CliResult<Box<dyn HarnessEventSink>> {
    if quiet {
        return Ok(Box::new(NoopEventSink));
    }
    match logging.sink {
        EventSinkKind::Stderr => Ok(Box::new(StderrEventSink)),
        EventSinkKind::None => Ok(Box::new(NoopEventSink)),
        EventSinkKind::File => {
            let path = logging
                .path
                .as_deref()
                .ok_or_else(|| CliError::new(t!("logging.path_missing")))?;
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(t!("logging.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
    }
}

/// Prompts on stderr and reads one reply from stdin.
///
/// End of input counts as a refusal.
async fn confirm_repeat() -> CliResult<bool> {
    write_stderr_line(&t!("run.repeat.prompt"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let read = tokio::task::spawn_blocking(|| {
        let mut reply = String::new();
        std::io::stdin().read_line(&mut reply).map(|bytes| (bytes, reply))
    })
    .await
    .map_err(|err| CliError::new(t!("run.repeat.read_failed", error = err)))?;
    let (bytes, reply) =
        read.map_err(|err| CliError::new(t!("run.repeat.read_failed", error = err)))?;
    Ok(bytes > 0 && confirms_repeat(&reply))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = SqlProbeConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Values Command
// ============================================================================

/// Prints a summary of the values a populate phase would insert.
fn command_values(command: &ValuesCommand) -> CliResult<ExitCode> {
    for line in values_report(command.chars, command.records)? {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders the summary line plus the first and last generated values.
fn values_report(chars: usize, records: usize) -> CliResult<Vec<String>> {
    chars
        .checked_mul(records)
        .filter(|requested| {
            *requested <= MAX_VALUES_TOTAL_CHARS
                && chars <= MAX_CHAR_COUNT
                && records <= MAX_RECORD_COUNT
        })
        .ok_or_else(|| {
            CliError::new(t!(
                "values.too_large",
                records = records,
                chars = chars,
                limit = MAX_VALUES_TOTAL_CHARS
            ))
        })?;
    let values = generate_values(chars, records);
    let total: usize = values.iter().map(String::len).sum();
    let mut lines = vec![t!("values.summary", records = records, chars = chars, total = total)];
    let first = values.first().map(|value| (0, value));
    let last = values.len().checked_sub(1).filter(|index| *index > 0).zip(values.last());
    for (index, value) in first.into_iter().chain(last) {
        let tail = value.get(value.len().saturating_sub(VALUE_TAIL_CHARS) ..).unwrap_or(value);
        let id = record_id(index).map_or_else(|| "-".to_string(), |id| id.to_string());
        lines.push(t!("values.entry", index = index, id = id, len = value.len(), tail = tail));
    }
    Ok(lines)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
