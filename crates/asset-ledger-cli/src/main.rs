// crates/asset-ledger-cli/src/main.rs
// ============================================================================
// Module: Asset Ledger CLI Entry Point
// Description: Command dispatcher for ledger initialization, invokes, and queries.
// Purpose: Expose the asset ledger operations to operators and scripts.
// Dependencies: clap, asset-ledger-config, asset-ledger-core, asset-ledger-store-sqlite, thiserror.
// ============================================================================

//! ## Overview
//! The asset ledger CLI loads `asset-ledger.toml`, wires the configured engine
//! and audit sink, and runs one ledger operation per process. Payload bytes go
//! to stdout; failures go to stderr with a failure exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use asset_ledger_config::AssetLedgerConfig;
use asset_ledger_config::AuditSinkType;
use asset_ledger_config::StoreType;
use asset_ledger_core::AssetLedger;
use asset_ledger_core::FileAuditSink;
use asset_ledger_core::INVOKE_FUNCTIONS;
use asset_ledger_core::InMemoryLedgerEngine;
use asset_ledger_core::LedgerAuditSink;
use asset_ledger_core::LedgerEngine;
use asset_ledger_core::LedgerError;
use asset_ledger_core::NoopAuditSink;
use asset_ledger_core::QUERY_FUNCTIONS;
use asset_ledger_core::SchemaCatalog;
use asset_ledger_core::StderrAuditSink;
use asset_ledger_core::TableStore;
use asset_ledger_store_sqlite::SqliteLedgerEngine;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "asset-ledger", disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to asset-ledger.toml or `ASSET_LEDGER_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reset every ledger table and write the version marker.
    Init,
    /// Run a named invoke function (may write).
    Invoke(FunctionCommand),
    /// Run a named query function (read-only).
    Query(FunctionCommand),
    /// Print the stored version marker.
    Version,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for invoke and query commands.
#[derive(Args, Debug)]
struct FunctionCommand {
    /// Function name.
    function: String,
    /// Positional string arguments passed to the function.
    args: Vec<String>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
}

/// CLI error wrapper for operator-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
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
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = AssetLedgerConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;

    match cli.command {
        Commands::Init => command_init(&config),
        Commands::Invoke(command) => command_invoke(&config, &command),
        Commands::Query(command) => command_query(&config, &command),
        Commands::Version => command_version(&config),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => {
            write_stdout_line("config ok").map_err(|err| output_error("stdout", &err))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the init command.
fn command_init(config: &AssetLedgerConfig) -> CliResult<ExitCode> {
    let ledger = build_ledger(config)?;
    if config.store.store_type != StoreType::Memory {
        ledger
            .initialize()
            .map_err(|err| CliError::new(format!("initialization failed: {err}")))?;
    }
    write_stdout_line(&format!("ledger initialized (version {})", config.ledger.app_version))
        .map_err(|err| output_error("stdout", &err))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the invoke command.
fn command_invoke(config: &AssetLedgerConfig, command: &FunctionCommand) -> CliResult<ExitCode> {
    let ledger = build_ledger(config)?;
    let payload = ledger
        .invoke(&command.function, &command.args)
        .map_err(|err| function_error(&command.function, INVOKE_FUNCTIONS, &err))?;
    write_stdout_bytes_with_newline(&payload).map_err(|err| output_error("stdout", &err))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the query command.
fn command_query(config: &AssetLedgerConfig, command: &FunctionCommand) -> CliResult<ExitCode> {
    let ledger = build_ledger(config)?;
    let payload = ledger
        .query(&command.function, &command.args)
        .map_err(|err| function_error(&command.function, QUERY_FUNCTIONS, &err))?;
    write_stdout_bytes_with_newline(&payload).map_err(|err| output_error("stdout", &err))?;
    Ok(ExitCode::SUCCESS)
}

/// Formats a failed function call, listing the registered names when the
/// function is unknown.
fn function_error(function: &str, registered: &[&str], err: &LedgerError) -> CliError {
    match err {
        LedgerError::UnknownFunction {
            ..
        } => CliError::new(format!(
            "{function} failed: {err} (expected one of: {})",
            registered.join(", ")
        )),
        _ => CliError::new(format!("{function} failed: {err}")),
    }
}

/// Executes the version command.
fn command_version(config: &AssetLedgerConfig) -> CliResult<ExitCode> {
    let ledger = build_ledger(config)?;
    let version = ledger
        .version()
        .map_err(|err| CliError::new(format!("failed to read version marker: {err}")))?;
    let Some(version) = version else {
        return Err(CliError::new("ledger is not initialized".to_string()));
    };
    write_stdout_line(&version).map_err(|err| output_error("stdout", &err))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Builds the ledger described by the configuration.
///
/// A memory-backed ledger holds nothing between processes, so it is
/// initialized on every build.
fn build_ledger(config: &AssetLedgerConfig) -> CliResult<AssetLedger> {
    let store = TableStore::new(build_engine(config)?, SchemaCatalog::asset_ledger())
        .with_max_rows_per_scan(config.scan.max_rows_per_scan)
        .with_audit(build_audit_sink(config)?);
    let ledger = AssetLedger::new(store)
        .with_history_policy(config.history.policy())
        .with_app_version(config.ledger.app_version);
    if config.store.store_type == StoreType::Memory {
        ledger
            .initialize()
            .map_err(|err| CliError::new(format!("initialization failed: {err}")))?;
    }
    Ok(ledger)
}

/// Opens the configured ledger engine.
fn build_engine(config: &AssetLedgerConfig) -> CliResult<Arc<dyn LedgerEngine>> {
    match config.store.sqlite_config() {
        Some(sqlite) => {
            let engine = SqliteLedgerEngine::new(sqlite)
                .map_err(|err| CliError::new(format!("failed to open ledger store: {err}")))?;
            Ok(Arc::new(engine))
        }
        None => Ok(Arc::new(InMemoryLedgerEngine::new())),
    }
}

/// Opens the configured audit sink.
fn build_audit_sink(config: &AssetLedgerConfig) -> CliResult<Arc<dyn LedgerAuditSink>> {
    match (config.audit.sink, &config.audit.path) {
        (AuditSinkType::File, Some(path)) => {
            let sink = FileAuditSink::new(path)
                .map_err(|err| CliError::new(format!("failed to open audit log: {err}")))?;
            Ok(Arc::new(sink))
        }
        (AuditSinkType::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        _ => Ok(Arc::new(NoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes raw bytes followed by a newline to stdout.
fn write_stdout_bytes_with_newline(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)?;
    stdout.write_all(b"\n")
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::new(format!("failed to write to {stream}: {error}"))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
