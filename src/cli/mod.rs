//! Command-line front end for inspecting and applying the library defaults.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command as ChildCommand, ExitCode, ExitStatus};

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use serde::Serialize;

use crate::cache::{SwitchableCache, with_enabled};
use crate::config::CacheEnvCfg;
use crate::env::process_env;
use crate::error::{CommandError, Result};
use crate::libraries::{Library, aggregate_for};
use crate::location::CentralLocation;
use crate::observability::LOG_TARGET;

#[cfg(test)]
mod tests;

/// Redirects where machine-learning libraries store downloaded artifacts.
#[derive(Debug, Parser)]
#[command(name = "artifact-cache", version, about)]
pub struct Cli {
    /// Root directory every default cache path is nested under.
    #[arg(long, global = true, value_name = "PATH")]
    pub central_location: Option<Utf8PathBuf>,
    /// Do not create cache directories when enabling caches.
    #[arg(long, global = true)]
    pub no_create: bool,
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `artifact-cache` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every cache variable, its default path, and whether it is active.
    Status {
        /// Libraries to report; all of them when omitted.
        #[arg(value_enum)]
        libraries: Vec<Library>,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print shell `export` lines that enable the caches.
    Env {
        /// Libraries to export; all of them when omitted.
        #[arg(value_enum)]
        libraries: Vec<Library>,
    },
    /// Run a program with the caches enabled, disabling them afterwards.
    Exec {
        /// Library whose cache to enable; repeatable, all of them when omitted.
        #[arg(short, long = "library", value_enum)]
        libraries: Vec<Library>,
        /// Program and arguments, given after `--`.
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<OsString>,
    },
}

/// One environment-backed cache as reported by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    /// Library the cache belongs to.
    pub library: Library,
    /// Member name within the library.
    pub member: &'static str,
    /// Controlling environment variable.
    pub variable: String,
    /// Default cache path.
    pub path: Utf8PathBuf,
    /// Whether the variable currently points at the path.
    pub enabled: bool,
}

/// Executes the parsed command line against the process environment.
///
/// # Errors
/// Returns an error when configuration cannot be loaded, output cannot be
/// written, caches cannot be enabled, or the child program cannot be run.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let cfg = CacheEnvCfg::load()?.with_overrides(cli.central_location, cli.no_create);
    let location = cfg.to_location(process_env());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Status { libraries, json } => {
            write_status(&mut out, &statuses(&libraries, &location), json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Env { libraries } => {
            write_exports(&mut out, &statuses(&libraries, &location))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Exec { libraries, command } => {
            drop(out);
            exec(&libraries, &location, &command)
        }
    }
}

/// Collects the status of every environment-backed cache of `libraries`.
/// An empty selection covers [`Library::TOP_LEVEL`].
#[must_use]
pub fn statuses(libraries: &[Library], location: &CentralLocation) -> Vec<CacheStatus> {
    let selected: &[Library] = if libraries.is_empty() {
        &Library::TOP_LEVEL
    } else {
        libraries
    };
    selected
        .iter()
        .flat_map(|library| library.entries(location))
        .map(|entry| CacheStatus {
            library: entry.library,
            member: entry.member,
            variable: entry.cache.variable().to_owned(),
            path: entry.cache.path(),
            enabled: entry.cache.is_enabled(),
        })
        .collect()
}

fn write_status(out: &mut impl Write, rows: &[CacheStatus], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows).map_err(io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<13} {:<15} {:<18} {:<8} PATH",
        "LIBRARY", "MEMBER", "VARIABLE", "STATE"
    )?;
    for row in rows {
        let state = if row.enabled { "enabled" } else { "disabled" };
        writeln!(
            out,
            "{:<13} {:<15} {:<18} {:<8} {}",
            row.library.name(),
            row.member,
            row.variable,
            state,
            row.path
        )?;
    }
    Ok(())
}

fn write_exports(out: &mut impl Write, rows: &[CacheStatus]) -> Result<()> {
    for row in rows {
        writeln!(
            out,
            "export {}={}",
            row.variable,
            shell_quote(row.path.as_str())
        )?;
    }
    Ok(())
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Runs `command` with the caches of `libraries` enabled beneath `location`
/// and returns the child's exit code. The caches are disabled again once the
/// child exits.
///
/// # Errors
/// Returns an error when `command` is empty, a cache cannot be enabled, or
/// the program cannot be started.
pub fn exec(
    libraries: &[Library],
    location: &CentralLocation,
    command: &[OsString],
) -> Result<ExitCode> {
    let Some((program, args)) = command.split_first() else {
        return Err(CommandError::from(eyre!("no command given")).into());
    };
    let aggregate = aggregate_for(libraries, location);
    let status = with_enabled(&aggregate, |caches| {
        tracing::debug!(
            target: LOG_TARGET,
            enabled = caches.is_enabled(),
            "running command with caches"
        );
        ChildCommand::new(program).args(args).status()
    })?
    .wrap_err_with(|| format!("run {}", program.to_string_lossy()))
    .map_err(CommandError::from)?;
    Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from)
}
