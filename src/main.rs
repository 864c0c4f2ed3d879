//! Reports, exports, or applies the default artifact cache locations.
//!
//! `status` lists every cache variable with its default path, `env` prints
//! shell `export` lines, and `exec` runs a program with the caches enabled.
//! Settings are read from `ARTIFACT_CACHE_*` environment variables parsed by
//! [`OrthoConfig`](https://github.com/leynos/ortho-config) and may be
//! overridden on the command line. Logging honours `RUST_LOG`.

use std::process::ExitCode;

use artifact_cache::cli::{Cli, run};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::eyre::Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = run(cli).map_err(|err| color_eyre::eyre::eyre!(err))?;
    Ok(code)
}
