pub mod cli;
pub mod commands;
pub mod config;
pub mod csv;
pub mod datastore;
pub mod datetime;
pub mod model;
pub mod render;
pub mod stats;

use std::ffi::OsString;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let pre = cli::preprocess_args(&raw_args)?;
    let cli = cli::GlobalCli::parse_from(pre.cleaned_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting rentbook CLI");
    debug!(?pre.rc_overrides, "preprocessed rc overrides");

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(
        pre.rc_overrides
            .into_iter()
            .chain(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value))),
    );

    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let mut store = datastore::DataStore::open(&data_dir)
        .with_context(|| format!("failed to open datastore at {}", data_dir.display()))?;

    let settings = store.load_settings()?;
    let mut renderer = render::Renderer::new(&cfg, &settings)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            let name = cfg
                .get("default.command")
                .unwrap_or_else(|| "overview".to_string());
            debug!(command = %name, "no explicit command, using default");
            cli::default_command(&name)
                .ok_or_else(|| anyhow!("unknown default.command: {name}"))?
        }
    };

    commands::dispatch(&mut store, &mut renderer, command)?;

    info!("done");
    Ok(())
}
