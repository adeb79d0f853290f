//! Command implementations.

pub mod completions;
pub mod config;
pub mod record;
pub mod report;
pub mod sync;

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{load_config, resolve_store_path, resolve_sync_dir, Config};
use crate::error::{Error, Result};
use crate::storage::RecordStore;
use crate::sync::SyncProtocol;

/// Everything a command needs, resolved once from flags, env and config.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub store: RecordStore,
    /// `None` when no sync folder is configured or `--no-sync` is set.
    pub sync: Option<SyncProtocol>,
    pub json: bool,
}

impl Context {
    /// Resolve the context for this invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or no store
    /// location can be determined.
    pub fn resolve(cli: &Cli, json: bool) -> Result<Self> {
        let config = load_config()?;
        Self::from_config(cli, config, json)
    }

    /// Resolve against an already-loaded config.
    ///
    /// # Errors
    ///
    /// Returns an error if no store location can be determined.
    pub fn from_config(cli: &Cli, config: Config, json: bool) -> Result<Self> {
        let store_path: PathBuf = resolve_store_path(cli.store.as_deref(), &config)
            .ok_or_else(|| Error::Config("Could not determine store location".into()))?;

        let sync = resolve_sync_dir(cli.sync_dir.as_deref(), &config)
            .filter(|_| !cli.no_sync)
            .map(|dir| SyncProtocol::new(&store_path, dir).with_policy(config.stability));

        Ok(Self {
            config,
            store: RecordStore::new(store_path),
            sync,
            json,
        })
    }

    /// The sync protocol, or [`Error::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns an error when sync is not configured.
    pub fn require_sync(&self) -> Result<&SyncProtocol> {
        self.sync.as_ref().ok_or(Error::NotConfigured)
    }
}
