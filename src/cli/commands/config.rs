//! Config command implementations.

use crate::cli::commands::Context;
use crate::cli::ConfigCommands;
use crate::config::{config_path, save_config_to, Config};
use crate::error::{Error, Result};

/// Execute config commands.
///
/// # Errors
///
/// Returns an error if the config file cannot be located or written.
pub fn execute(command: &ConfigCommands, ctx: &Context) -> Result<()> {
    match command {
        ConfigCommands::Show => show(ctx),
        ConfigCommands::Path => path(ctx.json),
        ConfigCommands::Init { force } => init(*force, ctx.json),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let sync_dir = ctx.sync.as_ref().map(|s| s.layout().root().to_path_buf());

    if ctx.json {
        let output = serde_json::json!({
            "store": ctx.store.path(),
            "sync_dir": sync_dir,
            "config": ctx.config,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Store:        {}", ctx.store.path().display());
    match &sync_dir {
        Some(dir) => println!("Sync dir:     {}", dir.display()),
        None => println!("Sync dir:     (disabled)"),
    }
    println!("Date format:  {}", ctx.config.date_format);
    println!("Auto import:  {}", ctx.config.auto_import);
    let policy = &ctx.config.stability;
    println!(
        "Stability:    {} attempts, {} ms between samples, {} ms between attempts",
        policy.max_attempts, policy.sample_delay_ms, policy.retry_delay_ms
    );
    Ok(())
}

fn path(json: bool) -> Result<()> {
    let path = config_path()?;
    if json {
        let output = serde_json::json!({ "path": path, "exists": path.exists() });
        println!("{output}");
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

fn init(force: bool, json: bool) -> Result<()> {
    let path = config_path()?;
    if path.exists() && !force {
        return Err(Error::InvalidArgument(format!(
            "config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    save_config_to(&Config::default(), &path)?;

    if json {
        let output = serde_json::json!({ "created": path });
        println!("{output}");
    } else {
        println!("Wrote default config to {}", path.display());
    }
    Ok(())
}
