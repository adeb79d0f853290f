//! Record command implementations (add, edit, rm, list).
//!
//! Every successful mutation is followed by a best-effort export so the
//! cloud folder always carries the latest local state.

use crate::cli::commands::Context;
use crate::cli::RecordArgs;
use crate::error::{Error, Result};
use crate::model::{Record, DELIMITER};

/// Reject field text that would corrupt the line format.
fn check_field(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{name} must not be empty")));
    }
    if value.contains(DELIMITER) || value.contains(['\n', '\r']) {
        return Err(Error::InvalidArgument(format!(
            "{name} contains the delimiter '{DELIMITER}' or a line break"
        )));
    }
    Ok(())
}

fn record_from(args: &RecordArgs) -> Result<Record> {
    check_field("date", &args.date)?;
    check_field("weight", &args.weight)?;
    check_field("calorie", &args.calorie)?;
    Ok(Record::new(&args.date, &args.weight, &args.calorie))
}

fn export_after_change(ctx: &Context) {
    if let Some(sync) = &ctx.sync {
        sync.export_snapshot();
    }
}

/// Append a new entry.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the store cannot be
/// written.
pub fn add(args: &RecordArgs, ctx: &Context) -> Result<()> {
    let record = record_from(args)?;
    ctx.store.append(&record)?;
    export_after_change(ctx);

    if ctx.json {
        let output = serde_json::json!({ "added": record });
        println!("{output}");
    } else if !crate::is_quiet() {
        println!("Added {}: weight {}, calories {}", record.date, record.weight, record.calorie);
    }
    Ok(())
}

/// Replace the first entry for a date.
///
/// # Errors
///
/// Returns [`Error::RecordNotFound`] if no entry has that date.
pub fn edit(args: &RecordArgs, ctx: &Context) -> Result<()> {
    let record = record_from(args)?;
    if !ctx
        .store
        .update(&record.date, &record.weight, &record.calorie)?
    {
        return Err(Error::RecordNotFound { date: record.date });
    }
    export_after_change(ctx);

    if ctx.json {
        let output = serde_json::json!({ "updated": record });
        println!("{output}");
    } else if !crate::is_quiet() {
        println!("Updated {}: weight {}, calories {}", record.date, record.weight, record.calorie);
    }
    Ok(())
}

/// Remove every entry for a date.
///
/// # Errors
///
/// Returns [`Error::RecordNotFound`] if no entry has that date.
pub fn remove(date: &str, ctx: &Context) -> Result<()> {
    let removed = ctx.store.delete(date)?;
    if removed == 0 {
        return Err(Error::RecordNotFound {
            date: date.to_string(),
        });
    }
    export_after_change(ctx);

    if ctx.json {
        let output = serde_json::json!({ "date": date, "removed": removed });
        println!("{output}");
    } else if !crate::is_quiet() {
        println!("Removed {removed} entr{} for {date}", if removed == 1 { "y" } else { "ies" });
    }
    Ok(())
}

/// Print every entry in file order.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list(ctx: &Context) -> Result<()> {
    let records = ctx.store.load()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No entries yet. Add one with `wl add <date> <weight> <calorie>`.");
        return Ok(());
    }

    println!("{:<12} {:>8} {:>8}", "Date", "Weight", "Calories");
    for record in &records {
        println!("{:<12} {:>8} {:>8}", record.date, record.weight, record.calorie);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_field() {
        assert!(check_field("weight", "80.5").is_ok());
        assert!(check_field("weight", "").is_err());
        assert!(check_field("weight", "80,5").is_err());
        assert!(check_field("date", "2024-01-01\n").is_err());
    }

    #[test]
    fn test_record_from_args() {
        let args = RecordArgs {
            date: "2024-01-01".into(),
            weight: "80".into(),
            calorie: "2000".into(),
        };
        assert_eq!(record_from(&args).unwrap(), Record::new("2024-01-01", "80", "2000"));
    }
}
