//! Log command

use chrono::{Local, TimeZone};
use clap::Args;
use tracklog_core::model::ChangeEvent;
use tracklog_engine::commands::DEFAULT_LIMIT;
use tracklog_engine::{read_log, Config};

use super::pad;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Limit the number of entries shown
    #[arg(long, short, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    pub limit: i64,
}

pub fn execute(args: LogArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = config.open_store()?;
    let events = read_log(&store, args.limit)?;

    if events.is_empty() {
        println!("No changes recorded");
        return Ok(());
    }
    for event in &events {
        println!("{}", format_line(event));
    }
    Ok(())
}

fn format_line(event: &ChangeEvent) -> String {
    let when = Local
        .timestamp_opt(event.timestamp, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| event.timestamp.to_string());
    let value = event
        .value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_default();

    format!(
        "{} {} {} {:>6}",
        when,
        pad(event.type_label(), 12),
        pad(&event.track_title, 24),
        value
    )
}
