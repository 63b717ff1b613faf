//! Report command

use clap::Args;
use tracklog_core::report::{Measure, RankedRow, Report};
use tracklog_engine::commands::report::{
    DEFAULT_GROUP_BY, DEFAULT_SORT_BY, DEFAULT_TIMEFRAME_DAYS,
};
use tracklog_engine::commands::DEFAULT_LIMIT;
use tracklog_engine::{Config, ReportRequest};

use super::pad;

const MIN_KEY_WIDTH: usize = 32;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Time frame in days, ending now
    #[arg(long, short, default_value_t = DEFAULT_TIMEFRAME_DAYS, allow_negative_numbers = true)]
    pub timeframe: f64,

    /// Comma-separated properties to group by, e.g. 'AlbumTitle'
    #[arg(long, short, default_value = DEFAULT_GROUP_BY)]
    pub group_by: String,

    /// PlayCount, Rating or PlayTime
    #[arg(long, short, default_value = DEFAULT_SORT_BY)]
    pub sort_by: String,

    /// Limit the number of groups shown
    #[arg(long, short, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    pub limit: i64,

    /// Show the number of tracks in each group
    #[arg(long, short)]
    pub count: bool,

    /// Show the lowest ranked groups first
    #[arg(long, short)]
    pub reverse: bool,
}

pub fn execute(args: ReportArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let request = ReportRequest {
        timeframe_days: args.timeframe,
        group_by: args.group_by,
        sort_by: args.sort_by,
        limit: args.limit,
        count: args.count,
        reverse: args.reverse,
    };
    // Validate before opening the store
    let now = chrono::Utc::now().timestamp();
    request.to_query(now)?;

    let store = config.open_store()?;
    let output = request.execute(&store, now)?;

    print!("{}", render_table(&output.report, &output.rows));
    Ok(())
}

fn render_table(report: &Report, rows: &[RankedRow]) -> String {
    let key_header = format!(
        "{} ({})",
        report
            .group_by
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(","),
        report.total_groups
    );
    let width = rows
        .iter()
        .map(|r| r.row.key.to_string().chars().count())
        .chain(std::iter::once(key_header.chars().count()))
        .max()
        .unwrap_or(0)
        .max(MIN_KEY_WIDTH);
    let unit = match report.measure {
        Measure::PlayTime => " (m)",
        _ => "-Δ",
    };

    let mut out = format!(
        "{:>4} {} {}{}",
        "#",
        pad(&key_header, width),
        report.measure.name(),
        unit
    );
    if rows.iter().any(|r| r.row.track_count.is_some()) {
        out.push_str("  Tracks");
    }
    out.push('\n');

    for ranked in rows {
        let value = if report.measure.is_integral() {
            format!("{:6.0}", ranked.row.value)
        } else {
            format!("{:6.2}", ranked.row.value)
        };
        out.push_str(&format!(
            "{:>4} {} {}",
            ranked.rank,
            pad(&ranked.row.key.to_string(), width),
            value
        ));
        if let Some(count) = ranked.row.track_count {
            out.push_str(&format!("  {:>6}", count));
        }
        out.push('\n');
    }
    out
}
