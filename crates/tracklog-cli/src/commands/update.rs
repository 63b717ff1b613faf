//! Update command

use clap::Args;
use tracklog_engine::{update, Config};

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Compute and print the changes without recording them
    #[arg(long, short = 'd')]
    pub dry_run: bool,

    /// Also print one line per change
    #[arg(long, short)]
    pub verbose: bool,
}

pub fn execute(args: UpdateArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let provider = config.provider();
    let mut store = config.open_store()?;

    let result = update(&provider, &mut store, args.dry_run)?;

    if result.dry_run {
        println!("Dry run (nothing recorded):");
    }
    if args.verbose || result.dry_run {
        print!("{}", result.details());
    } else {
        println!("{}", result.summary());
    }
    if result.committed {
        println!("  generation: {}", result.generation_after);
    }

    Ok(())
}
