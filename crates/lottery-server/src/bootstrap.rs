//! Startup: resume from the snapshot or load the source files

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use lottery_core::Lottery;
use tracing::info;

/// How the session was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Restored from an existing snapshot
    Resumed,
    /// Built from the participants, prizes and blacklists files
    ColdStart,
}

/// Open the configured lottery
///
/// Resumes from the data file when one exists; otherwise loads the three
/// source files. Any failure here is fatal to the process.
pub fn open_lottery(config: &ServerConfig) -> Result<(Lottery, StartMode)> {
    let mut builder = Lottery::builder(&config.lottery_name);
    if let Some(dir) = &config.data_dir {
        builder = builder.data_dir(dir);
    }
    let lottery = builder.build();

    if lottery.data_file_exists() {
        info!(path = %lottery.data_file_path().display(), "Saved data file found");
        lottery
            .load_from_file()
            .with_context(|| format!("loading {}", lottery.data_file_path().display()))?;
        return Ok((lottery, StartMode::Resumed));
    }

    lottery
        .load_participants_csv(&config.participants_csv)
        .with_context(|| format!("loading {}", config.participants_csv.display()))?;
    lottery
        .load_prizes_csv(&config.prizes_csv)
        .with_context(|| format!("loading {}", config.prizes_csv.display()))?;
    lottery
        .load_blacklists_json(&config.blacklists_json)
        .with_context(|| format!("loading {}", config.blacklists_json.display()))?;
    info!(
        participants = lottery.participants().len(),
        prizes = lottery.prizes().len(),
        blacklists = lottery.blacklists().len(),
        "Loaded lottery sources"
    );
    Ok((lottery, StartMode::ColdStart))
}
