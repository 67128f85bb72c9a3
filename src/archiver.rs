use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::BookRecord;

const MAX_FILENAME_BASE: usize = 50;

/// `"Mistborn: The Final Empire"` -> `"mistborn_the_final_empire"`.
pub fn filename_base(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| !matches!(c, ':' | '\'' | '/' | '\\'))
        .take(MAX_FILENAME_BASE)
        .collect()
}

pub fn output_path(config: &ScraperConfig, filename_base: &str) -> PathBuf {
    config
        .output_dir
        .join(format!("{filename_base}_{}_data.json", config.source_tag))
}

/// Write `record` as 4-space indented JSON under the output directory.
/// `None` is a warned no-op. Returns the path written, if any.
pub fn save_record(
    record: Option<&BookRecord>,
    filename_base: &str,
    config: &ScraperConfig,
) -> Result<Option<PathBuf>, ScrapeError> {
    let Some(record) = record else {
        warn!("No data to save.");
        return Ok(None);
    };

    let path = output_path(config, filename_base);
    let io_err = |source| ScrapeError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(&config.output_dir).map_err(io_err)?;
    let json = to_pretty_json(record)?;
    let mut file = File::create(&path).map_err(io_err)?;
    file.write_all(&json).map_err(io_err)?;

    info!("Data successfully saved to {}", path.display());
    Ok(Some(path))
}

fn to_pretty_json(record: &BookRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut ser)?;
    Ok(buf)
}
