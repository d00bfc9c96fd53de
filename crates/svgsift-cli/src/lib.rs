//! CLI logic for the svgsift extraction tool.
//!
//! The CLI plays the host around the pipeline: it reads a document batch
//! captured by a scanner, runs extraction, and writes the resulting records
//! in their stored form.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io};

use log::info;

use svgsift::{
    Harvester, SiftError,
    exchange::{DocumentBatch, StorageRecord},
    normalize::Normalizer,
    record::{VectorRecord, present_element},
};

/// Run the svgsift CLI application
///
/// This function reads the input batch, processes it through the svgsift
/// pipeline and writes the records as a JSON array to the output file.
///
/// # Errors
///
/// Returns `SiftError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input batches
/// - Runtime or HTTP client setup errors
pub fn run(args: &Args) -> Result<(), SiftError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document batch"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let batch: DocumentBatch = match serde_json::from_str(&source) {
        Ok(batch) => batch,
        Err(err) => return Err(SiftError::new_json_error(err, source)),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| SiftError::Runtime(err.to_string()))?;

    let harvester = Harvester::new(app_config)?;
    let records = runtime.block_on(harvester.process(Some(batch)));

    let stored: Vec<StorageRecord> = records
        .iter()
        .map(|record| stored_form(record, args.presentation))
        .collect();
    let json = serde_json::to_string_pretty(&stored).map_err(io::Error::from)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output, records = stored.len(); "Records exported successfully");

    Ok(())
}

/// The record as written to the output file.
///
/// With `presentation` set, the markup is the normalized presentation form.
fn stored_form(record: &VectorRecord, presentation: bool) -> StorageRecord {
    let mut stored = record.to_storage();
    if presentation {
        if let Some(normalized) = Normalizer::detached().normalize(record) {
            stored.svg = present_element(&normalized);
        }
    }
    stored
}
