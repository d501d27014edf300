//! Input loading. The data sources themselves (spreadsheet API, geospatial
//! export) are external collaborators; this module only reads their already
//! rectangular/record-shaped output.

use std::{fs::File, io::BufReader, path::Path};

use crate::{
    aggregate::FeatureRecord,
    error::{CitylineError, CitylineResult},
};

/// Loads a feature file wholesale: a JSON array of
/// `{group, chartArea, visibleFrom, visibleTo}` records.
///
/// A failed load is a [`CitylineError::Data`]; the renderer simply keeps
/// no-oping until a later reload succeeds. There is no retry here.
pub fn load_features(path: &Path) -> CitylineResult<Vec<FeatureRecord>> {
    let file = File::open(path).map_err(|e| {
        CitylineError::data(format!("open feature file '{}': {e}", path.display()))
    })?;
    let records: Vec<FeatureRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| CitylineError::data(format!("parse feature file: {e}")))?;
    tracing::debug!(records = records.len(), "loaded feature file");
    Ok(records)
}
