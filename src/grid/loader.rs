//! Grid dataset loading from CSV exports of the `location_grid` table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use tracing::{info, warn};

use super::GridIndex;
use crate::models::GridCell;

const REQUIRED_COLUMNS: [&str; 8] = [
    "grid_id",
    "level",
    "longitude",
    "latitude",
    "north_latitude",
    "south_latitude",
    "west_longitude",
    "east_longitude",
];

/// Load grid cells from a CSV file (optionally `.gz` compressed)
pub fn load_cells(path: &Path) -> Result<Vec<GridCell>> {
    info!("Loading grid cells from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open grid file {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    read_cells(reader)
}

/// Parse grid cells from any CSV source.
///
/// Columns are matched by header name; extra columns are ignored. Rows
/// that fail to parse or carry NaN/infinite coordinates are skipped with a
/// warning, since the spatial index cannot hold them.
pub fn read_cells<R: Read>(reader: R) -> Result<Vec<GridCell>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            anyhow::bail!("Column '{}' not found", column);
        }
    }

    let mut cells = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.deserialize::<GridCell>().enumerate() {
        match result {
            Ok(cell) if cell.is_finite() => cells.push(cell),
            Ok(cell) => {
                skipped += 1;
                warn!(
                    "Skipping grid row {}: cell {} has non-finite coordinates",
                    row + 2,
                    cell.grid_id
                );
            }
            Err(e) => {
                skipped += 1;
                // +2: header line and 1-based numbering
                warn!("Skipping grid row {}: {}", row + 2, e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed grid rows", skipped);
    }
    info!("Loaded {} grid cells", cells.len());
    Ok(cells)
}

/// Load a CSV export straight into a spatial index
pub fn load_index(path: &Path) -> Result<GridIndex> {
    Ok(GridIndex::build(load_cells(path)?))
}
