//! In-memory spatial index over grid cells.

use std::collections::BTreeMap;
use std::sync::Arc;

use rstar::primitives::GeomWithData;
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use super::store::{GridStore, Neighborhood, StoreError};
use crate::models::GridCell;

/// Wrapper for R-tree indexing of cell bounding boxes
#[derive(Clone)]
struct IndexedCell {
    cell: Arc<GridCell>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedCell {
    fn new(cell: Arc<GridCell>) -> Self {
        let envelope = AABB::from_corners(
            [cell.west_longitude, cell.south_latitude],
            [cell.east_longitude, cell.north_latitude],
        );
        Self { cell, envelope }
    }
}

type Centerpoint = GeomWithData<[f64; 2], Arc<GridCell>>;

/// Grid store backed by two R-trees: one over bounding boxes for containment
/// and one over centerpoints of level > 1 cells for the nearest fallback.
pub struct GridIndex {
    boxes: RTree<IndexedCell>,
    centers: RTree<Centerpoint>,
    /// Cell count per level, for startup stats
    by_level: BTreeMap<u32, usize>,
}

impl GridIndex {
    /// Build spatial index from grid cells
    pub fn build(cells: Vec<GridCell>) -> Self {
        info!("Building spatial index for {} grid cells...", cells.len());

        let cells: Vec<Arc<GridCell>> = cells.into_iter().map(Arc::new).collect();

        let mut by_level = BTreeMap::new();
        for cell in &cells {
            *by_level.entry(cell.level).or_insert(0) += 1;
        }

        // Level 1 cells are too coarse to be a nearest answer.
        let centers: Vec<Centerpoint> = cells
            .iter()
            .filter(|cell| cell.level > 1)
            .map(|cell| GeomWithData::new([cell.longitude, cell.latitude], Arc::clone(cell)))
            .collect();

        let boxes: Vec<IndexedCell> = cells.into_iter().map(IndexedCell::new).collect();

        let index = Self {
            boxes: RTree::bulk_load(boxes),
            centers: RTree::bulk_load(centers),
            by_level,
        };

        info!(
            "Spatial index built with {} cells ({} fallback centerpoints)",
            index.len(),
            index.centers.size()
        );
        for (level, count) in &index.by_level {
            info!("  level {}: {} cells", level, count);
        }

        index
    }

    /// Every cell whose closed bounding box contains the point, in no order
    pub fn containing(&self, longitude: f64, latitude: f64) -> Vec<Arc<GridCell>> {
        let query_envelope = AABB::from_point([longitude, latitude]);

        // R-tree narrows by envelope, the cell test is authoritative
        self.boxes
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ic| ic.cell.contains(longitude, latitude))
            .map(|ic| Arc::clone(&ic.cell))
            .collect()
    }

    /// Cell count per level
    pub fn levels(&self) -> &BTreeMap<u32, usize> {
        &self.by_level
    }

    /// Get total number of indexed cells
    pub fn len(&self) -> usize {
        self.boxes.size()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.size() == 0
    }
}

impl GridStore for GridIndex {
    fn best_containing(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Option<GridCell>, StoreError> {
        // Same-level overlaps fall to the lowest grid_id.
        let best = self
            .containing(longitude, latitude)
            .into_iter()
            .max_by(|a, b| a.level.cmp(&b.level).then(b.grid_id.cmp(&a.grid_id)));

        Ok(best.map(|cell| (*cell).clone()))
    }

    fn centerpoints_within(&self, window: &Neighborhood) -> Result<Vec<GridCell>, StoreError> {
        let envelope = AABB::from_corners([window.west, window.south], [window.east, window.north]);

        let mut cells: Vec<GridCell> = self
            .centers
            .locate_in_envelope(&envelope)
            .map(|c| &c.data)
            .filter(|cell| cell.level > 1 && window.surrounds(cell.longitude, cell.latitude))
            .map(|cell| (**cell).clone())
            .collect();

        // Stable candidate order so equal distances resolve the same way every run
        cells.sort_by_key(|cell| cell.grid_id);
        Ok(cells)
    }
}
