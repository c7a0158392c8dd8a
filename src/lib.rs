//! Location grid - resolve geographic points and addresses to grid cell ids
//!
//! This library provides the grid resolver and the shared lookup layer for
//! the `serve` and `lookup` binaries.

pub mod config;
pub mod geocoding;
pub mod grid;
pub mod models;
pub mod service;

pub use grid::{GridIndex, GridResolver, GridStore, ResolveError};
pub use models::{Coordinates, GridCell, GridId};
pub use service::{GridLookupService, LookupResponse};
