//! Core data models for the location grid.

pub mod cell;

pub use cell::{Coordinates, GridCell, GridId};
