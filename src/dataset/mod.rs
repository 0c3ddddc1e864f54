//! Dataset model and format IO.
//!
//! This module defines the in-memory representation of a multi-label
//! image dataset — an ordered label catalog plus ordered item collections —
//! and the txt format codec that reads and writes it.
//!
//! # Design Principles
//!
//! 1. **Positional label identity**: a label id is nothing but a position
//!    in the catalog, so catalog order is preserved end to end.
//!
//! 2. **Order-stable collections**: subsets keep items in first-insertion
//!    order, and re-inserting an id replaces the record without moving it,
//!    so decoding and re-encoding keeps file order stable.
//!
//! 3. **Faithful asymmetry**: decoding keeps duplicate label ids as a list;
//!    encoding collapses them to a set. The model exposes both views rather
//!    than papering over the difference.

mod catalog;
mod ids;
pub mod io_txt;
mod model;

// Re-export core types for convenient access
pub use catalog::LabelCatalog;
pub use ids::LabelId;
pub use model::{Dataset, ImageRef, Item, Subset};
