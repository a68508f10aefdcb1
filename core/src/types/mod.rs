//! Core type definitions shared by extraction and the warehouse
//!
//! - [`FieldValue`]: scalar value of a star-schema column
//! - [`Fields`]: insertion-ordered row representation
//! - [`PixelSpacing`]: physical pixel spacing (row, column) in mm

mod pixel_spacing;
mod value;

pub use pixel_spacing::PixelSpacing;
pub use value::{FieldValue, Fields, NULL_SENTINEL};
