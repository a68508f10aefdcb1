use crate::extraction::normalize::{round_to_nearest_bin, PIXEL_SPACING_BINS};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Pixel spacing in millimeters (row, column)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    /// Creates a new PixelSpacing
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Parses pixel spacing from string
    ///
    /// Accepts formats like:
    /// - "0.1\\0.1"
    /// - "0.1 0.1"
    /// - "[0.1, 0.1]"
    /// - Exponential notation: "1.5e-4 1.5e-4"
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two numbers can be read
    pub fn parse(s: &str) -> Result<Self, String> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
        });

        let mut numbers = re.find_iter(s).map(|m| m.as_str());
        let mut next_number = |axis: &str| -> Result<f64, String> {
            numbers
                .next()
                .ok_or_else(|| format!("Failed to parse PixelSpacing from '{}'", s))?
                .parse()
                .map_err(|e| format!("Failed to parse {} value: {}", axis, e))
        };

        let row = next_number("row")?;
        let col = next_number("col")?;

        Ok(PixelSpacing { row, col })
    }

    /// Snaps both axes to the nearest standard detector bin
    pub fn quantized(&self) -> Self {
        Self {
            row: round_to_nearest_bin(self.row, &PIXEL_SPACING_BINS),
            col: round_to_nearest_bin(self.col, &PIXEL_SPACING_BINS),
        }
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} mm", self.row, self.col)
    }
}
