// Coordinate input parsing
// Values are checked for parseability only, not for geographic range.

use std::fmt;
use thiserror::Error;

/// Which half of the coordinate pair failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid {axis} format '{input}'. Please enter a valid number.")]
pub struct CoordinateError {
    pub axis: Axis,
    pub input: String,
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Arguments as passed to the location tool: "." decimal point, no
    /// grouping, no exponent
    pub fn to_args(&self) -> [String; 2] {
        [self.latitude.to_string(), self.longitude.to_string()]
    }
}

/// Parse one coordinate typed by the operator
pub fn parse_coordinate(input: &str, axis: Axis) -> Result<f64, CoordinateError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoordinateError {
            axis,
            input: trimmed.to_string(),
        }),
    }
}
