pub mod coordinates;

pub use coordinates::{parse_coordinate, Axis, CoordinateError, Coordinates};
