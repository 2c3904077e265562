use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight canonical compass directions, 45 degrees apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl CompassDirection {
    /// All directions in clockwise order starting from north.
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::Northeast,
        CompassDirection::East,
        CompassDirection::Southeast,
        CompassDirection::South,
        CompassDirection::Southwest,
        CompassDirection::West,
        CompassDirection::Northwest,
    ];

    /// Bearing in degrees clockwise from north
    pub fn bearing(&self) -> f64 {
        match self {
            CompassDirection::North => 0.0,
            CompassDirection::Northeast => 45.0,
            CompassDirection::East => 90.0,
            CompassDirection::Southeast => 135.0,
            CompassDirection::South => 180.0,
            CompassDirection::Southwest => 225.0,
            CompassDirection::West => 270.0,
            CompassDirection::Northwest => 315.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::North => "North",
            CompassDirection::Northeast => "Northeast",
            CompassDirection::East => "East",
            CompassDirection::Southeast => "Southeast",
            CompassDirection::South => "South",
            CompassDirection::Southwest => "Southwest",
            CompassDirection::West => "West",
            CompassDirection::Northwest => "Northwest",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
