//! Compass headings for robots and conveyor belts.

use serde::Serialize;

/// One of the four cardinal directions.
///
/// Variants are listed in clockwise order starting from south, which is
/// also the order turning right walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Heading {
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
}

impl Heading {
    /// All headings in clockwise order.
    pub const ALL: [Heading; 4] = [Heading::South, Heading::West, Heading::North, Heading::East];

    /// The heading after a quarter turn to the right.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::North => Heading::East,
            Heading::East => Heading::South,
        }
    }

    /// The heading after a quarter turn to the left.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Heading::South => Heading::East,
            Heading::West => Heading::South,
            Heading::North => Heading::West,
            Heading::East => Heading::North,
        }
    }

    /// The heading pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Heading::South => Heading::North,
            Heading::West => Heading::East,
            Heading::North => Heading::South,
            Heading::East => Heading::West,
        }
    }

    /// Unit step `(dx, dy)` for this heading in grid coordinates.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
            Heading::North => (0, -1),
            Heading::East => (1, 0),
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Heading::South => "SOUTH",
            Heading::West => "WEST",
            Heading::North => "NORTH",
            Heading::East => "EAST",
        };
        f.write_str(name)
    }
}
