use geo::{Contains, LineString, Point, Polygon};

use crate::Coordinates;

/// A named polygon inside an area of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Subarea {
    pub id: String,
    pub name: Option<String>,
    polygon: Polygon<f64>,
}

impl Subarea {
    /// `ring` is the exterior ring, it is closed automatically when the first and last
    /// coordinates differ.
    pub fn new(id: impl Into<String>, name: Option<String>, ring: &[Coordinates]) -> Self {
        let exterior: LineString<f64> = ring
            .iter()
            .map(|c| (c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .into();

        Self {
            id: id.into(),
            name,
            polygon: Polygon::new(exterior, vec![]),
        }
    }

    /// Points on the boundary are not contained.
    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        self.polygon
            .contains(&Point::new(coordinates.longitude, coordinates.latitude))
    }
}

/// The first subarea containing `coordinates`.
pub fn locate<'a>(coordinates: &Coordinates, subareas: &'a [Subarea]) -> Option<&'a Subarea> {
    subareas.iter().find(|s| s.contains(coordinates))
}
