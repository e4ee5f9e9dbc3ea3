use serde::Serialize;

pub const PATH_PALETTE: [&str; 6] = [
    "#ff0000", "#00ff00", "#ffff00", "#ff00ff", "#00ffff", "#007bff",
];

/// Display color of a vessel, stable for as long as the vessel keeps its discovery rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    pub fn for_rank(rank: usize) -> Self {
        Self(PATH_PALETTE[rank % PATH_PALETTE.len()])
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}
