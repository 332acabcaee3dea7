use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

static CROP_OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]\d+)([+-]\d+)$").unwrap_or_else(|e| panic!("invalid crop pattern: {e}"))
});

/// Signed geometry offset trimming an image from one corner.
///
/// `+dx+dy` keeps the region starting at `(dx, dy)` and running to the
/// bottom-right corner. A negative component trims from the opposite edge,
/// so `-dx` keeps columns `0..width - dx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CropOffset {
    pub dx: i32,
    pub dy: i32,
}

/// Pixel rectangle `(x, y, width, height)` inside an image.
pub type CropRegion = (u32, u32, u32, u32);

impl CropOffset {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Region of a `width`x`height` image kept by this offset.
    ///
    /// Returns `None` when the region is empty; callers must treat that as
    /// an error rather than clamp.
    pub fn region(&self, width: u32, height: u32) -> Option<CropRegion> {
        let (x, kept_width) = Self::axis(self.dx, width)?;
        let (y, kept_height) = Self::axis(self.dy, height)?;
        Some((x, y, kept_width, kept_height))
    }

    fn axis(offset: i32, extent: u32) -> Option<(u32, u32)> {
        let trim = offset.unsigned_abs();
        if trim >= extent {
            return None;
        }
        let start = if offset >= 0 { trim } else { 0 };
        Some((start, extent - trim))
    }
}

impl FromStr for CropOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = CROP_OFFSET_RE
            .captures(s.trim())
            .ok_or_else(|| format!("Invalid crop offset '{}'. Expected: +DX+DY", s))?;

        let dx = caps[1]
            .parse::<i32>()
            .map_err(|_| format!("Crop offset '{}' is out of range", s))?;
        let dy = caps[2]
            .parse::<i32>()
            .map_err(|_| format!("Crop offset '{}' is out of range", s))?;

        Ok(CropOffset { dx, dy })
    }
}

impl Display for CropOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:+}{:+}", self.dx, self.dy)
    }
}

impl From<CropOffset> for String {
    fn from(offset: CropOffset) -> Self {
        offset.to_string()
    }
}

impl TryFrom<String> for CropOffset {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
