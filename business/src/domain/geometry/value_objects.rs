use serde::{Deserialize, Serialize};

use super::errors::GeometryError;

/// A rectangle locating an object, normalized to [0, 1] relative to the
/// image (or sub-image) it was detected against. Immutable once produced
/// by detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        let bbox = Self {
            x,
            y,
            width,
            height,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Checks the normalized-coordinate invariant: `0 <= x, y` and
    /// `x + width <= 1`, `y + height <= 1`. Values outside this range
    /// indicate a coordinate-space mismatch, not a large crop.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let in_range = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.0
            && self.y + self.height <= 1.0;

        if in_range {
            Ok(())
        } else {
            Err(GeometryError::SpaceMismatch)
        }
    }
}

/// A rectangle in integer pixels. Width and height are always positive;
/// a degenerate rect cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidCrop);
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

/// Pixel dimensions of a reference image. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }
}

/// The coordinate space a caller's bounding box is expressed in.
///
/// Callers state this explicitly on every request. [`CoordinateSpace::infer`]
/// exists only for legacy payloads that cannot state it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    Normalized,
    Pixels,
}

impl CoordinateSpace {
    /// Legacy compatibility fallback: guesses the space from magnitude
    /// (every value <= 1 reads as normalized). Ambiguous for 1px crops on
    /// tiny images; never used when the caller states the space.
    pub fn infer(x: f64, y: f64, width: f64, height: f64) -> Self {
        if x <= 1.0 && y <= 1.0 && width <= 1.0 && height <= 1.0 {
            CoordinateSpace::Normalized
        } else {
            CoordinateSpace::Pixels
        }
    }
}

impl std::fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSpace::Normalized => write!(f, "normalized"),
            CoordinateSpace::Pixels => write!(f, "pixels"),
        }
    }
}

impl std::str::FromStr for CoordinateSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normalized" => Ok(CoordinateSpace::Normalized),
            "pixels" => Ok(CoordinateSpace::Pixels),
            _ => Err(format!("Invalid coordinate space: {}", s)),
        }
    }
}
