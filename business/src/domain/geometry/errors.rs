/// Geometry errors for the coordinate-transform layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("geometry.invalid_dimensions")]
    InvalidDimensions,
    #[error("geometry.invalid_crop")]
    InvalidCrop,
    #[error("geometry.space_mismatch")]
    SpaceMismatch,
}
