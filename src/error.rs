use thiserror::Error;

/// Why a finished trail could not be merged into the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("no trail has been drawn")]
    EmptyTrail,
    #[error("trail is too short to claim anything")]
    TooShort,
    #[error("could not tell which way the trail runs along the boundary")]
    UnknownDirection,
    #[error("trail endpoint is not on the boundary")]
    EndpointOffBoundary,
    #[error("spliced boundary collapsed")]
    Collapsed,
    #[error("splice would not shrink the field")]
    NoAreaClaimed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("field must be at least {min}x{min} units, got {width}x{height}")]
    FieldTooSmall { width: i32, height: i32, min: i32 },
    #[error("{0} must be positive")]
    InvalidSpeed(&'static str),
    #[error("{0} start position lies outside the field")]
    InvalidStart(&'static str),
}
