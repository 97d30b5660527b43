//! Error types for palette extraction.

use thiserror::Error;

/// Errors returned when a palette request is rejected.
///
/// Every error is raised before any quantization work starts; a request is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// There are no colors to summarize
    #[error("no colors to summarize")]
    EmptyInput,

    /// The quantizer region count is zero, not a power of two or too large
    #[error("invalid region count {0}: must be a power of two no larger than {max}", max = crate::MAX_COLOR_COUNT)]
    InvalidRegionCount(usize),

    /// The requested palette size is out of bounds
    #[error("invalid color count {requested}: must be between 1 and {max}")]
    InvalidColorCount { requested: usize, max: usize },

    /// A histogram entry has no pixels
    #[error("color {rgb:?} has a pixel count of zero")]
    ZeroPopulation { rgb: (u8, u8, u8) },

    /// The pixel counts add up to more than fits in a `u64`
    #[error("total pixel count overflows")]
    PopulationOverflow,

    /// A channel value doesn't fit in 8 bits
    #[error("channel value {0} is outside 0-255")]
    ChannelOutOfRange(u32),

    /// A hex color string couldn't be parsed
    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),
}

/// Result type for palette operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
