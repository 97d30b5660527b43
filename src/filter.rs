const BLACK_MAX_LIGHTNESS: f32 = 0.05;
const WHITE_MIN_LIGHTNESS: f32 = 0.95;

/// A trait used to implement filters for the quantization process.
///
/// Filters remove colors from the histogram before it is quantized, so they never take part in any region. No filter
/// is installed by default.
///
/// See [`crate::PaletteBuilder::add_filter`] on how to add filters to the quantization process.
pub trait Filter {
    /// Return whether a given color should be allowed or not. The same color is given in both sRGB
    /// and HSL for convenience.
    fn is_allowed(&self, rgb: (u8, u8, u8), hsl: (f32, f32, f32)) -> bool;
}

/// Disallows colors very close to black and colors very close to white.
#[derive(Debug, Clone, Copy)]
pub struct LightnessFilter {
    black_max_lightness: f32,
    white_min_lightness: f32,
}

impl LightnessFilter {
    /// Colors with a lightness at or below `black_max_lightness`, or at or above `white_min_lightness`, are
    /// disallowed. Lightness ranges from 0 to 1.
    pub fn new(black_max_lightness: f32, white_min_lightness: f32) -> Self {
        Self {
            black_max_lightness,
            white_min_lightness,
        }
    }

    fn is_black(&self, l: f32) -> bool {
        l <= self.black_max_lightness
    }

    fn is_white(&self, l: f32) -> bool {
        l >= self.white_min_lightness
    }
}

impl Default for LightnessFilter {
    fn default() -> Self {
        Self::new(BLACK_MAX_LIGHTNESS, WHITE_MIN_LIGHTNESS)
    }
}

impl Filter for LightnessFilter {
    fn is_allowed(&self, _: (u8, u8, u8), (_, _, l): (f32, f32, f32)) -> bool {
        !self.is_black(l) && !self.is_white(l)
    }
}
