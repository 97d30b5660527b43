// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract a small, ordered color palette from an image.
//!
//! The distinct colors of an image are divided with median cut into a power-of-two number of regions, each region
//! collapsing into one representative color and the number of pixels it covers. The most populous regions form the
//! palette, which is then ordered along the direction the chosen colors vary the most so neighbouring colors look
//! alike.
//!
//! ```
//! use colorcut::{Histogram, Palette};
//!
//! let histogram = Histogram::from_counts([
//!     (10, (0, 0, 0)),
//!     (10, (255, 255, 255)),
//!     (5, (128, 0, 0)),
//!     (5, (0, 128, 0)),
//! ])?;
//!
//! let palette = Palette::from_histogram(histogram).color_count(2).generate()?;
//! assert_eq!(palette.hex_codes(), ["#2A2A00", "#FFFFFF"]);
//! # Ok::<(), colorcut::Error>(())
//! ```

mod color_cut_quantizer;
mod error;
mod filter;
mod histogram;
mod projection;
mod selector;
mod swatch;

pub const DEFAULT_COLOR_COUNT: usize = 8;
pub const MAX_COLOR_COUNT: usize = 1 << 16;

pub use crate::{
    color_cut_quantizer::{quantize, ColorCutQuantizer},
    error::{Error, Result},
    filter::{Filter, LightnessFilter},
    histogram::{scale_to_area, ColorPoint, Histogram},
    projection::{order, PrincipalAxis, Projection},
    selector::{select, select_indices},
    swatch::{hex_to_rgb, rgb_to_hex, Swatch},
};
pub use image;

use image::{GenericImageView, Pixel};
use palette::IntoColor;

/// An ordered palette of representative colors.
///
/// The palette holds at most the requested number of colors. It holds fewer when the source didn't have enough
/// distinct colors, which [`Palette::is_complete`] reports.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    swatches: Vec<Swatch>,
    requested_count: usize,
}

pub struct PaletteBuilder {
    histogram: Histogram,
    color_count: usize,
    filters: Vec<Box<dyn Filter>>,
    projection: Box<dyn Projection>,
}

impl Palette {
    pub fn from_histogram(histogram: Histogram) -> PaletteBuilder {
        PaletteBuilder::from_histogram(histogram)
    }

    pub fn from_image<I>(image: &I) -> PaletteBuilder
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        PaletteBuilder::from_histogram(Histogram::from_image(image))
    }

    /// The swatches in display order.
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn colors(&self) -> Vec<(u8, u8, u8)> {
        self.swatches.iter().map(|swatch| swatch.rgb()).collect()
    }

    pub fn hex_codes(&self) -> Vec<String> {
        self.swatches.iter().map(|swatch| swatch.hex()).collect()
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn requested_count(&self) -> usize {
        self.requested_count
    }

    /// Whether the palette holds as many colors as were requested.
    pub fn is_complete(&self) -> bool {
        self.swatches.len() == self.requested_count
    }

    pub fn most_prominent_color(&self) -> Option<(u8, u8, u8)> {
        self.swatches
            .iter()
            .max_by_key(|swatch| swatch.population())
            .map(|swatch| swatch.rgb())
    }

    /// The number of pixels covered by the palette's swatches.
    pub fn total_population(&self) -> u64 {
        self.swatches.iter().map(|swatch| swatch.population()).sum()
    }
}

impl PaletteBuilder {
    pub fn from_histogram(histogram: Histogram) -> Self {
        Self {
            histogram,
            color_count: DEFAULT_COLOR_COUNT,
            filters: Vec::new(),
            projection: Box::new(PrincipalAxis),
        }
    }

    pub fn color_count(self, color_count: usize) -> Self {
        Self { color_count, ..self }
    }

    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Filter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn clear_filters(self) -> Self {
        Self {
            filters: Vec::new(),
            ..self
        }
    }

    /// Replace the projection used to order the palette.
    pub fn projection<P>(self, projection: P) -> Self
    where
        P: Projection + 'static,
    {
        Self {
            projection: Box::new(projection),
            ..self
        }
    }

    pub fn generate(mut self) -> Result<Palette> {
        if !(1..=MAX_COLOR_COUNT).contains(&self.color_count) {
            return Err(Error::InvalidColorCount {
                requested: self.color_count,
                max: MAX_COLOR_COUNT,
            });
        }

        if !self.filters.is_empty() {
            let filters = &self.filters;
            self.histogram
                .retain(|point| !should_ignore_color(filters, point.rgb()));
        }

        // the quantizer needs a power of two; the surplus regions are dropped again when selecting
        let regions = self.color_count.next_power_of_two();
        let quantizer = ColorCutQuantizer::new(self.histogram.into(), regions)?;
        let candidates = quantizer.get_quantized_colors();

        let selected = select(&candidates, self.color_count);
        let colors = selected.iter().map(|swatch| swatch.rgb()).collect::<Vec<_>>();
        let swatches = order(&colors, self.projection.as_ref())
            .into_iter()
            .map(|i| selected[i])
            .collect::<Vec<_>>();

        tracing::debug!(
            requested = self.color_count,
            regions,
            generated = swatches.len(),
            "Generated palette"
        );

        Ok(Palette {
            swatches,
            requested_count: self.color_count,
        })
    }
}

fn should_ignore_color(filters: &[Box<dyn Filter>], rgb: (u8, u8, u8)) -> bool {
    let hsl = rgb_to_hsl(rgb);
    filters.iter().any(|filter| !filter.is_allowed(rgb, hsl))
}

fn rgb_to_hsl(rgb: (u8, u8, u8)) -> (f32, f32, f32) {
    let raw = palette::Srgb::from_components(rgb);
    let raw_float: palette::Srgb<f32> = raw.into_format();
    let hsl: palette::Hsl = raw_float.into_color();
    let (h, s, l) = hsl.into_components();

    (h.into_positive_degrees(), s, l)
}
