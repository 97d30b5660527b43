use crate::error::{Error, Result};
use image::{GenericImageView, Pixel, RgbImage};
use std::collections::HashMap;

/// A distinct color and the number of pixels that have it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorPoint {
    rgb: (u8, u8, u8),
    count: u64,
}

/// The distinct colors of an image with their pixel counts.
///
/// Every color appears at most once, every count is positive and the counts add up to no more than `u64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<ColorPoint>", into = "Vec<ColorPoint>")
)]
pub struct Histogram {
    points: Vec<ColorPoint>,
    index: HashMap<(u8, u8, u8), usize>,
    population: u64,
}

impl ColorPoint {
    pub fn new(rgb: (u8, u8, u8), count: u64) -> ColorPoint {
        Self { rgb, count }
    }

    /// Build a point from unchecked channel values, rejecting channels above 255 and zero counts.
    pub fn try_from_channels(count: u64, [r, g, b]: [u32; 3]) -> Result<ColorPoint> {
        let channel = |value: u32| u8::try_from(value).map_err(|_| Error::ChannelOutOfRange(value));
        let rgb = (channel(r)?, channel(g)?, channel(b)?);

        if count == 0 {
            return Err(Error::ZeroPopulation { rgb });
        }

        Ok(Self::new(rgb, count))
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        self.rgb
    }

    pub fn count(self) -> u64 {
        self.count
    }

    pub(crate) fn channel(self, channel: usize) -> u8 {
        match channel {
            0 => self.rgb.0,
            1 => self.rgb.1,
            _ => self.rgb.2,
        }
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from `(count, color)` pairs. Repeated colors are merged by summing their counts.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, (u8, u8, u8))>,
    {
        let mut histogram = Self::new();
        for (count, rgb) in counts {
            histogram.add(rgb, count)?;
        }

        Ok(histogram)
    }

    /// Count the distinct colors of an image. Any alpha channel is dropped.
    ///
    /// To count only a part of an image, pass the dereferenced view of it from [`GenericImageView::view`]:
    ///
    /// ```
    /// use colorcut::{image::{GenericImageView, RgbImage}, Histogram};
    ///
    /// let image = RgbImage::new(8, 8);
    /// let histogram = Histogram::from_image(&*image.view(0, 0, 4, 4));
    /// assert_eq!(histogram.total_population(), 16);
    /// ```
    pub fn from_image<I>(image: &I) -> Self
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let mut histogram = Self::new();
        for (_, _, pixel) in image.pixels() {
            let rgb = pixel.to_rgb();
            histogram.count_pixel((rgb.0[0], rgb.0[1], rgb.0[2]));
        }

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            colors = histogram.len(),
            "Counted image colors"
        );

        histogram
    }

    pub fn add(&mut self, rgb: (u8, u8, u8), count: u64) -> Result<()> {
        if count == 0 {
            return Err(Error::ZeroPopulation { rgb });
        }

        self.population = self
            .population
            .checked_add(count)
            .ok_or(Error::PopulationOverflow)?;
        self.increment(rgb, count);

        Ok(())
    }

    /// Keep only the colors the predicate accepts.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(ColorPoint) -> bool,
    {
        self.points.retain(|point| keep(*point));
        self.population = self.points.iter().map(|point| point.count).sum();
        self.index = self
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| (point.rgb, i))
            .collect();
    }

    pub fn points(&self) -> &[ColorPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_population(&self) -> u64 {
        self.population
    }

    // an image has fewer pixels than a u64 can count
    fn count_pixel(&mut self, rgb: (u8, u8, u8)) {
        self.population += 1;
        self.increment(rgb, 1);
    }

    // callers keep `population` in step, which bounds every per-color count
    fn increment(&mut self, rgb: (u8, u8, u8), count: u64) {
        match self.index.get(&rgb) {
            Some(&i) => self.points[i].count += count,
            None => {
                self.index.insert(rgb, self.points.len());
                self.points.push(ColorPoint::new(rgb, count));
            }
        }
    }
}

impl TryFrom<Vec<ColorPoint>> for Histogram {
    type Error = Error;

    fn try_from(points: Vec<ColorPoint>) -> Result<Self> {
        Self::from_counts(points.into_iter().map(|point| (point.count, point.rgb)))
    }
}

impl From<Histogram> for Vec<ColorPoint> {
    fn from(histogram: Histogram) -> Self {
        histogram.points
    }
}

/// Scale an image down with nearest-neighbour filtering so it covers at most roughly `area` pixels. Returns `None`
/// when the image is already small enough or `area` is zero.
pub fn scale_to_area(image: &RgbImage, area: u32) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    let image_area = width as u64 * height as u64;

    if area == 0 || image_area <= area as u64 {
        return None;
    }

    let scale_ratio = (area as f64 / image_area as f64).sqrt();
    let scaled_width = ((width as f64 * scale_ratio).ceil() as u32).max(1);
    let scaled_height = ((height as f64 * scale_ratio).ceil() as u32).max(1);

    tracing::debug!(
        width,
        height,
        scaled_width,
        scaled_height,
        "Scaling image down"
    );

    Some(image::imageops::resize(
        image,
        scaled_width,
        scaled_height,
        image::imageops::FilterType::Nearest,
    ))
}
