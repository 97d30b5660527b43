use crate::{
    error::{Error, Result},
    histogram::ColorPoint,
    swatch::Swatch,
};
use std::iter;

const COMPONENT_NAMES: [&str; 3] = ["red", "green", "blue"];

/// Median cut quantizer that divides a set of distinct colors into a fixed, power-of-two number of regions.
///
/// Every region is split in two at the median of its widest color channel until the requested number of regions is
/// reached. The split balances the number of distinct colors on each side, not the number of pixels. Each final region
/// collapses into a [`Swatch`] whose color is the plain mean of its distinct colors and whose population is the sum of
/// their pixel counts.
#[derive(Debug)]
pub struct ColorCutQuantizer {
    colors: Vec<ColorPoint>,
    max_colors: usize,
}

struct Vbox<'a> {
    colors: &'a mut [ColorPoint],
    // min, max per channel
    ranges: [(u8, u8); 3],
}

impl ColorCutQuantizer {
    /// Fails if `max_colors` isn't a power of two up to [`crate::MAX_COLOR_COUNT`], if there are no colors, if any
    /// color has no pixels, or if the pixel counts add up to more than a `u64` holds.
    pub fn new(colors: Vec<ColorPoint>, max_colors: usize) -> Result<Self> {
        if !max_colors.is_power_of_two() || max_colors > crate::MAX_COLOR_COUNT {
            return Err(Error::InvalidRegionCount(max_colors));
        }

        if colors.is_empty() {
            return Err(Error::EmptyInput);
        }

        // every region population is a partial sum of this total, so it can't overflow past this point
        colors.iter().try_fold(0u64, |total, color| {
            if color.count() == 0 {
                return Err(Error::ZeroPopulation { rgb: color.rgb() });
            }

            total.checked_add(color.count()).ok_or(Error::PopulationOverflow)
        })?;

        Ok(Self { colors, max_colors })
    }

    /// Returns exactly `max_colors` swatches, the lower half of every split before the upper half. Regions that end up
    /// without any colors are returned as [`Swatch::placeholder`].
    pub fn get_quantized_colors(mut self) -> Vec<Swatch> {
        tracing::debug!(
            colors = self.colors.len(),
            regions = self.max_colors,
            "Quantizing colors"
        );

        let mut swatches = Vec::with_capacity(self.max_colors);
        Vbox::new(&mut self.colors).quantize(self.max_colors, 0, &mut swatches);

        swatches
    }
}

/// Quantize `colors` into `regions` swatches. See [`ColorCutQuantizer`].
pub fn quantize(colors: &[ColorPoint], regions: usize) -> Result<Vec<Swatch>> {
    Ok(ColorCutQuantizer::new(colors.to_vec(), regions)?.get_quantized_colors())
}

impl<'a> Vbox<'a> {
    fn new(colors: &'a mut [ColorPoint]) -> Self {
        // compute the boundaries of the Vbox to tightly fit around the colors within it
        let mut ranges = [(u8::MAX, u8::MIN); 3];

        for color in colors.iter() {
            for (channel, (min, max)) in ranges.iter_mut().enumerate() {
                let value = color.channel(channel);
                *min = (*min).min(value);
                *max = (*max).max(value);
            }
        }

        Self { colors, ranges }
    }

    fn quantize(self, regions: usize, depth: u32, swatches: &mut Vec<Swatch>) {
        if self.colors.is_empty() {
            // an earlier split put every color on the other side
            tracing::trace!(depth, regions, "Filling empty region with placeholders");
            swatches.extend(iter::repeat(Swatch::placeholder()).take(regions));
            return;
        }

        if regions == 1 {
            swatches.push(self.get_average_color());
            return;
        }

        let (left, right) = self.split_box(depth);

        left.quantize(regions / 2, depth + 1, swatches);
        right.quantize(regions / 2, depth + 1, swatches);
    }

    fn split_box(self, depth: u32) -> (Vbox<'a>, Vbox<'a>) {
        let longest_dimension = self.get_longest_dimension();
        let colors = self.colors;

        // sort the colors by the longest dimension so the median can be read off the middle
        colors.sort_by_key(|color| color.channel(longest_dimension));

        let median = find_doubled_median(colors, longest_dimension);
        let split_point = colors.partition_point(|color| 2 * color.channel(longest_dimension) as u16 <= median);

        tracing::trace!(
            depth,
            component = COMPONENT_NAMES[longest_dimension],
            median = median as f32 / 2.0,
            lower = split_point,
            upper = colors.len() - split_point,
            "Splitting region"
        );

        let (lower, upper) = colors.split_at_mut(split_point);
        (Vbox::new(lower), Vbox::new(upper))
    }

    fn range(&self, channel: usize) -> u8 {
        let (min, max) = self.ranges[channel];
        max - min
    }

    /// The channel with the greatest range. Later channels win ties, so blue beats green beats red.
    fn get_longest_dimension(&self) -> usize {
        (1..3).fold(0, |longest, channel| {
            if self.range(channel) >= self.range(longest) {
                channel
            } else {
                longest
            }
        })
    }

    fn get_average_color(&self) -> Swatch {
        // every distinct color counts once towards the mean, while the population sums the pixel counts
        let (population, red_sum, green_sum, blue_sum) =
            self.colors
                .iter()
                .fold((0, 0, 0, 0), |(population, red_sum, green_sum, blue_sum), color| {
                    let (r, g, b) = color.rgb();

                    (
                        population + color.count(),
                        red_sum + r as u64,
                        green_sum + g as u64,
                        blue_sum + b as u64,
                    )
                });

        // integer division truncates, and a mean of u8 values always fits back in a u8
        let len = self.colors.len() as u64;
        let rgb = (
            (red_sum / len) as u8,
            (green_sum / len) as u8,
            (blue_sum / len) as u8,
        );

        Swatch::new(rgb, population)
    }
}

/// Twice the median of a channel over colors sorted by that channel. Doubling keeps an even-length median, the mean of
/// the two middle values, an exact integer.
fn find_doubled_median(sorted: &[ColorPoint], channel: usize) -> u16 {
    let mid = sorted.len() / 2;
    let upper = sorted[mid].channel(channel) as u16;

    if sorted.len() % 2 == 1 {
        2 * upper
    } else {
        sorted[mid - 1].channel(channel) as u16 + upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(colors: &[((u8, u8, u8), u64)]) -> Vec<ColorPoint> {
        colors.iter().map(|&(rgb, count)| ColorPoint::new(rgb, count)).collect()
    }

    fn four_colors() -> Vec<ColorPoint> {
        points(&[
            ((0, 0, 0), 10),
            ((255, 255, 255), 10),
            ((128, 0, 0), 5),
            ((0, 128, 0), 5),
        ])
    }

    #[test]
    fn invalid_region_counts() {
        for regions in [0, 3, 6, 12, crate::MAX_COLOR_COUNT * 2, 1usize << (usize::BITS - 1)] {
            assert_eq!(
                ColorCutQuantizer::new(four_colors(), regions).unwrap_err(),
                Error::InvalidRegionCount(regions)
            );
        }
    }

    #[test]
    fn largest_region_count() {
        let swatches = quantize(&points(&[((1, 2, 3), 1)]), crate::MAX_COLOR_COUNT).unwrap();

        assert_eq!(swatches.len(), crate::MAX_COLOR_COUNT);
        assert_eq!(swatches[0], Swatch::new((1, 2, 3), 1));
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert_eq!(
            ColorCutQuantizer::new(points(&[((1, 1, 1), 3), ((2, 2, 2), 0)]), 2).unwrap_err(),
            Error::ZeroPopulation { rgb: (2, 2, 2) }
        );
    }

    #[test]
    fn overflowing_population_is_rejected() {
        assert_eq!(
            ColorCutQuantizer::new(points(&[((1, 1, 1), u64::MAX), ((2, 2, 2), 1)]), 2).unwrap_err(),
            Error::PopulationOverflow
        );

        let swatches = quantize(&points(&[((1, 1, 1), u64::MAX - 1), ((2, 2, 2), 1)]), 1).unwrap();
        assert_eq!(swatches, vec![Swatch::new((1, 1, 1), u64::MAX)]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            ColorCutQuantizer::new(Vec::new(), 4).unwrap_err(),
            Error::EmptyInput
        );
    }

    #[test]
    fn single_region_is_unweighted_mean() {
        let swatches = quantize(&points(&[((0, 0, 0), 1000), ((100, 0, 0), 1)]), 1).unwrap();
        assert_eq!(swatches, vec![Swatch::new((50, 0, 0), 1001)]);
    }

    #[test]
    fn mean_truncates() {
        let swatches = quantize(&points(&[((0, 1, 2), 1), ((1, 2, 4), 1)]), 1).unwrap();
        assert_eq!(swatches, vec![Swatch::new((0, 1, 3), 2)]);
    }

    #[test]
    fn two_regions_split_on_blue_tie() {
        // every channel spans 0..=255, so blue wins the tie and the median of blue is 0
        let swatches = quantize(&four_colors(), 2).unwrap();

        assert_eq!(
            swatches,
            vec![
                Swatch::new((42, 42, 0), 20),
                Swatch::new((255, 255, 255), 10),
            ]
        );
    }

    #[test]
    fn four_regions() {
        let swatches = quantize(&four_colors(), 4).unwrap();

        assert_eq!(
            swatches,
            vec![
                Swatch::new((64, 0, 0), 15),
                Swatch::new((0, 128, 0), 5),
                Swatch::new((255, 255, 255), 10),
                Swatch::placeholder(),
            ]
        );
    }

    #[test]
    fn identical_colors_fill_with_placeholders() {
        let swatches = quantize(&points(&[((50, 50, 50), 640)]), 8).unwrap();

        assert_eq!(swatches.len(), 8);
        assert_eq!(swatches[0], Swatch::new((50, 50, 50), 640));
        assert!(swatches[1..].iter().all(|&swatch| swatch == Swatch::placeholder()));
    }

    #[test]
    fn even_count_median_is_midpoint() {
        // red values 0, 10, 20, 30 with a median of 15
        let swatches = quantize(
            &points(&[((30, 0, 0), 1), ((0, 0, 0), 2), ((20, 0, 0), 3), ((10, 0, 0), 4)]),
            2,
        )
        .unwrap();

        assert_eq!(
            swatches,
            vec![Swatch::new((5, 0, 0), 6), Swatch::new((25, 0, 0), 4)]
        );
    }

    #[test]
    fn odd_count_median_goes_to_lower_half() {
        let swatches = quantize(&points(&[((9, 0, 0), 1), ((5, 0, 0), 1), ((0, 0, 0), 1)]), 2).unwrap();

        assert_eq!(
            swatches,
            vec![Swatch::new((2, 0, 0), 2), Swatch::new((9, 0, 0), 1)]
        );
    }

    #[test]
    fn split_balances_distinct_colors_not_pixels() {
        let swatches = quantize(
            &points(&[((0, 0, 0), 1_000_000), ((1, 0, 0), 1), ((2, 0, 0), 1), ((3, 0, 0), 1)]),
            2,
        )
        .unwrap();

        assert_eq!(
            swatches,
            vec![Swatch::new((0, 0, 0), 1_000_001), Swatch::new((2, 0, 0), 2)]
        );
    }

    #[test]
    fn longest_dimension() {
        let mut colors = points(&[((0, 10, 0), 1), ((40, 0, 20), 1)]);
        assert_eq!(Vbox::new(&mut colors).get_longest_dimension(), 0);

        let mut colors = points(&[((0, 0, 0), 1), ((40, 40, 20), 1)]);
        assert_eq!(Vbox::new(&mut colors).get_longest_dimension(), 1);

        let mut colors = points(&[((7, 7, 7), 1)]);
        assert_eq!(Vbox::new(&mut colors).get_longest_dimension(), 2);
    }

    #[test]
    fn weights_are_conserved() {
        let colors = four_colors();
        let total: u64 = colors.iter().map(|color| color.count()).sum();

        for regions in [1, 2, 4, 8, 16, 32] {
            let swatches = quantize(&colors, regions).unwrap();
            assert_eq!(swatches.len(), regions);
            assert_eq!(swatches.iter().map(|swatch| swatch.population()).sum::<u64>(), total);
        }
    }
}
