use nalgebra::{Matrix3, Vector3};

/// A trait used to implement the one-dimensional projection that orders a palette for display.
///
/// See [`crate::PaletteBuilder::projection`] on how to replace the default [`PrincipalAxis`] projection.
pub trait Projection {
    /// Return one score per color, in the same order as the colors. Colors are displayed in ascending score order.
    fn project(&self, colors: &[(u8, u8, u8)]) -> Vec<f64>;
}

/// Projects colors onto the axis along which they vary the most.
///
/// The axis is the eigenvector of the largest eigenvalue of the colors' covariance matrix, with its sign chosen so
/// its largest coefficient is positive. Scores are the colors' coordinates along the axis, relative to their mean.
/// When there are fewer than two colors or all of them are identical, every score is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalAxis;

impl PrincipalAxis {
    /// The mean of the colors and the unit principal axis, or `None` if the colors don't vary at all.
    pub fn fit(colors: &[(u8, u8, u8)]) -> Option<(Vector3<f64>, Vector3<f64>)> {
        if colors.len() < 2 {
            return None;
        }

        let n = colors.len() as f64;
        let points = colors.iter().map(|&rgb| to_vector(rgb)).collect::<Vec<_>>();

        let mean = points.iter().fold(Vector3::zeros(), |sum, point| sum + point) / n;
        let covariance = points.iter().fold(Matrix3::<f64>::zeros(), |sum, point| {
            let deviation = point - mean;
            sum + deviation * deviation.transpose()
        }) / n;

        if covariance.trace() <= f64::EPSILON {
            return None;
        }

        let eigen = covariance.symmetric_eigen();
        let mut axis: Vector3<f64> = eigen.eigenvectors.column(eigen.eigenvalues.imax()).into_owned();

        // eigenvectors have no inherent sign
        if axis[axis.iamax()] < 0.0 {
            axis = -axis;
        }

        Some((mean, axis))
    }
}

impl Projection for PrincipalAxis {
    fn project(&self, colors: &[(u8, u8, u8)]) -> Vec<f64> {
        match Self::fit(colors) {
            Some((mean, axis)) => colors
                .iter()
                .map(|&rgb| (to_vector(rgb) - mean).dot(&axis))
                .collect(),
            None => vec![0.0; colors.len()],
        }
    }
}

/// The permutation that sorts `colors` by ascending projection score. Equal scores keep their original order.
pub fn order(colors: &[(u8, u8, u8)], projection: &dyn Projection) -> Vec<usize> {
    let scores = projection.project(colors);
    debug_assert_eq!(scores.len(), colors.len(), "projection must score every color");

    let score = |i: usize| scores.get(i).copied().unwrap_or_default();

    let mut indices = (0..colors.len()).collect::<Vec<_>>();
    indices.sort_by(|&lhs, &rhs| score(lhs).total_cmp(&score(rhs)));

    indices
}

fn to_vector((r, g, b): (u8, u8, u8)) -> Vector3<f64> {
    Vector3::new(r as f64, g as f64, b as f64)
}
