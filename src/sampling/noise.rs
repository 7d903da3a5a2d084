use ndarray::{Array2, ArrayView2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

/// Scale applied to the per-column standard deviation when perturbing.
pub const PERTURB_SCALE: f64 = 0.1;

/// Independent standard-normal draws of the given shape.
pub fn standard_normal<R: Rng + ?Sized>(shape: (usize, usize), rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn(shape, || rng.sample(StandardNormal))
}

/// Add `N(0, 1) * 0.1 * std` noise, with `std` the sample standard deviation
/// of each column over this segment only. Segments with fewer than two rows
/// have no spread and come back unchanged.
pub fn perturb<R: Rng + ?Sized>(segment: ArrayView2<'_, f64>, rng: &mut R) -> Array2<f64> {
    let mut perturbed = segment.to_owned();
    if segment.nrows() < 2 {
        return perturbed;
    }
    let spread = segment.std_axis(Axis(0), 1.0) * PERTURB_SCALE;
    for mut row in perturbed.axis_iter_mut(Axis(0)) {
        for (value, scale) in row.iter_mut().zip(spread.iter()) {
            let draw: f64 = rng.sample(StandardNormal);
            *value += draw * scale;
        }
    }
    perturbed
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;

    #[test]
    fn constant_columns_are_left_alone() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let segment = array![[1.0, 2.0], [1.0, 4.0], [1.0, 6.0]];
        let perturbed = perturb(segment.view(), &mut rng);
        assert_eq!(perturbed.column(0).to_vec(), vec![1.0, 1.0, 1.0]);
        assert_ne!(perturbed.column(1), segment.column(1));
    }

    #[test]
    fn single_row_segment_is_unchanged() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let segment = array![[3.0, -1.0]];
        assert_eq!(perturb(segment.view(), &mut rng), segment);
    }

    #[test]
    fn noise_stays_small_relative_to_spread() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let segment = array![[0.0], [10.0], [20.0], [30.0]];
        let perturbed = perturb(segment.view(), &mut rng);
        for (before, after) in segment.iter().zip(perturbed.iter()) {
            // std is ~12.9, so the noise scale is ~1.3; 8 sigma is far outside
            assert!((before - after).abs() < 11.0);
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let a = standard_normal((3, 2), &mut Xoshiro256PlusPlus::seed_from_u64(3));
        let b = standard_normal((3, 2), &mut Xoshiro256PlusPlus::seed_from_u64(3));
        assert_eq!(a, b);
        assert_eq!(a.dim(), (3, 2));
    }
}
