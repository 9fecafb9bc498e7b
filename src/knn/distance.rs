//! Distance metrics used to rank training points against a query.
//!
//! All functions accept feature slices of any float type and accumulate in `f64`.
//! They assume both slices have the same length; the classifier checks this
//! before any distance is computed.

use num_traits::{AsPrimitive, Float};
use serde::{Deserialize, Serialize};

/// Distance metric used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnnDistance {
    /// Straight-line distance, `sqrt(sum((a_i - b_i)^2))`.
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
    /// `(sum(|a_i - b_i|^p))^(1/p)`; `p` must be between 1 and `i32::MAX`.
    Minkowski { p: u32 },
    /// `1 - cos(a, b)`.
    Cosine,
}

impl KnnDistance {
    /// Computes the distance between `a` and `b` under this metric.
    pub fn compute<F>(&self, a: &[F], b: &[F]) -> f64
    where
        F: Float + AsPrimitive<f64>,
    {
        match *self {
            KnnDistance::Euclidean => euclidean_distance(a, b),
            KnnDistance::Manhattan => manhattan_distance(a, b),
            KnnDistance::Minkowski { p } => minkowski_distance(a, b, p),
            KnnDistance::Cosine => cosine_distance(a, b),
        }
    }
}

/// Calculates the dot product of two vectors.
fn dot_product<F: Float + AsPrimitive<f64>>(a: &[F], b: &[F]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x.as_() * y.as_()).sum()
}

/// Calculates the magnitude (L2 norm) of a vector.
fn magnitude<F: Float + AsPrimitive<f64>>(vec: &[F]) -> f64 {
    vec.iter()
        .map(|x| {
            let v: f64 = x.as_();
            v * v
        })
        .sum::<f64>()
        .sqrt()
}

pub fn euclidean_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    // Kept separate from minkowski so that exact squares stay exact: powf(0.5) is not sqrt.
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x.as_() - y.as_();
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

pub fn manhattan_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| (x.as_() - y.as_()).abs())
        .sum()
}

pub fn minkowski_distance<F>(a: &[F], b: &[F], p: u32) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    match p {
        1 => manhattan_distance(a, b),
        2 => euclidean_distance(a, b),
        _ => {
            // Scaled by the largest difference so that |d|^p cannot overflow for large p.
            let largest = a.iter().zip(b).fold(0.0_f64, |m, (x, y)| {
                let d = (x.as_() - y.as_()).abs();
                if d.is_nan() || d > m { d } else { m }
            });
            if largest == 0.0 || !largest.is_finite() {
                return largest;
            }
            let order = p as f64;
            let sum_of_powers: f64 = a
                .iter()
                .zip(b)
                .map(|(x, y)| ((x.as_() - y.as_()).abs() / largest).powf(order))
                .sum();
            largest * sum_of_powers.powf(1.0 / order)
        }
    }
}

/// Cosine distance, `1 - cosine similarity`.
///
/// Two zero vectors are at distance 0; a zero vector and a non-zero vector are at distance 1.
pub fn cosine_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    if a.is_empty() {
        return 0.0;
    }

    let mag_a = magnitude(a);
    let mag_b = magnitude(b);

    if mag_a == 0.0 || mag_b == 0.0 {
        return if mag_a == mag_b { 0.0 } else { 1.0 };
    }

    let similarity = dot_product(a, b) / (mag_a * mag_b);
    // Rounding can push the ratio just outside [-1, 1].
    1.0 - similarity.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_euclidean_distance_is_exact_for_pythagorean_triple() {
        let dist = euclidean_distance(&[0.0_f64, 0.0], &[3.0, 4.0]);
        assert_eq!(dist, 5.0);
    }

    #[test]
    fn test_identical_points_are_at_distance_zero() {
        let p = [5.1_f64, 3.5, 1.4, 0.2];
        assert_eq!(euclidean_distance(&p, &p), 0.0);
        assert_eq!(manhattan_distance(&p, &p), 0.0);
        assert_eq!(minkowski_distance(&p, &p, 3), 0.0);
        assert!(cosine_distance(&p, &p).abs() < EPSILON);
    }

    #[test]
    fn test_minkowski_distance() {
        let vec_a = [1.0_f64, 2.0, 3.0];
        let vec_b = [4.0_f64, 5.0, 6.0];

        // |1-4| + |2-5| + |3-6| = 9
        let dist1 = minkowski_distance(&vec_a, &vec_b, 1);
        assert!((dist1 - 9.0).abs() < EPSILON, "p=1 expected 9.0, got {}", dist1);

        // sqrt(9 + 9 + 9)
        let dist2 = minkowski_distance(&vec_a, &vec_b, 2);
        let expected2 = 27.0_f64.sqrt();
        assert!((dist2 - expected2).abs() < EPSILON, "p=2 expected {}, got {}", expected2, dist2);

        // cbrt(27 + 27 + 27)
        let dist3 = minkowski_distance(&vec_a, &vec_b, 3);
        let expected3 = 81.0_f64.cbrt();
        assert!((dist3 - expected3).abs() < EPSILON, "p=3 expected {}, got {}", expected3, dist3);

        let empty: [f64; 0] = [];
        assert_eq!(minkowski_distance(&empty, &empty, 2), 0.0);
    }

    #[test]
    fn test_minkowski_distance_large_order_stays_finite_and_ordered() {
        for p in [400, u32::MAX] {
            let near = minkowski_distance(&[0.0_f64], &[1.0], p);
            let far = minkowski_distance(&[0.0_f64], &[10.0], p);
            let farther = minkowski_distance(&[0.0_f64], &[20.0], p);
            assert!((near - 1.0).abs() < EPSILON, "p={} near={}", p, near);
            assert!((far - 10.0).abs() < EPSILON, "p={} far={}", p, far);
            assert!(far < farther, "p={} {} >= {}", p, far, farther);
        }

        // Large orders approach the largest coordinate difference.
        let dist = minkowski_distance(&[0.0_f64, 0.0], &[3.0, 4.0], 400);
        assert!(dist >= 4.0 && dist < 4.0 + 1e-3, "got {}", dist);
        assert!(minkowski_distance(&[0.0_f64], &[f64::NAN], 5).is_nan());
        assert_eq!(minkowski_distance(&[0.0_f64], &[f64::INFINITY], 5), f64::INFINITY);
    }

    #[test]
    fn test_cosine_distance_edge_cases() {
        assert!((cosine_distance(&[1.0_f64, 0.0], &[0.0, 1.0]) - 1.0).abs() < EPSILON);
        assert!((cosine_distance(&[1.0_f64, 0.0], &[-1.0, 0.0]) - 2.0).abs() < EPSILON);
        assert!((cosine_distance(&[2.0_f64, 2.0], &[1.0, 1.0])).abs() < EPSILON);
        assert_eq!(cosine_distance(&[0.0_f64, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_distance(&[0.0_f64, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[test]
    fn test_metric_dispatch_and_f32_features() {
        let a = [0.0_f32, 0.0];
        let b = [3.0_f32, 4.0];
        assert_eq!(KnnDistance::Euclidean.compute(&a, &b), 5.0);
        assert_eq!(KnnDistance::Manhattan.compute(&a, &b), 7.0);
        assert_eq!(KnnDistance::Minkowski { p: 2 }.compute(&a, &b), 5.0);
        assert_eq!(KnnDistance::default(), KnnDistance::Euclidean);
    }

    #[test]
    fn test_metric_serde_names() {
        let json = serde_json::to_string(&KnnDistance::Minkowski { p: 3 }).unwrap();
        assert_eq!(json, r#"{"minkowski":{"p":3}}"#);
        let parsed: KnnDistance = serde_json::from_str(r#""manhattan""#).unwrap();
        assert_eq!(parsed, KnnDistance::Manhattan);
    }
}
