//! Similarity primitives shared by scoring, formation and statistics
//!
//! Every function short-circuits degenerate inputs (zero norms, empty sets,
//! mismatched lengths) to 0.0 rather than dividing by zero.

use std::collections::HashSet;
use std::hash::Hash;

/// Cosine similarity `dot / (|a| |b|)`
///
/// Returns 0.0 if either norm is zero or the lengths differ.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denominator = norm_a * norm_b;
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`, 0.0 for an empty union
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Overlap relative to the larger set: `|A ∩ B| / max(|A|, |B|)`
pub fn overlap_of_larger<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / larger as f64
}

/// Euclidean distance, 0.0 for mismatched lengths
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Per-dimension mean of a set of equal-length vectors
///
/// Returns an empty vector for an empty input.
pub fn centroid<'a, I>(vectors: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut sums: Vec<f64> = Vec::new();
    let mut count = 0usize;

    for vector in vectors {
        if sums.is_empty() {
            sums = vec![0.0; vector.len()];
        }
        for (sum, value) in sums.iter_mut().zip(vector) {
            *sum += value;
        }
        count += 1;
    }

    if count > 0 {
        for sum in sums.iter_mut() {
            *sum /= count as f64;
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.8, 0.8, 0.8, 0.2, 0.6, 0.5];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.5]), 0.0);
        assert_eq!(cosine(&[1.0, 0.5], &[1.0]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&["Rock", "Pop"]), &set(&["Rock", "Jazz"])), 1.0 / 3.0);
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["Rock"]), &set(&["Rock"])), 1.0);
    }

    #[test]
    fn test_overlap_of_larger() {
        let a = set(&["Adele", "Drake", "SZA"]);
        let b = set(&["Drake"]);
        assert!((overlap_of_larger(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(overlap_of_larger(&set(&[]), &set(&[])), 0.0);
    }

    #[test]
    fn test_euclidean() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_centroid() {
        let a = [0.0, 1.0];
        let b = [1.0, 0.0];
        assert_eq!(centroid([&a[..], &b[..]]), vec![0.5, 0.5]);
        assert!(centroid(std::iter::empty::<&[f64]>()).is_empty());
    }
}
