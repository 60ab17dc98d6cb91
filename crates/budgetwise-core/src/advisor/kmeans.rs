//! One-dimensional k-means
//!
//! Seeds are taken at evenly spaced quantiles of the sorted input, so the
//! result depends only on the values, never on their order or on a random
//! state.

use crate::error::{Error, Result};

const MAX_ITERATIONS: usize = 100;

/// Cluster `values` into `k` groups and return the centers, ascending
pub fn cluster_centers(values: &[f64], k: usize) -> Result<Vec<f64>> {
    if k == 0 {
        return Err(Error::InvalidData("Cluster count must be positive".into()));
    }
    if values.len() < k {
        return Err(Error::InvalidData(format!(
            "Need at least {} values to form {} clusters, got {}",
            k,
            k,
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidData("Cannot cluster non-finite values".into()));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut centers: Vec<f64> = if k == 1 {
        vec![sorted[0]]
    } else {
        (0..k)
            .map(|i| sorted[i * (sorted.len() - 1) / (k - 1)])
            .collect()
    };

    for _ in 0..MAX_ITERATIONS {
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for &value in &sorted {
            let nearest = nearest_center(&centers, value);
            sums[nearest] += value;
            counts[nearest] += 1;
        }

        // An empty cluster keeps its previous center
        let next: Vec<f64> = centers
            .iter()
            .enumerate()
            .map(|(i, &c)| if counts[i] == 0 { c } else { sums[i] / counts[i] as f64 })
            .collect();

        let converged = next == centers;
        centers = next;
        if converged {
            break;
        }
    }

    centers.sort_by(f64::total_cmp);
    Ok(centers)
}

/// Index of the closest center; ties go to the lower index
fn nearest_center(centers: &[f64], value: f64) -> usize {
    let mut best = 0;
    for (i, center) in centers.iter().enumerate().skip(1) {
        if (value - center).abs() < (value - centers[best]).abs() {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_clear_tiers() {
        let centers =
            cluster_centers(&[5.0, 6.0, 7.0, 50.0, 55.0, 60.0, 500.0, 520.0], 3).unwrap();
        assert_eq!(centers, vec![6.0, 55.0, 510.0]);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = cluster_centers(&[520.0, 6.0, 55.0, 5.0, 500.0, 60.0, 7.0, 50.0], 3).unwrap();
        let b = cluster_centers(&[5.0, 6.0, 7.0, 50.0, 55.0, 60.0, 500.0, 520.0], 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_values() {
        let centers = cluster_centers(&[10.0; 5], 3).unwrap();
        assert_eq!(centers, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_negative_values_cluster() {
        // Donations are recorded as negative amounts
        let centers = cluster_centers(&[-20.0, 10.0, 12.0, 14.0, 90.0], 3).unwrap();
        assert_eq!(centers, vec![-20.0, 12.0, 90.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(cluster_centers(&[1.0, 2.0], 3).is_err());
        assert!(cluster_centers(&[1.0, 2.0], 0).is_err());
        assert!(cluster_centers(&[1.0, f64::NAN, 3.0], 2).is_err());
    }
}
