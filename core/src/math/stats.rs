use ndarray::Array2;

pub struct StatsHelper;

impl StatsHelper {
    /// Median of the values; even lengths average the two middle elements.
    pub fn median(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    pub fn mean(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f32>() / samples.len() as f32
    }

    /// Population standard deviation.
    pub fn std_dev(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean = Self::mean(samples);
        let var = samples.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>()
            / samples.len() as f32;
        var.sqrt()
    }
}

/// Rescale to zero median and unit standard deviation.
///
/// Constant input has zero variance and yields non-finite values; that is a
/// defined degenerate result, flagged only at the consuming stage.
pub fn normalise(mut data: Array2<f32>) -> Array2<f32> {
    let values: Vec<f32> = data.iter().copied().collect();
    let median = StatsHelper::median(&values);
    let std = StatsHelper::std_dev(&values);
    data.mapv_inplace(|v| (v - median) / std);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(StatsHelper::median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(StatsHelper::median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(StatsHelper::median(&[]), 0.0);
    }

    #[test]
    fn std_dev_of_constant_sequence_is_zero() {
        assert_eq!(StatsHelper::std_dev(&[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn normalise_yields_zero_median_unit_std() {
        let data = Array2::from_shape_fn((16, 16), |(i, j)| (i * 7 + j * 3) as f32);
        let normalised = normalise(data);
        let values: Vec<f32> = normalised.iter().copied().collect();
        assert!(StatsHelper::median(&values).abs() < 1e-5);
        assert!((StatsHelper::std_dev(&values) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn normalise_of_constant_input_is_non_finite() {
        let data = Array2::from_elem((4, 4), 3.5);
        let normalised = normalise(data);
        assert!(normalised.iter().all(|v| !v.is_finite()));
    }
}
