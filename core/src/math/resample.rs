use crate::prelude::{PrepError, PrepResult};
use ndarray::{Array2, Axis};

/// Resample `data` along `axis` to `target` samples with anti-aliasing.
///
/// Downsampling first applies a Gaussian low-pass along the axis with
/// `sigma = (scale - 1) / 2` (the standard anti-aliasing width for a scale
/// factor `len / target`), then linearly interpolates at the output sample
/// centers. Upsampling interpolates directly.
pub fn resample_axis(data: &Array2<f32>, axis: Axis, target: usize) -> PrepResult<Array2<f32>> {
    if target == 0 {
        return Err(PrepError::InvalidInput(
            "resample target must be at least 1".into(),
        ));
    }
    let len = data.len_of(axis);
    if len == 0 {
        return Err(PrepError::ShapeMismatch(format!(
            "cannot resample empty axis {}",
            axis.index()
        )));
    }
    if len == target {
        return Ok(data.clone());
    }

    let scale = len as f32 / target as f32;
    let sigma = ((scale - 1.0) / 2.0).max(0.0);
    let filtered = if sigma > 0.0 {
        gaussian_filter_axis(data, axis, sigma)
    } else {
        data.clone()
    };

    let mut shape = data.raw_dim();
    shape[axis.index()] = target;
    let mut out = Array2::zeros(shape);

    for (lane, mut dst) in filtered.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        for (j, slot) in dst.iter_mut().enumerate() {
            // Map output sample centers into input coordinates.
            let x = ((j as f32 + 0.5) * scale - 0.5).clamp(0.0, (len - 1) as f32);
            let lo = x.floor() as usize;
            let hi = (lo + 1).min(len - 1);
            let frac = x - lo as f32;
            *slot = lane[lo] * (1.0 - frac) + lane[hi] * frac;
        }
    }

    Ok(out)
}

/// Separable Gaussian smoothing along one axis, edge samples clamped.
fn gaussian_filter_axis(data: &Array2<f32>, axis: Axis, sigma: f32) -> Array2<f32> {
    let radius = (4.0 * sigma).ceil() as isize;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    for k in -radius..=radius {
        kernel.push((-(k as f32).powi(2) / (2.0 * sigma * sigma)).exp());
    }
    let norm: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= norm;
    }

    let len = data.len_of(axis) as isize;
    let mut out = data.clone();
    for (lane, mut dst) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        for (i, slot) in dst.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (w, k) in kernel.iter().zip(-radius..=radius) {
                let idx = (i as isize + k).clamp(0, len - 1) as usize;
                acc += w * lane[idx];
            }
            *slot = acc;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downsample_reaches_target_length() {
        let data = Array2::from_shape_fn((4, 64), |(_, j)| (j as f32).sin());
        let out = resample_axis(&data, Axis(1), 16).unwrap();
        assert_eq!(out.dim(), (4, 16));
    }

    #[test]
    fn upsample_reaches_target_length() {
        let data = Array2::from_shape_fn((4, 16), |(_, j)| j as f32);
        let out = resample_axis(&data, Axis(1), 64).unwrap();
        assert_eq!(out.dim(), (4, 64));
    }

    #[test]
    fn matching_length_is_identity() {
        let data = Array2::from_shape_fn((3, 8), |(i, j)| (i + j) as f32);
        let out = resample_axis(&data, Axis(1), 8).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn constant_input_stays_constant() {
        let data = Array2::from_elem((2, 48), 7.5);
        let out = resample_axis(&data, Axis(1), 12).unwrap();
        for v in out.iter() {
            assert!((v - 7.5).abs() < 1e-4);
        }
    }
}
