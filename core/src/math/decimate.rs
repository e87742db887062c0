use crate::math::stats::StatsHelper;
use crate::prelude::{PrepError, PrepResult};
use ndarray::{Array2, Axis, Slice};

/// Median-decimate `data` along `axis` by `factor`.
///
/// The axis is padded with the global median of the array until its length is
/// an even multiple of the factor; each group of `factor` samples collapses
/// to its median.
pub fn decimate_median(data: &Array2<f32>, axis: Axis, factor: usize) -> PrepResult<Array2<f32>> {
    if factor == 0 {
        return Err(PrepError::InvalidInput(
            "decimation factor must be at least 1".into(),
        ));
    }
    if factor == 1 {
        return Ok(data.clone());
    }

    let len = data.len_of(axis);
    if len == 0 {
        return Err(PrepError::ShapeMismatch(format!(
            "cannot decimate empty axis {}",
            axis.index()
        )));
    }

    let values: Vec<f32> = data.iter().copied().collect();
    let pad_value = StatsHelper::median(&values);
    let blocks = (len + factor - 1) / factor;

    let mut shape = data.raw_dim();
    shape[axis.index()] = blocks;
    let mut out = Array2::zeros(shape);

    let mut group = Vec::with_capacity(factor);
    for (lane, mut dst) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        for (block, slot) in dst.iter_mut().enumerate() {
            group.clear();
            for offset in 0..factor {
                let idx = block * factor + offset;
                group.push(if idx < len { lane[idx] } else { pad_value });
            }
            *slot = StatsHelper::median(&group);
        }
    }

    Ok(out)
}

/// Centered crop along `axis` to exactly `target` samples.
///
/// The crop start is `len / 2 - target / 2` (floor division); an axis shorter
/// than the target is a shape failure, fatal for the candidate.
pub fn crop_centered(data: &Array2<f32>, axis: Axis, target: usize) -> PrepResult<Array2<f32>> {
    let len = data.len_of(axis);
    let start = (len / 2).checked_sub(target / 2).ok_or_else(|| {
        PrepError::ShapeMismatch(format!(
            "axis {} has {} samples, cannot crop to {}",
            axis.index(),
            len,
            target
        ))
    })?;
    if start + target > len {
        return Err(PrepError::ShapeMismatch(format!(
            "axis {} has {} samples, cannot crop to {}",
            axis.index(),
            len,
            target
        )));
    }
    Ok(data
        .slice_axis(axis, Slice::from(start..start + target))
        .to_owned())
}
