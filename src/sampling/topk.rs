use ndarray::{Array2, ArrayView2, Axis, Zip};

use crate::error::{SamplingError, SamplingResult};

/// Number of nodes a configured `k` asks for in a segment of `rows` nodes.
/// A negative `k` counts from the end: `-1` keeps all but one.
pub fn effective_k(k: i64, rows: usize) -> i64 {
    if k < 0 { k + rows as i64 } else { k }
}

/// Per column, keep every row scoring at least the `k`-th largest value.
///
/// Rows tied with the threshold are all kept, so a column may hold more than
/// `k` selected rows.
pub fn top_k_mask(scores: ArrayView2<'_, f64>, k: i64) -> SamplingResult<Array2<bool>> {
    let rows = scores.nrows();
    let wanted = effective_k(k, rows).min(rows as i64);
    if wanted < 1 {
        return Err(SamplingError::InvalidConfig(format!(
            "sample size {k} selects no nodes from a segment of {rows}"
        )));
    }
    let rank = (wanted - 1) as usize;

    let mut mask = Array2::from_elem(scores.dim(), false);
    for (column, mut selected) in scores.axis_iter(Axis(1)).zip(mask.axis_iter_mut(Axis(1))) {
        let mut sorted = column.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let threshold = sorted[rank];
        Zip::from(&mut selected)
            .and(&column)
            .for_each(|keep, &value| *keep = value.total_cmp(&threshold).is_ge());
    }
    Ok(mask)
}
