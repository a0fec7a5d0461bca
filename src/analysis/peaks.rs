use std::ops::Range;

/// Indices of local maxima: strictly above the left neighbour and not below
/// the right one. End points never qualify.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    (1..values.len().saturating_sub(1))
        .filter(|&i| values[i] > values[i - 1] && values[i] >= values[i + 1])
        .collect()
}

/// Indices of local maxima or minima, in order.
pub fn local_extrema(values: &[f64]) -> Vec<usize> {
    (1..values.len().saturating_sub(1))
        .filter(|&i| {
            let (l, c, r) = (values[i - 1], values[i], values[i + 1]);
            (c > l && c >= r) || (c < l && c <= r)
        })
        .collect()
}

/// Index of the largest value within `range`.
pub fn argmax(values: &[f64], range: Range<usize>) -> Option<usize> {
    let end = range.end.min(values.len());
    (range.start..end).max_by(|&a, &b| values[a].total_cmp(&values[b]))
}

/// Index of the smallest value within `range`.
pub fn argmin(values: &[f64], range: Range<usize>) -> Option<usize> {
    let end = range.end.min(values.len());
    (range.start..end).min_by(|&a, &b| values[a].total_cmp(&values[b]))
}

/// Sample range covered by the closed time interval `[lo, hi]`, for a
/// non-decreasing time axis.
pub fn time_range(time: &[f64], lo: f64, hi: f64) -> Range<usize> {
    let start = time.partition_point(|&t| t < lo);
    let end = time.partition_point(|&t| t <= hi);
    start..end.max(start)
}

/// The two most prominent local maxima, strongest first.
pub fn two_largest_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = local_maxima(values);
    peaks.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    peaks.truncate(2);
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_extrema_in_order() {
        let v = [0.0, 2.0, 1.0, -1.0, 0.5, 0.2];
        assert_eq!(local_maxima(&v), vec![1, 4]);
        assert_eq!(local_extrema(&v), vec![1, 3, 4]);
    }

    #[test]
    fn arg_extrema_respect_range() {
        let v = [5.0, 1.0, 3.0, -2.0, 9.0];
        assert_eq!(argmax(&v, 1..4), Some(2));
        assert_eq!(argmin(&v, 0..3), Some(1));
        assert_eq!(argmax(&v, 3..3), None);
        assert_eq!(argmax(&v, 3..99), Some(4));
    }

    #[test]
    fn time_range_is_inclusive() {
        let t = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(time_range(&t, 1.0, 2.0), 1..3);
        assert_eq!(time_range(&t, 5.0, 6.0), 4..4);
    }

    #[test]
    fn strongest_peaks_first() {
        let v = [0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0];
        assert_eq!(two_largest_maxima(&v), vec![3, 5]);
    }
}
