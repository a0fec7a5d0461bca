use super::window::WindowKind;

/// Time derivative on a possibly non-uniform grid.
///
/// Second-order central differences inside, first-order one-sided
/// differences at both ends. Needs at least two samples; shorter input
/// yields an empty vector.
///
/// Logs may repeat a timestamp after a restart. Each run of equal times is
/// represented by its last sample, and every sample of the run gets that
/// derivative. When all timestamps coincide the result is `NaN` throughout.
pub fn gradient(values: &[f64], time: &[f64]) -> Vec<f64> {
    let n = values.len().min(time.len());
    if n < 2 {
        return Vec::new();
    }
    let keep: Vec<usize> = (0..n).filter(|&i| i + 1 == n || time[i + 1] != time[i]).collect();
    if keep.len() == n {
        return distinct_gradient(&values[..n], &time[..n]);
    }
    if keep.len() < 2 {
        return vec![f64::NAN; n];
    }
    let v: Vec<f64> = keep.iter().map(|&i| values[i]).collect();
    let t: Vec<f64> = keep.iter().map(|&i| time[i]).collect();
    let d = distinct_gradient(&v, &t);

    let mut out = Vec::with_capacity(n);
    let mut run = 0;
    for i in 0..n {
        out.push(d[run]);
        if keep[run] == i {
            run += 1;
        }
    }
    out
}

fn distinct_gradient(values: &[f64], time: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / (time[1] - time[0]));
    for i in 1..n - 1 {
        let hs = time[i] - time[i - 1];
        let hd = time[i + 1] - time[i];
        let num =
            hs * hs * values[i + 1] + (hd * hd - hs * hs) * values[i] - hd * hd * values[i - 1];
        out.push(num / (hs * hd * (hd + hs)));
    }
    out.push((values[n - 1] - values[n - 2]) / (time[n - 1] - time[n - 2]));
    out
}

/// Trapezoidal integral of `values` over `x`.
pub fn trapezoid(values: &[f64], x: &[f64]) -> f64 {
    values
        .windows(2)
        .zip(x.windows(2))
        .map(|(v, x)| 0.5 * (v[0] + v[1]) * (x[1] - x[0]))
        .sum()
}

/// Normalised moving-window average.
///
/// `width` is rounded up to an odd number of samples. Near the edges only the
/// samples that exist contribute and the weights are renormalised, so the
/// output has the input's length and a constant signal is left untouched.
pub fn smooth(values: &[f64], width: usize, kind: WindowKind) -> Vec<f64> {
    if width <= 1 || values.len() < 2 {
        return values.to_vec();
    }
    let width = if width % 2 == 0 { width + 1 } else { width };
    let weights = kind.weights(width);
    let half = width / 2;

    (0..values.len())
        .map(|i| {
            let mut acc = 0.0;
            let mut norm = 0.0;
            for (k, w) in weights.iter().enumerate() {
                let Some(j) = (i + k).checked_sub(half) else {
                    continue;
                };
                if let Some(v) = values.get(j) {
                    acc += w * v;
                    norm += w;
                }
            }
            if norm > 0.0 {
                acc / norm
            } else {
                values[i]
            }
        })
        .collect()
}
