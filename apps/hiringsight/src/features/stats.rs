//! Small descriptive-statistics helpers shared by post-processing, the summary
//! writer and the dashboard analytics.

use indexmap::IndexMap;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1). Fewer than two values yield 0.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Percentile rank of every value, 0–100. Tied values share the average of the
/// ranks they span.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1..=end
        let avg = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg / n as f64 * 100.0;
        }
        start = end;
    }
    ranks
}

/// Rounds to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Occurrence counts in descending order; ties keep first appearance.
pub fn ordered_counts<I, S>(items: I) -> IndexMap<String, usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for item in items {
        let item = item.as_ref();
        match counts.get_mut(item) {
            Some(c) => *c += 1,
            None => {
                counts.insert(item.to_string(), 1);
            }
        }
    }
    // stable, so equal counts stay in first-seen order
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Mean of `value` per group, groups in first-seen order.
pub fn grouped_means<'a, I>(pairs: I) -> IndexMap<String, f64>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut groups: IndexMap<String, (f64, usize)> = IndexMap::new();
    for (key, value) in pairs {
        match groups.get_mut(key) {
            Some((sum, n)) => {
                *sum += value;
                *n += 1;
            }
            None => {
                groups.insert(key.to_string(), (value, 1));
            }
        }
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}
