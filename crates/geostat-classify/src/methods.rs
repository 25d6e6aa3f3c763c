//! Break computation for each classification method.
//!
//! Every function takes values already sorted ascending, finite, and non-empty,
//! and returns bounds where bound `i + 1` is the inclusive upper limit of
//! class `i`.

/// Relative widening applied when every value is identical.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Single class that inclusively bounds `value`.
pub(crate) fn degenerate(value: f64) -> Vec<f64> {
    let epsilon = (value.abs() * DEGENERATE_EPSILON).max(DEGENERATE_EPSILON);
    vec![value - epsilon, value + epsilon]
}

pub(crate) fn equal_interval(sorted: &[f64], class_count: usize) -> Vec<f64> {
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    if min == max {
        return degenerate(min);
    }
    let step = (max - min) / class_count as f64;
    let mut bounds: Vec<f64> = (0..=class_count)
        .map(|i| min + step * i as f64)
        .collect();
    // Pin the last bound so accumulated rounding never leaves max outside.
    bounds[class_count] = max;
    bounds
}

pub(crate) fn quantiles(sorted: &[f64], class_count: usize) -> Vec<f64> {
    let distinct = distinct_values(sorted);
    if distinct.len() <= class_count {
        return one_class_per_value(&distinct);
    }
    let last = sorted.len() - 1;
    let max = sorted[last];
    let below_max = distinct[distinct.len() - 2];
    let bounds: Vec<f64> = (0..=class_count)
        .map(|i| {
            let position = ((i * last) as f64 / class_count as f64).round() as usize;
            let bound = sorted[position.min(last)];
            // A repeated maximum keeps a class of its own.
            if i > 0 && i < class_count && bound == max {
                below_max
            } else {
                bound
            }
        })
        .collect();
    collapse(bounds)
}

/// One class per distinct value; the first class holds exactly the minimum.
fn one_class_per_value(distinct: &[f64]) -> Vec<f64> {
    match distinct {
        [] => Vec::new(),
        [only] => degenerate(*only),
        [first, ..] => std::iter::once(*first).chain(distinct.iter().copied()).collect(),
    }
}

/// Jenks natural breaks.
///
/// Dynamic program over the sorted values: `variance[l][j]` is the minimal
/// total within-class sum of squared deviations achievable splitting the
/// first `l` values into `j` classes, and `lower[l][j]` the (1-based) index
/// where the last of those classes starts. Both tables are 1-based to keep
/// the recurrence readable.
pub(crate) fn natural_breaks(sorted: &[f64], class_count: usize) -> Vec<f64> {
    let n = sorted.len();
    let classes = class_count.min(distinct_count(sorted));
    if classes <= 1 {
        return if sorted[0] == sorted[n - 1] {
            degenerate(sorted[0])
        } else {
            vec![sorted[0], sorted[n - 1]]
        };
    }

    let mut lower = vec![vec![0usize; classes + 1]; n + 1];
    let mut variance = vec![vec![0.0f64; classes + 1]; n + 1];
    // A prefix cannot be split into more classes than it has values.
    for j in 1..=classes {
        lower[1][j] = 1;
        for row in variance.iter_mut().skip(1) {
            row[j] = f64::INFINITY;
        }
    }
    variance[1][1] = 0.0;

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut weight = 0.0;
        let mut within = 0.0;
        for m in 1..=l {
            let start = l - m + 1;
            let value = sorted[start - 1];
            weight += 1.0;
            sum += value;
            sum_squares += value * value;
            within = sum_squares - (sum * sum) / weight;
            let before = start - 1;
            if before != 0 {
                for j in 2..=classes {
                    let candidate = within + variance[before][j - 1];
                    if variance[l][j] >= candidate {
                        lower[l][j] = start;
                        variance[l][j] = candidate;
                    }
                }
            }
        }
        lower[l][1] = 1;
        variance[l][1] = within;
    }

    let mut starts = vec![0usize; classes];
    let mut end = n;
    for j in (1..=classes).rev() {
        let start = lower[end][j];
        starts[j - 1] = start - 1;
        end = start - 1;
    }

    let mut bounds = Vec::with_capacity(classes + 1);
    bounds.push(sorted[0]);
    for start in starts.iter().skip(1) {
        bounds.push(sorted[start - 1]);
    }
    bounds.push(sorted[n - 1]);
    collapse(bounds)
}

/// Drops repeated bounds so every class is non-empty.
///
/// The first two bounds may be equal: that class holds exactly the minimum.
pub(crate) fn collapse(bounds: Vec<f64>) -> Vec<f64> {
    let mut collapsed: Vec<f64> = Vec::with_capacity(bounds.len());
    for bound in bounds {
        match collapsed.last() {
            Some(last) if bound <= *last && collapsed.len() > 1 => {}
            _ => collapsed.push(bound),
        }
    }
    if collapsed.len() == 2 && collapsed[0] == collapsed[1] {
        return degenerate(collapsed[0]);
    }
    collapsed
}

fn distinct_count(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

fn distinct_values(sorted: &[f64]) -> Vec<f64> {
    let mut distinct = sorted.to_vec();
    distinct.dedup();
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_keeps_minimum_only_class() {
        assert_eq!(collapse(vec![1.0, 1.0, 1.0, 1.0, 2.0]), vec![1.0, 1.0, 2.0]);
        assert_eq!(collapse(vec![1.0, 3.0, 3.0, 3.0]), vec![1.0, 3.0]);
    }

    #[test]
    fn collapse_of_single_value_widens() {
        let bounds = collapse(vec![4.0, 4.0, 4.0]);
        assert_eq!(bounds.len(), 2);
        assert!(bounds[0] < 4.0 && bounds[1] > 4.0);
    }

    #[test]
    fn quantiles_keep_a_class_for_a_repeated_maximum() {
        let sorted = [1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0];
        assert_eq!(quantiles(&sorted, 2), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn quantiles_give_each_scarce_value_its_own_class() {
        assert_eq!(quantiles(&[1.0, 2.0, 2.0, 2.0, 2.0], 4), vec![1.0, 1.0, 2.0]);
        assert_eq!(quantiles(&[1.0, 2.0, 3.0], 3), vec![1.0, 1.0, 2.0, 3.0]);
        assert_eq!(quantiles(&[7.0, 7.0], 3).len(), 2);
    }

    #[test]
    fn natural_breaks_three_clusters() {
        let sorted = [1.0, 1.5, 2.0, 10.0, 11.0, 12.0, 50.0, 51.0];
        assert_eq!(natural_breaks(&sorted, 3), vec![1.0, 2.0, 12.0, 51.0]);
    }

    #[test]
    fn natural_breaks_reduces_to_distinct_count() {
        let sorted = [5.0, 5.0, 5.0, 9.0, 9.0];
        assert_eq!(natural_breaks(&sorted, 4), vec![5.0, 5.0, 9.0]);
    }
}
