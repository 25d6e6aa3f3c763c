use geostat_model::{ClassBreaks, ClassificationMethod, Metric, present_values};
use tracing::debug;

use crate::error::{ClassifyError, Result};
use crate::methods;

/// Computes class breaks over the non-missing metrics.
///
/// Missing metrics take no part in the statistics. When no metric carries a
/// value the breaks are empty and every feature will be classed as no-data.
pub fn classify(
    metrics: &[Metric],
    method: ClassificationMethod,
    class_count: usize,
) -> Result<ClassBreaks> {
    let values = present_values(metrics);
    let breaks = classify_values(&values, method, class_count)?;
    debug!(
        method = %method,
        requested_classes = class_count,
        classes = breaks.class_count(),
        values = values.len(),
        excluded = metrics.len() - values.len(),
        "computed class breaks"
    );
    Ok(breaks)
}

/// Computes class breaks over raw values, ignoring non-finite entries.
///
/// The result never depends on input order.
pub fn classify_values(
    values: &[f64],
    method: ClassificationMethod,
    class_count: usize,
) -> Result<ClassBreaks> {
    if class_count == 0 {
        return Err(ClassifyError::ZeroClassCount);
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Ok(ClassBreaks::empty(method));
    }
    sorted.sort_by(f64::total_cmp);

    let bounds = match method {
        ClassificationMethod::EqualInterval => methods::equal_interval(&sorted, class_count),
        ClassificationMethod::Quantiles => methods::quantiles(&sorted, class_count),
        ClassificationMethod::NaturalBreaks => methods::natural_breaks(&sorted, class_count),
    };
    Ok(ClassBreaks::new(method, bounds)?)
}
