use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, Result};
use crate::variable::ClassificationMethod;

/// Ordered class boundaries: `n + 1` bounds describe `n` classes.
///
/// A value belongs to the smallest class whose closed range contains it, so a
/// value sitting exactly on an interior boundary falls into the lower class
/// and the global maximum belongs to the last class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBreaks {
    method: ClassificationMethod,
    bounds: Vec<f64>,
}

impl ClassBreaks {
    /// Build breaks, rejecting non-finite or decreasing bounds.
    pub fn new(method: ClassificationMethod, bounds: Vec<f64>) -> Result<Self> {
        for value in &bounds {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteBreak { value: *value });
            }
        }
        for pair in bounds.windows(2) {
            if pair[0] > pair[1] {
                return Err(ModelError::DecreasingBreaks {
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { method, bounds })
    }

    /// Breaks with no classes, used when no metric carries a value.
    pub fn empty(method: ClassificationMethod) -> Self {
        Self {
            method,
            bounds: Vec::new(),
        }
    }

    pub fn method(&self) -> ClassificationMethod {
        self.method
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn class_count(&self) -> usize {
        self.bounds.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.class_count() == 0
    }

    pub fn min(&self) -> Option<f64> {
        self.bounds.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.bounds.last().copied()
    }

    /// Lower and upper bound of class `index`.
    pub fn class_range(&self, index: usize) -> Option<(f64, f64)> {
        if index < self.class_count() {
            Some((self.bounds[index], self.bounds[index + 1]))
        } else {
            None
        }
    }

    /// Class index of `value`.
    ///
    /// Values outside the bounded range clamp to the first or last class.
    /// Returns `None` when there are no classes or the value is not finite.
    pub fn class_of(&self, value: f64) -> Option<usize> {
        let count = self.class_count();
        if count == 0 || !value.is_finite() {
            return None;
        }
        let index = self.bounds[1..]
            .iter()
            .position(|upper| value <= *upper)
            .unwrap_or(count - 1);
        Some(index)
    }
}

impl fmt::Display for ClassBreaks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.method)?;
        for (idx, bound) in self.bounds.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{bound}")?;
        }
        write!(f, "]")
    }
}

/// Class assigned to a rendered feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassIndex {
    Class(usize),
    /// Reserved slot for features without a usable metric.
    NoData,
}

impl ClassIndex {
    pub fn index(self) -> Option<usize> {
        match self {
            ClassIndex::Class(index) => Some(index),
            ClassIndex::NoData => None,
        }
    }

    pub fn is_no_data(self) -> bool {
        matches!(self, ClassIndex::NoData)
    }

    /// Position in a color sequence holding one color per class followed by
    /// the no-data color.
    pub fn color_slot(self, class_count: usize) -> usize {
        match self {
            ClassIndex::Class(index) => index,
            ClassIndex::NoData => class_count,
        }
    }
}
