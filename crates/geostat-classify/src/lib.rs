//! Choropleth classification.
//!
//! - **classify**: class breaks by equal interval, quantiles or Jenks natural breaks
//! - **legend**: color ramps and the legend handed to the rendering layer
//! - **format**: display formatting of metric values

pub mod classify;
pub mod error;
pub mod format;
pub mod legend;
mod methods;

pub use classify::{classify, classify_values};
pub use error::{ClassifyError, Result};
pub use format::{format_numeric, format_value};
pub use legend::{ColorRamp, Legend, LegendEntry, Rgb};
