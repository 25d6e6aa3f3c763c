//! Data model shared by the geostat crates.
//!
//! - **value**: raw field values, survey sentinels and the parsed value type
//! - **variable**: variable specifications and their enumerations
//! - **row**: raw rows and computed metrics
//! - **breaks**: class boundaries and class indexes
//! - **feature**: polygon features and their rendered annotation
//! - **geography**: geographic layer descriptors

pub mod breaks;
pub mod error;
pub mod feature;
pub mod geography;
pub mod row;
pub mod value;
pub mod variable;

pub use breaks::{ClassBreaks, ClassIndex};
pub use error::{ModelError, Result};
pub use feature::{GeoFeature, RenderFeature, feature_collection};
pub use geography::GeographyLayer;
pub use row::{Metric, RawRow, present_values};
pub use value::{MissingReason, ParsedValue, RawValue, Sentinel};
pub use variable::{
    BASE_KEY_SUFFIX, ClassificationMethod, DatasetRef, TransformationKind, ValueFormat,
    VariableKey, VariableSpec,
};
