//! Survey value transformation.
//!
//! - **parse**: raw field values to finite numbers or explicit missing markers
//! - **resolve**: variable specifications applied to rows, one metric per geography

pub mod parse;
pub mod resolve;

pub use parse::{parse, parse_f64, parse_text};
pub use resolve::{base_query_codes, required_codes, resolve, resolve_all};
