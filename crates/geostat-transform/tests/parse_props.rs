//! Property tests for the value parser.

use geostat_model::{ParsedValue, RawValue, Sentinel};
use geostat_transform::{parse, parse_text};
use proptest::prelude::*;

fn raw_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::Null),
        any::<f64>().prop_map(RawValue::Number),
        any::<String>().prop_map(RawValue::Text),
        "[-+]?[0-9,]{0,12}(\\.[0-9]{0,4})?".prop_map(RawValue::Text),
    ]
}

proptest! {
    #[test]
    fn parse_is_total_and_never_yields_non_finite(raw in raw_value()) {
        match parse(&raw) {
            ParsedValue::Value(value) => prop_assert!(value.is_finite()),
            ParsedValue::Missing(_) => {}
        }
    }

    #[test]
    fn formatted_finite_numbers_round_trip(value in -1.0e12f64..1.0e12f64) {
        prop_assume!(Sentinel::from_code(value as i64).is_none() || value.fract() != 0.0);
        prop_assert_eq!(parse_text(&value.to_string()), ParsedValue::Value(value));
    }
}

#[test]
fn every_sentinel_is_missing_in_both_spellings() {
    for sentinel in Sentinel::ALL {
        assert!(parse_text(&sentinel.code().to_string()).is_missing());
        assert!(parse_text(sentinel.symbol()).is_missing());
        assert!(parse(&RawValue::Number(sentinel.code() as f64)).is_missing());
    }
}
