use serde::{Deserialize, Serialize};

/// Published survey dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Single years or inclusive `[first, last]` spans.
    #[serde(default)]
    pub years: Vec<YearSpan>,
    /// Geography types the dataset is published for.
    #[serde(default)]
    pub geographies: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearSpan {
    Single(u16),
    Range([u16; 2]),
}

impl YearSpan {
    pub fn contains(self, year: u16) -> bool {
        match self {
            YearSpan::Single(single) => single == year,
            YearSpan::Range([first, last]) => (first..=last).contains(&year),
        }
    }
}

impl DatasetInfo {
    /// An empty year list places no restriction.
    pub fn covers_year(&self, year: u16) -> bool {
        self.years.is_empty() || self.years.iter().any(|span| span.contains(year))
    }

    /// An empty geography list places no restriction.
    pub fn covers_geography_type(&self, geography_type: &str) -> bool {
        self.geographies.is_empty()
            || self
                .geographies
                .iter()
                .any(|available| available.eq_ignore_ascii_case(geography_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_spans_accept_singles_and_ranges() {
        let info = DatasetInfo {
            name: "Decennial Census".to_string(),
            description: None,
            years: vec![YearSpan::Single(2010), YearSpan::Range([2018, 2020])],
            geographies: vec!["Counties".to_string()],
            source: None,
        };
        assert!(info.covers_year(2010));
        assert!(info.covers_year(2019));
        assert!(!info.covers_year(2011));
        assert!(info.covers_geography_type("counties"));
        assert!(!info.covers_geography_type("Census Tracts"));
    }
}
