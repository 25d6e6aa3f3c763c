//! Color ramps and legends handed to the rendering layer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use geostat_model::{ClassBreaks, ClassIndex, RenderFeature, ValueFormat};

use crate::error::ClassifyError;
use crate::format::format_value;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation in RGB space, `t` in `[0, 1]`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ClassifyError;

    /// Accepts `#rrggbb` and `rgb(r, g, b)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |message: &str| ClassifyError::InvalidColor {
            value: s.to_string(),
            message: message.to_string(),
        };
        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid("expected six hex digits"));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid("invalid hex digit"))
            };
            return Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }
        let inner = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid("expected #rrggbb or rgb(r, g, b)"))?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid("channels must be integers 0-255"))?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
            _ => Err(invalid("expected three channels")),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Two-stop sequential ramp plus the reserved no-data color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub start: Rgb,
    pub end: Rgb,
    pub no_data: Rgb,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            start: Rgb::new(219, 234, 254),
            end: Rgb::new(59, 130, 246),
            no_data: Rgb::new(229, 231, 235),
        }
    }
}

impl ColorRamp {
    /// `count` evenly spaced colors from `start` to `end`.
    pub fn colors(&self, count: usize) -> Vec<Rgb> {
        match count {
            0 => Vec::new(),
            1 => vec![self.end],
            _ => (0..count)
                .map(|i| self.start.mix(self.end, i as f64 / (count - 1) as f64))
                .collect(),
        }
    }

    /// One color per class followed by the no-data color, indexable by
    /// [`ClassIndex::color_slot`].
    pub fn palette(&self, class_count: usize) -> Vec<Rgb> {
        let mut palette = self.colors(class_count);
        palette.push(self.no_data);
        palette
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub class: ClassIndex,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub color: Rgb,
    pub label: String,
    pub count: usize,
}

/// Ordered legend: one entry per class, then the no-data entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub format: ValueFormat,
    pub entries: Vec<LegendEntry>,
    pub no_data: LegendEntry,
}

impl Legend {
    pub fn new(breaks: &ClassBreaks, ramp: &ColorRamp, format: ValueFormat) -> Self {
        let colors = ramp.colors(breaks.class_count());
        let entries = colors
            .into_iter()
            .enumerate()
            .filter_map(|(index, color)| {
                let (lower, upper) = breaks.class_range(index)?;
                Some(LegendEntry {
                    class: ClassIndex::Class(index),
                    lower: Some(lower),
                    upper: Some(upper),
                    color,
                    label: format!(
                        "{} - {}",
                        format_value(lower, format),
                        format_value(upper, format)
                    ),
                    count: 0,
                })
            })
            .collect();
        Self {
            format,
            entries,
            no_data: LegendEntry {
                class: ClassIndex::NoData,
                lower: None,
                upper: None,
                color: ramp.no_data,
                label: "No data".to_string(),
                count: 0,
            },
        }
    }

    /// Fills in how many features fall into each entry.
    #[must_use]
    pub fn with_counts(mut self, features: &[RenderFeature]) -> Self {
        for feature in features {
            match feature.class {
                ClassIndex::Class(index) => {
                    if let Some(entry) = self.entries.get_mut(index) {
                        entry.count += 1;
                    }
                }
                ClassIndex::NoData => self.no_data.count += 1,
            }
        }
        self
    }

    pub fn color_of(&self, class: ClassIndex) -> Rgb {
        match class {
            ClassIndex::Class(index) => self
                .entries
                .get(index)
                .map_or(self.no_data.color, |entry| entry.color),
            ClassIndex::NoData => self.no_data.color,
        }
    }

    /// All entries in render order, no-data last.
    pub fn iter(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter().chain(std::iter::once(&self.no_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostat_model::ClassificationMethod;

    #[test]
    fn parses_both_color_spellings() {
        assert_eq!("rgb(219, 234, 254)".parse::<Rgb>().unwrap(), Rgb::new(219, 234, 254));
        assert_eq!("#3b82f6".parse::<Rgb>().unwrap(), Rgb::new(59, 130, 246));
        assert!("rgb(1, 2)".parse::<Rgb>().is_err());
        assert!("#xyz".parse::<Rgb>().is_err());
    }

    #[test]
    fn default_ramp_spans_endpoints() {
        let colors = ColorRamp::default().colors(5);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0].to_string(), "#dbeafe");
        assert_eq!(colors[4].to_string(), "#3b82f6");
        assert_eq!(colors[2], Rgb::new(139, 182, 250));
    }

    #[test]
    fn palette_reserves_last_slot_for_no_data() {
        let ramp = ColorRamp::default();
        let palette = ramp.palette(3);
        assert_eq!(palette.len(), 4);
        assert_eq!(palette[ClassIndex::NoData.color_slot(3)], ramp.no_data);
    }

    #[test]
    fn legend_labels_use_value_format() {
        let breaks =
            ClassBreaks::new(ClassificationMethod::EqualInterval, vec![0.0, 50.0, 100.0]).unwrap();
        let legend = Legend::new(&breaks, &ColorRamp::default(), ValueFormat::Percentage);
        let labels: Vec<&str> = legend.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["0.0% - 50.0%", "50.0% - 100.0%", "No data"]);
    }
}
