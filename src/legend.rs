//! Legend descriptors for the active color mode.

use serde::{Deserialize, Serialize};

use crate::colormap::{Color, Colormap, Gradient, RampId};
use crate::range::RangeState;
use crate::style::Variable;

/// One swatch of a categorical legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: Color,
}

/// What the backend should show next to the map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LegendDescriptor {
    #[default]
    None,
    /// Category swatches in first-seen order.
    Categorical { entries: Vec<LegendEntry> },
    /// Gradient bar for a variable-driven ramp.
    Continuous {
        variable_label: String,
        min: f64,
        max: f64,
        min_label: String,
        max_label: String,
        ramp: RampId,
        stops: Vec<Color>,
    },
    /// Start-to-end gradient for sequence coloring.
    Sequence {
        start: Color,
        end: Color,
        start_label: String,
        end_label: String,
    },
}

impl LegendDescriptor {
    /// Swatch legend; `None` when no category was seen.
    pub fn categorical(entries: Vec<LegendEntry>) -> Self {
        if entries.is_empty() {
            LegendDescriptor::None
        } else {
            LegendDescriptor::Categorical { entries }
        }
    }

    pub fn continuous(variable: &Variable, range: &RangeState, colormap: &Colormap) -> Self {
        LegendDescriptor::Continuous {
            variable_label: variable.label(),
            min: range.min,
            max: range.max,
            min_label: format_legend_value(range.min),
            max_label: format_legend_value(range.max),
            ramp: colormap.ramp,
            stops: colormap.legend_stops(),
        }
    }

    pub fn sequence(gradient: &Gradient) -> Self {
        LegendDescriptor::Sequence {
            start: gradient.start,
            end: gradient.end,
            start_label: "Start".to_string(),
            end_label: "End".to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, LegendDescriptor::None)
    }
}

/// Format a range bound for a legend label.
///
/// Very small or very large magnitudes (`|v| < 0.01` or `|v| > 10000`) use
/// exponential notation with two fraction digits (`1.23e+4`); everything
/// else gets at most two fraction digits and thousands separators.
///
/// # Example
/// ```
/// use geoencode::format_legend_value;
/// assert_eq!(format_legend_value(1234.5), "1,234.5");
/// assert_eq!(format_legend_value(25000.0), "2.50e+4");
/// assert_eq!(format_legend_value(0.005), "5.00e-3");
/// ```
pub fn format_legend_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude < 0.01 || magnitude > 10_000.0 {
        exponential(value)
    } else {
        grouped(value)
    }
}

fn exponential(value: f64) -> String {
    if value == 0.0 {
        return "0.00e+0".to_string();
    }
    let formatted = format!("{value:.2e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) => match exp.strip_prefix('-') {
            Some(digits) => format!("{mantissa}e-{digits}"),
            None => format!("{mantissa}e+{exp}"),
        },
        None => formatted,
    }
}

fn grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut int_grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            int_grouped.push(',');
        }
        int_grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{int_grouped}")
    } else {
        format!("{sign}{int_grouped}.{frac_part}")
    }
}
