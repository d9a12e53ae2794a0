//! Tests for legend descriptors and value formatting

use geoencode::{
    format_legend_value, Color, Colormap, Gradient, LegendDescriptor, LegendEntry, RampId,
    RangeState, Variable,
};

#[test]
fn test_format_plain_values() {
    assert_eq!(format_legend_value(0.0), "0.00e+0");
    assert_eq!(format_legend_value(1.0), "1");
    assert_eq!(format_legend_value(2.5), "2.5");
    assert_eq!(format_legend_value(7.12345), "7.12");
    assert_eq!(format_legend_value(1234.5), "1,234.5");
    assert_eq!(format_legend_value(-42.0), "-42");
}

#[test]
fn test_format_exponential() {
    assert_eq!(format_legend_value(12340.0), "1.23e+4");
    assert_eq!(format_legend_value(0.0042), "4.20e-3");
    assert_eq!(format_legend_value(-250000.0), "-2.50e+5");
}

#[test]
fn test_format_non_finite() {
    assert_eq!(format_legend_value(f64::NAN), "NaN");
    assert_eq!(format_legend_value(f64::INFINITY), "Infinity");
    assert_eq!(format_legend_value(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_continuous_descriptor() {
    let range = RangeState::new(0.5, 20000.0).unwrap();
    let map = Colormap::new(RampId::RedBlue, Gradient::new(Color::BLUE, Color::RED));
    let legend = LegendDescriptor::continuous(&Variable::field("speed"), &range, &map);

    let LegendDescriptor::Continuous {
        variable_label,
        min,
        max,
        min_label,
        max_label,
        ramp,
        stops,
    } = legend
    else {
        panic!("expected continuous legend");
    };
    assert_eq!(variable_label, "speed");
    assert_eq!((min, max), (0.5, 20000.0));
    assert_eq!(min_label, "0.5");
    assert_eq!(max_label, "2.00e+4");
    assert_eq!(ramp, RampId::RedBlue);
    assert_eq!(stops, vec![Color::RED, Color::BLUE]);
}

#[test]
fn test_pseudo_variable_labels() {
    let range = RangeState::new(0.0, 1.0).unwrap();
    let map = Colormap::new(RampId::Viridis, Gradient::new(Color::BLUE, Color::RED));
    let legend = LegendDescriptor::continuous(&Variable::Length, &range, &map);
    assert!(matches!(
        legend,
        LegendDescriptor::Continuous { ref variable_label, .. } if variable_label == "Distance"
    ));
}

#[test]
fn test_categorical_empty_is_none() {
    assert!(LegendDescriptor::categorical(Vec::new()).is_none());
    let legend = LegendDescriptor::categorical(vec![LegendEntry {
        category: "bus".to_string(),
        color: Color::RED,
    }]);
    assert!(!legend.is_none());
}

#[test]
fn test_sequence_descriptor() {
    let legend = LegendDescriptor::sequence(&Gradient::new(Color::RED, Color::BLUE));
    assert_eq!(
        legend,
        LegendDescriptor::Sequence {
            start: Color::RED,
            end: Color::BLUE,
            start_label: "Start".to_string(),
            end_label: "End".to_string(),
        }
    );
}

#[test]
fn test_legend_json_is_tagged() {
    let json = serde_json::to_value(LegendDescriptor::sequence(&Gradient::new(
        Color::RED,
        Color::BLUE,
    )))
    .unwrap();
    assert_eq!(json["kind"], "sequence");
    assert_eq!(json["start"], "#ff0000");
    assert_eq!(serde_json::to_value(LegendDescriptor::None).unwrap()["kind"], "none");
}
