//! Tests for style configuration parsing and defaults

use geoencode::{
    Color, ColorMode, FlowMode, LineStyle, OutputRange, RampId, SizeMode, StyleConfig, Surface,
    Transform, Variable,
};

#[test]
fn test_defaults() {
    let config = StyleConfig::default();
    assert_eq!(config.surface, Surface::Globe { radius: 1.0 });
    assert_eq!(config.routes.color_mode, ColorMode::Fixed);
    assert_eq!(config.routes.color, Color::RED);
    assert_eq!(config.routes.width, 3.0);
    assert_eq!(config.routes.width_range, OutputRange::default());
    assert_eq!(config.routes.ramp, RampId::Viridis);
    assert_eq!(config.routes.line_style, LineStyle::Solid);
    assert_eq!(config.routes.flow_mode, FlowMode::Directional);
    assert!(config.points.visible);
    assert_eq!(config.points.color, Color::WHITE);
    assert!(!config.points.show_route_vertices);
}

#[test]
fn test_from_json_partial() {
    let config = StyleConfig::from_json(
        r##"{
            "surface": { "kind": "map" },
            "routes": {
                "color_mode": "by-variable",
                "color_variable": "speed",
                "ramp": "red-yellow-green",
                "transform": "log",
                "line_style": { "kind": "dash", "dash_size": 0.2, "gap_size": 0.1 },
                "custom_gradient": { "start": "#000000", "end": "#fff" }
            },
            "points": { "size_mode": "by-variable", "size_variable": "population" }
        }"##,
    )
    .unwrap();

    assert_eq!(config.surface, Surface::Map);
    assert_eq!(config.routes.color_mode, ColorMode::ByVariable);
    assert_eq!(config.routes.color_variable, Some(Variable::field("speed")));
    assert_eq!(config.routes.ramp, RampId::RedYellowGreen);
    assert_eq!(config.routes.transform, Transform::Log);
    assert_eq!(
        config.routes.line_style,
        LineStyle::Dash {
            dash_size: 0.2,
            gap_size: 0.1
        }
    );
    assert_eq!(config.routes.custom_gradient.end, Color::WHITE);
    // untouched keys keep defaults
    assert_eq!(config.routes.width, 3.0);
    assert_eq!(config.points.size_mode, SizeMode::ByVariable);
    assert_eq!(config.points.size, 2.0);
}

#[test]
fn test_from_json_pseudo_variables() {
    let config = StyleConfig::from_json(
        r#"{ "routes": { "color_variable": "$order", "width_variable": "$length" } }"#,
    )
    .unwrap();
    assert_eq!(config.routes.color_variable, Some(Variable::Order));
    assert_eq!(config.routes.width_variable, Some(Variable::Length));
}

#[test]
fn test_from_json_rejects_bad_values() {
    assert!(StyleConfig::from_json(r#"{ "routes": { "ramp": "jet" } }"#).is_err());
    assert!(StyleConfig::from_json(r##"{ "routes": { "color": "#zzzzzz" } }"##).is_err());
    assert!(StyleConfig::from_json("not json").is_err());
}

#[test]
fn test_json_round_trip() {
    let config = StyleConfig::default()
        .with_surface(Surface::Globe { radius: 100.0 })
        .with_color_mode(ColorMode::GradientBySequence)
        .with_line_style(LineStyle::Arrow)
        .with_flow_mode(FlowMode::Total)
        .with_width_variable(Variable::Length)
        .with_point_size_range(OutputRange::new(0.5, 4.0).unwrap());
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(StyleConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_builder_setters() {
    let config = StyleConfig::default()
        .with_color(Color::BLUE)
        .with_width(5.0)
        .with_width_mode(SizeMode::ByVariable)
        .with_width_range(OutputRange::new(1.0, 2.0).unwrap())
        .with_transform(Transform::Sqrt)
        .with_custom_gradient(Color::GREEN, Color::BLUE)
        .with_sequence_gradient(Color::WHITE, Color::RED)
        .with_arc_height(0.1)
        .with_flow_offset(1.5)
        .with_simplify_tolerance(Some(0.001))
        .with_points_visible(false)
        .with_point_color(Color::YELLOW)
        .with_point_size(6.0)
        .with_point_size_mode(SizeMode::ByVariable)
        .with_point_size_variable(Variable::field("population"))
        .with_point_size_transform(Transform::Sqrt)
        .with_route_vertices(true);

    assert_eq!(config.routes.color, Color::BLUE);
    assert_eq!(config.routes.width, 5.0);
    assert_eq!(config.routes.width_mode, SizeMode::ByVariable);
    assert_eq!(config.routes.transform, Transform::Sqrt);
    assert_eq!(config.routes.custom_gradient.start, Color::GREEN);
    assert_eq!(config.routes.sequence_gradient.start, Color::WHITE);
    assert_eq!(config.routes.arc_height, 0.1);
    assert_eq!(config.routes.flow_offset_degrees, 1.5);
    assert_eq!(config.routes.simplify_tolerance, Some(0.001));
    assert!(!config.points.visible);
    assert_eq!(config.points.color, Color::YELLOW);
    assert_eq!(config.points.size, 6.0);
    assert_eq!(config.points.size_variable, Some(Variable::field("population")));
    assert_eq!(config.points.size_transform, Transform::Sqrt);
    assert!(config.points.show_route_vertices);
}

#[test]
fn test_option_parsing() {
    assert_eq!("category".parse::<ColorMode>().unwrap(), ColorMode::ByCategory);
    assert_eq!("gradient".parse::<ColorMode>().unwrap(), ColorMode::GradientBySequence);
    assert_eq!("variable".parse::<SizeMode>().unwrap(), SizeMode::ByVariable);
    assert_eq!("dashed".parse::<LineStyle>().unwrap(), LineStyle::DEFAULT_DASH);
    assert!("arrow".parse::<LineStyle>().unwrap().has_arrows());
    assert!(!LineStyle::Glow.has_arrows());
    assert!("".parse::<Variable>().is_err());
    assert_eq!("$length".parse::<Variable>().unwrap().to_string(), "$length");
}
