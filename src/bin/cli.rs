//! geoencode CLI - encode CSV datasets into render primitives
//!
//! Usage:
//!   geoencode-cli points <csv> [--config <json>] [--output <file>]
//!   geoencode-cli segments <csv> [...]
//!   geoencode-cli ordered <csv> [...]
//!   geoencode-cli connections <points.csv> <edges.csv> [...]
//!   geoencode-cli variables <shape> <csv>...
//!
//! Style comes from an optional JSON config; individual flags override it.
//! The build output (primitives, legend, bounds, stats) is written as JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};

use geoencode::source::{
    load_connections, load_ordered_trajectory, load_trajectory_points, load_trajectory_segments,
};
use geoencode::{
    Color, ColorMode, FeatureBuilder, FlowMode, LineStyle, LoadedDataset, RampId, Result,
    SizeMode, StyleConfig, Surface, Transform, Variable,
};

#[derive(Parser)]
#[command(name = "geoencode-cli")]
#[command(about = "Encode geographic CSV data into styled paths and markers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Trajectory points grouped into routes (route_id, point_id, lat, lon)
    Points {
        csv: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Independent segments (segment_id, start_lat, start_lon, end_lat, end_lon)
    Segments {
        csv: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Segments drawn in ascending `order`
    Ordered {
        csv: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Point table plus origin-destination edges
    Connections {
        points: PathBuf,
        edges: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// List the variables available for styling
    Variables {
        #[arg(value_enum)]
        shape: Shape,

        /// One CSV, or points then edges for connections
        #[arg(required = true, num_args = 1..=2)]
        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Points,
    Segments,
    Ordered,
    Connections,
}

#[derive(Args)]
struct StyleArgs {
    /// JSON style configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for the build result (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// globe or map
    #[arg(long)]
    surface: Option<Surface>,

    /// fixed, category, variable or sequence
    #[arg(long)]
    color_mode: Option<ColorMode>,

    /// Fixed color (#rrggbb)
    #[arg(long)]
    color: Option<Color>,

    /// Column driving color; `$length` and `$order` are pseudo-variables
    #[arg(long)]
    color_variable: Option<Variable>,

    #[arg(long)]
    ramp: Option<RampId>,

    /// identity, log, sqrt or square
    #[arg(long)]
    transform: Option<Transform>,

    /// fixed or variable
    #[arg(long)]
    width_mode: Option<SizeMode>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    width_variable: Option<Variable>,

    /// solid, dash, glow or arrow
    #[arg(long)]
    line_style: Option<LineStyle>,

    /// directional or total
    #[arg(long)]
    flow_mode: Option<FlowMode>,

    /// Douglas-Peucker tolerance in degrees for route simplification
    #[arg(long)]
    simplify: Option<f64>,

    /// Hide point markers
    #[arg(long)]
    no_points: bool,

    /// Emit a marker for every route vertex
    #[arg(long)]
    route_vertices: bool,
}

impl StyleArgs {
    /// Load the JSON config (or defaults) and apply flag overrides.
    fn resolve(&self) -> Result<StyleConfig> {
        let mut config = match &self.config {
            Some(path) => StyleConfig::from_json(&fs::read_to_string(path)?)?,
            None => StyleConfig::default(),
        };

        if let Some(surface) = self.surface {
            config = config.with_surface(surface);
        }
        if let Some(mode) = self.color_mode {
            config = config.with_color_mode(mode);
        }
        if let Some(color) = self.color {
            config = config.with_color(color);
        }
        if let Some(variable) = &self.color_variable {
            config = config.with_color_variable(variable.clone());
        }
        if let Some(ramp) = self.ramp {
            config = config.with_ramp(ramp);
        }
        if let Some(transform) = self.transform {
            config = config.with_transform(transform);
        }
        if let Some(mode) = self.width_mode {
            config = config.with_width_mode(mode);
        }
        if let Some(width) = self.width {
            config = config.with_width(width);
        }
        if let Some(variable) = &self.width_variable {
            config = config.with_width_variable(variable.clone());
        }
        if let Some(style) = self.line_style {
            config = config.with_line_style(style);
        }
        if let Some(mode) = self.flow_mode {
            config = config.with_flow_mode(mode);
        }
        if self.simplify.is_some() {
            config = config.with_simplify_tolerance(self.simplify);
        }
        if self.no_points {
            config = config.with_points_visible(false);
        }
        if self.route_vertices {
            config = config.with_route_vertices(true);
        }
        Ok(config)
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Points { csv, style } => {
            run_build(load_trajectory_points(&csv), &style, cli.verbose)
        }
        Commands::Segments { csv, style } => {
            run_build(load_trajectory_segments(&csv), &style, cli.verbose)
        }
        Commands::Ordered { csv, style } => {
            run_build(load_ordered_trajectory(&csv), &style, cli.verbose)
        }
        Commands::Connections {
            points,
            edges,
            style,
        } => run_build(load_connections(&points, &edges), &style, cli.verbose),
        Commands::Variables { shape, files } => run_variables(shape, &files),
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}

fn run_build(loaded: Result<LoadedDataset>, style: &StyleArgs, verbose: bool) -> Result<()> {
    let loaded = loaded?;
    let config = style.resolve()?;

    let start = Instant::now();
    let mut builder = FeatureBuilder::new();
    let output = builder.build(&loaded, &config)?;
    let elapsed = start.elapsed();

    if verbose {
        print_summary(&output, elapsed.as_millis());
    }

    let json = output.to_json()?;
    match &style.output {
        Some(path) => {
            write_file(path, &json)?;
            info!("Wrote {} primitives to {}", output.primitives.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(output: &geoencode::BuildOutput, millis: u128) {
    let stats = &output.stats;
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("BUILD SUMMARY ({millis}ms)");
    eprintln!("{}", "=".repeat(60));
    eprintln!("  Paths:            {}", stats.paths);
    eprintln!("  Markers:          {}", stats.markers);
    eprintln!("  Fallbacks:        {}", stats.fallbacks);
    eprintln!("  Skipped records:  {}", stats.skipped_records);
    eprintln!("  Skipped features: {}", stats.skipped_features);
    eprintln!("  Skipped edges:    {}", stats.skipped_edges);
    eprintln!("  Degenerate arcs:  {}", stats.degenerate_arcs);
    eprintln!("  Dropped rows:     {}", stats.dropped_rows);
    if let Some(bounds) = &output.bounds {
        eprintln!(
            "  Bounds:           lat [{:.4}, {:.4}] lon [{:.4}, {:.4}]",
            bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
        );
    }
}

fn run_variables(shape: Shape, files: &[PathBuf]) -> Result<()> {
    let loaded = match (shape, files) {
        (Shape::Points, [csv, ..]) => load_trajectory_points(csv)?,
        (Shape::Segments, [csv, ..]) => load_trajectory_segments(csv)?,
        (Shape::Ordered, [csv, ..]) => load_ordered_trajectory(csv)?,
        (Shape::Connections, [points, edges]) => load_connections(points, edges)?,
        (Shape::Connections, _) => {
            return Err(geoencode::EncodeError::InvalidArgument(
                "connections need a points file and an edges file".to_string(),
            ))
        }
        (_, []) => {
            return Err(geoencode::EncodeError::InvalidArgument(
                "no input file given".to_string(),
            ))
        }
    };

    let dataset = loaded.dataset();
    println!("{} dataset", dataset.shape_name());
    println!("  Color / width variables:");
    for variable in dataset.variable_columns() {
        println!("    {:<24} {}", variable.to_string(), variable.label());
    }

    let point_sizes = dataset.point_size_variables();
    if !point_sizes.is_empty() {
        println!("  Point size variables:");
        for variable in point_sizes {
            println!("    {variable}");
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
