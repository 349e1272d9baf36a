#[macro_use]
extern crate log;

use anyhow::Result;
use geometry::Projection;
use structopt::StructOpt;

use model::MapConfig;

/// Draws every route in a GTFS shape table as an SVG map.
#[derive(StructOpt)]
struct Args {
    /// The path to the shape table. Route metadata and projected coordinates are cached back into
    /// this file.
    #[structopt(long, default_value = "shape_parser/shapes.txt")]
    shapes: String,
    /// The path to the route table, with one row per shape_id
    #[structopt(long, default_value = "shape_parser/routes.txt")]
    routes: String,
    /// Where to write the SVG
    #[structopt(long, default_value = "shape_parser/shapes.svg")]
    output: String,
    /// Redo the route join and projection, even if the shape table already has them
    #[structopt(long)]
    force: bool,
    /// Log every route as it's drawn
    #[structopt(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> MapConfig {
        MapConfig {
            shapes_path: self.shapes,
            routes_path: self.routes,
            output_path: self.output,
            force: self.force,
            projection: Projection::default(),
        }
    }
}

fn setup_logger(verbose: bool) {
    use env_logger::{Builder, Env};
    let level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = Args::from_args();
    setup_logger(args.verbose);

    let summary = model::make_map(&args.into_config())?;
    info!(
        "Drew {} polylines for {} routes ({} directions skipped)",
        summary.polylines, summary.routes, summary.skipped
    );
    Ok(())
}
