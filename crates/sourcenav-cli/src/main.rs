use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sourcenav_lib::{
    find_path_default, load_nav_mesh, AreaId, AreaSummary, MeshSummary, NavMesh, RouteSummary,
    Vector3,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Source engine navigation mesh utilities")]
struct Cli {
    /// Path to the .nav file to load.
    #[arg(long, env = "SOURCENAV_FILE")]
    nav: PathBuf,

    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise the mesh header, entity counts and places.
    Info,
    /// Find the area under a world position.
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        y: f32,
        #[arg(long, allow_negative_numbers = true)]
        z: f32,
        /// Also accept floors above the position.
        #[arg(long)]
        allow_below: bool,
        /// Fall back to the closest area when no footprint contains the position.
        #[arg(long)]
        nearest: bool,
    },
    /// Compute the cheapest route between two areas or places.
    Route(RouteArgs),
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Start from the area nearest the centroid of this place.
    #[arg(long, conflicts_with = "from_area", required_unless_present = "from_area")]
    from_place: Option<String>,
    /// Start from this area id.
    #[arg(long)]
    from_area: Option<AreaId>,
    /// Finish at the area nearest the centroid of this place.
    #[arg(long, conflicts_with = "to_area", required_unless_present = "to_area")]
    to_place: Option<String>,
    /// Finish at this area id.
    #[arg(long)]
    to_area: Option<AreaId>,
}

#[derive(Serialize)]
struct LocateOutput {
    query: Vector3,
    area: AreaSummary,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mesh = load_nav_mesh(&cli.nav)
        .with_context(|| format!("failed to load nav mesh from {}", cli.nav.display()))?;

    match cli.command {
        Command::Info => handle_info(&mesh, cli.json),
        Command::Locate {
            x,
            y,
            z,
            allow_below,
            nearest,
        } => handle_locate(&mesh, Vector3::new(x, y, z), allow_below, nearest, cli.json),
        Command::Route(args) => handle_route(&mesh, &cli.nav, &args, cli.json),
    }
}

fn handle_info(mesh: &NavMesh, json: bool) -> Result<()> {
    let summary = MeshSummary::from_mesh(mesh);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render());
    }
    Ok(())
}

fn handle_locate(
    mesh: &NavMesh,
    point: Vector3,
    allow_below: bool,
    nearest: bool,
    json: bool,
) -> Result<()> {
    let area = if nearest {
        mesh.nearest_area(point, allow_below)
    } else {
        mesh.find_area(point, allow_below)
    }
    .ok_or_else(|| anyhow!("no area found at {point}"))?;

    let summary = AreaSummary::from_area(area, Some(point));
    if json {
        let output = LocateOutput {
            query: point,
            area: summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", summary.render());
    }
    Ok(())
}

fn handle_route(mesh: &NavMesh, nav: &Path, args: &RouteArgs, json: bool) -> Result<()> {
    let start = resolve_endpoint(mesh, args.from_place.as_deref(), args.from_area)
        .context("failed to resolve route start")?;
    let goal = resolve_endpoint(mesh, args.to_place.as_deref(), args.to_area)
        .context("failed to resolve route goal")?;

    let path = find_path_default(mesh, start, goal)
        .with_context(|| format!("failed to route through {}", nav.display()))?;
    let summary = RouteSummary::from_path(mesh, &path);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render());
    }
    Ok(())
}

fn resolve_endpoint(mesh: &NavMesh, place: Option<&str>, area: Option<AreaId>) -> Result<AreaId> {
    if let Some(id) = area {
        mesh.area(id)
            .ok_or(sourcenav_lib::Error::UnknownArea { id })?;
        return Ok(id);
    }

    let name = place.ok_or_else(|| anyhow!("either a place or an area id is required"))?;
    let center = mesh.place_center_by_name(name)?;
    let area = mesh
        .nearest_area(center, true)
        .ok_or_else(|| anyhow!("mesh has no areas near place {name}"))?;
    debug!(place = name, %center, area = area.id, "resolved place to area");
    Ok(area.id)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
