use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use geopuzzle::api::{search_arrangement, solve_route, ArrangeCfg, GeomCfg, Goal, Scene, Triangle};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod draw;
mod input;
mod provenance;
mod report;

use provenance::{write_artifacts, Payload};
use report::Clock;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Route search among obstacles and triangle arrangement")]
struct Cmd {
    /// Log search progress at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Latest departure from the start that still catches the bus on the y-axis
    Path(PathArgs),
    /// Arrange triangles on a baseline with a small span
    Arrange(ArrangeArgs),
    /// Write a random triangle set in the `type=lengths` format
    Random(RandomArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
struct PathArgs {
    /// Course files; each is solved independently
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Runner speed in km/h
    #[arg(long, default_value_t = 15.0)]
    runner_kmh: f64,
    /// Bus speed in km/h
    #[arg(long, default_value_t = 30.0)]
    bus_kmh: f64,
    /// Bus departure at the origin, HH:MM[:SS]
    #[arg(long, default_value = "07:30")]
    clock: String,
    /// Keep a square of this width clear of obstacles instead of a point
    #[arg(long)]
    actor_width: Option<f64>,
    /// Write `<stem>.svg` and `<stem>.json` (plus provenance) here
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ArrangeArgs {
    /// Triangle files; each is arranged independently
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Stop the subset search at this slack (degrees)
    #[arg(long, default_value_t = 0.2)]
    subset_tolerance: f64,
    /// Base candidate pruning factor
    #[arg(long, default_value_t = 1.2)]
    base_angle_factor: f64,
    /// Stop trying base candidates after this many seconds once a layout exists
    #[arg(long)]
    time_limit: Option<f64>,
    /// Omit triangle labels in SVG output
    #[arg(long)]
    no_labels: bool,
    /// Write `<stem>.svg` and `<stem>.json` (plus provenance) here
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RandomArgs {
    #[arg(long, default_value_t = 10)]
    count: usize,
    #[arg(long, default_value_t = 43)]
    seed: u64,
    #[arg(long, default_value_t = 50)]
    side_min: u32,
    #[arg(long, default_value_t = 300)]
    side_max: u32,
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Path(args) => path(args),
        Action::Arrange(args) => arrange(args),
        Action::Random(args) => random(args),
        Action::Report => report(),
    }
}

/// Run `each` on every input; failures are logged and counted, not fatal.
fn batch(inputs: &[PathBuf], mut each: impl FnMut(&Path) -> Result<()>) -> Result<()> {
    let mut failed = 0usize;
    for input in inputs {
        if let Err(err) = each(input) {
            tracing::error!(input = %input.display(), "{err:#}");
            failed += 1;
        }
    }
    ensure!(failed == 0, "{failed} of {} inputs failed", inputs.len());
    Ok(())
}

fn output_path(dir: &Path, input: &Path, ext: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    dir.join(stem).with_extension(ext)
}

fn path(args: PathArgs) -> Result<()> {
    let clock = Clock::parse(&args.clock)?;
    let runner = args.runner_kmh / 3.6;
    let bus = args.bus_kmh / 3.6;
    batch(&args.inputs, |input| {
        let course = input::read_course(input)?;
        let mut scene = Scene::new(
            course.start,
            Goal::Pursuit { speed: bus },
            course.obstacles.clone(),
            runner,
        );
        if let Some(width) = args.actor_width {
            scene = scene.with_square_actor(width);
        }

        let started = Instant::now();
        let route = solve_route(&scene, GeomCfg::default())
            .with_context(|| format!("solving {}", input.display()))?;
        tracing::info!(input = %input.display(), elapsed_ms = started.elapsed().as_millis() as u64, "path");

        println!("######\n{}", input.display());
        print!("{}", report::route_text(route.as_ref(), clock));

        if let Some(dir) = &args.out_dir {
            let params = json!({
                "input": input.to_string_lossy(),
                "runner_kmh": args.runner_kmh,
                "bus_kmh": args.bus_kmh,
                "clock": args.clock,
                "actor_width": args.actor_width,
            });
            let doc = json!({
                "route": route.as_ref().map(report::RouteRecord::from),
            });
            let picture = draw::course_svg(&course.obstacles, course.start, route.as_ref());
            write_artifacts(
                &[
                    (output_path(dir, input, "json"), serde_json::to_vec_pretty(&doc)?),
                    (output_path(dir, input, "svg"), draw::to_bytes(&picture)?),
                ],
                Payload::new("path", params),
            )?;
        }
        Ok(())
    })
}

fn arrange(args: ArrangeArgs) -> Result<()> {
    let cfg = ArrangeCfg {
        subset_tolerance: args.subset_tolerance,
        base_angle_factor: args.base_angle_factor,
        time_limit: args.time_limit.map(Duration::from_secs_f64),
        ..ArrangeCfg::default()
    };
    batch(&args.inputs, |input| {
        let triangles = input::read_triangles(input)?;
        println!("######\n{}", input.display());
        print!("{}", report::triangles_text(&triangles));

        let started = Instant::now();
        let arrangement = search_arrangement(&triangles, &cfg);
        tracing::info!(
            input = %input.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "arrange"
        );
        print!("{}", report::arrangement_text(arrangement.as_ref()));

        if let (Some(dir), Some(a)) = (&args.out_dir, &arrangement) {
            let params = json!({
                "input": input.to_string_lossy(),
                "subset_tolerance": cfg.subset_tolerance,
                "base_angle_factor": cfg.base_angle_factor,
                "time_limit": args.time_limit,
            });
            let doc = serde_json::to_vec_pretty(&report::ArrangementRecord::from(a))?;
            let picture = draw::arrangement_svg(a, !args.no_labels);
            write_artifacts(
                &[
                    (output_path(dir, input, "json"), doc),
                    (output_path(dir, input, "svg"), draw::to_bytes(&picture)?),
                ],
                Payload::new("arrange", params),
            )?;
        }
        Ok(())
    })
}

fn random(args: RandomArgs) -> Result<()> {
    ensure!(
        args.side_min <= args.side_max,
        "side_min {} exceeds side_max {}",
        args.side_min,
        args.side_max
    );
    let mut rng = StdRng::seed_from_u64(args.seed);
    let triangles = (1..=args.count)
        .map(|id| Triangle::random(&mut rng, args.side_min, args.side_max, id))
        .collect::<Result<Vec<_>, _>>()?;
    let params = json!({
        "count": args.count,
        "seed": args.seed,
        "side_min": args.side_min,
        "side_max": args.side_max,
    });
    let sidecar = write_artifacts(
        &[(args.out.clone(), input::lengths_text(&triangles).into_bytes())],
        Payload::new("random", params),
    )?;
    tracing::info!(sidecar = %sidecar.display(), "random triangles");
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": geopuzzle::VERSION,
        "defaults": {
            "runner_kmh": 15.0,
            "bus_kmh": 30.0,
            "clock": "07:30",
            "subset_tolerance": ArrangeCfg::default().subset_tolerance,
            "base_angle_factor": ArrangeCfg::default().base_angle_factor,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    print!("{}", report::placement_table());
    Ok(())
}
