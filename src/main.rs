use std::{fs::OpenOptions, sync::Mutex};

use rand::{SeedableRng, rngs::StdRng};
use roadmap_planner::{
    FloatPoint, OccupancyField, Plan, PlannerBuilder, cmd::ArgVals, map_file, render,
};
use tracing::info;

const RENDER_COLUMNS: u64 = 120;
const RENDER_ROWS: u64 = 60;
const DEFAULT_LOG: &str = "prm_log.txt";

struct Query {
    map: String,
    start: FloatPoint,
    goal: FloatPoint,
    seed: Option<u64>,
    log: String,
    output: Option<String>,
}

fn main() {
    let args = ArgVals::from_env();
    if args.simple_vals.is_empty() {
        println!(
            "Usage: roadmap_planner map_file start=x,y goal=x,y [nodes=100] [neighbors=5] [threshold=200] [max_attempts=n] [seed=n] [log=prm_log.txt] [output=file]"
        );
    } else {
        match parse_args(&args) {
            Ok((query, builder)) => {
                if let Err(e) = init_logging(&query.log) {
                    eprintln!("Error: {e}");
                } else if let Err(e) = runner(query, builder) {
                    eprintln!("Unrecoverable error: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
            }
        }
    }
}

fn parse_args(args: &ArgVals) -> anyhow::Result<(Query, PlannerBuilder)> {
    let mut builder = PlannerBuilder::default();
    if let Some(nodes) = args.get_value("nodes")? {
        builder.samples(nodes);
    }
    if let Some(neighbors) = args.get_value("neighbors")? {
        builder.neighbors(neighbors);
    }
    if let Some(threshold) = args.get_value("threshold")? {
        builder.threshold(threshold);
    }
    if let Some(max_attempts) = args.get_value("max_attempts")? {
        builder.max_attempts(max_attempts);
    }
    let query = Query {
        map: args
            .get_symbol(0)
            .ok_or(anyhow::Error::msg("No map file given"))?
            .to_string(),
        start: args.require("start")?,
        goal: args.require("goal")?,
        seed: args.get_value("seed")?,
        log: args.get_str("log").unwrap_or(DEFAULT_LOG).to_string(),
        output: args.get_str("output").map(String::from),
    };
    Ok((query, builder))
}

fn init_logging(filename: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(filename)?;
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn runner(query: Query, builder: PlannerBuilder) -> anyhow::Result<()> {
    let planner = builder.build()?;
    let field: OccupancyField = map_file::load(&query.map)?;
    info!(
        map = query.map.as_str(),
        width = field.width(),
        height = field.height(),
        "grid loaded"
    );
    info!(start = %query.start, goal = %query.goal, "query");

    let mut rng = match query.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let plan = planner.plan(&field, query.start, query.goal, &mut rng)?;
    report(&plan);

    let picture = render::render(
        &field.with_threshold(planner.threshold()),
        &plan.roadmap,
        plan.path.as_ref(),
        RENDER_COLUMNS,
        RENDER_ROWS,
    );
    match query.output {
        Some(output) => {
            std::fs::write(&output, format!("{picture}\n"))?;
            info!(output = output.as_str(), "output saved");
        }
        None => println!("{picture}"),
    }
    Ok(())
}

fn report(plan: &Plan) {
    match &plan.path {
        Some(path) => {
            let waypoints = path.points().iter().map(|p| format!("{p}")).collect::<Vec<_>>();
            println!(
                "Path found with {} steps, length {:.2}: {}",
                path.len(),
                path.length(),
                waypoints.join(" -> ")
            );
        }
        None => println!(
            "No path found ({} vertices, {} edges)",
            plan.roadmap.len(),
            plan.roadmap.edge_count()
        ),
    }
}
