use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use metric_tsp::{
    compute_tour, export, graph::mst::prim_weight, MetricGraph, MinimumSpanningTree, TourReport,
    TspError, TspResult,
};
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Opt {
    /// Number of vertices of each random instance
    #[arg(long, num_args = 1.., default_values_t = vec![10, 20, 50])]
    sizes: Vec<usize>,

    /// Each instance is seeded with this value plus its size
    #[arg(long, default_value_t = 1234)]
    seed_base: u64,

    /// Use this seed for every instance instead of deriving one from --seed-base
    #[arg(long)]
    seed: Option<u64>,

    /// Write the distance matrices and tours of all instances to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the reports as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also check the metric property and cross-check the MST against Prim's algorithm
    #[arg(long)]
    verify: bool,
}

fn main() -> TspResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("metric_tsp=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    let opt = Opt::parse();

    let result = run(&opt);
    if let Err(err) = &result {
        error!("{}", err);
    }
    result
}

fn run(opt: &Opt) -> TspResult<()> {
    // Each instance owns its RNG, so they can be solved in any order
    let runs = opt
        .sizes
        .par_iter()
        .map(|&n| -> TspResult<(MetricGraph, TourReport)> {
            let seed = opt.seed.unwrap_or(opt.seed_base.wrapping_add(n as u64));
            let graph = MetricGraph::generate(n, seed)?;
            if opt.verify {
                verify(&graph)?;
            }
            let report = compute_tour(&graph)?;
            Ok((graph, report))
        })
        .collect::<TspResult<Vec<_>>>()?;

    if let Some(path) = &opt.csv {
        let mut out = BufWriter::new(File::create(path)?);
        for (graph, report) in &runs {
            export::write_csv(&mut out, graph, report)?;
        }
        out.flush()?;
        info!("Wrote {} instances to {}", runs.len(), path.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let reports = runs.into_iter().map(|(_, report)| report).collect::<Vec<_>>();
    if opt.json {
        export::write_json(&mut out, &reports)?;
    } else {
        write_table(&mut out, &reports)?;
    }
    Ok(())
}

fn verify(graph: &MetricGraph) -> TspResult<()> {
    const TOLERANCE: f64 = 1e-9;
    if !graph.is_metric(TOLERANCE) {
        return Err(TspError::InvariantViolation(
            "distances violate the triangle inequality".to_string(),
        ));
    }
    let mst = MinimumSpanningTree::kruskal(graph);
    if !mst.is_spanning_tree(graph.size()) {
        return Err(TspError::InvariantViolation(
            "Kruskal's algorithm did not produce a spanning tree".to_string(),
        ));
    }
    let reference = prim_weight(graph);
    if (mst.weight() - reference).abs() > TOLERANCE * reference.max(1.) {
        return Err(TspError::InvariantViolation(format!(
            "Kruskal weight {} differs from Prim weight {}",
            mst.weight(),
            reference
        )));
    }
    info!("n = {}: instance verified", graph.size());
    Ok(())
}

fn write_table<W: Write>(out: &mut W, reports: &[TourReport]) -> io::Result<()> {
    writeln!(out, "n\tMST\tEuler\tTour\tRatio")?;
    for report in reports {
        writeln!(
            out,
            "{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            report.n,
            report.mst_weight,
            report.euler_length,
            report.hamiltonian_length,
            report.approximation_ratio
        )?;
    }
    Ok(())
}
