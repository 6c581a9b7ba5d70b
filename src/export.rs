//! Tabular and JSON output of finished runs.

use std::io::Write;

use crate::{error::TspResult, MetricGraph, TourReport};

const PRECISION: usize = 5;

/// Write the distance matrix and every pipeline artifact of one run as CSV sections
pub fn write_csv<W: Write>(out: &mut W, graph: &MetricGraph, report: &TourReport) -> TspResult<()> {
    let n = graph.size();
    writeln!(out, "=== Graph with {} nodes ===", n)?;

    writeln!(out, "Distance Matrix")?;
    let header = (0..n).map(|v| v.to_string()).collect::<Vec<_>>().join(",");
    writeln!(out, ",{}", header)?;
    for (u, row) in graph.distance_matrix().outer_iter().enumerate() {
        let row = row
            .iter()
            .map(|d| format!("{:.*}", PRECISION, d))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "{},{}", u, row)?;
    }
    writeln!(out)?;

    writeln!(out, "Minimum spanning tree")?;
    writeln!(out, "from,to,weight")?;
    for edge in &report.mst_edges {
        writeln!(out, "{},{},{:.*}", edge.u, edge.v, PRECISION, edge.weight)?;
    }
    writeln!(out, "total,,{:.*}", PRECISION, report.mst_weight)?;
    writeln!(out)?;

    write_walk(out, graph, "Eulerian walk", &report.euler_walk, report.euler_length)?;
    write_walk(
        out,
        graph,
        "Hamiltonian cycle",
        &report.hamiltonian_cycle,
        report.hamiltonian_length,
    )?;

    writeln!(out, "Summary")?;
    writeln!(out, "metric,value")?;
    writeln!(out, "mst_weight,{:.*}", PRECISION, report.mst_weight)?;
    writeln!(out, "euler_length,{:.*}", PRECISION, report.euler_length)?;
    writeln!(out, "hamiltonian_length,{:.*}", PRECISION, report.hamiltonian_length)?;
    writeln!(out, "approximation_ratio,{:.*}", PRECISION, report.approximation_ratio)?;
    writeln!(out)?;
    Ok(())
}

fn write_walk<W: Write>(
    out: &mut W,
    graph: &MetricGraph,
    title: &str,
    walk: &[usize],
    total: f64,
) -> TspResult<()> {
    writeln!(out, "{}", title)?;
    writeln!(out, "from,to,distance")?;
    for pair in walk.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        writeln!(out, "{},{},{:.*}", u, v, PRECISION, graph.distance(u, v))?;
    }
    writeln!(out, "total,,{:.*}", PRECISION, total)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, reports: &[TourReport]) -> TspResult<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_tour, graph::right_triangle};
    use pretty_assertions::assert_eq;

    #[test]
    fn csv_of_right_triangle() {
        let graph = right_triangle();
        let report = compute_tour(&graph).unwrap();
        let mut out = vec![];
        write_csv(&mut out, &graph, &report).unwrap();

        let expected = "\
=== Graph with 3 nodes ===
Distance Matrix
,0,1,2
0,0.00000,3.00000,4.00000
1,3.00000,0.00000,5.00000
2,4.00000,5.00000,0.00000

Minimum spanning tree
from,to,weight
0,1,3.00000
0,2,4.00000
total,,7.00000

Eulerian walk
from,to,distance
0,2,4.00000
2,0,4.00000
0,1,3.00000
1,0,3.00000
total,,14.00000

Hamiltonian cycle
from,to,distance
0,2,4.00000
2,1,5.00000
1,0,3.00000
total,,12.00000

Summary
metric,value
mst_weight,7.00000
euler_length,14.00000
hamiltonian_length,12.00000
approximation_ratio,1.71429

";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn json_lists_every_field() {
        let report = compute_tour(&right_triangle()).unwrap();
        let mut out = vec![];
        write_json(&mut out, &[report]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["n"], 3);
        assert_eq!(value[0]["mst_weight"], 7.0);
        assert_eq!(value[0]["hamiltonian_cycle"], serde_json::json!([0, 2, 1, 0]));
        assert_eq!(value[0]["mst_edges"][1]["v"], 2);
    }
}
