//! Result text and board rendering.

use eco_world::{Grid, SimulationResult};
use std::fmt::Write as _;

/// Final state in the scenario format: header line then one object per line.
///
/// The fourth header field is the number of generations left, which is
/// always zero after a complete run.
pub fn format_result(result: &SimulationResult) -> String {
    let c = &result.config;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} 0 {} {} {}",
        c.rabbit_breeding,
        c.fox_breeding,
        c.fox_starvation,
        c.rows,
        c.cols,
        result.objects.len()
    );
    for object in &result.objects {
        let _ = writeln!(out, "{object}");
    }
    out
}

pub fn render_board(grid: &Grid, generation: u64) -> String {
    let frame = "-".repeat(grid.cols() + 2);
    let mut out = String::with_capacity((grid.cols() + 3) * (grid.rows() + 3));
    let _ = writeln!(out, "Generation {generation}");
    let _ = writeln!(out, "{frame}");
    for row in grid.cells().chunks(grid.cols()) {
        out.push('|');
        out.extend(row.iter().map(|cell| cell.kind.symbol()));
        out.push_str("|\n");
    }
    let _ = writeln!(out, "{frame}");
    out.push('\n');
    out
}

pub fn format_timing(elapsed: std::time::Duration) -> String {
    format!("{:.5}", elapsed.as_secs_f64() * 1000.0)
}
