use std::collections::HashMap;
use std::io::Write;

use crate::scheduler::{Policy, SimulationReport};
use crate::TimeStep;

/// Renders the per-processor timelines as a bordered table, one row per processor.
///
/// ```text
/// +-------+----+----+----+
/// | cpu-0 | J0 | J0 | J2 |
/// +-------+----+----+----+
/// | cpu-1 | J1 | J1 | i  |
/// +-------+----+----+----+
/// ```
pub fn render_timeline(report: &SimulationReport) -> String {
    let rows: Vec<Vec<String>> = report
        .timelines
        .iter()
        .enumerate()
        .map(|(id, timeline)| {
            std::iter::once(format!("cpu-{id}"))
                .chain(timeline.iter().map(ToString::to_string))
                .collect()
        })
        .collect();
    render_table(&rows)
}

fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .chain(std::iter::once("+".to_string()))
        .collect();

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        for (i, &width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            out.push_str(&format!("| {cell:<width$} "));
        }
        out.push_str("|\n");
        out.push_str(&border);
        out.push('\n');
    }
    out
}

/// One line of the csv export.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run: usize,
    pub policy: Policy,
    pub missed_jobs: Vec<String>,
    pub makespan: TimeStep,
    pub idle_time: TimeStep,
}

impl RunSummary {
    pub fn new(run: usize, report: &SimulationReport) -> Self {
        Self {
            run,
            policy: report.policy,
            missed_jobs: report.missed.clone(),
            makespan: report.makespan,
            idle_time: report.total_idle_time(),
        }
    }
}

/// Writes run summaries as csv with a header row.
pub fn write_csv<W: Write>(writer: W, rows: &[RunSummary]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["run", "policy", "missed", "missed_jobs", "makespan", "idle_time"])?;

    for row in rows {
        wtr.write_record([
            row.run.to_string(),
            row.policy.to_string(),
            row.missed_jobs.len().to_string(),
            row.missed_jobs.join(";"),
            row.makespan.to_string(),
            row.idle_time.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Deadline misses per policy, accumulated over several runs.
#[derive(Debug, Default)]
pub struct MissStatistics {
    misses: HashMap<Policy, Vec<usize>>,
}

impl MissStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, policy: Policy, missed: usize) {
        self.misses.entry(policy).or_default().push(missed);
    }

    pub fn runs(&self, policy: Policy) -> &[usize] {
        self.misses.get(&policy).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn average(&self, policy: Policy) -> Option<f64> {
        let runs = self.runs(policy);
        if runs.is_empty() {
            return None;
        }
        Some(runs.iter().sum::<usize>() as f64 / runs.len() as f64)
    }

    /// Averages of every recorded policy, in `Policy::ALL` order.
    pub fn averages(&self) -> Vec<(Policy, f64)> {
        Policy::ALL
            .into_iter()
            .filter_map(|policy| self.average(policy).map(|avg| (policy, avg)))
            .collect()
    }
}
