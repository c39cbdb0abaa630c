use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;

use crate::{InputError, JobSet, TimeStep};

/// Reads a job file. `.csv` files hold comma separated rows, anything else holds
/// one `release execution deadline` triple per line.
pub fn read_job_file(path: impl AsRef<Path>) -> Result<JobSet, InputError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let job_set = if is_csv {
        read_csv_jobs(path)?
    } else {
        let text = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_jobs(&text)?
    };

    debug!("Loaded {} job(s) from {}", job_set.len(), path.display());
    Ok(job_set)
}

/// Parses whitespace separated `release execution deadline` lines. Blank lines are
/// skipped; any other malformed line invalidates the whole batch.
pub fn parse_jobs(text: &str) -> Result<JobSet, InputError> {
    let mut triples = Vec::new();

    for (n, line) in text.lines().enumerate() {
        // Only fully blank lines are tolerated; a short line is still malformed.
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        triples.push(parse_triple(&fields, n + 1, line)?);
    }

    Ok(JobSet::from_triples(triples))
}

/// Reads a header-less csv file with `release, execution, deadline` rows.
pub fn read_csv_jobs(path: impl AsRef<Path>) -> Result<JobSet, InputError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;
    let mut triples = Vec::new();

    for (n, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(n + 1);
        let fields: Vec<&str> = record.iter().collect();
        triples.push(parse_triple(&fields, line, &fields.join(","))?);
    }

    Ok(JobSet::from_triples(triples))
}

fn parse_triple(fields: &[&str], line: usize, content: &str) -> Result<(TimeStep, TimeStep, TimeStep), InputError> {
    let malformed = || InputError::Malformed {
        line,
        content: content.to_string(),
    };

    if fields.len() != 3 {
        return Err(malformed());
    }

    let mut values = [0.0; 3];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field.parse::<u32>().map_err(|_| malformed())? as TimeStep;
    }

    Ok((values[0], values[1], values[2]))
}
