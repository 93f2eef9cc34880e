// Primitives for reading CSV files.

use snafu::ResultExt;

use crate::dashboard::{io_common::build_table, *};

pub fn read_csv_donations(path: &str) -> DashboardResult<Vec<Donation>> {
    let data = fs::read(path)
        .map_err(csv::Error::from)
        .context(OpeningCsvSnafu { path })?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());

    let mut rows: Vec<(u64, Vec<Cell>)> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let line = line_r.context(CsvLineParseSnafu { path })?;
        // The line counter of the reader ignores the blank lines it skips.
        let lineno = line
            .position()
            .map(|p| line_at(&data, p.byte()))
            .unwrap_or(idx as u64 + 1);
        rows.push((lineno, line.iter().map(read_cell).collect()));
    }
    build_table(path, rows)
}

/// The line number of the record starting at `byte`, past any blank lines.
fn line_at(data: &[u8], byte: u64) -> u64 {
    let start = (byte as usize).min(data.len());
    let first = data[start..]
        .iter()
        .position(|b| *b != b'\n' && *b != b'\r')
        .map(|off| start + off)
        .unwrap_or(data.len());
    data[..first].iter().filter(|b| **b == b'\n').count() as u64 + 1
}

fn read_cell(s: &str) -> Cell {
    if s.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}
