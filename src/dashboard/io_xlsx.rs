// Reading the donations from an Excel workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use snafu::{OptionExt, ResultExt};

use crate::dashboard::{config_reader::FileSource, io_common::build_table, *};

pub fn read_xlsx_donations(path: &str, source: &FileSource) -> DashboardResult<Vec<Donation>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &source.worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?,
        None => workbook
            .worksheet_range_at(0)
            .context(NoWorksheetSnafu { path })?,
    }
    .context(OpeningExcelSnafu { path })?;
    range_to_donations(path, &wrange)
}

/// The first row of the range is the header.
pub fn range_to_donations(path: &str, wrange: &Range<DataType>) -> DashboardResult<Vec<Donation>> {
    // The range starts at the first used cell, which is not always A1.
    let first_line = wrange.start().map(|(row, _)| row as u64 + 1).unwrap_or(1);
    let rows = wrange
        .rows()
        .enumerate()
        .map(|(idx, row)| (first_line + idx as u64, row.iter().map(read_cell).collect()));
    build_table(path, rows)
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        other => Cell::Other(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[&[DataType]]) -> Range<DataType> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), v.clone());
            }
        }
        range
    }

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn reads_donations() {
        let range = sheet(&[
            &[s("Donor Name"), s("Donation Amount")],
            &[s("A"), DataType::Float(100.0)],
            &[s("B"), DataType::Int(200)],
            &[DataType::Empty, DataType::Empty],
        ]);
        let table = range_to_donations("t.xlsx", &range).unwrap();
        assert_eq!(
            table,
            vec![
                Donation::new("A", Amount::from_dollars(100)),
                Donation::new("B", Amount::from_dollars(200)),
            ]
        );
    }

    #[test]
    fn wrong_cell_type() {
        let range = sheet(&[
            &[s("Donor Name"), s("Donation Amount")],
            &[s("A"), DataType::Bool(true)],
        ]);
        let err = range_to_donations("t.xlsx", &range).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidTable {
                source: TallyError::InvalidAmount { lineno: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn offset_range_line_numbers() {
        let mut range = Range::new((3, 1), (4, 2));
        range.set_value((3, 1), s("Donor Name"));
        range.set_value((3, 2), s("Donation Amount"));
        range.set_value((4, 1), s("A"));
        let err = range_to_donations("t.xlsx", &range).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidTable {
                source: TallyError::MissingAmount { lineno: 5 },
                ..
            }
        ));
    }

    #[test]
    fn missing_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");
        let err = read_xlsx_donations(path.to_str().unwrap(), &FileSource::default()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::SourceUnavailable);
    }

    #[test]
    fn not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "Donor Name,Donation Amount\n").unwrap();
        let err = read_xlsx_donations(path.to_str().unwrap(), &FileSource::default()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::SourceUnavailable);
    }
}
