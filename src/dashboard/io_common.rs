use donation_tally::builder::TableBuilder;
use snafu::ResultExt;

use crate::dashboard::*;

/// Validates the rows read from a file and assembles the donation table.
///
/// The first row is the header. Each row comes with its line number in the file.
pub fn build_table<I>(path: &str, rows: I) -> DashboardResult<Vec<Donation>>
where
    I: IntoIterator<Item = (u64, Vec<Cell>)>,
{
    let mut iter = rows.into_iter();
    let header = iter.next().map(|(_, cells)| cells).unwrap_or_default();
    debug!("build_table: header: {:?}", header);
    let mut builder = TableBuilder::new(&header).context(InvalidTableSnafu { path })?;
    for (lineno, row) in iter {
        debug!("build_table: line {}: {:?}", lineno, row);
        builder
            .add_row(lineno, &row)
            .context(InvalidTableSnafu { path })?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn header_only() {
        let rows = vec![(1, vec![text("Donor Name"), text("Donation Amount")])];
        assert!(build_table("t.csv", rows).unwrap().is_empty());
    }

    #[test]
    fn no_rows_at_all() {
        let res = build_table("t.csv", Vec::<(u64, Vec<Cell>)>::new());
        assert!(matches!(
            res,
            Err(DashboardError::InvalidTable {
                source: TallyError::MissingColumn { .. },
                ..
            })
        ));
    }

    #[test]
    fn errors_carry_the_line() {
        let rows = vec![
            (1, vec![text("Donor Name"), text("Donation Amount")]),
            (2, vec![text("A"), Cell::Number(5.0)]),
            (9, vec![text("B"), text("five")]),
        ];
        let err = build_table("t.csv", rows).unwrap_err();
        assert_eq!(err.kind(), FailureKind::SchemaError);
        assert!(err.describe().contains("line 9"), "{}", err.describe());
    }
}
