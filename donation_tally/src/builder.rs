use log::{debug, warn};

pub use crate::config::*;

/// Validates the rows of a spreadsheet and assembles the donation table.
///
/// The builder is the only place where the shape of the external data is
/// trusted or rejected: the columns are looked up by name once, and each row
/// is checked as it is added.
///
/// ```
/// use donation_tally::builder::TableBuilder;
/// use donation_tally::{Cell, TallyError};
///
/// let header = vec![
///     Cell::Text("Donor Name".to_string()),
///     Cell::Text("Donation Amount".to_string()),
/// ];
/// let mut builder = TableBuilder::new(&header)?;
/// builder.add_row(2, &[Cell::Text("Anna".to_string()), Cell::Number(100.0)])?;
/// builder.add_row(3, &[Cell::Text("Bob".to_string()), Cell::Text("250".to_string())])?;
///
/// assert_eq!(builder.build().len(), 2);
/// # Ok::<(), TallyError>(())
/// ```
pub struct TableBuilder {
    donor_idx: usize,
    amount_idx: usize,
    donations: Vec<Donation>,
}

impl TableBuilder {
    pub fn new(header: &[Cell]) -> Result<TableBuilder, TallyError> {
        let donor_idx = find_column(header, DONOR_COLUMN)?;
        let amount_idx = find_column(header, AMOUNT_COLUMN)?;
        debug!(
            "TableBuilder: donor column: {}, amount column: {}",
            donor_idx, amount_idx
        );
        Ok(TableBuilder {
            donor_idx,
            amount_idx,
            donations: Vec::new(),
        })
    }

    /// Adds a row of the spreadsheet.
    ///
    /// lineno: the line number of the row in the source, only used for error messages.
    /// Rows with no content at all are skipped. Missing trailing cells count as empty.
    pub fn add_row(&mut self, lineno: u64, row: &[Cell]) -> Result<(), TallyError> {
        if row.iter().all(|c| c.is_empty()) {
            debug!("add_row: line {}: skipping blank row", lineno);
            return Ok(());
        }
        let donor = read_donor(row.get(self.donor_idx).unwrap_or(&Cell::Empty));
        let amount = read_amount(lineno, row.get(self.amount_idx).unwrap_or(&Cell::Empty))?;
        if amount.is_negative() {
            warn!(
                "add_row: line {}: negative donation {} from {:?}",
                lineno, amount, donor
            );
        }
        self.donations.push(Donation { donor, amount });
        Ok(())
    }

    /// The donations, in the order of the source.
    pub fn build(self) -> Vec<Donation> {
        self.donations
    }
}

fn find_column(header: &[Cell], name: &str) -> Result<usize, TallyError> {
    let positions: Vec<usize> = header
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| match c {
            Cell::Text(s) if s.trim() == name => Some(idx),
            _ => None,
        })
        .collect();
    match positions.as_slice() {
        [idx] => Ok(*idx),
        [] => Err(TallyError::MissingColumn {
            column: name.to_string(),
        }),
        _ => Err(TallyError::DuplicateColumn {
            column: name.to_string(),
        }),
    }
}

fn read_donor(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "".to_string(),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(x) => x.to_string(),
        Cell::Other(s) => s.clone(),
    }
}

fn read_amount(lineno: u64, cell: &Cell) -> Result<Amount, TallyError> {
    let invalid = || TallyError::InvalidAmount {
        lineno,
        content: format!("{:?}", cell),
    };
    match cell {
        Cell::Empty => Err(TallyError::MissingAmount { lineno }),
        Cell::Text(s) if s.trim().is_empty() => Err(TallyError::MissingAmount { lineno }),
        Cell::Number(x) => Amount::from_number(*x).ok_or_else(invalid),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Amount::from_number)
            .ok_or_else(invalid),
        Cell::Other(_) => Err(invalid()),
    }
}
