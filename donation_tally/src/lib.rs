mod config;
use log::{debug, info};

pub use crate::config::*;

pub mod builder;
pub mod manual;

/// Computes the values displayed on the dashboard from a donation table.
///
/// Arguments:
/// * `table` the donations, oldest first. The order of the rows is trusted as is:
/// the latest donation is the last row.
/// * `previous_shown` how many donations before the latest one should be reported.
/// Fewer are reported if the table is too short.
pub fn summarize(table: &[Donation], previous_shown: usize) -> DonationSummary {
    let total: Amount = table.iter().map(|d| d.amount).sum();
    let (latest, previous) = match table.split_last() {
        Some((last, earlier)) => (
            Some(last.clone()),
            earlier
                .iter()
                .rev()
                .take(previous_shown)
                .cloned()
                .collect(),
        ),
        None => (None, Vec::new()),
    };
    debug!("summarize: latest: {:?} previous: {:?}", latest, previous);
    info!("Processed {} donations, total {}", table.len(), total);
    DonationSummary {
        total,
        count: table.len(),
        latest,
        previous,
    }
}

/// Splits the target between what has been donated and what remains.
///
/// The remaining part is zero once the target has been reached.
pub fn progress(donated: Amount, target: Amount) -> Progress {
    Progress {
        donated,
        remaining: (target - donated).clamp_zero(),
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, i64)]) -> Vec<Donation> {
        rows.iter()
            .map(|(name, dollars)| Donation::new(name, Amount::from_dollars(*dollars)))
            .collect()
    }

    #[test]
    fn two_donations() {
        let t = table(&[("A", 100), ("B", 200)]);
        let s = summarize(&t, DEFAULT_PREVIOUS_SHOWN);
        assert_eq!(s.total, Amount::from_dollars(300));
        assert_eq!(s.count, 2);
        assert_eq!(s.latest, Some(Donation::new("B", Amount::from_dollars(200))));
        assert_eq!(s.previous, table(&[("A", 100)]));

        let p = progress(s.total, Amount::from_dollars(1000));
        assert_eq!(p.remaining, Amount::from_dollars(700));
    }

    #[test]
    fn empty_table() {
        let s = summarize(&[], DEFAULT_PREVIOUS_SHOWN);
        assert_eq!(s.total, Amount::ZERO);
        assert_eq!(s.count, 0);
        assert_eq!(s.latest, None);
        assert!(s.previous.is_empty());
    }

    #[test]
    fn target_exceeded() {
        let t = table(&[("A", 700), ("B", 500)]);
        let s = summarize(&t, DEFAULT_PREVIOUS_SHOWN);
        let p = progress(s.total, Amount::from_dollars(1000));
        assert_eq!(p.donated, Amount::from_dollars(1200));
        assert_eq!(p.remaining, Amount::ZERO);
        assert_eq!(p.donated_fraction(), 1.0);
    }

    #[test]
    fn previous_is_bounded() {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        for len in 0..=names.len() {
            let t: Vec<Donation> = names[..len]
                .iter()
                .map(|n| Donation::new(n, Amount::from_dollars(10)))
                .collect();
            let s = summarize(&t, DEFAULT_PREVIOUS_SHOWN);
            let expected = len.saturating_sub(1).min(DEFAULT_PREVIOUS_SHOWN);
            assert_eq!(s.previous.len(), expected, "table of {} rows", len);
        }
    }

    #[test]
    fn previous_most_recent_first() {
        let t = table(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5), ("F", 6)]);
        let s = summarize(&t, DEFAULT_PREVIOUS_SHOWN);
        let names: Vec<&str> = s.previous.iter().map(|d| d.donor.as_str()).collect();
        assert_eq!(names, vec!["E", "D", "C", "B"]);
        assert_eq!(s.latest.map(|d| d.donor), Some("F".to_string()));

        let s2 = summarize(&t, 0);
        assert!(s2.previous.is_empty());
    }

    #[test]
    fn total_is_exact_sum() {
        let t: Vec<Donation> = (1..=100)
            .map(|i| Donation::new("X", Amount::from_cents(i * 10 + 1)))
            .collect();
        let expected: i64 = (1..=100).map(|i| i * 10 + 1).sum();
        assert_eq!(summarize(&t, 4).total, Amount::from_cents(expected));

        let dups = table(&[("A", 50), ("A", 50)]);
        assert_eq!(summarize(&dups, 4).total, Amount::from_dollars(100));
    }

    #[test]
    fn remaining_never_negative() {
        let target = Amount::from_dollars(1000);
        for donated in [0, 1, 999, 1000, 1001, 1_000_000] {
            let p = progress(Amount::from_dollars(donated), target);
            assert!(!p.remaining.is_negative());
            assert!(p.donated + p.remaining >= target);
        }
    }
}
