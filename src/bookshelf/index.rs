//! Row numbers as a terminal user types them.
//!
//! The table shows rows numbered from 1; the view addresses rows from 0.
//! [`DisplayIndex`] is the 1-based form, and [`parse_rows`] turns a list of
//! arguments such as `["1", "3-5"]` into the matching 0-based rows.

use crate::error::{Result, ShelfError};
use std::fmt;
use std::str::FromStr;

/// A 1-based row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(usize);

impl DisplayIndex {
    pub fn new(n: usize) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn from_row(row: usize) -> Self {
        Self(row + 1)
    }

    /// The 0-based row this number refers to.
    pub fn row(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(DisplayIndex::new)
            .ok_or_else(|| format!("Invalid row number: {}", s))
    }
}

/// An inclusive run of rows, as typed: `3` or `2-4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub start: DisplayIndex,
    pub end: DisplayIndex,
}

impl RowSpan {
    /// The first 0-based row of the span that a table of `shown` rows lacks.
    fn first_missing(self, shown: usize) -> Option<usize> {
        (self.end.0 > shown).then(|| self.start.row().max(shown))
    }

    fn rows(self) -> impl Iterator<Item = usize> {
        self.start.row()..=self.end.row()
    }
}

/// Parses a single row number or a range like "2-4" (inclusive).
///
/// Ranges stay unexpanded until they are checked against a table.
pub fn parse_index_or_range(s: &str) -> std::result::Result<RowSpan, String> {
    if let Some((start, end)) = s.split_once('-') {
        let start = DisplayIndex::from_str(start)?;
        let end = DisplayIndex::from_str(end)?;
        if start > end {
            return Err(format!(
                "Invalid range: start ({}) must be <= end ({})",
                start, end
            ));
        }
        return Ok(RowSpan { start, end });
    }
    DisplayIndex::from_str(s).map(|idx| RowSpan {
        start: idx,
        end: idx,
    })
}

/// Resolves every argument against a table of `shown` rows and returns the
/// distinct 0-based rows, highest first.
///
/// Every argument is parsed and bounds-checked before anything is expanded.
/// Highest first so that removing them one by one never shifts a row that is
/// still to be removed.
pub fn parse_rows<S: AsRef<str>>(args: &[S], shown: usize) -> Result<Vec<usize>> {
    let spans = args
        .iter()
        .map(|arg| parse_index_or_range(arg.as_ref()).map_err(ShelfError::InvalidIndex))
        .collect::<Result<Vec<_>>>()?;
    if let Some(missing) = spans.iter().filter_map(|span| span.first_missing(shown)).min() {
        return Err(ShelfError::NoSuchRow(missing));
    }

    let mut rows: Vec<usize> = spans.into_iter().flat_map(RowSpan::rows).collect();
    rows.sort_unstable_by(|a, b| b.cmp(a));
    rows.dedup();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        assert_eq!("3".parse::<DisplayIndex>().unwrap().row(), 2);
        assert_eq!(" 1 ".parse::<DisplayIndex>().unwrap().row(), 0);
    }

    #[test]
    fn test_parse_rejects_zero_and_junk() {
        assert!("0".parse::<DisplayIndex>().is_err());
        assert!("-1".parse::<DisplayIndex>().is_err());
        assert!("two".parse::<DisplayIndex>().is_err());
        assert!("".parse::<DisplayIndex>().is_err());
    }

    #[test]
    fn test_range() {
        let span = parse_index_or_range("2-4").unwrap();
        assert_eq!(span.rows().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(parse_index_or_range("3-3").unwrap().rows().count(), 1);
    }

    #[test]
    fn test_backwards_range_is_an_error() {
        let err = parse_index_or_range("4-2").unwrap_err();
        assert!(err.contains("start (4) must be <= end (2)"));
    }

    #[test]
    fn test_rows_are_deduplicated_highest_first() {
        assert_eq!(parse_rows(&["1", "3-4", "3"], 4).unwrap(), vec![3, 2, 0]);
    }

    #[test]
    fn test_rows_beyond_the_table_are_refused() {
        assert!(matches!(
            parse_rows(&["1", "7"], 3),
            Err(ShelfError::NoSuchRow(6))
        ));
        assert!(matches!(
            parse_rows(&["2-5"], 3),
            Err(ShelfError::NoSuchRow(3))
        ));
    }

    #[test]
    fn test_huge_range_is_checked_before_expanding() {
        let err = parse_rows(&["1-4000000000000"], 3).unwrap_err();
        assert!(matches!(err, ShelfError::NoSuchRow(3)));
        assert_eq!(err.to_string(), "No row 4 in the current table");

        let max = format!("1-{}", usize::MAX);
        assert!(matches!(parse_rows(&[max], 0), Err(ShelfError::NoSuchRow(0))));
    }

    #[test]
    fn test_unparseable_row_is_an_invalid_index() {
        assert!(matches!(
            parse_rows(&["1", "x-2"], 3),
            Err(ShelfError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(DisplayIndex::from_row(0).to_string(), "1");
    }
}
