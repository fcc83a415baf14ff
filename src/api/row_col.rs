//! Cell coordinates and their A1 notation. Only the sheet implementations deal in column
//! letters; everything above them uses integer column positions.

use anyhow::{bail, Context};
use std::fmt;
use std::str::FromStr;

/// A 1-based (row, column) cell position. Displays and parses in A1 notation, e.g. `C5`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RowCol(pub usize, pub usize);

impl RowCol {
    pub fn new(row: usize, col: usize) -> Self {
        Self(row, col)
    }

    pub fn row(&self) -> usize {
        self.0
    }

    pub fn col(&self) -> usize {
        self.1
    }
}

/// Converts a 1-based column position to its letters: 1 -> `A`, 26 -> `Z`, 27 -> `AA`.
pub fn column_letters(col: usize) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts column letters to a 1-based column position: `A` -> 1, `AA` -> 27.
fn column_position(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0usize, |acc, c| {
        if c.is_ascii_alphabetic() {
            Some(acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1))
        } else {
            None
        }
    })
}

impl fmt::Display for RowCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.1), self.0)
    }
}

impl FromStr for RowCol {
    type Err = anyhow::Error;

    /// Parses a single cell such as `B12`. For a range such as `A2:C2`, use the part before `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .with_context(|| format!("Cell reference '{s}' has no row number"))?;
        let (letters, digits) = s.split_at(split);
        let col = column_position(letters)
            .with_context(|| format!("Cell reference '{s}' has an invalid column"))?;
        let row = digits
            .parse::<usize>()
            .with_context(|| format!("Cell reference '{s}' has an invalid row"))?;
        if row == 0 {
            bail!("Cell reference '{s}' has row 0, rows start at 1");
        }
        Ok(RowCol(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(8), "H");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(702), "ZZ");
    }

    #[test]
    fn test_row_col_display() {
        assert_eq!(RowCol::new(1, 1).to_string(), "A1");
        assert_eq!(RowCol::new(5, 3).to_string(), "C5");
        assert_eq!(RowCol::new(10, 28).to_string(), "AB10");
    }

    #[test]
    fn test_row_col_from_str() {
        assert_eq!("A2".parse::<RowCol>().unwrap(), RowCol::new(2, 1));
        assert_eq!("ab10".parse::<RowCol>().unwrap(), RowCol::new(10, 28));
        assert_eq!(" H7 ".parse::<RowCol>().unwrap(), RowCol::new(7, 8));
    }

    #[test]
    fn test_row_col_from_str_invalid() {
        assert!("A".parse::<RowCol>().is_err()); // No row
        assert!("12".parse::<RowCol>().is_err()); // No column
        assert!("A0".parse::<RowCol>().is_err()); // Row zero
        assert!("A-1".parse::<RowCol>().is_err());
        assert!("1A".parse::<RowCol>().is_err());
    }
}
