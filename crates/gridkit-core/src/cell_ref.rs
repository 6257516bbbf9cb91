//! Cell references and A1 addresses.
//!
//! A [`CellRef`] is the stable string a grid model hands out for a cell; the
//! selection engine never looks inside it. [`Address`] is the column/row
//! form the reference [`Sheet`](crate::Sheet) uses, with bidirectional
//! conversion to spreadsheet notation ("A1", "B2", "AA100").

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Opaque, stable address of a cell within a grid model.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellRef(String);

impl CellRef {
    pub fn new(address: impl Into<String>) -> Self {
        CellRef(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellRef {
    fn from(value: &str) -> Self {
        CellRef::new(value)
    }
}

impl From<String> for CellRef {
    fn from(value: String) -> Self {
        CellRef(value)
    }
}

impl From<Address> for CellRef {
    fn from(value: Address) -> Self {
        CellRef(value.to_string())
    }
}

static A1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("valid A1 pattern")
});

/// Zero-indexed column/row coordinates.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address {
    pub col: usize,
    pub row: usize,
}

impl Address {
    pub fn new(col: usize, row: usize) -> Address {
        Address { col, row }
    }

    /// Parse spreadsheet notation (e.g., "A1", "b2", "AA10").
    pub fn parse(name: &str) -> Option<Address> {
        let caps = A1.captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Address::new(col, row))
    }

    /// Column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Address::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_and_multi_letter_columns() {
        assert_eq!(Address::parse("A1"), Some(Address::new(0, 0)));
        assert_eq!(Address::parse("Z1"), Some(Address::new(25, 0)));
        assert_eq!(Address::parse("AA1"), Some(Address::new(26, 0)));
        assert_eq!(Address::parse("BA10"), Some(Address::new(52, 9)));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Address::parse("aA1"), Some(Address::new(26, 0)));
    }

    #[test]
    fn parse_rejects_invalid_inputs() {
        for bad in ["", "123", "ABC", "A0", "1A", "A 1"] {
            assert!(Address::parse(bad).is_none(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn parse_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(Address::parse(&huge).is_none());
    }

    #[test]
    fn display_matches_parse() {
        let addr = Address::new(27, 99);
        assert_eq!(addr.to_string(), "AB100");
        assert_eq!(CellRef::from(addr).as_str(), "AB100");
    }
}
