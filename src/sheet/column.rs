//! Spreadsheet column addressing
//!
//! Columns are stored zero-based internally. Configuration files and
//! diagnostics use spreadsheet letters ("A", "AC"), and the web-hook
//! endpoint expects one-based column numbers.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Zero-based column index into a sheet row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(pub usize);

impl Column {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Parse spreadsheet column letters ("A" = 0, "Z" = 25, "AA" = 26)
    pub fn from_letters(letters: &str) -> Result<Self> {
        let letters = letters.trim();
        if letters.is_empty() {
            return Err(anyhow!("Empty column reference"));
        }

        let mut number: usize = 0;
        for ch in letters.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(anyhow!("Invalid column reference: '{}'", letters));
            }
            let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            number = number
                .checked_mul(26)
                .and_then(|n| n.checked_add(digit))
                .ok_or_else(|| anyhow!("Column reference out of range: '{}'", letters))?;
        }

        Ok(Self(number - 1))
    }

    /// Spreadsheet letters for this column
    pub fn letters(&self) -> String {
        let mut n = self.0 + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        out.iter().rev().collect()
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// One-based column number, as used by the write endpoint
    pub fn number(&self) -> usize {
        self.0 + 1
    }

    pub fn offset(&self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.letters())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpec {
    Letters(String),
    Index(usize),
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColumnSpec::deserialize(deserializer)? {
            ColumnSpec::Letters(letters) => {
                Column::from_letters(&letters).map_err(serde::de::Error::custom)
            }
            ColumnSpec::Index(index) => Ok(Column(index)),
        }
    }
}
