//! A1-notation column letters.

use crate::error::{TypesError, TypesResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A spreadsheet column, stored as a zero-based index (`A` = 0, `AA` = 26).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(u32);

impl Column {
    pub const A: Column = Column(0);

    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// Parses column letters such as `"E"` or `"aa"`.
    pub fn parse(letters: &str) -> TypesResult<Self> {
        let trimmed = letters.trim();
        if trimmed.is_empty() || trimmed.len() > 3 {
            return Err(TypesError::InvalidColumn(letters.to_string()));
        }

        let mut n: u32 = 0;
        for ch in trimmed.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(TypesError::InvalidColumn(letters.to_string()));
            }
            let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            n = n * 26 + digit;
        }
        Ok(Self(n - 1))
    }

    /// Returns the A1 cell reference for this column at `row`.
    pub fn cell(self, row: u32) -> String {
        format!("{self}{row}")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n = self.0 + 1;
        let mut buf = Vec::with_capacity(3);
        while n > 0 {
            let rem = (n - 1) % 26;
            buf.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        buf.reverse();
        // Only ASCII uppercase bytes are pushed above.
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Column {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Column::parse(&s).map_err(serde::de::Error::custom)
    }
}
