use std::fmt;
use std::str::FromStr;

use crate::errors::RegistryError;

/// A service id as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(pub i64);

impl ServiceId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for ServiceId {
    type Err = RegistryError;

    /// Text that is not a number is `InvalidInput`. A number that does not
    /// fit a signed 64-bit id (including any floating point form) is `OutOfRange`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<i64>() {
            return Ok(Self(id));
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Err(RegistryError::OutOfRange(raw.to_string())),
            _ if !raw.is_empty() && raw.trim_start_matches(['-', '+']).bytes().all(|b| b.is_ascii_digit()) => {
                Err(RegistryError::OutOfRange(raw.to_string()))
            }
            _ => Err(RegistryError::InvalidInput(raw.to_string())),
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
