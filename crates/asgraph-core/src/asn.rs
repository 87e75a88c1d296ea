//! Autonomous system numbers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one autonomous system.
///
/// Always in `1..=u32::MAX`. Zero, negative, out-of-range and non-integer
/// input is rejected at construction, so every `Asn` in a graph is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u32")]
pub struct Asn(u32);

impl Asn {
    /// Create an ASN from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if `raw` is not in `1..=u32::MAX`.
    pub fn new(raw: i64) -> Result<Self> {
        u32::try_from(raw)
            .ok()
            .filter(|&value| value > 0)
            .map(Self)
            .ok_or_else(|| Error::InvalidIdentifier(raw.to_string()))
    }

    /// The numeric value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Asn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let raw: i64 = trimmed
            .parse()
            .map_err(|_| Error::InvalidIdentifier(trimmed.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<u64> for Asn {
    type Error = Error;

    fn try_from(raw: u64) -> Result<Self> {
        i64::try_from(raw)
            .map_err(|_| Error::InvalidIdentifier(raw.to_string()))
            .and_then(Self::new)
    }
}

impl From<Asn> for u32 {
    fn from(asn: Asn) -> Self {
        asn.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(13335)]
    #[case(4_294_967_295)]
    fn accepts_positive_values(#[case] raw: i64) {
        let asn = Asn::new(raw).unwrap();
        assert_eq!(i64::from(asn.get()), raw);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(4_294_967_296)]
    fn rejects_out_of_range_values(#[case] raw: i64) {
        assert_eq!(
            Asn::new(raw),
            Err(Error::InvalidIdentifier(raw.to_string()))
        );
    }

    #[rstest]
    #[case("174", Some(174))]
    #[case(" 3356 ", Some(3356))]
    #[case("0", None)]
    #[case("-7", None)]
    #[case("12.5", None)]
    #[case("AS15169", None)]
    #[case("", None)]
    fn parses_text(#[case] input: &str, #[case] expected: Option<u32>) {
        let parsed = input.parse::<Asn>().ok().map(Asn::get);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn try_from_u64_rejects_zero() {
        assert!(Asn::try_from(0_u64).is_err());
        assert_eq!(Asn::try_from(701_u64).map(Asn::get), Ok(701));
    }
}
