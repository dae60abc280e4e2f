//! Node identifiers
//!
//! An identifier is stored on disk either as 8 bytes ("short") or as 16
//! bytes ("long"). Only the trailing 8 bytes of a long identifier are
//! significant, so both widths load into the same in-memory value.

use std::fmt;
use std::str::FromStr;

/// Size of a short identifier on disk
pub const SHORT_GUID_SIZE: usize = 8;

/// Size of a long identifier on disk
pub const LONG_GUID_SIZE: usize = 16;

/// An 8-byte node identifier. All zero means "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid([u8; SHORT_GUID_SIZE]);

impl Guid {
    /// The unset identifier
    pub const EMPTY: Guid = Guid([0; SHORT_GUID_SIZE]);

    pub const fn from_bytes(bytes: [u8; SHORT_GUID_SIZE]) -> Self {
        Guid(bytes)
    }

    /// Build an identifier from the trailing half of a long on-disk value
    pub fn from_long(bytes: [u8; LONG_GUID_SIZE]) -> Self {
        let mut short = [0u8; SHORT_GUID_SIZE];
        short.copy_from_slice(&bytes[SHORT_GUID_SIZE..]);
        Guid(short)
    }

    pub const fn from_u64(value: u64) -> Self {
        Guid(value.to_le_bytes())
    }

    pub const fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }

    pub const fn as_bytes(&self) -> &[u8; SHORT_GUID_SIZE] {
        &self.0
    }

    /// The long on-disk form: eight zero bytes followed by the identifier
    pub fn to_long(&self) -> [u8; LONG_GUID_SIZE] {
        let mut long = [0u8; LONG_GUID_SIZE];
        long[SHORT_GUID_SIZE..].copy_from_slice(&self.0);
        long
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0; SHORT_GUID_SIZE]
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.as_u64())
    }
}

/// Error parsing an identifier from hex text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier {0:?}: expected up to 16 hex digits")]
pub struct ParseGuidError(String);

impl FromStr for Guid {
    type Err = ParseGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("0x");
        if digits.is_empty() || digits.len() > 16 {
            return Err(ParseGuidError(s.to_string()));
        }
        u64::from_str_radix(digits, 16)
            .map(Guid::from_u64)
            .map_err(|_| ParseGuidError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(Guid::EMPTY.is_empty());
        assert!(Guid::default().is_empty());
        assert!(!Guid::from_u64(1).is_empty());
    }

    #[test]
    fn test_long_keeps_trailing_half() {
        let mut long = [0xAAu8; LONG_GUID_SIZE];
        long[8..].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let guid = Guid::from_long(long);
        assert_eq!(guid.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Guid::from_long(guid.to_long()), guid);
    }

    #[test]
    fn test_parse_and_display() {
        let guid: Guid = "0x00000000deadbeef".parse().unwrap();
        assert_eq!(guid.as_u64(), 0xDEAD_BEEF);
        assert_eq!(guid.to_string(), "00000000deadbeef");
        assert!("".parse::<Guid>().is_err());
        assert!("xyz".parse::<Guid>().is_err());
        assert!("11112222333344445".parse::<Guid>().is_err());
    }
}
