//! MAC prefix notation
//!
//! Converts between human-entered prefix notation (`00:1A:2B`, `00-1a-2b-3c`,
//! `001A.2B3C.4D5E`, `00:1A:2B:30:00:00/28`, ...) and a canonical
//! left-aligned 48-bit value with a significant-bit count.
//!
//! # Canonical form
//!
//! The decoded hex digits are shifted so the first digit occupies the top
//! nibble of the 48-bit space, then every bit past the prefix length is
//! cleared. Two prefixes are compared only in this form.

use std::fmt;
use std::str::FromStr;

/// Width of a MAC address in bits.
pub const MAC_BITS: u8 = 48;

/// Separator characters accepted between hex digit groups.
const SEPARATORS: [char; 3] = [':', '-', '.'];

/// Error type for prefix parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid mask: {0}")]
    InvalidMask(String),
    #[error("invalid hex length: {0}")]
    InvalidHexLength(String),
    #[error("failed to decode hex: {0}")]
    HexDecode(String),
}

/// A canonical MAC prefix.
///
/// Invariant: `len <= 48` and no bit below the top `len` bits of the 48-bit
/// space is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacPrefix {
    bits: u64,
    len: u8,
}

impl MacPrefix {
    /// Build a prefix from a left-aligned 48-bit value, clearing bits past `len`.
    ///
    /// Returns `None` if `len` exceeds 48 or `bits` does not fit in 48 bits.
    pub fn from_bits(bits: u64, len: u8) -> Option<Self> {
        if len > MAC_BITS || bits >> MAC_BITS != 0 {
            return None;
        }
        Some(Self {
            bits: truncate(bits, len),
            len,
        })
    }

    /// Left-aligned 48-bit value.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of significant leading bits.
    #[inline]
    pub const fn len(&self) -> u8 {
        self.len
    }

    /// Whether this is a full 48-bit address rather than a prefix.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == MAC_BITS
    }

    /// Containment comparison.
    ///
    /// True when both prefixes agree on their first `min(len_a, len_b)` bits,
    /// i.e. the shorter one describes an address block holding the longer one.
    /// Symmetric.
    #[inline]
    pub fn overlaps(&self, other: &MacPrefix) -> bool {
        let common = self.len.min(other.len);
        truncate(self.bits, common) == truncate(other.bits, common)
    }
}

impl FromStr for MacPrefix {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (body, mask) = match token.find('/') {
            Some(pos) => (&token[..pos], Some(&token[pos + 1..])),
            None => (token, None),
        };

        let mask = match mask {
            Some(text) => Some(parse_mask(text)?),
            None => None,
        };

        let clean = strip_separators(body).to_ascii_uppercase();
        if !matches!(clean.len(), 6 | 8 | 10 | 12) {
            return Err(ParseError::InvalidHexLength(clean));
        }
        // from_str_radix tolerates a leading '+', plain hex digits only here
        if !is_hex(&clean) {
            return Err(ParseError::HexDecode(clean));
        }
        let value =
            u64::from_str_radix(&clean, 16).map_err(|_| ParseError::HexDecode(clean.clone()))?;

        let digit_bits = (clean.len() * 4) as u8;
        let aligned = value << (MAC_BITS - digit_bits);
        let len = mask.unwrap_or(digit_bits);

        Ok(Self {
            bits: truncate(aligned, len),
            len,
        })
    }
}

impl fmt::Display for MacPrefix {
    /// Six colon-separated octets, with `/len` appended for partial prefixes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = format!("{:012X}", self.bits);
        for (i, octet) in hex.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}{}", octet[0] as char, octet[1] as char)?;
        }
        if !self.is_full() {
            write!(f, "/{}", self.len)?;
        }
        Ok(())
    }
}

/// Parse the text after `/` as a mask in `[0, 48]`.
fn parse_mask(text: &str) -> Result<u8, ParseError> {
    match text.parse::<i64>() {
        Ok(m) if (0..=MAC_BITS as i64).contains(&m) => Ok(m as u8),
        _ => Err(ParseError::InvalidMask(text.to_string())),
    }
}

/// Clear every bit past the first `len` bits of the 48-bit space.
#[inline]
fn truncate(bits: u64, len: u8) -> u64 {
    let shift = MAC_BITS - len;
    (bits >> shift) << shift
}

/// Remove `:`, `-` and `.` from a token.
pub fn strip_separators(token: &str) -> String {
    token.chars().filter(|c| !SEPARATORS.contains(c)).collect()
}

/// Whether every byte is an ASCII hex digit (true for the empty string).
pub fn is_hex(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether a token is a hex fragment too short to be a prefix.
///
/// Such tokens (2 to 5 hex digits once separators are removed) are rejected
/// outright instead of being tried as vendor names.
pub fn is_ambiguous_fragment(token: &str) -> bool {
    let clean = strip_separators(token);
    (2..6).contains(&clean.len()) && is_hex(&clean)
}
