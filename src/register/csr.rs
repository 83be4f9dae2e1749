//! Control/status register codec
//!
//! Layout of the CSR at address `0x0`:
//!
//! ```text
//! bit  0      ENABLE
//! bit  4      BYPASS
//! bit  5      HALT
//! bits 8..=15 BUFFER_COUNT (samples held while halted)
//! bit  16     OVERFLOW
//! bit  17     CLEAR_BUFFER (write-only strobe, self-clearing)
//! ```
//!
//! Everything here is pure; no register access happens in this module.

use serde::Serialize;
use std::fmt;

/// Address of the CSR; every other address is a plain data register
pub const CSR_ADDRESS: u32 = 0x0;

/// Named field of the CSR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsrField {
    Enable,
    Bypass,
    Halt,
    BufferCount,
    Overflow,
    ClearBuffer,
}

impl CsrField {
    pub const ALL: [CsrField; 6] = [
        CsrField::Enable,
        CsrField::Bypass,
        CsrField::Halt,
        CsrField::BufferCount,
        CsrField::Overflow,
        CsrField::ClearBuffer,
    ];

    /// Position of the field's least significant bit
    pub const fn shift(self) -> u32 {
        match self {
            CsrField::Enable => 0,
            CsrField::Bypass => 4,
            CsrField::Halt => 5,
            CsrField::BufferCount => 8,
            CsrField::Overflow => 16,
            CsrField::ClearBuffer => 17,
        }
    }

    /// Width of the field in bits
    pub const fn width(self) -> u32 {
        match self {
            CsrField::BufferCount => 8,
            _ => 1,
        }
    }

    /// Mask of the field in place
    pub const fn mask(self) -> u32 {
        ((1u32 << self.width()) - 1) << self.shift()
    }

    pub const fn name(self) -> &'static str {
        match self {
            CsrField::Enable => "ENABLE",
            CsrField::Bypass => "BYPASS",
            CsrField::Halt => "HALT",
            CsrField::BufferCount => "BUFFER_COUNT",
            CsrField::Overflow => "OVERFLOW",
            CsrField::ClearBuffer => "CLEAR_BUFFER",
        }
    }
}

impl fmt::Display for CsrField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extract a field from a CSR value
pub fn get_field(csr: u32, field: CsrField) -> u32 {
    (csr & field.mask()) >> field.shift()
}

/// Replace a field, leaving every other bit untouched.
///
/// `value` is truncated to the field width.
pub fn set_field(csr: u32, field: CsrField, value: u32) -> u32 {
    (csr & !field.mask()) | ((value << field.shift()) & field.mask())
}

/// Whether a single-bit field is set
pub fn is_set(csr: u32, field: CsrField) -> bool {
    get_field(csr, field) != 0
}

/// Flags reported by [`decode_active_flags`], in priority order
pub const FLAG_PRIORITY: [CsrField; 4] = [
    CsrField::Enable,
    CsrField::Bypass,
    CsrField::Halt,
    CsrField::Overflow,
];

/// Decoded view of the boolean CSR flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveFlags {
    /// The CSR could not be read
    ReadFailed,
    /// Flags that are set, in [`FLAG_PRIORITY`] order
    Active(Vec<CsrField>),
}

impl fmt::Display for ActiveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveFlags::ReadFailed => f.write_str("read failed"),
            ActiveFlags::Active(flags) if flags.is_empty() => f.write_str("NONE"),
            ActiveFlags::Active(flags) => {
                let names: Vec<&str> = flags.iter().map(|flag| flag.name()).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

/// Decode the set flags of a CSR read, distinguishing a failed read from an empty set
pub fn decode_active_flags(csr: Option<u32>) -> ActiveFlags {
    match csr {
        None => ActiveFlags::ReadFailed,
        Some(value) => ActiveFlags::Active(
            FLAG_PRIORITY
                .iter()
                .copied()
                .filter(|field| is_set(value, *field))
                .collect(),
        ),
    }
}

/// Format an optional register value as hex, `None` when unknown
pub fn format_value(value: Option<u32>) -> String {
    match value {
        Some(v) => format!("{:#x}", v),
        None => "None".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u32; 6] = [0, u32::MAX, 0x1234_5678, 0xdead_beef, 0x0003_ff31, 0x0001_0001];

    #[test]
    fn test_masks_do_not_overlap() {
        let mut seen = 0u32;
        for field in CsrField::ALL {
            assert_eq!(seen & field.mask(), 0, "{} overlaps", field);
            seen |= field.mask();
        }
        assert_eq!(CsrField::BufferCount.mask(), 0x0000_ff00);
        assert_eq!(CsrField::ClearBuffer.mask(), 0x0002_0000);
    }

    #[test]
    fn test_reapplying_field_is_identity() {
        for v in SAMPLES {
            for field in CsrField::ALL {
                assert_eq!(set_field(v, field, get_field(v, field)), v);
            }
        }
    }

    #[test]
    fn test_set_then_get_masks_to_width() {
        for v in SAMPLES {
            for field in CsrField::ALL {
                let modulus = 1u32 << field.width();
                for x in [0, 1, 2, 0x7f, 0xff, 0x100, 0x1ff, u32::MAX] {
                    let updated = set_field(v, field, x);
                    assert_eq!(get_field(updated, field), x % modulus);
                    // no other field is disturbed
                    assert_eq!(updated & !field.mask(), v & !field.mask());
                }
            }
        }
    }

    #[test]
    fn test_buffer_count_extraction() {
        let csr = set_field(0x0001_0021, CsrField::BufferCount, 200);
        assert_eq!(get_field(csr, CsrField::BufferCount), 200);
        assert!(is_set(csr, CsrField::Enable));
        assert!(is_set(csr, CsrField::Halt));
        assert!(is_set(csr, CsrField::Overflow));
        assert!(!is_set(csr, CsrField::Bypass));
    }

    #[test]
    fn test_decode_failure_marker() {
        assert_eq!(decode_active_flags(None), ActiveFlags::ReadFailed);
        assert_eq!(decode_active_flags(None).to_string(), "read failed");
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_active_flags(Some(0)), ActiveFlags::Active(vec![]));
        assert_eq!(decode_active_flags(Some(0)).to_string(), "NONE");
        // count and strobe bits are not flags
        assert_eq!(decode_active_flags(Some(0x0002_ff00)).to_string(), "NONE");
    }

    #[test]
    fn test_decode_priority_order() {
        let flags = decode_active_flags(Some(0x0001_0031));
        assert_eq!(flags.to_string(), "ENABLE, BYPASS, HALT, OVERFLOW");
        assert_eq!(
            flags,
            ActiveFlags::Active(vec![
                CsrField::Enable,
                CsrField::Bypass,
                CsrField::Halt,
                CsrField::Overflow
            ])
        );

        // bit 1 is not BYPASS
        assert_eq!(decode_active_flags(Some(0x3)).to_string(), "ENABLE");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(0x11)), "0x11");
        assert_eq!(format_value(None), "None");
    }
}
