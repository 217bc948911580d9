//! Field flags and signature flags.
//!
//! Implements field flags per ISO 32000-1:2008 Section 12.7.3 (Field Flags).
//!
//! The `Ff` entry is one integer whose low three bits are common to all
//! field types; the remaining bits mean different things for buttons, text
//! fields and choice fields. [`FieldFlags`] names them all in one set, so
//! bit 26 appears both as `RICH_TEXT` (text) and `RADIOS_IN_UNISON`
//! (buttons), and bit 23 as `DO_NOT_SPELL_CHECK` for text and choice fields.

use bitflags::bitflags;

bitflags! {
    /// Field flags (`Ff`).
    ///
    /// Per PDF spec Tables 221, 226, 228 and 230.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u32 {
        // --- Common flags (bits 1-3) ---
        /// Bit 1: Field is read-only; user cannot change the value
        const READ_ONLY = 1 << 0;
        /// Bit 2: Field is required; must have a value before submit
        const REQUIRED = 1 << 1;
        /// Bit 3: Field should not be exported by submit-form action
        const NO_EXPORT = 1 << 2;

        // --- Text field flags ---
        /// Bit 13: Text may include multiple lines
        const MULTILINE = 1 << 12;
        /// Bit 14: Text should be displayed as asterisks (password)
        const PASSWORD = 1 << 13;
        /// Bit 21: File path should be submitted as field value
        const FILE_SELECT = 1 << 20;
        /// Bit 23: Text should not be spell-checked (text and choice)
        const DO_NOT_SPELL_CHECK = 1 << 22;
        /// Bit 24: Text should not scroll beyond visible area
        const DO_NOT_SCROLL = 1 << 23;
        /// Bit 25: Field is divided into equally spaced positions (comb)
        const COMB = 1 << 24;
        /// Bit 26: Field contains rich text
        const RICH_TEXT = 1 << 25;

        // --- Button field flags ---
        /// Bit 15: At least one radio button must be on
        const NO_TOGGLE_TO_OFF = 1 << 14;
        /// Bit 16: Radio button (if not set and not PUSHBUTTON, a check box)
        const RADIO = 1 << 15;
        /// Bit 17: Push button (performs action, doesn't retain value)
        const PUSHBUTTON = 1 << 16;
        /// Bit 26: Radio buttons with the same on state turn on together
        const RADIOS_IN_UNISON = 1 << 25;

        // --- Choice field flags ---
        /// Bit 18: Combo box (dropdown); if not set, a list box
        const COMBO = 1 << 17;
        /// Bit 19: (combo only) User may enter custom text
        const EDIT = 1 << 18;
        /// Bit 20: Options should be sorted alphabetically
        const SORT = 1 << 19;
        /// Bit 22: (list only) Allow multiple selections
        const MULTI_SELECT = 1 << 21;
        /// Bit 27: Value is committed when selection changes (not on blur)
        const COMMIT_ON_SEL_CHANGE = 1 << 26;
    }
}

impl FieldFlags {
    /// Check the read-only flag.
    pub fn is_read_only(&self) -> bool {
        self.contains(Self::READ_ONLY)
    }

    /// Check the required flag.
    pub fn is_required(&self) -> bool {
        self.contains(Self::REQUIRED)
    }

    /// Check the no-export flag.
    pub fn is_no_export(&self) -> bool {
        self.contains(Self::NO_EXPORT)
    }
}

bitflags! {
    /// Document signature flags (`SigFlags` in the AcroForm dictionary).
    ///
    /// Per PDF spec Table 219.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SignatureFlags: u32 {
        /// Bit 1: The document contains at least one signature field
        const SIGNATURES_EXIST = 1 << 0;
        /// Bit 2: Saves must be incremental to keep signatures valid
        const APPEND_ONLY = 1 << 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_common_flags() {
        let flags = FieldFlags::from_bits_retain(0b111);
        assert!(flags.is_read_only());
        assert!(flags.is_required());
        assert!(flags.is_no_export());
        assert!(!FieldFlags::empty().is_read_only());
    }

    #[test]
    fn test_flag_bit_positions() {
        assert_eq!(FieldFlags::MULTILINE.bits(), 4096);
        assert_eq!(FieldFlags::PASSWORD.bits(), 8192);
        assert_eq!(FieldFlags::RADIO.bits(), 32768);
        assert_eq!(FieldFlags::PUSHBUTTON.bits(), 65536);
        assert_eq!(FieldFlags::COMBO.bits(), 131072);
        assert_eq!(FieldFlags::COMB.bits(), 1 << 24);
    }

    #[test]
    fn test_shared_bits() {
        assert_eq!(FieldFlags::RICH_TEXT, FieldFlags::RADIOS_IN_UNISON);
        let text = FieldFlags::from_bits_retain(1 << 25);
        assert!(text.contains(FieldFlags::RICH_TEXT));
    }

    #[test]
    fn test_signature_flags() {
        let flags = SignatureFlags::from_bits_retain(3);
        assert!(flags.contains(SignatureFlags::SIGNATURES_EXIST));
        assert!(flags.contains(SignatureFlags::APPEND_ONLY));
    }

    proptest! {
        #[test]
        fn prop_unknown_bits_survive(bits in any::<u32>()) {
            let flags = FieldFlags::from_bits_retain(bits);
            prop_assert_eq!(flags.bits(), bits);
            prop_assert_eq!(flags.is_read_only(), bits & 1 == 1);
        }
    }
}
