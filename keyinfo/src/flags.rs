//! Key flags and their one/two character abbreviations

use bitflags::bitflags;

bitflags! {
    /// Properties of a key entry that matter for display and selection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyFlags: u32 {
        const CAN_SIGN = 1 << 0;
        const CAN_ENCRYPT = 1 << 1;
        const IS_X509 = 1 << 2;
        const SECRET = 1 << 7;
        const EXPIRED = 1 << 8;
        const REVOKED = 1 << 9;
        const DISABLED = 1 << 10;
        /// Never derived from a [`Key`](crate::Key); entries always describe
        /// the primary key. Callers building flags by hand may set it.
        const SUBKEY = 1 << 11;
        const CRITICAL = 1 << 12;
        const PREFER_ENCRYPTION = 1 << 13;
        const PREFER_SIGNING = 1 << 14;

        /// The key must not be used at all
        const CANT_USE = Self::DISABLED.bits() | Self::REVOKED.bits() | Self::EXPIRED.bits();
        const RESTRICTIONS = Self::CANT_USE.bits() | Self::CRITICAL.bits();
        const ABILITIES = Self::CAN_ENCRYPT.bits()
            | Self::CAN_SIGN.bits()
            | Self::PREFER_ENCRYPTION.bits()
            | Self::PREFER_SIGNING.bits();
    }
}

/// Two character summary of what a key can do: `e`/`s` for encrypt/sign,
/// `.` when the key prefers the other operation, `-` when it cannot.
pub fn abilities(flags: KeyFlags) -> String {
    let encrypt = if !flags.contains(KeyFlags::CAN_ENCRYPT) {
        '-'
    } else if flags.contains(KeyFlags::PREFER_SIGNING) {
        '.'
    } else {
        'e'
    };
    let sign = if !flags.contains(KeyFlags::CAN_SIGN) {
        '-'
    } else if flags.contains(KeyFlags::PREFER_ENCRYPTION) {
        '.'
    } else {
        's'
    };
    [encrypt, sign].iter().collect()
}

/// The most important restriction as a single character.
pub fn flag_char(flags: KeyFlags) -> char {
    if flags.contains(KeyFlags::REVOKED) {
        'R'
    } else if flags.contains(KeyFlags::EXPIRED) {
        'X'
    } else if flags.contains(KeyFlags::DISABLED) {
        'd'
    } else if flags.contains(KeyFlags::CRITICAL) {
        'c'
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::none(KeyFlags::empty(), "--")]
    #[case::both(KeyFlags::CAN_ENCRYPT | KeyFlags::CAN_SIGN, "es")]
    #[case::encrypt_only(KeyFlags::CAN_ENCRYPT, "e-")]
    #[case::sign_only(KeyFlags::CAN_SIGN, "-s")]
    #[case::prefers_signing(KeyFlags::CAN_ENCRYPT | KeyFlags::CAN_SIGN | KeyFlags::PREFER_SIGNING, ".s")]
    #[case::prefers_encryption(KeyFlags::CAN_ENCRYPT | KeyFlags::CAN_SIGN | KeyFlags::PREFER_ENCRYPTION, "e.")]
    fn test_abilities(#[case] flags: KeyFlags, #[case] expected: &str) {
        assert_eq!(abilities(flags), expected);
    }

    #[rstest]
    #[case::clean(KeyFlags::CAN_SIGN, ' ')]
    #[case::revoked(KeyFlags::REVOKED | KeyFlags::EXPIRED, 'R')]
    #[case::expired(KeyFlags::EXPIRED | KeyFlags::DISABLED, 'X')]
    #[case::disabled(KeyFlags::DISABLED | KeyFlags::CRITICAL, 'd')]
    #[case::critical(KeyFlags::CRITICAL, 'c')]
    fn test_flag_char(#[case] flags: KeyFlags, #[case] expected: char) {
        assert_eq!(flag_char(flags), expected);
    }

    #[test]
    fn test_composite_flags() {
        assert!(KeyFlags::RESTRICTIONS.contains(KeyFlags::CANT_USE));
        assert!(KeyFlags::CANT_USE.contains(KeyFlags::EXPIRED));
        assert!(!KeyFlags::ABILITIES.intersects(KeyFlags::RESTRICTIONS));
    }
}
