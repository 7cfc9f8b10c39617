mod allocation;

/// 32 bytes of repeating digits, the payload most cases write.
pub(crate) const S32: &[u8; 32] = b"01234567890123456789012345678901";
