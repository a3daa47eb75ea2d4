use crate::error::MixedError;
use crate::types::KeyWidth;

// ─── Attribute extraction ───────────────────────────────────────────────────
//
//  A key id is also the byte offset of its attribute:
//
//  ┌────────┬──────────────────────┬────────────
//  │ ...    │ attr (width bytes)   │ ...
//  └────────┴──────────────────────┴────────────
//  0        key                    key + width
//
//  Attributes are little-endian unsigned integers, widened to u64.

/// Read the attribute for `key` out of `record`.
#[inline]
pub fn extract(key: usize, width: KeyWidth, record: &[u8]) -> Result<u64, MixedError> {
    let n = width.bytes();
    let bytes = key
        .checked_add(n)
        .and_then(|end| record.get(key..end))
        .ok_or(MixedError::RecordTooShort {
            key,
            width: n,
            len: record.len(),
        })?;
    let mut buf = [0u8; 8];
    buf[..n].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

/// Write `value` into the attribute for `key`, truncated to `width`.
/// Counterpart of [`extract`] for callers mutating records in place.
#[inline]
pub fn store(key: usize, width: KeyWidth, record: &mut [u8], value: u64) -> Result<(), MixedError> {
    let n = width.bytes();
    let len = record.len();
    let dst = key
        .checked_add(n)
        .and_then(|end| record.get_mut(key..end))
        .ok_or(MixedError::RecordTooShort { key, width: n, len })?;
    dst.copy_from_slice(&value.to_le_bytes()[..n]);
    Ok(())
}

/// Canonical hex rendering of a value, as used in log lines. Distinct values
/// always render distinctly; `width` only pads.
pub fn value_key(width: KeyWidth, value: u64) -> String {
    format!("{:0w$x}", value, w = width.bytes() * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_each_width() {
        let rec: [u8; 10] = [0xAA, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xBB];
        assert_eq!(extract(1, KeyWidth::U8, &rec).unwrap(), 0x01);
        assert_eq!(extract(1, KeyWidth::U16, &rec).unwrap(), 0x0201);
        assert_eq!(extract(1, KeyWidth::U32, &rec).unwrap(), 0x0403_0201);
        assert_eq!(extract(1, KeyWidth::U64, &rec).unwrap(), 0x0807_0605_0403_0201);
    }

    #[test]
    fn test_extract_u64_reads_high_half() {
        let rec = u64::MAX.to_le_bytes();
        assert_eq!(extract(0, KeyWidth::U64, &rec).unwrap(), u64::MAX);
        assert_eq!(extract(0, KeyWidth::U32, &rec).unwrap(), u32::MAX as u64);
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let rec = [0u8; 4];
        assert_eq!(
            extract(1, KeyWidth::U32, &rec),
            Err(MixedError::RecordTooShort { key: 1, width: 4, len: 4 })
        );
        assert!(extract(usize::MAX, KeyWidth::U8, &rec).is_err());
        assert_eq!(extract(3, KeyWidth::U8, &rec).unwrap(), 0);
    }

    #[test]
    fn test_store_then_extract() {
        let mut rec = [0u8; 6];
        store(2, KeyWidth::U16, &mut rec, 0x1_BEEF).unwrap();
        assert_eq!(rec, [0, 0, 0xEF, 0xBE, 0, 0]);
        assert_eq!(extract(2, KeyWidth::U16, &rec).unwrap(), 0xBEEF);
        assert!(store(5, KeyWidth::U16, &mut rec, 1).is_err());
    }

    #[test]
    fn test_value_key() {
        assert_eq!(value_key(KeyWidth::U32, 0x1f), "0000001f");
        assert_eq!(value_key(KeyWidth::U64, u64::MAX), "ffffffffffffffff");
        assert_ne!(value_key(KeyWidth::U8, 0x100), value_key(KeyWidth::U8, 0x10));
    }
}
