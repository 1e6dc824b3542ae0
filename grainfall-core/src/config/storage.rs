//! Persistent storage format for sand configuration
//!
//! The tuning is kept in flash so changes made on the device survive a power
//! cycle. Simulation state (grain positions) is never stored.
//!
//! Layout:
//! ```text
//! ┌───────┬─────────┬────────┬──────────────────┬───────┐
//! │ MAGIC │ VERSION │ LENGTH │ POSTCARD PAYLOAD │ CRC32 │
//! │ 4B LE │ 1B      │ 1B     │ 0–255B           │ 4B LE │
//! └───────┴─────────┴────────┴──────────────────┴───────┘
//! ```

use super::types::SandConfig;

/// Magic number to identify valid sand configuration data
pub const STORAGE_MAGIC: u32 = 0x53414E44; // "SAND"

/// Current storage format version
pub const STORAGE_VERSION: u8 = 1;

/// Header size (magic + version + length)
const HEADER_LEN: usize = 6;

/// Trailer size (CRC32)
const CRC_LEN: usize = 4;

/// Buffer size that always fits an encoded `SandConfig`
pub const MAX_STORED_SIZE: usize = 64;

/// Storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Output buffer too small
    BufferTooSmall,
    /// Magic number does not match
    BadMagic,
    /// Written by an incompatible version
    UnsupportedVersion,
    /// Data shorter than the header claims
    Truncated,
    /// CRC mismatch
    Corrupted,
    /// Payload could not be (de)serialized
    Serialization,
}

/// Encode a configuration into `buf`, returning the number of bytes used
pub fn encode(config: &SandConfig, buf: &mut [u8]) -> Result<usize, StorageError> {
    if buf.len() < HEADER_LEN + CRC_LEN {
        return Err(StorageError::BufferTooSmall);
    }

    let payload_space = (buf.len() - HEADER_LEN - CRC_LEN).min(u8::MAX as usize);
    let payload_len = postcard::to_slice(config, &mut buf[HEADER_LEN..HEADER_LEN + payload_space])
        .map_err(|e| match e {
            postcard::Error::SerializeBufferFull => StorageError::BufferTooSmall,
            _ => StorageError::Serialization,
        })?
        .len();

    buf[..4].copy_from_slice(&STORAGE_MAGIC.to_le_bytes());
    buf[4] = STORAGE_VERSION;
    buf[5] = payload_len as u8;

    let end = HEADER_LEN + payload_len;
    let crc = crc32(&buf[HEADER_LEN..end]);
    buf[end..end + CRC_LEN].copy_from_slice(&crc.to_le_bytes());

    Ok(end + CRC_LEN)
}

/// Decode a configuration previously written by [`encode`]
///
/// The decoded configuration is validated before it is returned.
pub fn decode(data: &[u8]) -> Result<SandConfig, StorageError> {
    if data.len() < HEADER_LEN + CRC_LEN {
        return Err(StorageError::Truncated);
    }

    let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic != STORAGE_MAGIC {
        return Err(StorageError::BadMagic);
    }
    if data[4] != STORAGE_VERSION {
        return Err(StorageError::UnsupportedVersion);
    }

    let end = HEADER_LEN + data[5] as usize;
    if data.len() < end + CRC_LEN {
        return Err(StorageError::Truncated);
    }

    let payload = &data[HEADER_LEN..end];
    let stored_crc = u32::from_le_bytes([data[end], data[end + 1], data[end + 2], data[end + 3]]);
    if stored_crc != crc32(payload) {
        return Err(StorageError::Corrupted);
    }

    let config: SandConfig =
        postcard::from_bytes(payload).map_err(|_| StorageError::Serialization)?;
    config.validate().map_err(|_| StorageError::Corrupted)?;
    Ok(config)
}

/// CRC32 (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = 0xFFFF_FFFFu32;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VelocityClamp;

    fn tuned() -> SandConfig {
        SandConfig {
            grain_count: 42,
            grain_size: 1,
            bounce_factor: 0.75,
            velocity_clamp: VelocityClamp::CeilingOnly,
            ..Default::default()
        }
    }

    #[test]
    fn test_crc32_known_value() {
        // Standard check value for "123456789"
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_encode_then_decode() {
        let mut buf = [0u8; MAX_STORED_SIZE];
        let len = encode(&tuned(), &mut buf).unwrap();
        assert!(len <= MAX_STORED_SIZE);
        assert_eq!(decode(&buf[..len]), Ok(tuned()));
    }

    #[test]
    fn test_corruption_detected() {
        let mut buf = [0u8; MAX_STORED_SIZE];
        let len = encode(&tuned(), &mut buf).unwrap();

        buf[HEADER_LEN] ^= 0x01;
        assert_eq!(decode(&buf[..len]), Err(StorageError::Corrupted));
    }

    #[test]
    fn test_header_checks() {
        let mut buf = [0u8; MAX_STORED_SIZE];
        let len = encode(&tuned(), &mut buf).unwrap();

        let mut bad_magic = buf;
        bad_magic[0] = 0;
        assert_eq!(decode(&bad_magic[..len]), Err(StorageError::BadMagic));

        let mut bad_version = buf;
        bad_version[4] = STORAGE_VERSION + 1;
        assert_eq!(decode(&bad_version[..len]), Err(StorageError::UnsupportedVersion));

        assert_eq!(decode(&buf[..len - 1]), Err(StorageError::Truncated));
        assert_eq!(decode(&buf[..3]), Err(StorageError::Truncated));
    }

    #[test]
    fn test_small_buffer() {
        let mut buf = [0u8; 12];
        assert_eq!(encode(&tuned(), &mut buf), Err(StorageError::BufferTooSmall));
        let mut tiny = [0u8; 4];
        assert_eq!(encode(&tuned(), &mut tiny), Err(StorageError::BufferTooSmall));
    }
}
