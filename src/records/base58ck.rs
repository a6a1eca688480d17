use crate::{Error, Result};
use base58::{FromBase58, ToBase58};
use sha2::{Digest, Sha256};

/// Functions for base-58 encoding with checksum.
///
/// Currency addresses and the account text form use base-58 encoding with an
/// additional checksum: the first 4 bytes of the double-SHA256 of the value,
/// appended to the end before encoding.

fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first.as_slice());
    let mut out = [0u8; 32];
    out.copy_from_slice(second.as_slice());
    out
}

/// Encodes `data` as a base58 string including the checksum.
pub fn encode_with_checksum(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut ck_data = data.to_vec();
    ck_data.extend_from_slice(&checksum[0..4]);
    ck_data.to_base58()
}

/// Decode from base58 with checksum, verifying and removing the checksum.
pub fn decode_with_checksum(encoded: &str) -> Result<Vec<u8>> {
    let mut data = encoded.from_base58()?;
    let l = data.len();
    if l < 5 {
        Err(Error::BadArgument(
            "base58 string too short to contain checksum".to_string(),
        ))
    } else {
        let ck = sha256d(&data[..l - 4]);
        if ck[0..4] != data[l - 4..] {
            Err(Error::ChecksumMismatch)
        } else {
            data.truncate(l - 4);
            Ok(data)
        }
    }
}
