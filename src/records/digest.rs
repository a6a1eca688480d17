use crate::{Error, Result};
use hex::{FromHex, ToHex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256, Sha3_512};
use std::fmt;
use std::str::FromStr;

/// A transaction id: the SHA3-256 content hash of a fully packed record.
///
/// The hash always covers the complete packed form, signatures included.
/// Hashing the unsigned bytes would let a third party re-sign someone
/// else's record under a colliding id.
///
/// The hex form is plain lowercase, 64 characters, no byte reversal.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub raw: [u8; 32],
}

impl Link {
    pub const SIZE: usize = 32;
    pub const HEX_SIZE: usize = Link::SIZE * 2;

    /// Compute the transaction id of a packed record.
    pub fn from_packed(packed: &[u8]) -> Link {
        let mut raw = [0u8; Self::SIZE];
        raw.copy_from_slice(Sha3_256::digest(packed).as_slice());
        Link { raw }
    }

    /// Copy from a byte slice, rejecting any length other than 32.
    pub fn from_slice(slice: &[u8]) -> Result<Link> {
        if slice.len() != Self::SIZE {
            return Err(Error::BadArgument(format!(
                "link must be {} bytes, got {}",
                Self::SIZE,
                slice.len()
            )));
        }
        let mut raw = [0u8; Self::SIZE];
        raw.copy_from_slice(slice);
        Ok(Link { raw })
    }
}

impl FromHex for Link {
    type Error = Error;

    /// Converts a string of exactly 64 hex characters into a link.
    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self> {
        let hex = hex.as_ref();
        if hex.len() != Link::HEX_SIZE {
            return Err(Error::BadArgument(format!(
                "length of hex encoded link must be {}, len is {}",
                Link::HEX_SIZE,
                hex.len()
            )));
        }
        Link::from_slice(&hex::decode(hex)?)
    }
}

impl ToHex for Link {
    fn encode_hex<T: FromIterator<char>>(&self) -> T {
        self.raw.encode_hex()
    }

    fn encode_hex_upper<T: FromIterator<char>>(&self) -> T {
        self.raw.encode_hex_upper()
    }
}

impl FromStr for Link {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Link::from_hex(s)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode_hex::<String>().as_ref())
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Link::from_hex(s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// An asset id: the SHA3-512 hash of the asset's fingerprint text.
///
/// Hashing only the fingerprint, never the whole record, is what makes two
/// registrations of the same fingerprint collapse to one asset.
///
/// The hex form is plain lowercase, 128 characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetIdentifier {
    pub raw: [u8; 64],
}

impl AssetIdentifier {
    pub const SIZE: usize = 64;
    pub const HEX_SIZE: usize = AssetIdentifier::SIZE * 2;

    /// Compute the identifier for a fingerprint string.
    pub fn from_fingerprint(fingerprint: &str) -> AssetIdentifier {
        let mut raw = [0u8; Self::SIZE];
        raw.copy_from_slice(Sha3_512::digest(fingerprint.as_bytes()).as_slice());
        AssetIdentifier { raw }
    }

    /// Copy from a byte slice, rejecting any length other than 64.
    pub fn from_slice(slice: &[u8]) -> Result<AssetIdentifier> {
        if slice.len() != Self::SIZE {
            return Err(Error::BadArgument(format!(
                "asset identifier must be {} bytes, got {}",
                Self::SIZE,
                slice.len()
            )));
        }
        let mut raw = [0u8; Self::SIZE];
        raw.copy_from_slice(slice);
        Ok(AssetIdentifier { raw })
    }
}

impl FromHex for AssetIdentifier {
    type Error = Error;

    /// Converts a string of exactly 128 hex characters into an identifier.
    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self> {
        let hex = hex.as_ref();
        if hex.len() != AssetIdentifier::HEX_SIZE {
            return Err(Error::BadArgument(format!(
                "length of hex encoded asset identifier must be {}, len is {}",
                AssetIdentifier::HEX_SIZE,
                hex.len()
            )));
        }
        AssetIdentifier::from_slice(&hex::decode(hex)?)
    }
}

impl ToHex for AssetIdentifier {
    fn encode_hex<T: FromIterator<char>>(&self) -> T {
        self.raw.encode_hex()
    }

    fn encode_hex_upper<T: FromIterator<char>>(&self) -> T {
        self.raw.encode_hex_upper()
    }
}

impl FromStr for AssetIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AssetIdentifier::from_hex(s)
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl fmt::Debug for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl Serialize for AssetIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode_hex::<String>().as_ref())
    }
}

impl<'de> Deserialize<'de> for AssetIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AssetIdentifier::from_hex(s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn link_from_packed() {
        // SHA3-256("")
        let l = Link::from_packed(b"");
        assert_eq!(
            l.encode_hex::<String>(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        // SHA3-256("abc")
        let l = Link::from_packed(b"abc");
        assert_eq!(
            l.encode_hex::<String>(),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn link_hex_decode() {
        // valid
        let s = "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532";
        let l = Link::from_hex(s).unwrap();
        assert_eq!(l.to_string(), s);
        // uppercase accepted on input, rendered lowercase
        let l2 = Link::from_hex(s.to_uppercase()).unwrap();
        assert_eq!(l, l2);

        // invalid: short, long, bad character
        assert!(Link::from_hex(&s[1..]).is_err());
        assert!(Link::from_hex(format!("{}00", s)).is_err());
        let bad = "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe2451143153g";
        assert!(Link::from_hex(bad).is_err());
    }

    #[test]
    fn link_from_slice() {
        assert!(Link::from_slice(&[0u8; 32]).is_ok());
        assert!(Link::from_slice(&[0u8; 31]).is_err());
        assert!(Link::from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn asset_identifier_from_fingerprint() {
        // SHA3-512("abc")
        let id = AssetIdentifier::from_fingerprint("abc");
        let expected = hex!(
            "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e"
            "10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0"
        );
        assert_eq!(id.raw, expected);
        // identical fingerprints collapse to the same identifier
        assert_eq!(AssetIdentifier::from_fingerprint("abc"), id);
        assert_ne!(AssetIdentifier::from_fingerprint("abd"), id);
    }

    #[test]
    fn asset_identifier_hex() {
        let id = AssetIdentifier::from_fingerprint("0123456789abcdef");
        let s = id.to_string();
        assert_eq!(s.len(), AssetIdentifier::HEX_SIZE);
        let back = AssetIdentifier::from_hex(&s).unwrap();
        assert_eq!(back, id);
        assert!(AssetIdentifier::from_hex(&s[..127]).is_err());
    }

    #[test]
    fn json_serialize_link() {
        let l = Link::from_packed(b"abc");
        let serialized = serde_json::to_string(&l).unwrap();
        assert_eq!(
            serialized,
            "\"3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532\""
        );
        let back: Link = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back, l);
    }

    #[test]
    fn json_deserialize_rejects_bad_length() {
        let r: std::result::Result<Link, _> = serde_json::from_str("\"00ff\"");
        assert!(r.is_err());
    }
}
