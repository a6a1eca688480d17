use crate::records::base58ck;
use crate::{Error, Result};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Size of an ed25519 public key.
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Size of an account in packed form: flag byte plus public key.
pub const ACCOUNT_SIZE: usize = PUBLIC_KEY_SIZE + 1;
/// Size of an ed25519 signature.
pub const SIGNATURE_SIZE: usize = 64;

// flag byte: key type in the high nibble, network in the low bit
const KEY_TYPE_ED25519: u8 = 0x01;
const TEST_BIT: u8 = 0x01;

/// A record-signing identity: an ed25519 public key plus a network flag.
///
/// The packed form is 33 bytes: one flag byte (key type in the high nibble,
/// test-network bit in the low bit) followed by the 32 raw key bytes. The
/// text form is base58 with a 4-byte sha256d checksum over those 33 bytes.
///
/// The all-zero public key is the reserved "destroyed" sentinel: records may
/// name it as a destination owner to burn ownership, but it can never act as
/// a signer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Account {
    test_net: bool,
    public_key: [u8; PUBLIC_KEY_SIZE],
}

impl Account {
    /// Construct from a raw public key and network flag.
    pub fn new(public_key: [u8; PUBLIC_KEY_SIZE], test_net: bool) -> Account {
        Account {
            test_net,
            public_key,
        }
    }

    /// Reconstruct an account from its packed 33-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Account> {
        if bytes.len() != ACCOUNT_SIZE {
            return Err(Error::CannotDecodeAccount);
        }
        let flags = bytes[0];
        if flags >> 4 != KEY_TYPE_ED25519 || flags & !(KEY_TYPE_ED25519 << 4 | TEST_BIT) != 0 {
            return Err(Error::CannotDecodeAccount);
        }
        let mut public_key = [0u8; PUBLIC_KEY_SIZE];
        public_key.copy_from_slice(&bytes[1..]);
        Ok(Account {
            test_net: flags & TEST_BIT != 0,
            public_key,
        })
    }

    /// The packed 33-byte form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(ACCOUNT_SIZE);
        v.push(KEY_TYPE_ED25519 << 4 | if self.test_net { TEST_BIT } else { 0 });
        v.extend_from_slice(&self.public_key);
        v
    }

    /// True for accounts created on the testing network.
    pub fn is_testing(&self) -> bool {
        self.test_net
    }

    /// True for the destroyed/burned sentinel.
    pub fn is_zero(&self) -> bool {
        self.public_key == [0u8; PUBLIC_KEY_SIZE]
    }

    /// The raw public key bytes.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public_key
    }

    /// Verify an ed25519 signature over `message`.
    ///
    /// The zero sentinel can never verify anything. No distinction is made
    /// between a malformed key, a malformed signature and a wrong signature.
    pub fn check_signature(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        if self.is_zero() {
            return Err(Error::InvalidSignature);
        }
        let sig_bytes: [u8; SIGNATURE_SIZE] = signature
            .try_into()
            .map_err(|_| Error::InvalidSignature)?;
        let key =
            VerifyingKey::from_bytes(&self.public_key).map_err(|_| Error::InvalidSignature)?;
        key.verify(message, &Signature::from_bytes(&sig_bytes))
            .map_err(|_| Error::InvalidSignature)
    }

    /// The base58-with-checksum text form.
    pub fn to_base58(&self) -> String {
        base58ck::encode_with_checksum(&self.to_bytes())
    }

    /// Parse the base58-with-checksum text form.
    pub fn from_base58(s: &str) -> Result<Account> {
        Account::from_bytes(&base58ck::decode_with_checksum(s)?)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Account {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Account::from_base58(s)
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Account::from_base58(&s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// The signing half of an account.
///
/// Signing happens outside the codec (the two-phase pack workflow hands the
/// canonical bytes out and takes a signature back), but wallets and tests
/// need a concrete signer.
#[derive(Clone)]
pub struct PrivateKey {
    inner: ed25519_dalek::SigningKey,
    test_net: bool,
}

impl PrivateKey {
    /// Derive a private key from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32], test_net: bool) -> PrivateKey {
        PrivateKey {
            inner: ed25519_dalek::SigningKey::from_bytes(seed),
            test_net,
        }
    }

    /// The public account for this key.
    pub fn account(&self) -> Account {
        Account {
            test_net: self.test_net,
            public_key: self.inner.verifying_key().to_bytes(),
        }
    }

    /// Sign a message, producing a 64-byte ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        use ed25519_dalek::Signer;
        self.inner.sign(message).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(seed: u8, test_net: bool) -> PrivateKey {
        PrivateKey::from_seed(&[seed; 32], test_net)
    }

    #[test]
    fn bytes_round_trip() {
        let account = keypair(1, true).account();
        let b = account.to_bytes();
        assert_eq!(b.len(), ACCOUNT_SIZE);
        assert_eq!(b[0], 0x11);
        let back = Account::from_bytes(&b).unwrap();
        assert_eq!(back, account);

        let live = keypair(1, false).account();
        assert_eq!(live.to_bytes()[0], 0x10);
    }

    #[test]
    fn rejects_bad_bytes() {
        let mut b = keypair(2, false).account().to_bytes();
        // unknown key type
        b[0] = 0x20;
        assert!(Account::from_bytes(&b).is_err());
        // stray flag bits
        b[0] = 0x14;
        assert!(Account::from_bytes(&b).is_err());
        // wrong lengths
        assert!(Account::from_bytes(&[0x10u8; 32]).is_err());
        assert!(Account::from_bytes(&[0x10u8; 34]).is_err());
        assert!(Account::from_bytes(&[]).is_err());
    }

    #[test]
    fn signature_check() {
        let key = keypair(3, true);
        let account = key.account();
        let message = b"canonical unsigned bytes";
        let sig = key.sign(message);
        assert!(account.check_signature(message, &sig).is_ok());
        // altered message
        assert!(account.check_signature(b"other bytes", &sig).is_err());
        // altered signature
        let mut bad = sig.clone();
        bad[0] ^= 0x01;
        assert!(account.check_signature(message, &bad).is_err());
        // empty and truncated signatures
        assert!(account.check_signature(message, &[]).is_err());
        assert!(account.check_signature(message, &sig[..63]).is_err());
    }

    #[test]
    fn zero_account_never_verifies() {
        let zero = Account::new([0u8; PUBLIC_KEY_SIZE], true);
        assert!(zero.is_zero());
        let sig = [0u8; SIGNATURE_SIZE];
        assert!(zero.check_signature(b"anything", &sig).is_err());
    }

    #[test]
    fn base58_round_trip() {
        let account = keypair(4, false).account();
        let text = account.to_base58();
        let back = Account::from_base58(&text).unwrap();
        assert_eq!(back, account);
        assert_eq!(account.to_string(), text);
        // corrupt the checksum
        let mut corrupt = text.clone();
        let last = corrupt.pop().unwrap();
        corrupt.push(if last == '1' { '2' } else { '1' });
        assert!(Account::from_base58(&corrupt).is_err());
    }

    #[test]
    fn json_round_trip() {
        let account = keypair(5, true).account();
        let s = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&s).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn random_seed_accounts_differ() {
        use rand::RngCore;
        let mut seed_a = [0u8; 32];
        let mut seed_b = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed_a);
        rand::thread_rng().fill_bytes(&mut seed_b);
        let a = PrivateKey::from_seed(&seed_a, true).account();
        let b = PrivateKey::from_seed(&seed_b, true).account();
        assert_ne!(a, b);
    }
}
