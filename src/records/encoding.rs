use crate::records::account::Account;
use crate::records::digest::Link;
use crate::records::network::Network;
use crate::records::var_int::{clipped_varint, varint_encode};
use crate::{Error, Result};
use bytes::Bytes;
use hex::{FromHex, ToHex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ceiling on any single variable-length field read from untrusted input.
/// Length prefixes are attacker-controlled; this bounds them before any
/// allocation or copy happens.
pub const MAX_FIELD_LENGTH: usize = 8192;

/// Ceiling on a signature field. This is an ambiguity and DoS guard, not a
/// cryptographic requirement; real ed25519 signatures are 64 bytes.
pub const MAX_SIGNATURE_LENGTH: usize = 1024;

/// The canonical byte-serialized form of a transaction record.
///
/// Wire- and storage-identical: these bytes are the interop contract other
/// nodes depend on. Never mutated once produced.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Packed {
    raw: Bytes,
}

impl Packed {
    pub(crate) fn from_vec(v: Vec<u8>) -> Packed {
        Packed { raw: Bytes::from(v) }
    }

    /// The transaction id: content hash of the complete packed bytes.
    pub fn link(&self) -> Link {
        Link::from_packed(&self.raw)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.raw
    }
}

impl AsRef<[u8]> for Packed {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl FromHex for Packed {
    type Error = Error;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self> {
        Ok(Packed {
            raw: Bytes::from(hex::decode(hex)?),
        })
    }
}

impl fmt::Display for Packed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode_hex::<String>())
    }
}

impl Serialize for Packed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode_hex::<String>().as_ref())
    }
}

impl<'de> Deserialize<'de> for Packed {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Packed::from_hex(s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// Canonical bytes awaiting a signature.
///
/// Produced when `pack` finds the signature (or countersignature) field
/// empty or unverifiable: these are exactly the bytes the next signature
/// must be computed over. Sign them out-of-band, attach the signature to
/// the record, and pack again.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Unsigned {
    raw: Vec<u8>,
}

impl Unsigned {
    pub fn as_slice(&self) -> &[u8] {
        &self.raw
    }
}

impl AsRef<[u8]> for Unsigned {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

/// Why a `pack` call did not produce a [Packed] buffer.
///
/// The signature variants are not necessarily bugs: a missing signature is
/// the expected first round of the sign-then-repack workflow, and the
/// carried [Unsigned] bytes are the message to sign. `Rejected` is a
/// genuine failure of the record itself.
#[derive(Debug)]
pub enum PackError {
    /// The record failed structural validation, or the signer is
    /// unacceptable. No bytes are produced.
    Rejected(Error),
    /// The signature is absent or does not verify. Contains the exact
    /// bytes a valid signature must cover.
    InvalidSignature(Unsigned),
    /// The countersignature is absent or does not verify. Contains the
    /// exact bytes (unsigned form plus first signature field) a valid
    /// countersignature must cover.
    InvalidCountersignature(Unsigned),
}

impl PackError {
    /// The best-effort bytes-to-sign, when the failure is a signature round.
    pub fn unsigned(&self) -> Option<&Unsigned> {
        match self {
            PackError::Rejected(_) => None,
            PackError::InvalidSignature(u) => Some(u),
            PackError::InvalidCountersignature(u) => Some(u),
        }
    }
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PackError::Rejected(e) => write!(f, "pack rejected: {}", e),
            PackError::InvalidSignature(_) => f.write_str("invalid signature"),
            PackError::InvalidCountersignature(_) => f.write_str("invalid countersignature"),
        }
    }
}

impl std::error::Error for PackError {}

impl From<Error> for PackError {
    fn from(e: Error) -> Self {
        PackError::Rejected(e)
    }
}

/// Pack-side append buffer.
///
/// Fields go in strictly in the variant's canonical order; every
/// variable-length field gets a varint length prefix. The signature seal
/// methods implement the embed-then-verify step shared by every variant.
pub(crate) struct Builder {
    buf: Vec<u8>,
}

impl Builder {
    pub(crate) fn new(tag: u64) -> Builder {
        let mut buf = Vec::with_capacity(256);
        varint_encode(&mut buf, tag);
        Builder { buf }
    }

    pub(crate) fn u64(&mut self, value: u64) {
        varint_encode(&mut self.buf, value);
    }

    /// Append a length-prefixed field.
    pub(crate) fn bytes(&mut self, field: &[u8]) {
        varint_encode(&mut self.buf, field.len() as u64);
        self.buf.extend_from_slice(field);
    }

    /// Append a fixed-size field, no prefix.
    pub(crate) fn raw(&mut self, field: &[u8]) {
        self.buf.extend_from_slice(field);
    }

    pub(crate) fn byte(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn account(&mut self, account: &Account) {
        self.bytes(&account.to_bytes());
    }

    /// Verify `signature` by `signer` over everything appended so far, then
    /// append it length-prefixed. An absent or unverifiable signature
    /// surrenders the bytes-to-sign instead.
    pub(crate) fn sign(
        &mut self,
        signer: &Account,
        signature: &[u8],
    ) -> std::result::Result<(), PackError> {
        match signer.check_signature(&self.buf, signature) {
            Ok(()) => {
                self.bytes(signature);
                Ok(())
            }
            Err(_) => Err(PackError::InvalidSignature(Unsigned {
                raw: self.buf.clone(),
            })),
        }
    }

    /// Countersignature round: same embed-then-verify step, over the
    /// already-signed bytes, distinguished error.
    pub(crate) fn countersign(
        &mut self,
        signer: &Account,
        signature: &[u8],
    ) -> std::result::Result<(), PackError> {
        match signer.check_signature(&self.buf, signature) {
            Ok(()) => {
                self.bytes(signature);
                Ok(())
            }
            Err(_) => Err(PackError::InvalidCountersignature(Unsigned {
                raw: self.buf.clone(),
            })),
        }
    }

    pub(crate) fn finish(self) -> Packed {
        Packed::from_vec(self.buf)
    }
}

/// Unpack-side cursor over an untrusted buffer.
///
/// Every read is bounds-checked; any violation is the undifferentiated
/// [Error::NotTransactionPack]. No read can panic.
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    n: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Cursor<'a> {
        Cursor { buf, n: 0 }
    }

    /// Bytes consumed so far.
    pub(crate) fn consumed(&self) -> usize {
        self.n
    }

    /// The prefix of the buffer consumed so far. This is the message a
    /// signature field arriving next must verify against.
    pub(crate) fn signed_prefix(&self) -> &'a [u8] {
        &self.buf[..self.n]
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        let (value, used) = crate::records::var_int::varint_decode(&self.buf[self.n..])?;
        self.n += used;
        Ok(value)
    }

    pub(crate) fn byte(&mut self) -> Result<u8> {
        if self.n >= self.buf.len() {
            return Err(Error::NotTransactionPack);
        }
        let b = self.buf[self.n];
        self.n += 1;
        Ok(b)
    }

    /// Read a length-prefixed field whose length must lie in `min ..= max`.
    pub(crate) fn field(&mut self, min: usize, max: usize) -> Result<&'a [u8]> {
        let (length, offset) = clipped_varint(&self.buf[self.n..], min, max)?;
        let start = self.n + offset;
        self.n = start + length;
        Ok(&self.buf[start..start + length])
    }

    /// Read a fixed-size field, no prefix.
    pub(crate) fn fixed(&mut self, length: usize) -> Result<&'a [u8]> {
        if self.n + length > self.buf.len() {
            return Err(Error::NotTransactionPack);
        }
        let start = self.n;
        self.n += length;
        Ok(&self.buf[start..start + length])
    }

    /// Read an embedded account and check it against the expected network.
    pub(crate) fn account(&mut self, network: Network) -> Result<Account> {
        let bytes = self.field(1, crate::records::account::ACCOUNT_SIZE)?;
        let account = Account::from_bytes(bytes)?;
        if account.is_testing() != network.is_testing() {
            return Err(Error::WrongNetworkForPublicKey);
        }
        Ok(account)
    }

    /// Read a signature field.
    pub(crate) fn signature(&mut self) -> Result<&'a [u8]> {
        self.field(1, MAX_SIGNATURE_LENGTH)
    }
}
