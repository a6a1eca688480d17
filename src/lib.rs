//! Transaction record codec for the bitmark property system.
//!
//! This library defines the canonical binary form of every value-transfer
//! record (asset registration, issuance, transfers, shares, block ownership),
//! binds each record to its signature(s) in a fixed order, and recovers typed
//! records from untrusted byte buffers. It is a pure function library: no
//! I/O, no shared mutable state, safe to call from any number of threads.
//!
//! It is not a node, a wallet, or a storage engine. Those consume the
//! [Packed](records::Packed) buffers and [Transaction](records::Transaction)
//! values produced here.

/// Contains the record types, the pack/unpack engine and supporting codecs.
pub mod records;

mod result;
pub use result::{Error, Result};
