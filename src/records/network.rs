use serde::{Deserialize, Serialize};

/// The two record networks: live and testing.
///
/// Every account carries a network flag and a record is only valid on the
/// network all of its embedded accounts were created for. The flag is what
/// stops a record signed on the testing chain from being replayed live.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[serde(alias = "livenet")]
    Bitmark = 0,
    #[serde(alias = "testnet")]
    Testing = 1,
}

impl Network {
    pub fn is_testing(&self) -> bool {
        matches!(self, Network::Testing)
    }
}
