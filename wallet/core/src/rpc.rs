//!
//! Collaborator interfaces the wallet consults during address discovery.
//!

use crate::imports::*;

/// Ledger state lookup used by address discovery.
#[async_trait]
pub trait UtxoLookup: Send + Sync {
    /// Unspent outpoints currently held by `address`.
    async fn query_utxos_at(&self, address: &Address) -> Result<Vec<Outpoint>>;
}

/// Shard and ledger classification of an address.
pub trait AddressClassifier: Send + Sync {
    fn classify(&self, address: &Address) -> (Option<Zone>, Ledger);
}

/// Classifies by the address prefix bytes: the first byte names the zone,
/// the top bit of the second byte marks the Qi ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixClassifier;

impl AddressClassifier for PrefixClassifier {
    fn classify(&self, address: &Address) -> (Option<Zone>, Ledger) {
        (address.zone(), address.ledger())
    }
}
