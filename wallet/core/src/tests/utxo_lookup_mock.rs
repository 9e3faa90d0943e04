use crate::imports::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory ledger: funded addresses hold a single outpoint, every other
/// address is empty.
#[derive(Debug, Default)]
pub struct UtxoLookupMock {
    funded: HashSet<Address>,
    queries: AtomicUsize,
}

impl UtxoLookupMock {
    pub fn with_funded(mut self, address: Address) -> Self {
        self.funded.insert(address);
        self
    }

    /// Number of lookups served so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UtxoLookup for UtxoLookupMock {
    async fn query_utxos_at(&self, address: &Address) -> Result<Vec<Outpoint>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.funded.contains(address) {
            Ok(vec![Outpoint::new(Hash::from_bytes([0xaa; 32]), 0)])
        } else {
            Ok(vec![])
        }
    }
}
