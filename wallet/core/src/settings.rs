//!
//! Wallet parameters: BIP44 layout, address discovery gap limit and
//! confirmation polling defaults.
//!

use crate::imports::*;
use quai_consensus_core::confirmation::ConfirmationTracker;
use std::time::Duration;

/// BIP44 coin type of the Quai (account) ledger.
pub const QUAI_COIN_TYPE: u32 = 994;
/// BIP44 coin type of the Qi (UTXO) ledger.
pub const QI_COIN_TYPE: u32 = 969;
/// Consecutive empty addresses scanned before discovery stops.
pub const DEFAULT_GAP_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletSettings {
    pub gap_limit: usize,
    pub quai_coin_type: u32,
    pub qi_coin_type: u32,
    pub account: u32,
    pub confirmations: u64,
    pub poll_interval_millis: u64,
    pub max_polls: usize,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            gap_limit: DEFAULT_GAP_LIMIT,
            quai_coin_type: QUAI_COIN_TYPE,
            qi_coin_type: QI_COIN_TYPE,
            account: 0,
            confirmations: 1,
            poll_interval_millis: 4_000,
            max_polls: 150,
        }
    }
}

impl WalletSettings {
    pub fn coin_type(&self, ledger: Ledger) -> u32 {
        match ledger {
            Ledger::Quai => self.quai_coin_type,
            Ledger::Qi => self.qi_coin_type,
        }
    }

    /// `m/44'/<coin>'/<account>'/<change>` for `ledger`.
    pub fn change_path(&self, ledger: Ledger, address_type: AddressType) -> Result<DerivationPath> {
        Ok(DerivationPath::bip44(self.coin_type(ledger), self.account, address_type)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }

    /// A confirmation tracker carrying these polling defaults.
    pub fn confirmation_tracker(&self, tx_hash: Hash, sender: Address, nonce: u64) -> ConfirmationTracker {
        ConfirmationTracker::new(tx_hash, sender, nonce)
            .with_confirmations(self.confirmations)
            .with_poll_interval(self.poll_interval())
            .with_max_polls(self.max_polls)
    }
}
