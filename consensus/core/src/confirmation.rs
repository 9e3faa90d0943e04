//!
//! Waiting for a broadcast transaction to be mined.
//!
//! [`ConfirmationTracker`] is an explicit state machine
//! (`Pending -> Scanning -> Replaced | Confirmed | TimedOut`, or `Cancelled`)
//! driven by a [`ReceiptSource`]. The cancellation listener is checked at
//! every suspend point.
//!

use crate::result::Result;
use async_trait::async_trait;
use futures::future::{select, Either};
use log::{debug, trace};
use quai_addresses::Address;
use quai_hashes::Hash;
use std::time::Duration;
use triggered::Listener;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: Hash,
    pub block_number: u64,
    /// Execution status; `false` for reverted transactions.
    pub status: bool,
}

/// Chain state needed to follow a transaction.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    async fn block_number(&self) -> Result<u64>;

    async fn receipt(&self, tx_hash: &Hash) -> Result<Option<Receipt>>;

    /// Number of transactions mined from `address`, i.e. its next nonce.
    async fn transaction_count(&self, address: &Address) -> Result<u64>;

    /// Hash of the mined transaction from `sender` with `nonce`, searching from `from_block`.
    async fn find_by_sender_nonce(&self, sender: &Address, nonce: u64, from_block: u64) -> Result<Option<Hash>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmationState {
    Pending,
    /// The receipt is missing; the sender nonce is being checked for a replacement.
    Scanning,
    Replaced { replacement: Hash },
    Confirmed(Receipt),
    TimedOut,
    Cancelled,
}

impl ConfirmationState {
    pub fn is_final(&self) -> bool {
        !matches!(self, ConfirmationState::Pending | ConfirmationState::Scanning)
    }
}

pub struct ConfirmationTracker {
    tx_hash: Hash,
    sender: Address,
    nonce: u64,
    confirmations: u64,
    poll_interval: Duration,
    max_polls: usize,
    state: ConfirmationState,
}

impl ConfirmationTracker {
    pub fn new(tx_hash: Hash, sender: Address, nonce: u64) -> Self {
        Self {
            tx_hash,
            sender,
            nonce,
            confirmations: 1,
            poll_interval: Duration::from_secs(4),
            max_polls: 75,
            state: ConfirmationState::Pending,
        }
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Timeout expressed as the number of polls before giving up.
    pub fn with_max_polls(mut self, max_polls: usize) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }

    pub fn state(&self) -> &ConfirmationState {
        &self.state
    }

    fn transition(&mut self, next: ConfirmationState) {
        if self.state != next {
            debug!("tx {}: {:?} -> {:?}", self.tx_hash, self.state, next);
            self.state = next;
        }
    }

    async fn poll(&mut self, source: &dyn ReceiptSource, start_block: u64) -> Result<()> {
        if let Some(receipt) = source.receipt(&self.tx_hash).await? {
            let tip = source.block_number().await?;
            let depth = (tip + 1).saturating_sub(receipt.block_number);
            trace!("tx {} mined in block {} ({depth} confirmations)", self.tx_hash, receipt.block_number);
            if depth >= self.confirmations {
                self.transition(ConfirmationState::Confirmed(receipt));
            } else {
                self.transition(ConfirmationState::Pending);
            }
            return Ok(());
        }

        self.transition(ConfirmationState::Scanning);
        let mined_nonce = source.transaction_count(&self.sender).await?;
        if mined_nonce <= self.nonce {
            self.transition(ConfirmationState::Pending);
            return Ok(());
        }
        // the nonce was consumed; find out by which transaction
        match source.find_by_sender_nonce(&self.sender, self.nonce, start_block).await? {
            Some(hash) if hash != self.tx_hash => self.transition(ConfirmationState::Replaced { replacement: hash }),
            _ => {}
        }
        Ok(())
    }

    /// Poll until the transaction reaches a final state.
    pub async fn run(&mut self, source: &dyn ReceiptSource, cancel: &Listener) -> Result<ConfirmationState> {
        self.transition(ConfirmationState::Pending);
        let start_block = source.block_number().await?;

        for polls in 1..=self.max_polls {
            if cancel.is_triggered() {
                self.transition(ConfirmationState::Cancelled);
                break;
            }
            self.poll(source, start_block).await?;
            if self.state.is_final() {
                break;
            }
            if polls == self.max_polls {
                self.transition(ConfirmationState::TimedOut);
                break;
            }
            let sleep = Box::pin(tokio::time::sleep(self.poll_interval));
            if let Either::Right(_) = select(sleep, Box::pin(cancel.clone())).await {
                self.transition(ConfirmationState::Cancelled);
                break;
            }
        }
        Ok(self.state.clone())
    }
}
