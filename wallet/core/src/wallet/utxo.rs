//!
//! HD wallet for the Qi (UTXO) ledger: zone-aware address derivation,
//! gap-limit discovery and Qi transaction signing.
//!

use crate::imports::*;
use crate::musig::SigningSession;
use quai_consensus_core::sign::sign_schnorr;
use std::fmt;

/// A discovered address and the key that spends from it.
#[derive(Clone)]
pub struct UtxoAddress {
    pub address: Address,
    secret_key: SecretKey,
}

impl UtxoAddress {
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}

impl fmt::Debug for UtxoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtxoAddress").field("address", &self.address).finish()
    }
}

pub struct UtxoHdWallet {
    node: HDNode,
    settings: WalletSettings,
    classifier: Arc<dyn AddressClassifier>,
    utxo_addresses: Vec<UtxoAddress>,
}

impl UtxoHdWallet {
    /// Wrap a node at the BIP44 change level (`m/44'/<coin>'/<account>'/<change>`).
    pub fn new(node: HDNode, settings: WalletSettings) -> Self {
        Self { node, settings, classifier: Arc::new(PrefixClassifier), utxo_addresses: Vec::new() }
    }

    /// Receive chain of the Qi ledger for `settings.account`.
    pub fn from_phrase(phrase: &str, password: Option<&str>, settings: WalletSettings) -> Result<Self> {
        let path = settings.change_path(Ledger::Qi, AddressType::Receive)?;
        let node = HDNode::from_phrase(phrase, password, &path.to_string())?;
        Ok(Self::new(node, settings))
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn AddressClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn node(&self) -> &HDNode {
        &self.node
    }

    pub fn settings(&self) -> &WalletSettings {
        &self.settings
    }

    /// Addresses recorded by the last [`generate_utxos`](Self::generate_utxos) scan.
    pub fn utxo_addresses(&self) -> &[UtxoAddress] {
        &self.utxo_addresses
    }

    pub fn set_utxo_addresses(&mut self, addresses: Vec<UtxoAddress>) {
        self.utxo_addresses = addresses;
    }

    fn in_zone(&self, node: &HDNode, zone: Zone) -> bool {
        let (address_zone, ledger) = self.classifier.classify(&node.address());
        address_zone == Some(zone) && (node.coin_type() == Some(self.settings.qi_coin_type)) == (ledger == Ledger::Qi)
    }

    /// The first address at or after `start` that belongs to `zone`.
    fn next_in_zone(&self, zone: Zone, start: u32) -> Result<(u32, HDNode)> {
        let mut index = start;
        loop {
            let node = self.node.derive_child(index)?;
            if self.in_zone(&node, zone) {
                return Ok((index, node));
            }
            index = index.checked_add(1).ok_or(quai_bip32::Error::ChildNumber)?;
        }
    }

    /// Node of the `index`-th address (counting from zero) that lies in `zone`.
    /// Without a zone the address index is used directly.
    pub fn derive_address(&self, index: u32, zone: Option<&str>) -> Result<HDNode> {
        let Some(zone) = zone else {
            return Ok(self.node.derive_child(index)?);
        };
        let zone = Zone::from_str(zone)?;

        let mut next = 0;
        let mut remaining = index;
        loop {
            let (found, node) = self.next_in_zone(zone, next)?;
            if remaining == 0 {
                trace!("zone {zone} address {index} at address index {found}");
                return Ok(node);
            }
            remaining -= 1;
            next = found.checked_add(1).ok_or(quai_bip32::Error::ChildNumber)?;
        }
    }

    /// Walk the zone's addresses in order, querying each for unspent outputs,
    /// until `gap` consecutive addresses come back empty. Every scanned
    /// address is recorded, funded or not, and the cache is replaced once the
    /// scan completes.
    pub async fn generate_utxos(&mut self, lookup: &dyn UtxoLookup, zone: &str, gap: Option<usize>) -> Result<()> {
        let zone = Zone::from_str(zone)?;
        let gap = gap.unwrap_or(self.settings.gap_limit);

        let mut addresses = Vec::new();
        let mut empty = 0;
        let mut next = 0;
        while empty < gap {
            let (found, node) = self.next_in_zone(zone, next)?;
            let address = node.address();
            let outpoints = lookup.query_utxos_at(&address).await?;
            if outpoints.is_empty() {
                empty += 1;
            } else {
                empty = 0;
            }
            trace!("scanned {address} ({} outpoints)", outpoints.len());
            addresses.push(UtxoAddress { address, secret_key: *node.secret_key() });
            next = found.checked_add(1).ok_or(quai_bip32::Error::ChildNumber)?;
        }

        info!("discovered {} addresses in zone {zone}", addresses.len());
        self.utxo_addresses = addresses;
        Ok(())
    }

    fn secret_key_for(&self, address: &Address) -> Result<SecretKey> {
        self.utxo_addresses
            .iter()
            .find(|utxo| utxo.address == *address)
            .map(|utxo| utxo.secret_key)
            .ok_or(Error::MissingKey(*address))
    }

    /// Sign the digest of `tx`. Inputs owned by one key get a Schnorr
    /// signature from that key; inputs spread over several keys get a MuSig2
    /// aggregate signature from all of them.
    pub fn sign_transaction(&self, tx: &QiTransaction) -> Result<[u8; 64]> {
        if tx.inputs.is_empty() || tx.outputs.is_empty() {
            return Err(Error::InvalidUtxoTransaction);
        }
        let digest = tx.digest();
        let secret_keys = tx.input_addresses().iter().map(|address| self.secret_key_for(address)).collect::<Result<Vec<_>>>()?;

        match secret_keys.as_slice() {
            [secret_key] => Ok(sign_schnorr(&digest, secret_key)),
            _ => {
                let mut session = SigningSession::new(digest, &secret_keys)?;
                session.generate_nonces()?;
                session.aggregate_nonces()?;
                session.partial_sign()?;
                session.aggregate()
            }
        }
    }
}

impl fmt::Debug for UtxoHdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtxoHdWallet").field("node", &self.node).field("utxo_addresses", &self.utxo_addresses.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use quai_consensus_core::sign::verify_schnorr;
    use quai_consensus_core::tx::{TxInput, TxOutput};

    const PHRASE: &str = "test test test test test test test test test test test junk";

    /// Classifies every address into `cyprus1` on the Qi ledger so scans never stall.
    struct CyprusQi;

    impl AddressClassifier for CyprusQi {
        fn classify(&self, _address: &Address) -> (Option<Zone>, Ledger) {
            (Some(Zone::Cyprus1), Ledger::Qi)
        }
    }

    fn wallet() -> UtxoHdWallet {
        UtxoHdWallet::from_phrase(PHRASE, None, WalletSettings::default()).unwrap().with_classifier(Arc::new(CyprusQi))
    }

    fn qi_tx(inputs: &[Address]) -> QiTransaction {
        let inputs = inputs
            .iter()
            .enumerate()
            .map(|(i, address)| TxInput { previous_outpoint: Outpoint::new(Hash::from_bytes([i as u8; 32]), i as u32), address: *address })
            .collect();
        let outputs = vec![TxOutput { address: Address::from_bytes([0x00; 20]), denomination: 4 }];
        QiTransaction::new(9000u64.into(), inputs, outputs)
    }

    #[test]
    fn test_derive_address() {
        let wallet = wallet();
        assert_eq!(wallet.node().path().to_string(), "m/44'/969'/0'/0");
        let third = wallet.derive_address(2, Some("cyprus1")).unwrap();
        assert_eq!(third.path().to_string(), "m/44'/969'/0'/0/2");
        assert_eq!(wallet.derive_address(2, None).unwrap(), third);
        assert!(wallet.derive_address(0, Some("nowhere")).is_err());
    }

    #[test]
    fn test_custom_qi_coin_type() {
        let settings = WalletSettings { qi_coin_type: 1, ..Default::default() };
        let wallet = UtxoHdWallet::from_phrase(PHRASE, None, settings).unwrap().with_classifier(Arc::new(CyprusQi));
        assert_eq!(wallet.node().path().to_string(), "m/44'/1'/0'/0");
        let first = wallet.derive_address(0, Some("cyprus1")).unwrap();
        assert_eq!(first.path().to_string(), "m/44'/1'/0'/0/0");
    }

    #[test]
    fn test_derive_address_by_prefix() {
        let wallet = UtxoHdWallet::from_phrase(PHRASE, None, WalletSettings::default()).unwrap();
        let node = wallet.derive_address(1, Some("0x00")).unwrap();
        assert_eq!(node.address().zone(), Some(Zone::Cyprus1));
        assert_eq!(node.address().ledger(), Ledger::Qi);
        let first = wallet.derive_address(0, Some("cyprus1")).unwrap();
        assert!(first.index().0 < node.index().0);
    }

    #[tokio::test]
    async fn test_gap_limit_records_every_scanned_address() {
        let mut wallet = wallet();
        let lookup = UtxoLookupMock::default();
        wallet.generate_utxos(&lookup, "cyprus1", Some(3)).await.unwrap();
        assert_eq!(wallet.utxo_addresses().len(), 3);
        assert_eq!(lookup.queries(), 3);
    }

    #[tokio::test]
    async fn test_gap_counter_resets_on_funded_address() {
        let mut wallet = wallet();
        let funded = wallet.derive_address(1, Some("cyprus1")).unwrap().address();
        let lookup = UtxoLookupMock::default().with_funded(funded);
        wallet.generate_utxos(&lookup, "cyprus1", Some(3)).await.unwrap();
        // index 0 empty, index 1 funded, then three empty
        assert_eq!(wallet.utxo_addresses().len(), 5);
        assert_eq!(wallet.utxo_addresses()[1].address, funded);
    }

    #[tokio::test]
    async fn test_sign_single_input_schnorr() {
        let mut wallet = wallet();
        wallet.generate_utxos(&UtxoLookupMock::default(), "cyprus1", Some(2)).await.unwrap();
        let owner = wallet.utxo_addresses()[0].clone();
        let mut tx = qi_tx(&[owner.address]);

        let signature = wallet.sign_transaction(&tx).unwrap();
        let (public_key, _) = owner.secret_key().x_only_public_key(SECP256K1);
        verify_schnorr(&tx.digest(), &signature, &public_key).unwrap();

        tx.set_signature(signature.to_vec()).unwrap();
        let decoded = QiTransaction::from_wire(&tx.serialized().unwrap()).unwrap();
        assert_eq!(decoded.signature(), Some(&signature[..]));
    }

    #[tokio::test]
    async fn test_sign_multi_input_musig2() {
        let mut wallet = wallet();
        wallet.generate_utxos(&UtxoLookupMock::default(), "cyprus1", Some(3)).await.unwrap();
        let addresses = wallet.utxo_addresses().iter().map(|utxo| utxo.address).collect::<Vec<_>>();
        let tx = qi_tx(&addresses);

        let signature = wallet.sign_transaction(&tx).unwrap();
        let keys = wallet.utxo_addresses().iter().map(|utxo| *utxo.secret_key()).collect::<Vec<_>>();
        let aggregate_key = SigningSession::new(tx.digest(), &keys).unwrap().aggregate_public_key().unwrap();
        verify_schnorr(&tx.digest(), &signature, &aggregate_key).unwrap();
    }

    #[test]
    fn test_missing_key() {
        let wallet = wallet();
        let stranger = Address::from_bytes([0x00, 0x80, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18]);
        assert_eq!(wallet.sign_transaction(&qi_tx(&[stranger])).unwrap_err(), Error::MissingKey(stranger));
        assert_eq!(wallet.sign_transaction(&qi_tx(&[])).unwrap_err(), Error::InvalidUtxoTransaction);
    }
}
