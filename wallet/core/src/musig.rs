//!
//! MuSig2 signing session for Qi transactions whose inputs belong to
//! several keys held by the same wallet.
//!
//! The session walks the two MuSig2 rounds in order: key aggregation,
//! nonce generation, nonce aggregation, partial signing (every partial
//! signature is verified as it is produced) and signature aggregation.
//! The aggregate is a BIP340 Schnorr signature over the digest, valid
//! for [`SigningSession::aggregate_public_key`].
//!

use crate::imports::*;
use musig2::secp::{Point, Scalar};
use musig2::{AggNonce, KeyAggContext, LiftedSignature, PartialSignature, PubNonce, SecNonce};
use rand::RngCore;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    KeysAggregated,
    NoncesGenerated,
    NoncesAggregated,
    PartiallySigned,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::KeysAggregated => f.write_str("keys-aggregated"),
            SessionPhase::NoncesGenerated => f.write_str("nonces-generated"),
            SessionPhase::NoncesAggregated => f.write_str("nonces-aggregated"),
            SessionPhase::PartiallySigned => f.write_str("partially-signed"),
        }
    }
}

fn musig_error(err: impl fmt::Display) -> Error {
    Error::MuSig2(err.to_string())
}

struct Signer {
    secret_key: Scalar,
    public_key: Point,
}

pub struct SigningSession {
    digest: Hash,
    signers: Vec<Signer>,
    key_agg: KeyAggContext,
    phase: SessionPhase,
    sec_nonces: Vec<SecNonce>,
    pub_nonces: Vec<PubNonce>,
    agg_nonce: Option<AggNonce>,
    partial_signatures: Vec<PartialSignature>,
}

impl SigningSession {
    /// Aggregate the signers' public keys for `digest`. Key order is significant.
    pub fn new(digest: Hash, secret_keys: &[SecretKey]) -> Result<Self> {
        if secret_keys.is_empty() {
            return Err(Error::MuSig2("no signers".to_string()));
        }
        let signers = secret_keys
            .iter()
            .map(|secret_key| {
                let public_key = secret_key.public_key(SECP256K1);
                Ok(Signer {
                    secret_key: Scalar::from_slice(&secret_key.secret_bytes()).map_err(musig_error)?,
                    public_key: Point::from_slice(&public_key.serialize()).map_err(musig_error)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let key_agg = KeyAggContext::new(signers.iter().map(|signer| signer.public_key)).map_err(musig_error)?;
        debug!("musig2 session for {digest} with {} signers", signers.len());

        Ok(Self {
            digest,
            signers,
            key_agg,
            phase: SessionPhase::KeysAggregated,
            sec_nonces: Vec::new(),
            pub_nonces: Vec::new(),
            agg_nonce: None,
            partial_signatures: Vec::new(),
        })
    }

    fn expect_phase(&self, expected: SessionPhase) -> Result<()> {
        if self.phase != expected {
            return Err(Error::SessionPhase { expected, actual: self.phase });
        }
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn digest(&self) -> &Hash {
        &self.digest
    }

    /// X-only aggregate key the final signature verifies against.
    pub fn aggregate_public_key(&self) -> Result<XOnlyPublicKey> {
        let point: Point = self.key_agg.aggregated_pubkey();
        Ok(XOnlyPublicKey::from_slice(&point.serialize_xonly())?)
    }

    /// First round: a fresh secret nonce per signer, bound to its key, the
    /// digest and the aggregate key. Returns the public nonces.
    pub fn generate_nonces(&mut self) -> Result<&[PubNonce]> {
        self.expect_phase(SessionPhase::KeysAggregated)?;
        let aggregated: Point = self.key_agg.aggregated_pubkey();
        let message = self.digest.as_bytes();
        let mut rng = rand::thread_rng();

        self.sec_nonces = self
            .signers
            .iter()
            .map(|signer| {
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                SecNonce::build(seed)
                    .with_seckey(signer.secret_key)
                    .with_message(&message)
                    .with_aggregated_pubkey(aggregated)
                    .build()
            })
            .collect();
        self.pub_nonces = self.sec_nonces.iter().map(SecNonce::public_nonce).collect();
        self.phase = SessionPhase::NoncesGenerated;
        trace!("musig2 nonces generated");
        Ok(&self.pub_nonces)
    }

    pub fn aggregate_nonces(&mut self) -> Result<&AggNonce> {
        self.expect_phase(SessionPhase::NoncesGenerated)?;
        self.phase = SessionPhase::NoncesAggregated;
        Ok(self.agg_nonce.insert(AggNonce::sum(&self.pub_nonces)))
    }

    /// Second round: every signer's partial signature, each checked against
    /// its public key and public nonce before it is accepted.
    pub fn partial_sign(&mut self) -> Result<&[PartialSignature]> {
        self.expect_phase(SessionPhase::NoncesAggregated)?;
        let agg_nonce = self.agg_nonce.as_ref().ok_or(Error::SessionPhase {
            expected: SessionPhase::NoncesAggregated,
            actual: self.phase,
        })?;
        let message = self.digest.as_bytes();

        let mut partial_signatures = Vec::with_capacity(self.signers.len());
        for ((signer, sec_nonce), pub_nonce) in self.signers.iter().zip(std::mem::take(&mut self.sec_nonces)).zip(&self.pub_nonces) {
            let partial: PartialSignature =
                musig2::sign_partial(&self.key_agg, signer.secret_key, sec_nonce, agg_nonce, message).map_err(musig_error)?;
            musig2::verify_partial(&self.key_agg, partial, agg_nonce, signer.public_key, pub_nonce, message).map_err(musig_error)?;
            partial_signatures.push(partial);
        }

        self.partial_signatures = partial_signatures;
        self.phase = SessionPhase::PartiallySigned;
        debug!("musig2 produced {} partial signatures", self.partial_signatures.len());
        Ok(&self.partial_signatures)
    }

    pub fn partial_signatures(&self) -> &[PartialSignature] {
        &self.partial_signatures
    }

    /// Combine the session's own partial signatures.
    pub fn aggregate(&self) -> Result<[u8; 64]> {
        self.aggregate_partials(&self.partial_signatures)
    }

    /// Combine `partial_signatures` into the final signature and verify it
    /// against the aggregate key.
    pub fn aggregate_partials(&self, partial_signatures: &[PartialSignature]) -> Result<[u8; 64]> {
        self.expect_phase(SessionPhase::PartiallySigned)?;
        let agg_nonce =
            self.agg_nonce.as_ref().ok_or(Error::SessionPhase { expected: SessionPhase::NoncesAggregated, actual: self.phase })?;

        let signature: LiftedSignature =
            musig2::aggregate_partial_signatures(&self.key_agg, agg_nonce, partial_signatures.iter().copied(), self.digest.as_bytes())
                .map_err(musig_error)?;
        let signature = signature.serialize();
        quai_consensus_core::sign::verify_schnorr(&self.digest, &signature, &self.aggregate_public_key()?)?;
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musig2::secp::MaybeScalar;
    use quai_hashes::keccak256;

    fn keys(count: u8) -> Vec<SecretKey> {
        (1..=count).map(|i| SecretKey::from_slice(&[i; 32]).unwrap()).collect()
    }

    fn signed_session(digest: Hash, count: u8) -> SigningSession {
        let mut session = SigningSession::new(digest, &keys(count)).unwrap();
        session.generate_nonces().unwrap();
        session.aggregate_nonces().unwrap();
        session.partial_sign().unwrap();
        session
    }

    #[test]
    fn test_aggregate_signature_verifies() {
        let digest = keccak256(b"qi transaction");
        let session = signed_session(digest, 3);
        assert_eq!(session.partial_signatures().len(), 3);

        let signature = session.aggregate().unwrap();
        let public_key = session.aggregate_public_key().unwrap();
        quai_consensus_core::sign::verify_schnorr(&digest, &signature, &public_key).unwrap();
        assert!(quai_consensus_core::sign::verify_schnorr(&keccak256(b"other"), &signature, &public_key).is_err());
    }

    #[test]
    fn test_foreign_partial_rejected() {
        let session = signed_session(keccak256(b"qi transaction"), 2);
        let foreign = signed_session(keccak256(b"another transaction"), 2);
        let mut partials = session.partial_signatures().to_vec();
        partials[1] = foreign.partial_signatures()[1];
        assert!(session.aggregate_partials(&partials).is_err());

        partials[1] = session.partial_signatures()[1] + MaybeScalar::from(Scalar::one());
        assert!(session.aggregate_partials(&partials).is_err());
    }

    #[test]
    fn test_phase_order() {
        let mut session = SigningSession::new(keccak256(b"x"), &keys(2)).unwrap();
        assert_eq!(
            session.aggregate_nonces().unwrap_err(),
            Error::SessionPhase { expected: SessionPhase::NoncesGenerated, actual: SessionPhase::KeysAggregated }
        );
        assert!(session.partial_sign().is_err());
        assert!(session.aggregate().is_err());
        session.generate_nonces().unwrap();
        assert!(session.generate_nonces().is_err());
        assert_eq!(session.phase(), SessionPhase::NoncesGenerated);
        assert!(SigningSession::new(keccak256(b"x"), &[]).is_err());
    }
}
