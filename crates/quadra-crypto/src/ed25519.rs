use crate::error::CryptoError;
use quadra_types::{Pubkey, Signature};
use ed25519_dalek::Signer;
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 keypair for transaction signing.
/// The signing key zeroizes itself on drop.
pub struct Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Keypair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The identity this keypair signs as.
    pub fn pubkey(&self) -> Pubkey {
        Pubkey::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature = self.signing_key.sign(message);
        Signature::from_bytes(signature.to_bytes())
    }

    /// Export the secret seed (CAUTION: sensitive)
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.pubkey())
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.secret_bytes())
    }
}

/// Verify an ed25519 signature made by `signer`.
///
/// Fails with `InvalidPublicKey` when `signer` is not a curve point, which is
/// always the case for program-derived addresses. Small-order keys and
/// non-canonical signatures are rejected.
pub fn verify(
    signer: &Pubkey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    let pk = ed25519_dalek::VerifyingKey::from_bytes(signer.as_bytes())
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    pk.verify_strict(message, &sig)
        .map_err(|_| CryptoError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_from_seed_is_deterministic() {
        let seed = [42u8; 32];
        let kp1 = Keypair::from_seed(&seed);
        let kp2 = Keypair::from_seed(&seed);
        assert_eq!(kp1.pubkey(), kp2.pubkey());
        assert!(!kp1.pubkey().is_zero());
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::generate();
        let message = b"initialize_dao:TestDAO";

        let signature = keypair.sign(message);
        assert!(verify(&keypair.pubkey(), message, &signature).is_ok());

        assert_eq!(
            verify(&keypair.pubkey(), b"initialize_dao:Other", &signature),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn test_verify_rejects_other_signer() {
        let alice = Keypair::from_seed(&[1u8; 32]);
        let bob = Keypair::from_seed(&[2u8; 32]);
        let signature = alice.sign(b"vote");
        assert!(verify(&bob.pubkey(), b"vote", &signature).is_err());
    }

    #[test]
    fn test_verify_rejects_small_order_key() {
        // Identity point with R = identity, s = 0 satisfies the cofactored equation
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let mut forged = [0u8; 64];
        forged[0] = 1;

        assert_eq!(
            verify(&Pubkey::from_bytes(identity), b"any message", &Signature::from_bytes(forged)),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn test_keypair_clone_signs_identically() {
        let kp1 = Keypair::from_seed(&[9u8; 32]);
        let kp2 = kp1.clone();
        assert_eq!(kp1.pubkey(), kp2.pubkey());
        assert_eq!(kp1.sign(b"msg"), kp2.sign(b"msg"));
    }
}
