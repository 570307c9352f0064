// tests/common/mod.rs
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use ring::signature::{UnparsedPublicKey, ECDSA_P256_SHA256_FIXED};

use crate::auth::jwt::DecodedToken;
use crate::auth::signer::{EcdsaSigner, Signer};
use crate::cache::token_manager::TokenManager;
use crate::errors::{TokenError, TokenResult};
use crate::helpers::time::ManualClock;

pub const TEAM_ID: &str = "TEAM123456";
pub const KEY_ID: &str = "KEY1234567";
pub const T0: i64 = 1_700_000_000;

/// Real ES256 signer that counts invocations and can be told to fail.
pub struct ProbeSigner {
    inner: EcdsaSigner,
    pub calls: Arc<AtomicUsize>,
    pub failing: Arc<AtomicBool>,
}

impl Signer for ProbeSigner {
    fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TokenError::SigningFailed("injected failure".to_owned()));
        }
        self.inner.sign(message)
    }
}

/// Handles a test keeps after the manager takes ownership of the signer.
pub struct Harness {
    pub manager: Arc<TokenManager>,
    pub clock: Arc<ManualClock>,
    pub calls: Arc<AtomicUsize>,
    pub failing: Arc<AtomicBool>,
    pub public_key: Vec<u8>,
}

impl Harness {
    pub fn sign_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn verifies(&self, decoded: &DecodedToken) -> bool {
        UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, &self.public_key)
            .verify(decoded.signing_input.as_bytes(), &decoded.signature)
            .is_ok()
    }
}

pub fn harness() -> Harness {
    let (inner, _) = EcdsaSigner::generate().expect("key generation");
    let public_key = inner.public_key();
    let calls = Arc::new(AtomicUsize::new(0));
    let failing = Arc::new(AtomicBool::new(false));
    let clock = Arc::new(ManualClock::new(T0));

    let signer = ProbeSigner { inner, calls: calls.clone(), failing: failing.clone() };
    let manager = TokenManager::new(Box::new(signer), TEAM_ID, KEY_ID, clock.clone());

    Harness { manager: Arc::new(manager), clock, calls, failing, public_key }
}
