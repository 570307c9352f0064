//! Shared constants and invariants

/// Tokens are reused for this long after issuance.
/// Must stay below `TOKEN_HARD_EXPIRY_SECS`, the service rejects older tokens.
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 3300;
pub const TOKEN_HARD_EXPIRY_SECS: u64 = 3600;

pub const JWT_ALGORITHM: &str = "ES256";
pub const JWT_TYPE: &str = "JWT";
pub const BEARER_PREFIX: &str = "bearer ";

pub const DEFAULT_CONFIG_PATH: &str = "push-token.yaml";
pub const METRICS_NAMESPACE: &str = "pushtoken";
