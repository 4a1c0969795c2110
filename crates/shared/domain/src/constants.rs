//! Domain-level constants.
//!
//! These constants pin the security parameters of the credential service.

// =============================================================================
// Password hashing
// =============================================================================

/// Argon2id memory cost in KiB.
pub const PASSWORD_HASH_MEMORY_KIB: u32 = 19_456;

/// Argon2id iteration count.
pub const PASSWORD_HASH_ITERATIONS: u32 = 2;

/// Argon2id degree of parallelism.
pub const PASSWORD_HASH_PARALLELISM: u32 = 1;

// =============================================================================
// Tokens
// =============================================================================

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

