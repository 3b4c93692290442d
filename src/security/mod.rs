//! Security utilities for the takedown engine
//!
//! Provides cryptographic key management and hashing for the HMAC-signed
//! record store.

pub mod crypto;

pub use crypto::{hex_encode, load_or_create_key, sha256};
