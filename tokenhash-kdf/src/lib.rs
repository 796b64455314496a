// -*- coding: utf-8 -*-
//
// Copyright (C) 2024 - 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements the token hashing of `tokenhash`.
//!
//! A token is stretched with PBKDF2-HMAC-SHA256 over a random salt.
//! The derived key and the salt are exchanged as standard base64 strings.

#![forbid(unsafe_code)]

use anyhow::{self as ah, format_err as err, Context as _};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::Hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq as _;

/// Size of the token salt, in bytes.
pub const SALT_SIZE: usize = 32;

/// Size of the derived key, in bytes.
pub const KEY_SIZE: usize = 32;

/// Number of PBKDF2 rounds.
pub const ITERATIONS: u32 = 10_000;

/// Type of the token salt.
pub type Salt = [u8; SALT_SIZE];

/// Type of the derived key.
pub type Key = [u8; KEY_SIZE];

/// Generate a cryptographically secure random token.
/// Returns an array of random bytes.
pub fn secure_random<const SZ: usize>() -> [u8; SZ] {
    assert!(SZ >= 8);
    let mut buf: [u8; SZ] = [0; SZ];
    // Get secure random bytes from the operating system.
    if getrandom::fill(&mut buf).is_err() {
        panic!("Failed to read secure random bytes from the operating system. (getrandom failed)");
    }
    // Sanity check if getrandom implementation
    // is a no-op or otherwise trivially broken.
    assert_ne!(buf, [0; SZ]);
    assert_ne!(buf, [0xFF; SZ]);
    let first = buf[0];
    assert!(!buf.iter().all(|x| *x == first));
    buf
}

fn pbkdf2_sha256(token: &[u8], salt: &[u8], rounds: u32) -> ah::Result<Key> {
    let mut key: Key = [0; KEY_SIZE];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(token, salt, rounds, &mut key)
        .map_err(|_| err!("PBKDF2-HMAC-SHA256: Invalid HMAC key length"))?;
    Ok(key)
}

/// Derive the key for `token` with the given `salt`.
///
/// The same token and salt always give the same key.
pub fn derive_key(token: &[u8], salt: &[u8]) -> ah::Result<Key> {
    pbkdf2_sha256(token, salt, ITERATIONS)
}

/// Hash a token with a fresh random salt.
///
/// Returns the padded base64 strings `(key, salt)`.
pub fn encrypt_token(token: &str) -> ah::Result<(String, String)> {
    let salt: Salt = secure_random();
    let key = derive_key(token.as_bytes(), &salt).context("Derive token key")?;
    Ok((STANDARD.encode(key), STANDARD.encode(salt)))
}

/// Hash a token with an existing base64 `salt`.
///
/// The salt may be given with or without its `=` padding.
/// Returns the padded base64 key.
pub fn encode_token(token: &str, salt: &str) -> ah::Result<String> {
    let salt = decode(salt).context("Decode salt")?;
    let key = derive_key(token.as_bytes(), &salt).context("Derive token key")?;
    Ok(STANDARD.encode(key))
}

/// Check whether `token` hashes to the stored base64 `hash` under the stored base64 `salt`.
///
/// Stored values that are not valid base64 never match.
#[must_use]
pub fn token_matches(token: &str, hash: &str, salt: &str) -> bool {
    let Ok(salt) = decode(salt) else {
        return false;
    };
    let Ok(hash) = decode(hash) else {
        return false;
    };
    let Ok(key) = derive_key(token.as_bytes(), &salt) else {
        return false;
    };
    hash.as_slice().ct_eq(&key).into()
}

/// Remove all `=` padding characters from a base64 string.
pub fn strip_padding(s: &str) -> String {
    s.replace('=', "")
}

/// Append `=` padding up to the next multiple of 4 characters.
pub fn restore_padding(s: &str) -> String {
    let mut s = s.to_string();
    while s.len() % 4 != 0 {
        s.push('=');
    }
    s
}

fn decode(s: &str) -> ah::Result<Vec<u8>> {
    Ok(STANDARD.decode(restore_padding(s.trim()))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_pbkdf2_vectors() {
        let key = pbkdf2_sha256(b"password", b"salt", 1).unwrap();
        assert_eq!(
            hex(&key),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
        let key = pbkdf2_sha256(b"password", b"salt", 4096).unwrap();
        assert_eq!(
            hex(&key),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );
    }

    #[test]
    fn test_encode_reproduces_encrypt() {
        for token in ["secret", "", "päßwörd", "a much longer token with spaces"] {
            let (key, salt) = encrypt_token(token).unwrap();
            assert_eq!(encode_token(token, &salt).unwrap(), key);
            assert_eq!(encode_token(token, &strip_padding(&salt)).unwrap(), key);
        }
    }

    #[test]
    fn test_fresh_salts_differ() {
        let (key1, salt1) = encrypt_token("secret").unwrap();
        let (key2, salt2) = encrypt_token("secret").unwrap();
        assert_ne!(salt1, salt2);
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_empty_token() {
        let (key, salt) = encrypt_token("").unwrap();
        assert_eq!(STANDARD.decode(key).unwrap().len(), KEY_SIZE);
        assert_eq!(STANDARD.decode(salt).unwrap().len(), SALT_SIZE);
    }

    #[test]
    fn test_padding() {
        let (key, salt) = encrypt_token("secret").unwrap();
        for s in [key, salt] {
            // 32 bytes encode to 43 chars plus one '='.
            assert!(s.ends_with('='));
            let stripped = strip_padding(&s);
            assert!(!stripped.contains('='));
            assert_eq!(stripped.len(), 43);
            assert_eq!(restore_padding(&stripped), s);
            assert_eq!(STANDARD.decode(restore_padding(&stripped)).unwrap().len(), 32);
        }
        assert_eq!(restore_padding("QQ"), "QQ==");
        assert_eq!(restore_padding("QUJD"), "QUJD");
        assert_eq!(restore_padding(""), "");
    }

    #[test]
    fn test_invalid_salt() {
        assert!(encode_token("secret", "not base64!").is_err());
        assert!(encode_token("secret", "A").is_err());
    }

    #[test]
    fn test_token_matches() {
        let (key, salt) = encrypt_token("secret").unwrap();
        assert!(token_matches("secret", &key, &salt));
        assert!(token_matches(
            "secret",
            &strip_padding(&key),
            &strip_padding(&salt)
        ));
        assert!(!token_matches("Secret", &key, &salt));
        assert!(!token_matches("", &key, &salt));
        assert!(!token_matches("secret", "***", &salt));
        assert!(!token_matches("secret", &key, "***"));
        assert!(!token_matches("secret", &key[..8], &salt));
    }
}

// vim: ts=4 sw=4 expandtab
