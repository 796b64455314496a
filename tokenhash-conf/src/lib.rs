// -*- coding: utf-8 -*-
//
// Copyright (C) 2024 - 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements the `.env` configuration file handling of `tokenhash`.
//!
//! The file is a flat list of `KEY=VALUE` lines.
//! Only the token salt and the token hash lines are ever rewritten.

#![forbid(unsafe_code)]

mod env;


pub use crate::env::EnvFile;

use std::path::PathBuf;

/// The configuration file, relative to the current working directory.
pub const ENV_FILE: &str = ".env";

/// Configuration key of the token salt.
pub const SALT_KEY: &str = "INTERNAL_SALT";

/// Configuration key of the token hash.
pub const HASH_KEY: &str = "INTERNAL_TOKEN_HASH";

/// Get the default configuration file path.
pub fn get_default_path() -> PathBuf {
    PathBuf::from(ENV_FILE)
}

/// Number of lines replaced by [set_token].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Replaced {
    pub salt: usize,
    pub hash: usize,
}

/// Store a token `hash` and its `salt` in the configuration.
///
/// Keys that are not present in the file are left out.
pub fn set_token(env: &mut EnvFile, hash: &str, salt: &str) -> Replaced {
    Replaced {
        salt: env.set(SALT_KEY, salt),
        hash: env.set(HASH_KEY, hash),
    }
}

/// Get the `INTERNAL_SALT` value.
pub fn salt(env: &EnvFile) -> Option<&str> {
    env.get(SALT_KEY)
}

/// Get the `INTERNAL_TOKEN_HASH` value.
pub fn token_hash(env: &EnvFile) -> Option<&str> {
    env.get(HASH_KEY)
}


// vim: ts=4 sw=4 expandtab
