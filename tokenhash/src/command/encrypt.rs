// -*- coding: utf-8 -*-
//
// Copyright (C) 2024 - 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, Context as _};
use std::path::Path;
use tokenhash_conf::{set_token, EnvFile};
use tokenhash_kdf::{encrypt_token, strip_padding};

/// The unpadded base64 values written to the configuration.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StoredToken {
    pub hash: String,
    pub salt: String,
}

/// Hash `token` with a new random salt, print the result
/// and store it in the configuration file at `path`.
pub fn run_encrypt(path: &Path, token: &str) -> ah::Result<StoredToken> {
    let (hash, salt) = encrypt_token(token)?;
    let stored = StoredToken {
        hash: strip_padding(&hash),
        salt: strip_padding(&salt),
    };

    println!("enc: {}", stored.hash);
    println!("salt: {}", stored.salt);

    let mut env = EnvFile::new_from_file(path).context(format!("Configuration {path:?}"))?;
    set_token(&mut env, &stored.hash, &stored.salt);
    env.write_file(path)
        .context(format!("Configuration {path:?}"))?;

    Ok(stored)
}


// vim: ts=4 sw=4 expandtab
