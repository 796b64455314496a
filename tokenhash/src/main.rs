// -*- coding: utf-8 -*-
//
// Copyright (C) 2024 - 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

mod command;

use crate::command::encrypt::run_encrypt;
use anyhow as ah;
use clap::Parser;
use tokenhash_conf::get_default_path;

/// Hash a token and store the hash and its salt in the `.env` file
/// of the current working directory.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// The token to be hashed.
    token: String,
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();

    run_encrypt(&get_default_path(), &opts.token)?;
    Ok(())
}


// vim: ts=4 sw=4 expandtab
