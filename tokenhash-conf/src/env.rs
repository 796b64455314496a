// -*- coding: utf-8 -*-
//
// Copyright (C) 2024 - 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, format_err as err, Context as _};
use std::{
    fmt,
    io::{Read as _, Write as _},
    path::{Path, PathBuf},
};

/// One `KEY=VALUE` line, including its line terminator.
#[derive(Clone, PartialEq, Eq, Debug)]
struct EnvLine {
    raw: String,
}

impl EnvLine {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }

    fn new_option(key: &str, value: &str) -> Self {
        Self {
            raw: format!("{key}={value}\n"),
        }
    }

    /// Get the value, if this line assigns `key`.
    fn value_of(&self, key: &str) -> Option<&str> {
        let value = self.raw.strip_prefix(key)?.strip_prefix('=')?;
        Some(value.trim_end_matches(['\n', '\r']))
    }
}

/// Simple `.env` file.
///
/// The file is kept as a list of raw lines.
/// Lines that are not rewritten are written back byte for byte.
#[derive(Clone, Default, Debug)]
pub struct EnvFile {
    path: Option<PathBuf>,
    lines: Vec<EnvLine>,
}

impl EnvFile {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn new_from_file(path: &Path) -> ah::Result<Self> {
        let mut this = Self::new();
        this.read_file(path)?;
        Ok(this)
    }

    pub fn read_file(&mut self, path: &Path) -> ah::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .context("Open configuration file")?;
        let mut buf = vec![];
        file.read_to_end(&mut buf)
            .context("Read configuration file")?;
        self.parse_bytes(buf)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn parse_bytes(&mut self, content: Vec<u8>) -> ah::Result<()> {
        self.parse_str(
            &String::from_utf8(content)
                .context("Configuration content file to UTF-8 conversion")?,
        )
    }

    pub fn parse_str(&mut self, content: &str) -> ah::Result<()> {
        self.lines = content.split_inclusive('\n').map(EnvLine::new).collect();
        Ok(())
    }

    /// Get the path this file was read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the value of the first line that assigns `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|l| l.value_of(key))
    }

    /// Replace every line that assigns `key` with `key=value`.
    ///
    /// A missing key is not added.
    /// Returns the number of replaced lines.
    pub fn set(&mut self, key: &str, value: &str) -> usize {
        let mut count = 0;
        for line in &mut self.lines {
            if line.value_of(key).is_some() {
                *line = EnvLine::new_option(key, value);
                count += 1;
            }
        }
        count
    }

    /// Write all lines to an existing file, truncating its previous content.
    pub fn write_file(&self, path: &Path) -> ah::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .context("Open configuration file for writing")?;
        file.write_all(self.to_string().as_bytes())
            .context("Write configuration file")?;
        file.flush().context("Flush configuration file")
    }

    /// Write all lines to a temporary file next to `path`
    /// and then rename it over `path`.
    pub fn write_file_atomic(&self, path: &Path) -> ah::Result<()> {
        if !path.is_file() {
            return Err(err!("Configuration file {path:?} does not exist"));
        }
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .context("Create temporary configuration file")?;
        tmp.write_all(self.to_string().as_bytes())
            .context("Write temporary configuration file")?;
        tmp.as_file()
            .sync_all()
            .context("Sync temporary configuration file")?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .context("Replace configuration file")?;
        Ok(())
    }
}

impl fmt::Display for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(f, "{}", line.raw)?;
        }
        Ok(())
    }
}

// vim: ts=4 sw=4 expandtab
