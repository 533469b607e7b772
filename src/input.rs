// File: input.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::{SetupError, SetupResult};
use crate::range;
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Expands every line of `reader`, keeping input order and duplicates.
pub fn read_addresses<R: BufRead>(reader: R, include_broadcast: bool) -> io::Result<Vec<String>> {
    let mut addresses = Vec::new();
    for line in reader.lines() {
        addresses.extend(range::expand(&line?, include_broadcast));
    }
    Ok(addresses)
}

/// Reads address specs from `path`, or from stdin when no path is given.
pub fn load_addresses(path: Option<&Path>, include_broadcast: bool) -> SetupResult<Vec<String>> {
    let addresses = match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| SetupError::AddressFile {
                path: path.to_path_buf(),
                source,
            })?;
            read_addresses(BufReader::new(file), include_broadcast).map_err(|source| {
                SetupError::AddressFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?
        }
        None => read_addresses(io::stdin().lock(), include_broadcast).map_err(SetupError::Stdin)?,
    };
    debug!("Loaded {} candidate addresses", addresses.len());
    Ok(addresses)
}
