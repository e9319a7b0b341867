/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! Compares the OSM road network with official road statistics per administrative unit and
//! scores how complete the mapping is.

pub mod aggregate;
pub mod boundaries;
pub mod cache;
pub mod config;
pub mod context;
pub mod export;
pub mod names;
pub mod official;
pub mod pipeline;
pub mod projection;
pub mod reconcile;
pub mod report;
pub mod roads;
pub mod score;
pub mod serde;
pub mod spatial;
pub mod units;
pub mod util;
pub mod validator;
