/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The cache module keeps the last pipeline snapshot around, so readers don't re-run the
//! pipeline while the inputs are unchanged.

use crate::context;
use crate::pipeline;
use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

/// Decides if a snapshot built at `built_at` is older than any of its dependencies.
fn is_snapshot_outdated(
    ctx: &context::Context,
    built_at: time::OffsetDateTime,
    dependencies: &[String],
) -> anyhow::Result<bool> {
    for dependency in dependencies {
        if ctx.get_file_system().path_exists(dependency)
            && ctx.get_file_system().getmtime(dependency)? > built_at
        {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Owns the current snapshot. Readers get a shared pointer to it, a rebuild replaces the pointer,
/// so a reader never sees a half-built snapshot. The `run` and `report` commands read through the
/// cache of their context, so a long-lived context builds the snapshot only once per input change.
#[derive(Default)]
pub struct SnapshotCache {
    snapshot: RefCell<Option<Rc<pipeline::Snapshot>>>,
    generation: Cell<u64>,
    invalidated: Cell<bool>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        SnapshotCache::default()
    }

    /// Gets the current snapshot, rebuilding it first if it's missing, invalidated or older than
    /// an input. A failed rebuild keeps the previous snapshot for the next attempt.
    pub fn get(&self, ctx: &context::Context) -> anyhow::Result<Rc<pipeline::Snapshot>> {
        if let Some(snapshot) = self.snapshot.borrow().as_ref() {
            let dependencies = ctx.get_ini().get_input_paths();
            if !self.invalidated.get()
                && !is_snapshot_outdated(ctx, snapshot.built_at, &dependencies)?
            {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = Rc::new(pipeline::build_snapshot(ctx)?);
        self.snapshot.replace(Some(snapshot.clone()));
        self.generation.set(self.generation.get() + 1);
        self.invalidated.set(false);
        log::info!("SnapshotCache::get: built generation {}", self.generation.get());
        Ok(snapshot)
    }

    /// Forces a rebuild on the next get(), e.g. after an input was replaced.
    pub fn invalidate(&self) {
        self.invalidated.set(true);
    }

    /// Gets the number of snapshots built so far.
    pub fn get_generation(&self) -> u64 {
        self.generation.get()
    }
}
