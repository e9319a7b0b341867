/*
 * Copyright 2021 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Abstractions to help writing unit tests: filesystem, time, configuration.

use crate::cache;
use crate::config;
use anyhow::Context as _;
use std::cell::RefCell;
use std::io::Read;
use std::io::Write;
use std::ops::DerefMut;
use std::rc::Rc;

pub mod system;

/// File system interface.
pub trait FileSystem {
    /// Test whether a path exists.
    fn path_exists(&self, path: &str) -> bool;

    /// Return the last modification time of a file.
    fn getmtime(&self, path: &str) -> anyhow::Result<time::OffsetDateTime>;

    /// Opens a file for reading in binary mode.
    fn open_read(&self, path: &str) -> anyhow::Result<Rc<RefCell<dyn Read>>>;

    /// Opens a file for writing in binary mode.
    fn open_write(&self, path: &str) -> anyhow::Result<Rc<RefCell<dyn Write>>>;

    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &str) -> anyhow::Result<String> {
        let stream = self.open_read(path)?;
        let mut guard = stream.borrow_mut();
        let mut bytes: Vec<u8> = Vec::new();
        guard
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read '{path}'"))?;
        String::from_utf8(bytes).with_context(|| format!("'{path}' is not valid UTF-8"))
    }

    /// Write the entire string to a file.
    fn write_from_string(&self, string: &str, path: &str) -> anyhow::Result<()> {
        let stream = self.open_write(path)?;
        let mut guard = stream.borrow_mut();
        let write = guard.deref_mut();
        Ok(write.write_all(string.as_bytes())?)
    }
}

/// Time interface.
pub trait Time {
    /// Calculates the current time.
    fn now(&self) -> time::OffsetDateTime;
}

/// Configuration file reader.
pub struct Ini {
    config: config::PipelineConfig,
    root: String,
}

impl Ini {
    /// Loads the config file. A missing file means all defaults.
    pub fn new(file_system: &Rc<dyn FileSystem>, config_path: &str, root: &str) -> anyhow::Result<Self> {
        let config = if file_system.path_exists(config_path) {
            let data = file_system.read_to_string(config_path)?;
            toml::from_str::<config::PipelineConfig>(&data)
                .with_context(|| format!("failed to parse '{config_path}'"))?
        } else {
            config::PipelineConfig::default()
        };
        config
            .validate()
            .with_context(|| format!("invalid configuration in '{config_path}'"))?;
        Ok(Ini {
            config,
            root: root.into(),
        })
    }

    /// Gets the parsed pipeline configuration.
    pub fn get_config(&self) -> &config::PipelineConfig {
        &self.config
    }

    fn get_abspath(&self, path: &str) -> String {
        if path.starts_with('/') {
            return path.into();
        }
        format!("{}/{}", self.root, path)
    }

    /// Gets the absolute path of the official road statistics table.
    pub fn get_official_stats_path(&self) -> String {
        self.get_abspath(&self.config.inputs.official_stats)
    }

    /// Gets the absolute path of the administrative boundaries.
    pub fn get_boundaries_path(&self) -> String {
        self.get_abspath(&self.config.inputs.boundaries)
    }

    /// Gets the absolute path of the OSM road segments.
    pub fn get_roads_path(&self) -> String {
        self.get_abspath(&self.config.inputs.roads)
    }

    /// Gets the absolute path of the irregular name table.
    pub fn get_names_path(&self) -> String {
        self.get_abspath(&self.config.inputs.names)
    }

    /// Gets the absolute path of the tabular export.
    pub fn get_table_output_path(&self) -> String {
        self.get_abspath(&self.config.outputs.table)
    }

    /// Gets the absolute path of the geometry-bearing export.
    pub fn get_geojson_output_path(&self) -> String {
        self.get_abspath(&self.config.outputs.geojson)
    }

    /// Gets the absolute path of the JSON summary.
    pub fn get_summary_output_path(&self) -> String {
        self.get_abspath(&self.config.outputs.summary)
    }

    /// Gets the absolute paths of all inputs a snapshot depends on.
    pub fn get_input_paths(&self) -> Vec<String> {
        vec![
            self.get_official_stats_path(),
            self.get_boundaries_path(),
            self.get_roads_path(),
            self.get_names_path(),
        ]
    }
}

/// Context owns global state which is set up once and then read everywhere.
pub struct Context {
    root: String,
    ini: Ini,
    file_system: Rc<dyn FileSystem>,
    time: Rc<dyn Time>,
    snapshot_cache: cache::SnapshotCache,
}

impl Context {
    /// Creates a new Context; `prefix` is relative to the current directory.
    pub fn new(prefix: &str) -> anyhow::Result<Self> {
        let current_dir = std::env::current_dir()?;
        let root_path = if prefix.is_empty() {
            current_dir
        } else {
            current_dir.join(prefix)
        };
        let root: String = root_path
            .to_str()
            .context("root directory is not valid UTF-8")?
            .into();
        let file_system: Rc<dyn FileSystem> = Rc::new(system::StdFileSystem {});
        let ini = Ini::new(&file_system, &format!("{root}/workdir/config.toml"), &root)?;
        let time: Rc<dyn Time> = Rc::new(system::StdTime {});
        Ok(Context {
            root,
            ini,
            file_system,
            time,
            snapshot_cache: cache::SnapshotCache::new(),
        })
    }

    /// Make a path absolute, taking the repo root as a base dir.
    pub fn get_abspath(&self, rel_path: &str) -> String {
        if rel_path.starts_with('/') {
            return rel_path.into();
        }
        format!("{}/{}", self.root, rel_path)
    }

    /// Gets the ini file.
    pub fn get_ini(&self) -> &Ini {
        &self.ini
    }

    /// Re-reads the ini file, using the current file system.
    pub fn reload_ini(&mut self) -> anyhow::Result<()> {
        let config_path = self.get_abspath("workdir/config.toml");
        self.ini = Ini::new(&self.file_system, &config_path, &self.root)?;
        self.snapshot_cache.invalidate();
        Ok(())
    }

    /// Gets the file system implementation.
    pub fn get_file_system(&self) -> &Rc<dyn FileSystem> {
        &self.file_system
    }

    /// Sets the file system implementation.
    pub fn set_file_system(&mut self, file_system: &Rc<dyn FileSystem>) {
        self.file_system = file_system.clone();
        self.snapshot_cache.invalidate();
    }

    /// Gets the time implementation.
    pub fn get_time(&self) -> &Rc<dyn Time> {
        &self.time
    }

    /// Sets the time implementation.
    pub fn set_time(&mut self, time: &Rc<dyn Time>) {
        self.time = time.clone();
    }

    /// Gets the snapshot cache shared by the readers of this context.
    pub fn get_snapshot_cache(&self) -> &cache::SnapshotCache {
        &self.snapshot_cache
    }
}
