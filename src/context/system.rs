/*
 * Copyright 2022 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Trait implementations using the real file system and time.

use super::*;
use anyhow::Context as _;

/// File system implementation, backed by the Rust stdlib.
pub struct StdFileSystem {}

// Real file-system is intentionally mocked.
impl FileSystem for StdFileSystem {
    fn path_exists(&self, path: &str) -> bool {
        std::path::Path::new(path).exists()
    }

    fn getmtime(&self, path: &str) -> anyhow::Result<time::OffsetDateTime> {
        let metadata =
            std::fs::metadata(path).with_context(|| format!("metadata() failed for '{path}'"))?;
        let modified = metadata.modified()?;
        Ok(time::OffsetDateTime::from(modified))
    }

    fn open_read(&self, path: &str) -> anyhow::Result<Rc<RefCell<dyn Read>>> {
        let ret: Rc<RefCell<dyn Read>> = Rc::new(RefCell::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open {path} for reading"))?,
        ));
        Ok(ret)
    }

    fn open_write(&self, path: &str) -> anyhow::Result<Rc<RefCell<dyn Write>>> {
        // Create containing directory if needed.
        let path_obj = std::path::Path::new(path);
        let dir_obj = path_obj.parent().context("failed to get parent dir")?;
        std::fs::create_dir_all(dir_obj)?;

        let ret: Rc<RefCell<dyn Write>> = Rc::new(RefCell::new(
            std::fs::File::create(path)
                .with_context(|| format!("failed to open {path} for writing"))?,
        ));
        Ok(ret)
    }
}

/// Time implementation, backed by the the actual time.
pub struct StdTime {}

// Real time is intentionally mocked.
impl Time for StdTime {
    fn now(&self) -> time::OffsetDateTime {
        time::OffsetDateTime::now_utc()
    }
}
