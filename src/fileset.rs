//! File-set read primitive (E2) — pin/read/unpin over posting files.
//!
//! The production free-space/fileset abstraction manages growable
//! multi-segment files; that machinery is out of scope here (see the crate
//! root docs). This module defines the [`FileSet`] trait plus [`DirFileSet`],
//! a minimal single-directory implementation backed by `memmap2`, sufficient
//! to serve byte-range reads to [`crate::postings::DiskListSource`].
//!
//! # Pin/unpin as RAII
//!
//! The original primitive is `pin(file_id) -> handle`, `read(handle, ...)`,
//! `unpin(file_id, handle)`, with the invariant that every pin gets exactly
//! one unpin. Here `pin` returns a [`PinGuard`] whose `Drop` releases the
//! pin — callers cannot forget to unpin, even on an error path via `?`.
//! Pins on the same file are reference-counted rather than required to
//! nest strictly, since multiple guards can independently hold the same
//! underlying `Arc<Mmap>`.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use memmap2::Mmap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors produced by a [`FileSet`] implementation.
#[derive(Debug, Error)]
pub enum FileSetError {
    /// Underlying I/O error while opening or mapping a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested file id has no corresponding file in this set.
    #[error("unknown file id {0}")]
    UnknownFile(u32),
}

/// Pins a byte-addressable file into memory for the duration the guard is
/// held, and unpins on drop.
pub trait FileSet {
    /// The pinned handle type; derefs to the file's full byte contents.
    type Guard: Deref<Target = [u8]>;

    /// Pin `file_id`, returning a guard over its contents.
    fn pin(&self, file_id: u32) -> Result<Self::Guard, FileSetError>;

    /// Number of currently outstanding pins on `file_id` (for diagnostics
    /// and tests only — not part of the original contract).
    fn pin_count(&self, file_id: u32) -> usize;
}

struct DirFileSetInner {
    dir: PathBuf,
    mmaps: HashMap<u32, Arc<Mmap>>,
    pin_counts: HashMap<u32, usize>,
}

/// Minimal [`FileSet`] implementation over files named `{file_id}.postings`
/// in a single directory.
///
/// Not a production free-space manager — no segment growth, no
/// multi-directory sharding. Files are mapped read-only and lazily, once
/// per `file_id`, and the mapping is reused across pins via `Arc`.
#[derive(Clone)]
pub struct DirFileSet {
    inner: Arc<RwLock<DirFileSetInner>>,
}

impl DirFileSet {
    /// Opens a file set rooted at `dir`. The directory must already exist;
    /// individual posting files are mapped lazily on first pin.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DirFileSetInner {
                dir: dir.into(),
                mmaps: HashMap::new(),
                pin_counts: HashMap::new(),
            })),
        }
    }

    fn file_path(dir: &std::path::Path, file_id: u32) -> PathBuf {
        dir.join(format!("{file_id}.postings"))
    }
}

impl FileSet for DirFileSet {
    type Guard = PinGuard;

    fn pin(&self, file_id: u32) -> Result<PinGuard, FileSetError> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mmap = if let Some(mmap) = inner.mmaps.get(&file_id) {
            Arc::clone(mmap)
        } else {
            let path = Self::file_path(&inner.dir, file_id);
            let file = File::open(&path).map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    FileSetError::UnknownFile(file_id)
                } else {
                    FileSetError::Io(e)
                }
            })?;
            // SAFETY: the file is opened read-only and never mutated while
            // mapped; callers are expected to treat posting files as
            // immutable once written by the (out-of-scope) index builder.
            let mmap = Arc::new(unsafe { Mmap::map(&file)? });
            inner.mmaps.insert(file_id, Arc::clone(&mmap));
            mmap
        };

        *inner.pin_counts.entry(file_id).or_insert(0) += 1;
        trace!(file_id, pins = inner.pin_counts[&file_id], "fileset pin");

        Ok(PinGuard {
            file_id,
            mmap,
            inner: Arc::clone(&self.inner),
        })
    }

    fn pin_count(&self, file_id: u32) -> usize {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.pin_counts.get(&file_id).copied().unwrap_or(0)
    }
}

/// RAII guard over a pinned posting file's byte contents.
///
/// Dereferences to the full mapped file. Releasing the pin (via `Drop`)
/// does not unmap the file — the mapping is kept alive in the `DirFileSet`
/// for reuse by later pins.
pub struct PinGuard {
    file_id: u32,
    mmap: Arc<Mmap>,
    inner: Arc<RwLock<DirFileSetInner>>,
}

impl Deref for PinGuard {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.mmap[..]
    }
}

impl Drop for PinGuard {
    fn drop(&mut self) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(count) = inner.pin_counts.get_mut(&self.file_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                inner.pin_counts.remove(&self.file_id);
            }
        }
        debug!(file_id = self.file_id, "fileset unpin");
    }
}
