//! Record-at-a-time scan over an external resource
//!
//! A `Source` opens a `Resource` (or reports it absent); the resource is
//! read one record at a time until it reports `Record::Eof`. Whatever way
//! the scan ends, the resource is released exactly once.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ResourceError;

/// One read: a record, or the end-of-data sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<R> {
    Item(R),
    Eof,
}

/// An opened resource that yields records
pub trait Resource {
    type Record;

    fn read_one(&mut self) -> Result<Record<Self::Record>, ResourceError>;

    /// Give the resource back; called exactly once per successful open
    fn release(&mut self) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// Something that can open resources by path
pub trait Source {
    type Resource: Resource;

    /// `Ok(None)` means the resource does not exist
    fn open(
        &self,
        path: &Path,
        options: &ScanOptions,
    ) -> Result<Option<Self::Resource>, ResourceError>;
}

/// What to do when the resource does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Missing {
    /// Absence is a `ResourceError::Missing`
    #[default]
    Fail,
    /// Absence means zero iterations
    Tolerate,
}

/// Options passed to `Source::open`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub missing: Missing,
}

impl ScanOptions {
    pub fn tolerate_missing(mut self) -> Self {
        self.missing = Missing::Tolerate;
        self
    }
}

/* ===================== Release Guard ===================== */

/// Owns an open resource and releases it when dropped
struct Held<'p, R: Resource> {
    resource: R,
    path: &'p Path,
}

impl<R: Resource> Drop for Held<'_, R> {
    fn drop(&mut self) {
        match self.resource.release() {
            Ok(()) => debug!(path = %self.path.display(), "resource released"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "resource release failed"),
        }
    }
}

/* ===================== Scanning ===================== */

/// Read every record of `path` into `body`
///
/// The body may stop early with `ControlFlow::Break`, whose value is
/// returned as `Some`. A body error is returned as is, after the resource
/// has been released.
pub fn scan<S, B, E>(
    source: &S,
    path: impl AsRef<Path>,
    options: &ScanOptions,
    mut body: impl FnMut(<S::Resource as Resource>::Record) -> Result<ControlFlow<B>, E>,
) -> Result<Option<B>, E>
where
    S: Source,
    E: From<ResourceError>,
{
    let path = path.as_ref();
    let Some(resource) = source.open(path, options)? else {
        return match options.missing {
            Missing::Tolerate => {
                debug!(path = %path.display(), "resource absent, nothing to scan");
                Ok(None)
            }
            Missing::Fail => Err(ResourceError::Missing {
                path: PathBuf::from(path),
            }
            .into()),
        };
    };

    debug!(path = %path.display(), "resource opened");
    let mut held = Held { resource, path };
    loop {
        match held.resource.read_one()? {
            Record::Eof => return Ok(None),
            Record::Item(record) => {
                if let ControlFlow::Break(b) = body(record)? {
                    return Ok(Some(b));
                }
            }
        }
    }
}

/// Read every record of `path` into an infallible body; returns the count
pub fn scan_each<S: Source>(
    source: &S,
    path: impl AsRef<Path>,
    options: &ScanOptions,
    mut body: impl FnMut(<S::Resource as Resource>::Record),
) -> Result<usize, ResourceError> {
    let mut count = 0;
    scan(source, path, options, |record| {
        count += 1;
        body(record);
        Ok::<_, ResourceError>(ControlFlow::<()>::Continue(()))
    })?;
    Ok(count)
}
