//! File-backed sources
//!
//! `LineSource` yields text lines; `JsonLinesSource` decodes one JSON
//! document per non-blank line. A file that does not exist is reported as
//! absent so the caller's `Missing` policy decides what happens.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::resource::{Record, Resource, ScanOptions, Source};
use crate::error::ResourceError;

fn open_file(path: &Path) -> Result<Option<File>, ResourceError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ResourceError::Open {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/* ===================== Lines ===================== */

/// Opens text files as line resources
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSource;

/// An open text file read line by line
#[derive(Debug)]
pub struct Lines {
    reader: Option<BufReader<File>>,
    path: PathBuf,
    record: usize,
}

impl Lines {
    /// Number of lines read so far
    pub fn position(&self) -> usize {
        self.record
    }
}

impl Source for LineSource {
    type Resource = Lines;

    fn open(&self, path: &Path, _options: &ScanOptions) -> Result<Option<Lines>, ResourceError> {
        Ok(open_file(path)?.map(|file| Lines {
            reader: Some(BufReader::new(file)),
            path: path.to_path_buf(),
            record: 0,
        }))
    }
}

impl Resource for Lines {
    type Record = String;

    fn read_one(&mut self) -> Result<Record<String>, ResourceError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Record::Eof);
        };

        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .map_err(|source| ResourceError::Read {
                path: self.path.clone(),
                record: self.record,
                source,
            })?;
        if read == 0 {
            return Ok(Record::Eof);
        }

        self.record += 1;
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Record::Item(line))
    }

    fn release(&mut self) -> Result<(), ResourceError> {
        // Dropping the reader closes the file
        self.reader = None;
        Ok(())
    }
}

/* ===================== JSON Lines ===================== */

/// Opens files holding one JSON document per line
#[derive(Debug, Clone, Copy)]
pub struct JsonLinesSource<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for JsonLinesSource<T> {
    fn default() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> JsonLinesSource<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// An open JSON-lines file
#[derive(Debug)]
pub struct JsonLines<T> {
    lines: Lines,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Source for JsonLinesSource<T> {
    type Resource = JsonLines<T>;

    fn open(
        &self,
        path: &Path,
        options: &ScanOptions,
    ) -> Result<Option<JsonLines<T>>, ResourceError> {
        Ok(LineSource.open(path, options)?.map(|lines| JsonLines {
            lines,
            _record: PhantomData,
        }))
    }
}

impl<T: DeserializeOwned> Resource for JsonLines<T> {
    type Record = T;

    fn read_one(&mut self) -> Result<Record<T>, ResourceError> {
        loop {
            let line = match self.lines.read_one()? {
                Record::Item(line) => line,
                Record::Eof => return Ok(Record::Eof),
            };
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line)
                .map(Record::Item)
                .map_err(|source| ResourceError::Decode {
                    path: self.lines.path.clone(),
                    record: self.lines.position(),
                    source,
                });
        }
    }

    fn release(&mut self) -> Result<(), ResourceError> {
        self.lines.release()
    }
}
