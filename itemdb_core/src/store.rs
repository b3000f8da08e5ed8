//! On-disk document cache and output writers.
//!
//! Cached documents are gzip files named `{id}-{dashified-name}.xml.gz` /
//! `.html.gz` under one cache directory. Per-item override records live in
//! a sibling directory as plain `{id}.json` files.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::text::dashify;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    cache_dir: PathBuf,
    overrides_dir: Option<PathBuf>,
}

impl DocumentStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        DocumentStore {
            cache_dir: cache_dir.into(),
            overrides_dir: None,
        }
    }

    pub fn with_overrides(mut self, overrides_dir: impl Into<PathBuf>) -> Self {
        self.overrides_dir = Some(overrides_dir.into());
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    // Item names can contain dots, so extensions are appended by hand
    // rather than via with_extension.
    pub fn xml_path(&self, id: u32, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{id}-{}.xml.gz", dashify(name)))
    }

    pub fn html_path(&self, id: u32, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{id}-{}.html.gz", dashify(name)))
    }

    /// Both halves of the document pair are already cached.
    pub fn is_cached(&self, id: u32, name: &str) -> bool {
        self.xml_path(id, name).exists() && self.html_path(id, name).exists()
    }

    pub fn read_xml(&self, id: u32, name: &str) -> Result<String> {
        read_gzip(&self.xml_path(id, name))
    }

    pub fn read_html(&self, id: u32, name: &str) -> Result<String> {
        read_gzip(&self.html_path(id, name))
    }

    pub fn write_xml(&self, id: u32, name: &str, contents: &str) -> Result<()> {
        write_gzip(&self.xml_path(id, name), contents)
    }

    pub fn write_html(&self, id: u32, name: &str, contents: &str) -> Result<()> {
        write_gzip(&self.html_path(id, name), contents)
    }

    /// The override record for `id`, if one exists. Absence is the normal
    /// case and is not an error.
    pub fn load_override(&self, id: u32) -> Result<Option<serde_json::Value>> {
        let Some(dir) = &self.overrides_dir else {
            return Ok(None);
        };
        let path = dir.join(format!("{id}.json"));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_gzip(path: &Path) -> Result<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingDocument {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(err.into()),
    };
    let mut text = String::new();
    GzDecoder::new(file).read_to_string(&mut text)?;
    Ok(text)
}

fn write_gzip(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
    encoder.write_all(contents.as_bytes())?;
    encoder.finish()?;
    Ok(())
}

/// Serialize one output view to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer(std::io::BufWriter::new(file), value)?;
    Ok(())
}
