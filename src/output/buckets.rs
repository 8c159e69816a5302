//! Per-task CSV bucket writer.
//!
//! Reorganizes a flat benchmark log into one delimited file per task
//! bucket (`<bucket>_log.csv` in the output directory). Buckets are
//! created lazily on first write.

use crate::parser::Row;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct BucketWriter {
    dir: PathBuf,
    writers: HashMap<String, csv::Writer<File>>,
}

impl BucketWriter {
    /// Open a bucket set rooted at `dir`, creating the directory if needed.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, OutputError> {
        let dir = dir.as_ref().to_path_buf();
        if dir.as_os_str().is_empty() {
            return Err(OutputError::InvalidPath("path is empty".to_string()));
        }
        if dir.exists() && !dir.is_dir() {
            return Err(OutputError::InvalidPath(format!(
                "path is not a directory: {}",
                dir.display()
            )));
        }
        if !dir.exists() {
            debug!("creating output directory: {}", dir.display());
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Self {
            dir,
            writers: HashMap::new(),
        })
    }

    /// Append one row to the named bucket.
    pub fn write(&mut self, bucket: &str, row: &Row) -> Result<(), OutputError> {
        let writer = match self.writers.entry(bucket.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = self.dir.join(format!("{bucket}_log.csv"));
                debug!("opening bucket: {}", path.display());
                entry.insert(csv::Writer::from_path(path)?)
            }
        };
        writer.write_record(&row.fields)?;
        Ok(())
    }

    /// Flush every bucket to disk.
    pub fn finish(mut self) -> Result<(), OutputError> {
        let count = self.writers.len();
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        info!("wrote {} bucket file(s) to {}", count, self.dir.display());
        Ok(())
    }
}
