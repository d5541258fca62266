use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ReportConfig;
use crate::errors::{AnalyticsError, AnalyticsResult};

/// Durable destination for report artifacts.
pub trait ReportSink {
    fn write(&self, destination: &str, artifact: &Value) -> AnalyticsResult<()>;
}

impl<S: ReportSink + ?Sized> ReportSink for &S {
    fn write(&self, destination: &str, artifact: &Value) -> AnalyticsResult<()> {
        (**self).write(destination, artifact)
    }
}

/// Writes each artifact to `<dir>/<destination>`, replacing any previous file.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    pretty: bool,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pretty: false,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            dir: config.output_dir.clone(),
            pretty: config.pretty,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path_of(&self, destination: &str) -> PathBuf {
        self.dir.join(destination)
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl ReportSink for FileSink {
    fn write(&self, destination: &str, artifact: &Value) -> AnalyticsResult<()> {
        let file = File::create(self.path_of(destination)).map_err(AnalyticsError::WriteFailed)?;
        let mut writer = BufWriter::new(file);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, artifact)?;
        } else {
            serde_json::to_writer(&mut writer, artifact)?;
        }
        writer.flush().map_err(AnalyticsError::WriteFailed)
    }
}

/// Keeps artifacts in memory, latest write per destination wins.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: RefCell<Vec<(String, Value)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, destination: &str) -> Option<Value> {
        self.artifacts
            .borrow()
            .iter()
            .find(|(name, _)| name == destination)
            .map(|(_, value)| value.clone())
    }

    pub fn len(&self) -> usize {
        self.artifacts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.borrow().is_empty()
    }
}

impl ReportSink for MemorySink {
    fn write(&self, destination: &str, artifact: &Value) -> AnalyticsResult<()> {
        let mut artifacts = self.artifacts.borrow_mut();
        match artifacts.iter_mut().find(|(name, _)| name == destination) {
            Some((_, value)) => *value = artifact.clone(),
            None => artifacts.push((destination.to_string(), artifact.clone())),
        }
        Ok(())
    }
}
