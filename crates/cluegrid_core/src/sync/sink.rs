//! External reference sink (clipboard equivalent) used by the share path.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Non-fatal failure to hand a share reference to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError(pub String);

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "reference sink failed: {}", self.0)
    }
}

impl Error for SinkError {}

/// Receives share references, e.g. a system clipboard.
#[async_trait]
pub trait ReferenceSink: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), SinkError>;
}

/// Sink that keeps every written reference in memory.
#[derive(Default)]
pub struct MemorySink {
    written: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All references written so far, oldest first.
    pub fn written(&self) -> Vec<String> {
        self.written
            .lock()
            .map(|written| written.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReferenceSink for MemorySink {
    async fn write(&self, text: &str) -> Result<(), SinkError> {
        self.written
            .lock()
            .map_err(|_| SinkError("memory sink lock poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}
