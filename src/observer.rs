//! Optional hook for inspecting raw collaborator responses.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{Service, TripError};

/// What became of a response once the core tried to parse it.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// Parsed successfully into `items` coordinates or candidates.
    Parsed { items: usize },
    Failed(&'a TripError),
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseEvent<'a> {
    pub service: Service,
    pub body: &'a str,
    pub outcome: Outcome<'a>,
}

/// Receives every raw body the trip planner parses.
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, event: &ResponseEvent<'_>);
}

impl<F> ResponseObserver for F
where
    F: Fn(&ResponseEvent<'_>) + Send + Sync,
{
    fn on_response(&self, event: &ResponseEvent<'_>) {
        self(event)
    }
}

/// Writes the most recent body per service to `<dir>/<service>-last.json`.
#[derive(Debug, Clone)]
pub struct DumpDirObserver {
    dir: PathBuf,
}

impl DumpDirObserver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, service: Service) -> PathBuf {
        self.dir.join(format!("{}-last.json", service.as_str()))
    }
}

impl ResponseObserver for DumpDirObserver {
    fn on_response(&self, event: &ResponseEvent<'_>) {
        let path = self.path_for(event.service);
        let written = fs::create_dir_all(&self.dir).and_then(|()| fs::write(&path, event.body));
        match written {
            Ok(()) => debug!(path = %path.display(), outcome = ?event.outcome, "wrote response dump"),
            Err(err) => warn!(path = %path.display(), error = %err, "failed to write response dump"),
        }
    }
}
