//! Test doubles for the generation seam. Built only for unit tests or with the `testing`
//! feature, which the gateway enables for its own tests.

use crate::error::GenerationError;
use crate::generator::{FragmentStream, GenerationRequest, TextGenerator};
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays a fixed script of fragments and failures. Every call replays the full script.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Vec<Result<String, String>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedGenerator {
    /// Script that yields `fragments` and then completes.
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(fragments.into_iter().map(|s| Ok(s.into())).collect())
    }

    /// Arbitrary script; an `Err(message)` entry becomes a `GenerationError::Scripted`.
    pub fn from_script(script: Vec<Result<String, String>>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of times `stream_text` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl TextGenerator for ScriptedGenerator {
    fn stream_text(&self, request: GenerationRequest) -> FragmentStream {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request);
        }
        let items: Vec<Result<String, GenerationError>> = self
            .script
            .iter()
            .cloned()
            .map(|item| item.map_err(GenerationError::Scripted))
            .collect();
        stream::iter(items).boxed()
    }
}
