use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::warn;

use kotori_core::conversion::{ConversionEngine, ReadingTable, TableEngine};
use kotori_core::settings::{parse_settings_toml, Settings};
use kotori_session::{Dispatch, InputController, KeyEvent, Modifiers};

use crate::async_worker::AsyncWorker;

use super::converter::{ForeignEngine, KotoriConverter};
use super::host::EventLog;
use super::types::{KotoriCandidateWindow, KotoriError, KotoriEvent, KotoriKeyResponse};

struct Inner {
    controller: InputController,
    /// Generation handed to the worker whose result has not arrived yet.
    in_flight: Option<u64>,
}

/// One input context exported to Swift. Conversion runs on a background
/// worker; results are picked up through `poll`.
#[derive(uniffi::Object)]
pub struct KotoriSession {
    inner: Mutex<Inner>,
    worker: AsyncWorker,
}

#[derive(Serialize)]
struct DebugCandidate<'a> {
    text: &'a str,
    score: f32,
    corresponding_count: usize,
}

#[uniffi::export]
impl KotoriSession {
    #[uniffi::constructor]
    pub fn new(
        converter: Arc<dyn KotoriConverter>,
        settings_toml: Option<String>,
    ) -> Result<Arc<Self>, KotoriError> {
        let engine: Arc<dyn ConversionEngine> = Arc::new(ForeignEngine::new(converter));
        Self::build(engine, settings_toml)
    }

    /// Session backed by the built-in table engine.
    #[uniffi::constructor]
    pub fn with_table(
        dictionary_toml: String,
        settings_toml: Option<String>,
    ) -> Result<Arc<Self>, KotoriError> {
        let table = ReadingTable::from_toml(&dictionary_toml)
            .map_err(|e| KotoriError::InvalidData { msg: e.to_string() })?;
        let engine: Arc<dyn ConversionEngine> = Arc::new(TableEngine::new(table));
        Self::build(engine, settings_toml)
    }

    pub fn activate(&self) -> KotoriKeyResponse {
        self.with_events(None, |controller, log| {
            controller.activate(&mut log.host());
            true
        })
    }

    pub fn deactivate(&self) -> KotoriKeyResponse {
        self.with_events(None, |controller, log| {
            controller.deactivate(&mut log.host(), &mut log.ui());
            true
        })
    }

    pub fn handle_key(
        &self,
        key_code: u16,
        text: String,
        flags: u8,
        surrounding_text: Option<String>,
    ) -> KotoriKeyResponse {
        let event = KeyEvent::new(key_code, text, Modifiers::from_flags(flags));
        self.with_events(surrounding_text, |controller, log| {
            controller.handle_event(&event, &mut log.host(), &mut log.ui())
        })
    }

    /// Deliver finished conversions. `None` when nothing new arrived.
    pub fn poll(&self) -> Option<KotoriKeyResponse> {
        let mut inner = self.lock();
        let log = EventLog::default();
        let mut delivered = false;
        while let Some(outcome) = self.worker.try_recv() {
            if inner.in_flight == Some(outcome.generation) {
                inner.in_flight = None;
            }
            delivered |= inner.controller.receive_results(
                outcome.generation,
                outcome.result,
                &mut log.host(),
                &mut log.ui(),
            );
        }
        if !delivered {
            return None;
        }
        self.dispatch_pending(&mut inner, &log);
        Some(KotoriKeyResponse {
            consumed: true,
            events: log.into_events(),
        })
    }

    /// Whether a conversion is still running for the current input.
    pub fn is_converting(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Commit the candidate at `index` of the candidate window.
    pub fn choose_candidate(&self, index: u32) -> KotoriKeyResponse {
        self.with_events(None, |controller, log| {
            let candidate = controller.session().candidates().get(index as usize).cloned();
            match candidate {
                Some(candidate) => {
                    controller.on_candidate_chosen_by_pointer(
                        &candidate,
                        &mut log.host(),
                        &mut log.ui(),
                    );
                    true
                }
                None => false,
            }
        })
    }

    pub fn set_selection_index(&self, index: u32) -> KotoriKeyResponse {
        self.with_events(None, |controller, log| {
            controller.on_selection_index_changed_by_pointer(
                index as usize,
                &mut log.host(),
                &mut log.ui(),
            );
            true
        })
    }

    pub fn candidate_window(&self) -> KotoriCandidateWindow {
        KotoriCandidateWindow::from(&self.lock().controller.candidate_window_state())
    }

    pub fn is_composing(&self) -> bool {
        !self.lock().controller.session().is_empty()
    }

    pub fn set_live_conversion(&self, enabled: bool) {
        self.lock()
            .controller
            .session_mut()
            .set_live_conversion(enabled);
    }

    pub fn set_debug_candidate_window(&self, enabled: bool) {
        self.lock()
            .controller
            .session_mut()
            .set_debug_candidate_window(enabled);
    }

    /// Recent raw candidates as a JSON array, newest first.
    pub fn debug_candidates_json(&self) -> String {
        let inner = self.lock();
        let entries: Vec<DebugCandidate<'_>> = inner
            .controller
            .session()
            .debug_log()
            .iter()
            .map(|c| DebugCandidate {
                text: &c.text,
                score: c.score,
                corresponding_count: c.corresponding_count,
            })
            .collect();
        serde_json::to_string(&entries).unwrap_or_else(|e| {
            warn!("debug candidate serialization failed: {e}");
            "[]".to_string()
        })
    }
}

impl KotoriSession {
    fn build(
        engine: Arc<dyn ConversionEngine>,
        settings_toml: Option<String>,
    ) -> Result<Arc<Self>, KotoriError> {
        let settings = match settings_toml {
            Some(toml) => parse_settings_toml(&toml)
                .map_err(|e| KotoriError::InvalidData { msg: e.to_string() })?,
            None => Settings::default(),
        };
        let worker = AsyncWorker::new(Arc::clone(&engine))
            .map_err(|e| KotoriError::Io { msg: e.to_string() })?;
        let mut controller = InputController::new(engine, settings);
        controller.set_dispatch(Dispatch::Deferred);
        Ok(Arc::new(Self {
            inner: Mutex::new(Inner {
                controller,
                in_flight: None,
            }),
            worker,
        }))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("session mutex poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Run one controller call and collect the events it produced.
    fn with_events(
        &self,
        surrounding_text: Option<String>,
        f: impl FnOnce(&mut InputController, &EventLog) -> bool,
    ) -> KotoriKeyResponse {
        let mut inner = self.lock();
        let log = EventLog::with_surrounding(surrounding_text);
        let consumed = f(&mut inner.controller, &log);
        self.dispatch_pending(&mut inner, &log);
        KotoriKeyResponse {
            consumed,
            events: log.into_events(),
        }
    }

    /// Drop superseded work and hand the newest request to the worker.
    fn dispatch_pending(&self, inner: &mut Inner, log: &EventLog) {
        let generation = inner.controller.session().generation();
        if inner.in_flight.is_some_and(|g| g != generation) {
            inner.in_flight = None;
        }
        self.worker.invalidate(generation);
        if let Some(request) = inner.controller.take_pending_request() {
            inner.in_flight = Some(request.generation);
            self.worker.submit(request);
            log.push(KotoriEvent::SchedulePoll);
        }
    }
}
