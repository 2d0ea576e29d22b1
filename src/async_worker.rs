use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tracing::debug;

use kotori_core::conversion::{ConversionEngine, ConversionError, ConversionResults};
use kotori_session::ConversionRequest;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

pub(crate) struct ConversionOutcome {
    pub generation: u64,
    pub result: Result<ConversionResults, ConversionError>,
}

// ---------------------------------------------------------------------------
// AsyncWorker
// ---------------------------------------------------------------------------

/// Background conversion thread. Only the newest request is worth running:
/// queued work is drained to the latest item and anything whose generation
/// is no longer current is dropped before and after the engine call.
pub(crate) struct AsyncWorker {
    work_tx: mpsc::Sender<ConversionRequest>,
    result_rx: Mutex<mpsc::Receiver<ConversionOutcome>>,
    generation: Arc<AtomicU64>,
}

impl AsyncWorker {
    pub fn new(engine: Arc<dyn ConversionEngine>) -> io::Result<Self> {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<ConversionRequest>();
        let (result_tx, result_rx) = mpsc::channel::<ConversionOutcome>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("kotori-conversion".into())
                .spawn(move || conversion_worker(work_rx, result_tx, generation, engine))?;
        }
        Ok(Self {
            work_tx,
            result_rx: Mutex::new(result_rx),
            generation,
        })
    }

    pub fn submit(&self, request: ConversionRequest) {
        self.generation.store(request.generation, Ordering::SeqCst);
        let _ = self.work_tx.send(request);
    }

    /// Mark everything older than `generation` as stale.
    pub fn invalidate(&self, generation: u64) {
        self.generation.store(generation, Ordering::SeqCst);
    }

    pub fn try_recv(&self) -> Option<ConversionOutcome> {
        let rx = self.result_rx.lock().ok()?;
        rx.try_recv().ok()
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

fn conversion_worker(
    rx: mpsc::Receiver<ConversionRequest>,
    tx: mpsc::Sender<ConversionOutcome>,
    generation: Arc<AtomicU64>,
    engine: Arc<dyn ConversionEngine>,
) {
    while let Ok(work) = rx.recv() {
        // Drain: if multiple work items queued, skip to latest
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "skipping stale conversion");
            continue;
        }

        let result = engine.request_candidates(&latest.target, &latest.options);

        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "dropping stale conversion result");
            continue;
        }

        if tx
            .send(ConversionOutcome {
                generation: latest.generation,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}
