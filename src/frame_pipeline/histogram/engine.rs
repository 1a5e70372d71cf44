use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use tracing::{debug, info_span, warn};

use crate::frame_pipeline::common::buffer::FrameBuffer;
use crate::frame_pipeline::common::error::{PlayerError, Result};
use crate::frame_pipeline::display::types::DisplayImage;
use crate::frame_pipeline::histogram::render::render;
use crate::frame_pipeline::histogram::types::{HistogramConfig, HistogramImage, HistogramTables};

type Compute = fn(FrameBuffer) -> (HistogramTables, DisplayImage);

/// Background histogram worker.
///
/// At most one computation is in flight. A request made while the worker is
/// busy, including the quiescent pause after each result, is rejected with
/// [`PlayerError::HistogramBusy`]; callers simply try again on a later frame.
/// Only the newest unread result is kept.
pub struct HistogramEngine {
    busy: Arc<AtomicBool>,
    requests: Option<Sender<FrameBuffer>>,
    results: Receiver<HistogramImage>,
    worker: Option<JoinHandle<()>>,
}

impl HistogramEngine {
    pub fn new(config: HistogramConfig) -> Result<Self> {
        Self::spawn(config, compute)
    }

    fn spawn(config: HistogramConfig, compute: Compute) -> Result<Self> {
        let busy = Arc::new(AtomicBool::new(false));
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);

        let worker = Worker {
            requests: request_rx,
            results: result_tx,
            stale: result_rx.clone(),
            busy: Arc::clone(&busy),
            quiescent: config.quiescent,
            compute,
        };
        let exit_guard = ReleaseOnExit(Arc::clone(&busy));
        let worker = std::thread::Builder::new()
            .name("histogram".to_string())
            .spawn(move || {
                let _exit_guard = exit_guard;
                worker.run();
            })?;

        Ok(Self {
            busy,
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
        })
    }

    pub fn is_idle(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Copies `frame` and starts a computation on the copy.
    pub fn request(&self, frame: &FrameBuffer) -> Result<()> {
        self.claim()?;
        match frame.try_clone() {
            Ok(copy) => self.dispatch(copy),
            Err(e) => {
                self.release();
                Err(e)
            }
        }
    }

    /// Starts a computation on a copy the caller already owns.
    pub fn submit(&self, frame: FrameBuffer) -> Result<()> {
        self.claim()?;
        self.dispatch(frame)
    }

    /// Completion notifications, one per accepted request.
    pub fn results(&self) -> &Receiver<HistogramImage> {
        &self.results
    }

    pub fn try_recv(&self) -> Option<HistogramImage> {
        self.results.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<HistogramImage> {
        match self.results.recv_timeout(timeout) {
            Ok(image) => Some(image),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Histogram worker disconnected");
                None
            }
        }
    }

    fn claim(&self) -> Result<()> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| PlayerError::HistogramBusy)
    }

    fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    fn dispatch(&self, frame: FrameBuffer) -> Result<()> {
        let sent = self
            .requests
            .as_ref()
            .map(|requests| requests.send(frame).is_ok())
            .unwrap_or(false);

        if sent {
            Ok(())
        } else {
            self.release();
            Err(PlayerError::HistogramWorkerGone)
        }
    }
}

impl Drop for HistogramEngine {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Histogram worker panicked");
            }
        }
    }
}

/// Clears the busy flag when the worker thread ends, panics included, so a
/// dead worker reports [`PlayerError::HistogramWorkerGone`] instead of busy.
struct ReleaseOnExit(Arc<AtomicBool>);

impl Drop for ReleaseOnExit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Worker {
    requests: Receiver<FrameBuffer>,
    results: Sender<HistogramImage>,
    stale: Receiver<HistogramImage>,
    busy: Arc<AtomicBool>,
    quiescent: Duration,
    compute: Compute,
}

impl Worker {
    fn run(self) {
        let mut run_count = 0u64;

        for frame in self.requests.iter() {
            let (counts, image) = {
                let _span = info_span!("histogram", run = run_count + 1).entered();
                (self.compute)(frame)
            };
            run_count += 1;

            self.publish(HistogramImage {
                counts,
                image,
                run: run_count,
            });

            std::thread::sleep(self.quiescent);
            self.busy.store(false, Ordering::Release);
        }

        debug!("Histogram worker stopped after {} runs", run_count);
    }

    /// Replaces any unread result with `image`.
    fn publish(&self, mut image: HistogramImage) {
        loop {
            match self.results.try_send(image) {
                Ok(()) => return,
                Err(TrySendError::Full(unsent)) => {
                    if self.stale.try_recv().is_ok() {
                        debug!("Dropped unread histogram result");
                    }
                    image = unsent;
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!("Histogram result dropped, no receiver");
                    return;
                }
            }
        }
    }
}

fn compute(frame: FrameBuffer) -> (HistogramTables, DisplayImage) {
    let counts = HistogramTables::count(&frame);
    drop(frame);
    let image = render(&counts);
    (counts, image)
}
