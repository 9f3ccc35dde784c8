//! Issuing GL calls from any thread, executing them on the context thread.
//!
//! A [`GlQueue`] encodes each call into its wire record and hands it to the
//! [`GlWorker`] that owns the backend. Calls that return a value or carry a
//! pointer block until the worker has run them, so the memory they borrow
//! outlives its use. Everything else is fire-and-forget.
//!
//! A blocking call made on the worker's own thread while the worker is not
//! draining will never return.

use std::ffi::c_char;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

use glwork_core::{DispatchError, FnArgs, GlCall};
use tracing::{trace, warn};

use crate::backend::GlBackend;
use crate::dispatch::process_fn;

type Reply = SyncSender<Result<usize, DispatchError>>;

struct Job {
    args: FnArgs,
    parg: *mut c_char,
    reply: Option<Reply>,
}

// SAFETY: `parg` and any addresses in `args` are only non-null for blocking
// calls, whose issuer stays parked on `reply` until the worker is done with
// them or the job has been dropped.
unsafe impl Send for Job {}

/// Cloneable handle for issuing calls to a [`GlWorker`].
#[derive(Clone)]
pub struct GlQueue {
    tx: Sender<Job>,
}

/// Owns the backend and runs queued calls on the current thread.
pub struct GlWorker<B: GlBackend> {
    backend: B,
    rx: Receiver<Job>,
}

impl<B: GlBackend> GlWorker<B> {
    /// Create a worker around `backend` and the queue that feeds it.
    pub fn new(backend: B) -> (Self, GlQueue) {
        let (tx, rx) = mpsc::channel();
        (Self { backend, rx }, GlQueue { tx })
    }

    /// Run every call already queued, without waiting for more.
    /// Returns how many calls ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            self.execute(job);
            ran += 1;
        }
        ran
    }

    /// Serve calls until every [`GlQueue`] has been dropped.
    pub fn run(&mut self) {
        while let Ok(job) = self.rx.recv() {
            self.execute(job);
        }
        trace!("all GL queues dropped, worker exiting");
    }

    fn execute(&mut self, job: Job) {
        let result = unsafe { process_fn(&mut self.backend, &job.args, job.parg) };
        match job.reply {
            Some(reply) => {
                let _ = reply.send(result);
            }
            None => {
                if let Err(err) = result {
                    warn!("queued GL call failed: {err}");
                }
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl GlQueue {
    /// Queue `call`. Blocking calls return the result word; the others
    /// return `Ok(0)` as soon as the call is queued.
    pub fn call(&self, call: &GlCall<'_>, out: Option<&mut [u8]>) -> Result<usize, DispatchError> {
        let raw = call.encode(out)?;

        if !call.function().is_blocking() {
            self.tx
                .send(Job {
                    args: raw.args,
                    parg: raw.parg,
                    reply: None,
                })
                .map_err(|_| DispatchError::WorkerGone)?;
            return Ok(0);
        }

        let (reply, result) = mpsc::sync_channel(1);
        self.tx
            .send(Job {
                args: raw.args,
                parg: raw.parg,
                reply: Some(reply),
            })
            .map_err(|_| DispatchError::WorkerGone)?;
        result.recv().map_err(|_| DispatchError::WorkerGone)?
    }
}
