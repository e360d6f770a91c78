//! Background loading of slow resources.
//!
//! A load closure runs on its own named thread and hands exactly one
//! `Result` back through a single-slot channel. The caller polls the
//! [`LoadHandle`], blocks on it, or registers a completion callback. The
//! loaded value is only reachable through the handle, so nothing can use it
//! before the load has finished.
//!
//! # Examples
//!
//! ```
//! use tfcat::loader::spawn_load;
//!
//! let handle = spawn_load("answer", || Ok(6 * 7)).unwrap();
//! assert_eq!(handle.wait().unwrap(), 42);
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use log::{debug, info, warn};

use crate::error::{Result, TfcatError};

/// Pending result of a background load.
#[derive(Debug)]
pub struct LoadHandle<T> {
    name: String,
    receiver: Receiver<Result<T>>,
    thread: Option<JoinHandle<()>>,
    started: Instant,
    delivered: bool,
}

/// Run `load` on a background thread named after `name`.
pub fn spawn_load<T, F>(name: impl Into<String>, load: F) -> Result<LoadHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    spawn(name.into(), load, None::<fn(&Result<T>)>)
}

/// Like [`spawn_load`], calling `on_complete` on the loader thread with the
/// result just before it is handed over.
pub fn spawn_load_with_callback<T, F, C>(
    name: impl Into<String>,
    load: F,
    on_complete: C,
) -> Result<LoadHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
    C: FnOnce(&Result<T>) + Send + 'static,
{
    spawn(name.into(), load, Some(on_complete))
}

fn spawn<T, F, C>(name: String, load: F, on_complete: Option<C>) -> Result<LoadHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
    C: FnOnce(&Result<T>) + Send + 'static,
{
    let (sender, receiver) = bounded(1);
    let task_name = name.clone();
    let started = Instant::now();

    let thread = thread::Builder::new()
        .name(format!("load-{name}"))
        .spawn(move || {
            debug!("loading {task_name}");
            let result = panic::catch_unwind(AssertUnwindSafe(load)).unwrap_or_else(|payload| {
                Err(TfcatError::resource_unavailable(format!(
                    "loading {task_name} panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

            match &result {
                Ok(_) => info!("loaded {task_name} in {:?}", started.elapsed()),
                Err(e) => warn!("loading {task_name} failed: {e}"),
            }

            if let Some(on_complete) = on_complete {
                on_complete(&result);
            }

            // The handle may already be gone.
            let _ = sender.send(result);
        })?;

    Ok(LoadHandle {
        name,
        receiver,
        thread: Some(thread),
        started,
        delivered: false,
    })
}

impl<T> LoadHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time since the load was started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the result is ready (or has already been taken).
    pub fn is_finished(&self) -> bool {
        self.delivered
            || !self.receiver.is_empty()
            || self.thread.as_ref().is_some_and(|t| t.is_finished())
    }

    /// Take the result if it is ready. Returns `None` while the load is
    /// running and after the result has been taken.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        if self.delivered {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(self.lost()),
        };
        self.finish();
        Some(result)
    }

    /// Wait up to `timeout` for the result.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<T>> {
        if self.delivered {
            return None;
        }
        let result = match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(self.lost()),
        };
        self.finish();
        Some(result)
    }

    /// Block until the load completes.
    pub fn wait(mut self) -> Result<T> {
        if self.delivered {
            return Err(TfcatError::resource_unavailable(format!(
                "result of {} was already taken",
                self.name
            )));
        }
        let result = self.receiver.recv().unwrap_or_else(|_| Err(self.lost()));
        self.finish();
        result
    }

    fn finish(&mut self) {
        self.delivered = true;
        if let Some(thread) = self.thread.take() {
            // The result has been sent, so the thread is about to exit.
            let _ = thread.join();
        }
    }

    fn lost(&self) -> TfcatError {
        TfcatError::resource_unavailable(format!("loader thread for {} exited without a result", self.name))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
