use crossbeam::channel::{self, select, Sender};
use tracing::{debug, trace, warn};

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// # Background Sweeper
///
/// Runs `sweep` on its own thread every `interval` until stopped. Dropping the
/// stop sender disconnects the stop channel, which wakes the thread even while
/// it waits for the next tick.
pub(crate) struct Janitor {
    stop: Sender<()>,
    handle: JoinHandle<()>,
    interval: Duration,
}

impl Janitor {
    pub fn start<F>(interval: Duration, sweep: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (stop, stopped) = channel::bounded::<()>(0);
        let ticker = channel::tick(interval);

        let handle = thread::Builder::new()
            .name("adrenaline-janitor".into())
            .spawn(move || {
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            trace!("janitor tick");
                            sweep();
                        }
                        // only ever disconnected, nothing is sent.
                        recv(stopped) -> _ => break,
                    }
                }

                debug!("janitor stopped");
            })?;

        debug!(?interval, "janitor started");
        Ok(Self {
            stop,
            handle,
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops the sweeper and waits for an in-flight sweep to finish.
    pub fn stop(self) {
        let Self { stop, handle, .. } = self;
        drop(stop);

        // the last handle can be dropped from an eviction hook running on the
        // janitor thread itself. it exits on its own after that sweep.
        if handle.thread().id() == thread::current().id() {
            return;
        }

        if handle.join().is_err() {
            warn!("janitor thread panicked");
        }
    }
}
