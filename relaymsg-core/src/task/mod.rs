use std::future::Future;

use tokio::task::JoinHandle;

use crate::network::Destination;

/// Handle to one spawned transmission.
///
/// Dropping it detaches the task; it is never cancelled.
#[derive(Debug)]
pub struct SendTask {
    destination: Destination,
    handle: JoinHandle<()>,
}

impl SendTask {
    /// Spawns `fut` on the current Tokio runtime.
    pub(crate) fn spawn<Fut>(destination: Destination, fut: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            destination,
            handle: tokio::spawn(fut),
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to end. Returns `false` if it panicked or the
    /// runtime shut it down before completion.
    pub async fn join(self) -> bool {
        match self.handle.await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(destination = %self.destination, "send task aborted: {e}");
                false
            }
        }
    }
}
