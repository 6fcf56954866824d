//! render context
//!
//! A [RenderContext] is shared by everything that runs as part of one render: the function map and every
//! datasource call. It carries a name used in logs and a cancellation signal the caller controls through the
//! [CancelHandle] returned by [RenderContext::new].
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct RenderContext {
    name: Arc<str>,
    cancel: watch::Receiver<bool>,
}

/// Cancels every clone of the [RenderContext] it was created with
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        tracing::debug!("render cancelled");
        self.sender.send_replace(true);
    }
}

impl RenderContext {
    pub fn new(name: impl Into<Arc<str>>) -> (Self, CancelHandle) {
        let (sender, cancel) = watch::channel(false);
        let context = Self {
            name: name.into(),
            cancel,
        };

        (context, CancelHandle { sender })
    }

    /// A context that is never cancelled
    pub fn background(name: impl Into<Arc<str>>) -> Self {
        Self::new(name).0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Completes once the context is cancelled
    ///
    /// Never completes if the [CancelHandle] was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut cancel = self.cancel.clone();
        let handle_dropped = cancel.wait_for(|cancelled| *cancelled).await.is_err();
        if handle_dropped {
            std::future::pending::<()>().await;
        }
    }
}
