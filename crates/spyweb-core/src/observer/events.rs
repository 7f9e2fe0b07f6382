//! Events consumed by the page event loop, and the client that sends them.

use spyweb_dom::{Document, NodeId};
use spyweb_protocols::{Command, Response};
use tokio::sync::{mpsc, oneshot};

use crate::error::ObserverError;

/// Edit applied to the page by the host.
pub type DomEdit = Box<dyn FnOnce(&mut Document) + Send>;

/// Read-only look at the page.
pub type DomRead = Box<dyn FnOnce(&Document) + Send>;

/// Result of committing a mask with a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub selector: String,
    /// The selector was already stored and its record was replaced.
    pub updated: bool,
}

pub enum PageEvent {
    Command {
        command: Command,
        reply: oneshot::Sender<Response>,
    },
    /// Pointer moved over `target`.
    Hover { target: NodeId },
    Click {
        target: NodeId,
        reply: oneshot::Sender<Result<Option<ClickOutcome>, ObserverError>>,
    },
    /// Host-originated DOM change; arms the debounce timer.
    Mutate(DomEdit),
    Navigate {
        url: String,
        reply: oneshot::Sender<Result<(), ObserverError>>,
    },
    Read(DomRead),
}

impl std::fmt::Debug for PageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageEvent::Command { command, .. } => {
                f.debug_struct("Command").field("command", command).finish()
            }
            PageEvent::Hover { target } => f.debug_struct("Hover").field("target", target).finish(),
            PageEvent::Click { target, .. } => {
                f.debug_struct("Click").field("target", target).finish()
            }
            PageEvent::Mutate(_) => f.write_str("Mutate"),
            PageEvent::Navigate { url, .. } => f.debug_struct("Navigate").field("url", url).finish(),
            PageEvent::Read(_) => f.write_str("Read"),
        }
    }
}

/// Cloneable client of a running [`PageObserver`](super::PageObserver).
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: mpsc::Sender<PageEvent>,
}

impl PageHandle {
    /// A handle and the receiver to pass to
    /// [`PageObserver::run`](super::PageObserver::run).
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<PageEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    async fn send(&self, event: PageEvent) -> Result<(), ObserverError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ObserverError::ChannelClosed)
    }

    pub async fn command(&self, command: Command) -> Result<Response, ObserverError> {
        let (reply, rx) = oneshot::channel();
        self.send(PageEvent::Command { command, reply }).await?;
        rx.await.map_err(|_| ObserverError::ChannelClosed)
    }

    pub async fn hover(&self, target: NodeId) -> Result<(), ObserverError> {
        self.send(PageEvent::Hover { target }).await
    }

    pub async fn click(&self, target: NodeId) -> Result<Option<ClickOutcome>, ObserverError> {
        let (reply, rx) = oneshot::channel();
        self.send(PageEvent::Click { target, reply }).await?;
        rx.await.map_err(|_| ObserverError::ChannelClosed)?
    }

    pub async fn mutate(
        &self,
        edit: impl FnOnce(&mut Document) + Send + 'static,
    ) -> Result<(), ObserverError> {
        self.send(PageEvent::Mutate(Box::new(edit))).await
    }

    pub async fn navigate(&self, url: impl Into<String>) -> Result<(), ObserverError> {
        let (reply, rx) = oneshot::channel();
        self.send(PageEvent::Navigate {
            url: url.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| ObserverError::ChannelClosed)?
    }

    /// Run `f` against the page and return its result.
    pub async fn read<R, F>(&self, f: F) -> Result<R, ObserverError>
    where
        R: Send + 'static,
        F: FnOnce(&Document) -> R + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        self.send(PageEvent::Read(Box::new(move |doc| {
            let _ = reply.send(f(doc));
        })))
        .await?;
        rx.await.map_err(|_| ObserverError::ChannelClosed)
    }
}
