//! Binding service: channel-based actor around [`BindingManager`].
//!
//! A single loop owns the manager and therefore the binding slot. User
//! commands arrive through [`BindingHandle`]; host close events arrive on
//! their own channel. Both are processed one at a time, so a close event
//! can never interleave with a bind in progress. Close events are polled
//! first, so a send queued after a close observes the unbind.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::destination::{Destination, DestinationKind, PasteKind};

use super::{BindRequest, BindingManager, HostEvent};

/// Command sent from a handle to the binding loop.
#[derive(Debug)]
enum BindingCommand {
    Bind {
        kind: DestinationKind,
        reply: oneshot::Sender<bool>,
    },
    BindRequest {
        request: BindRequest,
        reply: oneshot::Sender<bool>,
    },
    Unbind {
        reply: oneshot::Sender<()>,
    },
    IsBound {
        reply: oneshot::Sender<bool>,
    },
    BoundDestination {
        reply: oneshot::Sender<Option<Destination>>,
    },
    Send {
        text: String,
        paste_kind: PasteKind,
        reply: oneshot::Sender<bool>,
    },
    Dispose {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable front door to the binding loop.
///
/// Every call is a request/response round trip. Once the loop has
/// stopped, calls return the negative answer (`false`, `None`).
#[derive(Debug, Clone)]
pub struct BindingHandle {
    tx: mpsc::UnboundedSender<BindingCommand>,
}

/// Start the binding loop on the current tokio runtime.
///
/// The loop runs until [`BindingHandle::dispose`] is called or every
/// handle is dropped. A closed `events` channel only stops auto-unbind.
pub fn spawn_binding_service(
    manager: BindingManager,
    events: mpsc::UnboundedReceiver<HostEvent>,
) -> (BindingHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(manager, rx, events));
    (BindingHandle { tx }, task)
}

async fn run(
    mut manager: BindingManager,
    mut commands: mpsc::UnboundedReceiver<BindingCommand>,
    mut events: mpsc::UnboundedReceiver<HostEvent>,
) {
    let mut events_open = true;

    loop {
        tokio::select! {
            biased;

            event = events.recv(), if events_open => match event {
                Some(event) => manager.handle_event(event),
                None => {
                    tracing::debug!("host event channel closed, auto-unbind disabled");
                    events_open = false;
                }
            },

            command = commands.recv() => match command {
                Some(BindingCommand::Dispose { reply }) => {
                    manager.dispose();
                    let _ = reply.send(());
                    break;
                }
                Some(command) => handle_command(&mut manager, command).await,
                None => {
                    manager.dispose();
                    break;
                }
            },
        }
    }

    tracing::debug!("binding service stopped");
}

async fn handle_command(manager: &mut BindingManager, command: BindingCommand) {
    match command {
        BindingCommand::Bind { kind, reply } => {
            let _ = reply.send(manager.bind(kind).await);
        }
        BindingCommand::BindRequest { request, reply } => {
            let _ = reply.send(manager.bind_request(request).await);
        }
        BindingCommand::Unbind { reply } => {
            manager.unbind();
            let _ = reply.send(());
        }
        BindingCommand::IsBound { reply } => {
            let _ = reply.send(manager.is_bound());
        }
        BindingCommand::BoundDestination { reply } => {
            let _ = reply.send(manager.bound_destination().cloned());
        }
        BindingCommand::Send {
            text,
            paste_kind,
            reply,
        } => {
            let _ = reply.send(manager.send(&text, paste_kind).await);
        }
        // Handled by the loop before dispatch.
        BindingCommand::Dispose { reply } => {
            manager.dispose();
            let _ = reply.send(());
        }
    }
}

impl BindingHandle {
    pub async fn bind(&self, kind: DestinationKind) -> bool {
        self.call(|reply| BindingCommand::Bind { kind, reply })
            .await
            .unwrap_or(false)
    }

    pub async fn bind_request(&self, request: BindRequest) -> bool {
        self.call(|reply| BindingCommand::BindRequest { request, reply })
            .await
            .unwrap_or(false)
    }

    pub async fn unbind(&self) {
        let _ = self.call(|reply| BindingCommand::Unbind { reply }).await;
    }

    pub async fn is_bound(&self) -> bool {
        self.call(|reply| BindingCommand::IsBound { reply })
            .await
            .unwrap_or(false)
    }

    pub async fn bound_destination(&self) -> Option<Destination> {
        self.call(|reply| BindingCommand::BoundDestination { reply })
            .await
            .flatten()
    }

    pub async fn send_to_destination(&self, text: impl Into<String>) -> bool {
        self.send(text.into(), PasteKind::Content).await
    }

    pub async fn send_link(&self, link: impl Into<String>) -> bool {
        self.send(link.into(), PasteKind::Link).await
    }

    /// Stop the loop and wait until it has released the binding.
    pub async fn dispose(&self) {
        let _ = self.call(|reply| BindingCommand::Dispose { reply }).await;
    }

    async fn send(&self, text: String, paste_kind: PasteKind) -> bool {
        self.call(|reply| BindingCommand::Send {
            text,
            paste_kind,
            reply,
        })
        .await
        .unwrap_or(false)
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> BindingCommand,
    ) -> Option<T> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(command(reply)).is_err() {
            tracing::debug!("binding service gone");
            return None;
        }
        rx.await.ok()
    }
}
