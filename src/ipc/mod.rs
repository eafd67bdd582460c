//! Cross-context message channel between the page agent and the
//! background collaborator.
//!
//! The page side only ever sees [`RuntimeClient`]; the collaborator side
//! drains [`BackgroundServer`] with a [`MessageHandler`].

mod client;
mod server;
mod types;

use tokio::sync::mpsc;

pub use client::RuntimeClient;
pub use server::{BackgroundServer, MessageHandler};
pub use types::{IpcError, RuntimeCommand, RuntimeRequest, SummaryResult};

const IPC_BUFFER: usize = 16;

pub struct IpcLayer;

impl IpcLayer {
    pub fn new() -> (RuntimeClient, BackgroundServer) {
        let (sender, receiver) = mpsc::channel(IPC_BUFFER);
        (RuntimeClient::new(sender), BackgroundServer::new(receiver))
    }
}
