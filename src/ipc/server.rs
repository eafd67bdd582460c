use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{RuntimeCommand, RuntimeRequest, SummaryResult};

/// Something that answers runtime requests (the background collaborator).
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, request: RuntimeRequest) -> SummaryResult;
}

/// Collaborator-side end of the runtime channel.
pub struct BackgroundServer {
    receiver: mpsc::Receiver<RuntimeCommand>,
}

impl BackgroundServer {
    pub fn new(receiver: mpsc::Receiver<RuntimeCommand>) -> Self {
        Self { receiver }
    }

    /// Serve requests until every client is dropped.
    ///
    /// Each request is handled on its own task so one slow upstream call
    /// does not hold up other pages.
    pub async fn run(mut self, handler: Arc<dyn MessageHandler>) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                RuntimeCommand::Message {
                    request,
                    respond_to,
                } => {
                    let handler = Arc::clone(&handler);
                    tokio::spawn(async move {
                        let result = handler.handle(request).await;
                        if respond_to.send(result).is_err() {
                            tracing::trace!("Runtime response dropped (receiver gone)");
                        }
                    });
                }
            }
        }
        tracing::debug!("Runtime channel closed, background server stopping");
    }
}
