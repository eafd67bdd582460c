use tokio::sync::{mpsc, oneshot};

use super::types::{IpcError, RuntimeCommand, RuntimeRequest, SummaryResult};

/// Page-side end of the runtime channel.
///
/// No timeout is applied; the collaborator always answers or drops the
/// responder.
#[derive(Clone)]
pub struct RuntimeClient {
    sender: mpsc::Sender<RuntimeCommand>,
}

impl RuntimeClient {
    pub fn new(sender: mpsc::Sender<RuntimeCommand>) -> Self {
        Self { sender }
    }

    pub async fn send_message(&self, request: RuntimeRequest) -> Result<SummaryResult, IpcError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(RuntimeCommand::Message {
                request,
                respond_to,
            })
            .await
            .map_err(|_| IpcError::Disconnected)?;

        receiver.await.map_err(|_| IpcError::Disconnected)
    }

    pub async fn summarize(&self, text: String) -> Result<SummaryResult, IpcError> {
        self.send_message(RuntimeRequest::Summarize { text }).await
    }
}
