use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

/// Domain events emitted after a custody operation commits.
///
/// Events are fire-and-forget: a full channel or a closed receiver never
/// fails the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ShiftOpened {
        shift_id: Uuid,
        register_id: Uuid,
        user_id: Uuid,
    },
    CountRecorded {
        count_id: Uuid,
        opening_id: Uuid,
        exceeds_threshold: bool,
    },
    TransferCreated {
        transfer_id: Uuid,
        source_register_id: Uuid,
        destination_register_id: Uuid,
    },
    TransferReceived {
        transfer_id: Uuid,
        reception_id: Uuid,
        observed: bool,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of propagating a channel failure.
    /// The triggering state change has already committed at this point.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            error!(?event, "Failed to publish event: {}", e);
        }
    }
}

/// Consumes events from the channel and logs them. Runs until every sender
/// is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ShiftOpened {
                shift_id,
                register_id,
                user_id,
            } => {
                info!(%shift_id, %register_id, %user_id, "Shift opened");
            }
            Event::CountRecorded {
                count_id,
                opening_id,
                exceeds_threshold,
            } => {
                info!(%count_id, %opening_id, exceeds_threshold, "Cash count recorded");
            }
            Event::TransferCreated {
                transfer_id,
                source_register_id,
                destination_register_id,
            } => {
                info!(%transfer_id, %source_register_id, %destination_register_id, "Transfer sent");
            }
            Event::TransferReceived {
                transfer_id,
                reception_id,
                observed,
            } => {
                info!(%transfer_id, %reception_id, observed, "Transfer received");
            }
        }
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let shift_id = Uuid::new_v4();
        sender
            .send(Event::ShiftOpened {
                shift_id,
                register_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            Event::ShiftOpened { shift_id: got, .. } => assert_eq!(got, shift_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        sender
            .send_or_log(Event::TransferCreated {
                transfer_id: Uuid::new_v4(),
                source_register_id: Uuid::new_v4(),
                destination_register_id: Uuid::new_v4(),
            })
            .await;
    }
}
