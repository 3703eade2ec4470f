use crossbeam_channel::{Receiver, Sender};
use std::time::Duration;

use crate::election::event::RawEvent;
use crate::errors::{new_err, ElectError};

/// Event delivered by an external producer together with its completion channel.
/// The producer stays blocked until the node signals completion.
#[derive(Debug)]
pub struct InboundMessage {
    pub event: RawEvent,
    completion_tx: Sender<()>,
}

impl InboundMessage {
    pub fn new(event: RawEvent, completion_tx: Sender<()>) -> InboundMessage {
        InboundMessage {
            event,
            completion_tx,
        }
    }

    /// Signals the producer that the event was processed.
    pub fn complete(self) {
        if self.completion_tx.send(()).is_err() {
            trace!("Producer gone before completion of {}", self.event);
        }
    }
}

/// Bounded single-consumer queue of the node's inbound events.
#[derive(Clone, Debug)]
pub struct EventQueue {
    name: String,
    timeout_duration: Duration,
    inbound_tx: Sender<InboundMessage>,
    inbound_rx: Receiver<InboundMessage>,
}

impl EventQueue {
    /// Creates new EventQueue with the name, capacity and timeout on delivery and completion.
    pub fn new(name: String, capacity: usize, timeout_duration: Duration) -> EventQueue {
        let (inbound_tx, inbound_rx): (Sender<InboundMessage>, Receiver<InboundMessage>) =
            crossbeam_channel::bounded(capacity);

        EventQueue {
            name,
            timeout_duration,
            inbound_tx,
            inbound_rx,
        }
    }

    pub fn inbound_rx(&self) -> Receiver<InboundMessage> {
        self.inbound_rx.clone()
    }

    /// Enqueues the event and waits for the node to complete it.
    pub fn deliver(&self, event: RawEvent) -> Result<(), ElectError> {
        let (completion_tx, completion_rx) = crossbeam_channel::bounded(1);

        let message = InboundMessage::new(event, completion_tx);
        let send_result = self.inbound_tx.send_timeout(message, self.timeout_duration);
        if let Err(err) = send_result {
            return new_err(
                format!("Cannot deliver event. Queue : {}", self.name),
                err.to_string(),
            );
        }

        let completion_result = completion_rx.recv_timeout(self.timeout_duration);
        if let Err(err) = completion_result {
            return new_err(
                format!("Event not completed. Queue : {}", self.name),
                err.to_string(),
            );
        }

        Ok(())
    }
}
