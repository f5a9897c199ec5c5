use crate::errors::StationError;
use crate::service::{RemoteTaskService, Session};
use crate::types::Task;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Completion of a remote call, delivered back to the event loop. Only the
/// main loop mutates the store; workers never touch shared state directly.
#[derive(Debug)]
pub enum ServiceEvent {
    Listed {
        generation: u64,
        result: Result<Vec<Task>, StationError>,
    },
    Added {
        url: String,
        result: Result<(), StationError>,
    },
    Deleted {
        id: String,
        result: Result<(), StationError>,
    },
}

pub type ServiceSender = UnboundedSender<ServiceEvent>;
pub type ServiceReceiver = UnboundedReceiver<ServiceEvent>;

pub fn service_channel() -> (ServiceSender, ServiceReceiver) {
    unbounded_channel()
}

/// Runs remote calls on one thread per outstanding call. Send failures are
/// ignored: they only occur when the event loop already shut down.
#[derive(Clone)]
pub struct ServiceWorker {
    service: Arc<dyn RemoteTaskService>,
    session: Session,
    tx: ServiceSender,
}

impl ServiceWorker {
    pub fn new(service: Arc<dyn RemoteTaskService>, session: Session, tx: ServiceSender) -> Self {
        Self {
            service,
            session,
            tx,
        }
    }

    pub fn spawn_list(&self, generation: u64) {
        let worker = self.clone();
        std::thread::spawn(move || {
            let result = worker.service.list(&worker.session);
            let _ = worker.tx.send(ServiceEvent::Listed { generation, result });
        });
    }

    pub fn spawn_add(&self, url: String) {
        let worker = self.clone();
        std::thread::spawn(move || {
            let result = worker.service.add(&worker.session, &url);
            let _ = worker.tx.send(ServiceEvent::Added { url, result });
        });
    }

    pub fn spawn_delete(&self, id: String) {
        let worker = self.clone();
        std::thread::spawn(move || {
            let result = worker.service.delete(&worker.session, &id);
            let _ = worker.tx.send(ServiceEvent::Deleted { id, result });
        });
    }
}
