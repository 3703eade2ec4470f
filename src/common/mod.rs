use crossbeam_channel::{Receiver, Sender};
use std::thread;
use std::thread::JoinHandle;

/// Running worker thread with its termination channel.
#[derive(Debug)]
pub struct ElectWorker {
    pub join_handle: JoinHandle<()>,
    pub terminate_worker_tx: Sender<()>,
}

impl ElectWorker {
    pub fn terminate(&self) {
        if self.terminate_worker_tx.send(()).is_err() {
            error!("Cannot send termination signal")
        }
    }
}

pub fn run_worker<T: Send + 'static, F: Fn(T, Receiver<()>) + Send + 'static>(
    worker: F,
    params: T,
) -> ElectWorker {
    let (terminate_worker_tx, terminate_worker_rx): (Sender<()>, Receiver<()>) =
        crossbeam_channel::unbounded();

    let join_handle = thread::spawn(move || worker(params, terminate_worker_rx));

    ElectWorker {
        join_handle,
        terminate_worker_tx,
    }
}

#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<ElectWorker>,
}

impl WorkerPool {
    pub fn new(workers: Vec<ElectWorker>) -> WorkerPool {
        WorkerPool { workers }
    }

    pub fn push(&mut self, worker: ElectWorker) {
        self.workers.push(worker);
    }

    pub fn terminate(&self) {
        for worker in &self.workers {
            worker.terminate();
        }
    }

    pub fn join(self) {
        for worker in self.workers {
            let join_result = worker.join_handle.join();
            if join_result.is_err() {
                error!("Worker returned an error")
            }
        }
    }
}
