//! Background request threads.
//!
//! Each request runs on its own thread and reports back over a one-shot
//! channel that the UI thread polls every frame.

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use super::client::{RankingBoard, ScoreService};
use super::types::SubmitPayload;

/// Shared handle to the score service, usable from worker threads.
pub type SharedService = Arc<dyn ScoreService + Send + Sync>;

/// Poll result of an in-flight request.
#[derive(Debug, PartialEq)]
pub enum RequestState<T> {
    Waiting,
    Done(T),
    /// The worker exited without answering.
    Lost,
}

/// A request running on a worker thread.
pub struct PendingRequest<T> {
    label: &'static str,
    receiver: Receiver<T>,
}

impl<T> PendingRequest<T> {
    /// Non-blocking check for the result.
    pub fn poll(&self) -> RequestState<T> {
        match self.receiver.try_recv() {
            Ok(value) => RequestState::Done(value),
            Err(TryRecvError::Empty) => RequestState::Waiting,
            Err(TryRecvError::Disconnected) => {
                crate::log(&format!("Worker '{}' exited without a result", self.label));
                RequestState::Lost
            }
        }
    }
}

/// Runs `job` on a new named thread.
pub fn spawn_request<T, F>(label: &'static str, job: F) -> PendingRequest<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = channel();

    let spawned = thread::Builder::new()
        .name(format!("api-{}", label))
        .spawn(move || {
            // The UI may have moved on and dropped the receiver
            let _ = sender.send(job());
        });
    if let Err(e) = spawned {
        crate::log(&format!("Failed to spawn worker '{}': {}", label, e));
    }

    PendingRequest { label, receiver }
}

pub fn request_play_count(
    service: &SharedService,
    company: &str,
    employee_id: &str,
) -> PendingRequest<u32> {
    let service = Arc::clone(service);
    let (company, employee_id) = (company.to_string(), employee_id.to_string());
    spawn_request("playCount", move || service.play_count(&company, &employee_id))
}

pub fn request_ranking(service: &SharedService) -> PendingRequest<RankingBoard> {
    let service = Arc::clone(service);
    spawn_request("ranking", move || service.ranking())
}

/// Posts the payload; failures are logged on the worker and reported as `false`.
pub fn request_submit(service: &SharedService, payload: SubmitPayload) -> PendingRequest<bool> {
    let service = Arc::clone(service);
    spawn_request("submit", move || match service.submit(&payload) {
        Ok(()) => {
            crate::log(&format!(
                "Submitted session: {}s, {}%",
                payload.time_taken, payload.accuracy
            ));
            true
        }
        Err(e) => {
            crate::log(&format!("Session submit failed: {}", e));
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait<T>(pending: &PendingRequest<T>) -> RequestState<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match pending.poll() {
                RequestState::Waiting if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                other => return other,
            }
        }
    }

    #[test]
    fn test_spawn_request_delivers_result() {
        let pending = spawn_request("test", || 41 + 1);
        assert_eq!(wait(&pending), RequestState::Done(42));
    }

    #[test]
    fn test_panicking_worker_is_lost() {
        let pending: PendingRequest<u32> = spawn_request("panics", || panic!("boom"));
        assert_eq!(wait(&pending), RequestState::Lost);
    }

    #[test]
    fn test_result_is_taken_once() {
        let pending = spawn_request("once", || "done");
        assert_eq!(wait(&pending), RequestState::Done("done"));
        assert_eq!(pending.poll(), RequestState::Lost);
    }
}
