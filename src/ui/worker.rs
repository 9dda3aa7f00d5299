//! Background runs for the TUI
//!
//! A run executes on its own thread so the event loop keeps drawing while a
//! long or non-terminating program spins. Output travels back as byte chunks
//! over a bounded channel: while the UI keeps up each byte is sent at once,
//! and once the channel fills the worker batches bytes and then blocks, so a
//! fast program is paced by the UI instead of piling up memory. The final
//! outcome follows as the last event. Dropping a [`RunHandle`] cancels the
//! run and joins the thread.

use crate::interpreter::config::RunConfig;
use crate::interpreter::engine::{Interpreter, RunStats};
use crate::interpreter::errors::ExecutionError;
use crate::interpreter::io::{ByteInput, OutputSink, SinkError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Events the channel holds before the worker has to wait for the UI
pub const CHANNEL_CAPACITY: usize = 64;

/// Largest output chunk the worker sends in one event
pub const CHUNK_BYTES: usize = 4096;

/// Most events a single [`RunHandle::drain`] hands to the UI
pub const MAX_EVENTS_PER_DRAIN: usize = 64;

/// Messages sent from the worker thread to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Output(Vec<u8>),
    Finished(Result<RunStats, ExecutionError>),
}

/// Sink that forwards output as chunks, batching while the channel is full
struct ChunkSink {
    tx: SyncSender<WorkerEvent>,
    pending: Vec<u8>,
}

impl ChunkSink {
    /// Send whatever is pending, waiting for room if necessary.
    fn flush(&mut self) -> Result<(), SinkError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::take(&mut self.pending);
        self.tx
            .send(WorkerEvent::Output(chunk))
            .map_err(|_| SinkError::new("output channel closed"))
    }
}

impl OutputSink for ChunkSink {
    fn emit(&mut self, byte: u8) -> Result<(), SinkError> {
        self.pending.push(byte);
        if self.pending.len() >= CHUNK_BYTES {
            return self.flush();
        }

        let chunk = std::mem::take(&mut self.pending);
        match self.tx.try_send(WorkerEvent::Output(chunk)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                if let WorkerEvent::Output(chunk) = event {
                    self.pending = chunk;
                }
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(SinkError::new("output channel closed")),
        }
    }
}

/// Handle to a run executing on a worker thread
pub struct RunHandle {
    /// Taken on drop so a worker blocked on a full channel wakes up
    events: Option<Receiver<WorkerEvent>>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl RunHandle {
    /// Start running `source` with `input` feeding `,`.
    ///
    /// The cancellation flag of `config` is replaced by one owned by the handle.
    pub fn spawn(source: String, input: Vec<u8>, config: RunConfig) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let config = config.with_cancel(Arc::clone(&cancel));
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);

        let thread = thread::spawn(move || {
            let interpreter = Interpreter::new(config);
            let mut input = ByteInput::new(input);
            let mut sink = ChunkSink {
                tx: tx.clone(),
                pending: Vec::new(),
            };
            let result = interpreter.run(&source, &mut sink, Some(&mut input));
            // Both sends fail only once the UI has dropped the receiver
            let _ = sink.flush();
            let _ = tx.send(WorkerEvent::Finished(result));
        });

        RunHandle {
            events: Some(rx),
            cancel,
            thread: Some(thread),
        }
    }

    /// Ask the run to stop before its next instruction.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Collect up to [`MAX_EVENTS_PER_DRAIN`] queued events without blocking.
    pub fn drain(&self) -> Vec<WorkerEvent> {
        match &self.events {
            Some(events) => events.try_iter().take(MAX_EVENTS_PER_DRAIN).collect(),
            None => Vec::new(),
        }
    }

    /// Block until the run ends, returning every remaining event.
    pub fn wait(mut self) -> Vec<WorkerEvent> {
        let events = match self.events.take() {
            Some(events) => events.iter().collect(),
            None => Vec::new(),
        };
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        events
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel();
        // A send blocked on the full channel fails once the receiver is gone
        self.events = None;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_streams_output_then_finishes() {
        let handle = RunHandle::spawn("+++.>++.".to_string(), Vec::new(), RunConfig::default());
        let events = handle.wait();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], WorkerEvent::Output(vec![3]));
        assert_eq!(events[1], WorkerEvent::Output(vec![2]));
        assert!(matches!(events[2], WorkerEvent::Finished(Ok(_))));
    }

    #[test]
    fn test_input_reaches_program() {
        let handle = RunHandle::spawn(",+.".to_string(), b"a".to_vec(), RunConfig::default());
        let events = handle.wait();
        assert_eq!(events[0], WorkerEvent::Output(vec![b'b']));
    }

    #[test]
    fn test_cancel_stops_infinite_loop() {
        let config = RunConfig::default().with_max_steps(None);
        let handle = RunHandle::spawn("+[]".to_string(), Vec::new(), config);
        thread::sleep(Duration::from_millis(20));
        handle.cancel();
        let events = handle.wait();
        assert!(matches!(
            events.last(),
            Some(WorkerEvent::Finished(Err(ExecutionError::Cancelled { .. })))
        ));
    }

    #[test]
    fn test_fast_output_stays_bounded() {
        let handle = RunHandle::spawn("+[.]".to_string(), Vec::new(), RunConfig::default());
        thread::sleep(Duration::from_millis(200));

        let started = Instant::now();
        let events = handle.drain();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(!events.is_empty());
        assert!(events.len() <= MAX_EVENTS_PER_DRAIN);
        for event in &events {
            if let WorkerEvent::Output(chunk) = event {
                assert!(chunk.len() <= CHUNK_BYTES);
            }
        }

        // Only what fits in the channel, one blocked send, the final flush
        // and the outcome remain
        handle.cancel();
        let rest = handle.wait();
        assert!(rest.len() <= CHANNEL_CAPACITY + 3);
        assert!(matches!(
            rest.last(),
            Some(WorkerEvent::Finished(Err(ExecutionError::Cancelled { .. })))
        ));
    }

    #[test]
    fn test_single_byte_arrives_while_program_spins() {
        let config = RunConfig::default().with_max_steps(None);
        let handle = RunHandle::spawn("+.[]".to_string(), Vec::new(), config);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(handle.drain(), vec![WorkerEvent::Output(vec![1])]);
    }

    #[test]
    fn test_drop_with_full_channel_does_not_hang() {
        let handle = RunHandle::spawn("+[.]".to_string(), Vec::new(), RunConfig::default());
        thread::sleep(Duration::from_millis(50));
        drop(handle);
    }
}
