//! Background image decoding with "latest request wins" semantics.
//!
//! Each request carries a [`LoadTicket`]. Submitting a newer ticket for the same
//! owner supersedes older ones: workers skip superseded requests they have not
//! started, and the owner discards any superseded result that still arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::TerrainError;
use crate::sampler::{SampledImage, sample_image};

/// Identifies one load request: which owner asked, and which of its requests this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    /// Owner of the request (a body id in practice).
    pub owner: u64,
    /// Monotonic per-owner request counter.
    pub generation: u64,
}

/// A finished decode, successful or not.
#[derive(Debug)]
pub struct DecodedImage {
    /// The ticket the request was submitted with.
    pub ticket: LoadTicket,
    /// Decoded, downsampled pixels or the decode error.
    pub result: Result<SampledImage, TerrainError>,
    /// Decode time in microseconds.
    pub decode_time_us: u64,
}

struct LoadRequest {
    ticket: LoadTicket,
    bytes: Vec<u8>,
    max_dim: u32,
}

/// Decodes images on worker threads and hands results back through a channel.
pub struct ImageLoader {
    task_sender: Sender<LoadRequest>,
    result_receiver: Receiver<DecodedImage>,
    latest: Arc<DashMap<u64, u64>>,
    in_flight: Arc<AtomicU64>,
}

impl ImageLoader {
    /// Create a loader with `thread_count` workers and room for `queue_capacity` pending requests.
    pub fn new(thread_count: usize, queue_capacity: usize) -> Self {
        let (task_sender, task_receiver) = bounded::<LoadRequest>(queue_capacity.max(1));
        let (result_sender, result_receiver) = bounded::<DecodedImage>(queue_capacity.max(1));
        let latest: Arc<DashMap<u64, u64>> = Arc::new(DashMap::new());
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let latest = Arc::clone(&latest);
            let in_flight = Arc::clone(&in_flight);

            let spawned = std::thread::Builder::new()
                .name("image-decode-worker".into())
                .spawn(move || {
                    while let Ok(request) = receiver.recv() {
                        let ticket = request.ticket;
                        let current = latest.get(&ticket.owner).map(|g| *g);
                        if current != Some(ticket.generation) {
                            debug!(?ticket, "skipping superseded image request");
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let result = sample_image(&request.bytes, request.max_dim);
                        let decode_time_us = start.elapsed().as_micros() as u64;

                        let _ = sender.send(DecodedImage {
                            ticket,
                            result,
                            decode_time_us,
                        });
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                });
            if let Err(e) = spawned {
                warn!("failed to spawn image decode worker: {e}");
            }
        }

        Self {
            task_sender,
            result_receiver,
            latest,
            in_flight,
        }
    }

    /// A loader with a single worker, which is plenty for interactive image swaps.
    pub fn with_defaults() -> Self {
        Self::new(1, 16)
    }

    /// Queue `bytes` for decoding under `ticket`, superseding earlier tickets of the same owner.
    ///
    /// Returns `Err(ticket)` if the queue is full.
    pub fn submit(&self, ticket: LoadTicket, bytes: Vec<u8>, max_dim: u32) -> Result<(), LoadTicket> {
        self.latest.insert(ticket.owner, ticket.generation);
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        self.task_sender
            .try_send(LoadRequest {
                ticket,
                bytes,
                max_dim,
            })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                e.into_inner().ticket
            })
    }

    /// Mark every pending request of `owner` older than `generation` as superseded.
    ///
    /// Used when the owner changes its mind without submitting new bytes
    /// (a height-mode change while a decode is queued). Never moves an owner back
    /// to an older generation.
    pub fn supersede(&self, owner: u64, generation: u64) {
        if let Some(mut latest) = self.latest.get_mut(&owner) {
            if *latest < generation {
                debug!(owner, from = *latest, to = generation, "superseding queued image requests");
                *latest = generation;
            }
        }
    }

    /// Drop all bookkeeping for `owner`. Its queued requests are skipped.
    pub fn forget(&self, owner: u64) {
        self.latest.remove(&owner);
    }

    /// Newest generation submitted or superseded for `owner`, if it has any.
    pub fn latest_generation(&self, owner: u64) -> Option<u64> {
        self.latest.get(&owner).map(|g| *g)
    }

    /// Drain all finished decodes. Call once per frame on the owning thread.
    pub fn drain_results(&self) -> Vec<DecodedImage> {
        self.result_receiver.try_iter().collect()
    }

    /// Block up to `timeout` for the next finished decode.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<DecodedImage> {
        self.result_receiver.recv_timeout(timeout).ok()
    }

    /// Number of requests queued or decoding.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::with_defaults()
    }
}
