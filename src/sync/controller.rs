use std::time::Duration;

use futures::SinkExt;
use serde::{Serialize, Deserialize};
use tokio::io::AsyncWrite;
use tokio::time::Instant;
use tokio_util::codec::FramedWrite;
use tracing::{debug, info, trace, warn};

use crate::core::{Error, Result};
use crate::dispatch::{Dispatcher, Route};
use crate::protocol::constants::sysex::ANALOG_MAPPING_RESPONSE;
use crate::protocol::{FirmataCodec, Request};
use super::queue::FrameReceiver;

/// What to do when the handshake deadline passes without a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTimeoutPolicy {
    /// Log a warning and enter the receive loop unsynchronized
    Proceed,
    /// Fail with [`Error::SyncTimeout`]
    Abort,
}

/// Configuration for the handshake and the receive loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Sampling interval sent in every sync burst, in milliseconds
    pub sampling_interval: u16,
    /// Time between sync bursts while no response has arrived
    #[serde(serialize_with = "crate::core::serde::serialize_duration")]
    #[serde(deserialize_with = "crate::core::serde::deserialize_duration")]
    pub retry_interval: Duration,
    /// Overall handshake deadline
    #[serde(serialize_with = "crate::core::serde::serialize_duration")]
    #[serde(deserialize_with = "crate::core::serde::deserialize_duration")]
    pub handshake_timeout: Duration,
    /// Per-pop wait in the receive loop
    #[serde(serialize_with = "crate::core::serde::serialize_duration")]
    #[serde(deserialize_with = "crate::core::serde::deserialize_duration")]
    pub poll_timeout: Duration,
    /// Behaviour after an unanswered handshake
    pub on_timeout: SyncTimeoutPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            sampling_interval: 500,
            retry_interval: Duration::from_millis(100),
            handshake_timeout: Duration::from_secs(20),
            poll_timeout: Duration::from_secs(2),
            on_timeout: SyncTimeoutPolicy::Proceed,
        }
    }
}

/// Handshake status; only ever moves from `NotSynced` to `Synced`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotSynced,
    Synced,
}

/// Result of one handshake phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The board answered the analog mapping query
    Synced {
        attempts: u32,
        elapsed: Duration,
    },
    /// The deadline passed first
    TimedOut {
        attempts: u32,
        elapsed: Duration,
    },
}

/// Drives the connect-time handshake, then feeds frames to the dispatcher
///
/// All writes to the board go through this controller, one whole message at a
/// time.
pub struct SyncController<W> {
    /// Outgoing half of the transport
    writer: FramedWrite<W, FirmataCodec>,
    /// Frames produced by the reader task
    frames: FrameReceiver,
    /// Handler tables
    dispatcher: Dispatcher,
    /// Configuration
    config: SyncConfig,
    /// Handshake status
    state: SyncState,
}

impl<W: AsyncWrite + Unpin> SyncController<W> {
    /// Creates a controller writing to `writer` and reading from `frames`
    pub fn new(writer: W, frames: FrameReceiver, dispatcher: Dispatcher, config: SyncConfig) -> Self {
        SyncController {
            writer: FramedWrite::new(writer, FirmataCodec::new()),
            frames,
            dispatcher,
            config,
            state: SyncState::NotSynced,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// The underlying writer
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Writes one message and flushes it
    pub async fn send(&mut self, request: Request) -> Result<()> {
        trace!(?request, "sending");
        self.writer.send(request).await
    }

    async fn send_sync_burst(&mut self) -> Result<()> {
        for request in Request::sync_burst(self.config.sampling_interval) {
            self.writer.feed(request).await?;
        }
        self.writer.flush().await
    }

    /// Runs the handshake until the board answers or the deadline passes.
    ///
    /// Every burst is preceded by a queue drain so only responses to the
    /// current attempt are considered. Frames seen here are not dispatched.
    pub async fn synchronize(&mut self) -> Result<SyncOutcome> {
        let start = Instant::now();
        if self.state == SyncState::Synced {
            return Ok(SyncOutcome::Synced { attempts: 0, elapsed: Duration::ZERO });
        }

        let deadline = start + self.config.handshake_timeout;
        let mut next_burst = start;
        let mut attempts = 0u32;

        loop {
            let now = Instant::now();
            if now >= deadline {
                let elapsed = now - start;
                warn!(attempts, ?elapsed, "no analog mapping response before handshake deadline");
                return Ok(SyncOutcome::TimedOut { attempts, elapsed });
            }

            if now >= next_burst {
                let dropped = self.frames.drain();
                attempts += 1;
                debug!(attempt = attempts, dropped, "sending sync burst");
                self.send_sync_burst().await?;
                next_burst = now + self.config.retry_interval;
            }

            let wait = next_burst.min(deadline).saturating_duration_since(Instant::now());
            match self.frames.pop_timeout(wait).await? {
                Some(frame) if frame.subcommand() == Some(ANALOG_MAPPING_RESPONSE) => {
                    let elapsed = start.elapsed();
                    self.state = SyncState::Synced;
                    info!(attempts, ?elapsed, "board synchronized");
                    self.send(Request::ReportAnalog { pin: 0, enabled: true }).await?;
                    return Ok(SyncOutcome::Synced { attempts, elapsed });
                }
                Some(frame) => trace!(%frame, "ignoring frame during handshake"),
                None => {}
            }
        }
    }

    /// Runs [`synchronize`](Self::synchronize) and applies the timeout policy
    pub async fn handshake(&mut self) -> Result<SyncState> {
        match self.synchronize().await? {
            SyncOutcome::Synced { .. } => Ok(self.state),
            SyncOutcome::TimedOut { attempts, elapsed } => match self.config.on_timeout {
                SyncTimeoutPolicy::Proceed => {
                    warn!("proceeding without synchronization");
                    Ok(self.state)
                }
                SyncTimeoutPolicy::Abort => Err(Error::SyncTimeout { attempts, elapsed }),
            },
        }
    }

    /// Waits one poll interval for a frame and dispatches it.
    ///
    /// `Ok(None)` is a liveness tick; a closed queue is an error.
    pub async fn poll_once(&mut self) -> Result<Option<Route>> {
        match self.frames.pop_timeout(self.config.poll_timeout).await? {
            Some(frame) => Ok(Some(self.dispatcher.dispatch(&frame))),
            None => {
                trace!("no frame within poll timeout");
                Ok(None)
            }
        }
    }

    /// Handshake followed by the receive loop; returns only on error
    pub async fn run(&mut self) -> Result<()> {
        self.handshake().await?;
        loop {
            self.poll_once().await?;
        }
    }
}
