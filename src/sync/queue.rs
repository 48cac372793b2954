use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::core::{Error, Result};
use crate::protocol::Frame;

/// Creates the frame queue shared by the reader task and the controller
pub fn frame_queue() -> (FrameSender, FrameReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FrameSender { tx }, FrameReceiver { rx })
}

/// Producer half, owned by the reader
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: mpsc::UnboundedSender<Frame>,
}

impl FrameSender {
    /// Pushes a frame; fails only once the receiver is gone
    pub fn push(&self, frame: Frame) -> Result<()> {
        self.tx.send(frame).map_err(|_| Error::ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the controller
///
/// Pops distinguish "nothing yet" (`Ok(None)`) from "producer gone"
/// (`Err(Error::ChannelClosed)`).
#[derive(Debug)]
pub struct FrameReceiver {
    rx: mpsc::UnboundedReceiver<Frame>,
}

impl FrameReceiver {
    /// Takes the next frame if one is queued
    pub fn try_pop(&mut self) -> Result<Option<Frame>> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::ChannelClosed),
        }
    }

    /// Waits up to `timeout` for the next frame
    pub async fn pop_timeout(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => Err(Error::ChannelClosed),
            Err(_elapsed) => Ok(None),
        }
    }

    /// Discards every queued frame, returning how many were dropped
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}
