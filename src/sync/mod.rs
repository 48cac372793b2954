//! Synchronization module
//! 
//! This module holds the frame queue between the reader and the controller,
//! and the controller that performs the connect-time handshake and then
//! dispatches frames in arrival order.

pub mod controller;
pub mod queue;

pub use self::controller::{SyncConfig, SyncController, SyncOutcome, SyncState, SyncTimeoutPolicy};
pub use self::queue::{frame_queue, FrameReceiver, FrameSender};
