//! Transport module
//! 
//! This module connects a byte stream to the protocol: the reader task feeds
//! incoming bytes through the frame decoder into the frame queue, and
//! [`attach`] splits a duplex stream into that task plus a controller owning
//! the write half.

pub mod serial;

pub use self::serial::open_serial;

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, WriteHalf};
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tracing::{debug, trace};

use crate::core::Result;
use crate::dispatch::Dispatcher;
use crate::protocol::FirmataCodec;
use crate::sync::{frame_queue, FrameSender, SyncConfig, SyncController};

/// Decodes frames from `reader` and pushes them onto the queue.
///
/// Returns `Ok(())` at end of stream or once the consumer is gone, and the
/// read error otherwise. Either way the sender is dropped, which the
/// controller observes as a closed queue.
pub async fn read_frames<R>(reader: R, frames: FrameSender) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut stream = FramedRead::new(reader, FirmataCodec::new());
    while let Some(frame) = stream.next().await {
        let frame = frame?;
        trace!(%frame, "decoded frame");
        if frames.push(frame).is_err() {
            debug!("frame queue closed, stopping reader");
            return Ok(());
        }
    }
    debug!("transport reached end of stream");
    Ok(())
}

/// Spawns [`read_frames`] on the runtime
pub fn spawn_reader<R>(reader: R, frames: FrameSender) -> JoinHandle<Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(read_frames(reader, frames))
}

/// Wires a duplex stream to a new controller and a running reader task
pub fn attach<T>(
    io: T,
    dispatcher: Dispatcher,
    config: SyncConfig,
) -> (SyncController<WriteHalf<T>>, JoinHandle<Result<()>>)
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(io);
    let (tx, rx) = frame_queue();
    let reader = spawn_reader(read_half, tx);
    (SyncController::new(write_half, rx, dispatcher, config), reader)
}
