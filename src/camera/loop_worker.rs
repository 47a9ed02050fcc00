use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::dispatch::FrameDispatcher;
use crate::gesture::DetectionFrame;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

const FRAME_LOG_EVERY: u64 = 300;

/// Drains one camera stream's frames into the dispatcher, one at a time and in
/// delivery order, until the stream is cancelled or its sender goes away.
pub async fn frame_loop(
    stream_id: Uuid,
    mut frames: mpsc::Receiver<DetectionFrame>,
    dispatcher: Arc<FrameDispatcher>,
    cancel_token: CancellationToken,
) {
    let mut gestures = dispatcher.stream_gestures();
    let mut processed: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("frame loop for stream {stream_id} shutting down after {processed} frames");
                break;
            }
            frame = frames.recv() => {
                let Some(frame) = frame else {
                    log_info!("frame channel for stream {stream_id} closed");
                    break;
                };

                dispatcher
                    .process_frame(&frame, &mut gestures, Instant::now(), &cancel_token)
                    .await;

                processed += 1;
                if processed % FRAME_LOG_EVERY == 0 {
                    log_debug!("stream {stream_id}: {processed} frames processed");
                }
            }
        }
    }
}
