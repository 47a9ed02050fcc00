use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::dispatch::FrameDispatcher;
use crate::gesture::DetectionFrame;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

use super::loop_worker::frame_loop;

/// Frames queued behind one still being processed.
const FRAME_QUEUE_DEPTH: usize = 64;

/// Handle for queueing frames without holding the controller.
#[derive(Clone)]
pub struct FrameSender(mpsc::Sender<DetectionFrame>);

impl FrameSender {
    pub async fn send(&self, frame: DetectionFrame) -> Result<()> {
        self.0
            .send(frame)
            .await
            .context("frame loop is no longer running")
    }
}

struct ActiveStream {
    id: Uuid,
    sender: mpsc::Sender<DetectionFrame>,
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the frame-processing loop of the current camera stream.
///
/// Starting a stream always tears the previous one down first, so two camera
/// pipelines never feed the dispatcher at the same time.
pub struct FrameStreamController {
    dispatcher: Arc<FrameDispatcher>,
    active: Option<ActiveStream>,
}

impl FrameStreamController {
    pub fn new(dispatcher: Arc<FrameDispatcher>) -> Self {
        Self {
            dispatcher,
            active: None,
        }
    }

    pub fn current_stream(&self) -> Option<Uuid> {
        self.active.as_ref().map(|stream| stream.id)
    }

    pub async fn start_stream(&mut self) -> Result<Uuid> {
        if self.active.is_some() {
            log_info!("replacing active camera stream");
            self.stop_stream().await?;
        }

        let id = Uuid::new_v4();
        let cancel_token = CancellationToken::new();
        let (sender, receiver) = mpsc::channel(FRAME_QUEUE_DEPTH);

        let handle = tokio::spawn(frame_loop(
            id,
            receiver,
            self.dispatcher.clone(),
            cancel_token.clone(),
        ));

        self.active = Some(ActiveStream {
            id,
            sender,
            cancel_token,
            handle,
        });
        log_info!("camera stream {id} started");
        Ok(id)
    }

    /// Sender for the active stream. Callers tagged with an older stream id
    /// are rejected.
    pub fn frame_sender(&self, stream_id: Uuid) -> Result<FrameSender> {
        let Some(stream) = self.active.as_ref() else {
            bail!("no active camera stream");
        };
        if stream.id != stream_id {
            log_warn!("dropping frame from stale stream {stream_id}");
            bail!("stream {stream_id} is no longer active");
        }
        Ok(FrameSender(stream.sender.clone()))
    }

    pub async fn submit(&self, stream_id: Uuid, frame: DetectionFrame) -> Result<()> {
        self.frame_sender(stream_id)?.send(frame).await
    }

    pub async fn stop_stream(&mut self) -> Result<()> {
        let Some(stream) = self.active.take() else {
            return Ok(());
        };

        stream.cancel_token.cancel();
        drop(stream.sender);
        stream
            .handle
            .await
            .context("frame loop task failed to join")?;
        log_info!("camera stream {} stopped", stream.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::context::testing::context;
    use crate::gesture::DetectionFrame;
    use crate::timer::SessionPhase;

    fn face() -> DetectionFrame {
        DetectionFrame {
            face_detected: true,
            hands: Vec::new(),
        }
    }

    #[tokio::test]
    async fn frames_reach_the_dispatcher() {
        let (core, _) = context();
        let mut streams = core.streams.lock().await;
        let id = streams.start_stream().await.unwrap();

        streams.submit(id, face()).await.unwrap();
        for _ in 0..100 {
            if core.dispatcher.is_present().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(core.dispatcher.is_present().await);
        assert_eq!(core.timer.snapshot().await.phase, SessionPhase::Running);

        streams.stop_stream().await.unwrap();
    }

    #[tokio::test]
    async fn new_stream_replaces_the_old_one() {
        let (core, _) = context();
        let mut streams = core.streams.lock().await;

        let first = streams.start_stream().await.unwrap();
        let stale_sender = streams.frame_sender(first).unwrap();
        let second = streams.start_stream().await.unwrap();

        assert_ne!(first, second);
        assert_eq!(streams.current_stream(), Some(second));
        assert!(streams.submit(first, face()).await.is_err());
        // The old loop is gone, so a sender captured earlier cannot feed it.
        assert!(stale_sender.send(face()).await.is_err());
        assert!(streams.submit(second, face()).await.is_ok());
    }

    #[tokio::test]
    async fn stopping_without_a_stream_is_fine() {
        let (core, _) = context();
        let mut streams = core.streams.lock().await;
        streams.stop_stream().await.unwrap();

        let id = streams.start_stream().await.unwrap();
        streams.stop_stream().await.unwrap();
        assert!(streams.current_stream().is_none());
        assert!(streams.submit(id, face()).await.is_err());
    }
}
