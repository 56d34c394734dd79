//! Wake-up feeds for the post-event runner.

use async_trait::async_trait;
use tokio::sync::mpsc;

use nearby_core::result::AppResult;
use nearby_core::types::PostId;
use nearby_database::PostCreatedListener;

/// Something that tells the runner a post was just created.
///
/// A wake-up carries no work of its own: the runner always claims from
/// the outbox, so a lost wake-up only delays a dispatch until the next
/// poll.
#[async_trait]
pub trait PostEventSource: Send {
    /// Wait for the next wake-up. `Ok(None)` means the feed is closed.
    async fn next_wakeup(&mut self) -> AppResult<Option<PostId>>;
}

#[async_trait]
impl PostEventSource for PostCreatedListener {
    async fn next_wakeup(&mut self) -> AppResult<Option<PostId>> {
        self.next_post_id().await.map(Some)
    }
}

/// An in-process feed backed by an mpsc channel.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<PostId>,
}

impl ChannelSource {
    /// Create a feed and the sender that publishes into it.
    pub fn new(capacity: usize) -> (mpsc::Sender<PostId>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }
}

#[async_trait]
impl PostEventSource for ChannelSource {
    async fn next_wakeup(&mut self) -> AppResult<Option<PostId>> {
        Ok(self.rx.recv().await)
    }
}
