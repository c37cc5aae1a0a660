use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Outcome of offering a frame to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Accepted,
    /// The queue was full; the oldest queued frame was discarded to make room.
    DroppedOldest,
    /// The queue is closed; the frame was not accepted.
    Closed,
}

struct Inner {
    frames: VecDeque<Vec<u8>>,
    closed: bool,
    dropped: u64,
}

/// Bounded per-session audio frame queue.
///
/// `push` never blocks beyond the lock: on overflow the oldest frame is
/// dropped so the newest audio survives. `pop` suspends until a frame
/// arrives or the queue is closed and drained.
pub struct FrameQueue {
    inner: Mutex<Inner>,
    notify: Notify,
    capacity: usize,
}

impl FrameQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                frames: VecDeque::new(),
                closed: false,
                dropped: 0,
            }),
            notify: Notify::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, frame: Vec<u8>) -> PushOutcome {
        let outcome = {
            let mut inner = self.inner.lock().unwrap();
            if inner.closed {
                return PushOutcome::Closed;
            }
            let outcome = if inner.frames.len() >= self.capacity {
                inner.frames.pop_front();
                inner.dropped += 1;
                PushOutcome::DroppedOldest
            } else {
                PushOutcome::Accepted
            };
            inner.frames.push_back(frame);
            outcome
        };
        self.notify.notify_one();
        outcome
    }

    /// Next frame, or `None` once the queue is closed and fully drained.
    pub async fn pop(&self) -> Option<Vec<u8>> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(frame) = inner.frames.pop_front() {
                    return Some(frame);
                }
                if inner.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Close the queue. Idempotent; queued frames remain poppable.
    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
        self.notify.notify_waiters();
        self.notify.notify_one();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total frames discarded by the drop-oldest policy.
    pub fn dropped(&self) -> u64 {
        self.inner.lock().unwrap().dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_push_pop_preserves_order() {
        let queue = FrameQueue::new(8);
        queue.push(vec![1]);
        queue.push(vec![2]);
        queue.push(vec![3]);
        assert_eq!(queue.pop().await, Some(vec![1]));
        assert_eq!(queue.pop().await, Some(vec![2]));
        assert_eq!(queue.pop().await, Some(vec![3]));
    }

    #[tokio::test]
    async fn test_queue_overflow_drops_oldest() {
        let queue = FrameQueue::new(2);
        assert_eq!(queue.push(vec![1]), PushOutcome::Accepted);
        assert_eq!(queue.push(vec![2]), PushOutcome::Accepted);
        assert_eq!(queue.push(vec![3]), PushOutcome::DroppedOldest);
        assert_eq!(queue.dropped(), 1);
        // Oldest frame is gone; newest survived
        assert_eq!(queue.pop().await, Some(vec![2]));
        assert_eq!(queue.pop().await, Some(vec![3]));
    }

    #[tokio::test]
    async fn test_queue_close_rejects_push() {
        let queue = FrameQueue::new(4);
        queue.close();
        assert_eq!(queue.push(vec![1]), PushOutcome::Closed);
    }

    #[tokio::test]
    async fn test_queue_close_drains_then_none() {
        let queue = FrameQueue::new(4);
        queue.push(vec![1]);
        queue.close();
        assert_eq!(queue.pop().await, Some(vec![1]));
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn test_queue_close_is_idempotent() {
        let queue = FrameQueue::new(4);
        queue.close();
        queue.close();
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn test_queue_pop_wakes_on_push() {
        let queue = std::sync::Arc::new(FrameQueue::new(4));
        let popper = {
            let queue = std::sync::Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::task::yield_now().await;
        queue.push(vec![9]);
        let frame = tokio::time::timeout(std::time::Duration::from_secs(2), popper)
            .await
            .expect("pop timed out")
            .unwrap();
        assert_eq!(frame, Some(vec![9]));
    }

    #[tokio::test]
    async fn test_queue_pop_wakes_on_close() {
        let queue = std::sync::Arc::new(FrameQueue::new(4));
        let popper = {
            let queue = std::sync::Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::task::yield_now().await;
        queue.close();
        let frame = tokio::time::timeout(std::time::Duration::from_secs(2), popper)
            .await
            .expect("pop timed out")
            .unwrap();
        assert_eq!(frame, None);
    }

    #[test]
    fn test_queue_zero_capacity_clamped() {
        let queue = FrameQueue::new(0);
        assert_eq!(queue.push(vec![1]), PushOutcome::Accepted);
        assert_eq!(queue.push(vec![2]), PushOutcome::DroppedOldest);
    }
}
