use crate::error::ChannelError;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::trace;

/// A safe default for control traffic, which is rare and small.
pub const DEFAULT_CAPACITY: usize = 64;
const MIN_CAPACITY: usize = 1;

/// One end of a duplex channel.
///
/// Each end owns the buffer of messages travelling towards it; the two
/// directions never block each other.
#[derive(Debug)]
pub struct Channel<T> {
    tx: mpsc::Sender<T>,
    rx: mpsc::Receiver<T>,
    capacity: usize,
}

impl<T: Send + 'static> Channel<T> {
    /// Creates two connected ends, each buffering up to `capacity` messages.
    ///
    /// # Errors
    /// [`ChannelError::InvalidCapacity`] when `capacity` is zero.
    pub fn pair(capacity: usize) -> Result<(Self, Self), ChannelError> {
        if capacity < MIN_CAPACITY {
            return Err(ChannelError::InvalidCapacity {
                message: format!("capacity must be at least {MIN_CAPACITY}, got {capacity}").into(),
                context: None,
            });
        }

        let (to_right, from_left) = mpsc::channel(capacity);
        let (to_left, from_right) = mpsc::channel(capacity);
        trace!(capacity, message = std::any::type_name::<T>(), "Channel pair created");

        Ok((
            Self { tx: to_right, rx: from_right, capacity },
            Self { tx: to_left, rx: from_left, capacity },
        ))
    }

    /// Sends to the peer, waiting while its buffer is full.
    ///
    /// # Errors
    /// [`ChannelError::Closed`] once the peer is gone.
    pub async fn push(&self, message: T) -> Result<(), ChannelError> {
        self.tx.send(message).await.map_err(|_| closed())
    }

    /// Sends to the peer without waiting.
    ///
    /// # Errors
    /// [`ChannelError::Full`] (retryable) when the peer's buffer is full,
    /// [`ChannelError::Closed`] once the peer is gone.
    pub fn try_push(&self, message: T) -> Result<(), ChannelError> {
        self.tx.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => ChannelError::Full {
                message: format!("peer buffer holds {} messages", self.capacity).into(),
                context: None,
            },
            TrySendError::Closed(_) => closed(),
        })
    }

    /// Waits for the next message from the peer. `None` once the peer is gone
    /// and everything it sent has been read.
    pub async fn pull(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Takes the next message if one is waiting.
    ///
    /// # Errors
    /// [`ChannelError::Empty`] (retryable) when nothing is waiting,
    /// [`ChannelError::Closed`] once the peer is gone and the buffer is drained.
    pub fn try_pull(&mut self) -> Result<T, ChannelError> {
        self.rx.try_recv().map_err(|err| match err {
            TryRecvError::Empty => {
                ChannelError::Empty { message: "no message waiting".into(), context: None }
            },
            TryRecvError::Disconnected => closed(),
        })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the peer has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

fn closed() -> ChannelError {
    ChannelError::Closed { message: "peer dropped".into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let err = Channel::<u8>::pair(0).unwrap_err();
        assert!(matches!(err, ChannelError::InvalidCapacity { .. }));
        assert!(!err.retryable());
    }

    #[test]
    fn directions_are_independent() {
        let (left, mut right) = Channel::<u8>::pair(1).unwrap();

        left.try_push(1).unwrap();
        let full = left.try_push(2).unwrap_err();
        assert!(full.retryable());

        right.try_push(9).unwrap();
        assert_eq!(right.try_pull().unwrap(), 1);
        left.try_push(3).unwrap();
    }
}
