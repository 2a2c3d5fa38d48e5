//! # Control Channel
//!
//! A duplex, in-process channel between two tasks, e.g. the signal listener and
//! the main loop of the daemon. Each end has its own bounded buffer; neither
//! direction can starve the other.
//!
//! Non-blocking operations fail with retryable errors when they would have to
//! wait; [`ChannelError::status`] maps those onto [`cradle_domain::Status::Again`].
//!
//! # Example
//!
//! ```rust
//! use cradle_channel::{Channel, ChannelError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), ChannelError> {
//!     let (control, mut worker) = Channel::pair(8)?;
//!
//!     control.push("reopen").await?;
//!     assert_eq!(worker.pull().await, Some("reopen"));
//!
//!     drop(control);
//!     assert_eq!(worker.pull().await, None);
//!     Ok(())
//! }
//! ```

mod channel;
mod error;

pub use channel::{Channel, DEFAULT_CAPACITY};
pub use error::{ChannelError, ChannelErrorExt};
