use std::time::Duration;

/// Errors that can occur while driving the link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Payload could not be laid out for the wire.
    #[error("wire error: {0}")]
    Wire(#[from] lumen_wire::WireError),

    /// The collaborator rejected a write outright.
    #[error("link write rejected: {0}")]
    Write(String),

    /// A write did not complete within the configured bound. The send is
    /// aborted; recovery is an external reconnect.
    #[error("write did not complete within {0:?}")]
    Timeout(Duration),

    /// An in-flight send was cancelled (typically by a disconnect).
    #[error("send cancelled")]
    Cancelled,

    /// Operation requires a connected link.
    #[error("link is not connected")]
    NotConnected,

    /// Channel enumeration after connect failed or came back incomplete.
    #[error("channel discovery failed: {0}")]
    Discovery(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;
