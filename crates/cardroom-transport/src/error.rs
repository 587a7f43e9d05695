/// Errors that can occur in the transport layer.
///
/// The underlying WebSocket errors are folded into `std::io::Error` so
/// nothing above this crate depends on `tungstenite` types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Sending data failed; the peer is most likely gone.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding, accepting, or upgrading a connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
