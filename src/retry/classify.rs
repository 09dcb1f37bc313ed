//! Classify transport failures into retry verdicts.

use std::fmt;

/// Transport-level failure reported by the engine's HTTP layer.
///
/// The engine owns the actual connection machinery; it maps whatever its
/// transport raised into one of these kinds before calling the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Connection could not be established in time.
    ConnectTimeout,
    /// Request-level deadline elapsed mid-exchange.
    RequestTimeout,
    DnsLookupFailed,
    ConnectionRefused,
    /// Peer reset or aborted the connection mid-transfer.
    ConnectionReset,
    ConnectionLost,
    /// Response stream ended or failed before the body completed.
    ResponseTruncated,
    /// Generic I/O failure with the transport's own description.
    Io(String),
    /// TLS negotiation or certificate failure.
    Tls(String),
    /// The request itself was unsendable (bad method, invalid header, ...).
    InvalidRequest(String),
    Other(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::ConnectTimeout => write!(f, "connect timeout"),
            TransportFailure::RequestTimeout => write!(f, "request timeout"),
            TransportFailure::DnsLookupFailed => write!(f, "dns lookup failed"),
            TransportFailure::ConnectionRefused => write!(f, "connection refused"),
            TransportFailure::ConnectionReset => write!(f, "connection reset"),
            TransportFailure::ConnectionLost => write!(f, "connection lost"),
            TransportFailure::ResponseTruncated => write!(f, "response truncated"),
            TransportFailure::Io(msg) => write!(f, "i/o failure: {msg}"),
            TransportFailure::Tls(msg) => write!(f, "tls failure: {msg}"),
            TransportFailure::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            TransportFailure::Other(msg) => write!(f, "{msg}"),
        }
    }
}

/// Total verdict for a transport failure: re-issue or propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Retryable,
    Fatal,
}

/// Static, total classification. Timeouts, DNS failures, connection-level
/// drops, truncated responses, and generic I/O failures are worth another
/// attempt; everything else propagates to the caller unchanged.
pub fn classify(failure: &TransportFailure) -> Verdict {
    match failure {
        TransportFailure::ConnectTimeout
        | TransportFailure::RequestTimeout
        | TransportFailure::DnsLookupFailed
        | TransportFailure::ConnectionRefused
        | TransportFailure::ConnectionReset
        | TransportFailure::ConnectionLost
        | TransportFailure::ResponseTruncated
        | TransportFailure::Io(_) => Verdict::Retryable,
        TransportFailure::Tls(_)
        | TransportFailure::InvalidRequest(_)
        | TransportFailure::Other(_) => Verdict::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_level_failures_are_retryable() {
        for failure in [
            TransportFailure::ConnectTimeout,
            TransportFailure::RequestTimeout,
            TransportFailure::DnsLookupFailed,
            TransportFailure::ConnectionRefused,
            TransportFailure::ConnectionReset,
            TransportFailure::ConnectionLost,
            TransportFailure::ResponseTruncated,
            TransportFailure::Io("broken pipe".to_string()),
        ] {
            assert_eq!(classify(&failure), Verdict::Retryable, "{failure}");
        }
    }

    #[test]
    fn everything_else_is_fatal() {
        for failure in [
            TransportFailure::Tls("bad certificate".to_string()),
            TransportFailure::InvalidRequest("empty method".to_string()),
            TransportFailure::Other("scheme not supported".to_string()),
        ] {
            assert_eq!(classify(&failure), Verdict::Fatal, "{failure}");
        }
    }
}
