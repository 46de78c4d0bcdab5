use std::{fmt, io, net::SocketAddr};

use net::ProtoError;

use crate::query::AddressError;

/// Step of a status query in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Resolving,
    Connecting,
    Handshaking,
    AwaitingResponse,
    Decoding,
}

impl QueryPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryPhase::Resolving => "resolution",
            QueryPhase::Connecting => "connect",
            QueryPhase::Handshaking => "handshake",
            QueryPhase::AwaitingResponse => "read",
            QueryPhase::Decoding => "decode",
        }
    }
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    Connection,
    Transport,
    Protocol,
    Decode,
}

/// Every way a status query can fail. None of them are retried.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("{phase}: could not resolve server address - {source}")]
    Resolution {
        phase: QueryPhase,
        #[source]
        source: AddressError,
    },
    #[error("{phase}: could not connect to {addr} - {source}")]
    Connection {
        phase: QueryPhase,
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("{phase}: networking error - {source}")]
    Transport {
        phase: QueryPhase,
        #[source]
        source: io::Error,
    },
    #[error("{phase}: protocol violation - {source}")]
    Protocol {
        phase: QueryPhase,
        #[source]
        source: ProtoError,
    },
    #[error("{phase}: malformed status json - {source}")]
    Decode {
        phase: QueryPhase,
        #[source]
        source: serde_json::Error,
    },
}

impl QueryError {
    pub fn resolution(source: AddressError) -> Self {
        QueryError::Resolution {
            phase: QueryPhase::Resolving,
            source,
        }
    }

    pub fn connection(addr: SocketAddr, source: io::Error) -> Self {
        QueryError::Connection {
            phase: QueryPhase::Connecting,
            addr,
            source,
        }
    }

    pub fn transport(phase: QueryPhase, source: io::Error) -> Self {
        QueryError::Transport { phase, source }
    }

    pub fn protocol(phase: QueryPhase, source: ProtoError) -> Self {
        QueryError::Protocol { phase, source }
    }

    pub fn decode(source: serde_json::Error) -> Self {
        QueryError::Decode {
            phase: QueryPhase::Decoding,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Resolution { .. } => ErrorKind::Resolution,
            QueryError::Connection { .. } => ErrorKind::Connection,
            QueryError::Transport { .. } => ErrorKind::Transport,
            QueryError::Protocol { .. } => ErrorKind::Protocol,
            QueryError::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub fn phase(&self) -> QueryPhase {
        match self {
            QueryError::Resolution { phase, .. }
            | QueryError::Connection { phase, .. }
            | QueryError::Transport { phase, .. }
            | QueryError::Protocol { phase, .. }
            | QueryError::Decode { phase, .. } => *phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_phase() {
        let err = QueryError::protocol(
            QueryPhase::AwaitingResponse,
            ProtoError::InvalidPacketId {
                expected: 0,
                actual: 1,
            },
        );
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.phase(), QueryPhase::AwaitingResponse);
        assert!(err.to_string().starts_with("read: protocol violation"));
    }

    #[test]
    fn connection_error_carries_target() {
        let addr: SocketAddr = "127.0.0.1:25565".parse().unwrap();
        let err = QueryError::connection(addr, io::Error::from(io::ErrorKind::ConnectionRefused));
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(err.phase(), QueryPhase::Connecting);
        assert!(err.to_string().contains("127.0.0.1:25565"));
    }
}
