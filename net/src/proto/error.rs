use std::fmt;

/// Protocol decode/encode error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    UnexpectedEof,
    VarIntTooLarge,
    PacketTooLarge { len: usize },
    NegativeLength(i32),
    InvalidUtf8,
    LengthTooLarge { max: usize, actual: usize },
    TrailingBytes(usize),
    InvalidPacketId { expected: i32, actual: i32 },
    InvalidHandshakeState(i32),
}

pub type Result<T> = std::result::Result<T, ProtoError>;

pub(crate) fn debug_log_error(context: &str, error: &ProtoError) {
    #[cfg(debug_assertions)]
    {
        log::error!("{}: {:?}", context, error);
    }
    let _ = context;
    let _ = error;
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtoError::UnexpectedEof => write!(f, "unexpected end of packet"),
            ProtoError::VarIntTooLarge => write!(f, "varint is longer than 5 bytes"),
            ProtoError::PacketTooLarge { len } => write!(f, "packet of {len} bytes is too large"),
            ProtoError::NegativeLength(len) => write!(f, "negative length {len}"),
            ProtoError::InvalidUtf8 => write!(f, "string is not valid utf-8"),
            ProtoError::LengthTooLarge { max, actual } => {
                write!(f, "length {actual} exceeds maximum {max}")
            }
            ProtoError::TrailingBytes(n) => write!(f, "{n} trailing bytes after packet body"),
            ProtoError::InvalidPacketId { expected, actual } => {
                write!(f, "unexpected packet id {actual:#04x} (expected {expected:#04x})")
            }
            ProtoError::InvalidHandshakeState(state) => {
                write!(f, "invalid handshake next state {state}")
            }
        }
    }
}

impl std::error::Error for ProtoError {}
