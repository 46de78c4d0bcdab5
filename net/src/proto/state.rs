use super::error::{ProtoError, Result};

/// Next state value in the handshake packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeNextState {
    Status,
    Login,
}

impl HandshakeNextState {
    pub const fn as_varint(self) -> i32 {
        match self {
            HandshakeNextState::Status => 1,
            HandshakeNextState::Login => 2,
        }
    }

    pub fn from_varint(value: i32) -> Result<Self> {
        match value {
            1 => Ok(HandshakeNextState::Status),
            2 => Ok(HandshakeNextState::Login),
            other => Err(ProtoError::InvalidHandshakeState(other)),
        }
    }
}
