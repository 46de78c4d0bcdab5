//! Minimal Minecraft protocol framing for handshake and status.

mod error;
mod io;
mod packets;
mod state;
mod types;
mod varint;


pub use error::{ProtoError, Result};
pub use packets::{HandshakeC2s, StatusRequestC2s, StatusResponseS2c, STATUS_PROTOCOL_VERSION};
pub use state::HandshakeNextState;
pub use types::{
    encode_packet, frame_packet, PacketBuffer, PacketDecode, PacketEncode, PacketFrame,
    DEFAULT_PORT, MAX_PACKET_SIZE,
};
pub use varint::{read_varint, read_varint_partial, varint_len, write_varint, MAX_VARINT_LEN};
