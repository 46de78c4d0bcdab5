//! Minimal Minecraft protocol types for the server list ping.
pub mod proto;

pub use proto::{
    encode_packet, frame_packet, read_varint, read_varint_partial, varint_len, write_varint,
    HandshakeC2s, HandshakeNextState, PacketBuffer, PacketDecode, PacketEncode, PacketFrame,
    ProtoError, Result, StatusRequestC2s, StatusResponseS2c, DEFAULT_PORT, MAX_PACKET_SIZE,
    MAX_VARINT_LEN, STATUS_PROTOCOL_VERSION,
};
