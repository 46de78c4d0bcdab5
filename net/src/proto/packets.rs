use super::{
    error::Result,
    io::{check_string_bounded, read_string_bounded, read_u16_be},
    state::HandshakeNextState,
    types::{PacketBuffer, PacketDecode, PacketEncode},
    varint::read_varint,
};

/// Protocol version sent when only the server list status is wanted.
pub const STATUS_PROTOCOL_VERSION: i32 = -1;

const MAX_ADDRESS_CHARS: usize = 255;
const MAX_JSON_CHARS: usize = 32767;

/// Handshake (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeC2s<'a> {
    pub protocol_version: i32,
    pub server_address: &'a str,
    pub server_port: u16,
    pub next_state: HandshakeNextState,
}

impl<'a> HandshakeC2s<'a> {
    pub const ID: i32 = 0x00;

    /// Handshake announcing a status query for `server_address:server_port`.
    #[must_use]
    pub const fn status(server_address: &'a str, server_port: u16) -> Self {
        Self {
            protocol_version: STATUS_PROTOCOL_VERSION,
            server_address,
            server_port,
            next_state: HandshakeNextState::Status,
        }
    }
}

impl PacketEncode for HandshakeC2s<'_> {
    const ID: i32 = HandshakeC2s::ID;

    fn encode_body(&self, out: &mut PacketBuffer) -> Result<()> {
        check_string_bounded(self.server_address, MAX_ADDRESS_CHARS)?;
        out.write_varint(self.protocol_version);
        out.write_string(self.server_address);
        out.write_u16(self.server_port);
        out.write_varint(self.next_state.as_varint());
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for HandshakeC2s<'a> {
    const ID: i32 = HandshakeC2s::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let protocol_version = read_varint(input)?;
        let server_address = read_string_bounded(input, MAX_ADDRESS_CHARS)?;
        let server_port = read_u16_be(input)?;
        let next_state = HandshakeNextState::from_varint(read_varint(input)?)?;
        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }
}

/// Status request (C2S) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRequestC2s;

impl StatusRequestC2s {
    pub const ID: i32 = 0x00;
}

impl PacketEncode for StatusRequestC2s {
    const ID: i32 = StatusRequestC2s::ID;

    fn encode_body(&self, _out: &mut PacketBuffer) -> Result<()> {
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for StatusRequestC2s {
    const ID: i32 = StatusRequestC2s::ID;

    fn decode_body(_input: &mut &'a [u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// Status response (S2C) packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponseS2c<'a> {
    pub json: &'a str,
}

impl StatusResponseS2c<'_> {
    pub const ID: i32 = 0x00;
}

impl PacketEncode for StatusResponseS2c<'_> {
    const ID: i32 = StatusResponseS2c::ID;

    fn encode_body(&self, out: &mut PacketBuffer) -> Result<()> {
        check_string_bounded(self.json, MAX_JSON_CHARS)?;
        out.write_string(self.json);
        Ok(())
    }
}

impl<'a> PacketDecode<'a> for StatusResponseS2c<'a> {
    const ID: i32 = StatusResponseS2c::ID;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self> {
        let json = read_string_bounded(input, MAX_JSON_CHARS)?;
        Ok(Self { json })
    }
}
