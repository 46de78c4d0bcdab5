use bytes::{BufMut, Bytes, BytesMut};

use super::{
    error::{ProtoError, Result, debug_log_error},
    varint::{read_varint, read_varint_partial, varint_len, write_varint},
};

/// Maximum packet length in bytes (protocol limit).
pub const MAX_PACKET_SIZE: usize = 2_097_152;

/// Port a Java Edition server listens on when none is given.
pub const DEFAULT_PORT: u16 = 25565;

/// Serverbound or clientbound packet body encoding.
pub trait PacketEncode {
    const ID: i32;

    /// Appends the fields that follow the packet ID.
    fn encode_body(&self, out: &mut PacketBuffer) -> Result<()>;
}

/// Serverbound or clientbound packet body decoding.
pub trait PacketDecode<'a>: Sized {
    const ID: i32;

    fn decode_body(input: &mut &'a [u8]) -> Result<Self>;
}

/// Append-only accumulator used to assemble a single packet.
///
/// Every writer appends; nothing is ever overwritten. A buffer is built for one
/// packet, flushed once and then dropped.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    buf: BytesMut,
}

impl PacketBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn write_varint(&mut self, value: i32) {
        write_varint(&mut self.buf, value);
    }

    /// Writes the UTF-8 byte length as a varint, then the raw bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as i32);
        self.buf.put_slice(value.as_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Decoded packet frame with the raw body (without ID).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketFrame {
    pub id: i32,
    pub body: Vec<u8>,
}

impl PacketFrame {
    /// Splits one length-prefixed frame off the front of `data`.
    ///
    /// Returns the frame and the number of bytes it occupied, or `Ok(None)`
    /// when `data` does not yet hold a complete frame.
    pub fn try_parse(data: &[u8]) -> Result<Option<(PacketFrame, usize)>> {
        let (packet_len, len_len) = match read_varint_partial(data) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(err) => {
                debug_log_error("packet length varint decode failed", &err);
                return Err(err);
            }
        };

        if packet_len < 0 {
            let err = ProtoError::NegativeLength(packet_len);
            debug_log_error("negative packet length", &err);
            return Err(err);
        }

        let packet_len = packet_len as usize;
        if packet_len > MAX_PACKET_SIZE {
            let err = ProtoError::PacketTooLarge { len: packet_len };
            debug_log_error("packet too large", &err);
            return Err(err);
        }

        let total_len = len_len + packet_len;
        if data.len() < total_len {
            return Ok(None);
        }

        let mut body = &data[len_len..total_len];
        let id = read_varint(&mut body)?;

        Ok(Some((
            PacketFrame {
                id,
                body: body.to_vec(),
            },
            total_len,
        )))
    }

    /// Decodes the body as `P`, rejecting a mismatched ID or leftover bytes.
    pub fn decode<'a, P: PacketDecode<'a>>(&'a self) -> Result<P> {
        if self.id != P::ID {
            return Err(ProtoError::InvalidPacketId {
                expected: P::ID,
                actual: self.id,
            });
        }

        let mut input = self.body.as_slice();
        let packet = P::decode_body(&mut input)?;
        if !input.is_empty() {
            let err = ProtoError::TrailingBytes(input.len());
            debug_log_error("packet had trailing bytes", &err);
            return Err(err);
        }
        Ok(packet)
    }
}

/// Prefixes `body` with its byte length: `varint(len(body)) || body`.
pub fn frame_packet(body: &[u8]) -> Result<PacketBuffer> {
    if body.len() > MAX_PACKET_SIZE {
        return Err(ProtoError::PacketTooLarge { len: body.len() });
    }

    let mut framed = PacketBuffer::with_capacity(varint_len(body.len() as i32) + body.len());
    framed.write_varint(body.len() as i32);
    framed.write_bytes(body);
    Ok(framed)
}

/// Encodes `pkt` as a complete wire packet, ID and length prefix included.
pub fn encode_packet<P: PacketEncode>(pkt: &P) -> Result<PacketBuffer> {
    let mut body = PacketBuffer::new();
    body.write_varint(P::ID);
    pkt.encode_body(&mut body)?;
    frame_packet(body.bytes())
}
