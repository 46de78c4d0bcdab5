use std::{future::Future, io, net::SocketAddr, time::Duration};

use net::{
    encode_packet, read_varint_partial, PacketEncode, ProtoError, StatusResponseS2c,
    MAX_PACKET_SIZE, MAX_VARINT_LEN,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, BufReader},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    time::{timeout, timeout_at, Instant},
};

use crate::error::{QueryError, QueryPhase};

/// Deadline offset used when `now + io_timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// One status exchange over a single TCP stream.
///
/// Every read and write after connecting shares one deadline. The socket
/// closes when the value is dropped.
pub struct Connection {
    read: BufReader<OwnedReadHalf>,
    write: OwnedWriteHalf,
    deadline: Instant,
}

impl Connection {
    pub async fn connect(
        addr: SocketAddr,
        connect_timeout: Duration,
        io_timeout: Duration,
    ) -> Result<Connection, QueryError> {
        let stream = match timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(QueryError::connection(addr, err)),
            Err(_) => {
                return Err(QueryError::connection(
                    addr,
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("no answer within {connect_timeout:?}"),
                    ),
                ));
            }
        };
        let _ = stream.set_nodelay(true);
        let (r, w) = stream.into_split();

        let now = Instant::now();
        Ok(Connection {
            read: BufReader::new(r),
            write: w,
            deadline: now.checked_add(io_timeout).unwrap_or(now + FAR_FUTURE),
        })
    }

    /// Frames `pkt` and writes it in a single call.
    pub async fn send<P>(&mut self, pkt: &P) -> Result<(), QueryError>
    where
        P: PacketEncode,
    {
        let phase = QueryPhase::Handshaking;
        let bytes = encode_packet(pkt).map_err(|err| QueryError::protocol(phase, err))?;
        within(self.deadline, phase, self.write.write_all(bytes.bytes())).await
    }

    /// Reads one varint a byte at a time, giving up after five bytes.
    pub async fn read_varint(&mut self) -> Result<i32, QueryError> {
        let phase = QueryPhase::AwaitingResponse;
        let mut bytes = [0u8; MAX_VARINT_LEN];
        for i in 0..MAX_VARINT_LEN {
            bytes[i] = within(self.deadline, phase, self.read.read_u8()).await?;
            match read_varint_partial(&bytes[..=i]) {
                Ok(Some((value, _))) => return Ok(value),
                Ok(None) => continue,
                Err(err) => return Err(QueryError::protocol(phase, err)),
            }
        }
        Err(QueryError::protocol(phase, ProtoError::VarIntTooLarge))
    }

    /// Reads a status response frame and returns its raw JSON bytes.
    ///
    /// The outer length is read but not checked against what follows.
    pub async fn read_status_response(&mut self) -> Result<Vec<u8>, QueryError> {
        let phase = QueryPhase::AwaitingResponse;

        let _packet_len = self.read_varint().await?;

        let id = self.read_varint().await?;
        if id != StatusResponseS2c::ID {
            return Err(QueryError::protocol(
                phase,
                ProtoError::InvalidPacketId {
                    expected: StatusResponseS2c::ID,
                    actual: id,
                },
            ));
        }

        let json_len = self.read_varint().await?;
        if json_len < 0 {
            return Err(QueryError::protocol(
                phase,
                ProtoError::NegativeLength(json_len),
            ));
        }
        let json_len = json_len as usize;
        if json_len > MAX_PACKET_SIZE {
            return Err(QueryError::protocol(
                phase,
                ProtoError::LengthTooLarge {
                    max: MAX_PACKET_SIZE,
                    actual: json_len,
                },
            ));
        }

        let mut json = vec![0u8; json_len];
        within(self.deadline, phase, self.read.read_exact(&mut json)).await?;
        Ok(json)
    }
}

async fn within<T, F>(deadline: Instant, phase: QueryPhase, fut: F) -> Result<T, QueryError>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout_at(deadline, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(QueryError::transport(phase, err)),
        Err(_) => Err(QueryError::transport(
            phase,
            io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"),
        )),
    }
}
