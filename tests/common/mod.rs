#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use net::{
    encode_packet, frame_packet, HandshakeC2s, HandshakeNextState, PacketBuffer, PacketFrame,
    StatusRequestC2s, StatusResponseS2c,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

pub const STATUS_JSON: &str = r#"{"version":{"name":"1.19.2","protocol":760},"players":{"max":100,"online":5,"sample":[]},"description":{"text":"Hi"}}"#;

/// Handshake fields as the mock server saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenHandshake {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: HandshakeNextState,
}

pub enum Reply {
    /// Write these bytes after the status request, then close.
    Bytes(Vec<u8>),
    /// Read the request and then go quiet.
    Silent,
}

pub fn status_response(json: &str) -> Vec<u8> {
    encode_packet(&StatusResponseS2c { json })
        .unwrap()
        .into_bytes()
        .to_vec()
}

pub fn raw_response(id: i32, json: &str) -> Vec<u8> {
    let mut body = PacketBuffer::new();
    body.write_varint(id);
    body.write_string(json);
    frame_packet(body.bytes()).unwrap().bytes().to_vec()
}

/// Accepts one connection, checks the two request packets and sends `reply`.
pub async fn spawn_server(reply: Reply) -> (SocketAddr, JoinHandle<SeenHandshake>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let frames = read_frames(&mut stream, 2).await;
        assert_eq!(frames.len(), 2, "client sent fewer than two packets");

        let handshake: HandshakeC2s = frames[0].decode().unwrap();
        let seen = SeenHandshake {
            protocol_version: handshake.protocol_version,
            server_address: handshake.server_address.to_string(),
            server_port: handshake.server_port,
            next_state: handshake.next_state,
        };
        let _: StatusRequestC2s = frames[1].decode().unwrap();

        match reply {
            Reply::Bytes(bytes) => {
                stream.write_all(&bytes).await.unwrap();
                stream.shutdown().await.ok();
            }
            Reply::Silent => tokio::time::sleep(Duration::from_secs(30)).await,
        }
        seen
    });

    (addr, handle)
}

async fn read_frames(stream: &mut TcpStream, count: usize) -> Vec<PacketFrame> {
    let mut buf = Vec::new();
    let mut frames = Vec::new();
    let mut chunk = [0u8; 512];

    while frames.len() < count {
        if let Some((frame, used)) = PacketFrame::try_parse(&buf).unwrap() {
            buf.drain(..used);
            frames.push(frame);
            continue;
        }
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    frames
}

/// A loopback address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
