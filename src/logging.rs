use std::{fmt::Display, net::SocketAddr, time::Duration};

use log::{debug, error, info, warn};

use crate::{error::QueryError, query::ServerAddress};

pub struct StatusLogger;

impl StatusLogger {
    pub fn listening(address: &SocketAddr) {
        info!("Listening on http://{}", address);
    }

    pub fn query_started(address: &str) {
        debug!("Querying server status: {address}");
    }

    pub fn address_resolved(target: &ServerAddress, resolved: &SocketAddr) {
        debug!("Resolved {target} -> {resolved}");
    }

    pub fn connected(resolved: &SocketAddr, elapsed: Duration) {
        debug!("Connected to {resolved} in {}ms", elapsed.as_millis());
    }

    pub fn handshake_sent(resolved: &SocketAddr) {
        debug!("Handshake and status request sent to {resolved}");
    }

    pub fn response_received(resolved: &SocketAddr, len: usize) {
        debug!("Status response from {resolved}: {len} bytes");
    }

    pub fn decode_fallback(err: &dyn Display) {
        debug!("Status json did not match the expected shape, decoding leniently: {err}");
    }

    pub fn decode_complete(resolved: &SocketAddr, version: &str) {
        debug!("Decoded status from {resolved} (version '{version}')");
    }

    pub fn query_completed(address: &str, elapsed: Duration) {
        info!(
            "Status of {} retrieved in {}ms",
            address,
            elapsed.as_millis()
        );
    }

    pub fn query_failed(address: &str, err: &QueryError) {
        if dotenvy::var("DO_NOT_LOG_QUERY_ERROR").is_ok() {
            return;
        }
        warn!("Status query for {address} failed: {err}");
    }

    pub fn config_unknown_field(key: &str, value: &dyn Display) {
        warn!("Unknown configuration '{key}' with value {value}");
    }

    pub fn config_generated(path: &str) {
        info!("No configuration found, wrote defaults to {path}");
    }

    pub fn server_error(err: &dyn Display) {
        error!("HTTP server error: {err}");
    }

    pub fn shutting_down() {
        info!("Received signal, stopping...");
    }
}
