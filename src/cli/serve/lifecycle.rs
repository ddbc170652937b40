//! Server lifecycle management.

use anyhow::Result;
use std::net::{IpAddr, SocketAddr};
use tiny_http::Server;

/// Bind the HTTP server at startup.
///
/// No port retry: the preview URL is constructed by the editor side, so a
/// silently shifted port would strand it. Port 0 asks the OS for a free
/// port; the returned address is the one actually bound.
pub fn bind(interface: IpAddr, port: u16) -> Result<(Server, SocketAddr)> {
    let addr = SocketAddr::new(interface, port);

    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

    let actual = server.server_addr().to_ip().unwrap_or(addr);
    Ok((server, actual))
}
