use super::ServerError;
use tokio::net::TcpStream;

/// Upper bound of the probe scan; ports above this do not exist.
const MAX_PORT: u16 = 65535;

/// Connect-probe a port on the loopback interface. A successful
/// connection means something is listening there.
///
/// This is a best-effort check, not a reservation: another process can
/// bind the port between this probe and a subsequent bind attempt, in
/// which case the bind fails explicitly rather than being retried.
pub async fn port_in_use(port: u16) -> bool {
    TcpStream::connect(("127.0.0.1", port)).await.is_ok()
}

/// Find the first free port at or above `start_port`, scanning upward.
/// Fails once the scan runs past the end of the valid port range.
pub async fn find_free_port(start_port: u16) -> Result<u16, ServerError> {
    for port in start_port..=MAX_PORT {
        if !port_in_use(port).await {
            return Ok(port);
        }
    }
    Err(ServerError::NoFreePorts { start: start_port })
}
