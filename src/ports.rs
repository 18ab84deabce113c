//! Free TCP port probing.

use log::trace;
use std::io;
use std::net::{Ipv4Addr, TcpListener};

/// Ask the OS for a currently unused port on `127.0.0.1`.
///
/// The probe socket is closed before returning, so another process can take
/// the port before the caller binds it. Prefer binding port `0` directly (the
/// in-memory server does this) when the caller can read back the bound address.
pub fn random_unused_port() -> io::Result<u16> {
    let socket = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    let port = socket.local_addr()?.port();
    trace!("Probed unused port {}", port);
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probed_port_can_be_bound() {
        let port = random_unused_port().unwrap();
        assert_ne!(port, 0);
        // Racy in principle; nothing else in this test grabs ports
        assert!(TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok());
    }
}
