use anyhow::{anyhow, Result};

/// Fixed actuator address (host, port).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActuatorEndpoint {
    pub host: String,
    pub port: u16,
}

impl ActuatorEndpoint {
    /// `host:port`, with IPv6 literals bracketed.
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl std::fmt::Display for ActuatorEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "udp://{}", self.addr())
    }
}

/// Parse `host:port` with an optional `udp://` scheme.
pub fn parse_actuator_endpoint(addr: &str) -> Result<ActuatorEndpoint> {
    let trimmed = addr.trim();
    let remainder = match trimmed.split_once("://") {
        Some(("udp", rest)) => rest,
        Some((scheme, _)) => return Err(anyhow!("unsupported actuator scheme: {}", scheme)),
        None => trimmed,
    };
    endpoint_from_host_port(remainder, addr)
}

/// Split a bare or bracketed-IPv6 `host:port` and check it can address a
/// datagram peer: non-empty host, non-zero port.
fn endpoint_from_host_port(remainder: &str, addr: &str) -> Result<ActuatorEndpoint> {
    let (host, port) = match remainder.strip_prefix('[') {
        Some(bracketed) => {
            let (host, tail) = bracketed
                .split_once(']')
                .ok_or_else(|| anyhow!("unterminated IPv6 literal in {}", addr))?;
            let port = tail
                .strip_prefix(':')
                .ok_or_else(|| anyhow!("missing actuator port in {}", addr))?;
            (host, port)
        }
        None => remainder
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("missing actuator port in {}", addr))?,
    };
    if host.is_empty() {
        return Err(anyhow!("missing actuator host in {}", addr));
    }
    let port = match port.parse::<u16>() {
        Ok(0) => return Err(anyhow!("actuator port must be non-zero in {}", addr)),
        Ok(port) => port,
        Err(err) => return Err(anyhow!("invalid actuator port in {}: {}", addr, err)),
    };
    Ok(ActuatorEndpoint {
        host: host.to_string(),
        port,
    })
}
