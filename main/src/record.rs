use serde::Deserialize;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

/// Separator between the `key=value` pairs of [ServiceRecord::info].
pub const INFO_DELIMITER: &str = "|";

/// One advertised service as discovered on the network.
///
/// Two records are the same discovery iff every field matches; a re-discovery
/// that differs in any field, metadata included, is a new record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ServiceRecord {
    /// Fully qualified instance name, service type and domain included.
    pub name: String,
    pub host: String,
    pub addr_v4: Option<Ipv4Addr>,
    pub addr_v6: Option<Ipv6Addr>,
    pub port: u16,
    /// Opaque `key=value` pairs joined by [INFO_DELIMITER].
    pub info: String,
}
