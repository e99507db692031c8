use if_addrs::IfAddr;
use mockall::automock;

/// A network interface usable for multicast queries, identified by name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NetworkInterface {
    pub name: String,
}

impl std::fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)
    }
}

/// One assigned address as reported by the operating system.
#[derive(Debug)]
pub struct AddressEntry {
    pub interface_name: String,
    pub loopback: bool,
    pub link_local: bool,
    /// IPv4 without a broadcast address marks a point-to-point link.
    pub point_to_point: bool,
}

#[automock]
pub trait InterfaceLister {
    fn list(&self) -> std::io::Result<Vec<AddressEntry>>;
}

pub struct SystemInterfaceLister;

impl InterfaceLister for SystemInterfaceLister {
    fn list(&self) -> std::io::Result<Vec<AddressEntry>> {
        let entries = if_addrs::get_if_addrs()?
            .into_iter()
            .map(|interface| AddressEntry {
                loopback: interface.is_loopback(),
                link_local: interface.is_link_local(),
                point_to_point: match &interface.addr {
                    IfAddr::V4(addr) => addr.broadcast.is_none(),
                    IfAddr::V6(_) => false,
                },
                interface_name: interface.name,
            })
            .collect();
        Ok(entries)
    }
}

/// Enumerates every interface holding at least one usable address.
///
/// Enumeration failure is not fatal: it yields no interfaces.
pub fn resolve_all(lister: &dyn InterfaceLister) -> Vec<NetworkInterface> {
    let entries = match lister.list() {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to enumerate network interfaces: {}", e);
            return vec![];
        }
    };

    let mut interfaces: Vec<NetworkInterface> = vec![];
    for entry in entries {
        if entry.loopback || entry.link_local || entry.point_to_point {
            continue;
        }
        let interface = NetworkInterface {
            name: entry.interface_name,
        };
        if !interfaces.contains(&interface) {
            interfaces.push(interface);
        }
    }
    interfaces
}

/// Resolves interfaces by name, in input order.
///
/// Unknown names are skipped; duplicated names stay duplicated.
pub fn resolve_names(lister: &dyn InterfaceLister, names: &[String]) -> Vec<NetworkInterface> {
    let entries = match lister.list() {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to enumerate network interfaces: {}", e);
            return vec![];
        }
    };

    names
        .iter()
        .filter_map(|name| {
            if entries.iter().any(|entry| &entry.interface_name == name) {
                Some(NetworkInterface { name: name.clone() })
            } else {
                log::warn!("Skipping unknown network interface {}", name);
                None
            }
        })
        .collect()
}
