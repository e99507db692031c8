use crate::interfaces;
use crate::interfaces::SystemInterfaceLister;
use crate::mdns::MdnsQuerier;
use crate::record::ServiceRecord;
use crate::session::QuerySession;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// Source of service-record snapshots for the presentation layer to poll.
///
/// Swapping the implementation swaps the whole data source; the offline
/// backend is [FixedRecordSource] in place of a live [DiscoveryManager].
pub trait RecordSource: Send + Sync {
    /// Deduplicated merge of everything discovered so far.
    ///
    /// A synchronous read of in-memory state; never blocks on network I/O.
    fn snapshot(&self) -> Vec<ServiceRecord>;

    /// Stops whatever feeds the source; the last snapshot stays readable.
    fn shutdown(&mut self) -> BoxFuture<'_, ()> {
        async {}.boxed()
    }
}

/// Owns every active [QuerySession] and merges their records on demand.
pub struct DiscoveryManager {
    sessions: Vec<QuerySession>,
}

impl DiscoveryManager {
    /// Resolves the interface set and starts one session per
    /// interface × domain combination.
    ///
    /// `interface_names` of `None` selects all usable host interfaces.
    /// Interfaces that fail to resolve or to set up a querier are skipped;
    /// zero sessions is a valid, permanently empty discovery state.
    pub fn start(interface_names: Option<&[String]>, domains: &[String]) -> Self {
        let lister = SystemInterfaceLister;
        let interfaces = match interface_names {
            None => interfaces::resolve_all(&lister),
            Some(names) => interfaces::resolve_names(&lister, names),
        };
        log::info!("Discovering on {} network interface(s)", interfaces.len());

        let mut sessions = vec![];
        for interface in &interfaces {
            for domain in domains {
                match MdnsQuerier::new(interface) {
                    Ok(querier) => sessions.push(QuerySession::start(
                        querier,
                        interface.clone(),
                        domain.clone(),
                    )),
                    Err(e) => log::warn!("Cannot query on {}: {}", interface, e),
                }
            }
        }
        Self { sessions }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl RecordSource for DiscoveryManager {
    fn snapshot(&self) -> Vec<ServiceRecord> {
        let mut merged = vec![];
        for session in &self.sessions {
            for record in session.records() {
                if !merged.contains(&record) {
                    merged.push(record);
                }
            }
        }
        merged
    }

    fn shutdown(&mut self) -> BoxFuture<'_, ()> {
        async {
            for session in &mut self.sessions {
                session.stop().await;
            }
        }
        .boxed()
    }
}

/// Offline backend replaying a fixed record list, bypassing the network.
pub struct FixedRecordSource {
    records: Vec<ServiceRecord>,
}

impl FixedRecordSource {
    pub fn new(records: Vec<ServiceRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for FixedRecordSource {
    fn snapshot(&self) -> Vec<ServiceRecord> {
        self.records.clone()
    }
}
