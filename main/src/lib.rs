mod interfaces;
mod manager;
mod mdns;
mod query;
mod record;
mod session;

pub use interfaces::NetworkInterface;
pub use manager::DiscoveryManager;
pub use manager::FixedRecordSource;
pub use manager::RecordSource;
pub use mdns::MdnsQuerier;
pub use query::QueryError;
pub use query::QueryParams;
pub use query::ServiceQuerier;
pub use query::META_QUERY_SERVICE;
pub use record::ServiceRecord;
pub use record::INFO_DELIMITER;
pub use session::QuerySession;
pub use session::QUERY_INTERVAL;
pub use session::QUERY_TIMEOUT;
