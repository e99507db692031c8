use crate::record::ServiceRecord;
use futures_channel::mpsc::UnboundedSender;
use futures_util::future::BoxFuture;
use mockall::automock;
use std::time::Duration;
use thiserror::Error;

/// Well-known DNS-SD meta-query enumerating every service type advertised on
/// the segment.
///
/// <https://www.rfc-editor.org/rfc/rfc6763#section-9>
pub const META_QUERY_SERVICE: &str = "_services._dns-sd._udp";

/// Parameters of one broadcast query round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryParams {
    pub service: String,
    pub domain: String,
    /// How long a round keeps collecting responses before it closes.
    pub timeout: Duration,
}

/// Sends one broadcast query and forwards whatever responses arrive onto
/// `sink` until the round closes.
///
/// Responses carry no correlation with the query that solicited them; a round
/// that collects nothing is not an error.
#[automock]
pub trait ServiceQuerier {
    fn query(
        &self,
        params: QueryParams,
        sink: UnboundedSender<ServiceRecord>,
    ) -> BoxFuture<'static, Result<(), QueryError>>;
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to issue an mDNS query")]
    Protocol(#[from] mdns_sd::Error),
}
