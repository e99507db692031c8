use crate::interfaces::NetworkInterface;
use crate::query::QueryError;
use crate::query::QueryParams;
use crate::query::ServiceQuerier;
use crate::record::ServiceRecord;
use crate::record::INFO_DELIMITER;
use futures_channel::mpsc::UnboundedSender;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use futures_util::stream::SelectAll;
use futures_util::FutureExt;
use futures_util::StreamExt;
use mdns_sd::IfKind;
use mdns_sd::Receiver;
use mdns_sd::ServiceDaemon;
use mdns_sd::ServiceEvent;
use mdns_sd::ServiceInfo;
use std::net::IpAddr;

/// [ServiceQuerier] backed by an mDNS daemon bound to one network interface.
pub struct MdnsQuerier {
    daemon: ServiceDaemon,
}

impl MdnsQuerier {
    pub fn new(interface: &NetworkInterface) -> Result<Self, QueryError> {
        let daemon = ServiceDaemon::new()?;
        daemon.disable_interface(IfKind::All)?;
        daemon.enable_interface(IfKind::Name(interface.name.clone()))?;
        Ok(Self { daemon })
    }
}

impl ServiceQuerier for MdnsQuerier {
    fn query(
        &self,
        params: QueryParams,
        sink: UnboundedSender<ServiceRecord>,
    ) -> BoxFuture<'static, Result<(), QueryError>> {
        run_round(self.daemon.clone(), params, sink).boxed()
    }
}

/// One query round: browse the requested service, expanding a meta-query into
/// a browse per discovered service type, until the collection window closes.
async fn run_round(
    daemon: ServiceDaemon,
    params: QueryParams,
    sink: UnboundedSender<ServiceRecord>,
) -> Result<(), QueryError> {
    let queried_type = format!("{}.{}.", params.service, params.domain);
    let mut browsed_types = vec![queried_type.clone()];
    let mut events: SelectAll<BoxStream<'static, ServiceEvent>> = SelectAll::new();
    events.push(event_stream(daemon.browse(&queried_type)?));

    let collect = async {
        while let Some(event) = events.next().await {
            match event {
                ServiceEvent::ServiceFound(ty, service_type) if ty == queried_type => {
                    // A meta-query names service types, not instances; each
                    // newly seen type gets its own browse.
                    if browsed_types.contains(&service_type) {
                        continue;
                    }
                    match daemon.browse(&service_type) {
                        Ok(receiver) => {
                            browsed_types.push(service_type);
                            events.push(event_stream(receiver));
                        }
                        Err(e) => log::debug!("Failed to browse {}: {}", service_type, e),
                    }
                }
                ServiceEvent::ServiceResolved(info) => {
                    log::debug!("Resolved {}", info.get_fullname());
                    if sink.unbounded_send(to_record(&info)).is_err() {
                        // The session stopped consuming; close the round.
                        break;
                    }
                }
                _ => {}
            }
        }
    };
    let _ = tokio::time::timeout(params.timeout, collect).await;

    for service_type in browsed_types {
        if let Err(e) = daemon.stop_browse(&service_type) {
            log::debug!("Failed to stop browsing {}: {}", service_type, e);
        }
    }
    Ok(())
}

fn event_stream(receiver: Receiver<ServiceEvent>) -> BoxStream<'static, ServiceEvent> {
    futures_util::stream::unfold(receiver, |receiver| async move {
        receiver.recv_async().await.ok().map(|event| (event, receiver))
    })
    .boxed()
}

fn to_record(info: &ServiceInfo) -> ServiceRecord {
    let mut addr_v4 = None;
    let mut addr_v6 = None;
    for address in info.get_addresses() {
        match address {
            IpAddr::V4(address) if addr_v4.is_none() => addr_v4 = Some(*address),
            IpAddr::V6(address) if addr_v6.is_none() => addr_v6 = Some(*address),
            _ => {}
        }
    }
    let info_text = info
        .get_properties()
        .iter()
        .map(|property| format!("{}={}", property.key(), property.val_str()))
        .collect::<Vec<_>>()
        .join(INFO_DELIMITER);
    ServiceRecord {
        name: info.get_fullname().into(),
        host: info.get_hostname().into(),
        addr_v4,
        addr_v6,
        port: info.get_port(),
        info: info_text,
    }
}
