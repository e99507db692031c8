use crate::interfaces::NetworkInterface;
use crate::query::QueryParams;
use crate::query::ServiceQuerier;
use crate::query::META_QUERY_SERVICE;
use crate::record::ServiceRecord;
use futures_channel::mpsc::UnboundedReceiver;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// How often a new query round is triggered.
pub const QUERY_INTERVAL: Duration = Duration::from_secs(11);

/// How long each round keeps collecting responses.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Live query lifecycle of one (interface, domain) pair.
///
/// Construction spawns a periodic query trigger and a response consumer;
/// both run until [QuerySession::stop].
pub struct QuerySession {
    interface: NetworkInterface,
    records: Arc<Mutex<Vec<ServiceRecord>>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl QuerySession {
    pub fn start(
        querier: impl ServiceQuerier + Send + 'static,
        interface: NetworkInterface,
        domain: String,
    ) -> Self {
        log::info!("Starting discovery of domain {} on {}", domain, interface);
        let params = QueryParams {
            service: META_QUERY_SERVICE.into(),
            domain,
            timeout: QUERY_TIMEOUT,
        };
        let records: Arc<Mutex<Vec<ServiceRecord>>> = Arc::default();
        let cancel = CancellationToken::new();
        let (sink, source) = futures_channel::mpsc::unbounded();
        let tasks = vec![
            tokio::spawn(run_queries(
                querier,
                params,
                interface.clone(),
                sink,
                cancel.clone(),
            )),
            tokio::spawn(ingest(source, records.clone(), cancel.clone())),
        ];
        Self {
            interface,
            records,
            cancel,
            tasks,
        }
    }

    /// Immutable snapshot of every record discovered so far, in arrival order.
    pub fn records(&self) -> Vec<ServiceRecord> {
        self.records
            .lock()
            .expect("Record set lock poisoned")
            .clone()
    }

    /// Signals both session tasks to terminate and waits them out.
    ///
    /// No record is appended once this returns; the accumulated set remains
    /// readable. A stopped session cannot be restarted.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                log::debug!("A task of the session on {} failed: {}", self.interface, e);
            }
        }
    }
}

async fn run_queries(
    querier: impl ServiceQuerier + Send,
    params: QueryParams,
    interface: NetworkInterface,
    sink: UnboundedSender<ServiceRecord>,
    cancel: CancellationToken,
) {
    let mut timer = tokio::time::interval(QUERY_INTERVAL);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = timer.tick() => {}
        }
        tokio::select! {
            _ = cancel.cancelled() => return,
            result = querier.query(params.clone(), sink.clone()) => {
                if let Err(e) = result {
                    log::debug!("Query round on {} failed: {}", interface, e);
                }
            }
        }
    }
}

async fn ingest(
    mut source: UnboundedReceiver<ServiceRecord>,
    records: Arc<Mutex<Vec<ServiceRecord>>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            record = source.next() => match record {
                Some(record) => {
                    let mut records = records.lock().expect("Record set lock poisoned");
                    if !records.contains(&record) {
                        log::debug!("Discovered {}", record.name);
                        records.push(record);
                    }
                }
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::query::MockServiceQuerier;
    use futures_util::FutureExt;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    fn interface() -> NetworkInterface {
        NetworkInterface { name: "eth0".into() }
    }

    fn record(name: &str) -> ServiceRecord {
        ServiceRecord {
            name: name.into(),
            host: "host.local.".into(),
            addr_v4: Some("192.168.1.7".parse().unwrap()),
            addr_v6: None,
            port: 80,
            info: String::new(),
        }
    }

    /// Querier whose response sink is handed to the test on the first round.
    fn capturing_querier() -> (
        MockServiceQuerier,
        Arc<Mutex<Option<UnboundedSender<ServiceRecord>>>>,
    ) {
        let slot: Arc<Mutex<Option<UnboundedSender<ServiceRecord>>>> = Arc::default();
        let captured = slot.clone();
        let mut querier = MockServiceQuerier::new();
        querier.expect_query().returning(move |_, sink| {
            *captured.lock().unwrap() = Some(sink);
            async { Ok(()) }.boxed()
        });
        (querier, slot)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn queries_fire_immediately_and_then_on_interval() {
        crate::test::init();

        let rounds = Arc::new(AtomicUsize::new(0));
        let counted = rounds.clone();
        let mut querier = MockServiceQuerier::new();
        querier
            .expect_query()
            .withf(|params, _| params.service == META_QUERY_SERVICE && params.domain == "local")
            .returning(move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }.boxed()
            });

        // When
        let mut session = QuerySession::start(querier, interface(), "local".into());

        // Then
        settle().await;
        assert_eq!(rounds.load(Ordering::SeqCst), 1, "First round is immediate");
        tokio::time::sleep(QUERY_INTERVAL).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 2);
        tokio::time::sleep(QUERY_INTERVAL).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 3);

        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_deliveries_store_one_record() {
        crate::test::init();

        let (querier, sink) = capturing_querier();
        let mut session = QuerySession::start(querier, interface(), "local".into());
        settle().await;
        let sink = sink.lock().unwrap().take().unwrap();

        // When
        for _ in 0..5 {
            sink.unbounded_send(record("A")).unwrap();
        }
        settle().await;

        // Then
        assert_eq!(session.records(), vec![record("A")]);

        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn arrival_order_is_stable_under_duplicates() {
        crate::test::init();

        let (querier, sink) = capturing_querier();
        let mut session = QuerySession::start(querier, interface(), "local".into());
        settle().await;
        let sink = sink.lock().unwrap().take().unwrap();

        // When
        for name in ["R1", "R2", "R1", "R2", "R1"] {
            sink.unbounded_send(record(name)).unwrap();
        }
        settle().await;

        // Then
        assert_eq!(session.records(), vec![record("R1"), record("R2")]);

        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_terminal() {
        crate::test::init();

        let (querier, sink) = capturing_querier();
        let mut session = QuerySession::start(querier, interface(), "local".into());
        settle().await;
        let sink = sink.lock().unwrap().take().unwrap();
        sink.unbounded_send(record("early")).unwrap();
        settle().await;

        // When
        session.stop().await;
        let _ = sink.unbounded_send(record("late"));
        settle().await;

        // Then
        assert_eq!(
            session.records(),
            vec![record("early")],
            "A record delivered after stop must never become visible"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ingestion_spans_query_rounds() {
        crate::test::init();

        let (querier, sink) = capturing_querier();
        let mut session = QuerySession::start(querier, interface(), "local".into());
        settle().await;
        let first_round = sink.lock().unwrap().take().unwrap();
        first_round.unbounded_send(record("A")).unwrap();
        drop(first_round);

        // When
        tokio::time::sleep(QUERY_INTERVAL).await;
        let second_round = sink.lock().unwrap().take().unwrap();
        second_round.unbounded_send(record("A")).unwrap();
        second_round.unbounded_send(record("B")).unwrap();
        settle().await;

        // Then
        assert_eq!(session.records(), vec![record("A"), record("B")]);

        session.stop().await;
    }
}
