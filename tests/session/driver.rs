use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;

use glint::oracle::OracleFuture;
use glint::{
    search_once, Direction, DriverEvent, FailingOracle, Oracle, OracleReply, Outcome,
    SearchConfig, SearchDriver, SearchMode, SearchObserver, SearchOrchestrator, StaticOracle,
    StatusKind, UiEvent,
};

use crate::common::{article_page, fixture};

/// Records what the UI would have been told.
#[derive(Default)]
struct Recorder {
    events: Vec<UiEvent>,
    outcomes: Vec<Outcome>,
}

impl SearchObserver for Recorder {
    fn on_event(&mut self, event: &UiEvent) {
        self.events.push(event.clone());
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        self.outcomes.push(outcome.clone());
    }
}

fn last_status(events: &[UiEvent]) -> Option<(&str, StatusKind)> {
    events.iter().rev().find_map(|e| match e {
        UiEvent::Status { text, kind } => Some((text.as_str(), *kind)),
        _ => None,
    })
}

/// Answers "first" slowly and everything else quickly.
struct Staggered;

impl Oracle for Staggered {
    fn ask(&self, query: &str, _content: &str) -> OracleFuture {
        let (delay, snippet) = if query == "first" {
            (200, "three bus routes")
        } else {
            (10, "light rail line")
        };
        async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(OracleReply::Snippets(vec![snippet.to_string()]))
        }
        .boxed_local()
    }
}

#[tokio::test(start_paused = true)]
async fn test_late_reply_for_superseded_query_is_ignored() {
    let config = SearchConfig::default();
    let orch = SearchOrchestrator::new(article_page(), &config);
    let driver = SearchDriver::new(orch, Staggered, Recorder::default(), &config);
    let (tx, rx) = mpsc::channel(8);

    let feeder = async move {
        tx.send(DriverEvent::Submit("/first".into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(DriverEvent::Submit("/second".into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(DriverEvent::Shutdown).await.unwrap();
    };
    let ((orch, recorder), ()) = tokio::join!(driver.run(rx), feeder);

    assert_eq!(orch.highlights().total(), 1);
    assert_eq!(orch.highlights().matches().next().unwrap().text(), "light rail line");
    // the first reply landed after the second and produced nothing
    assert_eq!(
        recorder.outcomes,
        vec![Outcome::Matches {
            mode: SearchMode::ForcedSemantic,
            count: 1
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_surfaces_error_for_forced_semantic() {
    let config = SearchConfig {
        oracle_timeout_ms: 100,
        ..SearchConfig::default()
    };
    let oracle = StaticOracle::snippets(["light rail line"]).with_delay(Duration::from_secs(10));
    let orch = SearchOrchestrator::new(article_page(), &config);
    let driver = SearchDriver::new(orch, oracle, Recorder::default(), &config);
    let (tx, rx) = mpsc::channel(8);

    let feeder = async move {
        tx.send(DriverEvent::Submit("/trains".into())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(DriverEvent::Shutdown).await.unwrap();
    };
    let ((orch, recorder), ()) = tokio::join!(driver.run(rx), feeder);

    assert_eq!(orch.highlights().total(), 0);
    assert_eq!(
        last_status(&recorder.events),
        Some(("Search error, try again", StatusKind::Error))
    );
    assert!(matches!(recorder.outcomes.last(), Some(Outcome::Failed { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_through_driver() {
    let config = SearchConfig::default();
    let orch = SearchOrchestrator::new(fixture("budget_page.json"), &config);
    let driver = SearchDriver::new(orch, StaticOracle::no_match(), Vec::new(), &config);
    let (tx, rx) = mpsc::channel(8);

    let feeder = async move {
        tx.send(DriverEvent::Submit("'budget".into())).await.unwrap();
        tx.send(DriverEvent::Navigate(Direction::Next)).await.unwrap();
        tx.send(DriverEvent::Navigate(Direction::Next)).await.unwrap();
        tx.send(DriverEvent::Shutdown).await.unwrap();
    };
    let ((orch, events), ()) = tokio::join!(driver.run(rx), feeder);

    assert_eq!(orch.position().current, Some(2));
    assert_eq!(
        events.last(),
        Some(&UiEvent::ResultCount {
            current: Some(2),
            total: 3
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_closed_channel_stops_driver() {
    let config = SearchConfig::default();
    let orch = SearchOrchestrator::new(article_page(), &config);
    let driver = SearchDriver::new(orch, StaticOracle::no_match(), Vec::new(), &config);
    let (tx, rx) = mpsc::channel::<DriverEvent>(1);
    drop(tx);

    let (orch, events) = driver.run(rx).await;
    assert!(events.is_empty());
    assert!(orch.session().is_none());
}

#[tokio::test]
async fn test_search_once_with_failing_oracle_in_progressive_mode() {
    let config = SearchConfig::default();
    let mut orch = SearchOrchestrator::new(article_page(), &config);
    let outcome = search_once(&mut orch, &FailingOracle::default(), "monorail", config.oracle_timeout()).await;
    assert_eq!(
        outcome,
        Outcome::NoMatch {
            mode: SearchMode::Progressive
        }
    );
}
