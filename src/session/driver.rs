// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The async shell around `SearchOrchestrator`.
//!
//! One task, one loop. Events come in over a channel; debounce deadlines come
//! from the orchestrator; oracle calls go into a `FuturesUnordered` and their
//! replies come back whenever they come back. Nothing is ever aborted: a reply
//! for a superseded query is simply refused by `complete`.
//!
//! Time is read from `tokio::time`, so tests can run with a paused clock.

use std::fmt;
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use tokio::sync::mpsc;

use super::{Outcome, SearchOrchestrator, Step, UiEvent};
use crate::config::SearchConfig;
use crate::error::OracleError;
use crate::oracle::{Oracle, OracleFuture, OracleReply};
use crate::tree::Document;
use crate::types::Direction;

/// How long the loop sleeps when no deadline is pending.
const IDLE_WAKE: Duration = Duration::from_secs(3600);

type Reply = (u64, Result<OracleReply, OracleError>);
type InFlight = FuturesUnordered<LocalBoxFuture<'static, Reply>>;

/// Input to the driver loop.
pub enum DriverEvent {
    /// The query box changed; runs after the query debounce.
    Query(String),
    /// Run this query now (e.g. Enter was pressed).
    Submit(String),
    Navigate(Direction),
    /// A host mutation; re-runs the session after the mutation debounce.
    Mutate(Box<dyn FnOnce(&mut Document) + Send>),
    Shutdown,
}

impl fmt::Debug for DriverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverEvent::Query(raw) => f.debug_tuple("Query").field(raw).finish(),
            DriverEvent::Submit(raw) => f.debug_tuple("Submit").field(raw).finish(),
            DriverEvent::Navigate(direction) => f.debug_tuple("Navigate").field(direction).finish(),
            DriverEvent::Mutate(_) => f.write_str("Mutate(..)"),
            DriverEvent::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// The UI side: result counts, status lines, busy state.
pub trait SearchObserver {
    fn on_event(&mut self, event: &UiEvent);

    fn on_outcome(&mut self, _outcome: &Outcome) {}
}

impl SearchObserver for Vec<UiEvent> {
    fn on_event(&mut self, event: &UiEvent) {
        self.push(event.clone());
    }
}

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Bound an oracle call by `limit`.
async fn with_timeout(ask: OracleFuture, limit: Duration) -> Result<OracleReply, OracleError> {
    match tokio::time::timeout(limit, ask).await {
        Ok(reply) => reply,
        Err(_) => Err(OracleError::Timeout(limit.as_millis() as u64)),
    }
}

/// Submit one query and see it through, oracle included.
pub async fn search_once<O: Oracle + ?Sized>(
    orchestrator: &mut SearchOrchestrator,
    oracle: &O,
    raw: &str,
    timeout: Duration,
) -> Outcome {
    match orchestrator.submit(raw, now()) {
        Step::Done(outcome) => outcome,
        Step::NeedsOracle(request) => {
            let reply = with_timeout(oracle.ask(&request.query, &request.content), timeout).await;
            orchestrator
                .complete(request.seq, reply)
                .unwrap_or(Outcome::Ignored)
        }
    }
}

/// Owns an orchestrator, an oracle, and an observer, and runs the event loop.
pub struct SearchDriver<O, S> {
    orchestrator: SearchOrchestrator,
    oracle: O,
    observer: S,
    timeout: Duration,
}

impl<O: Oracle, S: SearchObserver> SearchDriver<O, S> {
    pub fn new(orchestrator: SearchOrchestrator, oracle: O, observer: S, config: &SearchConfig) -> Self {
        Self {
            orchestrator,
            oracle,
            observer,
            timeout: config.oracle_timeout(),
        }
    }

    /// Run until `Shutdown` or the channel closes. Returns the orchestrator
    /// and the observer so callers can inspect the final state.
    pub async fn run(mut self, mut events: mpsc::Receiver<DriverEvent>) -> (SearchOrchestrator, S) {
        let mut in_flight: InFlight = FuturesUnordered::new();
        loop {
            let deadline = self.orchestrator.next_deadline();
            let wake = deadline.map_or_else(
                || tokio::time::Instant::now() + IDLE_WAKE,
                tokio::time::Instant::from_std,
            );

            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("driver: channel closed");
                        break;
                    };
                    if !self.handle(event, &mut in_flight) {
                        break;
                    }
                }
                Some((seq, reply)) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Some(outcome) = self.orchestrator.complete(seq, reply) {
                        self.observer.on_outcome(&outcome);
                    }
                }
                () = tokio::time::sleep_until(wake), if deadline.is_some() => {
                    if let Some(step) = self.orchestrator.poll(now()) {
                        self.dispatch(step, &mut in_flight);
                    }
                }
            }
            self.flush();
        }
        if !in_flight.is_empty() {
            warn!("driver: shutting down with {} oracle calls in flight", in_flight.len());
        }
        self.flush();
        (self.orchestrator, self.observer)
    }

    /// Returns `false` on shutdown.
    fn handle(&mut self, event: DriverEvent, in_flight: &mut InFlight) -> bool {
        match event {
            DriverEvent::Query(raw) => self.orchestrator.edit_query(&raw, now()),
            DriverEvent::Submit(raw) => {
                let step = self.orchestrator.submit(&raw, now());
                self.dispatch(step, in_flight);
            }
            DriverEvent::Navigate(direction) => {
                self.orchestrator.navigate(direction);
            }
            DriverEvent::Mutate(edit) => self.orchestrator.edit_document(now(), |doc| edit(doc)),
            DriverEvent::Shutdown => return false,
        }
        true
    }

    fn dispatch(&mut self, step: Step, in_flight: &mut InFlight) {
        match step {
            Step::Done(outcome) => self.observer.on_outcome(&outcome),
            Step::NeedsOracle(request) => {
                debug!("driver: oracle call #{}", request.seq);
                let seq = request.seq;
                let limit = self.timeout;
                let ask = self.oracle.ask(&request.query, &request.content);
                in_flight.push(with_timeout(ask, limit).map(move |reply| (seq, reply)).boxed_local());
            }
        }
    }

    fn flush(&mut self) {
        for event in self.orchestrator.drain_events() {
            self.observer.on_event(&event);
        }
    }
}
