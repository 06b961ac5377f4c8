// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The oracle boundary.
//!
//! The text-understanding service is somebody else's problem. What this crate
//! needs from it is one async call: given a query and the extracted corpus,
//! return snippets, "nothing relevant", or an error. Replies are normalized
//! here and only here: the `NO_MATCH_FOUND` sentinel and empty strings never
//! make it past `OracleReply::from_raw`. Everything downstream can assume a
//! snippet is a snippet.
//!
//! The executor is single-threaded, so futures are `LocalBoxFuture` and
//! implementors need not be `Send`.

use std::time::Duration;

use futures::future::{self, FutureExt, LocalBoxFuture};
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::error::OracleError;

/// Sentinel some oracles return instead of an empty list.
pub const NO_MATCH_SENTINEL: &str = "NO_MATCH_FOUND";

/// Future returned by `Oracle::ask`.
pub type OracleFuture = LocalBoxFuture<'static, Result<OracleReply, OracleError>>;

/// A normalized oracle answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "snippets", rename_all = "camelCase")]
pub enum OracleReply {
    /// Non-empty, in the oracle's relevance order.
    Snippets(Vec<String>),
    NoMatch,
}

impl OracleReply {
    /// Normalize a raw answer: `None` means "nothing relevant".
    ///
    /// Sentinels (case-insensitive, surrounding whitespace ignored) and blank
    /// snippets are dropped; if nothing is left the reply is `NoMatch`.
    pub fn from_raw<I, S>(raw: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(raw) = raw else {
            return OracleReply::NoMatch;
        };
        let snippets: Vec<String> = raw
            .into_iter()
            .map(Into::into)
            .filter(|s| {
                let trimmed = s.trim();
                !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(NO_MATCH_SENTINEL)
            })
            .collect();
        if snippets.is_empty() {
            OracleReply::NoMatch
        } else {
            OracleReply::Snippets(snippets)
        }
    }

    /// Interpret a JSON payload: an array of strings, `null`, or
    /// `{"error": "..."}`.
    pub fn from_json(value: &Value) -> Result<Self, OracleError> {
        match value {
            Value::Null => Ok(OracleReply::NoMatch),
            Value::Array(items) => {
                let strings = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            OracleError::Malformed(format!("expected a string, got {item}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(OracleReply::from_raw(Some(strings)))
            }
            Value::Object(map) => match map.get("error") {
                Some(error) => Err(OracleError::Reported(
                    error.as_str().map_or_else(|| error.to_string(), str::to_string),
                )),
                None => Err(OracleError::Malformed(
                    "object reply without an error field".into(),
                )),
            },
            other => Err(OracleError::Malformed(format!("unexpected reply {other}"))),
        }
    }

    /// Parse a JSON payload from text.
    pub fn from_json_str(json: &str) -> Result<Self, OracleError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| OracleError::Malformed(e.to_string()))?;
        Self::from_json(&value)
    }

    pub fn snippets(&self) -> &[String] {
        match self {
            OracleReply::Snippets(snippets) => snippets,
            OracleReply::NoMatch => &[],
        }
    }
}

/// The external text-understanding service.
pub trait Oracle {
    /// Ask for snippets of `content` relevant to `query`.
    fn ask(&self, query: &str, content: &str) -> OracleFuture;
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn ask(&self, query: &str, content: &str) -> OracleFuture {
        (**self).ask(query, content)
    }
}

impl<O: Oracle + ?Sized> Oracle for std::rc::Rc<O> {
    fn ask(&self, query: &str, content: &str) -> OracleFuture {
        (**self).ask(query, content)
    }
}

/// Always answers the same thing, optionally after a delay.
#[derive(Debug, Clone)]
pub struct StaticOracle {
    reply: Result<OracleReply, OracleError>,
    delay: Option<Duration>,
}

impl StaticOracle {
    pub fn new(reply: Result<OracleReply, OracleError>) -> Self {
        Self { reply, delay: None }
    }

    /// Answer with these snippets (normalized like any other reply).
    pub fn snippets<S: Into<String>>(snippets: impl IntoIterator<Item = S>) -> Self {
        Self::new(Ok(OracleReply::from_raw(Some(snippets))))
    }

    pub fn no_match() -> Self {
        Self::new(Ok(OracleReply::NoMatch))
    }

    /// Answer after `delay` (requires a tokio runtime).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Oracle for StaticOracle {
    fn ask(&self, query: &str, content: &str) -> OracleFuture {
        debug!(
            "oracle: {:?} over {} chars -> {:?}",
            query,
            content.len(),
            self.reply
        );
        let reply = self.reply.clone();
        match self.delay {
            Some(delay) => async move {
                tokio::time::sleep(delay).await;
                reply
            }
            .boxed_local(),
            None => future::ready(reply).boxed_local(),
        }
    }
}

/// Always fails.
#[derive(Debug, Clone)]
pub struct FailingOracle {
    error: OracleError,
}

impl FailingOracle {
    pub fn new(error: OracleError) -> Self {
        Self { error }
    }
}

impl Default for FailingOracle {
    fn default() -> Self {
        Self::new(OracleError::Transport("connection refused".into()))
    }
}

impl Oracle for FailingOracle {
    fn ask(&self, _query: &str, _content: &str) -> OracleFuture {
        future::ready(Err(self.error.clone())).boxed_local()
    }
}

/// Synchronous closure as an oracle. Handy for tests that inspect the request.
pub struct FnOracle<F>(pub F);

impl<F> Oracle for FnOracle<F>
where
    F: Fn(&str, &str) -> Result<OracleReply, OracleError>,
{
    fn ask(&self, query: &str, content: &str) -> OracleFuture {
        future::ready((self.0)(query, content)).boxed_local()
    }
}
