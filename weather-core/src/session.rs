//! Dashboard state shared with the presentation layer.
//!
//! Every fetch is tagged with a generation number when it starts. When it
//! finishes, its result is applied only if no newer fetch has started since,
//! so a slow stale response cannot overwrite a fresher one.

use parking_lot::RwLock;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, warn};

use crate::{aggregator::WeatherAggregator, error::WeatherError, model::WeatherSnapshot};

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request started after this one; its result was discarded.
    Stale,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub query: Option<String>,
    pub snapshot: Option<Arc<WeatherSnapshot>>,
    pub loading: bool,
    /// User-facing message for the single error state.
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct Dashboard {
    aggregator: WeatherAggregator,
    generation: AtomicU64,
    state: RwLock<DashboardState>,
}

impl Dashboard {
    pub fn new(aggregator: WeatherAggregator) -> Self {
        Self {
            aggregator,
            generation: AtomicU64::new(0),
            state: RwLock::new(DashboardState::default()),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Start a request for `query`, superseding any in flight.
    pub fn begin(&self, query: &str) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write();
        state.query = Some(query.to_string());
        state.loading = true;
        state.error = None;
        debug!(generation, query, "fetch started");
        Ticket { generation }
    }

    /// Apply a finished request unless a newer one has started.
    pub fn complete(
        &self,
        ticket: Ticket,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> Outcome {
        let mut state = self.state.write();
        let latest = self.generation.load(Ordering::SeqCst);
        if ticket.generation != latest {
            debug!(
                generation = ticket.generation,
                latest, "discarding stale weather result"
            );
            return Outcome::Stale;
        }

        state.loading = false;
        match result {
            Ok(snapshot) => {
                state.snapshot = Some(Arc::new(snapshot));
                state.error = None;
            }
            Err(err) => {
                warn!(error = %err, "weather fetch failed");
                state.snapshot = None;
                state.error = Some(err.user_message());
            }
        }
        Outcome::Applied
    }

    /// User picked a location (name or `"lat,lon"`).
    pub async fn select(&self, query: &str) -> Outcome {
        let ticket = self.begin(query);
        let result = self.aggregator.lookup(query).await;
        self.complete(ticket, result)
    }

    /// Re-run the last query. `None` when nothing has been selected yet.
    pub async fn refetch(&self) -> Option<Outcome> {
        let query = self.state.read().query.clone()?;
        Some(self.select(&query).await)
    }
}
