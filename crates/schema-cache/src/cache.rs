//! Per-scope schema state with request coalescing.

use crate::entry::{SchemaEntry, SchemaOrigin};
use crate::{Result, SchemaError};
use futures::future::{BoxFuture, FutureExt, Shared};
use graphql_config::{LanguageSettings, ResolvedSource, ScopeConfig, ScopeKey, ScopeMatcher};
use graphql_introspect::{
    introspection_value_to_sdl, schema_payload_to_sdl, FetchOptions, SchemaTransport,
};
use graphql_types::DocumentUri;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<SchemaEntry>>>>;

enum SlotState {
    Ready(Arc<SchemaEntry>),
    Failed { error: SchemaError, at: Instant },
}

struct InFlight {
    generation: u64,
    future: SharedFetch,
}

/// State of one scope. `generation` is the only fetch allowed to write.
#[derive(Default)]
struct Slot {
    state: Option<SlotState>,
    in_flight: Option<InFlight>,
    generation: u64,
}

/// Settings together with their compiled document patterns.
struct Configuration {
    settings: Arc<LanguageSettings>,
    matcher: ScopeMatcher,
}

impl Configuration {
    fn new(settings: LanguageSettings) -> Arc<Self> {
        let matcher = ScopeMatcher::new(&settings);
        Arc::new(Self {
            settings: Arc::new(settings),
            matcher,
        })
    }
}

struct CacheInner {
    transport: Option<Arc<dyn SchemaTransport>>,
    configuration: RwLock<Arc<Configuration>>,
    slots: Mutex<HashMap<ScopeKey, Slot>>,
    next_generation: AtomicU64,
}

/// Schema entries keyed by scope.
///
/// - Entries are created lazily by [`get_schema`](Self::get_schema).
/// - Concurrent requests for the same scope share one fetch.
/// - Transport failures are remembered for the negative cache TTL; schema
///   build failures until reload, invalidation or reconfiguration.
/// - Every fetch carries a generation; only the newest fetch of a scope may
///   store its result.
///
/// The slot map lock is never held across an `.await`. Cloning is cheap and
/// clones share state.
#[derive(Clone)]
pub struct SchemaCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("has_transport", &self.inner.transport.is_some())
            .field("scopes", &self.inner.slots.lock().len())
            .finish_non_exhaustive()
    }
}

impl SchemaCache {
    /// Create a cache. Without a transport, URL scopes fail with
    /// [`SchemaError::TransportUnavailable`].
    #[must_use]
    pub fn new(settings: LanguageSettings, transport: Option<Arc<dyn SchemaTransport>>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                transport,
                configuration: RwLock::new(Configuration::new(settings)),
                slots: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> Arc<LanguageSettings> {
        Arc::clone(&self.inner.configuration.read().settings)
    }

    /// Scope serving `uri` under the current settings.
    #[must_use]
    pub fn scope_for(&self, uri: &DocumentUri) -> ScopeKey {
        self.inner.configuration.read().matcher.scope_for(uri)
    }

    /// Cached entry, cached failure, joined fetch or new fetch, in that order.
    #[tracing::instrument(skip(self), fields(scope = %scope))]
    pub async fn get_schema(&self, scope: &ScopeKey) -> Result<Arc<SchemaEntry>> {
        let fetch = {
            let ttl = self.settings().negative_cache_ttl();
            let mut slots = self.inner.slots.lock();
            let slot = slots.entry(scope.clone()).or_default();

            match &slot.state {
                Some(SlotState::Ready(entry)) => return Ok(Arc::clone(entry)),
                Some(SlotState::Failed { error, at }) => {
                    if !error.is_retryable() || at.elapsed() < ttl {
                        tracing::debug!(error = %error, "Serving cached schema failure");
                        return Err(error.clone());
                    }
                    tracing::debug!("Negative cache entry expired, refetching");
                }
                None => {}
            }

            if let Some(in_flight) = &slot.in_flight {
                tracing::debug!(generation = in_flight.generation, "Joining in-flight fetch");
                in_flight.future.clone()
            } else {
                self.start_fetch(scope, slot)
            }
        };

        fetch.await
    }

    /// Refetch regardless of cached state.
    ///
    /// Supersedes any fetch in flight. On failure the previous entry, if any,
    /// stays in place and the error is returned.
    #[tracing::instrument(skip(self), fields(scope = %scope))]
    pub async fn reload(&self, scope: &ScopeKey) -> Result<Arc<SchemaEntry>> {
        let fetch = {
            let mut slots = self.inner.slots.lock();
            let slot = slots.entry(scope.clone()).or_default();
            self.start_fetch(scope, slot)
        };

        let result = fetch.await;
        match &result {
            Ok(entry) => tracing::info!(generation = entry.generation, "Schema reloaded"),
            Err(e) => tracing::warn!(error = %e, "Schema reload failed"),
        }
        result
    }

    /// Forget everything about `scope`. A fetch still in flight completes for
    /// its waiters but is not stored.
    pub fn invalidate(&self, scope: &ScopeKey) {
        if self.inner.slots.lock().remove(scope).is_some() {
            tracing::debug!(scope = %scope, "Invalidated schema scope");
        }
    }

    /// The cached entry, without any I/O.
    #[must_use]
    pub fn peek(&self, scope: &ScopeKey) -> Option<Arc<SchemaEntry>> {
        match self.inner.slots.lock().get(scope)?.state.as_ref()? {
            SlotState::Ready(entry) => Some(Arc::clone(entry)),
            SlotState::Failed { .. } => None,
        }
    }

    /// The cached failure for `scope`, if it has no entry.
    #[must_use]
    pub fn peek_error(&self, scope: &ScopeKey) -> Option<SchemaError> {
        match self.inner.slots.lock().get(scope)?.state.as_ref()? {
            SlotState::Failed { error, .. } => Some(error.clone()),
            SlotState::Ready(_) => None,
        }
    }

    /// Returns `true` while a fetch for `scope` has not completed.
    #[must_use]
    pub fn is_fetching(&self, scope: &ScopeKey) -> bool {
        self.inner
            .slots
            .lock()
            .get(scope)
            .is_some_and(|slot| slot.in_flight.is_some())
    }

    /// Replace the settings and evict every scope whose configuration changed.
    ///
    /// Returns the evicted scopes.
    pub fn configure(&self, settings: LanguageSettings) -> Vec<ScopeKey> {
        let configuration = Configuration::new(settings);
        let new = Arc::clone(&configuration.settings);
        let old = {
            let mut current = self.inner.configuration.write();
            std::mem::replace(&mut *current, configuration)
        };
        self.invalidate_changed(&old.settings, &new)
    }

    /// Evict scopes whose configuration differs between `old` and `new`.
    pub fn invalidate_changed(&self, old: &LanguageSettings, new: &LanguageSettings) -> Vec<ScopeKey> {
        let changed = old.changed_scopes(new);
        let mut slots = self.inner.slots.lock();
        for scope in &changed {
            slots.remove(scope);
        }
        if !changed.is_empty() {
            tracing::info!(scopes = ?changed, "Evicted schema scopes after configuration change");
        }
        changed
    }

    /// Start a fetch for `scope` and register it as the slot's current one.
    /// Must be called with the slot lock held.
    fn start_fetch(&self, scope: &ScopeKey, slot: &mut Slot) -> SharedFetch {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let config = self.settings().scope_config(scope);
        let transport = self.inner.transport.clone();
        let weak: Weak<CacheInner> = Arc::downgrade(&self.inner);
        let scope = scope.clone();

        tracing::debug!(scope = %scope, generation, "Starting schema fetch");

        let future = async move {
            let result = load_entry(transport, config, scope.clone(), generation).await;
            if let Some(inner) = weak.upgrade() {
                inner.store(&scope, generation, &result);
            }
            result
        }
        .boxed()
        .shared();

        slot.generation = generation;
        slot.in_flight = Some(InFlight {
            generation,
            future: future.clone(),
        });
        future
    }
}

impl CacheInner {
    fn store(&self, scope: &ScopeKey, generation: u64, result: &Result<Arc<SchemaEntry>>) {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get_mut(scope) else {
            tracing::debug!(scope = %scope, generation, "Scope invalidated during fetch, discarding result");
            return;
        };
        if slot.generation != generation {
            tracing::debug!(
                scope = %scope,
                generation,
                current = slot.generation,
                "Superseded fetch, discarding result"
            );
            return;
        }

        slot.in_flight = None;
        match result {
            Ok(entry) => slot.state = Some(SlotState::Ready(Arc::clone(entry))),
            Err(error) => {
                if matches!(slot.state, Some(SlotState::Ready(_))) {
                    tracing::debug!(scope = %scope, "Keeping previous schema after failed fetch");
                } else {
                    slot.state = Some(SlotState::Failed {
                        error: error.clone(),
                        at: Instant::now(),
                    });
                }
            }
        }
    }
}

/// Resolve, fetch, normalise and build one scope's schema.
async fn load_entry(
    transport: Option<Arc<dyn SchemaTransport>>,
    config: Option<ScopeConfig>,
    scope: ScopeKey,
    generation: u64,
) -> Result<Arc<SchemaEntry>> {
    let Some(config) = config else {
        return Err(SchemaError::NotConfigured(scope));
    };

    let (origin, source, sdl) = match &config.source {
        ResolvedSource::Sdl(sdl) => {
            let normalised = schema_payload_to_sdl(sdl).map_err(|e| SchemaError::Parse(e.to_string()))?;
            (SchemaOrigin::Inline, sdl.clone(), normalised)
        }
        ResolvedSource::Introspection(value) => {
            let normalised =
                introspection_value_to_sdl(value).map_err(|e| SchemaError::Parse(e.to_string()))?;
            (SchemaOrigin::Inline, value.to_string(), normalised)
        }
        ResolvedSource::Url(url) => {
            let transport = match transport {
                Some(transport) if config.requests_enabled => transport,
                _ => return Err(SchemaError::TransportUnavailable(url.clone())),
            };
            let options = FetchOptions::new(config.method, config.headers.clone());
            let started = Instant::now();
            let payload = transport.fetch_schema_source(url, &options).await?;
            tracing::debug!(
                url = %url,
                bytes = payload.len(),
                elapsed_ms = duration_ms(started.elapsed()),
                "Fetched schema payload"
            );
            let normalised =
                schema_payload_to_sdl(&payload).map_err(|e| SchemaError::Parse(e.to_string()))?;
            let origin = SchemaOrigin::Remote {
                url: url.clone(),
                headers: config.headers.clone(),
                method: config.method,
            };
            (origin, payload, normalised)
        }
    };

    let entry = SchemaEntry::from_sdl(scope, origin, source, sdl, generation)?;
    tracing::debug!(
        types = entry.schema.types.len(),
        generation,
        "Built schema"
    );
    Ok(Arc::new(entry))
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
