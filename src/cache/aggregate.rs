//! Groups several switchable caches behind one switch.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info_span};

use super::SwitchableCache;
use super::summary::{MAX_MEMBER_SUMMARY_LEN, summarize_members};
use crate::error::Result;
use crate::observability::LOG_TARGET;

/// A named collection of caches that is enabled only when every member is.
///
/// [`enable`](SwitchableCache::enable) and [`disable`](SwitchableCache::disable)
/// are forwarded to every member in insertion order, whatever state the
/// member is in, so side effects such as directory creation happen on each
/// call. Members may themselves be aggregates. Membership graphs must not
/// contain cycles.
#[derive(Default)]
pub struct SwitchableAggregate {
    members: Vec<(String, Arc<dyn SwitchableCache>)>,
}

/// Collects members for a [`SwitchableAggregate`].
#[derive(Debug, Default)]
#[must_use = "call `build` to construct the aggregate"]
pub struct SwitchableAggregateBuilder {
    members: Vec<(String, Arc<dyn SwitchableCache>)>,
}

impl SwitchableAggregateBuilder {
    /// Adds `cache` under `name`. A repeated name replaces the earlier member
    /// in its original position.
    pub fn member<C>(mut self, name: impl Into<String>, cache: Arc<C>) -> Self
    where
        C: SwitchableCache + 'static,
    {
        insert_member(&mut self.members, name.into(), cache);
        self
    }

    /// Adds an already type-erased member.
    pub fn shared_member(
        mut self,
        name: impl Into<String>,
        cache: Arc<dyn SwitchableCache>,
    ) -> Self {
        insert_member(&mut self.members, name.into(), cache);
        self
    }

    /// Finishes the aggregate.
    #[must_use]
    pub fn build(self) -> SwitchableAggregate {
        SwitchableAggregate {
            members: self.members,
        }
    }
}

fn insert_member(
    members: &mut Vec<(String, Arc<dyn SwitchableCache>)>,
    name: String,
    cache: Arc<dyn SwitchableCache>,
) {
    if let Some(slot) = members.iter_mut().find(|(existing, _)| *existing == name) {
        slot.1 = cache;
    } else {
        members.push((name, cache));
    }
}

impl SwitchableAggregate {
    /// Creates an aggregate from `(name, cache)` pairs.
    #[must_use]
    pub fn new<I, N>(members: I) -> Self
    where
        I: IntoIterator<Item = (N, Arc<dyn SwitchableCache>)>,
        N: Into<String>,
    {
        members
            .into_iter()
            .fold(Self::builder(), |builder, (name, cache)| {
                builder.shared_member(name, cache)
            })
            .build()
    }

    /// Creates an aggregate without members, which always reports itself as
    /// enabled.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts collecting members.
    pub fn builder() -> SwitchableAggregateBuilder {
        SwitchableAggregateBuilder::default()
    }

    /// Returns the member registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn SwitchableCache>> {
        self.members
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, cache)| cache)
    }

    /// Iterates over member names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(name, cache)` pairs in insertion order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Arc<dyn SwitchableCache>)> {
        self.members.iter().map(|(name, cache)| (name.as_str(), cache))
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Reports whether the aggregate has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn span(&self, operation: &'static str) -> tracing::Span {
        let names: Vec<&str> = self.names().collect();
        let member_count = names.len();
        let members = summarize_members(&names, MAX_MEMBER_SUMMARY_LEN);
        info_span!(
            target: LOG_TARGET,
            "switchable_aggregate",
            operation,
            member_count,
            members = %members
        )
    }
}

impl SwitchableCache for SwitchableAggregate {
    fn is_enabled(&self) -> bool {
        self.members.iter().all(|(_, cache)| cache.is_enabled())
    }

    fn enable(&self) -> Result<()> {
        let span = self.span("enable");
        let _entered = span.enter();
        for (name, cache) in &self.members {
            debug!(target: LOG_TARGET, member = %name, "enabling member");
            cache.enable()?;
        }
        Ok(())
    }

    fn disable(&self) {
        let span = self.span("disable");
        let _entered = span.enter();
        for (name, cache) in &self.members {
            debug!(target: LOG_TARGET, member = %name, "disabling member");
            cache.disable();
        }
    }
}

impl fmt::Debug for SwitchableAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SwitchableAggregate(")?;
        for (index, (name, cache)) in self.members.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={cache:?}")?;
        }
        f.write_str(")")
    }
}
