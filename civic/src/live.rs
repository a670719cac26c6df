//! Live activity feed.
//!
//! Activity arrives through an [`EventSource`]. The simulated sources tick
//! on a tokio interval and fabricate entries from a snapshot of issues;
//! [`ScriptedSource`] replays a fixed list and is what tests use.

use crate::types::Issue;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const DEFAULT_FEED_CAPACITY: usize = 10;

/// A pull-based stream of events.
///
/// `None` means the source is exhausted.
#[async_trait]
pub trait EventSource: Send {
    type Event: Send;

    async fn next_event(&mut self) -> Option<Self::Event>;
}

/// ScriptedSource yields a fixed sequence of events, then `None`
#[derive(Debug, Clone)]
pub struct ScriptedSource<T> {
    events: VecDeque<T>,
}

impl<T> ScriptedSource<T> {
    pub fn new(events: impl IntoIterator<Item = T>) -> Self {
        ScriptedSource {
            events: events.into_iter().collect(),
        }
    }
}

#[async_trait]
impl<T: Send> EventSource for ScriptedSource<T> {
    type Event = T;

    async fn next_event(&mut self) -> Option<T> {
        self.events.pop_front()
    }
}

/// Recent keeps the newest `capacity` items, newest first.
///
/// Pushing past capacity drops the oldest entries.
#[derive(Debug, Clone)]
pub struct Recent<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> Recent<T> {
    pub fn new(capacity: usize) -> Self {
        Recent {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds `item` at the front and returns how many entries were evicted.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push_front(item);
        let before = self.items.len();
        self.items.truncate(self.capacity);
        before - self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}

/// UpdateKind categorizes live activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    NewReport,
    StatusChange,
    Assignment,
    Resolution,
}

impl UpdateKind {
    pub const ALL: [UpdateKind; 4] = [
        UpdateKind::NewReport,
        UpdateKind::StatusChange,
        UpdateKind::Assignment,
        UpdateKind::Resolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::NewReport => "new_report",
            UpdateKind::StatusChange => "status_change",
            UpdateKind::Assignment => "assignment",
            UpdateKind::Resolution => "resolution",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// LiveUpdate is one entry of the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveUpdate {
    pub id: String,
    pub kind: UpdateKind,
    pub issue_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LiveUpdate {
    pub fn new(id: String, kind: UpdateKind, issue: &Issue, timestamp: DateTime<Utc>) -> Self {
        let message = match kind {
            UpdateKind::NewReport => format!("New {} reported", issue.category),
            UpdateKind::StatusChange => format!("Issue status updated to {}", issue.status),
            UpdateKind::Assignment => format!(
                "Issue assigned to {}",
                issue
                    .assigned_to
                    .as_ref()
                    .map(|a| a.name.as_str())
                    .unwrap_or("staff member")
            ),
            UpdateKind::Resolution => "Issue marked as resolved".to_string(),
        };
        LiveUpdate {
            id,
            kind,
            issue_id: issue.id.clone(),
            message,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LiveStats {
    pub updates_seen: usize,
    pub reports_today: usize,
}

/// LiveFeed holds the recent updates and running counters
#[derive(Debug, Clone)]
pub struct LiveFeed {
    updates: Recent<LiveUpdate>,
    stats: LiveStats,
    paused: bool,
}

impl LiveFeed {
    pub fn new(capacity: usize) -> Self {
        LiveFeed {
            updates: Recent::new(capacity),
            stats: LiveStats::default(),
            paused: false,
        }
    }

    pub fn record(&mut self, update: LiveUpdate) {
        self.stats.updates_seen += 1;
        if update.kind == UpdateKind::NewReport {
            self.stats.reports_today += 1;
        }
        let evicted = self.updates.push(update);
        if evicted > 0 {
            debug!("live feed full, dropped {} oldest update(s)", evicted);
        }
    }

    /// Pulls up to `max` events from `source` and records them.
    ///
    /// Returns the number recorded; nothing is pulled while paused.
    pub async fn pump<S>(&mut self, source: &mut S, max: usize) -> usize
    where
        S: EventSource<Event = LiveUpdate>,
    {
        let mut recorded = 0;
        while !self.paused && recorded < max {
            match source.next_event().await {
                Some(update) => {
                    self.record(update);
                    recorded += 1;
                }
                None => break,
            }
        }
        recorded
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_live(&self) -> bool {
        !self.paused
    }

    pub fn updates(&self) -> impl Iterator<Item = &LiveUpdate> {
        self.updates.iter()
    }

    pub fn stats(&self) -> LiveStats {
        self.stats
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

/// A tokio interval that starts one period from its first use.
pub(crate) struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub(crate) fn new(period: Duration) -> Self {
        Ticker {
            period,
            interval: None,
        }
    }

    pub(crate) async fn tick(&mut self) {
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}

/// SimulatedFeed fabricates one update per tick from random issues
pub struct SimulatedFeed {
    issues: Vec<Issue>,
    rng: StdRng,
    ticker: Ticker,
    seq: u64,
}

impl SimulatedFeed {
    pub fn new(issues: Vec<Issue>, period: Duration, seed: u64) -> Self {
        SimulatedFeed {
            issues,
            rng: StdRng::seed_from_u64(seed),
            ticker: Ticker::new(period),
            seq: 0,
        }
    }
}

#[async_trait]
impl EventSource for SimulatedFeed {
    type Event = LiveUpdate;

    async fn next_event(&mut self) -> Option<LiveUpdate> {
        if self.issues.is_empty() {
            return None;
        }
        self.ticker.tick().await;

        let kind = UpdateKind::ALL[self.rng.gen_range(0..UpdateKind::ALL.len())];
        let issue = &self.issues[self.rng.gen_range(0..self.issues.len())];
        self.seq += 1;
        Some(LiveUpdate::new(format!("update-{}", self.seq), kind, issue, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed;

    fn update(n: usize, kind: UpdateKind) -> LiveUpdate {
        let issue = &seed::issues()[n % 3];
        LiveUpdate::new(format!("u{n}"), kind, issue, Utc::now())
    }

    #[test]
    fn recent_drops_oldest_past_capacity() {
        let mut recent = Recent::new(3);
        for n in 0..3 {
            assert_eq!(recent.push(n), 0);
        }
        assert_eq!(recent.push(3), 1);
        let items: Vec<i32> = recent.iter().copied().collect();
        assert_eq!(items, [3, 2, 1]);
    }

    #[test]
    fn messages_follow_issue_fields() {
        let issues = seed::issues();
        let now = Utc::now();
        assert_eq!(
            LiveUpdate::new("a".into(), UpdateKind::NewReport, &issues[0], now).message,
            "New pothole reported"
        );
        assert_eq!(
            LiveUpdate::new("b".into(), UpdateKind::StatusChange, &issues[1], now).message,
            "Issue status updated to in-progress"
        );
        assert_eq!(
            LiveUpdate::new("c".into(), UpdateKind::Assignment, &issues[0], now).message,
            "Issue assigned to staff member"
        );
        assert_eq!(
            LiveUpdate::new("d".into(), UpdateKind::Assignment, &issues[1], now).message,
            "Issue assigned to Aalekh Chaudhary"
        );
    }

    #[tokio::test]
    async fn pump_records_scripted_updates_and_caps_feed() {
        let kinds = [UpdateKind::NewReport, UpdateKind::Resolution];
        let mut source = ScriptedSource::new((0..12).map(|n| update(n, kinds[n % 2])));
        let mut feed = LiveFeed::default();

        assert_eq!(feed.pump(&mut source, 100).await, 12);
        assert_eq!(feed.updates().count(), DEFAULT_FEED_CAPACITY);
        assert_eq!(feed.updates().next().map(|u| u.id.as_str()), Some("u11"));
        assert_eq!(feed.stats(), LiveStats { updates_seen: 12, reports_today: 6 });
        assert_eq!(feed.pump(&mut source, 100).await, 0);
    }

    #[tokio::test]
    async fn paused_feed_pulls_nothing() {
        let mut source = ScriptedSource::new(vec![update(0, UpdateKind::NewReport)]);
        let mut feed = LiveFeed::new(5);
        feed.pause();
        assert!(!feed.is_live());
        assert_eq!(feed.pump(&mut source, 1).await, 0);
        feed.resume();
        assert_eq!(feed.pump(&mut source, 1).await, 1);
    }

    #[tokio::test]
    async fn simulated_feed_is_deterministic_per_seed() {
        let period = Duration::from_millis(1);
        let mut a = SimulatedFeed::new(seed::issues(), period, 7);
        let mut b = SimulatedFeed::new(seed::issues(), period, 7);
        for _ in 0..5 {
            let x = a.next_event().await.unwrap();
            let y = b.next_event().await.unwrap();
            assert_eq!((x.id, x.kind, x.issue_id), (y.id, y.kind, y.issue_id));
        }
    }

    #[tokio::test]
    async fn simulated_feed_without_issues_is_exhausted() {
        let mut feed = SimulatedFeed::new(Vec::new(), Duration::from_millis(1), 1);
        assert!(feed.next_event().await.is_none());
    }
}
