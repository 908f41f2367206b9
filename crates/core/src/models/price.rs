use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single price data point (date → price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Daily closing prices for one symbol.
///
/// Invariants, enforced by every constructor:
/// - ascending by date, no duplicate dates;
/// - every price is finite and strictly positive.
///
/// Non-trading days are simply absent. Transformations return new series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw provider points.
    ///
    /// Points are sorted, non-finite or non-positive prices are dropped, and
    /// when a date occurs more than once the last occurrence wins.
    pub fn from_points(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.price.is_finite() && p.price > 0.0)
            .collect();
        // Stable sort keeps provider order among equal dates.
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            symbol: symbol.into().to_uppercase(),
            points: deduped,
        }
    }

    /// Convenience: build from `(date, price)` pairs.
    pub fn from_pairs(symbol: impl Into<String>, pairs: &[(NaiveDate, f64)]) -> Self {
        let points = pairs
            .iter()
            .map(|&(date, price)| PricePoint { date, price })
            .collect();
        Self::from_points(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Price on an exact date. Uses binary search (O(log n)).
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].price)
    }

    /// The sub-series on or after `start`.
    #[must_use]
    pub fn since(&self, start: NaiveDate) -> Self {
        let idx = self
            .points
            .binary_search_by_key(&start, |p| p.date)
            .unwrap_or_else(|pos| pos);
        Self {
            symbol: self.symbol.clone(),
            points: self.points[idx..].to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

/// Cache key: the sorted, de-duplicated ticker set plus the window length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbols: Vec<String>,
    window_days: i64,
}

impl CacheKey {
    pub fn new<S: AsRef<str>>(symbols: &[S], window_days: i64) -> Self {
        let mut symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .collect();
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            window_days,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }
}

/// Result of one batched fetch: symbol → series, `None` when nothing usable came back.
pub type FetchResult = HashMap<String, Option<PriceSeries>>;

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    data: FetchResult,
}

/// Short-lived in-memory cache of batched fetch results.
///
/// Entries expire `ttl` after they were stored; nothing is persisted.
/// Owned by the caller of the engines (the `Dashboard` facade), never by the engines.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached result for `key`, if it is still fresh at `now`.
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<&FetchResult> {
        self.entries
            .get(key)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| &entry.data)
    }

    pub fn insert(&mut self, key: CacheKey, data: FetchResult, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                fetched_at: now,
                data,
            },
        );
    }

    /// Remove all entries that are stale at `now`.
    /// Returns the number of entries removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.fetched_at < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(Duration::hours(1))
    }
}
