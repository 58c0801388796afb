//! Co-occurrence analytics over the event log.
//!
//! Everything here is a pure fold over a slice of events: no state survives
//! between calls, and both halves of [`stats`] read the same slice so they
//! always agree with each other.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::event::Event;

// ─── Output types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCount {
  pub item_id: String,
  pub count:   u64,
}

/// Two distinct items seen together for the same user; `a < b` always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
  pub a:     String,
  pub b:     String,
  pub count: u64,
}

/// The payload served by `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub top_items: Vec<ItemCount>,
  pub pairs:     Vec<PairCount>,
}

// ─── Tally ───────────────────────────────────────────────────────────────────

/// Counter that remembers first-seen order so ties sort deterministically.
struct Tally<K> {
  slots:  HashMap<K, usize>,
  counts: Vec<(K, u64)>,
}

impl<K: Hash + Eq + Clone> Tally<K> {
  fn new() -> Self {
    Self { slots: HashMap::new(), counts: Vec::new() }
  }

  fn bump(&mut self, key: K) {
    match self.slots.get(&key) {
      Some(&slot) => self.counts[slot].1 += 1,
      None => {
        self.slots.insert(key.clone(), self.counts.len());
        self.counts.push((key, 1));
      }
    }
  }

  /// Highest counts first; `sort_by` is stable so ties keep first-seen order.
  fn into_top(self, n: usize) -> Vec<(K, u64)> {
    let mut counts = self.counts;
    counts.sort_by(|x, y| y.1.cmp(&x.1));
    counts.truncate(n);
    counts
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// The item id of an event that counts toward analytics, if any.
fn tracked_item(event: &Event) -> Option<&str> {
  if !event.kind.is_tracked() {
    return None;
  }
  event.item_id.as_deref()
}

/// The `n` most frequent items across all tracked events.
pub fn top_items(events: &[Event], n: usize) -> Vec<ItemCount> {
  let mut tally = Tally::new();
  for item in events.iter().filter_map(tracked_item) {
    tally.bump(item);
  }
  tally
    .into_top(n)
    .into_iter()
    .map(|(item, count)| ItemCount { item_id: item.to_owned(), count })
    .collect()
}

/// The `n` most frequent unordered item pairs that share a user.
///
/// Each user contributes at most one count per pair no matter how often they
/// touched either item. Events without a user id are left out: there is no
/// way to tell two anonymous sessions apart.
pub fn top_pairs(events: &[Event], n: usize) -> Vec<PairCount> {
  let mut users: HashMap<&str, usize> = HashMap::new();
  let mut baskets: Vec<Vec<&str>> = Vec::new();
  let mut seen: HashSet<(&str, &str)> = HashSet::new();

  for event in events {
    let (Some(user), Some(item)) = (event.user_id.as_deref(), tracked_item(event))
    else {
      continue;
    };
    let slot = *users.entry(user).or_insert_with(|| {
      baskets.push(Vec::new());
      baskets.len() - 1
    });
    if seen.insert((user, item)) {
      baskets[slot].push(item);
    }
  }

  let mut tally = Tally::new();
  for basket in &baskets {
    for (i, &x) in basket.iter().enumerate() {
      for &y in &basket[i + 1..] {
        tally.bump(if x < y { (x, y) } else { (y, x) });
      }
    }
  }

  tally
    .into_top(n)
    .into_iter()
    .map(|((a, b), count)| PairCount { a: a.to_owned(), b: b.to_owned(), count })
    .collect()
}

/// Both rankings computed from one snapshot of events.
pub fn stats(events: &[Event], n: usize) -> Stats {
  Stats {
    top_items: top_items(events, n),
    pairs:     top_pairs(events, n),
  }
}
