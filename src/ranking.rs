//! POI Filter/Ranker
//!
//! Turns raw dataset records into a list of exportable points ordered by
//! their distance to the nearest reference point. A record survives when at
//! least one reference point lies within its threshold and, if an icon
//! allow-list is configured, its icon file name is on that list.

use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::config::{FilterConfig, KravinkaConfig, LinksConfig};
use crate::models::{Coordinates, PoiItem, PoiRecord, RawPoiRecord, ReferencePoint};

/// Items kept in non-decreasing order of `min_dist_km`.
///
/// Items with equal distance keep the order in which they were collected.
#[derive(Debug, Clone, Default)]
pub struct RankedList {
    items: Vec<PoiItem>,
}

impl RankedList {
    /// Rank items collected in dataset order with a single stable sort
    #[must_use]
    pub fn from_items(mut items: Vec<PoiItem>) -> Self {
        items.sort_by(|a, b| a.min_dist_km.total_cmp(&b.min_dist_km));
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoiItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PoiItem] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a PoiItem;
    type IntoIter = std::slice::Iter<'a, PoiItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Per-run counters, one bucket per record outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingStats {
    pub seen: usize,
    pub malformed: usize,
    pub out_of_range: usize,
    pub icon_rejected: usize,
    pub accepted: usize,
}

/// Result of checking one record against every reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Distance to the closest reference point
    pub min_dist_km: f64,
    /// Some reference point has the record inside its threshold
    pub within_threshold: bool,
}

/// What happened to a single validated record
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(PoiItem),
    OutOfRange,
    IconRejected(PoiItem),
}

/// Applies the proximity and icon filters and builds the ranked list
pub struct PoiRanker<'a> {
    reference_points: &'a [ReferencePoint],
    icon_allow_list: Option<&'a BTreeSet<String>>,
    append_detail_link: bool,
    links: &'a LinksConfig,
}

impl<'a> PoiRanker<'a> {
    #[must_use]
    pub fn new(filter: &'a FilterConfig, links: &'a LinksConfig) -> Self {
        Self {
            reference_points: &filter.reference_points,
            icon_allow_list: filter.icon_allow_list.as_ref(),
            append_detail_link: filter.append_detail_link,
            links,
        }
    }

    #[must_use]
    pub fn from_config(config: &'a KravinkaConfig) -> Self {
        Self::new(&config.filter, &config.links)
    }

    /// Distance to the nearest reference point and whether any threshold is met.
    ///
    /// The nearest distance is taken over all reference points, not only
    /// the ones whose threshold is satisfied. On equal distances the later
    /// reference point wins.
    #[must_use]
    pub fn proximity(&self, target: &Coordinates) -> Proximity {
        let mut min_dist_km = -1.0;
        let mut within_threshold = false;

        for reference in self.reference_points {
            let dist = reference.distance_to(target);

            if reference.accepts(dist) {
                within_threshold = true;
            }

            if min_dist_km < 0.0 || dist <= min_dist_km {
                min_dist_km = dist;
            }
        }

        Proximity {
            min_dist_km,
            within_threshold,
        }
    }

    /// Whether an icon token passes the allow-list; no list accepts everything
    #[must_use]
    pub fn icon_allowed(&self, icon_token: &str) -> bool {
        self.icon_allow_list
            .is_none_or(|allowed| allowed.contains(icon_token))
    }

    /// Run both filters on one record
    #[must_use]
    pub fn evaluate(&self, record: PoiRecord) -> Verdict {
        let proximity = self.proximity(&record.coordinates);
        if !proximity.within_threshold {
            return Verdict::OutOfRange;
        }

        let mut item = PoiItem::from_record(
            record,
            proximity.min_dist_km,
            self.links,
            self.append_detail_link,
        );

        if !self.icon_allowed(&item.icon_token) {
            item.is_valid = false;
            return Verdict::IconRejected(item);
        }

        Verdict::Accepted(item)
    }

    /// Filter and rank a full listing. Malformed records are logged and skipped.
    pub fn rank<I>(&self, records: I) -> (RankedList, RankingStats)
    where
        I: IntoIterator<Item = Value>,
    {
        let mut accepted = Vec::new();
        let mut stats = RankingStats::default();

        for value in records {
            stats.seen += 1;

            let record = match RawPoiRecord::from_value(value).and_then(|raw| raw.validate()) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping record #{}: {}", stats.seen, e);
                    stats.malformed += 1;
                    continue;
                }
            };

            match self.evaluate(record) {
                Verdict::Accepted(item) => {
                    stats.accepted += 1;
                    accepted.push(item);
                }
                Verdict::OutOfRange => stats.out_of_range += 1,
                Verdict::IconRejected(item) => {
                    debug!("Icon '{}' of #{} is not allowed", item.icon_token, item.id);
                    stats.icon_rejected += 1;
                }
            }
        }

        (RankedList::from_items(accepted), stats)
    }
}
