//! Grouping of street ways into per-network multi-lines.
//!
//! Ways that share a [`GroupKey`] belong to one network and are collapsed
//! together, so the two carriageways of a divided road merge into one
//! centerline.

use crate::multiline::MultiLine;
use crate::primitives::Point2;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Identifies the network a way belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// A named street, optionally split by highway classification.
    Street {
        /// Street name as tagged.
        name: String,
        /// Highway classification, `None` when ignored or untagged.
        highway: Option<String>,
    },
    /// A numbered route relation.
    Route {
        /// Route network, e.g. `US:I`.
        network: String,
        /// Route number within the network.
        reference: String,
        /// Variant such as `Business`, empty for the main route.
        modifier: String,
    },
}

/// Whether the highway tag splits streets that share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreetKeyPolicy {
    /// "Main St" primary and "Main St" secondary are separate networks.
    #[default]
    UseHighway,
    /// Streets are grouped by name alone.
    IgnoreHighway,
}

/// Builds the key for a named street under `policy`.
///
/// # Example
///
/// ```
/// use centerline::network::{street_key, GroupKey, StreetKeyPolicy};
///
/// let key = street_key("Main St", Some("primary"), StreetKeyPolicy::IgnoreHighway);
/// assert_eq!(
///     key,
///     GroupKey::Street { name: "Main St".into(), highway: None }
/// );
/// ```
pub fn street_key(name: &str, highway: Option<&str>, policy: StreetKeyPolicy) -> GroupKey {
    let highway = match policy {
        StreetKeyPolicy::UseHighway => highway.map(str::to_owned),
        StreetKeyPolicy::IgnoreHighway => None,
    };
    GroupKey::Street {
        name: name.to_owned(),
        highway,
    }
}

/// A way: its network key and its node references in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WayRecord {
    /// Network the way is grouped into.
    pub key: GroupKey,
    /// Node ids, resolved against a node table by [`group_ways`].
    pub nodes: Vec<u64>,
}

impl WayRecord {
    /// Creates a way from its key and node ids.
    pub fn new(key: GroupKey, nodes: Vec<u64>) -> Self {
        Self { key, nodes }
    }
}

/// Resolves ways to geometry and groups them by key.
///
/// Ways with fewer than two node references are skipped. Node references
/// missing from `nodes` are dropped, and a way left with fewer than two
/// points is skipped too. Within a group, parts keep the input order.
pub fn group_ways(
    ways: &[WayRecord],
    nodes: &HashMap<u64, Point2<f64>>,
) -> BTreeMap<GroupKey, MultiLine> {
    let mut groups: BTreeMap<GroupKey, MultiLine> = BTreeMap::new();
    let mut skipped = 0;

    for way in ways {
        if way.nodes.len() < 2 {
            skipped += 1;
            continue;
        }
        let points: Vec<Point2<f64>> = way
            .nodes
            .iter()
            .filter_map(|id| nodes.get(id))
            .copied()
            .collect();
        if points.len() < 2 {
            skipped += 1;
            continue;
        }
        groups.entry(way.key.clone()).or_default().push(points);
    }

    debug!(
        "grouped {} ways into {} networks, skipped {}",
        ways.len(),
        groups.len(),
        skipped
    );
    groups
}
