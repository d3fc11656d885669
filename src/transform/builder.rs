use crate::config::{Config, SortOrder};
use crate::model::{Dataset, Hierarchy, Link, NodeId};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::aggregate::{Metric, aggregate};
use super::groups::GroupColumns;
use super::TransformError;

/// Build the two-level cluster hierarchy: root, one node per group column,
/// and one value-carrying leaf per distinct value of that column.
///
/// Leaves are sorted by aggregate value and group nodes by key, both with
/// the configured direction. `SortOrder::None` preserves encounter order;
/// sorts are stable, so ties keep it too.
pub fn build_hierarchy(
    dataset: &Dataset,
    config: &Config,
    groups: &GroupColumns,
) -> Result<Hierarchy, TransformError> {
    let metric = Metric::from_column(config.metric_column.as_deref());

    let mut group_names: Vec<&str> = groups.names().iter().map(String::as_str).collect();
    sort_with(&mut group_names, config.sort, |a, b| a.cmp(b));

    let mut hierarchy = Hierarchy::new();
    for name in group_names {
        let mut entries = aggregate(&[name], dataset, &metric)?;
        sort_with(&mut entries, config.sort, |a, b| a.value.cmp(&b.value));

        let display = config
            .display_names
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string());
        let group_id = hierarchy.add_child(Hierarchy::ROOT, name.to_string(), display, None);

        for entry in entries {
            let key = entry.key();
            hierarchy.add_child(group_id, key.clone(), key, Some(entry.value));
        }
    }

    Ok(hierarchy)
}

/// Build one link per group-column pair per distinct composite key.
///
/// Endpoints resolve through a `(group, leaf key)` index, so a value shared
/// by two columns cannot resolve ambiguously and composite keys are never
/// re-split. Pair order is the derivation order of the group columns.
pub fn build_links(
    dataset: &Dataset,
    config: &Config,
    groups: &GroupColumns,
    hierarchy: &Hierarchy,
) -> Result<Vec<Link>, TransformError> {
    let metric = Metric::from_column(config.metric_column.as_deref());

    let mut leaf_index: HashMap<(&str, &str), NodeId> = HashMap::new();
    for group_id in hierarchy.groups() {
        let group_key = hierarchy.get(*group_id).key.as_str();
        for leaf_id in hierarchy.leaves_of(*group_id) {
            leaf_index.insert((group_key, hierarchy.get(*leaf_id).key.as_str()), *leaf_id);
        }
    }

    let resolve = |group: &str, key: &str| -> Result<NodeId, TransformError> {
        leaf_index
            .get(&(group, key))
            .copied()
            .ok_or_else(|| TransformError::UnresolvedLink {
                group: group.to_string(),
                key: key.to_string(),
            })
    };

    let mut links = Vec::new();
    for (left, right) in groups.pairs() {
        for entry in aggregate(&[left, right], dataset, &metric)? {
            links.push(Link {
                source: resolve(left, &entry.parts[0])?,
                target: resolve(right, &entry.parts[1])?,
                value: entry.value,
            });
        }
    }

    Ok(links)
}

/// Stable sort with the configured direction; `None` leaves the slice alone.
fn sort_with<T>(items: &mut [T], order: SortOrder, ascending: impl Fn(&T, &T) -> Ordering) {
    match order {
        SortOrder::Descending => items.sort_by(|a, b| ascending(b, a)),
        SortOrder::Ascending => items.sort_by(ascending),
        SortOrder::None => {}
    }
}
