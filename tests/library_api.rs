//! Integration tests for the bundlemap library API.

use bundlemap::transform::{GroupColumns, build_hierarchy, build_links};
use bundlemap::{
    AggregateEntry, BundlemapError, ChartData, Config, Dataset, Metric, SortOrder, aggregate,
    chart_from_dataset,
};

fn sample_dataset() -> Dataset {
    Dataset::from_json_str(
        r#"[
            {"region": "east", "product": "ale", "channel": "web", "salesAmount": 30},
            {"region": "east", "product": "rye", "channel": "web", "salesAmount": 10},
            {"region": "west", "product": "ale", "channel": "store", "salesAmount": 20},
            {"region": "west", "product": "ale", "channel": "web", "salesAmount": 5},
            {"region": "east", "product": "ale", "channel": "store", "salesAmount": 15}
        ]"#,
    )
    .unwrap()
}

fn grouping_config() -> Config {
    let mut config = Config::default();
    config.exclude_columns = vec!["salesAmount".to_string()];
    config
}

#[test]
fn count_mode_conserves_record_count_per_column() {
    let data = sample_dataset();
    for column in ["region", "product", "channel"] {
        let entries = aggregate(&[column], &data, &Metric::Count).unwrap();
        let total: i64 = entries.iter().map(|e| e.value).sum();
        assert_eq!(total, data.len() as i64, "column {}", column);
    }
}

#[test]
fn link_values_conserve_record_count_per_pair() {
    let data = sample_dataset();
    let config = grouping_config();
    let groups = GroupColumns::derive(&config, &data).unwrap();
    let hierarchy = build_hierarchy(&data, &config, &groups).unwrap();
    let links = build_links(&data, &config, &groups, &hierarchy).unwrap();

    // Three group columns make three pairs; each pair's links sum to the
    // record count in count mode.
    let pair_count = groups.pairs().len();
    assert_eq!(pair_count, 3);
    let total: i64 = links.iter().map(|l| l.value).sum();
    assert_eq!(total, (data.len() * pair_count) as i64);
}

#[test]
fn spec_scenario_three_records() {
    let data = Dataset::from_json_str(
        r#"[{"A": "x", "B": "p"}, {"A": "x", "B": "q"}, {"A": "y", "B": "p"}]"#,
    )
    .unwrap();
    let chart = chart_from_dataset(&data, &Config::default()).unwrap();

    let find_group = |key: &str| {
        chart
            .root
            .children
            .iter()
            .find(|g| g.key == key)
            .unwrap_or_else(|| panic!("group {} missing", key))
    };

    let a = find_group("A");
    let a_leaves: Vec<(&str, i64)> = a
        .children
        .iter()
        .map(|l| (l.key.as_str(), l.value.unwrap()))
        .collect();
    assert_eq!(a_leaves, vec![("x", 2), ("y", 1)]);

    let b = find_group("B");
    let b_leaves: Vec<(&str, i64)> = b
        .children
        .iter()
        .map(|l| (l.key.as_str(), l.value.unwrap()))
        .collect();
    assert_eq!(b_leaves, vec![("p", 2), ("q", 1)]);

    let mut links: Vec<(String, String, i64)> = chart
        .links
        .iter()
        .map(|l| (l.source.clone(), l.target.clone(), l.value))
        .collect();
    links.sort();
    assert_eq!(
        links,
        vec![
            ("A/x".to_string(), "B/p".to_string(), 1),
            ("A/x".to_string(), "B/q".to_string(), 1),
            ("A/y".to_string(), "B/p".to_string(), 1),
        ]
    );
}

#[test]
fn sort_order_laws() {
    let data = sample_dataset();
    let groups = GroupColumns::derive(&grouping_config(), &data).unwrap();

    let leaf_values = |config: &Config| -> Vec<Vec<i64>> {
        let h = build_hierarchy(&data, config, &groups).unwrap();
        h.groups()
            .iter()
            .map(|g| {
                h.leaves_of(*g)
                    .iter()
                    .map(|l| h.get(*l).value.unwrap())
                    .collect()
            })
            .collect()
    };

    let mut config = grouping_config();
    for group in leaf_values(&config) {
        assert!(group.windows(2).all(|w| w[0] >= w[1]), "non-increasing");
    }

    config.sort = SortOrder::Ascending;
    for group in leaf_values(&config) {
        assert!(group.windows(2).all(|w| w[0] <= w[1]), "non-decreasing");
    }

    // Unsorted preserves encounter order and is idempotent under rebuild.
    config.sort = SortOrder::None;
    assert_eq!(leaf_values(&config), leaf_values(&config));
    let h = build_hierarchy(&data, &config, &groups).unwrap();
    let region = h
        .groups()
        .iter()
        .copied()
        .find(|g| h.get(*g).key == "region")
        .unwrap();
    let keys: Vec<&str> = h
        .leaves_of(region)
        .iter()
        .map(|l| h.get(*l).key.as_str())
        .collect();
    assert_eq!(keys, vec!["east", "west"]);
}

#[test]
fn sum_mode_uses_metric_column() {
    let data = sample_dataset();
    let mut config = grouping_config();
    config.metric_column = Some("salesAmount".to_string());
    config.include_columns = vec!["region".to_string()];

    let entries = aggregate(
        &["region"],
        &data,
        &Metric::from_column(config.metric_column.as_deref()),
    )
    .unwrap();
    let by_key: Vec<(String, i64)> = entries
        .iter()
        .map(|e: &AggregateEntry| (e.key(), e.value))
        .collect();
    assert_eq!(
        by_key,
        vec![("east".to_string(), 55), ("west".to_string(), 25)]
    );
}

#[test]
fn include_list_precedence_over_exclude() {
    let data = sample_dataset();

    // Exclude alone: salesAmount is dropped from the schema.
    let chart = chart_from_dataset(&data, &grouping_config()).unwrap();
    assert_eq!(
        chart.metadata.group_columns,
        vec!["region", "product", "channel"]
    );

    // A non-empty include-list wins; the exclude list only applies when the
    // include-list is empty.
    let mut config = Config::default();
    config.include_columns = vec!["salesAmount".to_string(), "region".to_string()];
    let chart = chart_from_dataset(&data, &config).unwrap();
    assert_eq!(chart.metadata.group_columns, vec!["salesAmount", "region"]);
}

#[test]
fn hierarchy_round_trip_recovers_distinct_values() {
    let data = sample_dataset();
    let config = grouping_config();
    let chart = chart_from_dataset(&data, &config).unwrap();

    for group in &chart.root.children {
        let mut leaf_keys: Vec<&str> = group.children.iter().map(|l| l.key.as_str()).collect();
        leaf_keys.sort_unstable();

        let mut distinct: Vec<String> = data
            .records()
            .iter()
            .map(|r| r[&group.key].as_str().unwrap().to_string())
            .collect();
        distinct.sort();
        distinct.dedup();

        assert_eq!(leaf_keys, distinct);
    }
}

#[test]
fn empty_dataset_is_a_typed_error() {
    assert!(Dataset::from_json_str("[]").is_err());
}

#[test]
fn bad_metric_surfaces_instead_of_corrupting() {
    let data = Dataset::from_json_str(
        r#"[{"g": "x", "m": 3}, {"g": "x", "m": "twelve"}]"#,
    )
    .unwrap();
    let mut config = Config::default();
    config.metric_column = Some("m".to_string());
    config.include_columns = vec!["g".to_string()];

    let result = chart_from_dataset(&data, &config);
    match result {
        Err(BundlemapError::Transform(_)) => {}
        other => panic!("expected transform error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn chart_metadata_drives_the_scales() {
    let data = sample_dataset();
    let chart = chart_from_dataset(&data, &grouping_config()).unwrap();

    let max_leaf = chart
        .root
        .children
        .iter()
        .flat_map(|g| g.children.iter())
        .filter_map(|l| l.value)
        .max()
        .unwrap();
    let max_link = chart.links.iter().map(|l| l.value).max().unwrap();

    assert_eq!(chart.metadata.max_leaf_value, max_leaf);
    assert_eq!(chart.metadata.max_link_value, max_link);
}

#[test]
fn chart_from_file_and_static_render() {
    let dir = std::env::temp_dir().join("bundlemap-test");
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("orders.json");
    std::fs::write(&input, r#"[{"A": "x", "B": "p"}, {"A": "y", "B": "p"}]"#).unwrap();

    let chart = bundlemap::chart(&input, &Config::default()).unwrap();
    assert_eq!(chart.metadata.record_count, 2);

    let html = bundlemap::render_html(&input, &Config::default()).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains(r#""record_count":2"#));

    let missing = bundlemap::chart(&dir.join("nope.json"), &Config::default());
    assert!(matches!(missing, Err(BundlemapError::Io(_))));
}

#[test]
fn chart_rebuild_is_from_scratch() {
    let data = sample_dataset();
    let config = grouping_config();

    let first = ChartData::build(&data, &config).unwrap();
    let second = ChartData::build(&data, &config).unwrap();

    let as_json = |c: &ChartData| serde_json::to_value(c).unwrap();
    assert_eq!(as_json(&first), as_json(&second));
}
