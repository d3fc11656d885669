use crate::config::Config;
use crate::model::{Dataset, Hierarchy, Link};
use crate::transform::{self, GroupColumns, TransformError};
use serde::Serialize;

/// Chart payload in the shape the embedded D3 page consumes: a nested node
/// tree for `d3.hierarchy`, a flat link list referencing leaves by id, the
/// resolved style knobs, and summary metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub root: ChartNode,
    pub links: Vec<ChartLink>,
    pub style: ChartStyle,
    pub metadata: ChartMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartNode {
    /// Stable leaf id of the form `group/key`; empty for the root.
    pub id: String,
    pub key: String,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChartNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartLink {
    /// Leaf ids (`group/key`) resolved during link building.
    pub source: String,
    pub target: String,
    pub value: i64,
}

/// The subset of [`Config`] the page needs, serialized alongside the data so
/// a re-render works against cached configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ChartStyle {
    pub angle_span: f64,
    pub tension: f64,
    pub background: String,
    pub group_colors: std::collections::HashMap<String, String>,
    pub font_size: u32,
    pub font_weight: String,
    pub label_width: u32,
    pub bar_height: f64,
    pub bar_width: f64,
    pub link_color: String,
    pub link_width_min: f64,
    pub link_width_max: f64,
    pub opacity_default: f64,
    pub opacity_highlight: f64,
    pub opacity_background: f64,
    pub tooltip_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartMetadata {
    pub record_count: usize,
    pub group_columns: Vec<String>,
    pub leaf_count: usize,
    pub link_count: usize,
    /// Domain max for the bar length scale.
    pub max_leaf_value: i64,
    /// Domain max for the link width scale.
    pub max_link_value: i64,
    /// Monotonically increasing render generation. The page drops payloads
    /// older than the one it last applied.
    pub generation: u64,
}

impl ChartStyle {
    fn from_config(config: &Config) -> Self {
        Self {
            angle_span: config.angle_span,
            tension: config.tension,
            background: config.background.clone(),
            group_colors: config.group_colors.clone(),
            font_size: config.font_size,
            font_weight: config.font_weight.clone(),
            label_width: config.label_width,
            bar_height: config.bar_height,
            bar_width: config.bar_width,
            link_color: config.link_color.clone(),
            link_width_min: config.link_width_min,
            link_width_max: config.link_width_max,
            opacity_default: config.opacity_default,
            opacity_highlight: config.opacity_highlight,
            opacity_background: config.opacity_background,
            tooltip_label: config.tooltip_label.clone(),
        }
    }
}

impl ChartData {
    /// Run the full pipeline: derive groups, aggregate, build the hierarchy
    /// and links, and serialize into the page payload. The model is rebuilt
    /// from scratch on every call; nothing is carried over between renders.
    pub fn build(dataset: &Dataset, config: &Config) -> Result<Self, TransformError> {
        Self::build_generation(dataset, config, 0)
    }

    /// Like [`ChartData::build`], stamping a render generation for watch mode.
    pub fn build_generation(
        dataset: &Dataset,
        config: &Config,
        generation: u64,
    ) -> Result<Self, TransformError> {
        let groups = GroupColumns::derive(config, dataset)?;
        let hierarchy = transform::build_hierarchy(dataset, config, &groups)?;
        let links = transform::build_links(dataset, config, &groups, &hierarchy)?;

        let root = serialize_tree(&hierarchy);
        let chart_links = serialize_links(&hierarchy, &links);

        let leaf_count = hierarchy.leaves().count();
        let metadata = ChartMetadata {
            record_count: dataset.len(),
            group_columns: groups.names().to_vec(),
            leaf_count,
            link_count: chart_links.len(),
            max_leaf_value: hierarchy.max_leaf_value(),
            max_link_value: links.iter().map(|l| l.value).max().unwrap_or(0),
            generation,
        };

        Ok(Self {
            root,
            links: chart_links,
            style: ChartStyle::from_config(config),
            metadata,
        })
    }
}

fn serialize_tree(hierarchy: &Hierarchy) -> ChartNode {
    let mut groups = Vec::new();
    for group_id in hierarchy.groups() {
        let group = hierarchy.get(*group_id);
        let leaves = hierarchy
            .leaves_of(*group_id)
            .iter()
            .map(|leaf_id| {
                let leaf = hierarchy.get(*leaf_id);
                ChartNode {
                    id: leaf_id_of(&group.key, &leaf.key),
                    key: leaf.key.clone(),
                    display: leaf.display.clone(),
                    value: leaf.value,
                    children: Vec::new(),
                }
            })
            .collect();

        groups.push(ChartNode {
            id: group.key.clone(),
            key: group.key.clone(),
            display: group.display.clone(),
            value: None,
            children: leaves,
        });
    }

    ChartNode {
        id: String::new(),
        key: String::new(),
        display: String::new(),
        value: None,
        children: groups,
    }
}

fn serialize_links(hierarchy: &Hierarchy, links: &[Link]) -> Vec<ChartLink> {
    links
        .iter()
        .map(|link| {
            let source = hierarchy.get(link.source);
            let target = hierarchy.get(link.target);
            ChartLink {
                source: leaf_id_of(
                    hierarchy.group_key_of(link.source).unwrap_or_default(),
                    &source.key,
                ),
                target: leaf_id_of(
                    hierarchy.group_key_of(link.target).unwrap_or_default(),
                    &target.key,
                ),
                value: link.value,
            }
        })
        .collect()
}

fn leaf_id_of(group: &str, key: &str) -> String {
    format!("{}/{}", group, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_json_str(
            r#"[
                {"A": "x", "B": "p"},
                {"A": "x", "B": "q"},
                {"A": "y", "B": "p"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn payload_shape_matches_pipeline() {
        let chart = ChartData::build(&dataset(), &Config::default()).unwrap();

        assert_eq!(chart.metadata.record_count, 3);
        assert_eq!(chart.metadata.leaf_count, 4);
        assert_eq!(chart.metadata.link_count, 3);
        assert_eq!(chart.metadata.max_leaf_value, 2);
        assert_eq!(chart.metadata.max_link_value, 1);
        assert_eq!(chart.root.children.len(), 2);

        // Every link endpoint is a leaf id present in the tree.
        let mut leaf_ids = Vec::new();
        for group in &chart.root.children {
            for leaf in &group.children {
                leaf_ids.push(leaf.id.clone());
            }
        }
        for link in &chart.links {
            assert!(leaf_ids.contains(&link.source), "missing {}", link.source);
            assert!(leaf_ids.contains(&link.target), "missing {}", link.target);
        }
    }

    #[test]
    fn leaf_ids_are_group_scoped() {
        let data = Dataset::from_json_str(r#"[{"A": "k", "B": "k"}]"#).unwrap();
        let chart = ChartData::build(&data, &Config::default()).unwrap();
        assert_eq!(chart.links.len(), 1);
        assert_eq!(chart.links[0].source, "A/k");
        assert_eq!(chart.links[0].target, "B/k");
    }

    #[test]
    fn payload_serializes_without_empty_fields() {
        let chart = ChartData::build(&dataset(), &Config::default()).unwrap();
        let json = serde_json::to_value(&chart).unwrap();

        let leaf = &json["root"]["children"][0]["children"][0];
        assert!(leaf.get("children").is_none());
        assert!(leaf.get("value").is_some());
        assert!(json["root"]["children"][0].get("value").is_none());
    }

    #[test]
    fn generation_is_stamped() {
        let chart = ChartData::build_generation(&dataset(), &Config::default(), 7).unwrap();
        assert_eq!(chart.metadata.generation, 7);
    }

    #[test]
    fn style_carries_config_knobs() {
        let mut config = Config::default();
        config.tension = 0.5;
        config.tooltip_label = "orders".to_string();
        let chart = ChartData::build(&dataset(), &config).unwrap();
        assert_eq!(chart.style.tension, 0.5);
        assert_eq!(chart.style.tooltip_label, "orders");
    }
}
