use futures::executor::block_on;
use massmail_core::{
    ConfigLayer, Dataset, EmailId, InlineSource, KeywordFilter, LayoutConfig, fetch_dataset,
    load_dataset,
};
use serde_json::json;

#[test]
fn keyword_filter_matches_substrings() {
    let content = "spring vaccine update";
    assert!(KeywordFilter::new(["vaccine"]).matches(content));
    assert!(!KeywordFilter::new(["covid"]).matches(content));
    assert!(KeywordFilter::new(["covid", "spring"]).matches(content));
    // Case-sensitive.
    assert!(!KeywordFilter::new(["Vaccine"]).matches(content));
}

#[test]
fn empty_selection_emphasizes_everything() {
    let data = Dataset::from_json_str(
        &json!({
            "clusters": [{ "id": 1, "label": "a" }],
            "emails": [
                { "content": "budget", "clusterId": 1 },
                { "content": "parking", "clusterId": 1 }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let mut filter = KeywordFilter::default();
    assert_eq!(filter.dimmed(&data).count(), 0);

    filter.toggle("budget");
    assert_eq!(filter.dimmed(&data).collect::<Vec<_>>(), vec![EmailId::new(1)]);

    filter.toggle("budget");
    assert!(!filter.is_active());
}

#[test]
fn select_ignores_duplicates_and_empty_words() {
    let mut filter = KeywordFilter::new(["a", "a", ""]);
    filter.select("b");
    assert_eq!(filter.selected(), &["a".to_string(), "b".to_string()]);
    filter.clear();
    assert!(filter.selected().is_empty());
}

#[test]
fn config_overrides_merge_over_defaults() {
    let mut layer = ConfigLayer::default();
    layer.set_value("exploded.rowWidthLimit", json!(1000));
    layer.set_value("hull.padding", json!(20));
    let config = LayoutConfig::with_overrides(&layer).unwrap();

    assert_eq!(config.exploded.row_width_limit, 1000.0);
    assert_eq!(config.exploded.horizontal_gap, 30.0);
    assert_eq!(config.hull.padding, 20.0);
    assert_eq!(config.view, LayoutConfig::default().view);
    assert_eq!(layer.get_f64("hull.padding"), Some(20.0));
}

#[test]
fn config_rejects_non_positive_sizes() {
    let layer = ConfigLayer::from_json_str(r#"{ "view": { "viewportSize": 0 } }"#).unwrap();
    let err = LayoutConfig::with_overrides(&layer).unwrap_err().to_string();
    assert!(err.contains("view.viewportSize"), "{err}");

    let layer = ConfigLayer::from_json_str(r#"{ "hull": { "padding": "wide" } }"#).unwrap();
    assert!(LayoutConfig::with_overrides(&layer).is_err());
}

#[test]
fn load_dataset_swallows_failures() {
    let bad = InlineSource("{ not json".to_string());
    assert!(block_on(load_dataset(&bad)).is_none());
    assert!(block_on(fetch_dataset(&bad)).is_err());

    let good = InlineSource(r#"{ "clusters": [], "emails": [] }"#.to_string());
    let data = block_on(load_dataset(&good)).expect("dataset");
    assert_eq!(data.cluster_count(), 0);
}
