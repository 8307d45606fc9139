//! Tests for gc-estimate.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;
    use std::path::Path;

    use gc_core::{GeoPoint, WeightedPoint};
    use gc_spatial::{RoadNetwork, RoadNetworkBuilder};

    use crate::CompetitorDataset;

    /// Two vertices 100 m apart: A (0, 0) and B (0, 0.01).
    pub fn two_node_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_road(a, c, 100.0);
        b.build()
    }

    pub fn wp(lat: f64, lon: f64, w: f64) -> WeightedPoint {
        WeightedPoint::try_new(lat, lon, w).unwrap()
    }

    /// One demand point at each vertex.
    pub fn demand() -> Vec<WeightedPoint> {
        vec![wp(0.0, 0.0, 10.0), wp(0.0, 0.01, 10.0)]
    }

    pub fn write_competitors(path: &Path) {
        std::fs::write(path, "lat,lon,weight\n0.0,0.0,1.0\n").unwrap();
    }

    pub fn datasets(entries: &[(&str, &Path, f64)]) -> BTreeMap<String, CompetitorDataset> {
        entries
            .iter()
            .map(|&(key, path, decay)| {
                (key.to_owned(), CompetitorDataset { path: path.to_path_buf(), distance_decay: decay })
            })
            .collect()
    }
}

#[cfg(test)]
mod config {
    use std::path::Path;

    use gc_huff::{AggregationMode, ModelError};

    use crate::{EstimateConfig, EstimateError};

    const MINIMAL: &str = "
area: Test
customers: customers.csv
network:
  nodes: nodes.csv
  edges: edges.csv
competitors:
  bakeries:
    path: bakeries.csv
    distanceDecay: 2.0
  pharmacies:
    path: /abs/pharmacies.json
";

    #[test]
    fn defaults_applied() {
        let cfg = EstimateConfig::from_yaml_str(MINIMAL, Path::new("run")).unwrap();
        assert_eq!(cfg.area, "Test");
        assert_eq!(cfg.competitors["bakeries"].distance_decay, 2.0);
        assert_eq!(cfg.competitors["pharmacies"].distance_decay, 1.5);

        let model = cfg.model_config().unwrap();
        assert_eq!(model.cell_size_m, 500.0);
        assert_eq!(model.walking_speed, 6.0);
        assert_eq!(model.aggregation, AggregationMode::MeanShare);
        assert!(model.bounds.is_none());
    }

    #[test]
    fn relative_paths_resolved_against_base() {
        let cfg = EstimateConfig::from_yaml_str(MINIMAL, Path::new("run")).unwrap();
        assert_eq!(cfg.customers, Path::new("run/customers.csv"));
        assert_eq!(cfg.network.edges, Path::new("run/edges.csv"));
        assert_eq!(cfg.cache_dir, Path::new("run/data"));
        assert_eq!(cfg.competitors["bakeries"].path, Path::new("run/bakeries.csv"));
        assert_eq!(cfg.competitors["pharmacies"].path, Path::new("/abs/pharmacies.json"));
    }

    #[test]
    fn overrides_parsed() {
        let yaml = format!(
            "{MINIMAL}cacheDir: cache\ncellSize: 250\nwalkingSpeed: 4\naggregation: joint\n\
             bounds: {{ minLat: 1.0, minLon: 2.0, maxLat: 1.5, maxLon: 2.5 }}\n"
        );
        let cfg = EstimateConfig::from_yaml_str(&yaml, Path::new("")).unwrap();
        let model = cfg.model_config().unwrap();
        assert_eq!(cfg.cache_dir, Path::new("cache"));
        assert_eq!(model.cell_size_m, 250.0);
        assert_eq!(model.walking_speed, 4.0);
        assert_eq!(model.aggregation, AggregationMode::JointShare);
        let bbox = model.bounds.unwrap();
        assert_eq!((bbox.min.lat, bbox.max.lon), (1.0, 2.5));
    }

    #[test]
    fn unknown_aggregation_rejected() {
        let yaml = format!("{MINIMAL}aggregation: median\n");
        let err = EstimateConfig::from_yaml_str(&yaml, Path::new("")).unwrap_err();
        assert!(matches!(err, EstimateError::Model(ModelError::Config(_))));
    }

    #[test]
    fn non_positive_cell_size_rejected() {
        let yaml = format!("{MINIMAL}cellSize: 0\n");
        let err = EstimateConfig::from_yaml_str(&yaml, Path::new("")).unwrap_err();
        assert!(matches!(err, EstimateError::Model(ModelError::Config(_))));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let yaml = format!("{MINIMAL}bounds: {{ minLat: 2.0, minLon: 0.0, maxLat: 1.0, maxLon: 1.0 }}\n");
        let err = EstimateConfig::from_yaml_str(&yaml, Path::new("")).unwrap_err();
        assert!(matches!(err, EstimateError::Config(_)));
    }

    #[test]
    fn unknown_field_rejected() {
        let yaml = format!("{MINIMAL}cellsize: 100\n");
        let err = EstimateConfig::from_yaml_str(&yaml, Path::new("")).unwrap_err();
        assert!(matches!(err, EstimateError::ConfigParse { .. }));
    }

    #[test]
    fn missing_section_rejected() {
        let err = EstimateConfig::from_yaml_str("customers: c.csv\n", Path::new("")).unwrap_err();
        assert!(matches!(err, EstimateError::ConfigParse { .. }));
    }

    #[test]
    fn load_resolves_against_file_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("init.yaml");
        std::fs::write(&path, MINIMAL).unwrap();

        let cfg = EstimateConfig::load(&path).unwrap();
        assert_eq!(cfg.customers, dir.path().join("customers.csv"));
    }

    #[test]
    fn load_missing_file_is_config_io() {
        let err = EstimateConfig::load(Path::new("/nonexistent/init.yaml")).unwrap_err();
        assert!(matches!(err, EstimateError::ConfigIo { .. }));
    }

    #[test]
    fn load_parse_error_names_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("init.yaml");
        std::fs::write(&path, "customers: [").unwrap();

        match EstimateConfig::load(&path).unwrap_err() {
            EstimateError::ConfigParse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[cfg(test)]
mod estimator {
    use std::path::Path;

    use gc_huff::ModelConfig;
    use gc_io::ResultCache;
    use gc_spatial::RoadNetworkBuilder;

    use super::helpers::*;
    use crate::{EstimateError, Estimator};

    #[test]
    fn computes_then_serves_from_cache() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path()));
        let competitors = [wp(0.0, 0.0, 1.0)];

        let first = est.estimate("bakeries", &demand(), &competitors, 1.5, true).unwrap();
        assert!(!first.from_cache());
        assert_eq!(first.records.len(), 2);
        let sum: f64 = first.records.iter().map(|r| r.probability).sum();
        assert!((sum - 1.0).abs() < 1e-9);

        let second = est.estimate("bakeries", &demand(), &competitors, 1.5, true).unwrap();
        assert!(second.from_cache());
        assert_eq!(second.records, first.records);
    }

    #[test]
    fn bypassing_cache_recomputes_and_refreshes_stale_entry() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path()));
        let competitors = [wp(0.0, 0.0, 1.0)];
        est.cache().save("bakeries", &[]).unwrap();

        let fresh = est.estimate("bakeries", &demand(), &competitors, 1.5, false).unwrap();
        assert!(!fresh.from_cache());
        assert_eq!(fresh.records.len(), 2);
        assert_eq!(est.cache().load("bakeries"), Some(fresh.records.clone()));

        // The next normal run serves the refreshed entry, not the stale one.
        let next = est.estimate("bakeries", &demand(), &competitors, 1.5, true).unwrap();
        assert!(next.from_cache());
        assert_eq!(next.records, fresh.records);
    }

    #[test]
    fn decay_changes_the_result() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path()));
        let competitors = [wp(0.0, 0.0, 1.0)];

        let gentle = est.estimate("a", &demand(), &competitors, 0.5, false).unwrap();
        let steep = est.estimate("b", &demand(), &competitors, 3.0, false).unwrap();
        assert!(steep.records[0].probability > gentle.records[0].probability);
    }

    #[test]
    fn dataset_file_not_read_on_cache_hit() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("bakeries.csv");
        write_competitors(&path);
        let sets = datasets(&[("bakeries", path.as_path(), 1.5)]);

        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path().join("data")));

        let first = est.estimate_dataset("bakeries", &sets["bakeries"], &demand(), true).unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = est.estimate_dataset("bakeries", &sets["bakeries"], &demand(), true).unwrap();
        assert!(second.from_cache());
        assert_eq!(second.records, first.records);
    }

    #[test]
    fn estimate_all_reports_each_dataset() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let good = dir.path().join("good.csv");
        let missing = dir.path().join("missing.csv");
        write_competitors(&good);
        let sets = datasets(&[("zeta", good.as_path(), 1.5), ("alpha", missing.as_path(), 1.5)]);

        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path().join("data")));
        let outcomes = est.estimate_all(&sets, &demand(), true);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].key, "alpha");
        assert!(matches!(outcomes[0].result, Err(EstimateError::Input { .. })));
        assert_eq!(outcomes[1].key, "zeta");
        assert_eq!(outcomes[1].result.as_ref().unwrap().records.len(), 2);
    }

    #[test]
    fn failing_dataset_leaves_siblings_intact() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let good = dir.path().join("good.csv");
        write_competitors(&good);
        let missing = dir.path().join("missing.csv");
        let keys = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let entries: Vec<(&str, &Path, f64)> = keys
            .iter()
            .map(|&k| (k, if k == "d" { missing.as_path() } else { good.as_path() }, 1.5))
            .collect();
        let sets = datasets(&entries);

        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path().join("data")));
        let outcomes = est.estimate_all(&sets, &demand(), false);

        let order: Vec<&str> = outcomes.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(order, keys);
        for o in &outcomes {
            match (o.key.as_str(), &o.result) {
                ("d", Err(EstimateError::Input { path, .. })) => assert_eq!(path, &missing),
                ("d", other) => panic!("d: unexpected {other:?}"),
                (key, Ok(e)) => assert_eq!(e.records.len(), 2, "{key}"),
                (key, Err(e)) => panic!("{key}: {e}"),
            }
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn estimate_all_on_a_multi_thread_pool() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let good = dir.path().join("good.csv");
        write_competitors(&good);
        let missing = dir.path().join("missing.csv");
        let sets = datasets(&[
            ("north", good.as_path(), 1.5),
            ("south", missing.as_path(), 1.5),
            ("east", good.as_path(), 0.5),
            ("west", good.as_path(), 3.0),
        ]);

        let net = two_node_network();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path().join("data")));
        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let outcomes = pool.install(|| est.estimate_all(&sets, &demand(), true));

        let ok: Vec<&str> =
            outcomes.iter().filter(|o| o.result.is_ok()).map(|o| o.key.as_str()).collect();
        assert_eq!(ok, ["east", "north", "west"]);
        assert!(matches!(outcomes[2].result, Err(EstimateError::Input { .. })));
        assert_eq!(outcomes[2].key, "south");
        // Each sibling wrote its own cache entry.
        for key in ["east", "north", "west"] {
            assert!(est.cache().load(key).is_some(), "{key}");
        }
        assert_eq!(est.cache().load("south"), None);
    }

    #[test]
    fn empty_graph_is_a_model_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let net = RoadNetworkBuilder::new().build();
        let est = Estimator::new(&net, ModelConfig::default(), ResultCache::new(dir.path()));

        let err = est.estimate("k", &demand(), &[wp(0.0, 0.0, 1.0)], 1.5, true).unwrap_err();
        assert!(matches!(err, EstimateError::Model(_)));
        assert_eq!(est.cache().load("k"), None);
    }
}
