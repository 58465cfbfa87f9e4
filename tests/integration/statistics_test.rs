use std::sync::Arc;
use std::thread;

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use querycore::query::executor::predicate::PredicateOp;
use querycore::query::executor::result::DataValue;
use querycore::query::planner::statistics::{
    IntHistogram, StatisticsConfig, StatisticsRegistry, StringHistogram, TableStatistics,
};
use querycore::storage::Storage;

#[path = "../common/mod.rs"]
mod common;
use common::*;

#[test]
fn test_histogram_scenario() -> Result<()> {
    let mut hist = IntHistogram::new(10, 1, 100)?;
    for v in [1, 1, 50, 100] {
        hist.add_value(v)?;
    }

    assert_eq!(hist.estimate_selectivity(PredicateOp::Equals, 1), 0.5 / 10.0);
    let gt = hist.estimate_selectivity(PredicateOp::GreaterThan, 50);
    assert!(gt > 0.0 && gt < 0.5);
    assert_eq!(hist.estimate_selectivity(PredicateOp::GreaterThan, 100), 0.0);
    Ok(())
}

#[test]
fn test_histogram_identities() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let min = rng.gen_range(-1000..1000);
        let max = min + rng.gen_range(0..5000);
        let buckets = rng.gen_range(1..64);
        let mut hist = IntHistogram::new(buckets, min, max)?;
        for _ in 0..rng.gen_range(1..2000) {
            hist.add_value(rng.gen_range(min..=max))?;
        }

        for _ in 0..100 {
            let v = rng.gen_range(min - 10..=max + 10);
            let eq = hist.estimate_selectivity(PredicateOp::Equals, v);
            let gt = hist.estimate_selectivity(PredicateOp::GreaterThan, v);
            let lt = hist.estimate_selectivity(PredicateOp::LessThan, v);

            for single in [eq, gt, lt] {
                assert!((0.0..=1.0).contains(&single), "{} at {} in {}", single, v, hist);
            }
            assert_eq!(eq + hist.estimate_selectivity(PredicateOp::NotEquals, v), 1.0);
            assert_eq!(hist.estimate_selectivity(PredicateOp::GreaterThanOrEq, v), gt + eq);
            assert_eq!(hist.estimate_selectivity(PredicateOp::LessThanOrEq, v), lt + eq);
        }

        assert_eq!(hist.estimate_selectivity(PredicateOp::LessThan, min - 1), 0.0);
        assert_eq!(hist.estimate_selectivity(PredicateOp::GreaterThan, min - 1), 1.0);
        assert_eq!(hist.estimate_selectivity(PredicateOp::LessThan, max + 1), 1.0);
        assert_eq!(hist.estimate_selectivity(PredicateOp::GreaterThan, max + 1), 0.0);
    }
    Ok(())
}

#[test]
fn test_string_histogram_ordering() -> Result<()> {
    let mut hist = StringHistogram::new(50)?;
    for name in ["anna", "bert", "carl", "dora", "emil", "finn", "gina", "hugo"] {
        hist.add_value(name)?;
    }
    let below_c = hist.estimate_selectivity(PredicateOp::LessThan, "c");
    let below_g = hist.estimate_selectivity(PredicateOp::LessThan, "g");
    assert!(below_c < below_g);
    assert_eq!(hist.estimate_selectivity(PredicateOp::LessThan, "zzzzzz"), 1.0);
    Ok(())
}

#[test]
fn test_table_statistics_over_storage() -> Result<()> {
    let rows: Vec<(&str, i64)> = (0..200).map(|i| (if i % 4 == 0 { "eng" } else { "ops" }, i)).collect();
    let storage = create_employee_storage(&rows, 20)?;
    let config = StatisticsConfig { io_cost_per_page: 10.0, histogram_buckets: 20 };

    let stats = TableStatistics::compute(storage.clone(), "employees", &config)?;
    assert_eq!(stats.total_tuples(), 200);
    assert_eq!(stats.page_count(), storage.page_count("employees")?);
    assert_eq!(stats.estimate_scan_cost(), 100.0);

    let below_100 = stats.estimate_selectivity(2, PredicateOp::LessThan, &DataValue::Integer(100))?;
    assert_eq!(below_100, 0.5);
    assert_eq!(stats.estimate_cardinality(below_100), 100);

    let like = stats.estimate_selectivity(1, PredicateOp::Like, &DataValue::from("n"))?;
    assert_eq!(like, 1.0);
    Ok(())
}

#[test]
fn test_registry_rebuild_is_atomic() -> Result<()> {
    let storage = create_employee_storage(&[("eng", 1), ("ops", 2)], 4)?;
    let registry = Arc::new(StatisticsRegistry::default());
    registry.compute_all(storage.clone())?;

    thread::scope(|scope| -> Result<()> {
        let reader = {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                for _ in 0..1000 {
                    if let Some(stats) = registry.get("employees") {
                        let total = stats.total_tuples();
                        assert!(total >= 2 && total <= 12, "{}", total);
                    }
                }
            })
        };

        for i in 0..10 {
            storage.insert_tuple("employees", &employee(100 + i, "new", i))?;
            registry.compute_all(storage.clone())?;
        }
        reader.join().map_err(|_| anyhow::anyhow!("reader panicked"))?;
        Ok(())
    })?;

    assert_eq!(registry.get("employees").map(|s| s.total_tuples()), Some(12));
    assert_eq!(registry.tables(), vec!["employees".to_string()]);
    Ok(())
}

#[test]
fn test_config_deserialization() -> Result<()> {
    let config: StatisticsConfig = serde_json::from_str(r#"{ "histogram_buckets": 20 }"#)?;
    assert_eq!(config.histogram_buckets, 20);
    assert_eq!(config.io_cost_per_page, 1000.0);

    let config: StatisticsConfig = serde_json::from_str("{}")?;
    assert_eq!(config, StatisticsConfig::default());
    Ok(())
}
