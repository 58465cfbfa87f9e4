use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use querycore::query::executor::operators::{
    collect_tuples, execute, AggregateOp, AggregateOperator, FilterOperator, Operator, SeqScan,
};
use querycore::query::executor::predicate::{Predicate, PredicateOp};
use querycore::query::executor::result::{DataValue, QueryError};

#[path = "../common/mod.rs"]
mod common;
use common::*;

#[test]
fn test_avg_over_scan() -> Result<()> {
    let storage = create_employee_storage(&[("a", 2), ("b", 4), ("c", 6)], 2)?;
    let scan = SeqScan::new(storage, "employees")?;
    let mut avg = AggregateOperator::new(Box::new(scan), 2, None, AggregateOp::Avg)?;

    let result = execute(&mut avg)?;
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].values(), &[DataValue::Integer(4)]);
    Ok(())
}

#[test]
fn test_count_grouping_law() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let depts = ["eng", "ops", "sales", "hr", "legal"];
    let rows: Vec<(&str, i64)> = (0..500)
        .map(|_| (depts[rng.gen_range(0..depts.len())], rng.gen_range(1..1000)))
        .collect();

    let storage = create_employee_storage(&rows, 16)?;
    let scan = SeqScan::new(storage, "employees")?;
    let mut count = AggregateOperator::new(Box::new(scan), 0, Some(1), AggregateOp::Count)?;

    let groups = execute(&mut count)?;
    assert!(groups.len() <= depts.len());
    assert_eq!(integer_column(&groups, 1).iter().sum::<i64>(), rows.len() as i64);
    Ok(())
}

#[test]
fn test_grouped_aggregates_after_filter() -> Result<()> {
    let rows = [("eng", 120), ("ops", 80), ("eng", 95), ("ops", 60), ("eng", 150), ("hr", 40)];
    let expected = [
        (AggregateOp::Min, vec![95, 60]),
        (AggregateOp::Max, vec![150, 80]),
        (AggregateOp::Sum, vec![365, 140]),
        (AggregateOp::Avg, vec![121, 70]),
        (AggregateOp::Count, vec![3, 2]),
    ];

    for (op, values) in expected {
        let storage = create_employee_storage(&rows, 4)?;
        let scan = SeqScan::new(storage, "employees")?;
        let predicate = Predicate::new(2, PredicateOp::GreaterThan, DataValue::Integer(50));
        let filter = FilterOperator::new(predicate, Box::new(scan));
        let mut agg = AggregateOperator::new(Box::new(filter), 2, Some(1), op)?;

        let result = execute(&mut agg)?;
        let groups: Vec<&str> = result.iter()
            .filter_map(|t| t.get(0).ok().and_then(DataValue::as_text))
            .collect();
        assert_eq!(groups, vec!["eng", "ops"], "{}", op);
        assert_eq!(integer_column(&result, 1), values, "{}", op);
    }
    Ok(())
}

#[test]
fn test_schema_available_before_open() -> Result<()> {
    let agg = AggregateOperator::new(employee_values(&[("eng", 1)])?, 2, Some(1), AggregateOp::Sum)?;
    assert_eq!(agg.schema().field_name(0)?, "dept");
    assert_eq!(agg.schema().field_name(1)?, "SUM(salary)");
    assert_eq!(agg.group_field_name(), Some("dept"));
    Ok(())
}

#[test]
fn test_text_aggregates() -> Result<()> {
    let rows = [("eng", 1), ("ops", 2), ("eng", 3)];

    for op in [AggregateOp::Min, AggregateOp::Max, AggregateOp::Sum, AggregateOp::Avg] {
        let result = AggregateOperator::new(employee_values(&rows)?, 1, None, op);
        assert!(matches!(result, Err(QueryError::UnsupportedOperator(_))), "{}", op);
    }

    let mut count = AggregateOperator::new(employee_values(&rows)?, 1, None, AggregateOp::Count)?;
    assert_eq!(integer_column(&execute(&mut count)?, 0), vec![3]);
    Ok(())
}

#[test]
fn test_rewind_is_stable() -> Result<()> {
    let rows: Vec<(&str, i64)> = ["d", "a", "c", "a", "b", "d", "e"].iter()
        .enumerate()
        .map(|(i, dept)| (*dept, i as i64))
        .collect();
    let mut agg = AggregateOperator::new(employee_values(&rows)?, 2, Some(1), AggregateOp::Max)?;

    agg.open()?;
    let first = collect_tuples(&mut agg)?;
    for _ in 0..3 {
        agg.rewind()?;
        assert_eq!(collect_tuples(&mut agg)?, first);
    }
    agg.close();
    assert_eq!(first.len(), 5);
    Ok(())
}

#[test]
fn test_sum_overflow() -> Result<()> {
    let rows = [("a", i64::MAX), ("a", 1)];
    let result = AggregateOperator::new(employee_values(&rows)?, 2, None, AggregateOp::Sum);
    assert!(matches!(result, Err(QueryError::NumericOverflow)));
    Ok(())
}
