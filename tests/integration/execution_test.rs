use std::sync::Arc;

use anyhow::Result;
use querycore::catalog::{DataType, Schema};
use querycore::query::executor::operators::{
    collect_tuples, execute, DeleteOperator, FilterOperator, InsertOperator, Operator, SeqScan,
};
use querycore::query::executor::predicate::{JoinPredicate, Predicate, PredicateOp};
use querycore::query::executor::result::{DataValue, QueryError};
use querycore::storage::{MemoryStorage, Storage, StorageError};

#[path = "../common/mod.rs"]
mod common;
use common::*;

const STAFF: [(&str, i64); 6] = [
    ("eng", 120),
    ("ops", 80),
    ("eng", 95),
    ("sales", 70),
    ("ops", 60),
    ("eng", 150),
];

#[test]
fn test_insert_reports_count_once() -> Result<()> {
    let storage = create_employee_storage(&[], 4)?;
    let child = employee_values(&STAFF[..3])?;
    let mut insert = InsertOperator::new(storage.clone(), "employees", child)?;

    insert.open()?;
    assert!(insert.has_next()?);
    assert_eq!(insert.next()?.values(), &[DataValue::Integer(3)]);

    // One-shot: a second pull is exhausted regardless of the child
    assert!(!insert.has_next()?);
    assert!(matches!(insert.next(), Err(QueryError::IllegalState(_))));
    insert.close();

    assert_eq!(storage.row_count_hint("employees")?, 3);
    Ok(())
}

#[test]
fn test_insert_stops_on_storage_failure() -> Result<()> {
    let inner = MemoryStorage::new();
    inner.create_table("employees", employee_schema())?;
    let storage = Arc::new(FlakyStorage::new(inner, 2));

    let mut insert = InsertOperator::new(storage.clone(), "employees", employee_values(&STAFF)?)?;
    insert.open()?;
    match insert.next() {
        Err(QueryError::ModificationFailed { affected, source }) => {
            assert_eq!(affected, 2);
            assert!(matches!(source, StorageError::Unavailable(_)));
        }
        other => panic!("expected ModificationFailed, got {:?}", other),
    }
    insert.close();

    // Confirmed inserts are not rolled back
    assert_eq!(storage.row_count_hint("employees")?, 2);
    Ok(())
}

#[test]
fn test_insert_rejects_mismatched_child() -> Result<()> {
    let storage = create_employee_storage(&[], 4)?;
    storage.create_table("names", Schema::from_pairs([("name", DataType::Text)]))?;

    let scan = SeqScan::new(storage.clone(), "names")?;
    let result = InsertOperator::new(storage.clone(), "employees", Box::new(scan));
    assert!(matches!(result, Err(QueryError::SchemaMismatch(_))));

    let result = DeleteOperator::new(storage.clone(), "employees", employee_values(&[])?);
    assert!(result.is_ok());
    Ok(())
}

#[test]
fn test_filter_delete_pipeline() -> Result<()> {
    let storage = create_employee_storage(&STAFF, 2)?;

    let scan = SeqScan::new(storage.clone(), "employees")?;
    let eng = Predicate::new(1, PredicateOp::Equals, DataValue::from("eng"));
    let filter = FilterOperator::new(eng, Box::new(scan));
    let mut delete = DeleteOperator::new(storage.clone(), "employees", Box::new(filter))?;

    let result = execute(&mut delete)?;
    assert_eq!(integer_column(&result, 0), vec![3]);

    let mut remaining = SeqScan::new(storage.clone(), "employees")?;
    let rows = execute(&mut remaining)?;
    assert_eq!(integer_column(&rows, 2), vec![80, 70, 60]);
    Ok(())
}

#[test]
fn test_delete_partial_failure() -> Result<()> {
    let inner = MemoryStorage::new();
    inner.create_table("employees", employee_schema())?;
    for (id, (dept, salary)) in STAFF.iter().enumerate() {
        inner.insert_tuple("employees", &employee(id as i64, dept, *salary))?;
    }
    let storage = Arc::new(FlakyStorage::new(inner, 4));

    let scan = SeqScan::new(storage.clone(), "employees")?;
    let mut delete = DeleteOperator::new(storage.clone(), "employees", Box::new(scan))?;
    delete.open()?;
    assert!(matches!(
        delete.has_next(),
        Err(QueryError::ModificationFailed { affected: 4, .. })
    ));
    delete.close();

    assert_eq!(storage.row_count_hint("employees")?, 2);
    Ok(())
}

#[test]
fn test_rewind_reproduces_sequence() -> Result<()> {
    let storage = create_employee_storage(&STAFF, 4)?;
    let scan = SeqScan::new(storage, "employees")?;
    let predicate = Predicate::new(2, PredicateOp::GreaterThanOrEq, DataValue::Integer(80));
    let mut tree = FilterOperator::new(predicate, Box::new(scan));

    tree.open()?;
    let first = collect_tuples(&mut tree)?;
    tree.rewind()?;
    let second = collect_tuples(&mut tree)?;
    tree.close();

    assert_eq!(first, second);
    assert_eq!(integer_column(&first, 2), vec![120, 80, 95, 150]);
    Ok(())
}

#[test]
fn test_close_is_harmless() -> Result<()> {
    let storage = create_employee_storage(&STAFF, 4)?;
    let scan = SeqScan::new(storage, "employees")?;
    let predicate = Predicate::new(1, PredicateOp::Like, DataValue::from("e"));
    let mut tree = FilterOperator::new(predicate, Box::new(scan));

    // Never opened
    tree.close();
    assert!(matches!(tree.has_next(), Err(QueryError::IllegalState(_))));

    tree.open()?;
    tree.open()?;
    assert_eq!(collect_tuples(&mut tree)?.len(), 4);
    tree.close();
    tree.close();
    assert!(tree.rewind().is_err());
    Ok(())
}

#[test]
fn test_join_predicate_nested_loop() -> Result<()> {
    let storage = create_employee_storage(&STAFF, 4)?;
    let budgets = Schema::from_pairs([("dept", DataType::Text), ("cap", DataType::Integer)]);
    storage.create_table("budgets", budgets.clone())?;
    for (dept, cap) in [("eng", 100), ("ops", 70)] {
        let row = querycore::Tuple::new(&budgets, vec![DataValue::from(dept), DataValue::Integer(cap)])?;
        storage.insert_tuple("budgets", &row)?;
    }

    let same_dept = JoinPredicate::new(1, PredicateOp::Equals, 0);
    let over_cap = JoinPredicate::new(2, PredicateOp::GreaterThan, 1);

    let mut outer = SeqScan::new(storage.clone(), "employees")?;
    let mut inner = SeqScan::new(storage.clone(), "budgets")?;
    outer.open()?;
    inner.open()?;

    let mut over = Vec::new();
    while outer.has_next()? {
        let left = outer.next()?;
        inner.rewind()?;
        while inner.has_next()? {
            let right = inner.next()?;
            if same_dept.filter(&left, &right)? && over_cap.filter(&left, &right)? {
                over.push(left.get(0)?.clone());
            }
        }
    }
    outer.close();
    inner.close();

    assert_eq!(over, vec![DataValue::Integer(0), DataValue::Integer(1), DataValue::Integer(5)]);
    Ok(())
}

#[test]
fn test_insert_select_into_same_table() -> Result<()> {
    let storage = create_employee_storage(&STAFF[..5], 4)?;
    let scan = SeqScan::new(storage.clone(), "employees")?;
    let mut insert = InsertOperator::new(storage.clone(), "employees", Box::new(scan))?;

    let result = execute(&mut insert)?;
    assert_eq!(integer_column(&result, 0), vec![5]);
    assert_eq!(storage.row_count_hint("employees")?, 10);
    Ok(())
}
