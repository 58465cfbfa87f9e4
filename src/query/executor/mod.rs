// Query Executor Module
//
// This module implements the iterator-based execution model: values, tuples
// and errors, predicates, and the operators that pull tuples through a tree.

pub mod result;
pub mod predicate;
pub mod operators;

// Export key types
pub use self::result::{DataValue, QueryError, QueryResult, Tuple};
pub use self::predicate::{JoinPredicate, Predicate, PredicateOp};
pub use self::operators::Operator;
