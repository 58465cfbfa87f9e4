// Query Processing Module
//
// This module contains the operator-tree executor and the statistics the
// planner uses to cost plans.

pub mod executor;
pub mod planner;

// Export key public interfaces
pub use executor::operators::Operator;
pub use executor::result::QueryResult;
