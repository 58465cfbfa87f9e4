// Aggregate Operator
//
// Computes one aggregate over its child, optionally grouped by one column.
// The child is drained once, when the operator is built; open only resets
// the cursor over the materialized groups.

use log::debug;

use crate::catalog::{DataType, Schema};
use crate::query::executor::operators::values::ValuesOperator;
use crate::query::executor::result::{QueryError, QueryResult, Tuple};
use super::super::{expect_children, BoxedOperator, Operator};
use super::{AggregateOp, HashAggregator};

pub struct AggregateOperator {
    input: BoxedOperator,
    aggregate_field: usize,
    group_field: Option<usize>,
    op: AggregateOp,
    schema: Schema,
    /// Materialized groups; None after `close` until the next `open`
    output: Option<ValuesOperator>,
}

impl AggregateOperator {
    /// Build the operator and compute every group from `input`.
    ///
    /// The output schema is `(OP(field))`, or `(group, OP(field))` when
    /// grouping. The aggregate column is always INTEGER.
    pub fn new(
        input: BoxedOperator,
        aggregate_field: usize,
        group_field: Option<usize>,
        op: AggregateOp,
    ) -> QueryResult<Self> {
        let schema = output_schema(input.schema(), aggregate_field, group_field, op)?;
        let mut aggregate = AggregateOperator {
            input,
            aggregate_field,
            group_field,
            op,
            schema,
            output: None,
        };
        aggregate.materialize()?;
        Ok(aggregate)
    }

    pub fn aggregate_field(&self) -> usize {
        self.aggregate_field
    }

    pub fn group_field(&self) -> Option<usize> {
        self.group_field
    }

    pub fn aggregate_op(&self) -> AggregateOp {
        self.op
    }

    /// Name of the aggregated column in the child's schema
    pub fn aggregate_field_name(&self) -> &str {
        self.input.schema().field_name(self.aggregate_field).unwrap_or_default()
    }

    /// Name of the grouping column in the child's schema, if grouping
    pub fn group_field_name(&self) -> Option<&str> {
        self.group_field.and_then(|index| self.input.schema().field_name(index).ok())
    }

    /// Drain the child through a fresh aggregator
    fn materialize(&mut self) -> QueryResult<()> {
        let output = build_groups(
            self.input.as_mut(),
            &self.schema,
            self.aggregate_field,
            self.group_field,
            self.op,
        )?;
        self.output = Some(output);
        Ok(())
    }

    fn output(&mut self) -> QueryResult<&mut ValuesOperator> {
        self.output.as_mut()
            .ok_or_else(|| QueryError::IllegalState("Aggregate operator is not open".to_string()))
    }
}

fn build_groups(
    input: &mut dyn Operator,
    schema: &Schema,
    aggregate_field: usize,
    group_field: Option<usize>,
    op: AggregateOp,
) -> QueryResult<ValuesOperator> {
    let mut aggregator = HashAggregator::new(input.schema(), aggregate_field, group_field, op)?;

    input.open()?;
    let drained = drain_into(input, &mut aggregator);
    input.close();
    drained?;

    debug!("{} built {} groups", schema, aggregator.group_count());
    ValuesOperator::new(schema.clone(), aggregator.results())
}

fn drain_into(input: &mut dyn Operator, aggregator: &mut HashAggregator) -> QueryResult<()> {
    while input.has_next()? {
        aggregator.merge(&input.next()?)?;
    }
    Ok(())
}

fn output_schema(
    input: &Schema,
    aggregate_field: usize,
    group_field: Option<usize>,
    op: AggregateOp,
) -> QueryResult<Schema> {
    let aggregate_name = format!("{}({})", op, input.field_name(aggregate_field)?);
    let schema = match group_field {
        None => Schema::from_pairs([(aggregate_name, DataType::Integer)]),
        Some(index) => {
            let group = input.column(index)?;
            Schema::from_pairs([
                (group.name().to_string(), group.data_type()),
                (aggregate_name, DataType::Integer),
            ])
        }
    };
    Ok(schema)
}

impl Operator for AggregateOperator {
    fn open(&mut self) -> QueryResult<()> {
        if self.output.is_none() {
            self.materialize()?;
        }
        self.output()?.open()
    }

    fn has_next(&mut self) -> QueryResult<bool> {
        self.output()?.has_next()
    }

    fn next(&mut self) -> QueryResult<Tuple> {
        self.output()?.next()
    }

    fn rewind(&mut self) -> QueryResult<()> {
        self.output()?.rewind()
    }

    fn close(&mut self) {
        self.output = None;
        self.input.close();
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.input.as_ref()]
    }

    /// Swapping the child recomputes every group. On failure the operator
    /// keeps its previous child and groups.
    fn replace_children(&mut self, children: Vec<BoxedOperator>) -> QueryResult<Vec<BoxedOperator>> {
        let mut children = expect_children("Aggregate", 1, children)?;
        let mut input = children.remove(0);
        let schema = output_schema(input.schema(), self.aggregate_field, self.group_field, self.op)?;
        let output = build_groups(input.as_mut(), &schema, self.aggregate_field, self.group_field, self.op)?;

        let old = std::mem::replace(&mut self.input, input);
        self.schema = schema;
        self.output = Some(output);
        Ok(vec![old])
    }
}
