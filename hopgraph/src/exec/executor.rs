// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Main query executor implementation
//!
//! Walks a validated [`QueryPlan`]. Pipeline stages run strictly in order;
//! each stage sees the previous stage's table as `$-` and the context's
//! variables as `$name`.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::binding::{bind, ColumnAccessor};
use super::config::EngineConfig;
use super::context::ExecutionContext;
use super::error::ExecutionError;
use super::expander::{ExpansionRecord, FrontierExpander, StepPredicate, VertexCache};
use super::expression::{ExpressionEvaluator, RowScope};
use super::path_assembler::{PathAssembler, PathRequest};
use super::result::{distinct_rows, ResultTable, Row};
use super::set_ops::combine;
use super::step_controller::StepController;
use crate::ast::Expression;
use crate::plan::{
    FilterStage, FindPathPlan, GoPlan, OutputColumn, PlanNode, QueryPlan, VertexOrigin, YieldPlan,
    PATH_COLUMN,
};
use crate::storage::{GraphDataProvider, Value, VertexId};

/// Input rows a traversal result is joined back to
struct InputJoin {
    accessor: ColumnAccessor,
    index: HashMap<VertexId, Vec<usize>>,
}

/// WHERE evaluated on every hop, before records feed the next frontier
struct HopFilter<'e> {
    evaluator: &'e dyn ExpressionEvaluator,
    context: &'e ExecutionContext,
    condition: &'e Expression,
    cache: &'e VertexCache,
    needs_source: bool,
    needs_destination: bool,
}

impl StepPredicate for HopFilter<'_> {
    fn prepare(&self, records: &[ExpansionRecord]) -> Result<(), ExecutionError> {
        prefetch(self.cache, records.iter(), self.needs_source, self.needs_destination)
    }

    fn accept(&self, record: &ExpansionRecord) -> Result<bool, ExecutionError> {
        let source = self.cache.get(&record.source);
        let destination = self.cache.get(&record.destination);
        let scope = self
            .context
            .scope()
            .with_source(&record.source, source.as_ref())
            .with_edge(&record.edge)
            .with_destination(&record.destination, destination.as_ref());
        self.evaluator.evaluate_predicate(self.condition, &scope)
    }
}

fn prefetch<'r>(
    cache: &VertexCache,
    records: impl Iterator<Item = &'r ExpansionRecord>,
    sources: bool,
    destinations: bool,
) -> Result<(), ExecutionError> {
    if !sources && !destinations {
        return Ok(());
    }
    let ids = records.flat_map(|record| {
        let source = sources.then_some(&record.source);
        let destination = destinations.then_some(&record.destination);
        source.into_iter().chain(destination)
    });
    cache.fetch(ids)
}

/// Executes validated plans against a graph data provider
pub struct QueryExecutor {
    provider: Arc<dyn GraphDataProvider>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    config: EngineConfig,
}

impl QueryExecutor {
    pub fn new(
        provider: Arc<dyn GraphDataProvider>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            evaluator,
            config,
        }
    }

    /// Run every statement; the result is the last statement's table
    ///
    /// A trailing assignment yields an empty table without columns.
    pub fn execute(
        &self,
        plan: &QueryPlan,
        context: &mut ExecutionContext,
    ) -> Result<ResultTable, ExecutionError> {
        let mut result = ResultTable::default();
        for statement in &plan.statements {
            context.check_cancelled()?;
            let table = self.execute_node(&statement.root, None, context)?;
            match &statement.variable {
                Some(name) => {
                    debug!(
                        "[{}] ${} bound to {} rows",
                        context.query_id,
                        name,
                        table.len()
                    );
                    if context.get_variable(name).is_some() {
                        context.add_warning(format!("Variable `${}' rebound", name));
                    }
                    context.set_variable(name, table);
                    result = ResultTable::default();
                }
                None => result = table,
            }
        }
        Ok(result)
    }

    fn execute_node(
        &self,
        node: &PlanNode,
        input: Option<Arc<ResultTable>>,
        context: &ExecutionContext,
    ) -> Result<ResultTable, ExecutionError> {
        match node {
            PlanNode::Go(go) => self.execute_go(go, input.as_ref(), context),
            PlanNode::FindPath(find) => self.execute_find_path(find, input.as_ref(), context),
            PlanNode::Yield(yield_plan) => self.execute_yield(yield_plan, input.as_ref(), context),
            PlanNode::Pipe { left, right } => {
                let left = self.execute_node(left, input, context)?;
                context.check_cancelled()?;
                debug!("[{}] piping {} rows", context.query_id, left.len());
                self.execute_node(right, Some(Arc::new(left)), context)
            }
            PlanNode::SetOperation {
                operation,
                left,
                right,
                column_types,
            } => {
                let left = self.execute_node(left, input.clone(), context)?;
                context.check_cancelled()?;
                let right = self.execute_node(right, input, context)?;
                context.check_cancelled()?;
                let combined = combine(*operation, left, right, column_types)?;
                debug!(
                    "[{}] {} produced {} rows",
                    context.query_id,
                    operation,
                    combined.len()
                );
                Ok(combined)
            }
        }
    }

    fn execute_go(
        &self,
        go: &GoPlan,
        input: Option<&Arc<ResultTable>>,
        context: &ExecutionContext,
    ) -> Result<ResultTable, ExecutionError> {
        let (origins, join) = match &go.origin {
            VertexOrigin::Constants(ids) => (ids.clone(), None),
            VertexOrigin::Column { source, column } => {
                let accessor = ColumnAccessor::new(bind(input, source, context)?, column)?;
                let index = accessor.rows_by_vertex();
                (accessor.distinct_vertex_ids(), Some(InputJoin { accessor, index }))
            }
        };

        let expander = FrontierExpander::new(Arc::clone(&self.provider), &self.config);
        let cache = VertexCache::new(Arc::clone(&self.provider));
        let mut rows = Vec::new();

        if go.min_steps == 0 && go.zero_hop_rows {
            cache.fetch(&origins)?;
            for origin in origins.iter().filter(|id| cache.exists(id)) {
                let vertex = cache.get(origin);
                let scope = context.scope().with_source(origin, vertex.as_ref());
                if go.filter_stage == FilterStage::EveryHop && !self.accepts(go, &scope)? {
                    continue;
                }
                self.emit(go, scope, std::slice::from_ref(origin), join.as_ref(), &mut rows)?;
            }
        }

        let hop_filter = match (&go.filter, go.filter_stage) {
            (Some(condition), FilterStage::EveryHop) => Some(HopFilter {
                evaluator: self.evaluator.as_ref(),
                context,
                condition,
                cache: &cache,
                needs_source: go.needs_source_vertex,
                needs_destination: go.needs_destination_vertex,
            }),
            _ => None,
        };
        let records = StepController::new(&expander, context).run(
            &origins,
            go.min_steps,
            go.max_steps,
            &go.edge_types,
            go.direction,
            hop_filter.as_ref().map(|f| f as &dyn StepPredicate),
        )?;

        prefetch(
            &cache,
            records.iter().map(|r| &r.record),
            go.needs_source_vertex,
            go.needs_destination_vertex,
        )?;
        for step in &records {
            let record = &step.record;
            let source = cache.get(&record.source);
            let destination = cache.get(&record.destination);
            let scope = context
                .scope()
                .with_source(&record.source, source.as_ref())
                .with_edge(&record.edge)
                .with_destination(&record.destination, destination.as_ref());
            self.emit(go, scope, &step.roots, join.as_ref(), &mut rows)?;
        }

        if go.distinct {
            rows = distinct_rows(rows);
        }
        debug!(
            "[{}] GO {}..{} over {} from {} origins: {} rows",
            context.query_id,
            go.min_steps,
            go.max_steps,
            go.edge_types.join(","),
            origins.len(),
            rows.len()
        );
        Ok(ResultTable::with_rows(column_names(&go.columns), rows))
    }

    /// Project one traversal result, once per input row it joins to
    fn emit(
        &self,
        go: &GoPlan,
        scope: RowScope<'_>,
        roots: &[VertexId],
        join: Option<&InputJoin>,
        rows: &mut Vec<Row>,
    ) -> Result<(), ExecutionError> {
        let Some(join) = join else {
            if let Some(row) = self.project_go_row(go, &scope)? {
                rows.push(row);
            }
            return Ok(());
        };

        let table = join.accessor.table();
        for root in roots {
            let Some(positions) = join.index.get(root) else {
                continue;
            };
            for input_row in positions.iter().filter_map(|&p| table.rows().get(p)) {
                let scope = scope.with_input(table, input_row);
                if let Some(row) = self.project_go_row(go, &scope)? {
                    rows.push(row);
                }
            }
        }
        Ok(())
    }

    fn project_go_row(&self, go: &GoPlan, scope: &RowScope<'_>) -> Result<Option<Row>, ExecutionError> {
        if go.filter_stage == FilterStage::AfterJoin && !self.accepts(go, scope)? {
            return Ok(None);
        }
        self.project(&go.columns, scope).map(Some)
    }

    fn accepts(&self, go: &GoPlan, scope: &RowScope<'_>) -> Result<bool, ExecutionError> {
        match &go.filter {
            Some(condition) => self.evaluator.evaluate_predicate(condition, scope),
            None => Ok(true),
        }
    }

    fn project(&self, columns: &[OutputColumn], scope: &RowScope<'_>) -> Result<Row, ExecutionError> {
        columns
            .iter()
            .map(|column| self.evaluator.evaluate(&column.expression, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(Row::new)
    }

    fn execute_find_path(
        &self,
        find: &FindPathPlan,
        input: Option<&Arc<ResultTable>>,
        context: &ExecutionContext,
    ) -> Result<ResultTable, ExecutionError> {
        let sources = resolve_ids(&find.sources, input, context)?;
        let targets = resolve_ids(&find.targets, input, context)?;
        let expander = FrontierExpander::new(Arc::clone(&self.provider), &self.config);

        let paths = PathAssembler::new(&expander, context).find_paths(&PathRequest {
            sources: &sources,
            targets: &targets,
            edge_types: &find.edge_types,
            direction: find.direction,
            max_steps: find.max_steps,
            mode: find.mode,
            include_zero_length: self.config.all_paths_include_zero_length,
        })?;
        debug!(
            "[{}] FIND {} PATH: {} sources, {} targets, {} paths",
            context.query_id,
            find.mode,
            sources.len(),
            targets.len(),
            paths.len()
        );

        let rows = paths
            .into_iter()
            .map(|path| Row::new(vec![Value::Path(path)]))
            .collect();
        Ok(ResultTable::with_rows(vec![PATH_COLUMN.to_string()], rows))
    }

    fn execute_yield(
        &self,
        plan: &YieldPlan,
        input: Option<&Arc<ResultTable>>,
        context: &ExecutionContext,
    ) -> Result<ResultTable, ExecutionError> {
        let mut rows = Vec::new();
        let mut produce = |scope: &RowScope<'_>| -> Result<(), ExecutionError> {
            if let Some(condition) = &plan.filter {
                if !self.evaluator.evaluate_predicate(condition, scope)? {
                    return Ok(());
                }
            }
            rows.push(self.project(&plan.columns, scope)?);
            Ok(())
        };

        match &plan.input {
            None => produce(&context.scope())?,
            Some(source) => {
                let table = bind(input, source, context)?;
                for row in table.rows() {
                    produce(&context.scope().with_input(&table, row))?;
                }
            }
        }

        if plan.distinct {
            rows = distinct_rows(rows);
        }
        Ok(ResultTable::with_rows(column_names(&plan.columns), rows))
    }
}

fn resolve_ids(
    origin: &VertexOrigin,
    input: Option<&Arc<ResultTable>>,
    context: &ExecutionContext,
) -> Result<Vec<VertexId>, ExecutionError> {
    match origin {
        VertexOrigin::Constants(ids) => Ok(ids.clone()),
        VertexOrigin::Column { source, column } => {
            Ok(ColumnAccessor::new(bind(input, source, context)?, column)?.distinct_vertex_ids())
        }
    }
}

fn column_names(columns: &[OutputColumn]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}
