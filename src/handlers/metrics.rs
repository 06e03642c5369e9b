use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::api::EvalsClient;
use crate::cli::MetricsQueryArgs;
use crate::handlers::common::ResponseFormatter;
use crate::metrics::{
    Cursor, FilterCondition, LogicalOperator, MetricGroup, MetricQuery, MetricsPage, SortField,
    SortOrder,
};
use crate::utils::{days_ago, format_event_time, resolve_timestamp};

/// Query window used when no start is given
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Labels shown next to each point
const DISPLAY_LABELS: [&str; 2] = ["environment", "trace_id"];

pub struct MetricsHandler;

impl ResponseFormatter for MetricsHandler {}

impl MetricsHandler {
    /// Translate command-line arguments into a query
    pub fn build_query(args: &MetricsQueryArgs) -> crate::Result<MetricQuery> {
        let from_ts = match args.from.as_deref() {
            Some(from) => resolve_timestamp(from)?,
            None => days_ago(DEFAULT_WINDOW_DAYS),
        };

        let mut query = MetricQuery::new(args.project_id.clone(), from_ts);
        query.to_ts = args.to.as_deref().map(resolve_timestamp).transpose()?;
        query.environments = args
            .environments
            .iter()
            .filter(|e| !e.is_empty())
            .cloned()
            .collect();
        query.metric_name = args.metric_name.clone();
        query.metric_source = args.metric_source.clone();
        query.filters = args
            .filters
            .iter()
            .map(|f| f.parse::<FilterCondition>())
            .collect::<crate::Result<Vec<_>>>()?;

        if let Some(op) = args.logical_operator.as_deref() {
            query.logical_operator = op.parse::<LogicalOperator>()?;
        }
        if let Some(by) = args.sort_by.as_deref() {
            query.sort_by = by.parse::<SortField>()?;
        }
        if let Some(order) = args.sort_order.as_deref() {
            query.sort_order = order.parse::<SortOrder>()?;
        }

        query.limit = args.limit;
        query.cursor = Cursor(args.cursor);
        Ok(query)
    }

    pub async fn query(client: &EvalsClient, args: &MetricsQueryArgs) -> Result<String> {
        let handler = MetricsHandler;
        let query = Self::build_query(args)?;
        let page = client.query_metrics(&query).await?;
        let next = page.next_cursor(query.cursor, query.effective_limit());

        if args.json {
            return Ok(handler.format_json(&json!({
                "data": page.data,
                "total_points": page.total_points,
                "total_results": page.total_results,
                "next_cursor": next,
            }))?);
        }

        Ok(handler.render(&page, args.max_points, next))
    }

    pub fn render(&self, page: &MetricsPage, max_points: usize, next: Option<Cursor>) -> String {
        if page.data.is_empty() {
            return "No metrics found.".yellow().to_string();
        }

        let mut out = String::new();
        for group in &page.data {
            out.push_str(&self.render_group(group, max_points));
            out.push('\n');
        }

        out.push_str(
            &format!(
                "Points: {}  Total results: {}",
                page.total_points, page.total_results
            )
            .dimmed()
            .to_string(),
        );

        if let Some(cursor) = next {
            out.push_str(&format!("\nMore results may exist: use --cursor {}", cursor.0));
        }
        out
    }

    fn render_group(&self, group: &MetricGroup, max_points: usize) -> String {
        let preview = group.preview(max_points);

        let mut headers = vec!["Event Time", "Value"];
        headers.extend(DISPLAY_LABELS.iter().map(|l| match *l {
            "environment" => "Environment",
            "trace_id" => "Trace ID",
            other => other,
        }));

        let rows: Vec<Vec<String>> = preview
            .shown
            .iter()
            .map(|p| {
                let mut row = vec![format_event_time(p.event_time), p.value.to_string()];
                row.extend(DISPLAY_LABELS.iter().map(|l| p.label(l).to_string()));
                row
            })
            .collect();

        let title = format!("{} ({} point(s))", group.metric_name, group.points.len());
        let mut out = self.format_table(&title, &headers, &rows);
        if preview.omitted > 0 {
            out.push_str(
                &format!("... {} more point(s)\n", preview.omitted)
                    .dimmed()
                    .to_string(),
            );
        }
        out
    }
}
