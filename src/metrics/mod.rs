pub mod query;
pub mod response;

pub use query::{
    Cursor, DEFAULT_LIMIT, FilterCondition, LogicalOperator, MetricQuery, SortField, SortOrder,
};
pub use response::{
    LABEL_NOT_AVAILABLE, MetricGroup, MetricPoint, MetricValue, MetricsPage, Preview, normalize,
    normalize_value,
};
