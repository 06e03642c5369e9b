use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(name = "evals-cli", version)]
#[command(about = "Evals CLI - Manage auto-monitor-setups and evaluations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Configure API connection settings")]
    Configure {
        #[arg(long, default_value = DEFAULT_BASE_URL, help = "Base URL for the API")]
        base_url: String,
        #[arg(long, help = "Authentication token (prompted for when omitted)")]
        auth_token: Option<String>,
    },
    #[command(name = "org", about = "Manage organizations")]
    Org {
        #[command(subcommand)]
        command: OrgCommands,
    },
    #[command(about = "Manage auto-monitor-setups")]
    Setup {
        #[command(subcommand)]
        command: SetupCommands,
    },
    #[command(about = "View monitoring status and pipeline health")]
    Monitoring {
        #[command(subcommand)]
        command: MonitoringCommands,
    },
    #[command(about = "Query evaluation metrics")]
    Metrics {
        #[command(subcommand)]
        command: MetricsCommands,
    },
    #[command(
        about = "Create an organization, attach a monitor and read back status and metrics",
        long_about = "Run the onboarding flow end to end.\n\nCreates an organization, uses the API key of its first environment to create an auto-monitor-setup, then reads monitoring status and the last 7 days of metrics."
    )]
    Quickstart(QuickstartArgs),
}

#[derive(Debug, Subcommand)]
pub enum OrgCommands {
    #[command(about = "Create an organization and issue API keys for its environments")]
    Create {
        #[arg(long, help = "Organization name")]
        name: String,
        #[arg(long = "environment", help = "Environment to create (repeatable)")]
        environments: Vec<String>,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SetupCommands {
    #[command(about = "Create a new auto-monitor-setup")]
    Create {
        #[arg(short = 't', long, help = "Entity type (e.g., 'agent')")]
        entity_type: String,
        #[arg(short = 'v', long, help = "Entity value/name")]
        entity_value: String,
        #[arg(short = 'e', long = "evaluator-id", help = "Evaluator ID to use (repeatable)")]
        evaluator_ids: Vec<String>,
        #[arg(
            short = 'T',
            long = "evaluator-type",
            help = "Evaluator type to create, e.g. 'hallucination' or 'toxicity' (repeatable)"
        )]
        evaluator_types: Vec<String>,
    },
    #[command(about = "List auto-monitor-setups")]
    List {
        #[arg(short = 't', long, help = "Filter by entity type")]
        entity_type: Option<String>,
        #[arg(short = 's', long, help = "Filter by status (e.g., 'pending', 'active')")]
        status: Option<String>,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Get details of a specific auto-monitor-setup")]
    Get {
        #[arg(help = "Setup ID")]
        setup_id: String,
    },
    #[command(about = "Delete an auto-monitor-setup")]
    Delete {
        #[arg(help = "Setup ID")]
        setup_id: String,
        #[arg(short = 'y', long, help = "Skip confirmation prompt")]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum MonitoringCommands {
    #[command(
        about = "Get monitoring status for the organization",
        long_about = "Shows evaluation pipeline health including lag metrics and status.\n\nStatus values:\n  OK: lag <= 3 minutes\n  DEGRADED: 3min < lag <= 10min\n  ERROR: lag > 10min or no evaluation data"
    )]
    Status {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum MetricsCommands {
    #[command(
        about = "Query metrics for a project",
        long_about = "Query metrics for a project.\n\nTimestamps accept epoch seconds or YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS, YYYY-MM-DD HH:MM:SS (UTC).\n\nExamples:\n  metrics query --project-id demo --from 2024-01-01 --limit 10\n  metrics query --project-id demo --filter '{\"field\":\"environment\",\"operator\":\"eq\",\"value\":\"prd\"}'\n"
    )]
    Query(MetricsQueryArgs),
}

#[derive(Debug, Clone, Args)]
pub struct MetricsQueryArgs {
    #[arg(long, env = "EVALS_PROJECT_ID", help = "Project ID")]
    pub project_id: String,
    #[arg(long, help = "Start of the window (default: 7 days ago)")]
    pub from: Option<String>,
    #[arg(long, help = "End of the window (default: now)")]
    pub to: Option<String>,
    #[arg(long = "environment", help = "Environment filter (repeatable)")]
    pub environments: Vec<String>,
    #[arg(long, help = "Exact metric name")]
    pub metric_name: Option<String>,
    #[arg(long, help = "Exact metric source")]
    pub metric_source: Option<String>,
    #[arg(long = "filter", help = "Filter condition as JSON {field, operator, value} (repeatable)")]
    pub filters: Vec<String>,
    #[arg(long, value_parser = ["and", "or"], help = "How filters combine (default: and)")]
    pub logical_operator: Option<String>,
    #[arg(long, value_parser = ["event_time", "metric_name", "value"], help = "Sort field (default: event_time)")]
    pub sort_by: Option<String>,
    #[arg(long, value_parser = ["asc", "desc"], help = "Sort order (default: desc)")]
    pub sort_order: Option<String>,
    #[arg(long, help = "Page size (default: 50)")]
    pub limit: Option<u32>,
    #[arg(long, default_value_t = 0, help = "Offset of the first result")]
    pub cursor: u64,
    #[arg(long, default_value_t = 10, help = "Points shown per metric")]
    pub max_points: usize,
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct QuickstartArgs {
    #[arg(long, help = "Name of the organization to create")]
    pub org_name: String,
    #[arg(long = "environment", default_value = "prd", help = "Environment to create (repeatable)")]
    pub environments: Vec<String>,
    #[arg(short = 't', long, default_value = "workflow", help = "Entity type to monitor")]
    pub entity_type: String,
    #[arg(short = 'v', long, help = "Entity value/name to monitor")]
    pub entity_value: String,
    #[arg(short = 'T', long = "evaluator-type", default_value = "char-count", help = "Evaluator type (repeatable)")]
    pub evaluator_types: Vec<String>,
    #[arg(long, env = "EVALS_PROJECT_ID", default_value = "demo-project", help = "Project to query metrics for")]
    pub project_id: String,
}
