use crate::types::DetailFlags;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "task-status")]
#[command(about = "Report the status of a submitted batch task")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Query the status of a task: progress, sites, breakdowns and errors
    #[command(visible_alias = "st")]
    Status(StatusArgs),

    /// Print job indices in compact range notation (e.g. 1-3,5,7-9)
    Ranges {
        /// Job indices, separated by spaces or commas
        #[arg(required = true, value_name = "INDEX")]
        indices: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Task identifier as known by the server
    #[arg(long, short = 't', value_name = "NAME")]
    pub task: Option<String>,

    /// Project directory holding the request cache of a submitted task
    #[arg(long, short = 'd', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Server host or URL (default: from environment, request cache or config file)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// REST instance path on the server, e.g. "crabserver/prod"
    #[arg(long, value_name = "NAME")]
    pub api: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Provide details about submitted jobs
    #[arg(long, short = 's')]
    pub submitted: bool,

    /// Provide details about failed jobs and list their exit codes
    #[arg(long, short = 'f')]
    pub failure: bool,

    /// Provide details about queued jobs
    #[arg(long, short = 'q')]
    pub queued: bool,

    /// Provide details about successful jobs
    #[arg(long, short = 'u')]
    pub success: bool,

    /// Provide details about sites, including per-site errors
    #[arg(long, short = 'i')]
    pub site: bool,

    /// Print the aggregated summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write the aggregated summary as JSON to this file
    #[arg(long = "output-json", value_name = "PATH")]
    pub output_json: Option<PathBuf>,

    /// Render from a saved task summary response instead of querying the server
    #[arg(long, value_name = "PATH")]
    pub summary_file: Option<PathBuf>,

    /// Saved error breakdown response, used with --summary-file
    #[arg(long, value_name = "PATH", requires = "summary_file")]
    pub errors_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

impl StatusArgs {
    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.task.is_none() && self.dir.is_none() && self.summary_file.is_none() {
            return Err("Cannot determine which task to query. \
                 Please specify --task <NAME>, --dir <PROJECT_DIR> or --summary-file <PATH>"
                .to_string());
        }

        if self.summary_file.is_some() && self.errors_file.is_none() && (self.site || self.failure) {
            return Err("--site and --failure need an --errors-file when rendering from --summary-file".to_string());
        }

        Ok(())
    }

    /// Breakdowns requested on the command line
    pub fn detail_flags(&self) -> DetailFlags {
        DetailFlags {
            submitted: self.submitted,
            failure: self.failure,
            queued: self.queued,
            success: self.success,
            site: self.site,
        }
    }
}
