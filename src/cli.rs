use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "package-list")]
#[command(about = "List the packages found on a Java classpath, minus excluded prefixes")]
pub struct Cli {
    /// Jar files or class directories, scanned in the given order
    #[arg(value_name = "PATH")]
    pub entries: Vec<PathBuf>,

    /// Platform path list (`a.jar:classes`), appended after PATH arguments
    #[arg(long = "classpath", value_name = "PATHS")]
    pub classpath_list: Option<OsString>,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// JSON file with `classpath`, `output_file` and `excludes`
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Excluded package prefix; replaces the default list when given
    #[arg(long = "exclude", value_name = "PREFIX")]
    pub excludes: Vec<String>,

    #[arg(long)]
    pub no_default_excludes: bool,

    /// Also list inner packages that directly contain classes
    #[arg(long)]
    pub include_endpoints: bool,

    #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
    Quiet,
}
