use anyhow::Result;
use clap::Parser;
use package_list::cli::{Cli, ReportFormat};
use package_list::config::resolve_settings;
use package_list::generate::{PackageListGenerator, ScanReport};
use package_list::logging;

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    let generator = PackageListGenerator {
        classpath: settings.classpath,
        excludes: settings.excludes,
        include_endpoints: settings.include_endpoints,
    };
    let report = generator.generate(&settings.output_file)?;
    print_report(&report, cli.format)
}

fn print_report(report: &ScanReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("output_file: {}\n", report.output_file));
            out.push_str(&format!("packages_written: {}\n", report.packages_written));
            out.push_str(&format!("classes_seen: {}\n", report.stats.classes_seen));
            out.push_str(&format!("classes_excluded: {}\n", report.stats.classes_excluded));
            out.push_str(&format!(
                "entries: {} scanned, {} skipped\n",
                report.stats.entries_scanned, report.stats.entries_skipped
            ));
            out.push_str(&format!("output_sha256: {}\n", report.output_sha256));
            out.push_str(&format!("duration_ms: {}\n", report.duration_ms));
            print!("{out}");
        }
        ReportFormat::Quiet => {}
    }
    Ok(())
}
