use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::classify::classify;
use crate::exclude::Excludes;
use crate::source::ClasspathEntry;
use crate::trie::PackageTrie;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub entries_scanned: usize,
    pub entries_skipped: usize,
    pub names_seen: usize,
    pub classes_seen: usize,
    pub classes_excluded: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub output_file: String,
    pub packages_written: usize,
    pub output_sha256: String,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub stats: ScanStats,
}

/// Scans a classpath and writes the package list consumed by the shading step.
#[derive(Debug, Clone, Default)]
pub struct PackageListGenerator {
    pub classpath: Vec<PathBuf>,
    pub excludes: Excludes,
    pub include_endpoints: bool,
}

impl PackageListGenerator {
    pub fn new(classpath: Vec<PathBuf>, excludes: Excludes) -> Self {
        Self {
            classpath,
            excludes,
            include_endpoints: false,
        }
    }

    pub fn collect_packages(&self) -> Result<(PackageTrie, ScanStats)> {
        let mut trie = PackageTrie::new();
        let mut stats = ScanStats::default();

        for path in &self.classpath {
            let Some(entry) = ClasspathEntry::detect(path) else {
                debug!(path = %path.display(), "skipping missing classpath entry");
                stats.entries_skipped += 1;
                continue;
            };

            let names = entry.entry_names(|name| {
                let Some(package) = classify(name) else {
                    return;
                };
                stats.classes_seen += 1;
                if self.excludes.is_excluded(&package) {
                    stats.classes_excluded += 1;
                } else {
                    trie.insert(&package);
                }
            })?;

            debug!(
                path = %entry.path().display(),
                kind = entry.kind(),
                names,
                "scanned classpath entry"
            );
            stats.entries_scanned += 1;
            stats.names_seen += names;
        }

        Ok((trie, stats))
    }

    pub fn generate_lines(&self) -> Result<(Vec<String>, ScanStats)> {
        let (trie, stats) = self.collect_packages()?;
        Ok((trie.dump(self.include_endpoints).collect(), stats))
    }

    /// Runs the scan and replaces `output_file` with one package per line.
    pub fn generate(&self, output_file: &Path) -> Result<ScanReport> {
        let start = Instant::now();
        let (trie, stats) = self.collect_packages()?;
        let (packages_written, digest) =
            write_lines(output_file, trie.dump(self.include_endpoints))?;

        let report = ScanReport {
            output_file: output_file.to_string_lossy().to_string(),
            packages_written,
            output_sha256: digest,
            duration_ms: start.elapsed().as_millis() as u64,
            stats,
        };
        info!(
            output = %output_file.display(),
            packages = report.packages_written,
            classes = report.stats.classes_seen,
            "package list written"
        );
        Ok(report)
    }
}

/// Writes `lines` to a sibling temp file and renames it over `output_file`, so
/// a failure never leaves a partially written list behind.
///
/// Returns the number of lines and the hex SHA-256 of the written bytes.
pub fn write_lines(
    output_file: &Path,
    lines: impl IntoIterator<Item = String>,
) -> Result<(usize, String)> {
    if let Some(parent) = output_file.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut tmp_os = output_file.as_os_str().to_os_string();
    tmp_os.push(".tmp");
    let tmp = PathBuf::from(tmp_os);

    let written = write_to(&tmp, lines).and_then(|result| {
        std::fs::rename(&tmp, output_file).with_context(|| {
            format!("Failed to replace output file: {}", output_file.display())
        })?;
        Ok(result)
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn write_to(path: &Path, lines: impl IntoIterator<Item = String>) -> Result<(usize, String)> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut count = 0usize;

    for mut line in lines {
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        hasher.update(line.as_bytes());
        count += 1;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush output file: {}", path.display()))?;
    Ok((count, hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use zip::write::FileOptions;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "package_list_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    fn write_jar(path: &Path, names: &[&str]) -> Result<()> {
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        for name in names {
            zip.start_file(*name, FileOptions::default())?;
            zip.write_all(b"cafebabe")?;
        }
        zip.finish()?;
        Ok(())
    }

    fn write_tree(root: &Path, files: &[&str]) -> Result<()> {
        for rel in files {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap())?;
            std::fs::write(path, b"")?;
        }
        Ok(())
    }

    #[test]
    fn directory_scan_emits_deepest_packages_only() -> Result<()> {
        let root = temp_path("dir_scan");
        write_tree(
            &root,
            &["com/acme/A.class", "com/acme/sub/B.class", "com/other/C.class"],
        )?;

        let generator = PackageListGenerator::new(vec![root.clone()], Excludes::new(Vec::new()));
        let (lines, stats) = generator.generate_lines()?;
        assert_eq!(lines, vec!["com/acme/sub", "com/other"]);
        assert_eq!(stats.classes_seen, 3);

        std::fs::remove_dir_all(root)?;
        Ok(())
    }

    #[test]
    fn excluded_and_default_package_classes_are_dropped() -> Result<()> {
        let jar = temp_path("excl.jar");
        write_jar(
            &jar,
            &[
                "Foo.class",
                "org/gradle/Foo.class",
                "org/gradle2/other/Bar.class",
                "com/google/common/base/Strings.class",
                "META-INF/MANIFEST.MF",
            ],
        )?;

        let generator = PackageListGenerator::new(
            vec![jar.clone()],
            Excludes::new(vec!["org/gradle/".to_string()]),
        );
        let (lines, stats) = generator.generate_lines()?;
        // The package of `org/gradle/Foo.class` is `org/gradle`, which does not
        // start with `org/gradle/`.
        assert_eq!(
            lines,
            vec!["org/gradle", "org/gradle2/other", "com/google/common/base"]
        );
        assert_eq!(stats.classes_seen, 3);
        assert_eq!(stats.classes_excluded, 0);
        assert_eq!(stats.names_seen, 5);

        let generator =
            PackageListGenerator::new(vec![jar.clone()], Excludes::new(vec!["org/gradle".to_string()]));
        let (lines, stats) = generator.generate_lines()?;
        assert_eq!(lines, vec!["com/google/common/base"]);
        assert_eq!(stats.classes_excluded, 2);

        std::fs::remove_file(jar)?;
        Ok(())
    }

    #[test]
    fn missing_entries_are_skipped() -> Result<()> {
        let out = temp_path("empty_out.txt");
        let generator = PackageListGenerator::new(
            vec![temp_path("nope.jar"), temp_path("nope-dir")],
            Excludes::default(),
        );

        let report = generator.generate(&out)?;
        assert_eq!(report.packages_written, 0);
        assert_eq!(report.stats.entries_skipped, 2);
        assert_eq!(std::fs::read_to_string(&out)?, "");

        std::fs::remove_file(out)?;
        Ok(())
    }

    #[test]
    fn entries_merge_in_classpath_order() -> Result<()> {
        let jar = temp_path("merge.jar");
        write_jar(&jar, &["org/beta/B.class", "com/acme/X.class"])?;
        let dir = temp_path("merge_dir");
        write_tree(&dir, &["org/alpha/A.class", "com/acme/deep/Y.class"])?;

        let generator =
            PackageListGenerator::new(vec![jar.clone(), dir.clone()], Excludes::new(Vec::new()));
        let (lines, stats) = generator.generate_lines()?;
        assert_eq!(lines, vec!["org/beta", "org/alpha", "com/acme/deep"]);
        assert_eq!(stats.entries_scanned, 2);

        std::fs::remove_file(jar)?;
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[test]
    fn generate_is_deterministic_and_overwrites() -> Result<()> {
        let dir = temp_path("determinism_dir");
        write_tree(&dir, &["b/y/Y.class", "a/x/X.class", "a/x/z/Z.class"])?;
        let out = temp_path("determinism_out/packages.txt");
        std::fs::create_dir_all(out.parent().unwrap())?;
        std::fs::write(&out, "stale\n")?;

        let generator = PackageListGenerator::new(vec![dir.clone()], Excludes::new(Vec::new()));
        let first = generator.generate(&out)?;
        let first_bytes = std::fs::read(&out)?;
        let second = generator.generate(&out)?;
        let second_bytes = std::fs::read(&out)?;

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first.output_sha256, second.output_sha256);
        assert_eq!(String::from_utf8(first_bytes)?, "a/x/z\nb/y\n");

        std::fs::remove_dir_all(dir)?;
        std::fs::remove_dir_all(out.parent().unwrap())?;
        Ok(())
    }

    #[test]
    fn corrupt_archive_aborts_without_output() -> Result<()> {
        let jar = temp_path("broken.jar");
        std::fs::write(&jar, b"PK but not really")?;
        let out = temp_path("broken_out.txt");

        let generator = PackageListGenerator::new(vec![jar.clone()], Excludes::default());
        let err = generator.generate(&out).unwrap_err();
        assert!(format!("{err:#}").contains(&jar.display().to_string()));
        assert!(!out.exists());

        std::fs::remove_file(jar)?;
        Ok(())
    }

    #[test]
    fn non_jar_files_on_classpath_contribute_nothing() -> Result<()> {
        let base = temp_path("non_jar");
        let props = base.join("log4j.properties");
        write_tree(&base, &["classes/com/acme/A.class"])?;
        std::fs::write(&props, b"log4j.rootLogger=INFO\n")?;

        let generator = PackageListGenerator::new(
            vec![props, base.join("classes")],
            Excludes::new(Vec::new()),
        );
        let (lines, stats) = generator.generate_lines()?;
        assert_eq!(lines, vec!["com/acme"]);
        assert_eq!(stats.entries_scanned, 2);
        assert_eq!(stats.entries_skipped, 0);

        std::fs::remove_dir_all(base)?;
        Ok(())
    }

    #[test]
    fn output_write_failure_names_path_and_cleans_up() -> Result<()> {
        let root = temp_path("write_fail_src");
        write_tree(&root, &["com/acme/A.class"])?;
        let out = temp_path("write_fail_out");
        std::fs::create_dir_all(&out)?;

        let generator = PackageListGenerator::new(vec![root.clone()], Excludes::new(Vec::new()));
        let err = generator.generate(&out).unwrap_err();
        assert!(format!("{err:#}").contains(&out.display().to_string()));

        let mut tmp = out.as_os_str().to_os_string();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
        assert!(out.is_dir());

        std::fs::remove_dir_all(root)?;
        std::fs::remove_dir_all(out)?;
        Ok(())
    }

    #[test]
    fn include_endpoints_also_lists_inner_packages() -> Result<()> {
        let root = temp_path("endpoints");
        write_tree(&root, &["com/acme/A.class", "com/acme/sub/B.class"])?;

        let mut generator = PackageListGenerator::new(vec![root.clone()], Excludes::new(Vec::new()));
        generator.include_endpoints = true;
        let (lines, _) = generator.generate_lines()?;
        assert_eq!(lines, vec!["com/acme", "com/acme/sub"]);

        std::fs::remove_dir_all(root)?;
        Ok(())
    }
}
