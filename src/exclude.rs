use crate::classify::PackagePath;

/// Packages that must never be relocated: the Java runtime, Groovy, the
/// embedded Ant/XML/logging libraries and Gradle itself.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "org/gradle",
    "java",
    "javax",
    "groovy",
    "groovyjarjarantlr",
    "net/rubygrapefruit",
    "org/codehaus/groovy",
    "org/apache/tools/ant",
    "org/apache/commons/logging",
    "org/slf4j",
    "org/apache/log4j",
    "org/apache/xerces",
    "org/w3c/dom",
    "org/xml/sax",
];

/// Ordered list of excluded package prefixes.
///
/// Matching is a plain string prefix test on the slash-joined package, not
/// segment-aware: `org/gradle` also excludes `org/gradle2/x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excludes {
    prefixes: Vec<String>,
}

impl Default for Excludes {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect())
    }
}

impl Excludes {
    /// Replaces the default list entirely.
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_excluded(&self, path: &PackagePath) -> bool {
        is_excluded(path, &self.prefixes)
    }
}

pub fn is_excluded<S: AsRef<str>>(path: &PackagePath, excludes: &[S]) -> bool {
    let joined = path.to_string();
    excludes
        .iter()
        .any(|prefix| joined.starts_with(prefix.as_ref()))
}
