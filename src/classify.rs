use std::fmt;

const CLASS_SUFFIX: &str = ".class";

/// Slash-separated package of a compiled class, e.g. `com/example/util`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackagePath(Vec<String>);

impl PackagePath {
    /// Builds a path from `/`-separated text, dropping empty segments.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Returns the package of a `.class` entry, or `None` for anything else.
///
/// Classes in the unnamed package (`Foo.class`, `/Foo.class`) have no
/// package to record.
pub fn classify(entry_name: &str) -> Option<PackagePath> {
    if !entry_name.ends_with(CLASS_SUFFIX) {
        return None;
    }
    let end = entry_name.rfind('/')?;
    if end == 0 {
        return None;
    }

    let path = PackagePath::parse(&entry_name[..end]);
    if path.is_empty() { None } else { Some(path) }
}

pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_extracts_package_of_class_file() {
        let path = classify("org/apache/commons/lang3/StringUtils.class").unwrap();
        assert_eq!(path.segments(), ["org", "apache", "commons", "lang3"]);
        assert_eq!(path.to_string(), "org/apache/commons/lang3");
    }

    #[test]
    fn classify_keeps_inner_class_package() {
        let path = classify("org/example/A$Inner.class").unwrap();
        assert_eq!(path.to_string(), "org/example");
    }

    #[test]
    fn classify_rejects_default_package() {
        assert_eq!(classify("Foo.class"), None);
        assert_eq!(classify("/Foo.class"), None);
    }

    #[test]
    fn classify_rejects_non_class_entries() {
        assert_eq!(classify("META-INF/MANIFEST.MF"), None);
        assert_eq!(classify("org/example/"), None);
        assert_eq!(classify("org/example/messages.properties"), None);
        assert_eq!(classify("org/example/A.classes"), None);
    }

    #[test]
    fn classify_drops_empty_segments() {
        let path = classify("org//example/A.class").unwrap();
        assert_eq!(path.segments(), ["org", "example"]);
        assert_eq!(classify("//A.class"), None);
    }

    #[test]
    fn normalize_separators_turns_backslashes_into_slashes() {
        assert_eq!(normalize_separators(r"com\acme\A.class"), "com/acme/A.class");
        assert_eq!(normalize_separators("com/acme/A.class"), "com/acme/A.class");
    }
}
