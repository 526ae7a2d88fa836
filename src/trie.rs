//! Package prefix trie.
//!
//! Packages are inserted segment by segment; shared prefixes share nodes, so
//! repeated packages collapse automatically. Dumping walks the trie depth-first
//! in the order children were first created and yields only the most specific
//! packages (leaves). A consumer doing prefix matching against the output only
//! needs those.

use indexmap::IndexMap;
use indexmap::map::IntoIter;
use std::iter::FusedIterator;

use crate::classify::PackagePath;

#[derive(Debug, Default)]
struct Node {
    children: IndexMap<String, Node>,
    endpoint: bool,
}

#[derive(Debug, Default)]
pub struct PackageTrie {
    root: Node,
    endpoints: usize,
}

impl PackageTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a package. Inserting the same package again changes nothing and
    /// an empty path is ignored.
    pub fn insert(&mut self, path: &PackagePath) {
        self.insert_segments(path.segments());
    }

    /// Inserts a `/`-separated package, e.g. `com/acme/util`.
    pub fn insert_str(&mut self, package: &str) {
        self.insert(&PackagePath::parse(package));
    }

    fn insert_segments(&mut self, segments: &[String]) {
        if segments.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.entry(segment.clone()).or_default();
        }
        if !node.endpoint {
            node.endpoint = true;
            self.endpoints += 1;
        }
    }

    /// Number of distinct packages inserted.
    pub fn len(&self) -> usize {
        self.endpoints
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints == 0
    }

    /// Consumes the trie and lazily yields its packages.
    ///
    /// Only leaves are yielded unless `include_endpoints` is set, in which case
    /// an inner node that was itself inserted is yielded too, right before its
    /// descendants.
    pub fn dump(self, include_endpoints: bool) -> Dump {
        Dump {
            stack: vec![Frame {
                prefix: String::new(),
                children: self.root.children.into_iter(),
            }],
            include_endpoints,
        }
    }
}

struct Frame {
    prefix: String,
    children: IntoIter<String, Node>,
}

/// Single-pass, pre-order iterator over the dumped packages.
pub struct Dump {
    stack: Vec<Frame>,
    include_endpoints: bool,
}

impl Iterator for Dump {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((segment, node)) = frame.children.next() else {
                self.stack.pop();
                continue;
            };

            let path = if frame.prefix.is_empty() {
                segment
            } else {
                format!("{}/{segment}", frame.prefix)
            };

            if node.children.is_empty() {
                return Some(path);
            }

            let emit = self.include_endpoints && node.endpoint;
            self.stack.push(Frame {
                prefix: path.clone(),
                children: node.children.into_iter(),
            });
            if emit {
                return Some(path);
            }
        }
    }
}

impl FusedIterator for Dump {}
