//! # package-list
//!
//! Scans a Java classpath and writes the minimal set of package prefixes it
//! contains, minus excluded namespaces. The list tells a shading step which
//! packages it may relocate.
//!
//! ## Architecture
//!
//! - **classify**: Entry name to package path extraction for `.class` files
//! - **exclude**: Default exclusion list and plain prefix matching
//! - **trie**: Insertion-ordered package trie with leaf-only dumping
//! - **source**: Jar entry and class directory enumeration
//! - **generate**: End-to-end scan and atomic output writing
//! - **config**: Command line and JSON config file resolution
//! - **logging**: `tracing` subscriber setup

pub mod classify;
pub mod cli;
pub mod config;
pub mod exclude;
pub mod generate;
pub mod logging;
pub mod source;
pub mod trie;
