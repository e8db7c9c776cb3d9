//! Banner Parser - software banners into structured observations
//!
//! This crate turns the raw software banners extracted by protocol
//! analyzers (HTTP Server headers, SSH identification strings, FTP/SMTP
//! greetings) into structured observations:
//! - name/version boundary detection
//! - positional version-component mapping
//! - best-effort: malformed input degrades, it never fails

mod parser;

pub use parser::{parse_banner, parse_version};
