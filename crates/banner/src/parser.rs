//! Version-string parsing heuristic
//!
//! A banner like "Apache/2.4.10-beta1" carries the software name, a
//! separator, and a version blob. The boundary is the first run of two or
//! more version-ish characters; everything before it (minus the separator)
//! is the name, everything from it onward is split into version components.

use drishti_common::{Observation, SoftwareVersion};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Runs of 2+ characters from the version alphabet mark the name/version
/// boundary.
static VERSION_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9._\-]{2,}").expect("version-run pattern is valid")
});

/// Parse a raw banner into an observation.
///
/// Best-effort and infallible: when no name/version boundary is found the
/// observation comes back with an empty name and an all-zero version, the
/// raw text preserved verbatim in `unparsed`. The returned observation
/// carries the documented defaults (host unspecified, category unknown,
/// timestamp now); callers attach host and category with the builders.
#[must_use]
pub fn parse_banner(raw: &str) -> Observation {
    let Some(run) = VERSION_RUN.find(raw) else {
        trace!(banner = raw, "no version run in banner");
        return Observation::new("", SoftwareVersion::default()).with_unparsed(raw);
    };

    let name = strip_separator(&raw[..run.start()]);
    let version = parse_version(&raw[run.start()..]);
    Observation::new(name, version).with_unparsed(raw)
}

/// Split version text into `major.minor.minor2-addl` components.
///
/// At most four parts: the fourth absorbs any remainder, further separators
/// included. Numeric components that fail to parse default to 0 rather than
/// rejecting the observation.
#[must_use]
pub fn parse_version(text: &str) -> SoftwareVersion {
    let mut parts = text.splitn(4, is_separator);
    let major = numeric_part(parts.next());
    let minor = numeric_part(parts.next());
    let minor2 = numeric_part(parts.next());
    let addl = parts.next().map(str::trim).unwrap_or_default().to_owned();
    SoftwareVersion {
        major,
        minor,
        minor2,
        addl,
    }
}

/// Drop exactly one trailing character: the name/version separator.
fn strip_separator(name: &str) -> &str {
    match name.char_indices().last() {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

#[inline]
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '.' | '_') || c.is_ascii_whitespace()
}

#[inline]
fn numeric_part(part: Option<&str>) -> u32 {
    part.and_then(|p| p.parse().ok()).unwrap_or(0)
}
