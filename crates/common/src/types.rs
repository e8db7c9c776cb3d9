//! Core data types for the Drishti tracking engine
//!
//! These types sit on the hot path of every reported observation:
//! - aggressive `#[inline]` on small helpers
//! - direct field access for hot-path loops
//! - builder-style methods that consume `self` to avoid extra clones
//! - minimal panicking/allocations in methods used during tracking
//!
//! NOTE: kept `SystemTime` for `timestamp` so serde-friendly serialization is
//! preserved across the observation log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::SystemTime;

use crate::error::DrishtiError;

/// Supported transport protocols for reported connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    TCP,
    UDP,
}

impl Protocol {
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Protocol::TCP => "tcp",
            Protocol::UDP => "udp",
        }
    }
}

/// Software categories as reported by protocol analyzers.
///
/// Purely descriptive: the category never influences comparison or dedup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoftwareCategory {
    #[default]
    Unknown,
    WebServer,
    WebBrowser,
    MailServer,
    MailClient,
    FtpServer,
    FtpClient,
    BrowserPlugin,
    WebApp,
    DatabaseServer,
    Printer,
}

impl SoftwareCategory {
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SoftwareCategory::Unknown => "unknown",
            SoftwareCategory::WebServer => "web-server",
            SoftwareCategory::WebBrowser => "web-browser",
            SoftwareCategory::MailServer => "mail-server",
            SoftwareCategory::MailClient => "mail-client",
            SoftwareCategory::FtpServer => "ftp-server",
            SoftwareCategory::FtpClient => "ftp-client",
            SoftwareCategory::BrowserPlugin => "browser-plugin",
            SoftwareCategory::WebApp => "web-app",
            SoftwareCategory::DatabaseServer => "database-server",
            SoftwareCategory::Printer => "printer",
        }
    }
}

impl fmt::Display for SoftwareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured software version: three numeric components plus a free-text
/// suffix.
///
/// Field order matters: the derived `Ord` is lexicographic over
/// `(major, minor, minor2, addl)`, numeric on the first three and byte-wise
/// on `addl`. That makes version suffixes compare as ordinary text
/// ("rc10" < "rc2"), which is the tracked behavior.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SoftwareVersion {
    pub major: u32,
    pub minor: u32,
    pub minor2: u32,
    pub addl: String,
}

impl SoftwareVersion {
    #[inline]
    #[must_use]
    pub fn new(major: u32, minor: u32, minor2: u32) -> Self {
        Self {
            major,
            minor,
            minor2,
            addl: String::new(),
        }
    }

    /// Builder: attach the free-text suffix.
    #[inline]
    #[must_use]
    pub fn with_addl<S: Into<String>>(mut self, addl: S) -> Self {
        self.addl = addl.into();
        self
    }

    /// True when no numeric component and no suffix was parsed.
    #[inline]
    #[must_use]
    pub fn is_unversioned(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.minor2 == 0 && self.addl.is_empty()
    }
}

impl fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.addl.is_empty() {
            write!(f, "{}.{}.{}", self.major, self.minor, self.minor2)
        } else {
            write!(f, "{}.{}.{}-{}", self.major, self.minor, self.minor2, self.addl)
        }
    }
}

/// One reported sighting of a software name+version on a host.
///
/// Observations are never mutated after creation; the registry only replaces
/// a stored observation wholesale when a newer one supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: SystemTime,
    pub host: IpAddr,
    pub category: SoftwareCategory,
    pub name: String,
    pub version: SoftwareVersion,
    /// Original banner text, always populated as the display fallback.
    pub unparsed: String,
}

impl Observation {
    /// Create an observation with the documented defaults: timestamp = now,
    /// host = unspecified, category = unknown. `unparsed` falls back to the
    /// rendered `name version` text until a raw banner is attached.
    #[must_use]
    pub fn new<S: Into<String>>(name: S, version: SoftwareVersion) -> Self {
        let name = name.into();
        let unparsed = format!("{} {}", name, version);
        Self {
            timestamp: SystemTime::now(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            category: SoftwareCategory::Unknown,
            name,
            version,
            unparsed,
        }
    }

    /// Builder: set the host the software was observed on.
    #[inline]
    #[must_use]
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Builder: set the software category.
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: SoftwareCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder: override the observation timestamp.
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builder: attach the raw banner the observation was parsed from.
    #[inline]
    #[must_use]
    pub fn with_unparsed<S: Into<String>>(mut self, unparsed: S) -> Self {
        self.unparsed = unparsed.into();
        self
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Connection context handed over by the reporting analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub orig: SocketAddr,
    pub resp: SocketAddr,
    pub protocol: Protocol,
}

impl Connection {
    #[inline]
    #[must_use]
    pub fn new(orig: SocketAddr, resp: SocketAddr) -> Self {
        Self {
            orig,
            resp,
            protocol: Protocol::TCP,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Human-readable "host + role" label for alert text: the host is the
    /// client when it matches the connection originator, the server otherwise.
    #[must_use]
    pub fn endpoint_label(&self, host: IpAddr) -> String {
        if host == self.orig.ip() {
            format!("{} client", host)
        } else {
            format!("{} server", host)
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}/{}", self.orig, self.resp, self.protocol.as_str())
    }
}

/// Which hosts are in scope for tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackPolicy {
    AllHosts,
    LocalHostsOnly,
    RemoteHostsOnly,
    Disabled,
}

impl TrackPolicy {
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TrackPolicy::AllHosts => "all",
            TrackPolicy::LocalHostsOnly => "local",
            TrackPolicy::RemoteHostsOnly => "remote",
            TrackPolicy::Disabled => "disabled",
        }
    }
}

impl fmt::Display for TrackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackPolicy {
    type Err = DrishtiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all-hosts" => Ok(TrackPolicy::AllHosts),
            "local" | "local-hosts" => Ok(TrackPolicy::LocalHostsOnly),
            "remote" | "remote-hosts" => Ok(TrackPolicy::RemoteHostsOnly),
            "disabled" | "none" => Ok(TrackPolicy::Disabled),
            other => Err(DrishtiError::Config(format!(
                "unknown track policy '{}'",
                other
            ))),
        }
    }
}

/// Kinds of notices the registry can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    SoftwareVersionChange,
}

impl NoticeKind {
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::SoftwareVersionChange => "software-version-change",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert payload raised when interesting software changes version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionChangeNotice {
    pub kind: NoticeKind,
    pub conn: Connection,
    pub message: String,
    /// Formatted new observation ("name x.y.z-suffix").
    pub subject: String,
    pub category: SoftwareCategory,
}

impl VersionChangeNotice {
    #[must_use]
    pub fn new<S: Into<String>>(
        conn: Connection,
        message: S,
        subject: S,
        category: SoftwareCategory,
    ) -> Self {
        Self {
            kind: NoticeKind::SoftwareVersionChange,
            conn,
            message: message.into(),
            subject: subject.into(),
            category,
        }
    }
}

impl fmt::Display for VersionChangeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn version_ordering_is_lexicographic() {
        let a = SoftwareVersion::new(1, 2, 3);
        let b = SoftwareVersion::new(1, 2, 4);
        let c = SoftwareVersion::new(1, 3, 0);
        assert!(a < b);
        assert!(b < c);
        assert!(a < c); // transitivity over the numeric prefix
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn version_addl_breaks_numeric_ties_only() {
        let plain = SoftwareVersion::new(2, 0, 0);
        let beta = SoftwareVersion::new(2, 0, 0).with_addl("beta1");
        assert!(plain < beta);

        // Numeric prefix dominates regardless of suffix
        let newer = SoftwareVersion::new(2, 0, 1);
        assert!(beta < newer);
    }

    #[test]
    fn version_suffixes_compare_as_plain_text() {
        // Byte-wise ordering on addl: "rc10" sorts before "rc2".
        let rc10 = SoftwareVersion::new(1, 0, 0).with_addl("rc10");
        let rc2 = SoftwareVersion::new(1, 0, 0).with_addl("rc2");
        assert!(rc10 < rc2);
    }

    #[test]
    fn version_exactly_one_ordering_holds() {
        let pairs = [
            (SoftwareVersion::new(1, 0, 0), SoftwareVersion::new(1, 0, 0)),
            (SoftwareVersion::new(1, 0, 0), SoftwareVersion::new(0, 9, 9)),
            (
                SoftwareVersion::new(3, 1, 4).with_addl("a"),
                SoftwareVersion::new(3, 1, 4).with_addl("b"),
            ),
        ];
        for (a, b) in pairs {
            let lt = a < b;
            let eq = a == b;
            let gt = a > b;
            assert_eq!(
                1,
                usize::from(lt) + usize::from(eq) + usize::from(gt),
                "exactly one of <, =, > must hold for {a} vs {b}"
            );
        }
    }

    #[test]
    fn version_display() {
        assert_eq!(SoftwareVersion::new(2, 4, 10).to_string(), "2.4.10");
        assert_eq!(
            SoftwareVersion::new(2, 4, 10).with_addl("beta1").to_string(),
            "2.4.10-beta1"
        );
        assert_eq!(SoftwareVersion::default().to_string(), "0.0.0");
    }

    #[test]
    fn equal_versions_format_identically() {
        let a = SoftwareVersion::new(1, 2, 3).with_addl("p1");
        let b = SoftwareVersion::new(1, 2, 3).with_addl("p1");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn observation_defaults() {
        let obs = Observation::new("nginx", SoftwareVersion::new(1, 18, 0));
        assert_eq!(obs.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(obs.category, SoftwareCategory::Unknown);
        assert!(!obs.unparsed.is_empty());
        assert!(obs.timestamp <= SystemTime::now());
    }

    #[test]
    fn observation_builders() {
        let host: IpAddr = "10.0.0.7".parse().unwrap();
        let obs = Observation::new("Apache", SoftwareVersion::new(2, 4, 10))
            .with_host(host)
            .with_category(SoftwareCategory::WebServer)
            .with_unparsed("Apache/2.4.10");
        assert_eq!(obs.host, host);
        assert_eq!(obs.category, SoftwareCategory::WebServer);
        assert_eq!(obs.unparsed, "Apache/2.4.10");
        assert_eq!(obs.to_string(), "Apache 2.4.10");
    }

    #[test]
    fn observation_serde_round_trip() {
        let obs = Observation::new("vsftpd", SoftwareVersion::new(3, 0, 3))
            .with_category(SoftwareCategory::FtpServer);
        let json = serde_json::to_string(&obs).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(obs, back);
    }

    #[test]
    fn endpoint_label_distinguishes_roles() {
        let conn = Connection::new(addr("192.168.1.5:50211"), addr("10.0.0.1:80"));
        assert_eq!(
            conn.endpoint_label("192.168.1.5".parse().unwrap()),
            "192.168.1.5 client"
        );
        assert_eq!(
            conn.endpoint_label("10.0.0.1".parse().unwrap()),
            "10.0.0.1 server"
        );
    }

    #[test]
    fn track_policy_from_str() {
        assert_eq!("all".parse::<TrackPolicy>().unwrap(), TrackPolicy::AllHosts);
        assert_eq!(
            "LOCAL".parse::<TrackPolicy>().unwrap(),
            TrackPolicy::LocalHostsOnly
        );
        assert_eq!(
            "remote-hosts".parse::<TrackPolicy>().unwrap(),
            TrackPolicy::RemoteHostsOnly
        );
        assert_eq!(
            "none".parse::<TrackPolicy>().unwrap(),
            TrackPolicy::Disabled
        );
        assert!("sometimes".parse::<TrackPolicy>().is_err());
    }

    #[test]
    fn notice_carries_kind_and_category() {
        let conn = Connection::new(addr("192.168.1.5:22"), addr("10.0.0.1:4242"));
        let notice = VersionChangeNotice::new(
            conn,
            "10.0.0.1 server 'OpenSSH' version changed from 7.4.0 to 8.2.0",
            "OpenSSH 8.2.0",
            SoftwareCategory::Unknown,
        );
        assert_eq!(notice.kind, NoticeKind::SoftwareVersionChange);
        assert!(notice.to_string().contains("version changed"));
    }
}
