//! Subnet-backed host scope filtering
//!
//! The bundled [`HostScopeFilter`] implementation: "local" means contained
//! in one of the configured site networks. Deployments with a different
//! notion of locality supply their own filter.

use drishti_common::{HostScopeFilter, TrackPolicy};
use ipnet::IpNet;
use std::net::IpAddr;

#[derive(Debug, Clone, Default)]
pub struct SubnetScopeFilter {
    local_nets: Vec<IpNet>,
}

impl SubnetScopeFilter {
    #[must_use]
    pub fn new(local_nets: Vec<IpNet>) -> Self {
        Self { local_nets }
    }

    /// Builder: add one local network.
    #[must_use]
    pub fn with_net(mut self, net: IpNet) -> Self {
        self.local_nets.push(net);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_local(&self, host: IpAddr) -> bool {
        self.local_nets.iter().any(|net| net.contains(&host))
    }
}

impl HostScopeFilter for SubnetScopeFilter {
    fn in_scope(&self, host: IpAddr, policy: TrackPolicy) -> bool {
        match policy {
            TrackPolicy::AllHosts => true,
            TrackPolicy::Disabled => false,
            TrackPolicy::LocalHostsOnly => self.is_local(host),
            TrackPolicy::RemoteHostsOnly => !self.is_local(host),
        }
    }
}
