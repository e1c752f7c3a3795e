use serde::Serialize;
use std::collections::BTreeMap;

use super::ProbeTarget;
use crate::network::Transport;

/// Response headers that disclose server software.
pub const LEAKY_HEADERS: [&str; 2] = ["x-powered-by", "server"];

const INSECURE_TRANSPORT_PENALTY: u8 = 50;
const LEAKED_HEADER_PENALTY: u8 = 10;

/// Issue recorded for a provider without an endpoint on the active chain.
pub const CONFIG_MISSING: &str = "Config Missing";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityReport {
    pub score: u8,
    pub issues: Vec<String>,
}

impl SecurityReport {
    fn clean() -> Self {
        Self { score: 100, issues: Vec::new() }
    }
}

/// Scores transport scheme and header hygiene.
pub struct SecurityAuditor;

impl SecurityAuditor {
    /// Audits one provider from its probe target and the last response headers seen.
    ///
    /// Header names match case-insensitively and each leaked header counts once.
    #[must_use]
    pub fn audit(target: &ProbeTarget, headers: &BTreeMap<String, String>) -> SecurityReport {
        let secure = match target {
            ProbeTarget::Unsupported => {
                return SecurityReport { score: 0, issues: vec![CONFIG_MISSING.to_string()] };
            }
            ProbeTarget::Endpoint { transport: Transport::Rest | Transport::GraphQl, .. } => {
                return SecurityReport::clean();
            }
            ProbeTarget::Endpoint { transport: Transport::Rpc, secure } => *secure,
        };

        let mut report = SecurityReport::clean();

        if !secure {
            report.score = report.score.saturating_sub(INSECURE_TRANSPORT_PENALTY);
            report.issues.push("Insecure transport: endpoint does not use TLS".to_string());
        }

        for leaky in LEAKY_HEADERS {
            if headers.keys().any(|name| name.eq_ignore_ascii_case(leaky)) {
                report.score = report.score.saturating_sub(LEAKED_HEADER_PENALTY);
                report.issues.push(format!("Header leak: {leaky}"));
            }
        }

        report
    }
}
