// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Profile Manifest YAML Parser
//!
//! # Manifest Format
//!
//! ```yaml
//! apiVersion: 100monkeys.ai/v1
//! kind: AgentProfile
//! metadata:
//!   name: testing-specialist
//!   version: "1.0.0"
//!   description: "Unit and integration test work"
//! spec:
//!   keywords: [pytest, mock, fixture, coverage]
//!   domains: [testing]
//!   role: specialist
//!   minConfidence: 0.3
//! ```
//!
//! Absent optional fields get documented defaults: `role` defaults to
//! `specialist`, `minConfidence` to no threshold.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use aegis_router_core::domain::{AgentId, AgentProfile, AgentRole, Domain};

pub const SUPPORTED_API_VERSION: &str = "100monkeys.ai/v1";
pub const MANIFEST_KIND: &str = "AgentProfile";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileManifest {
    /// API version (must be "100monkeys.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "AgentProfile")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ProfileSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestMetadata {
    /// Unique agent name (DNS label format)
    pub name: String,

    /// Manifest schema version (semantic versioning)
    pub version: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSpec {
    /// Capability keywords/phrases matched against queries
    pub keywords: Vec<String>,

    /// Domains this agent services
    pub domains: Vec<Domain>,

    /// Routing role; defaults to specialist
    #[serde(default)]
    pub role: AgentRole,

    /// Minimum confidence before the agent may be selected top-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

impl ProfileManifest {
    pub fn validate(&self) -> Result<()> {
        if self.api_version != SUPPORTED_API_VERSION {
            return Err(anyhow!(
                "unsupported apiVersion {:?}, expected {:?}",
                self.api_version,
                SUPPORTED_API_VERSION
            ));
        }
        if self.kind != MANIFEST_KIND {
            return Err(anyhow!(
                "unsupported kind {:?}, expected {:?}",
                self.kind,
                MANIFEST_KIND
            ));
        }
        if !is_dns_label(&self.metadata.name) {
            return Err(anyhow!(
                "agent name {:?} is not a valid DNS label",
                self.metadata.name
            ));
        }
        if self.spec.keywords.is_empty() {
            return Err(anyhow!("agent {:?} declares no keywords", self.metadata.name));
        }
        if self.spec.domains.is_empty() {
            return Err(anyhow!("agent {:?} declares no domains", self.metadata.name));
        }
        if let Some(min) = self.spec.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(anyhow!(
                    "agent {:?}: minConfidence {} outside [0, 1]",
                    self.metadata.name,
                    min
                ));
            }
        }
        Ok(())
    }

    /// Translate the validated manifest into the core's domain profile.
    pub fn into_profile(self) -> AgentProfile {
        AgentProfile {
            id: AgentId::new(self.metadata.name),
            keywords: self
                .spec
                .keywords
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
            domains: self.spec.domains,
            min_confidence: self.spec.min_confidence,
            role: self.spec.role,
        }
    }
}

/// Lowercase alphanumerics and hyphens, alphanumeric at both ends, max 63.
fn is_dns_label(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
}

pub struct ProfileManifestParser;

impl ProfileManifestParser {
    /// Parse an agent profile manifest from a YAML string.
    pub fn parse_yaml(yaml: &str) -> Result<ProfileManifest> {
        let manifest: ProfileManifest =
            serde_yaml::from_str(yaml).context("Failed to parse YAML manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse an agent profile manifest from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ProfileManifest> {
        let yaml = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read manifest file: {:?}", path.as_ref()))?;
        Self::parse_yaml(&yaml)
    }

    /// Serialize a manifest back to YAML.
    pub fn to_yaml(manifest: &ProfileManifest) -> Result<String> {
        serde_yaml::to_string(manifest).context("Failed to serialize manifest to YAML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentProfile
metadata:
  name: testing-specialist
  version: "1.0.0"
spec:
  keywords: [pytest, mock]
  domains: [testing]
"#;
        let manifest = ProfileManifestParser::parse_yaml(yaml).unwrap();
        assert_eq!(manifest.metadata.name, "testing-specialist");
        assert_eq!(manifest.spec.role, AgentRole::Specialist);
        assert_eq!(manifest.spec.min_confidence, None);

        let profile = manifest.into_profile();
        assert_eq!(profile.id.as_str(), "testing-specialist");
        assert_eq!(profile.domains, vec![Domain::Testing]);
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentProfile
metadata:
  name: multi-coordinator
  version: "1.2.0"
  description: "Routes multi-domain work"
spec:
  keywords: [coordinate, orchestrate]
  domains: [infrastructure, deployment]
  role: coordinator
  minConfidence: 0.25
"#;
        let manifest = ProfileManifestParser::parse_yaml(yaml).unwrap();
        assert_eq!(manifest.spec.role, AgentRole::Coordinator);
        assert_eq!(manifest.spec.min_confidence, Some(0.25));
        assert_eq!(
            manifest.spec.domains,
            vec![Domain::Infrastructure, Domain::Deployment]
        );
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentProfile
metadata:
  name: security-specialist
  version: "1.0.0"
spec:
  keywords: [Security, CVE]
  domains: [security]
"#;
        let profile = ProfileManifestParser::parse_yaml(yaml).unwrap().into_profile();
        assert_eq!(profile.keywords, vec!["security", "cve"]);
    }

    #[test]
    fn test_rejects_wrong_kind() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentManifest
metadata:
  name: x
  version: "1.0.0"
spec:
  keywords: [a]
  domains: [testing]
"#;
        assert!(ProfileManifestParser::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_invalid_dns_name() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentProfile
metadata:
  name: Not_A_Label
  version: "1.0.0"
spec:
  keywords: [a]
  domains: [testing]
"#;
        assert!(ProfileManifestParser::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_min_confidence() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentProfile
metadata:
  name: fussy-agent
  version: "1.0.0"
spec:
  keywords: [a]
  domains: [testing]
  minConfidence: 1.5
"#;
        assert!(ProfileManifestParser::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: AgentProfile
metadata:
  name: docs-specialist
  version: "1.0.0"
spec:
  keywords: [documentation, readme]
  domains: [documentation]
"#;
        let manifest = ProfileManifestParser::parse_yaml(yaml).unwrap();
        let serialized = ProfileManifestParser::to_yaml(&manifest).unwrap();
        let reparsed = ProfileManifestParser::parse_yaml(&serialized).unwrap();
        assert_eq!(manifest, reparsed);
    }
}
