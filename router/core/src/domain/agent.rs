// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recognized capability domains.
///
/// Domains tag both agent profiles and query keywords; the boundary detector
/// and conflict resolver only ever operate on this closed set, so loose
/// string tags never leak past the registry loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Testing,
    Security,
    Performance,
    Infrastructure,
    Deployment,
    Documentation,
    Database,
    Frontend,
    Stability,
    Convenience,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Testing => "testing",
            Domain::Security => "security",
            Domain::Performance => "performance",
            Domain::Infrastructure => "infrastructure",
            Domain::Deployment => "deployment",
            Domain::Documentation => "documentation",
            Domain::Database => "database",
            Domain::Frontend => "frontend",
            Domain::Stability => "stability",
            Domain::Convenience => "convenience",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing role of an agent within the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AgentRole {
    /// Services exactly one capability domain.
    #[default]
    Specialist,
    /// Designated target for multi-domain queries (2-4 domains).
    Coordinator,
    /// Designated target for strategic, cross-cutting queries (5+ domains).
    StrategicCoordinator,
    /// Catch-all fallback when nothing else matches.
    GeneralPurpose,
}

/// Immutable capability profile of a registered agent.
///
/// Owned by the external registry; the selection core only ever borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    /// Capability keywords/phrases matched against incoming queries.
    pub keywords: Vec<String>,
    /// Domains this agent services.
    pub domains: Vec<Domain>,
    /// Minimum confidence required before this agent may be selected top-1.
    /// Defaults to no threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    #[serde(default)]
    pub role: AgentRole,
}

impl AgentProfile {
    pub fn new(id: impl Into<String>, keywords: Vec<String>, domains: Vec<Domain>) -> Self {
        Self {
            id: AgentId::new(id),
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            domains,
            min_confidence: None,
            role: AgentRole::Specialist,
        }
    }

    pub fn with_role(mut self, role: AgentRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }
}

/// Identifier used when the registry carries no general-purpose agent.
pub const DEFAULT_FALLBACK_AGENT: &str = "general-purpose";

/// Read-only registry of agent profiles.
///
/// Loaded and validated by an external collaborator (`aegis-router-registry`);
/// the core treats it as an immutable lookup structure. A `BTreeMap` keeps
/// iteration order deterministic so repeated selections are reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, AgentProfile>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, profile: AgentProfile) {
        self.agents.insert(profile.id.clone(), profile);
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentProfile> {
        self.agents.get(id)
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentProfile> {
        self.agents.values()
    }

    fn first_with_role(&self, role: AgentRole) -> Option<&AgentProfile> {
        self.agents.values().find(|p| p.role == role)
    }

    /// Designated target for multi-domain routing.
    pub fn coordinator(&self) -> Option<&AgentProfile> {
        self.first_with_role(AgentRole::Coordinator)
    }

    /// Designated target for strategic routing. Falls back to the
    /// multi-domain coordinator when no dedicated strategic agent exists.
    pub fn strategic_coordinator(&self) -> Option<&AgentProfile> {
        self.first_with_role(AgentRole::StrategicCoordinator)
            .or_else(|| self.first_with_role(AgentRole::Coordinator))
    }

    /// Fallback identifier for degraded selections. Always non-null: when no
    /// general-purpose agent is registered the documented default id is used.
    pub fn fallback_agent(&self) -> AgentId {
        self.first_with_role(AgentRole::GeneralPurpose)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| AgentId::new(DEFAULT_FALLBACK_AGENT))
    }
}

impl FromIterator<AgentProfile> for AgentRegistry {
    fn from_iter<T: IntoIterator<Item = AgentProfile>>(iter: T) -> Self {
        let mut registry = Self::new();
        for profile in iter {
            registry.register(profile);
        }
        registry
    }
}
