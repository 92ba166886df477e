// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Domain Boundary Detector
//!
//! Classifies how many capability domains a query spans using a declarative
//! keyword→domain table plus explicit coordination-language cues. The table
//! is data, loaded once and immutable; how scores combine lives in
//! [`DomainBoundaryDetector::detect`] alone.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{Domain, DomainBoundary, DomainSpan, Query};

/// Keyword/phrase → domain tags. A keyword may tag several domains.
static DOMAIN_KEYWORDS: Lazy<Vec<(&'static str, Domain)>> = Lazy::new(|| {
    vec![
        // Testing
        ("pytest", Domain::Testing),
        ("unittest", Domain::Testing),
        ("test", Domain::Testing),
        ("tests", Domain::Testing),
        ("mock", Domain::Testing),
        ("fixture", Domain::Testing),
        ("coverage", Domain::Testing),
        ("assertion", Domain::Testing),
        ("flaky", Domain::Testing),
        // Security
        ("security", Domain::Security),
        ("vulnerability", Domain::Security),
        ("vulnerabilities", Domain::Security),
        ("exploit", Domain::Security),
        ("cve", Domain::Security),
        ("authentication", Domain::Security),
        ("authorization", Domain::Security),
        ("encryption", Domain::Security),
        ("audit", Domain::Security),
        // Performance
        ("performance", Domain::Performance),
        ("latency", Domain::Performance),
        ("throughput", Domain::Performance),
        ("optimization", Domain::Performance),
        ("profiling", Domain::Performance),
        ("benchmark", Domain::Performance),
        ("slow", Domain::Performance),
        ("memory leak", Domain::Performance),
        // Infrastructure
        ("docker", Domain::Infrastructure),
        ("kubernetes", Domain::Infrastructure),
        ("k8s", Domain::Infrastructure),
        ("terraform", Domain::Infrastructure),
        ("container", Domain::Infrastructure),
        ("helm", Domain::Infrastructure),
        ("cloud", Domain::Infrastructure),
        ("infrastructure", Domain::Infrastructure),
        // Deployment
        ("deploy", Domain::Deployment),
        ("deployment", Domain::Deployment),
        ("release", Domain::Deployment),
        ("rollout", Domain::Deployment),
        ("pipeline", Domain::Deployment),
        ("ci", Domain::Deployment),
        ("cd", Domain::Deployment),
        // Documentation
        ("documentation", Domain::Documentation),
        ("docs", Domain::Documentation),
        ("readme", Domain::Documentation),
        ("changelog", Domain::Documentation),
        ("tutorial", Domain::Documentation),
        ("api reference", Domain::Documentation),
        // Database
        ("database", Domain::Database),
        ("sql", Domain::Database),
        ("postgres", Domain::Database),
        ("migration", Domain::Database),
        ("schema", Domain::Database),
        ("index tuning", Domain::Database),
        // Frontend
        ("frontend", Domain::Frontend),
        ("react", Domain::Frontend),
        ("css", Domain::Frontend),
        ("ui", Domain::Frontend),
        ("accessibility", Domain::Frontend),
        // Stability
        ("rollback", Domain::Stability),
        ("uptime", Domain::Stability),
        ("reliability", Domain::Stability),
        ("resilience", Domain::Stability),
        ("backwards compatible", Domain::Stability),
        ("regression", Domain::Stability),
        // Convenience
        ("ergonomics", Domain::Convenience),
        ("usability", Domain::Convenience),
        ("convenience", Domain::Convenience),
        ("developer experience", Domain::Convenience),
        ("shortcut", Domain::Convenience),
    ]
});

/// Phrases that signal multi-domain coordination work.
static COORDINATION_CUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "coordinate",
        "orchestrate",
        "across teams",
        "multiple domains",
        "end to end",
        "cross cutting",
        "in parallel",
    ]
});

/// Phrases that force strategic routing regardless of confidence.
static STRATEGIC_CUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "strategic",
        "comprehensive",
        "roadmap",
        "holistic",
        "organization wide",
        "long term plan",
    ]
});

/// Explicit task-count coordination language, e.g. "coordinate using 3 tasks".
static COORDINATION_TASKS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"coordinate using \d+ (tasks|agents|subtasks)").expect("static cue regex")
});

/// A domain must reach this many keyword hits to register at all.
const MIN_DOMAIN_FREQUENCY: usize = 1;
/// Confidence reduction per secondary domain (ambiguity).
const SECONDARY_PENALTY: f64 = 0.08;
/// Confidence boost per matched coordination cue, capped.
const CUE_BOOST: f64 = 0.05;
const CUE_BOOST_CAP: f64 = 0.15;
/// Complexity contribution per detected domain / per cue.
const COMPLEXITY_PER_DOMAIN: f64 = 0.2;
const COMPLEXITY_PER_CUE: f64 = 0.1;
/// Secondary-domain count that escalates to strategic routing.
const STRATEGIC_SECONDARY_MIN: usize = 4;

/// Single-domain routing additionally requires this confidence; below it the
/// caller simply falls back to the best raw matcher score.
pub const SINGLE_DOMAIN_CONFIDENCE: f64 = 0.90;

pub struct DomainBoundaryDetector;

impl DomainBoundaryDetector {
    /// Classify the query's domain span. `None` when no domain keyword
    /// reaches the minimum frequency, i.e. the query carries no domain
    /// signal at all.
    pub fn detect(query: &Query) -> Option<DomainBoundary> {
        let mut frequencies: HashMap<Domain, usize> = HashMap::new();
        for (keyword, domain) in DOMAIN_KEYWORDS.iter() {
            if query.contains_pattern(keyword) {
                *frequencies.entry(*domain).or_insert(0) += 1;
            }
        }
        frequencies.retain(|_, count| *count >= MIN_DOMAIN_FREQUENCY);
        if frequencies.is_empty() {
            return None;
        }

        // Deterministic ordering: frequency descending, then domain order.
        let mut ranked: Vec<(Domain, usize)> = frequencies.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let (primary, primary_count) = ranked[0];
        let secondary: Vec<Domain> = ranked[1..].iter().map(|(d, _)| *d).collect();
        let total: usize = ranked.iter().map(|(_, c)| c).sum();

        let overlap_indicators = Self::matched_cues(query);
        let strategic_cue = STRATEGIC_CUES.iter().any(|c| query.contains_pattern(c));

        let share = primary_count as f64 / total as f64;
        let cue_boost = (overlap_indicators.len() as f64 * CUE_BOOST).min(CUE_BOOST_CAP);
        let confidence =
            (share - SECONDARY_PENALTY * secondary.len() as f64 + cue_boost).clamp(0.0, 1.0);

        let complexity = (COMPLEXITY_PER_DOMAIN * ranked.len() as f64
            + COMPLEXITY_PER_CUE * overlap_indicators.len() as f64)
            .clamp(0.0, 1.0);

        let span = if strategic_cue || secondary.len() >= STRATEGIC_SECONDARY_MIN {
            DomainSpan::Strategic
        } else if !secondary.is_empty() {
            DomainSpan::Multi
        } else {
            DomainSpan::Single
        };

        Some(DomainBoundary {
            primary,
            secondary,
            confidence,
            complexity,
            overlap_indicators,
            span,
        })
    }

    /// Coordination cues present in the query, including the explicit
    /// "coordinate using N tasks" form.
    pub fn matched_cues(query: &Query) -> Vec<String> {
        let mut cues: Vec<String> = COORDINATION_CUES
            .iter()
            .chain(STRATEGIC_CUES.iter())
            .filter(|c| query.contains_pattern(c))
            .map(|c| c.to_string())
            .collect();
        if let Some(m) = COORDINATION_TASKS_RE.find(&query.tokens().join(" ")) {
            cues.push(m.as_str().to_string());
        }
        cues
    }

    /// True when the query carries explicit coordination language.
    pub fn has_coordination_language(query: &Query) -> bool {
        !Self::matched_cues(query).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_domain_signal_returns_none() {
        let query = Query::parse("hello there, what is the weather like");
        assert!(DomainBoundaryDetector::detect(&query).is_none());
    }

    #[test]
    fn test_single_domain_high_confidence() {
        let query = Query::parse("pytest mock fixture coverage");
        let boundary = DomainBoundaryDetector::detect(&query).unwrap();
        assert_eq!(boundary.primary, Domain::Testing);
        assert!(boundary.secondary.is_empty());
        assert!(boundary.confidence >= SINGLE_DOMAIN_CONFIDENCE);
        assert_eq!(boundary.span, DomainSpan::Single);
        assert!(!boundary.is_multi_domain());
    }

    #[test]
    fn test_three_domains_is_multi() {
        let query = Query::parse("docker deployment broke pytest coverage and the sql migration");
        let boundary = DomainBoundaryDetector::detect(&query).unwrap();
        assert_eq!(boundary.span, DomainSpan::Multi);
        assert!((1..=3).contains(&boundary.secondary.len()));
        // No domain holds more than 60% of the keyword mass here.
        assert!(boundary.confidence < 0.6);
    }

    #[test]
    fn test_strategic_cue_forces_strategic_span() {
        let query = Query::parse("comprehensive security review of the deployment pipeline");
        let boundary = DomainBoundaryDetector::detect(&query).unwrap();
        assert_eq!(boundary.span, DomainSpan::Strategic);
    }

    #[test]
    fn test_five_domains_is_strategic() {
        let query = Query::parse(
            "audit security, profile performance, fix docker infrastructure, \
             write documentation and repair the sql schema plus react ui",
        );
        let boundary = DomainBoundaryDetector::detect(&query).unwrap();
        assert!(boundary.secondary.len() >= STRATEGIC_SECONDARY_MIN);
        assert_eq!(boundary.span, DomainSpan::Strategic);
    }

    #[test]
    fn test_complexity_grows_with_domains() {
        let narrow = DomainBoundaryDetector::detect(&Query::parse("pytest coverage")).unwrap();
        let wide = DomainBoundaryDetector::detect(&Query::parse(
            "pytest coverage for the docker deployment of the postgres database",
        ))
        .unwrap();
        assert!(wide.complexity > narrow.complexity);
    }

    #[test]
    fn test_coordination_task_count_language() {
        let query = Query::parse("coordinate using 4 tasks to ship this");
        assert!(DomainBoundaryDetector::has_coordination_language(&query));
        let cues = DomainBoundaryDetector::matched_cues(&query);
        assert!(cues.iter().any(|c| c.contains("4 tasks")));
    }
}
