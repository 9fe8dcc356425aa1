// Team name normalisation against the canonical roster

use corners_models::AliasTable;
use difflib::sequencematcher::SequenceMatcher;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning for approximate name matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizerConfig {
    /// Minimum similarity ratio (0–1) for an approximate match
    pub similarity_cutoff: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { similarity_cutoff: 0.85 }
    }
}

/// Ratcliff/Obershelp ratio `2 * M / T`, where `M` counts characters in the
/// matching blocks and `T` is the combined length. 1.0 for identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    f64::from(SequenceMatcher::new(a, b).ratio())
}

/// Map `raw_name` onto one of `canonical_names`.
///
/// The alias table is consulted first, then an exact roster match, then the
/// closest roster entry if its similarity reaches `cutoff`. The first entry
/// wins among equally similar candidates. `None` means the caller should skip
/// the match.
pub fn normalize(raw_name: &str, canonical_names: &[String], aliases: &AliasTable, cutoff: f64) -> Option<String> {
    let name = aliases.resolve(raw_name);

    if canonical_names.iter().any(|c| c == name) {
        return Some(name.to_string());
    }

    let mut best: Option<(&String, f64)> = None;
    for candidate in canonical_names {
        let score = similarity(candidate, name);
        if score >= cutoff && best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((candidate, score)) => {
            debug!("🔤 '{}' matched '{}' (similarity {:.3})", raw_name, candidate, score);
            Some(candidate.clone())
        }
        None => {
            debug!("❓ No roster match for '{}'", raw_name);
            None
        }
    }
}

/// A roster and alias table bound together with a cutoff.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    canonical_names: Vec<String>,
    aliases: AliasTable,
    config: NormalizerConfig,
}

impl NameNormalizer {
    pub fn new(canonical_names: Vec<String>, aliases: AliasTable, config: NormalizerConfig) -> Self {
        Self { canonical_names, aliases, config }
    }

    pub fn normalize(&self, raw_name: &str) -> Option<String> {
        normalize(raw_name, &self.canonical_names, &self.aliases, self.config.similarity_cutoff)
    }

    pub fn canonical_names(&self) -> &[String] {
        &self.canonical_names
    }
}
