//! Normalization of seller-provided variant text.
//!
//! Sellers describe the same car many ways ("RAV4 Hybrid AWD-i Executive aut",
//! "Toyota RAV4 2.5 Hybrid Executive 4WD automat"). Normalization canonicalizes
//! drivetrain and plug-in tokens, strips transmission and trim tokens from the
//! model name, and resolves the trim level.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical drivetrain token every all-wheel-drive spelling collapses to.
pub const CANONICAL_AWD: &str = "AWD-i";

static DRIVETRAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:awd(?:[-\s]?i)?|4wd|4x4)\b").expect("valid drivetrain regex")
});

static PLUG_IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:plug[-\s]?in(?:[-\s]+hybrid)?|phev)\b").expect("valid plug-in regex")
});

static TRANSMISSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:aut(?:omat(?:isk|ic)?)?|manual|manuell)\b\.?")
        .expect("valid transmission regex")
});

static TRIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:executive|style|active|life)\b").expect("valid trim regex")
});

/// Manufacturer equipment tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrimLevel {
    Executive,
    Style,
    Active,
    Life,
    Unknown,
}

impl TrimLevel {
    /// Known trims in match priority order. The first one found in the
    /// variant text wins.
    pub const PRIORITY: [TrimLevel; 4] = [
        TrimLevel::Executive,
        TrimLevel::Style,
        TrimLevel::Active,
        TrimLevel::Life,
    ];

    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            TrimLevel::Executive => Some("executive"),
            TrimLevel::Style => Some("style"),
            TrimLevel::Active => Some("active"),
            TrimLevel::Life => Some("life"),
            TrimLevel::Unknown => None,
        }
    }

    /// Resolves the trim from free text by case-insensitive substring match.
    #[must_use]
    pub fn detect(text: &str) -> TrimLevel {
        let lower = text.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|trim| trim.keyword().is_some_and(|kw| lower.contains(kw)))
            .unwrap_or(TrimLevel::Unknown)
    }
}

impl std::fmt::Display for TrimLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrimLevel::Executive => "Executive",
            TrimLevel::Style => "Style",
            TrimLevel::Active => "Active",
            TrimLevel::Life => "Life",
            TrimLevel::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Canonical view of a listing's variant text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedVariant {
    /// Model name with transmission and trim removed and drivetrain
    /// canonicalized, e.g. `"RAV4 Hybrid AWD-i"`.
    pub base_model: String,
    pub trim_level: TrimLevel,
}

impl NormalizedVariant {
    /// Lowercase tokens of the base model, order-insensitive.
    #[must_use]
    pub fn tokens(&self) -> BTreeSet<String> {
        base_model_tokens(&self.base_model)
    }
}

/// Normalizes seller variant text into base model and trim level.
#[must_use]
pub fn normalize_variant(variant: &str) -> NormalizedVariant {
    let trim_level = TrimLevel::detect(variant);

    let text = DRIVETRAIN_RE.replace_all(variant, CANONICAL_AWD);
    let text = PLUG_IN_RE.replace_all(&text, "PHEV");
    let text = TRANSMISSION_RE.replace_all(&text, " ");
    let text = TRIM_RE.replace_all(&text, " ");

    let base_model = text.split_whitespace().collect::<Vec<_>>().join(" ");

    NormalizedVariant {
        base_model,
        trim_level,
    }
}

/// Lowercase token set of an already-normalized base model.
#[must_use]
pub fn base_model_tokens(base_model: &str) -> BTreeSet<String> {
    base_model
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_transmission_and_trim() {
        let normalized = normalize_variant("RAV4 Hybrid AWD-i Executive aut");
        assert_eq!(normalized.base_model, "RAV4 Hybrid AWD-i");
        assert_eq!(normalized.trim_level, TrimLevel::Executive);
    }

    #[test]
    fn canonicalizes_drivetrain_spellings() {
        for raw in [
            "RAV4 Hybrid AWD Style",
            "RAV4 Hybrid 4WD Style",
            "RAV4 Hybrid awd-i Style",
            "RAV4 Hybrid AWDi Style",
            "RAV4 Hybrid AWD i Style",
        ] {
            let normalized = normalize_variant(raw);
            assert_eq!(normalized.base_model, "RAV4 Hybrid AWD-i", "input {raw:?}");
            assert_eq!(normalized.trim_level, TrimLevel::Style);
        }
    }

    #[test]
    fn leaves_two_wheel_drive_alone() {
        let normalized = normalize_variant("RAV4 Hybrid 2WD Active manual");
        assert_eq!(normalized.base_model, "RAV4 Hybrid 2WD");
        assert_eq!(normalized.trim_level, TrimLevel::Active);
    }

    #[test]
    fn collapses_plug_in_hybrid_to_phev() {
        let normalized = normalize_variant("RAV4 Plug-in Hybrid AWD-i Style automat");
        assert_eq!(normalized.base_model, "RAV4 PHEV AWD-i");
    }

    #[test]
    fn missing_trim_is_unknown() {
        let normalized = normalize_variant("Toyota RAV4 Hybrid");
        assert_eq!(normalized.trim_level, TrimLevel::Unknown);
        assert_eq!(normalized.base_model, "Toyota RAV4 Hybrid");
    }

    #[test]
    fn trim_match_is_case_insensitive() {
        assert_eq!(TrimLevel::detect("rav4 EXECUTIVE"), TrimLevel::Executive);
        assert_eq!(TrimLevel::detect("RAV4 life"), TrimLevel::Life);
    }

    #[test]
    fn multiple_trim_tokens_resolve_by_priority() {
        assert_eq!(TrimLevel::detect("RAV4 Life Active"), TrimLevel::Active);
        assert_eq!(TrimLevel::detect("Active Style RAV4"), TrimLevel::Style);
        assert_eq!(
            TrimLevel::detect("Life Style Active Executive"),
            TrimLevel::Executive
        );
        // Substring match: "Lifestyle" contains both "life" and "style".
        assert_eq!(TrimLevel::detect("RAV4 Lifestyle"), TrimLevel::Style);
    }

    #[test]
    fn token_order_does_not_change_tokens() {
        let a = normalize_variant("RAV4 Hybrid AWD-i Executive aut");
        let b = normalize_variant("Executive aut AWD Hybrid RAV4");
        assert_eq!(a.tokens(), b.tokens());
        assert_eq!(a.trim_level, b.trim_level);
    }

    #[test]
    fn normalizing_a_base_model_is_idempotent() {
        let once = normalize_variant("RAV4 2.5 Plug-in Hybrid 4WD Active aut.");
        let twice = normalize_variant(&once.base_model);
        assert_eq!(once.base_model, twice.base_model);
        assert_eq!(once.base_model, "RAV4 2.5 PHEV AWD-i");
    }
}
