//! Letter-substitution rules for single words.
//!
//! Rules are pure functions over one word. The [`RuleEngine`] applies them in
//! a fixed order, each rule consuming the previous rule's output, so the
//! result is the composition of all rules rather than the first one that
//! matches.
//!
//! # Available Rules
//!
//! - [`qaf_gaf::QafGafRule`] - `گ` and `ق` become `ك` everywhere in the word
//! - [`taa_marbuta::TaaMarbutaRule`] - a final `ة` becomes `ه`
//!
//! # Examples
//!
//! ```
//! use hassy::analysis::rules::RuleEngine;
//!
//! let engine = RuleEngine::hassaniya();
//! assert_eq!(engine.apply("قناعة"), "كناعه");
//! assert_eq!(engine.apply("الرجل"), "الرجل");
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

/// Trait for a single letter-substitution rule.
///
/// A rule returns `Cow::Borrowed` when it leaves the word untouched, which
/// lets the engine tell whether any rule fired without comparing strings.
pub trait LetterRule: Send + Sync {
    /// Apply the rule to `word`.
    fn apply<'a>(&self, word: &'a str) -> Cow<'a, str>;

    /// Get the name of this rule.
    fn name(&self) -> &'static str;
}

/// Result of running the rule chain on one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// The rewritten word.
    pub text: String,
    /// Names of the rules that changed the word, in application order.
    pub fired: Vec<&'static str>,
}

impl RuleOutcome {
    /// Whether any rule changed the word.
    pub fn changed(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// Ordered chain of letter rules.
pub struct RuleEngine {
    rules: Vec<Box<dyn LetterRule>>,
}

impl RuleEngine {
    /// Create an engine from an explicit rule order.
    pub fn new(rules: Vec<Box<dyn LetterRule>>) -> Self {
        RuleEngine { rules }
    }

    /// The Hassaniya rule chain: `گ/ق → ك`, then final `ة → ه`.
    pub fn hassaniya() -> Self {
        RuleEngine::new(vec![
            Box::new(qaf_gaf::QafGafRule::new()),
            Box::new(taa_marbuta::TaaMarbutaRule::new()),
        ])
    }

    /// Names of the configured rules in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply all rules and report which ones fired.
    pub fn apply_traced(&self, word: &str) -> RuleOutcome {
        let mut current = word.to_string();
        let mut fired = Vec::new();

        for rule in &self.rules {
            let next = match rule.apply(&current) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(next) => next,
            };
            if next != current {
                fired.push(rule.name());
            }
            current = next;
        }

        RuleOutcome {
            text: current,
            fired,
        }
    }

    /// Apply all rules.
    pub fn apply(&self, word: &str) -> String {
        self.apply_traced(word).text
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::hassaniya()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

static HASSANIYA_RULES: LazyLock<RuleEngine> = LazyLock::new(RuleEngine::hassaniya);

/// Apply the Hassaniya rule chain to one word.
pub fn apply_rules(word: &str) -> String {
    HASSANIYA_RULES.apply(word)
}

pub mod qaf_gaf;
pub mod taa_marbuta;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_compose() {
        // both rules fire on the same word
        let outcome = RuleEngine::hassaniya().apply_traced("قناعة");
        assert_eq!(outcome.text, "كناعه");
        assert_eq!(outcome.fired, vec!["qaf_gaf", "taa_marbuta"]);
        assert!(outcome.changed());
    }

    #[test]
    fn test_no_rule_fires() {
        let outcome = RuleEngine::hassaniya().apply_traced("الرجل");
        assert_eq!(outcome.text, "الرجل");
        assert!(outcome.fired.is_empty());
        assert!(!outcome.changed());
    }

    #[test]
    fn test_scenario_words() {
        assert_eq!(apply_rules("قال"), "كال");
        assert_eq!(apply_rules("كلمة"), "كلمه");
        assert_eq!(apply_rules("گال"), "كال");
        assert_eq!(apply_rules("ةقة"), "ةكه");
    }

    #[test]
    fn test_rules_are_idempotent() {
        for word in ["قناعة", "گاگة", "الرجل", "قَال", "2024"] {
            let once = apply_rules(word);
            assert_eq!(apply_rules(&once), once);
        }
    }

    #[test]
    fn test_custom_order() {
        let engine = RuleEngine::new(vec![Box::new(taa_marbuta::TaaMarbutaRule::new())]);
        assert_eq!(engine.apply("قناعة"), "قناعه");
        assert_eq!(engine.rule_names(), vec!["taa_marbuta"]);
    }
}
