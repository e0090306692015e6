//! RuleRegistry: ordered rules, first structural match wins.

use std::collections::HashSet;

use super::definition::Rule;
use crate::props::{PropType, Props};

/// Errors reported by eager registry validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule at position {index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate rule name: {0}")]
    DuplicateName(String),
    #[error("rule {rule}: required property `{property}` declares a default")]
    RequiredWithDefault { rule: String, property: String },
    #[error("rule {rule}: default of `{property}` is not a {expected}")]
    DefaultTypeMismatch {
        rule: String,
        property: String,
        expected: PropType,
    },
}

/// Ordered, immutable collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Build a registry without validation. Duplicate names or conflicting
    /// property specs are left as-is; the earlier rule shadows the later one.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Build a registry, rejecting malformed rule specifications.
    pub fn try_new(rules: impl IntoIterator<Item = Rule>) -> Result<Self, RuleError> {
        let registry = Self::new(rules);
        registry.validate()?;
        Ok(registry)
    }

    /// Check name uniqueness and property spec consistency. Reports the first
    /// problem found, in registration order.
    pub fn validate(&self) -> Result<(), RuleError> {
        let mut seen = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.name().is_empty() {
                return Err(RuleError::EmptyName { index });
            }
            if !seen.insert(rule.name()) {
                return Err(RuleError::DuplicateName(rule.name().to_owned()));
            }
            for (property, spec) in rule.props() {
                let Some(default) = &spec.default else {
                    continue;
                };
                if spec.required {
                    return Err(RuleError::RequiredWithDefault {
                        rule: rule.name().to_owned(),
                        property: property.clone(),
                    });
                }
                if !spec.ty.accepts(default) {
                    return Err(RuleError::DefaultTypeMismatch {
                        rule: rule.name().to_owned(),
                        property: property.clone(),
                        expected: spec.ty,
                    });
                }
            }
        }
        Ok(())
    }

    /// First rule, in registration order, that structurally matches `item`.
    pub fn match_item(&self, item: &Props) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(item))
    }

    /// Look up a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for RuleRegistry {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl FromIterator<Rule> for RuleRegistry {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a RuleRegistry {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
