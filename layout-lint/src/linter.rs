use rayon::prelude::*;
use tracing::debug;

use crate::config::LintConfig;
use crate::diagnostic::{sort_diagnostics, Diagnostic};
use crate::error::{ConfigError, LintError};
use crate::rules::{PaddedBlocks, ParenSpacing, Rule};
use crate::source::SourceUnit;

/// Runs a set of layout rules over source units.
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
}

impl Linter {
    /// Creates a `Linter` with the given rules.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Builds the rules enabled in `config`.
    ///
    /// Every configured policy is resolved up front, so a bad option fails
    /// here and never in the middle of a pass.
    pub fn from_config(config: &LintConfig) -> Result<Self, ConfigError> {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        if let Some(options) = &config.padded_blocks {
            rules.push(Box::new(PaddedBlocks::from_options(options)?));
        }
        if let Some(options) = &config.paren_spacing {
            rules.push(Box::new(ParenSpacing::from_options(options)?));
        }
        Ok(Self::new(rules))
    }

    /// Codes of the enabled rules, in run order.
    #[must_use]
    pub fn rule_codes(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.code()).collect()
    }

    /// Checks one unit with every rule and merges the diagnostics by position.
    ///
    /// Diagnostics at the same position keep rule order.
    pub fn check(&self, unit: &SourceUnit) -> Result<Vec<Diagnostic>, LintError> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            diagnostics.extend(rule.check(unit)?);
        }
        sort_diagnostics(&mut diagnostics);
        debug!(
            rules = self.rules.len(),
            diagnostics = diagnostics.len(),
            "unit checked"
        );
        Ok(diagnostics)
    }

    /// Checks independent units in parallel. Results are in input order.
    pub fn check_all(&self, units: &[SourceUnit]) -> Vec<Result<Vec<Diagnostic>, LintError>> {
        let results: Vec<_> = units.par_iter().map(|unit| self.check(unit)).collect();
        debug!(
            units = units.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "batch checked"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PaddedBlocksOptions, ParenSpacingOptions};

    #[test]
    fn test_from_config_enables_configured_rules() {
        let linter = Linter::from_config(&LintConfig::default()).unwrap();
        assert!(linter.rule_codes().is_empty());

        let config = LintConfig {
            padded_blocks: Some(PaddedBlocksOptions::default()),
            paren_spacing: Some(ParenSpacingOptions::default()),
        };
        let linter = Linter::from_config(&config).unwrap();
        assert_eq!(linter.rule_codes(), vec!["LAY001", "LAY002"]);
    }

    #[test]
    fn test_from_config_surfaces_policy_errors() {
        let config = LintConfig {
            padded_blocks: None,
            paren_spacing: Some(ParenSpacingOptions::new("sideways", &[])),
        };
        assert!(matches!(
            Linter::from_config(&config),
            Err(ConfigError::UnknownMode { .. })
        ));
    }
}
