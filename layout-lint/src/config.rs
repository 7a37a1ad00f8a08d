use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Raw configuration for both layout rules.
///
/// A rule is enabled only when its section is present. Values are kept as
/// written; validation happens in [`crate::policy`].
pub struct LintConfig {
    /// Options of the padded-blocks rule.
    #[serde(default, alias = "padded-blocks")]
    pub padded_blocks: Option<PaddedBlocksOptions>,
    /// Options of the paren-spacing rule.
    #[serde(default, alias = "space-in-parens")]
    pub paren_spacing: Option<ParenSpacingOptions>,
}

impl LintConfig {
    /// Deserializes a configuration from TOML text.
    ///
    /// ```
    /// use layout_lint::config::LintConfig;
    ///
    /// let config = LintConfig::from_toml_str("[paren_spacing]\nmode = \"always\"\n").unwrap();
    /// assert!(config.padded_blocks.is_none());
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Either one mode for every category or a table of per-category modes.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PaddingModeOption {
    /// `"always"`, `"never"` or `"loose"` for blocks, switches and classes.
    Uniform(String),
    /// Keys `blocks`, `switches`, `classes`; missing keys disable the category.
    PerCategory(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Raw options of the padded-blocks rule.
pub struct PaddedBlocksOptions {
    /// Padding mode; `"always"` when absent.
    #[serde(default)]
    pub mode: Option<PaddingModeOption>,
    /// Skip blocks whose braces sit on one line.
    #[serde(default, alias = "allowSingleLineBlocks")]
    pub allow_single_line_blocks: bool,
    /// Forbid blank lines before the closing brace in every mode.
    #[serde(default, alias = "noBottomPadding")]
    pub no_bottom_padding: bool,
}

impl PaddedBlocksOptions {
    /// Options with a single mode for all categories.
    #[must_use]
    pub fn uniform(mode: &str) -> Self {
        Self {
            mode: Some(PaddingModeOption::Uniform(mode.to_owned())),
            ..Self::default()
        }
    }

    /// Options with an explicit per-category table.
    #[must_use]
    pub fn per_category<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let table = entries
            .into_iter()
            .map(|(key, mode)| (key.to_owned(), mode.to_owned()))
            .collect();
        Self {
            mode: Some(PaddingModeOption::PerCategory(table)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Raw options of the paren-spacing rule.
pub struct ParenSpacingOptions {
    /// Spacing mode; `"never"` when absent.
    #[serde(default)]
    pub mode: Option<String>,
    /// Exception tags such as `"{}"` or `"bracket lines"`.
    #[serde(default)]
    pub exceptions: Vec<String>,
}

impl ParenSpacingOptions {
    /// Options with a mode and exception tags.
    #[must_use]
    pub fn new(mode: &str, exceptions: &[&str]) -> Self {
        Self {
            mode: Some(mode.to_owned()),
            exceptions: exceptions.iter().map(|&tag| tag.to_owned()).collect(),
        }
    }
}
