//! Resolution of raw options into immutable, validated policies.
//!
//! Every [`ConfigError`] is raised here, before any token is inspected.

use rustc_hash::FxHashSet;
use std::str::FromStr;

use crate::config::{PaddedBlocksOptions, PaddingModeOption, ParenSpacingOptions};
use crate::error::ConfigError;
use crate::syntax::Category;

/// Shared mode vocabulary of both rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Always require the whitespace.
    Always,
    /// Never allow the whitespace.
    Never,
    /// Decide per instance.
    Loose,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "loose" => Ok(Self::Loose),
            _ => Err(ConfigError::UnknownMode {
                value: value.to_owned(),
            }),
        }
    }
}

/// Padding requirement of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingPolicy {
    /// Padding is required regardless of content.
    pub should_have_padding: bool,
    /// Padding is required only for sliced blocks (loose mode).
    pub only_pad_sliced: bool,
}

impl From<Mode> for PaddingPolicy {
    fn from(mode: Mode) -> Self {
        Self {
            should_have_padding: mode == Mode::Always,
            only_pad_sliced: mode == Mode::Loose,
        }
    }
}

impl PaddingPolicy {
    /// Whether a block with the given slicing needs padding.
    #[must_use]
    pub const fn requires_padding(self, sliced: bool) -> bool {
        self.should_have_padding || (self.only_pad_sliced && sliced)
    }
}

/// Resolved policy of the padded-blocks rule. A `None` category is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPolicy {
    /// Statement blocks and static initializers.
    pub blocks: Option<PaddingPolicy>,
    /// Switch bodies.
    pub switches: Option<PaddingPolicy>,
    /// Class bodies.
    pub classes: Option<PaddingPolicy>,
    /// Skip blocks whose braces share a line.
    pub allow_single_line_blocks: bool,
    /// Forbid bottom padding in every mode.
    pub no_bottom_padding: bool,
}

impl BlockPolicy {
    /// Validates `options` and builds the policy.
    pub fn resolve(options: &PaddedBlocksOptions) -> Result<Self, ConfigError> {
        let mut policy = Self {
            blocks: None,
            switches: None,
            classes: None,
            allow_single_line_blocks: options.allow_single_line_blocks,
            no_bottom_padding: options.no_bottom_padding,
        };

        match &options.mode {
            None => policy.set_all(Mode::Always),
            Some(PaddingModeOption::Uniform(mode)) => policy.set_all(mode.parse()?),
            Some(PaddingModeOption::PerCategory(table)) => {
                if table.is_empty() {
                    return Err(ConfigError::EmptyCategoryTable);
                }
                for (key, mode) in table {
                    let mode = PaddingPolicy::from(mode.parse::<Mode>()?);
                    match key.as_str() {
                        "blocks" => policy.blocks = Some(mode),
                        "switches" => policy.switches = Some(mode),
                        "classes" => policy.classes = Some(mode),
                        _ => return Err(ConfigError::UnknownCategory { key: key.clone() }),
                    }
                }
            }
        }
        Ok(policy)
    }

    fn set_all(&mut self, mode: Mode) {
        let padding = Some(PaddingPolicy::from(mode));
        self.blocks = padding;
        self.switches = padding;
        self.classes = padding;
    }

    /// Policy of a category, `None` when it is not configured.
    #[must_use]
    pub const fn category(&self, category: Category) -> Option<PaddingPolicy> {
        match category {
            Category::Blocks => self.blocks,
            Category::Switches => self.switches,
            Category::Classes => self.classes,
        }
    }
}

/// Paren spacing exception tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionTag {
    /// `"{}"`
    BraceType,
    /// `"[]"`
    BracketType,
    /// `"()"`
    ParenType,
    /// `"empty"`
    Empty,
    /// `"bracket lines"`
    BracketLines,
    /// `"bracket sides"`
    BracketSides,
    /// `"bracket unclosed"`
    BracketUnclosed,
    /// `"bracket within"`
    BracketWithin,
}

impl ExceptionTag {
    /// The configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BraceType => "{}",
            Self::BracketType => "[]",
            Self::ParenType => "()",
            Self::Empty => "empty",
            Self::BracketLines => "bracket lines",
            Self::BracketSides => "bracket sides",
            Self::BracketUnclosed => "bracket unclosed",
            Self::BracketWithin => "bracket within",
        }
    }
}

impl FromStr for ExceptionTag {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "{}" => Self::BraceType,
            "[]" => Self::BracketType,
            "()" => Self::ParenType,
            "empty" => Self::Empty,
            "bracket lines" => Self::BracketLines,
            "bracket sides" => Self::BracketSides,
            "bracket unclosed" => Self::BracketUnclosed,
            "bracket within" => Self::BracketWithin,
            _ => {
                return Err(ConfigError::UnknownException {
                    value: value.to_owned(),
                })
            }
        })
    }
}

/// Resolved policy of the paren-spacing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenPolicy {
    /// Spacing mode.
    pub mode: Mode,
    /// Active exceptions.
    pub exceptions: FxHashSet<ExceptionTag>,
}

impl ParenPolicy {
    /// Validates `options` and builds the policy.
    pub fn resolve(options: &ParenSpacingOptions) -> Result<Self, ConfigError> {
        let mode = match &options.mode {
            Some(mode) => mode.parse()?,
            None => Mode::Never,
        };
        let mut exceptions = FxHashSet::default();
        for raw in &options.exceptions {
            if !exceptions.insert(raw.parse::<ExceptionTag>()?) {
                return Err(ConfigError::DuplicateException { value: raw.clone() });
            }
        }
        Ok(Self { mode, exceptions })
    }

    /// Whether `tag` is active.
    #[must_use]
    pub fn has(&self, tag: ExceptionTag) -> bool {
        self.exceptions.contains(&tag)
    }

    /// Texts that, found right after `(`, invert the requirement.
    #[must_use]
    pub fn opener_exceptions(&self) -> Vec<&'static str> {
        self.bracket_exceptions(["{", "[", "(", ")"])
    }

    /// Texts that, found right before `)`, invert the requirement.
    #[must_use]
    pub fn closer_exceptions(&self) -> Vec<&'static str> {
        self.bracket_exceptions(["}", "]", ")", "("])
    }

    // Order: brace, bracket, paren, empty.
    fn bracket_exceptions(&self, texts: [&'static str; 4]) -> Vec<&'static str> {
        [
            ExceptionTag::BraceType,
            ExceptionTag::BracketType,
            ExceptionTag::ParenType,
            ExceptionTag::Empty,
        ]
        .into_iter()
        .zip(texts)
        .filter(|(tag, _)| self.has(*tag))
        .map(|(_, text)| text)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_modes() {
        let policy = BlockPolicy::resolve(&PaddedBlocksOptions::uniform("loose")).unwrap();
        let loose = PaddingPolicy {
            should_have_padding: false,
            only_pad_sliced: true,
        };
        assert_eq!(policy.category(Category::Blocks), Some(loose));
        assert_eq!(policy.category(Category::Switches), Some(loose));
        assert_eq!(policy.category(Category::Classes), Some(loose));
        assert!(!loose.requires_padding(false));
        assert!(loose.requires_padding(true));
    }

    #[test]
    fn test_default_mode_is_always() {
        let policy = BlockPolicy::resolve(&PaddedBlocksOptions::default()).unwrap();
        assert_eq!(
            policy.blocks,
            Some(PaddingPolicy {
                should_have_padding: true,
                only_pad_sliced: false
            })
        );
    }

    #[test]
    fn test_per_category_leaves_others_unset() {
        let options = PaddedBlocksOptions::per_category([("switches", "never")]);
        let policy = BlockPolicy::resolve(&options).unwrap();
        assert!(policy.blocks.is_none());
        assert!(policy.classes.is_none());
        assert_eq!(policy.switches, Some(PaddingPolicy::from(Mode::Never)));
    }

    #[test]
    fn test_padding_config_errors() {
        assert_eq!(
            BlockPolicy::resolve(&PaddedBlocksOptions::uniform("sometimes")),
            Err(ConfigError::UnknownMode {
                value: "sometimes".to_owned()
            })
        );
        assert_eq!(
            BlockPolicy::resolve(&PaddedBlocksOptions::per_category([("loops", "always")])),
            Err(ConfigError::UnknownCategory {
                key: "loops".to_owned()
            })
        );
        assert_eq!(
            BlockPolicy::resolve(&PaddedBlocksOptions::per_category(Vec::<(&str, &str)>::new())),
            Err(ConfigError::EmptyCategoryTable)
        );
    }

    #[test]
    fn test_paren_policy_defaults_to_never() {
        let policy = ParenPolicy::resolve(&ParenSpacingOptions::default()).unwrap();
        assert_eq!(policy.mode, Mode::Never);
        assert!(policy.exceptions.is_empty());
    }

    #[test]
    fn test_paren_exception_texts() {
        let options = ParenSpacingOptions::new("always", &["empty", "{}", "bracket within"]);
        let policy = ParenPolicy::resolve(&options).unwrap();
        assert_eq!(policy.opener_exceptions(), vec!["{", ")"]);
        assert_eq!(policy.closer_exceptions(), vec!["}", "("]);
        assert!(policy.has(ExceptionTag::BracketWithin));
        assert!(!policy.has(ExceptionTag::BracketLines));
    }

    #[test]
    fn test_paren_config_errors() {
        assert_eq!(
            ParenPolicy::resolve(&ParenSpacingOptions::new("both", &[])),
            Err(ConfigError::UnknownMode {
                value: "both".to_owned()
            })
        );
        assert_eq!(
            ParenPolicy::resolve(&ParenSpacingOptions::new("never", &["<>"])),
            Err(ConfigError::UnknownException {
                value: "<>".to_owned()
            })
        );
        assert_eq!(
            ParenPolicy::resolve(&ParenSpacingOptions::new("never", &["[]", "[]"])),
            Err(ConfigError::DuplicateException {
                value: "[]".to_owned()
            })
        );
    }

    #[test]
    fn test_tag_spelling_round_trips() {
        for tag in [
            ExceptionTag::BraceType,
            ExceptionTag::BracketLines,
            ExceptionTag::BracketSides,
            ExceptionTag::BracketUnclosed,
        ] {
            assert_eq!(tag.as_str().parse::<ExceptionTag>(), Ok(tag));
        }
    }
}
