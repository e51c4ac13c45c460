//! Rename rules compiled for repeated application.

use std::borrow::Cow;

use regex::{NoExpand, Regex};

use dirlens_core::{RenameError, RenameRule, Replacement};

/// A [`RenameRule`] with its regex compiled once per batch.
#[derive(Debug, Clone)]
pub enum CompiledRule {
    Literal {
        find: String,
        replace: String,
    },
    Regex {
        regex: Regex,
        replace: Replacement,
        global: bool,
    },
}

impl CompiledRule {
    /// Compile a rule, rejecting empty literal searches and bad regexes.
    pub fn compile(rule: &RenameRule) -> Result<Self, RenameError> {
        match rule {
            RenameRule::Literal { find, replace } => {
                if find.is_empty() {
                    return Err(RenameError::InvalidRule {
                        pattern: find.clone(),
                        reason: "search text cannot be empty".into(),
                    });
                }
                Ok(Self::Literal {
                    find: find.clone(),
                    replace: replace.clone(),
                })
            }
            RenameRule::Regex {
                pattern,
                flags,
                replace,
            } => {
                let regex = flags.build(pattern).map_err(|e| RenameError::InvalidRule {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Self::Regex {
                    regex,
                    replace: replace.clone(),
                    global: flags.global,
                })
            }
        }
    }

    /// Apply the rule to a base file name.
    ///
    /// Literal rules replace every occurrence. Regex rules replace the first
    /// match, or all matches with the `g` flag.
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::Literal { find, replace } => {
                if name.contains(find.as_str()) {
                    Cow::Owned(name.replace(find.as_str(), replace))
                } else {
                    Cow::Borrowed(name)
                }
            }
            Self::Regex {
                regex,
                replace,
                global,
            } => {
                let limit = if *global { 0 } else { 1 };
                match replace {
                    Replacement::Literal(text) => regex.replacen(name, limit, NoExpand(text.as_str())),
                    Replacement::Template(template) => {
                        regex.replacen(name, limit, template.as_str())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirlens_core::RegexFlags;

    fn apply(rule: RenameRule, name: &str) -> String {
        CompiledRule::compile(&rule).unwrap().apply(name).into_owned()
    }

    #[test]
    fn test_literal_replaces_all() {
        assert_eq!(apply(RenameRule::literal("a", "o"), "banana.txt"), "bonono.txt");
        assert_eq!(apply(RenameRule::literal("zz", "y"), "plain.txt"), "plain.txt");
    }

    #[test]
    fn test_regex_first_match_only() {
        let rule = RenameRule::regex("[0-9]", RegexFlags::default(), "#");
        assert_eq!(apply(rule, "a1b2c3"), "a#b2c3");
    }

    #[test]
    fn test_regex_global() {
        let rule = RenameRule::regex("[0-9]", RegexFlags::global(), "#");
        assert_eq!(apply(rule, "a1b2c3"), "a#b#c#");
    }

    #[test]
    fn test_regex_capture_groups() {
        let rule = RenameRule::regex(
            r"^IMG_(\d{4})(\d{2})(\d{2})",
            RegexFlags::default(),
            "${1}-${2}-${3}",
        );
        assert_eq!(apply(rule, "IMG_20240131.jpg"), "2024-01-31.jpg");
    }

    #[test]
    fn test_regex_case_insensitive() {
        let flags: RegexFlags = "gi".parse().unwrap();
        let rule = RenameRule::regex("jpeg", flags, "jpg");
        assert_eq!(apply(rule, "a.JPEG"), "a.jpg");
    }

    #[test]
    fn test_literal_replacement_is_not_expanded() {
        let rule = RenameRule::Regex {
            pattern: "price".into(),
            flags: RegexFlags::default(),
            replace: Replacement::Literal("$1".into()),
        };
        assert_eq!(apply(rule, "price.csv"), "$1.csv");
    }

    #[test]
    fn test_prefix_with_anchor() {
        let rule = RenameRule::regex("^", RegexFlags::default(), "old_");
        assert_eq!(apply(rule, "notes.md"), "old_notes.md");
    }

    #[test]
    fn test_invalid_rules() {
        assert!(matches!(
            CompiledRule::compile(&RenameRule::regex("(", RegexFlags::default(), "")),
            Err(RenameError::InvalidRule { .. })
        ));
        assert!(matches!(
            CompiledRule::compile(&RenameRule::literal("", "x")),
            Err(RenameError::InvalidRule { .. })
        ));
    }
}
