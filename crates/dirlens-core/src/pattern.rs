//! Tagged pattern and rule types for content search and batch rename.

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Regular expression flags in the familiar single letter form.
///
/// `g` replace every match, `i` case-insensitive, `m` multi-line anchors,
/// `s` dot matches newline, `x` ignore whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegexFlags {
    pub global: bool,
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_all: bool,
    pub ignore_whitespace: bool,
}

impl RegexFlags {
    /// Flags with only `g` set.
    pub fn global() -> Self {
        Self {
            global: true,
            ..Self::default()
        }
    }

    /// Build a regex from `pattern` with these flags applied.
    pub fn build(&self, pattern: &str) -> Result<Regex, regex::Error> {
        self.builder(pattern).build()
    }

    /// A builder for `pattern` with these flags applied.
    pub fn builder(&self, pattern: &str) -> RegexBuilder {
        let mut builder = RegexBuilder::new(pattern);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_all)
            .ignore_whitespace(self.ignore_whitespace);
        builder
    }
}

impl FromStr for RegexFlags {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::default();
        for c in s.chars() {
            match c {
                'g' => flags.global = true,
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_all = true,
                'x' => flags.ignore_whitespace = true,
                // Always on for Rust regexes.
                'u' => {}
                other => return Err(format!("unsupported regex flag '{other}'")),
            }
        }
        Ok(flags)
    }
}

impl TryFrom<String> for RegexFlags {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RegexFlags> for String {
    fn from(flags: RegexFlags) -> Self {
        flags.to_string()
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = [
            (self.global, 'g'),
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_all, 's'),
            (self.ignore_whitespace, 'x'),
        ];
        for (set, letter) in pairs {
            if set {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// What to look for inside file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchPattern {
    /// Plain substring.
    Literal { value: String },
    /// Regular expression.
    Regex {
        pattern: String,
        #[serde(default)]
        flags: RegexFlags,
    },
}

impl SearchPattern {
    /// Create a literal pattern.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Create a regex pattern with no flags.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags: RegexFlags::default(),
        }
    }

    /// The pattern text as given by the caller.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal { value } => value,
            Self::Regex { pattern, .. } => pattern,
        }
    }

    /// Compile to a line matcher. An `i` flag wins over `case_sensitive`.
    pub fn compile(&self, case_sensitive: bool) -> Result<Regex, regex::Error> {
        match self {
            Self::Literal { value } => RegexBuilder::new(&regex::escape(value))
                .case_insensitive(!case_sensitive)
                .build(),
            Self::Regex { pattern, flags } => {
                let flags = RegexFlags {
                    case_insensitive: flags.case_insensitive || !case_sensitive,
                    ..*flags
                };
                flags.build(pattern)
            }
        }
    }
}

/// Replacement text for a regex rename rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Replacement {
    /// Inserted verbatim; `$` has no special meaning.
    Literal(String),
    /// Expanded per match: `$1`, `${name}` and `$$` refer to capture groups.
    Template(String),
}

impl Replacement {
    /// The raw replacement text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Template(text) => text,
        }
    }
}

/// How a batch rename computes new file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenameRule {
    /// Replace every occurrence of `find` with `replace`.
    Literal { find: String, replace: String },
    /// Replace regex matches; only the first unless the `g` flag is set.
    Regex {
        pattern: String,
        #[serde(default)]
        flags: RegexFlags,
        replace: Replacement,
    },
}

impl RenameRule {
    /// Create a literal rule.
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self::Literal {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Create a regex rule whose replacement expands capture groups.
    pub fn regex(pattern: impl Into<String>, flags: RegexFlags, template: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags,
            replace: Replacement::Template(template.into()),
        }
    }

    /// The search part of the rule.
    pub fn pattern(&self) -> &str {
        match self {
            Self::Literal { find, .. } => find,
            Self::Regex { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse_and_display() {
        let flags: RegexFlags = "gi".parse().unwrap();
        assert!(flags.global);
        assert!(flags.case_insensitive);
        assert!(!flags.multi_line);
        assert_eq!(flags.to_string(), "gi");

        assert!("gq".parse::<RegexFlags>().is_err());
    }

    #[test]
    fn test_literal_search_escapes_metacharacters() {
        let re = SearchPattern::literal("a.b").compile(true).unwrap();
        assert!(re.is_match("xa.by"));
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn test_case_sensitivity() {
        let pattern = SearchPattern::literal("todo");
        assert!(!pattern.compile(true).unwrap().is_match("TODO"));
        assert!(pattern.compile(false).unwrap().is_match("TODO"));
    }

    #[test]
    fn test_rule_serde_is_tagged() {
        let rule = RenameRule::regex(r"(\d+)", RegexFlags::global(), "n$1");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["kind"], "regex");
        assert_eq!(json["flags"], "g");
        assert_eq!(json["replace"]["kind"], "template");

        let back: RenameRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}
