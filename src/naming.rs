//! Naming policy
//!
//! Pure derivation of identifiers, accessor names, and type names from
//! schema property names, plus the collision-resolution discipline for
//! names already declared in a namespace. Derivation is configurable
//! (word delimiters, screaming-case preservation, reserved words) but
//! never consults the builder; uniqueness resolution does, and must be
//! serialized per target namespace.

use regex::Regex;
use serde_json::Value;

use crate::config::NamingConfig;

/// Derives identifiers and resolves naming collisions.
pub struct NamingPolicy {
    config: NamingConfig,
    collision_suffix: Regex,
}

impl NamingPolicy {
    pub fn new(config: NamingConfig) -> Self {
        Self {
            config,
            // Trailing __<digits> marks a previous collision resolution
            collision_suffix: Regex::new(r"^(?s)(.*)__(\d+)$").expect("static pattern"),
        }
    }

    /// Derive a field identifier from a property name.
    ///
    /// Illegal characters are stripped, case is normalized across the
    /// configured word delimiters, a leading digit is shielded with an
    /// underscore, and reserved keywords get a trailing underscore.
    pub fn field_identifier(&self, property: &str) -> String {
        let words = self.split_words(property);
        let name = if self.is_screaming(&words) {
            words.join("_")
        } else {
            let mut joined = String::new();
            for (i, word) in words.iter().enumerate() {
                if i == 0 {
                    joined.push_str(&lower_first(word));
                } else {
                    joined.push_str(&upper_first(word));
                }
            }
            joined
        };
        self.shield(name)
    }

    /// Derive a type identifier: as a field identifier, but capitalized
    /// per word.
    pub fn type_identifier(&self, name: &str) -> String {
        let words = self.split_words(name);
        let joined = if self.is_screaming(&words) {
            words.join("_")
        } else {
            words.iter().map(|w| upper_first(w)).collect()
        };
        self.shield(joined)
    }

    /// Derive an enum constant identifier. Literals flow through the
    /// same rules as property names.
    pub fn enum_constant(&self, literal: &Value) -> String {
        let text = match literal {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.field_identifier(&text)
    }

    /// Getter name for a field
    pub fn getter_name(&self, property: &str, boolean: bool) -> String {
        let prefix = if boolean { "is" } else { "get" };
        self.accessor_name(prefix, property)
    }

    /// Setter name for a field
    pub fn setter_name(&self, property: &str) -> String {
        self.accessor_name("set", property)
    }

    /// Builder method name for a field
    pub fn builder_name(&self, property: &str) -> String {
        self.accessor_name("with", property)
    }

    fn accessor_name(&self, prefix: &str, property: &str) -> String {
        let identifier = self.field_identifier(property);
        let derived = format!("{prefix}{}", upper_first(&identifier));
        if self.config.reserved_accessors.contains(&derived) {
            // Platform-reserved accessor; shift the derived name instead
            format!("{derived}_")
        } else {
            derived
        }
    }

    /// Pick the name for a generated type: an explicit `typeName`
    /// override on the node wins, then `title` under the use-title
    /// policy, then the contextual node name.
    pub fn type_name(&self, node_name: &str, content: &Value, use_title: bool) -> String {
        let chosen = content
            .get("typeName")
            .and_then(Value::as_str)
            .or_else(|| {
                if use_title {
                    content.get("title").and_then(Value::as_str)
                } else {
                    None
                }
            })
            .unwrap_or(node_name);
        self.type_identifier(chosen)
    }

    /// Resolve a collision with names already declared in a namespace.
    ///
    /// Applies the `__<n>` suffix pattern: an existing trailing
    /// `__<digits>` is incremented, otherwise `__1` is appended. The
    /// sequence is strictly monotonic (a prior candidate is never
    /// revisited), which guarantees termination.
    pub fn make_unique(&self, candidate: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
        let mut name = candidate.to_string();
        while is_taken(&name) {
            name = self.bump(&name);
        }
        name
    }

    fn bump(&self, name: &str) -> String {
        if let Some(caps) = self.collision_suffix.captures(name) {
            let stem = &caps[1];
            let counter: u64 = caps[2].parse().unwrap_or(0);
            format!("{stem}__{}", counter + 1)
        } else {
            format!("{name}__1")
        }
    }

    fn split_words(&self, input: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();
        for c in input.chars() {
            if self.config.word_delimiters.contains(c) {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else if c.is_alphanumeric() || c == '_' && !self.config.word_delimiters.contains('_')
            {
                current.push(c);
            }
            // Anything else is illegal in an identifier and dropped
        }
        if !current.is_empty() {
            words.push(current);
        }
        words
    }

    fn is_screaming(&self, words: &[String]) -> bool {
        self.config.preserve_screaming_case
            && !words.is_empty()
            && words
                .iter()
                .all(|w| w.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()))
    }

    /// Shield a candidate from leading digits and reserved keywords.
    fn shield(&self, name: String) -> String {
        let mut name = if name.is_empty() { "_".to_string() } else { name };
        if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        if self.config.reserved_keywords.contains(&name) {
            name.push('_');
        }
        name
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(NamingConfig::default())
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn policy() -> NamingPolicy {
        NamingPolicy::default()
    }

    #[test]
    fn test_field_identifier_camel_cases_delimited_words() {
        let policy = policy();
        assert_eq!(policy.field_identifier("first name"), "firstName");
        assert_eq!(policy.field_identifier("first-name"), "firstName");
        assert_eq!(policy.field_identifier("first_name"), "firstName");
        assert_eq!(policy.field_identifier("first.name"), "firstName");
    }

    #[test]
    fn test_field_identifier_strips_illegal_characters() {
        let policy = policy();
        assert_eq!(policy.field_identifier("a!b@c"), "abc");
        assert_eq!(policy.field_identifier("$ref"), "ref");
    }

    #[test]
    fn test_leading_digit_is_shielded() {
        let policy = policy();
        assert_eq!(policy.field_identifier("1st place"), "_1stPlace");
    }

    #[test]
    fn test_reserved_keyword_gets_suffix() {
        let policy = policy();
        assert_eq!(policy.field_identifier("type"), "type_");
        assert_eq!(policy.field_identifier("default"), "default_");
    }

    #[test]
    fn test_screaming_case_is_preserved() {
        let policy = policy();
        assert_eq!(policy.field_identifier("FOO_BAR"), "FOO_BAR");
        assert_eq!(policy.type_identifier("HTTP_STATUS"), "HTTP_STATUS");
    }

    #[test]
    fn test_screaming_case_disabled() {
        let mut config = NamingConfig::default();
        config.preserve_screaming_case = false;
        let policy = NamingPolicy::new(config);
        assert_eq!(policy.field_identifier("FOO_BAR"), "fOOBAR");
    }

    #[test]
    fn test_type_identifier_pascal_cases() {
        let policy = policy();
        assert_eq!(policy.type_identifier("user address"), "UserAddress");
        assert_eq!(policy.type_identifier("enum"), "Enum");
    }

    #[test]
    fn test_accessor_names() {
        let policy = policy();
        assert_eq!(policy.getter_name("first name", false), "getFirstName");
        assert_eq!(policy.getter_name("active", true), "isActive");
        assert_eq!(policy.setter_name("first name"), "setFirstName");
        assert_eq!(policy.builder_name("first name"), "withFirstName");
    }

    #[test]
    fn test_reserved_accessor_is_shifted() {
        let policy = policy();
        assert_eq!(policy.getter_name("class", false), "getClass_");
    }

    #[test]
    fn test_type_name_override_beats_title() {
        let policy = policy();
        let content = json!({"typeName": "Explicit", "title": "Titled"});
        assert_eq!(policy.type_name("node", &content, true), "Explicit");

        let titled = json!({"title": "Titled"});
        assert_eq!(policy.type_name("node", &titled, true), "Titled");
        assert_eq!(policy.type_name("node", &titled, false), "Node");
    }

    #[test]
    fn test_enum_constant_uses_property_rules() {
        let policy = policy();
        assert_eq!(policy.enum_constant(&json!("not available")), "notAvailable");
        assert_eq!(policy.enum_constant(&json!(42)), "_42");
        assert_eq!(policy.enum_constant(&json!(true)), "true_");
    }

    #[test]
    fn test_uniqueness_suffix_sequence() {
        let policy = policy();
        let mut taken: HashSet<String> = HashSet::new();
        let mut names = Vec::new();
        for _ in 0..4 {
            let name = policy.make_unique("Foo", |candidate| taken.contains(candidate));
            taken.insert(name.clone());
            names.push(name);
        }
        assert_eq!(names, vec!["Foo", "Foo__1", "Foo__2", "Foo__3"]);
    }

    #[test]
    fn test_uniqueness_is_monotonic_from_existing_suffix() {
        let policy = policy();
        let name = policy.make_unique("Foo__7", |c| c == "Foo__7");
        assert_eq!(name, "Foo__8");
    }

    #[test]
    fn test_no_collision_returns_candidate() {
        let policy = policy();
        assert_eq!(policy.make_unique("Bar", |_| false), "Bar");
    }
}
