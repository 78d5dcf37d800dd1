//! Namespace mapping
//!
//! Ordered (source-scope, target-namespace) rules deciding which
//! namespace a generated type lands in. Directory scopes apply to all
//! descendants, file scopes only to an exact match, and the most
//! specific (longest) scope wins. Unmapped paths resolve to the default
//! namespace.

use serde::{Deserialize, Serialize};

/// How a mapping rule's scope matches source paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Matches the scope and everything below it
    Directory,
    /// Matches exactly one source path
    File,
}

/// One source-scope -> target-namespace rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRule {
    /// Source path or path prefix, `/`-separated
    pub scope: String,
    /// Target namespace for matching sources
    pub namespace: String,
    #[serde(default = "default_scope_kind")]
    pub kind: ScopeKind,
}

fn default_scope_kind() -> ScopeKind {
    ScopeKind::Directory
}

/// Ordered rule set with longest-scope-wins resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceMapping {
    rules: Vec<MappingRule>,
    /// Namespace for paths no rule covers
    #[serde(default)]
    default_namespace: String,
}

impl NamespaceMapping {
    pub fn new(rules: Vec<MappingRule>, default_namespace: impl Into<String>) -> Self {
        Self {
            rules,
            default_namespace: default_namespace.into(),
        }
    }

    /// Resolve the namespace for a source path.
    pub fn resolve(&self, source_path: &str) -> &str {
        let normalized = source_path.trim_end_matches('/');

        let mut best: Option<&MappingRule> = None;
        for rule in &self.rules {
            let scope = rule.scope.trim_end_matches('/');
            let matches = match rule.kind {
                ScopeKind::File => normalized == scope,
                ScopeKind::Directory => {
                    normalized == scope
                        || normalized
                            .strip_prefix(scope)
                            .is_some_and(|rest| rest.starts_with('/'))
                }
            };
            if !matches {
                continue;
            }
            // Most specific scope wins; a file match beats a directory
            // match of the same length.
            let better = match best {
                None => true,
                Some(current) => {
                    let current_scope = current.scope.trim_end_matches('/');
                    scope.len() > current_scope.len()
                        || (scope.len() == current_scope.len()
                            && rule.kind == ScopeKind::File
                            && current.kind == ScopeKind::Directory)
                }
            };
            if better {
                best = Some(rule);
            }
        }

        best.map(|rule| rule.namespace.as_str())
            .unwrap_or(&self.default_namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(scope: &str, namespace: &str, kind: ScopeKind) -> MappingRule {
        MappingRule {
            scope: scope.to_string(),
            namespace: namespace.to_string(),
            kind,
        }
    }

    #[test]
    fn test_unmapped_path_uses_default() {
        let mapping = NamespaceMapping::new(vec![], "com.default");
        assert_eq!(mapping.resolve("schemas/a.json"), "com.default");
    }

    #[test]
    fn test_directory_scope_covers_descendants() {
        let mapping = NamespaceMapping::new(
            vec![rule("schemas/auth", "com.auth", ScopeKind::Directory)],
            "",
        );
        assert_eq!(mapping.resolve("schemas/auth/user.json"), "com.auth");
        assert_eq!(mapping.resolve("schemas/auth/nested/session.json"), "com.auth");
        assert_eq!(mapping.resolve("schemas/other/user.json"), "");
    }

    #[test]
    fn test_directory_scope_requires_segment_boundary() {
        let mapping = NamespaceMapping::new(
            vec![rule("schemas/auth", "com.auth", ScopeKind::Directory)],
            "",
        );
        assert_eq!(mapping.resolve("schemas/authx/user.json"), "");
    }

    #[test]
    fn test_file_scope_is_exact() {
        let mapping = NamespaceMapping::new(
            vec![rule("schemas/user.json", "com.users", ScopeKind::File)],
            "",
        );
        assert_eq!(mapping.resolve("schemas/user.json"), "com.users");
        assert_eq!(mapping.resolve("schemas/user.json.bak"), "");
    }

    #[test]
    fn test_most_specific_scope_wins() {
        let mapping = NamespaceMapping::new(
            vec![
                rule("schemas", "com.all", ScopeKind::Directory),
                rule("schemas/auth", "com.auth", ScopeKind::Directory),
                rule("schemas/auth/user.json", "com.users", ScopeKind::File),
            ],
            "",
        );
        assert_eq!(mapping.resolve("schemas/misc.json"), "com.all");
        assert_eq!(mapping.resolve("schemas/auth/session.json"), "com.auth");
        assert_eq!(mapping.resolve("schemas/auth/user.json"), "com.users");
    }

    #[test]
    fn test_rule_order_does_not_override_specificity() {
        let mapping = NamespaceMapping::new(
            vec![
                rule("schemas/auth", "com.auth", ScopeKind::Directory),
                rule("schemas", "com.all", ScopeKind::Directory),
            ],
            "",
        );
        assert_eq!(mapping.resolve("schemas/auth/user.json"), "com.auth");
    }
}
