//! Name and version normalization shared by the classifier, inventory
//! collector, and orchestrator asset extractors.
//!
//! Centralizing normalization here means a [`crate::model::Fingerprint`]
//! built from a telemetry-sourced [`crate::model::Asset`] and one built from
//! free-form chat text collapse to the same cache key whenever they refer to
//! the same product.

use once_cell_alias_table::AliasTable;

/// Case-fold, collapse whitespace, and resolve known aliases for a product
/// name (e.g. "SQL Server" and "sql   server" both become `"mssqlserver"`).
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let collapsed = collapse_whitespace(name).to_lowercase();
    ALIASES.get_canonical(&collapsed).unwrap_or(collapsed)
}

/// Normalize a version string: trim, lowercase the non-numeric suffix
/// tokens, strip a leading `v`/`V`.
#[must_use]
pub fn normalize_version(version: &str) -> String {
    let trimmed = version.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
        .to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Minimal inline re-implementation of the alias-table pattern: loaded once
/// at first use, queried by normalized name.
mod once_cell_alias_table {
    use std::collections::HashMap;
    use std::sync::OnceLock;

    pub struct AliasTable {
        alias_to_canonical: OnceLock<HashMap<&'static str, &'static str>>,
    }

    impl AliasTable {
        pub const fn new() -> Self {
            Self {
                alias_to_canonical: OnceLock::new(),
            }
        }

        pub fn get_canonical(&self, name: &str) -> Option<String> {
            self.alias_to_canonical
                .get_or_init(builtin_aliases)
                .get(name)
                .map(|s| (*s).to_string())
        }
    }

    /// Hand-curated aliases for products whose common chat-phrasing differs
    /// from the canonical slug used by lifecycle providers.
    fn builtin_aliases() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("sql server", "mssqlserver"),
            ("ms sql server", "mssqlserver"),
            ("microsoft sql server", "mssqlserver"),
            ("mssql", "mssqlserver"),
            ("win server", "windows server"),
            ("winserver", "windows server"),
            ("rhel", "red hat enterprise linux"),
            ("redhat", "red hat enterprise linux"),
            ("red hat", "red hat enterprise linux"),
            ("postgres", "postgresql"),
            ("psql", "postgresql"),
            ("node", "nodejs"),
            ("node.js", "nodejs"),
            ("esxi", "vmware esxi"),
            ("vsphere", "vmware vsphere"),
            ("httpd", "apache httpd"),
            ("apache2", "apache httpd"),
            ("py", "python"),
            ("macos", "mac os"),
            ("osx", "mac os"),
        ])
    }
}

static ALIASES: once_cell_alias_table::AliasTable = once_cell_alias_table::AliasTable::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_name("  Ubuntu   Server "), "ubuntu server");
    }

    #[test]
    fn test_normalize_resolves_alias() {
        assert_eq!(normalize_name("SQL Server"), "mssqlserver");
        assert_eq!(normalize_name("ms sql server"), "mssqlserver");
    }

    #[test]
    fn test_normalize_passthrough_unknown() {
        assert_eq!(normalize_name("FrobnicatorDB"), "frobnicatordb");
    }

    #[test]
    fn test_normalize_version_strips_v_prefix() {
        assert_eq!(normalize_version("v1.2.3"), "1.2.3");
        assert_eq!(normalize_version(" 2019 "), "2019");
    }
}
