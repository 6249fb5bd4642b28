//! Group membership search request

use ldap3::{ldap_escape, SearchEntry};
use ldap_auth_core::{format_template, GroupSearchConfig};

/// A fully formatted group search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQuery {
    /// Search base
    pub base_dn: String,

    /// Filter with the bound DN substituted
    pub filter: String,

    /// Attribute to read from each group entry
    pub attribute: String,
}

impl GroupQuery {
    /// Build the search for the DN the user bound as.
    ///
    /// The DN is escaped as a filter assertion value before substitution,
    /// so filter templates must not escape `%s` themselves.
    pub fn for_bound_dn(config: &GroupSearchConfig, bound_dn: &str) -> Self {
        Self {
            base_dn: config.base_dn.clone(),
            filter: format_template(&config.filter_template, &ldap_escape(bound_dn)),
            attribute: config.attribute.clone(),
        }
    }

    /// First value of the requested attribute, or an empty string.
    ///
    /// Attribute names compare case-insensitively.
    pub fn value_of(&self, entry: &SearchEntry) -> String {
        entry
            .attrs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.attribute))
            .and_then(|(_, values)| values.first().cloned())
            .unwrap_or_default()
    }
}
