//! Site to destination dataset resolution.

use std::collections::HashMap;

use liltstat_warehouse_core::DatasetName;

/// Maps an originating site to the dataset its beacons land in.
///
/// The mapping is static deployment configuration, never mutated at
/// runtime. Unknown sites resolve to `None` and the ingestion handler
/// drops their beacons without surfacing an error.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    sites: HashMap<String, DatasetName>,
}

impl SiteResolver {
    /// The production site mapping.
    pub fn new() -> Self {
        Self::from_entries([
            ("unetbootin.github.io", "liltstat_ungi"),
            ("habitlab.github.io", "liltstat_hlgi"),
        ])
    }

    /// A resolver over the given (site, dataset id) entries.
    ///
    /// # Panics
    ///
    /// Panics if a dataset id is invalid.
    pub fn from_entries<S, D>(entries: impl IntoIterator<Item = (S, D)>) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        let sites = entries
            .into_iter()
            .map(|(site, dataset)| (site.into(), DatasetName::new_unchecked(dataset.into())))
            .collect();
        Self { sites }
    }

    /// The dataset for a site, or `None` if the site is unknown.
    pub fn resolve(&self, site: &str) -> Option<&DatasetName> {
        self.sites.get(site)
    }

    /// Every dataset the resolver can target.
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetName> {
        self.sites.values()
    }
}

impl Default for SiteResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_mapping() {
        let resolver = SiteResolver::new();

        assert_eq!(
            resolver.resolve("unetbootin.github.io"),
            Some(&DatasetName::new_unchecked("liltstat_ungi"))
        );
        assert_eq!(
            resolver.resolve("habitlab.github.io"),
            Some(&DatasetName::new_unchecked("liltstat_hlgi"))
        );
    }

    #[test]
    fn test_unknown_site_resolves_to_none() {
        let resolver = SiteResolver::new();
        assert_eq!(resolver.resolve("evil.example.com"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn test_custom_entries() {
        let resolver = SiteResolver::from_entries([("stats.example.com", "liltstat_example")]);

        assert_eq!(
            resolver.resolve("stats.example.com"),
            Some(&DatasetName::new_unchecked("liltstat_example"))
        );
        assert_eq!(resolver.resolve("unetbootin.github.io"), None);
    }
}
