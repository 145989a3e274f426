use crate::config::FilterConfig;

/// Decides which discovered links are worth following
///
/// A link is kept when it starts with one of the included namespaces. Links
/// under the facet namespace are additionally dropped when they carry any
/// excluded facet marker, since faceted listings multiply combinatorially.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    include_prefixes: Vec<String>,
    facet_namespace: String,
    excluded_facets: Vec<String>,
}

impl LinkFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            include_prefixes: config.include_prefixes.clone(),
            facet_namespace: config.facet_namespace.clone(),
            excluded_facets: config.excluded_facets.clone(),
        }
    }

    /// Returns true if the link should be handed to the scheduler
    pub fn accepts(&self, link: &str) -> bool {
        if !self.include_prefixes.iter().any(|p| link.starts_with(p.as_str())) {
            return false;
        }

        if !self.facet_namespace.is_empty() && link.starts_with(self.facet_namespace.as_str()) {
            return !self
                .excluded_facets
                .iter()
                .any(|facet| link.contains(facet.as_str()));
        }

        true
    }
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
