use crate::link::LinkError;
use url::Url;

/// Resolves a discovered link against the site origin into its canonical form
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace; reject empty links
/// 2. Reject `javascript:`, `mailto:`, `tel:`, `data:` and fragment-only links
/// 3. Join the link onto the origin (relative links become absolute)
/// 4. Require an http(s) URL on the origin's host
/// 5. Remove the fragment
///
/// Hosts are lowercased by the URL parser. Paths, trailing slashes and query
/// strings are kept as-is since the site distinguishes them.
///
/// # Examples
///
/// ```
/// use cinecrawl::link::canonicalize;
/// use url::Url;
///
/// let origin = Url::parse("http://dianying.fm").unwrap();
/// let url = canonicalize(&origin, "/movie/heat/#cast").unwrap();
/// assert_eq!(url.as_str(), "http://dianying.fm/movie/heat/");
/// ```
pub fn canonicalize(origin: &Url, link: &str) -> Result<Url, LinkError> {
    let link = link.trim();

    if link.is_empty() {
        return Err(LinkError::Empty);
    }

    let lowered = link.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
        || link.starts_with('#')
    {
        return Err(LinkError::Unsupported(link.to_string()));
    }

    let mut url = origin.join(link).map_err(|e| LinkError::Resolve {
        link: link.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LinkError::Unsupported(link.to_string()));
    }

    if url.host_str() != origin.host_str()
        || url.port_or_known_default() != origin.port_or_known_default()
    {
        return Err(LinkError::OffSite(url.to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://dianying.fm").unwrap()
    }

    #[test]
    fn test_relative_link_joins_origin() {
        let url = canonicalize(&origin(), "/movie/django-unchained/").unwrap();
        assert_eq!(url.as_str(), "http://dianying.fm/movie/django-unchained/");
    }

    #[test]
    fn test_absolute_same_site_link() {
        let url = canonicalize(&origin(), "http://DIANYING.fm/category/action").unwrap();
        assert_eq!(url.as_str(), "http://dianying.fm/category/action");
    }

    #[test]
    fn test_fragment_removed() {
        let a = canonicalize(&origin(), "/movie/heat/#reviews").unwrap();
        let b = canonicalize(&origin(), "/movie/heat/").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_preserved() {
        let url = canonicalize(&origin(), "/category/action?p=2").unwrap();
        assert_eq!(url.query(), Some("p=2"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let url = canonicalize(&origin(), "  /movie/heat/ \n").unwrap();
        assert_eq!(url.path(), "/movie/heat/");
    }

    #[test]
    fn test_empty_link_rejected() {
        assert_eq!(canonicalize(&origin(), "   "), Err(LinkError::Empty));
    }

    #[test]
    fn test_special_schemes_rejected() {
        for link in ["javascript:void(0)", "mailto:a@b.c", "tel:123", "data:text/html,x", "#top"] {
            assert!(matches!(
                canonicalize(&origin(), link),
                Err(LinkError::Unsupported(_))
            ));
        }
    }

    #[test]
    fn test_off_site_link_rejected() {
        assert!(matches!(
            canonicalize(&origin(), "https://www.imdb.com/title/tt1853728/"),
            Err(LinkError::OffSite(_))
        ));
    }
}
