//! URI templates.

use std::fmt;

/// A resource URI template such as `/{projectKey}/carts/{ID}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UriTemplate(String);

impl UriTemplate {
    /// Create a template from its string form.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Get the template string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a relative template.
    pub fn join(&self, relative: &UriTemplate) -> UriTemplate {
        UriTemplate(format!("{}{}", self.0, relative.0))
    }

    /// Get the variable names in order of appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut variables = Vec::new();
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    variables.push(after[..end].to_string());
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        variables
    }

    /// Get the non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Get the collection this template belongs to.
    ///
    /// A trailing `/{var}` segment is dropped, so `/carts/{ID}` and `/carts`
    /// share the collection `/carts`. The top level collection is `/`.
    pub fn collection(&self) -> UriTemplate {
        let trimmed = self.0.trim_end_matches('/');
        let collection = match trimmed.rsplit_once('/') {
            Some((parent, last)) if last.starts_with('{') && last.ends_with('}') => parent,
            _ => trimmed,
        };
        if collection.is_empty() {
            UriTemplate::new("/")
        } else {
            UriTemplate::new(collection)
        }
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables() {
        let uri = UriTemplate::new("/{projectKey}/carts/key={key}");
        assert_eq!(uri.variables(), vec!["projectKey", "key"]);
        assert!(UriTemplate::new("/carts").variables().is_empty());
    }

    #[test]
    fn test_join() {
        let parent = UriTemplate::new("/{projectKey}");
        let joined = parent.join(&UriTemplate::new("/carts"));
        assert_eq!(joined.as_str(), "/{projectKey}/carts");
    }

    #[test]
    fn test_collection() {
        assert_eq!(
            UriTemplate::new("/{projectKey}/carts/{ID}").collection(),
            UriTemplate::new("/{projectKey}/carts")
        );
        assert_eq!(
            UriTemplate::new("/{projectKey}/carts").collection(),
            UriTemplate::new("/{projectKey}/carts")
        );
        assert_eq!(
            UriTemplate::new("/{projectKey}").collection(),
            UriTemplate::new("/")
        );
    }

    #[test]
    fn test_segments() {
        let uri = UriTemplate::new("/{projectKey}/me/login");
        let segments: Vec<_> = uri.segments().collect();
        assert_eq!(segments, vec!["{projectKey}", "me", "login"]);
    }
}
