/// A storage region used as the subdomain of the storage host.
///
/// Always lower-case and restricted to `[a-z0-9-]`; an empty region means
/// the default (Falkenstein) endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    /// Build a region from arbitrary user input.
    ///
    /// Surrounding whitespace is trimmed, the rest is lower-cased and every
    /// character outside `[a-z0-9-]` is dropped. Never fails.
    pub fn sanitize(raw: &str) -> Self {
        let region = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
            .collect();

        Self(region)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
