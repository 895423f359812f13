/// Engine version a project targets. Treated as a plain value by rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GodotVersion {
    tag: String,
}

impl GodotVersion {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Pick the first feature tag that looks like a version number ("4.2").
    pub fn from_features(features: &[String]) -> Option<Self> {
        features
            .iter()
            .find(|f| {
                let mut parts = f.split('.');
                let major = parts.next().unwrap_or_default();
                !major.is_empty()
                    && major.chars().all(|c| c.is_ascii_digit())
                    && parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            })
            .map(|f| Self::new(f.clone()))
    }
}
