//! Post category enumeration.

/// What the author of a post is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostCategory {
    /// The author is looking for a band.
    Band,
    /// The author is looking for a musician.
    Musician,
}

impl PostCategory {
    /// Map a stored type tag to a category. Only `"band"` is a band;
    /// every other tag, including a missing one, reads as a musician.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("band") => Self::Band,
            _ => Self::Musician,
        }
    }

    /// Localized label used in notification text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Band => "banda",
            Self::Musician => "músico",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(PostCategory::from_tag(Some("band")), PostCategory::Band);
        assert_eq!(PostCategory::from_tag(Some("musician")), PostCategory::Musician);
        assert_eq!(PostCategory::from_tag(Some("dj")), PostCategory::Musician);
        assert_eq!(PostCategory::from_tag(None), PostCategory::Musician);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PostCategory::Band.label(), "banda");
        assert_eq!(PostCategory::Musician.label(), "músico");
    }
}
