use std::fmt;

/// Security clearance levels, lowest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clearance {
    #[default]
    Public,
    Confidential,
    Restricted,
    TopSecret,
}

impl Clearance {
    pub const ALL: [Clearance; 4] = [
        Clearance::Public,
        Clearance::Confidential,
        Clearance::Restricted,
        Clearance::TopSecret,
    ];

    /// Map a tag string to its level.
    ///
    /// Unknown tags resolve to `Public`. This applies to document tags and
    /// requester clearances alike, so an unrecognized document tag is visible
    /// to every requester.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Public" => Self::Public,
            "Confidential" => Self::Confidential,
            "Restricted" => Self::Restricted,
            "Top Secret" => Self::TopSecret,
            _ => Self::Public,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Confidential => "Confidential",
            Self::Restricted => "Restricted",
            Self::TopSecret => "Top Secret",
        }
    }

    /// Whether a requester at this level may see a document tagged `document_tag`
    pub fn admits(self, document_tag: &str) -> bool {
        Self::from_tag(document_tag) <= self
    }
}

impl fmt::Display for Clearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals() {
        let ordinals: Vec<u8> = Clearance::ALL.iter().map(|c| c.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tag_round_trip() {
        for level in Clearance::ALL {
            assert_eq!(Clearance::from_tag(level.as_str()), level);
        }
    }

    #[test]
    fn test_unknown_tag_is_public() {
        assert_eq!(Clearance::from_tag("Cosmic"), Clearance::Public);
        assert_eq!(Clearance::from_tag("top secret"), Clearance::Public);
        assert_eq!(Clearance::from_tag(""), Clearance::Public);
        assert_eq!(Clearance::default(), Clearance::from_tag("Cosmic"));
    }

    #[test]
    fn test_admission_matrix() {
        for requester in Clearance::ALL {
            for document in Clearance::ALL {
                assert_eq!(
                    requester.admits(document.as_str()),
                    requester.ordinal() >= document.ordinal(),
                    "requester={requester} document={document}"
                );
            }
        }
    }

    #[test]
    fn test_confidential_requester() {
        let requester = Clearance::from_tag("Confidential");
        assert!(requester.admits("Public"));
        assert!(requester.admits("Confidential"));
        assert!(!requester.admits("Restricted"));
        assert!(!requester.admits("Top Secret"));
    }

    #[test]
    fn test_unknown_document_tag_always_admitted() {
        assert!(Clearance::Public.admits("Unclassified-ish"));
    }
}
