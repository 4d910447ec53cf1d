use serde::{Deserialize, Serialize};

/// How vulnerability products are correlated against the registry snapshot,
/// and which records survive into the output.
///
/// Exactly one policy is active per run; the keep rule is paired with the
/// matching rule and the two are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The registry is a list of package objects; a product matches an entry
    /// whose `name` equals the product and whose `author` equals the vendor,
    /// both case-sensitively. Records with at least one match are kept.
    Exact,
    /// The registry maps source links to published package names; a product
    /// matches once per name list containing it, vendor ignored. Records
    /// naming the configured vendor keyword as product or vendor are kept.
    Membership,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Exact => "exact",
            MatchPolicy::Membership => "membership",
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "membership" => Ok(MatchPolicy::Membership),
            _ => Err(format!(
                "Unknown policy: {}. Use 'exact' or 'membership'",
                s
            )),
        }
    }
}
