use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller override deciding whether a remote fetch happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStrategy {
    /// Refresh only when the cache has expired.
    #[default]
    Auto,
    Force,
    Prevent,
}

impl RefreshStrategy {
    pub fn should_refresh(&self, expired: bool) -> bool {
        match self {
            Self::Auto => expired,
            Self::Force => true,
            Self::Prevent => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Force => "force",
            Self::Prevent => "prevent",
        }
    }
}

impl fmt::Display for RefreshStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RefreshStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "force" => Ok(Self::Force),
            "prevent" => Ok(Self::Prevent),
            other => Err(format!(
                "invalid refresh strategy {other:?} (expected auto, force or prevent)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_refresh_table() {
        assert!(RefreshStrategy::Auto.should_refresh(true));
        assert!(!RefreshStrategy::Auto.should_refresh(false));
        assert!(RefreshStrategy::Force.should_refresh(false));
        assert!(RefreshStrategy::Force.should_refresh(true));
        assert!(!RefreshStrategy::Prevent.should_refresh(true));
        assert!(!RefreshStrategy::Prevent.should_refresh(false));
    }

    #[test]
    fn test_parse() {
        assert_eq!("force".parse::<RefreshStrategy>(), Ok(RefreshStrategy::Force));
        assert_eq!(RefreshStrategy::Prevent.to_string(), "prevent");
        assert!("sometimes".parse::<RefreshStrategy>().is_err());
    }
}
