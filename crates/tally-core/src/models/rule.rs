//! Coding rules and issue severities.

use std::fmt;
use std::str::FromStr;

/// Rule reference as carried by a measure: repository + key, no storage id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleRef {
    pub repository: String,
    pub key: String,
}

impl RuleRef {
    pub fn new(repository: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.key)
    }
}

/// A rule resolved against the rule store.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: i64,
    pub repository: String,
    pub key: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
            Self::Blocker => "BLOCKER",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Self::Info),
            "MINOR" => Ok(Self::Minor),
            "MAJOR" => Ok(Self::Major),
            "CRITICAL" => Ok(Self::Critical),
            "BLOCKER" => Ok(Self::Blocker),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_round_trips_through_str() {
        for s in [
            Severity::Info,
            Severity::Minor,
            Severity::Major,
            Severity::Critical,
            Severity::Blocker,
        ] {
            assert_eq!(s.as_str().parse::<Severity>(), Ok(s));
        }
        assert!("TRIVIAL".parse::<Severity>().is_err());
    }
}
