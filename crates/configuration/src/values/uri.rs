use std::convert::Infallible;
use std::str::FromStr;

/// Connection string for the PostgreSQL database.
///
/// It carries credentials, so it never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionUri(String);

impl ConnectionUri {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ConnectionUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConnectionUri(<redacted>)")
    }
}

impl FromStr for ConnectionUri {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(value.to_string()))
    }
}

impl From<String> for ConnectionUri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ConnectionUri {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
