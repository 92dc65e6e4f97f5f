//! Object store locations of the form `<scheme>://<bucket>/<key...>`.

use crate::io::cloud::{CloudIOError, CloudResult, ErrorKind};
use std::fmt;
use std::str::FromStr;

/// A parsed source or destination location.
///
/// The scheme is kept for display only; which backend serves the bucket is decided by
/// the [`ObjectIO`](crate::io::cloud::ObjectIO) handle the job is given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    scheme: String,
    bucket: String,
    key: String,
}

impl ObjectLocation {
    /// Parse and validate a location string.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidInput`] error if:
    /// - there is no `://` separator or the scheme is empty
    /// - the bucket is empty
    /// - the key is empty or ends with `/`
    /// - the key's last segment is `.` or `..`
    pub fn parse(uri: &str) -> CloudResult<Self> {
        let invalid = |why: &str| {
            CloudIOError::new(
                ErrorKind::InvalidInput,
                format!("invalid object location {uri:?}: {why}"),
            )
        };

        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| invalid("expected <scheme>://<bucket>/<key>"))?;
        if scheme.is_empty() {
            return Err(invalid("missing scheme"));
        }
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(invalid("missing bucket"));
        }
        if key.is_empty() {
            return Err(invalid("missing key"));
        }
        if key.ends_with('/') {
            return Err(invalid("key names a directory, not an object"));
        }
        let last = key.rsplit('/').next().unwrap_or(key);
        if last == "." || last == ".." {
            return Err(invalid("key must end in a file name"));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Final path segment of the key.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

impl FromStr for ObjectLocation {
    type Err = CloudIOError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_key() {
        let loc = ObjectLocation::parse("s3://in-bucket/raw/2024/data.csv").unwrap();
        assert_eq!(loc.scheme(), "s3");
        assert_eq!(loc.bucket(), "in-bucket");
        assert_eq!(loc.key(), "raw/2024/data.csv");
        assert_eq!(loc.file_name(), "data.csv");
        assert_eq!(loc.to_string(), "s3://in-bucket/raw/2024/data.csv");
    }

    #[test]
    fn top_level_key() {
        let loc: ObjectLocation = "s3a://b/data.json".parse().unwrap();
        assert_eq!(loc.key(), "data.json");
        assert_eq!(loc.file_name(), "data.json");
    }

    #[test]
    fn rejects_malformed_locations() {
        for uri in [
            "in-bucket/data.csv",
            "://in-bucket/data.csv",
            "s3:///data.csv",
            "s3://in-bucket",
            "s3://in-bucket/",
            "s3://in-bucket/dir/",
            "s3://in-bucket/dir/..",
        ] {
            let err = ObjectLocation::parse(uri).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "{uri}");
        }
    }
}
