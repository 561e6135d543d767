//! Bucket paths: `/key:value/key:value/...`

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

/// One `key:value` step of a bucket path, also the label of the bucket it addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub key: String,
    pub value: String,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

/// Parsed, validated bucket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPath {
    segments: Vec<Segment>,
}

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| Regex::new(r"^([^:/\s]+):([^:/\s]+)$").expect("static regex"))
}

impl BucketPath {
    pub fn parse(path: &str) -> DomainResult<Self> {
        if path.is_empty() {
            return Err(DomainError::EmptyPath);
        }
        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| DomainError::MissingLeadingSlash(path.to_string()))?;

        let mut segments: Vec<Segment> = Vec::new();
        for (position, raw) in rest.split('/').enumerate() {
            if raw.is_empty() {
                return Err(DomainError::EmptySegment {
                    path: path.to_string(),
                    position,
                });
            }
            let caps = segment_regex()
                .captures(raw)
                .ok_or_else(|| DomainError::InvalidSegment {
                    path: path.to_string(),
                    segment: raw.to_string(),
                })?;
            let key = caps[1].to_string();
            if segments.iter().any(|s| s.key == key) {
                return Err(DomainError::RepeatedKey {
                    path: path.to_string(),
                    key,
                });
            }
            segments.push(Segment {
                key,
                value: caps[2].to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for BucketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_nested_path_when_parsing_then_yields_segments_in_order() {
        let path = BucketPath::parse("/opt:second/sub:1").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[0].key, "opt");
        assert_eq!(path.segments()[1].value, "1");
        assert_eq!(path.to_string(), "/opt:second/sub:1");
    }

    #[rstest]
    #[case("", DomainError::EmptyPath)]
    #[case("opt:first", DomainError::MissingLeadingSlash("opt:first".into()))]
    #[case("/", DomainError::EmptySegment { path: "/".into(), position: 0 })]
    #[case("/a:1//b:2", DomainError::EmptySegment { path: "/a:1//b:2".into(), position: 1 })]
    #[case("/a:1/", DomainError::EmptySegment { path: "/a:1/".into(), position: 1 })]
    #[case("/a", DomainError::InvalidSegment { path: "/a".into(), segment: "a".into() })]
    #[case("/a:", DomainError::InvalidSegment { path: "/a:".into(), segment: "a:".into() })]
    #[case("/a:b:c", DomainError::InvalidSegment { path: "/a:b:c".into(), segment: "a:b:c".into() })]
    #[case("/a:1/a:2", DomainError::RepeatedKey { path: "/a:1/a:2".into(), key: "a".into() })]
    fn given_malformed_path_when_parsing_then_errors(
        #[case] input: &str,
        #[case] expected: DomainError,
    ) {
        assert_eq!(BucketPath::parse(input).unwrap_err(), expected);
    }
}
