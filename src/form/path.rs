use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::form::FormError;

/// One step into a form tree: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Field(String),
}

/// Location of a list inside a form, e.g. `["key_phrases", 0, "examples"]`.
///
/// Also parses from its dotted form `key_phrases.0.examples`, both from
/// text and from a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

#[derive(Deserialize)]
#[serde(untagged)]
enum PathRepr {
    Segments(Vec<Segment>),
    Dotted(String),
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PathRepr::deserialize(deserializer)? {
            PathRepr::Segments(segments) => Ok(Self(segments)),
            PathRepr::Dotted(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    pub fn field<S: Into<String>>(mut self, name: S) -> Self {
        self.0.push(Segment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Field(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(FormError::EmptyPath);
        }

        let segments = s
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    return Err(FormError::InvalidSegment(part.to_string()));
                }
                Ok(match part.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Field(part.to_string()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(segments))
    }
}
