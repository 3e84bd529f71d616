//! Server tags (`#ef`) and their regions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Region a server is hosted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Europe,
    UsWest,
    UsCentral,
    Oceania,
    Asia,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Europe,
        Region::UsWest,
        Region::UsCentral,
        Region::Oceania,
        Region::Asia,
    ];

    pub fn from_char(c: char) -> Option<Region> {
        match c {
            'e' => Some(Region::Europe),
            'w' => Some(Region::UsWest),
            'c' => Some(Region::UsCentral),
            'a' => Some(Region::Asia),
            'o' => Some(Region::Oceania),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Region::Europe => 'e',
            Region::UsWest => 'w',
            Region::UsCentral => 'c',
            Region::Asia => 'a',
            Region::Oceania => 'o',
        }
    }

    /// Verbose name, e.g. `US West`.
    pub fn name(self) -> &'static str {
        match self {
            Region::Europe => "Europe",
            Region::UsWest => "US West",
            Region::UsCentral => "US Central",
            Region::Oceania => "Oceania",
            Region::Asia => "Asia",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    /// Accepts the verbose name in any case, with or without the space, or
    /// the single region character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let mut chars = folded.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(region) = Region::from_char(c) {
                return Ok(region);
            }
        }
        Region::ALL
            .into_iter()
            .find(|r| r.name().replace(' ', "").to_lowercase() == folded)
            .ok_or_else(|| format!("unknown region '{s}'"))
    }
}

/// A validated server tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    raw: String,
    name: String,
    region_char: char,
    region: Region,
    is_sandbox: bool,
}

impl Server {
    /// Build a server from its raw field text (`#ef`).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.strip_prefix('#').unwrap_or(raw).to_string();
        let Some(region_char) = name.chars().next() else {
            return Err(ValidationError::FieldPattern {
                field: crate::codec::FieldKey::Server,
            });
        };
        let region = Region::from_char(region_char).ok_or_else(|| ValidationError::UnknownRegion {
            server: raw.to_string(),
            region_char,
        })?;
        let is_sandbox = name.chars().count() == 2;

        Ok(Self {
            raw: raw.to_string(),
            name,
            region_char,
            region,
            is_sandbox,
        })
    }

    /// Field text including the leading `#`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Server name without the leading `#`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region_char(&self) -> char {
        self.region_char
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn is_sandbox(&self) -> bool {
        self.is_sandbox
    }

    /// Direct link to the server.
    pub fn link(&self) -> String {
        format!("https://arras.io/#{}", self.name)
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.link())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server() {
        let server = Server::parse("#ef").unwrap();
        assert_eq!(server.name(), "ef");
        assert_eq!(server.raw(), "#ef");
        assert_eq!(server.region(), Region::Europe);
        assert_eq!(server.region_char(), 'e');
        assert!(server.is_sandbox());
        assert_eq!(server.link(), "https://arras.io/#ef");
    }

    #[test]
    fn test_longer_name_is_not_sandbox() {
        let server = Server::parse("#wxyz").unwrap();
        assert_eq!(server.region(), Region::UsWest);
        assert!(!server.is_sandbox());
    }

    #[test]
    fn test_pipe_region_is_unknown() {
        let err = Server::parse("#|a").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownRegion {
                server: "#|a".to_string(),
                region_char: '|',
            }
        );
    }

    #[test]
    fn test_region_from_str() {
        assert_eq!("US West".parse::<Region>().unwrap(), Region::UsWest);
        assert_eq!("uscentral".parse::<Region>().unwrap(), Region::UsCentral);
        assert_eq!("o".parse::<Region>().unwrap(), Region::Oceania);
        assert!("mars".parse::<Region>().is_err());
    }
}
