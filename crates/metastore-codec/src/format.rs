use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::CodecError;

/// Supported encodings of a store snapshot.
///
/// All formats carry the same document and satisfy the same round-trip
/// law; converting between two of them always goes through the in-memory
/// model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Primary, human-readable format.
    #[default]
    Json,
    /// Alternate human-readable format with one table per identifier.
    Toml,
    /// Compact framed bincode.
    Binary,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Toml, Format::Binary];

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Binary => "bin",
        }
    }

    /// HTTP content type for bodies in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Toml => "application/toml",
            Self::Binary => "application/octet-stream",
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_extension(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "bin" | "binary" => Ok(Self::Binary),
            _ => Err(CodecError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("TOML".parse::<Format>().unwrap(), Format::Toml);
        assert_eq!("bin".parse::<Format>().unwrap(), Format::Binary);
        assert_eq!("binary".parse::<Format>().unwrap(), Format::Binary);
        assert!(matches!(
            "xml".parse::<Format>(),
            Err(CodecError::UnknownFormat(_))
        ));
    }

    #[test]
    fn display_parses_back() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn extensions() {
        assert_eq!(Format::from_extension("snap.json"), Some(Format::Json));
        assert_eq!(Format::from_extension("/tmp/a.toml"), Some(Format::Toml));
        assert_eq!(Format::from_extension("a.bin"), Some(Format::Binary));
        assert_eq!(Format::from_extension("a.txt"), None);
        assert_eq!(Format::from_extension("noext"), None);
    }

    #[test]
    fn content_types() {
        assert_eq!(Format::Json.content_type(), "application/json");
        assert_eq!(Format::Binary.content_type(), "application/octet-stream");
        assert_eq!(Format::Toml.content_type(), "application/toml");
    }
}
