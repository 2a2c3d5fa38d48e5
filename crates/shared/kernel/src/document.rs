//! Reading directive documents.
//!
//! A document is parsed into a [`Value`] tree once, before dispatch. The parser
//! is chosen from the file extension; YAML is the default because JSON is a
//! subset of it.

use crate::error::{KernelError, KernelErrorExt};
use cradle_domain::{Scalar, Value};
use std::fmt::Debug;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A parser for one document syntax.
pub trait DocumentFormat: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Parses `bytes` into a value tree.
    ///
    /// # Errors
    /// A malformed-document error specific to the syntax.
    fn parse(&self, bytes: &[u8]) -> Result<Value, KernelError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl DocumentFormat for Yaml {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Value, KernelError> {
        Ok(serde_yaml::from_slice(bytes)?)
    }
}

impl DocumentFormat for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Value, KernelError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Supported syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// `.json` selects JSON; anything else is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    #[must_use]
    pub fn parser(self) -> &'static dyn DocumentFormat {
        match self {
            Self::Yaml => &Yaml,
            Self::Json => &Json,
        }
    }
}

/// A parsed document together with where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    source: Option<PathBuf>,
    format: Format,
    root: Value,
}

impl Document {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// [`KernelError::Io`] when the file cannot be read, or a malformed-document
    /// error. Errors carry the path as context.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let path = path.as_ref();
        let format = Format::from_path(path);
        let bytes = read(path)?;
        let root = parse(format, &bytes).context(path.display().to_string())?;

        debug!(path = %path.display(), format = format.parser().name(), "Document loaded");
        Ok(Self { source: Some(path.to_path_buf()), format, root })
    }

    /// Parses an in-memory document.
    ///
    /// # Errors
    /// A malformed-document error.
    pub fn parse_str(text: &str, format: Format) -> Result<Self, KernelError> {
        Ok(Self { source: None, format, root: parse(format, text.as_bytes())? })
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Value {
        self.root
    }
}

/// An empty or comment-only document is an empty mapping.
fn parse(format: Format, bytes: &[u8]) -> Result<Value, KernelError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::empty());
    }
    match format.parser().parse(bytes)? {
        Value::Scalar(Scalar::Null) => Ok(Value::empty()),
        root => Ok(root),
    }
}

fn read(path: &Path) -> Result<Vec<u8>, KernelError> {
    let context = || format!("Failed to read {}", path.display());
    let mut file = File::open(path).context(context())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).context(context())?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_domain::ValueKind;

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("conf/cradle.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("conf/cradle.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("conf/cradle.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("cradle")), Format::Yaml);
    }

    #[test]
    fn empty_documents_are_empty_mappings() {
        for text in ["", "   \n", "# only a comment\n"] {
            let doc = Document::parse_str(text, Format::Yaml).unwrap();
            assert_eq!(doc.root(), &Value::empty(), "{text:?}");
        }
    }

    #[test]
    fn yaml_and_json_agree() {
        let yaml = Document::parse_str("enabled: true\nworkers: 4\n", Format::Yaml).unwrap();
        let json = Document::parse_str(r#"{"enabled": true, "workers": 4}"#, Format::Json).unwrap();
        assert_eq!(yaml.root(), json.root());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let err = Document::parse_str("enabled: [", Format::Yaml).unwrap_err();
        assert!(matches!(err, KernelError::MalformedDocument { .. }));
        let err = Document::parse_str("{", Format::Json).unwrap_err();
        assert!(matches!(err, KernelError::MalformedJson { .. }));
    }

    #[test]
    fn non_string_keys_are_rejected() {
        assert!(Document::parse_str("? [a, b]\n: true\n", Format::Yaml).is_err());
        assert!(Document::parse_str("enabled: 1\nenabled: 2\n", Format::Yaml).is_err());
    }

    #[test]
    fn numeric_and_boolean_keys_are_rejected() {
        for text in ["1: x\n", "true: y\n", "0.5: z\n", "~: w\n"] {
            let err = Document::parse_str(text, Format::Yaml).unwrap_err();
            assert!(matches!(err, KernelError::MalformedDocument { .. }), "{text:?}: {err}");
        }
    }

    #[test]
    fn quoted_keys_are_directive_names() {
        let doc = Document::parse_str("\"1\": x\n'true': y\n", Format::Yaml).unwrap();
        let map = doc.root().as_mapping().unwrap();
        assert_eq!(map["1"].as_str(), Some("x"));
        assert_eq!(map["true"].as_str(), Some("y"));
    }

    #[test]
    fn scalars_keep_their_kind() {
        let doc = Document::parse_str("name: \"true\"\nflag: true\n", Format::Yaml).unwrap();
        let map = doc.root().as_mapping().unwrap();
        assert_eq!(map["name"].kind(), ValueKind::String);
        assert_eq!(map["flag"].kind(), ValueKind::Bool);
    }
}
