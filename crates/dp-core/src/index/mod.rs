//! Documentation index delivered by the host
//!
//! The index describes the full navigable symbol tree, grouped by interface
//! language, plus a table of references. Language groups keep the order in
//! which the host sent them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a navigator entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Overview,
    Article,
    SampleCode,
    Method,
    Project,
    Init,
    Protocol,
    Property,
    Struct,
    Module,
    Extension,
    Enum,
    Case,
    Op,
    Symbol,
    /// Non-navigable separator between sections
    GroupMarker,
    /// Any kind this crate does not know about, kept verbatim
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Overview => "overview",
            NodeKind::Article => "article",
            NodeKind::SampleCode => "sampleCode",
            NodeKind::Method => "method",
            NodeKind::Project => "project",
            NodeKind::Init => "init",
            NodeKind::Protocol => "protocol",
            NodeKind::Property => "property",
            NodeKind::Struct => "struct",
            NodeKind::Module => "module",
            NodeKind::Extension => "extension",
            NodeKind::Enum => "enum",
            NodeKind::Case => "case",
            NodeKind::Op => "op",
            NodeKind::Symbol => "symbol",
            NodeKind::GroupMarker => "groupMarker",
            NodeKind::Other(kind) => kind,
        }
    }

    pub fn is_group_marker(&self) -> bool {
        matches!(self, NodeKind::GroupMarker)
    }
}

impl From<String> for NodeKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "overview" => NodeKind::Overview,
            "article" => NodeKind::Article,
            "sampleCode" => NodeKind::SampleCode,
            "method" => NodeKind::Method,
            "project" => NodeKind::Project,
            "init" => NodeKind::Init,
            "protocol" => NodeKind::Protocol,
            "property" => NodeKind::Property,
            "struct" => NodeKind::Struct,
            "module" => NodeKind::Module,
            "extension" => NodeKind::Extension,
            "enum" => NodeKind::Enum,
            "case" => NodeKind::Case,
            "op" => NodeKind::Op,
            "symbol" => NodeKind::Symbol,
            "groupMarker" => NodeKind::GroupMarker,
            _ => NodeKind::Other(kind),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the symbol tree as sent by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexElement {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    pub title: String,

    /// Route of the page; absent for group markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IndexElement>,
}

impl IndexElement {
    pub fn new(kind: NodeKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            path: None,
            icon: None,
            deprecated: None,
            children: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_children(mut self, children: Vec<IndexElement>) -> Self {
        self.children = children;
        self
    }
}

/// Version of the index format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Entry of the reference table; fields beyond `type` are kept as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Reference {
    /// Decode this reference as an image, if it is one
    pub fn as_image(&self) -> Option<ImageReference> {
        if self.kind != "image" {
            return None;
        }
        serde_json::from_value(Value::Object(self.fields.clone())).ok()
    }
}

/// Typed view of a `type: "image"` reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub identifier: String,
    pub alt: String,
    #[serde(default)]
    pub variants: Vec<ImageVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVariant {
    #[serde(default)]
    pub traits: Vec<String>,
    pub url: String,
}

/// The full index: schema, archives, per-language trees and references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationIndex {
    #[serde(default)]
    pub schema_version: SchemaVersion,

    #[serde(default)]
    pub included_archive_identifiers: Vec<String>,

    #[serde(default)]
    pub interface_languages: IndexMap<String, Vec<IndexElement>>,

    #[serde(default)]
    pub references: IndexMap<String, Reference>,
}

impl DocumentationIndex {
    /// Single-language index, mostly useful for tests and tools
    pub fn with_language(language: impl Into<String>, elements: Vec<IndexElement>) -> Self {
        let mut interface_languages = IndexMap::new();
        interface_languages.insert(language.into(), elements);
        Self {
            interface_languages,
            ..Self::default()
        }
    }

    /// Top-level elements of every language group, concatenated in order
    pub fn root_elements(&self) -> impl Iterator<Item = &IndexElement> {
        self.interface_languages.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_kind_survives_round_trip() {
        let element: IndexElement = serde_json::from_value(json!({
            "type": "typealias",
            "title": "Alias",
            "path": "/alias"
        }))
        .unwrap();

        assert_eq!(element.kind, NodeKind::Other("typealias".to_string()));
        assert_eq!(serde_json::to_value(&element).unwrap()["type"], "typealias");
    }

    #[test]
    fn test_language_groups_keep_host_order() {
        let index: DocumentationIndex = serde_json::from_value(json!({
            "schemaVersion": { "major": 0, "minor": 1, "patch": 0 },
            "includedArchiveIdentifiers": ["Kit"],
            "interfaceLanguages": {
                "swift": [{ "type": "module", "title": "Kit", "path": "/documentation/kit" }],
                "occ": [{ "type": "module", "title": "KitObjC", "path": "/documentation/kitobjc" }]
            },
            "references": {}
        }))
        .unwrap();

        let titles: Vec<_> = index.root_elements().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Kit", "KitObjC"]);
        let languages: Vec<_> = index.interface_languages.keys().collect();
        assert_eq!(languages, vec!["swift", "occ"]);
    }

    #[test]
    fn test_image_reference_decoding() {
        let reference: Reference = serde_json::from_value(json!({
            "type": "image",
            "identifier": "logo.png",
            "alt": "Logo",
            "variants": [{ "traits": ["1x", "light"], "url": "/images/logo.png" }]
        }))
        .unwrap();

        let image = reference.as_image().unwrap();
        assert_eq!(image.identifier, "logo.png");
        assert_eq!(image.variants[0].url, "/images/logo.png");

        let topic: Reference =
            serde_json::from_value(json!({ "type": "topic", "title": "Foo" })).unwrap();
        assert!(topic.as_image().is_none());
        assert_eq!(topic.fields["title"], "Foo");
    }
}
