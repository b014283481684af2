//! Serde models for the JSON documents stored in a Zarr hierarchy.
//!
//! Only the fields the resolver needs are modelled; unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Map a present field to `Some`, keeping an explicit `null`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// =============================================================================
// Root Attributes (.zattrs)
// =============================================================================

/// Root attributes of an OME group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootAttributes {
    /// Rendering metadata (channels, display windows). Kept verbatim.
    ///
    /// `Some` whenever the key is present, even with a `null` value.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub omero: Option<Value>,

    /// Multiscale image descriptions; the first entry is the one served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiscales: Option<Vec<Multiscale>>,
}

impl RootAttributes {
    /// Dataset paths of the first multiscale entry, in declared order.
    ///
    /// Returns `None` when there is no `multiscales` field at all, and an
    /// empty vector when the field is present but names no datasets.
    pub fn dataset_paths(&self) -> Option<Vec<String>> {
        let multiscales = self.multiscales.as_ref()?;
        Some(
            multiscales
                .first()
                .map(|m| m.datasets.iter().map(|d| d.path.clone()).collect())
                .unwrap_or_default(),
        )
    }

    /// Whether a `multiscales` listing is present but names no datasets.
    pub fn has_empty_multiscales(&self) -> bool {
        matches!(self.dataset_paths(), Some(paths) if paths.is_empty())
    }
}

/// One multiscale image: an ordered list of resolution levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Multiscale {
    /// Resolution levels, highest resolution first.
    #[serde(default)]
    pub datasets: Vec<Dataset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A single resolution level within a multiscale image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Array path relative to the group root.
    pub path: String,
}

/// Root attributes of a plain array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainArrayAttributes {
    /// One entry per array axis, in axis order.
    pub dimensions: Vec<Dimension>,
}

/// A named array axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub field: String,
}

impl Dimension {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

// =============================================================================
// Rendering Metadata (omero)
// =============================================================================

/// Rendering metadata from the `omero` field of an OME group.
///
/// The original JSON object is preserved as-is so consumers can read fields
/// this crate does not model; [`RenderingMetadata::channels`] gives typed
/// access to the common ones.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingMetadata(Value);

impl RenderingMetadata {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw `omero` object.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consume and return the raw `omero` object.
    pub fn into_json(self) -> Value {
        self.0
    }

    /// Image name, if present.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Channel definitions. Entries that do not parse as a channel are skipped.
    pub fn channels(&self) -> Vec<Channel> {
        self.0
            .get("channels")
            .and_then(Value::as_array)
            .map(|channels| {
                channels
                    .iter()
                    .filter_map(|c| serde_json::from_value(c.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One channel of OME rendering metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub label: Option<String>,

    /// Hex RGB color, e.g. `"FF0000"`.
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub active: Option<bool>,

    /// Display intensity range.
    #[serde(default)]
    pub window: Option<Window>,
}

/// Display intensity window of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

// =============================================================================
// Tests
// =============================================================================
