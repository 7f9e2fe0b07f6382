//! Mask recipes and persisted settings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Text shown by a text mask when none is configured.
pub const DEFAULT_MASK_TEXT: &str = "████████";

/// Fill used by the default settings for color masks.
pub const DEFAULT_MASK_COLOR: &str = "#000000";

/// Rendering strategy for a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    /// Centered literal text over an opaque background.
    #[default]
    Text,
    /// Flat fill.
    Color,
    /// Backdrop blur over a translucent fill.
    Blur,
    /// Tiled user-supplied image.
    Image,
    /// Placeholder that impersonates the original element's styling.
    Inherit,
}

impl VisualMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualMode::Text => "text",
            VisualMode::Color => "color",
            VisualMode::Blur => "blur",
            VisualMode::Image => "image",
            VisualMode::Inherit => "inherit",
        }
    }
}

impl fmt::Display for VisualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a mask record applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only on the domain that created the record.
    #[default]
    Current,
    /// On every domain.
    All,
}

/// The visual recipe for a mask.
///
/// Field names follow the persisted camelCase shape so exported files
/// round-trip unchanged. Empty strings in optional fields are read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskSpec {
    /// Rendering strategy.
    #[serde(rename = "maskType", default)]
    pub visual_mode: VisualMode,

    /// Literal text for text and inherit masks.
    #[serde(default = "default_mask_text")]
    pub mask_text: String,

    /// Explicit fill for color masks.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub mask_color: Option<String>,

    /// Image URL or `data:` URL for image masks.
    #[serde(default)]
    pub mask_image: String,

    /// Whether `mask_image` holds locally uploaded data.
    #[serde(default)]
    pub use_local_image: bool,

    /// Text color for text masks.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub text_mask_color: Option<String>,

    /// Font family for text masks.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub text_mask_font: Option<String>,

    /// Font size for text masks; a bare number means pixels.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_number"
    )]
    pub text_mask_size: Option<String>,
}

fn default_mask_text() -> String {
    DEFAULT_MASK_TEXT.to_string()
}

impl Default for MaskSpec {
    fn default() -> Self {
        Self {
            visual_mode: VisualMode::Text,
            mask_text: default_mask_text(),
            mask_color: Some(DEFAULT_MASK_COLOR.to_string()),
            mask_image: String::new(),
            use_local_image: false,
            text_mask_color: None,
            text_mask_font: None,
            text_mask_size: None,
        }
    }
}

impl MaskSpec {
    /// A text mask showing `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            mask_text: text.into(),
            ..Default::default()
        }
    }

    /// A color mask; `None` lets the renderer pick a fill from the page.
    pub fn color(color: Option<&str>) -> Self {
        Self {
            visual_mode: VisualMode::Color,
            mask_color: color.map(str::to_string),
            ..Default::default()
        }
    }

    /// A blur mask.
    pub fn blur() -> Self {
        Self {
            visual_mode: VisualMode::Blur,
            ..Default::default()
        }
    }

    /// An image mask from a URL or `data:` URL.
    pub fn image(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            visual_mode: VisualMode::Image,
            use_local_image: source.starts_with("data:"),
            mask_image: source,
            ..Default::default()
        }
    }

    /// A style-inheriting placeholder.
    pub fn inherit() -> Self {
        Self {
            visual_mode: VisualMode::Inherit,
            ..Default::default()
        }
    }

    /// The configured fill, ignoring blank values.
    pub fn explicit_color(&self) -> Option<&str> {
        non_blank(self.mask_color.as_deref())
    }

    /// The configured image source, ignoring blank values.
    pub fn image_source(&self) -> Option<&str> {
        non_blank(Some(self.mask_image.as_str()))
    }

    /// The text to display, falling back to the default glyph run.
    pub fn display_text(&self) -> &str {
        if self.mask_text.trim().is_empty() {
            DEFAULT_MASK_TEXT
        } else {
            &self.mask_text
        }
    }
}

/// The live recipe together with the scope new records are created with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskSettings {
    #[serde(flatten)]
    pub spec: MaskSpec,

    #[serde(default)]
    pub mask_scope: Scope,
}

impl MaskSettings {
    pub fn new(spec: MaskSpec, mask_scope: Scope) -> Self {
        Self { spec, mask_scope }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    let value = Option::<Raw>::deserialize(deserializer)?;
    Ok(match value {
        Some(Raw::Text(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Raw::Number(n)) => Some(format!("{}", n)),
        _ => None,
    })
}
