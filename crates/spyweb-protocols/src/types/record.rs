//! Persisted mask records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::spec::{MaskSpec, Scope};

/// Rendering-relevant classification of a mask target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Image,
    Video,
    Input,
    SvgOrIcon,
    Generic,
}

/// Classification flags captured when a record is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetKind {
    #[serde(default)]
    pub is_input: bool,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_svg_or_icon: bool,
}

impl TargetKind {
    /// Collapse the flags back to a single kind.
    pub fn element_kind(&self) -> ElementKind {
        if self.is_image {
            ElementKind::Image
        } else if self.is_video {
            ElementKind::Video
        } else if self.is_input {
            ElementKind::Input
        } else if self.is_svg_or_icon {
            ElementKind::SvgOrIcon
        } else {
            ElementKind::Generic
        }
    }
}

impl From<ElementKind> for TargetKind {
    fn from(kind: ElementKind) -> Self {
        Self {
            is_input: kind == ElementKind::Input,
            is_image: kind == ElementKind::Image,
            is_video: kind == ElementKind::Video,
            is_svg_or_icon: kind == ElementKind::SvgOrIcon,
        }
    }
}

/// Font, color and box properties of an element, captured for inherit masks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSnapshot {
    #[serde(default)]
    pub font_family: String,
    #[serde(default)]
    pub font_size: String,
    #[serde(default)]
    pub font_weight: String,
    #[serde(default)]
    pub font_style: String,
    #[serde(default)]
    pub line_height: String,
    #[serde(default)]
    pub letter_spacing: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub padding: String,
    #[serde(default)]
    pub text_align: String,
    #[serde(default)]
    pub border_radius: String,
}

/// One masking decision.
///
/// `mask_spec` is a copy of the settings at creation or update time; later
/// settings changes do not alter it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskRecord {
    /// Locator synthesized for the target element.
    pub selector: String,

    /// Hostname the record was created under.
    pub domain: String,

    /// Visual recipe snapshot.
    #[serde(rename = "settings")]
    pub mask_spec: MaskSpec,

    /// Creation timestamp, persisted as epoch milliseconds.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// Classification flags.
    #[serde(flatten)]
    pub target_kind: TargetKind,

    /// Where the record applies.
    #[serde(default)]
    pub scope: Scope,

    /// Captured style for inherit masks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_style: Option<StyleSnapshot>,
}

/// Current time truncated to the persisted millisecond precision.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

impl MaskRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        selector: impl Into<String>,
        domain: impl Into<String>,
        mask_spec: MaskSpec,
        kind: ElementKind,
        scope: Scope,
    ) -> Self {
        Self {
            selector: selector.into(),
            domain: domain.into(),
            mask_spec,
            created_at: now_millis(),
            target_kind: kind.into(),
            scope,
            original_style: None,
        }
    }

    /// Attach a captured style snapshot.
    pub fn with_original_style(mut self, style: StyleSnapshot) -> Self {
        self.original_style = Some(style);
        self
    }

    /// The rendering kind recorded at creation.
    pub fn element_kind(&self) -> ElementKind {
        self.target_kind.element_kind()
    }

    /// Whether this record should be applied on `domain`.
    pub fn applies_to(&self, domain: &str) -> bool {
        self.scope == Scope::All || self.domain == domain
    }
}
