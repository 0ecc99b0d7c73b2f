//! Page components - typed content blocks embedded in a page.
//!
//! On the wire a component is a flat object:
//!
//! ```json
//! { "id": "comp-1", "type": "text", "content": "<p>hi</p>",
//!   "position": { "x": 0, "y": 0 }, "size": { "width": "100%", "height": "auto" },
//!   "styles": { "color": "red" } }
//! ```
//!
//! Known `type` values map onto [`ComponentKind`] variants. Anything else is
//! kept verbatim as [`ComponentKind::Unknown`] so pages written by newer
//! clients round-trip unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// The component types the builder knows how to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Text,
    Image,
    Video,
    Layout,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Text => "text",
            ComponentType::Image => "image",
            ComponentType::Video => "video",
            ComponentType::Layout => "layout",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ComponentType::Text),
            "image" => Ok(ComponentType::Image),
            "video" => Ok(ComponentType::Video),
            "layout" => Ok(ComponentType::Layout),
            other => Err(format!("unknown component type: {other}")),
        }
    }
}

/// Variant-specific payload of a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Text { html: String },
    Image { url: String },
    Video { url: String },
    Layout,
    /// A type this build does not know. Stored and returned as submitted.
    Unknown { type_name: String, content: String },
}

impl ComponentKind {
    pub fn new(component_type: ComponentType, content: String) -> Self {
        match component_type {
            ComponentType::Text => ComponentKind::Text { html: content },
            ComponentType::Image => ComponentKind::Image { url: content },
            ComponentType::Video => ComponentKind::Video { url: content },
            ComponentType::Layout => ComponentKind::Layout,
        }
    }

    fn from_wire(type_name: String, content: String) -> Self {
        match type_name.parse::<ComponentType>() {
            Ok(component_type) => Self::new(component_type, content),
            Err(_) => ComponentKind::Unknown { type_name, content },
        }
    }

    /// The known type, or `None` for [`ComponentKind::Unknown`].
    pub fn component_type(&self) -> Option<ComponentType> {
        match self {
            ComponentKind::Text { .. } => Some(ComponentType::Text),
            ComponentKind::Image { .. } => Some(ComponentType::Image),
            ComponentKind::Video { .. } => Some(ComponentType::Video),
            ComponentKind::Layout => Some(ComponentType::Layout),
            ComponentKind::Unknown { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ComponentKind::Unknown { type_name, .. } => type_name,
            known => known.component_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ComponentKind::Text { html } => html,
            ComponentKind::Image { url } | ComponentKind::Video { url } => url,
            ComponentKind::Layout => "",
            ComponentKind::Unknown { content, .. } => content,
        }
    }

    /// Replace the content payload. Layout components carry none, so this is
    /// a no-op for them.
    pub fn set_content(&mut self, content: String) {
        match self {
            ComponentKind::Text { html } => *html = content,
            ComponentKind::Image { url } | ComponentKind::Video { url } => *url = content,
            ComponentKind::Layout => {}
            ComponentKind::Unknown { content: existing, .. } => *existing = content,
        }
    }
}

/// Initial placement offsets. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: String,
    pub height: String,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "auto".to_string(),
        }
    }
}

/// Style properties a component may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProperty {
    Color,
    BackgroundColor,
    FontSize,
    FontWeight,
    FontFamily,
    TextAlign,
    Padding,
    Margin,
    Border,
    BorderRadius,
    Width,
    Height,
    MaxWidth,
    MinHeight,
}

impl StyleProperty {
    /// CSS property name, e.g. `background-color`.
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::Color => "color",
            StyleProperty::BackgroundColor => "background-color",
            StyleProperty::FontSize => "font-size",
            StyleProperty::FontWeight => "font-weight",
            StyleProperty::FontFamily => "font-family",
            StyleProperty::TextAlign => "text-align",
            StyleProperty::Padding => "padding",
            StyleProperty::Margin => "margin",
            StyleProperty::Border => "border",
            StyleProperty::BorderRadius => "border-radius",
            StyleProperty::Width => "width",
            StyleProperty::Height => "height",
            StyleProperty::MaxWidth => "max-width",
            StyleProperty::MinHeight => "min-height",
        }
    }
}

/// Style overrides keyed by [`StyleProperty`].
///
/// Deserialization is lenient: unknown keys and values that are not strings
/// or numbers are dropped instead of rejecting the component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<StyleProperty, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: StyleProperty, value: impl Into<String>) {
        self.0.insert(property, value.into());
    }

    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        self.0.get(&property).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Inline CSS declaration list, e.g. `color: red; padding: 4px`.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(property, value)| format!("{}: {}", property.css_name(), value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
        let mut styles = StyleMap::new();

        for (key, value) in raw.unwrap_or_default() {
            let Ok(property) =
                serde_json::from_value::<StyleProperty>(serde_json::Value::String(key))
            else {
                continue;
            };
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                _ => continue,
            };
            styles.set(property, value);
        }

        Ok(styles)
    }
}

/// A content block inside a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawComponent", into = "RawComponent")]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    pub position: Position,
    pub size: Size,
    pub styles: StyleMap,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            size: Size::default(),
            styles: StyleMap::default(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }
}

/// Flat wire shape. Every field is optional so partially filled objects
/// still load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawComponent {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
    position: Option<Position>,
    size: Option<Size>,
    styles: Option<StyleMap>,
}

impl From<RawComponent> for Component {
    fn from(raw: RawComponent) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            kind: ComponentKind::from_wire(
                raw.kind.unwrap_or_default(),
                raw.content.unwrap_or_default(),
            ),
            position: raw.position.unwrap_or_default(),
            size: raw.size.unwrap_or_default(),
            styles: raw.styles.unwrap_or_default(),
        }
    }
}

impl From<Component> for RawComponent {
    fn from(component: Component) -> Self {
        Self {
            id: Some(component.id),
            kind: Some(component.kind.type_name().to_string()),
            content: Some(component.kind.content().to_string()),
            position: Some(component.position),
            size: Some(component.size),
            styles: Some(component.styles),
        }
    }
}

/// Load a stored component array, skipping entries that are not component
/// objects. Anything other than an array yields an empty list.
pub fn components_from_json(value: serde_json::Value) -> Vec<Component> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
