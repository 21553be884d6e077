use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "Links";
pub const DEFAULT_SUBTITLE: &str = "Our official channels";
pub const DEFAULT_COLUMNS: i64 = 2;
pub const MIN_COLUMNS: i64 = 1;
pub const MAX_COLUMNS: i64 = 3;

/// Name of the single tab a fresh document starts with.
pub const DEFAULT_TAB_NAME: &str = "Main";
/// Name given to tabs created from the admin editor.
pub const NEW_TAB_NAME: &str = "New Tab";
/// Name used whenever a tab name is blank after trimming.
pub const BLANK_TAB_NAME: &str = "Tab";

pub const DEFAULT_ITEM_LABEL: &str = "Link";
pub const DEFAULT_ICON: &str = "🔗";

/// The full persisted page: site metadata plus the ordered list of tabs.
///
/// Unknown top-level keys are kept in [`Document::extra`] so that a
/// load/save cycle never drops data written by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub site: Site,

    /// Display order is the order of this list.
    ///
    /// Will always be non-empty after [`Document::normalized`].
    #[serde(default)]
    pub tabs: Vec<Tab>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            site: Site::default(),
            tabs: vec![Tab::new(DEFAULT_TAB_NAME)],
            extra: Map::new(),
        }
    }
}

impl Document {
    /// Apply the invariants every in-memory document must hold: at least one
    /// tab and a column count within bounds.
    pub fn normalized(mut self) -> Self {
        if self.tabs.is_empty() {
            self.tabs.push(Tab::new(DEFAULT_TAB_NAME));
        }
        self.site.columns = self.site.columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        self
    }

    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(Tab::display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    #[serde(deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(deserialize_with = "string_or_null")]
    pub subtitle: String,
    /// Number of link columns, clamped to `1..=3` on use.
    #[serde(deserialize_with = "lenient_int")]
    pub columns: i64,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl Site {
    pub fn column_count(&self) -> usize {
        // Clamped into 1..=3, so the cast cannot truncate.
        self.columns.clamp(MIN_COLUMNS, MAX_COLUMNS) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tab {
    /// Tab names are not required to be unique, but selection in the admin
    /// editor is only unambiguous if they are.
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,

    #[serde(default)]
    pub items: Vec<Item>,
}

impl Tab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// The name shown in tab strips, falling back to [`BLANK_TAB_NAME`].
    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(BLANK_TAB_NAME)
    }

    /// Trim `name` and store it, substituting [`BLANK_TAB_NAME`] for blank input.
    pub fn rename(&mut self, name: &str) {
        self.name = non_blank(name).unwrap_or(BLANK_TAB_NAME).to_string();
    }
}

/// One link button.
///
/// `icon` and `arquivo` are alternative presentations: an image file at
/// `arquivo` wins over the `icon` glyph whenever it can be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Relative path to an image file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arquivo: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_arquivo(mut self, arquivo: impl Into<String>) -> Self {
        self.arquivo = Some(arquivo.into());
        self
    }

    pub fn display_label(&self) -> &str {
        non_blank(&self.label).unwrap_or(DEFAULT_ITEM_LABEL)
    }

    pub fn target(&self) -> &str {
        self.url.trim()
    }

    pub fn icon_glyph(&self) -> Option<&str> {
        self.icon.as_deref().and_then(non_blank)
    }

    pub fn asset_path(&self) -> Option<&str> {
        self.arquivo.as_deref().and_then(non_blank)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Table editors write `null` for cleared text cells.
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Hand-edited files may carry the column count as a float or a numeric
/// string. Fractions are truncated toward zero.
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Null => Some(DEFAULT_COLUMNS),
        Value::Number(number) => number.as_i64().or_else(|| truncate(number.as_f64())),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| truncate(text.parse::<f64>().ok()))
        }
        _ => None,
    };
    parsed.ok_or_else(|| serde::de::Error::custom(format!("invalid column count: {value}")))
}

fn truncate(value: Option<f64>) -> Option<i64> {
    // `as` saturates, and the result is clamped on use anyway.
    value.filter(|value| value.is_finite()).map(|value| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_document() {
        let doc = Document::default();
        assert_eq!(doc.site.title, DEFAULT_TITLE);
        assert_eq!(doc.site.column_count(), 2);
        assert_eq!(doc.tabs, vec![Tab::new(DEFAULT_TAB_NAME)]);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let doc: Document = serde_json::from_value(json!({})).unwrap();
        assert_eq!(doc.site, Site::default());
        assert!(doc.tabs.is_empty());

        let doc = doc.normalized();
        assert_eq!(doc.tabs.len(), 1);
        assert_eq!(doc.tabs[0].name, DEFAULT_TAB_NAME);
    }

    #[test]
    fn null_text_cells() {
        let item: Item = serde_json::from_value(json!({
            "label": null,
            "url": null,
            "icon": null,
        }))
        .unwrap();
        assert_eq!(item.label, "");
        assert_eq!(item.url, "");
        assert_eq!(item.icon, None);
        assert_eq!(item.display_label(), DEFAULT_ITEM_LABEL);
    }

    #[test]
    fn columns_are_clamped() {
        let mut doc: Document = serde_json::from_value(json!({
            "site": { "title": "t", "subtitle": "s", "columns": 7 },
            "tabs": [{ "name": "A", "items": [] }],
        }))
        .unwrap();
        assert_eq!(doc.site.column_count(), 3);
        assert_eq!(doc.clone().normalized().site.columns, 3);

        doc.site.columns = -4;
        assert_eq!(doc.site.column_count(), 1);
        assert_eq!(doc.normalized().site.columns, 1);
    }

    #[test]
    fn columns_accept_floats_and_numeric_strings() {
        let columns = |value: Value| {
            serde_json::from_value::<Site>(json!({ "columns": value }))
                .map(|site| site.columns)
                .ok()
        };
        assert_eq!(columns(json!(2.0)), Some(2));
        assert_eq!(columns(json!(2.7)), Some(2));
        assert_eq!(columns(json!("3")), Some(3));
        assert_eq!(columns(json!(" 1.0 ")), Some(1));
        assert_eq!(columns(json!(null)), Some(DEFAULT_COLUMNS));
        assert_eq!(columns(json!("many")), None);
        assert_eq!(columns(json!([2])), None);

        let site: Site = serde_json::from_value(json!({ "columns": "9" })).unwrap();
        assert_eq!(site.column_count(), 3);
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let value = json!({
            "site": { "title": "Loja", "subtitle": "Canais", "columns": 2 },
            "tabs": [{
                "name": "Principais",
                "items": [{ "label": "Site", "url": "https://example.com", "color": "gold" }],
            }],
            "theme": { "accent": "#ed9e1f" },
        });
        let doc: Document = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(doc.extra.get("theme"), Some(&json!({ "accent": "#ed9e1f" })));
        assert_eq!(doc.tabs[0].items[0].extra.get("color"), Some(&json!("gold")));
        assert_eq!(serde_json::to_value(&doc).unwrap(), value);
    }

    #[test]
    fn rename_trims_and_falls_back() {
        let mut tab = Tab::new("x");
        tab.rename("  Social  ");
        assert_eq!(tab.name, "Social");
        tab.rename("   ");
        assert_eq!(tab.name, BLANK_TAB_NAME);
    }

    #[test]
    fn item_presentation() {
        let item = Item::new("  Shop ", " https://example.com ")
            .with_icon("  ")
            .with_arquivo(" icons/shop.png ");
        assert_eq!(item.display_label(), "Shop");
        assert_eq!(item.target(), "https://example.com");
        assert_eq!(item.icon_glyph(), None);
        assert_eq!(item.asset_path(), Some("icons/shop.png"));
    }
}
