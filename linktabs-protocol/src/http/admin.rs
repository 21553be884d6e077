use crate::document::Item;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Appearance fields of the admin panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteForm {
    pub title: String,
    pub subtitle: String,
    pub columns: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectTabForm {
    pub tab: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTabForm {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PanelForm {
    pub open: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Row fields are misaligned: {labels} labels, {urls} urls, {icons} icons, {files} files")]
    Misaligned {
        labels: usize,
        urls: usize,
        icons: usize,
        files: usize,
    },
    #[error("Invalid row index to remove: {0}")]
    InvalidRemoveIndex(String),
    #[error("Missing field: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}

/// Fields that belong to the items table.
const TABLE_FIELDS: [&str; 5] = ["label", "url", "icon", "arquivo", "remove"];

/// Any form posted from the admin panel.
///
/// All controls of the panel submit one form, so besides the fields of the
/// chosen action the body carries every edit typed into the panel. `items`
/// is `None` when no field of the items table was posted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub items: Option<ItemsForm>,
    fields: Vec<(String, String)>,
}

impl EditorForm {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let mut table = false;
        let mut fields = Vec::new();

        for (key, value) in form_urlencoded::parse(body) {
            if TABLE_FIELDS.contains(&&*key) {
                table = true;
            } else {
                fields.push((key.into_owned(), value.into_owned()));
            }
        }

        let items = table.then(|| ItemsForm::parse(body)).transpose()?;
        Ok(Self { items, fields })
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn number<T: std::str::FromStr>(&self, field: &'static str) -> Result<Option<T>, FormError> {
        self.value(field)
            .map(|value| {
                value.trim().parse().map_err(|_| FormError::Invalid {
                    field,
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// The appearance fields, present whenever `columns` was posted.
    pub fn site(&self) -> Result<Option<SiteForm>, FormError> {
        Ok(self.number("columns")?.map(|columns| SiteForm {
            title: self.value("title").unwrap_or_default().to_string(),
            subtitle: self.value("subtitle").unwrap_or_default().to_string(),
            columns,
        }))
    }

    pub fn rename_tab(&self) -> Option<RenameTabForm> {
        self.value("name").map(|name| RenameTabForm {
            name: name.to_string(),
        })
    }

    pub fn select_tab(&self) -> Result<SelectTabForm, FormError> {
        let tab = self.number("tab")?.ok_or(FormError::Missing("tab"))?;
        Ok(SelectTabForm { tab })
    }
}

/// The items table of one tab as posted by the admin editor.
///
/// Each row is sent as one `label`, `url`, `icon` and `arquivo` field, in
/// row order. `remove` fields name row indices to drop and `action=add`
/// asks for an empty row to be appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsForm {
    pub rows: Vec<Item>,
    pub remove: Vec<usize>,
    pub add_row: bool,
}

impl ItemsForm {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let mut labels = Vec::new();
        let mut urls = Vec::new();
        let mut icons = Vec::new();
        let mut files = Vec::new();
        let mut remove = Vec::new();
        let mut add_row = false;

        for (key, value) in form_urlencoded::parse(body) {
            match &*key {
                "label" => labels.push(value.into_owned()),
                "url" => urls.push(value.into_owned()),
                "icon" => icons.push(value.into_owned()),
                "arquivo" => files.push(value.into_owned()),
                "remove" => remove.push(
                    value
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| FormError::InvalidRemoveIndex(value.to_string()))?,
                ),
                "action" => add_row |= value == "add",
                _ => {}
            }
        }

        if [urls.len(), icons.len(), files.len()]
            .iter()
            .any(|len| *len != labels.len())
        {
            return Err(FormError::Misaligned {
                labels: labels.len(),
                urls: urls.len(),
                icons: icons.len(),
                files: files.len(),
            });
        }

        let rows = labels
            .into_iter()
            .zip(urls)
            .zip(icons.into_iter().zip(files))
            .map(|((label, url), (icon, arquivo))| Item {
                label,
                url,
                icon: optional(icon),
                arquivo: optional(arquivo),
                ..Default::default()
            })
            .collect();

        Ok(Self {
            rows,
            remove,
            add_row,
        })
    }

    /// Encode the form the way a browser would submit it.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for row in &self.rows {
            serializer
                .append_pair("label", &row.label)
                .append_pair("url", &row.url)
                .append_pair("icon", row.icon.as_deref().unwrap_or_default())
                .append_pair("arquivo", row.arquivo.as_deref().unwrap_or_default());
        }
        for index in &self.remove {
            serializer.append_pair("remove", &index.to_string());
        }
        if self.add_row {
            serializer.append_pair("action", "add");
        }
        serializer.finish()
    }
}

fn optional(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
