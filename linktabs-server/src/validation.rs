use crate::assets::AssetResolver;
use linktabs_protocol::{Document, Item, is_valid_url};
use std::fmt;

const UNTITLED: &str = "(untitled)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `position` is 1-based, as shown to the admin.
    #[error("Tab {position} has no name")]
    EmptyTabName { position: usize },
    #[error("Invalid URL in \"{label}\" ({tab}): {url}")]
    InvalidUrl {
        tab: String,
        label: String,
        url: String,
    },
    #[error("Image file not found for \"{label}\" ({tab}): {path}")]
    AssetMissing {
        tab: String,
        label: String,
        path: String,
    },
}

/// Every problem found in one pass over the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fix before saving:")?;
        for error in &self.0 {
            write!(f, "\n- {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the whole document, not just the tab being edited: every tab
/// named, every non-empty URL valid, every referenced image present.
pub fn validate(document: &Document, assets: &AssetResolver) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (index, tab) in document.tabs.iter().enumerate() {
        if tab.name.trim().is_empty() {
            errors.push(ValidationError::EmptyTabName {
                position: index + 1,
            });
        }

        for item in &tab.items {
            let url = item.target();
            if !url.is_empty() && !is_valid_url(url) {
                errors.push(ValidationError::InvalidUrl {
                    tab: tab.display_name().to_string(),
                    label: label_of(item),
                    url: url.to_string(),
                });
            }

            if let Some(path) = item.asset_path()
                && !assets.exists(path)
            {
                errors.push(ValidationError::AssetMissing {
                    tab: tab.display_name().to_string(),
                    label: label_of(item),
                    path: path.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn label_of(item: &Item) -> String {
    let label = item.label.trim();
    let label = if label.is_empty() { UNTITLED } else { label };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linktabs_protocol::Tab;
    use pretty_assertions::assert_eq;

    fn document(tabs: Vec<Tab>) -> Document {
        Document {
            tabs,
            ..Default::default()
        }
    }

    fn tab(name: &str, items: Vec<Item>) -> Tab {
        Tab {
            name: name.to_string(),
            items,
        }
    }

    #[test]
    fn valid_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shop.png"), "x").unwrap();
        let assets = AssetResolver::new(dir.path());

        let doc = document(vec![tab(
            "Main",
            vec![
                Item::new("Site", "https://example.com"),
                Item::new("Shop", " http://shop.example ").with_arquivo("shop.png"),
                Item::new("Draft row", ""),
            ],
        )]);
        assert_eq!(validate(&doc, &assets), Ok(()));
    }

    #[test]
    fn reports_every_failure_across_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetResolver::new(dir.path());

        let doc = document(vec![
            tab("Main", vec![Item::new("FTP", "ftp://x")]),
            tab(
                "  ",
                vec![Item::new("", "https://ok.example").with_arquivo("missing.png")],
            ),
        ]);

        let errors = validate(&doc, &assets).unwrap_err();
        assert_eq!(
            errors.0,
            vec![
                ValidationError::InvalidUrl {
                    tab: "Main".to_string(),
                    label: "FTP".to_string(),
                    url: "ftp://x".to_string(),
                },
                ValidationError::EmptyTabName { position: 2 },
                ValidationError::AssetMissing {
                    tab: "Tab".to_string(),
                    label: UNTITLED.to_string(),
                    path: "missing.png".to_string(),
                },
            ]
        );
    }

    #[test]
    fn combined_message() {
        let errors = ValidationErrors(vec![
            ValidationError::EmptyTabName { position: 1 },
            ValidationError::InvalidUrl {
                tab: "Main".to_string(),
                label: "FTP".to_string(),
                url: "ftp://x".to_string(),
            },
        ]);
        assert_eq!(
            errors.to_string(),
            "Fix before saving:\n- Tab 1 has no name\n- Invalid URL in \"FTP\" (Main): ftp://x"
        );
    }
}
