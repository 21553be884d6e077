use linktabs_protocol::document::{MAX_COLUMNS, MIN_COLUMNS, NEW_TAB_NAME};
use linktabs_protocol::http::admin::ItemsForm;
use linktabs_protocol::{Document, Item, Tab};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Cannot delete the last remaining tab")]
    LastTab,
    #[error("Tab {0} does not exist")]
    TabOutOfRange(usize),
}

#[derive(Debug, Clone)]
pub enum EditorAction {
    SelectTab(usize),
    RenameTab(String),
    UpdateSite {
        title: String,
        subtitle: String,
        columns: i64,
    },
    EditItems(ItemsForm),
    CreateTab,
    DeleteTab,
}

/// The admin's in-memory working copy of the document plus the tab being
/// edited. Nothing here touches the backing file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub document: Document,
    selected: usize,
}

impl Draft {
    pub fn new(document: Document) -> Self {
        Self {
            document: document.normalized(),
            selected: 0,
        }
    }

    /// Index of the current tab, always within bounds.
    pub fn selected(&self) -> usize {
        self.selected.min(self.document.tabs.len().saturating_sub(1))
    }

    pub fn current_tab(&self) -> &Tab {
        &self.document.tabs[self.selected()]
    }

    fn current_tab_mut(&mut self) -> &mut Tab {
        let selected = self.selected();
        &mut self.document.tabs[selected]
    }

    pub fn can_delete_tab(&self) -> bool {
        self.document.tabs.len() > 1
    }

    /// Apply `action` and return the resulting draft. On error the draft is
    /// left as it was.
    pub fn apply(&self, action: EditorAction) -> Result<Self, EditorError> {
        let mut next = self.clone();
        next.selected = self.selected();

        match action {
            EditorAction::SelectTab(index) => {
                if index >= next.document.tabs.len() {
                    return Err(EditorError::TabOutOfRange(index));
                }
                next.selected = index;
            }
            EditorAction::RenameTab(name) => {
                let tab = next.current_tab_mut();
                if tab.name != name {
                    tab.rename(&name);
                }
            }
            EditorAction::UpdateSite {
                title,
                subtitle,
                columns,
            } => {
                next.document.site.title = title;
                next.document.site.subtitle = subtitle;
                next.document.site.columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
            }
            EditorAction::EditItems(form) => {
                let tab = next.current_tab_mut();
                tab.items = merge_rows(&tab.items, form);
            }
            EditorAction::CreateTab => {
                next.document.tabs.push(Tab::new(NEW_TAB_NAME));
                next.selected = next.document.tabs.len() - 1;
            }
            EditorAction::DeleteTab => {
                if !next.can_delete_tab() {
                    return Err(EditorError::LastTab);
                }
                let selected = next.selected();
                next.document.tabs.remove(selected);
                next.selected = selected.min(next.document.tabs.len() - 1);
            }
        }

        Ok(next)
    }

    /// Apply `actions` in order, stopping at the first refusal. Actions
    /// applied before it are kept.
    pub fn apply_all(
        &mut self,
        actions: impl IntoIterator<Item = EditorAction>,
    ) -> Result<(), EditorError> {
        for action in actions {
            *self = self.apply(action)?;
        }
        Ok(())
    }
}

/// Rebuild a tab's item list from the posted table.
///
/// Rows are matched to the existing items by position so that keys the
/// table does not edit are carried over. Removed rows are dropped before the
/// optional empty row is appended.
fn merge_rows(previous: &[Item], form: ItemsForm) -> Vec<Item> {
    let ItemsForm {
        rows,
        remove,
        add_row,
    } = form;

    let mut items: Vec<Item> = rows
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !remove.contains(index))
        .map(|(index, mut row)| {
            if let Some(existing) = previous.get(index) {
                row.extra = existing.extra.clone();
            }
            row
        })
        .collect();

    if add_row {
        items.push(Item::default());
    }
    items
}
