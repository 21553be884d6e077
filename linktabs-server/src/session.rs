use crate::editor::Draft;
use crate::store::{DocumentStore, StoreError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const SESSION_STATE_KEY: &str = "linktabs.state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Everything a browser session carries besides the authenticated flag,
/// which lives with the session user.
///
/// Read at the start and written at the end of every request that changes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub show_admin: bool,
    pub draft: Option<Draft>,
    pub flash: Option<Flash>,
}

impl SessionState {
    /// State right after a successful login.
    pub fn admin() -> Self {
        Self {
            show_admin: true,
            ..Default::default()
        }
    }

    pub async fn load(session: &Session) -> anyhow::Result<Self> {
        Ok(session
            .get::<Self>(SESSION_STATE_KEY)
            .await
            .context("Failed to read session state")?
            .unwrap_or_default())
    }

    pub async fn store(&self, session: &Session) -> anyhow::Result<()> {
        session
            .insert(SESSION_STATE_KEY, self)
            .await
            .context("Failed to write session state")
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Success,
            message: message.into(),
        });
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Error,
            message: message.into(),
        });
    }

    /// The working copy, loading it from `store` on first use.
    pub fn draft_or_load(&mut self, store: &DocumentStore) -> Result<&mut Draft, StoreError> {
        let draft = match self.draft.take() {
            Some(draft) => draft,
            None => Draft::new(store.load()?),
        };
        Ok(self.draft.insert(draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use test_log::test;
    use tower_sessions::MemoryStore;

    #[test(tokio::test)]
    async fn missing_state_is_default() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(SessionState::load(&session).await.unwrap(), SessionState::default());
    }

    #[test(tokio::test)]
    async fn store_and_load() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut state = SessionState::admin();
        state.flash_error("nope");

        state.store(&session).await.unwrap();
        let mut loaded = SessionState::load(&session).await.unwrap();
        assert_eq!(loaded, state);
        assert_eq!(
            loaded.take_flash(),
            Some(Flash {
                kind: FlashKind::Error,
                message: "nope".to_string()
            })
        );
        assert_eq!(loaded.take_flash(), None);
    }

    #[test]
    fn draft_is_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("links.json"));
        let mut state = SessionState::admin();

        state.draft_or_load(&store).unwrap().document.site.title = "Edited".to_string();
        assert_eq!(
            state.draft_or_load(&store).unwrap().document.site.title,
            "Edited"
        );
    }
}
