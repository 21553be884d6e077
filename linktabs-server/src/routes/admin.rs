use crate::auth::users::Backend;
use crate::state::AppState;
use axum::Router;
use axum::routing::post;
use axum_login::login_required;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/panel", post(post::panel))
        .route("/site", post(post::site))
        .route("/tabs", post(post::create_tab))
        .route("/tabs/select", post(post::select_tab))
        .route("/tabs/rename", post(post::rename_tab))
        .route("/tabs/delete", post(post::delete_tab))
        .route("/items", post(post::items))
        .route("/save", post(post::save))
        .route("/discard", post(post::discard))
        .route_layer(login_required!(Backend))
}

mod post {
    use crate::editor::EditorAction;
    use crate::http::RedirectResult;
    use crate::metrics::{EditorMetrics, SaveOutcome};
    use crate::session::SessionState;
    use crate::state::AppState;
    use crate::validation::validate;
    use axum::Form;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::response::Redirect;
    use linktabs_protocol::http::admin::{
        EditorForm, FormError, PanelForm, RenameTabForm, SelectTabForm, SiteForm,
    };
    use std::sync::Arc;
    use tower_sessions::Session;
    use tracing::instrument;

    /// Edits typed into the panel that travel with every submission of it:
    /// appearance, the current tab's name and its items table.
    fn pending_edits(form: &EditorForm) -> Result<Vec<EditorAction>, FormError> {
        let mut actions = Vec::new();
        if let Some(SiteForm {
            title,
            subtitle,
            columns,
        }) = form.site()?
        {
            actions.push(EditorAction::UpdateSite {
                title,
                subtitle,
                columns,
            });
        }
        if let Some(RenameTabForm { name }) = form.rename_tab() {
            actions.push(EditorAction::RenameTab(name));
        }
        if let Some(items) = &form.items {
            actions.push(EditorAction::EditItems(items.clone()));
        }
        Ok(actions)
    }

    /// Apply `actions` to the session's draft. A refused action stops the
    /// sequence and is reported through the flash message.
    async fn edit(
        state: &AppState,
        session: &Session,
        actions: Vec<EditorAction>,
        success: Option<&str>,
    ) -> RedirectResult {
        let mut session_state = SessionState::load(session).await?;
        let outcome = session_state
            .draft_or_load(&state.store)?
            .apply_all(actions);

        match outcome {
            Ok(()) => {
                if let Some(message) = success {
                    session_state.flash_success(message);
                }
            }
            Err(err) => {
                tracing::debug!(?err, "Editor action refused");
                session_state.flash_error(err.to_string());
            }
        }

        session_state.store(session).await?;
        Ok(Redirect::to("/"))
    }

    #[instrument(level = "debug", skip(session))]
    pub async fn panel(
        session: Session,
        Form(PanelForm { open }): Form<PanelForm>,
    ) -> RedirectResult {
        let mut session_state = SessionState::load(&session).await?;
        session_state.show_admin = open;
        session_state.store(&session).await?;
        Ok(Redirect::to("/"))
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn site(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let form = EditorForm::parse(&body)?;
        if form.site()?.is_none() {
            return Err(FormError::Missing("columns").into());
        }
        edit(&state, &session, pending_edits(&form)?, None).await
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn select_tab(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let form = EditorForm::parse(&body)?;
        let SelectTabForm { tab } = form.select_tab()?;
        tracing::debug!(tab, "Selecting tab");

        let mut actions = pending_edits(&form)?;
        actions.push(EditorAction::SelectTab(tab));
        edit(&state, &session, actions, None).await
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn rename_tab(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let form = EditorForm::parse(&body)?;
        let mut actions = pending_edits(&form)?;
        if form.rename_tab().is_none() {
            actions.push(EditorAction::RenameTab(String::new()));
        }
        edit(&state, &session, actions, None).await
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn create_tab(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let mut actions = pending_edits(&EditorForm::parse(&body)?)?;
        actions.push(EditorAction::CreateTab);
        edit(&state, &session, actions, Some("New tab created.")).await
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn delete_tab(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let mut actions = pending_edits(&EditorForm::parse(&body)?)?;
        actions.push(EditorAction::DeleteTab);
        edit(&state, &session, actions, Some("Tab deleted.")).await
    }

    /// Apply the items table. A body without any table field empties the tab.
    #[instrument(level = "debug", skip_all)]
    pub async fn items(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let form = EditorForm::parse(&body)?;
        let mut actions = pending_edits(&form)?;
        if form.items.is_none() {
            actions.push(EditorAction::EditItems(Default::default()));
        }
        edit(&state, &session, actions, None).await
    }

    /// Apply the edits posted with the request, then validate the whole
    /// draft and write it out, or report every problem without touching the
    /// file.
    #[instrument(level = "info", skip_all)]
    pub async fn save(
        State(state): State<Arc<AppState>>,
        session: Session,
        body: Bytes,
    ) -> RedirectResult {
        let actions = pending_edits(&EditorForm::parse(&body)?)?;
        let mut session_state = SessionState::load(&session).await?;

        let refused = session_state
            .draft_or_load(&state.store)?
            .apply_all(actions)
            .err();
        if let Some(err) = refused {
            tracing::debug!(?err, "Editor action refused");
            session_state.flash_error(err.to_string());
            session_state.store(&session).await?;
            return Ok(Redirect::to("/"));
        }

        let document = session_state.draft_or_load(&state.store)?.document.clone();
        match validate(&document, &state.assets) {
            Ok(()) => {
                if let Err(err) = state.store.save(&document) {
                    EditorMetrics::save(SaveOutcome::Error);
                    return Err(err.into());
                }
                tracing::info!(path = %state.store.path().display(), "Document saved");
                EditorMetrics::save(SaveOutcome::Success);
                session_state.flash_success("Changes saved.");
            }
            Err(errors) => {
                tracing::info!(errors = errors.len(), "Save rejected");
                EditorMetrics::save(SaveOutcome::Rejected);
                session_state.flash_error(errors.to_string());
            }
        }

        session_state.store(&session).await?;
        Ok(Redirect::to("/"))
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn discard(session: Session) -> RedirectResult {
        let mut session_state = SessionState::load(&session).await?;
        session_state.draft = None;
        session_state.flash_success("Changes discarded.");
        session_state.store(&session).await?;
        Ok(Redirect::to("/"))
    }
}
