use crate::assets::{AssetRef, AssetResolver};
use crate::auth::AuthState;
use crate::editor::Draft;
use crate::session::Flash;
use linktabs_protocol::document::DEFAULT_ICON;
use linktabs_protocol::layout::distribute;
use linktabs_protocol::{Document, Item, Site, is_valid_url};

/// Everything about the requesting session that affects the page.
#[derive(Debug, Clone, Copy)]
pub struct ViewRequest<'a> {
    pub auth: AuthState,
    pub gate_configured: bool,
    /// Name of the secret, shown in the "not configured" warning.
    pub secret_key: &'a str,
    /// Public tab to show; out of range falls back to the first tab.
    pub active_tab: usize,
    pub show_admin: bool,
    pub draft: Option<&'a Draft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    pub subtitle: String,
    pub logo: Option<AssetRef>,
    pub tabs: Vec<TabView>,
    pub sidebar: SidebarView,
    pub admin: Option<AdminView>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub index: usize,
    pub name: String,
    pub active: bool,
    /// Cards per column, already in display order.
    pub columns: Vec<Vec<CardView>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Link {
        label: String,
        url: String,
        visual: Visual,
    },
    /// Shown in place of a link whose URL does not validate.
    Invalid { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visual {
    Image(AssetRef),
    Glyph(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarView {
    NotConfigured { key: String },
    Login,
    LoggedIn { show_admin: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminView {
    pub site: Site,
    pub tab_names: Vec<String>,
    pub selected: usize,
    pub tab_name: String,
    pub items: Vec<Item>,
    pub can_delete_tab: bool,
}

/// Build the page for one request. Reads image files through `assets` and
/// has no other side effects.
pub fn render(
    document: &Document,
    request: &ViewRequest<'_>,
    flash: Option<Flash>,
    assets: &AssetResolver,
) -> PageView {
    let columns = document.site.column_count();
    let active_tab = if request.active_tab < document.tabs.len() {
        request.active_tab
    } else {
        0
    };

    let tabs = document
        .tabs
        .iter()
        .enumerate()
        .map(|(index, tab)| TabView {
            index,
            name: tab.display_name().to_string(),
            active: index == active_tab,
            columns: distribute(tab.items.iter().map(|item| card(item, assets)), columns),
        })
        .collect();

    let authenticated = request.auth.is_authenticated();
    let sidebar = if !request.gate_configured {
        SidebarView::NotConfigured {
            key: request.secret_key.to_string(),
        }
    } else if authenticated {
        SidebarView::LoggedIn {
            show_admin: request.show_admin,
        }
    } else {
        SidebarView::Login
    };

    let admin = request
        .draft
        .filter(|_| authenticated && request.show_admin)
        .map(admin_view);

    PageView {
        title: document.site.title.clone(),
        subtitle: document.site.subtitle.clone(),
        logo: assets.resolve_logo(),
        tabs,
        sidebar,
        admin,
        flash,
    }
}

fn card(item: &Item, assets: &AssetResolver) -> CardView {
    let label = item.display_label().to_string();
    let url = item.target();
    if !is_valid_url(url) {
        return CardView::Invalid { label };
    }

    let visual = item
        .asset_path()
        .and_then(|path| assets.resolve(path))
        .map(Visual::Image)
        .unwrap_or_else(|| Visual::Glyph(item.icon_glyph().unwrap_or(DEFAULT_ICON).to_string()));

    CardView::Link {
        label,
        url: url.to_string(),
        visual,
    }
}

fn admin_view(draft: &Draft) -> AdminView {
    let tab = draft.current_tab();
    AdminView {
        site: draft.document.site.clone(),
        tab_names: draft.document.tab_names().map(str::to_string).collect(),
        selected: draft.selected(),
        tab_name: tab.name.clone(),
        items: tab.items.clone(),
        can_delete_tab: draft.can_delete_tab(),
    }
}
