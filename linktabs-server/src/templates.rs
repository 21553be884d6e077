//! HTML for the single page, built from a [`PageView`].

use crate::render::{AdminView, CardView, PageView, SidebarView, TabView, Visual};
use crate::session::{Flash, FlashKind};
use linktabs_protocol::document::{MAX_COLUMNS, MIN_COLUMNS};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const STYLE: &str = include_str!("../static/style.css");

pub fn page(view: &PageView) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (view.title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (sidebar(&view.sidebar))
                main {
                    @if let Some(flash) = &view.flash {
                        (flash_message(flash))
                    }
                    @if let Some(logo) = &view.logo {
                        div.logo-wrap {
                            img src=(logo.data_uri) alt="Logo";
                        }
                    }
                    div.hero {
                        h1 { (view.title) }
                        p { (view.subtitle) }
                    }
                    (tabs(&view.tabs))
                    @if let Some(admin) = &view.admin {
                        (admin_panel(admin))
                    }
                    div.small-note { "🔗 " (view.title) " · Links page" }
                }
            }
        }
    }
}

fn flash_message(flash: &Flash) -> Markup {
    let class = match flash.kind {
        FlashKind::Success => "flash success",
        FlashKind::Error => "flash error",
    };
    html! {
        div class=(class) role="status" { (flash.message) }
    }
}

fn sidebar(view: &SidebarView) -> Markup {
    html! {
        aside.sidebar {
            h2 { "⚙️ Settings" }
            p.caption { "Public area: links. Admin area: password protected." }
            @match view {
                SidebarView::NotConfigured { key } => {
                    div.warning {
                        "Admin login is disabled: set " code { (key) }
                        " in the secrets file or the environment."
                    }
                }
                SidebarView::Login => {
                    form method="post" action="/auth/login" {
                        label for="password" { "Admin password" }
                        input id="password" type="password" name="password" autocomplete="current-password";
                        button type="submit" { "Enter" }
                        " "
                        button type="submit" formaction="/auth/clear" { "Clear" }
                    }
                }
                SidebarView::LoggedIn { show_admin } => {
                    form method="post" action="/admin/panel" {
                        input type="hidden" name="open" value=(!show_admin);
                        button type="submit" {
                            @if *show_admin { "Hide admin panel" } @else { "Show admin panel" }
                        }
                    }
                    form method="post" action="/auth/logout" {
                        button type="submit" { "Leave admin" }
                    }
                }
            }
        }
    }
}

fn tabs(tabs: &[TabView]) -> Markup {
    html! {
        nav.tab-strip {
            @for tab in tabs {
                a.active[tab.active] href={ "/?tab=" (tab.index) } { (tab.name) }
            }
        }
        @for tab in tabs {
            section.panel hidden[!tab.active] {
                div.grid {
                    @for column in &tab.columns {
                        div.column {
                            @for card in column {
                                (link_card(card))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn link_card(card: &CardView) -> Markup {
    html! {
        @match card {
            CardView::Link { label, url, visual } => {
                a.link-card href=(url) target="_blank" rel="noopener noreferrer" {
                    span.link-icon {
                        @match visual {
                            Visual::Image(asset) => {
                                img src=(asset.data_uri) alt="";
                            }
                            Visual::Glyph(glyph) => { (glyph) }
                        }
                    }
                    span.link-text { (label) }
                    span.link-arrow { "↗" }
                }
            }
            CardView::Invalid { label } => {
                div.warning { "Invalid URL in: " (label) }
            }
        }
    }
}

/// The whole panel is one form so that every button submits all edits
/// typed so far. Buttons pick the route through `formaction`.
fn admin_panel(view: &AdminView) -> Markup {
    html! {
        section.admin {
            h2 { "🛠️ Admin panel" }

            form id="editor" method="post" action="/admin/items" {
                fieldset {
                    legend { "Appearance" }
                    label { "Title " input type="text" name="title" value=(view.site.title); }
                    br;
                    label { "Subtitle " input type="text" name="subtitle" value=(view.site.subtitle); }
                    br;
                    label {
                        "Button columns "
                        input type="range" name="columns" min=(MIN_COLUMNS) max=(MAX_COLUMNS)
                            value=(view.site.columns);
                    }
                    button type="submit" formaction="/admin/site" { "Apply" }
                }

                h3 { "Tabs and links" }

                div.tab-controls {
                    label {
                        "Edit tab "
                        select name="tab" {
                            @for (index, name) in view.tab_names.iter().enumerate() {
                                option value=(index) selected[index == view.selected] { (name) }
                            }
                        }
                    }
                    button type="submit" formaction="/admin/tabs/select" { "Select" }
                }

                div.tab-controls {
                    label { "Tab name " input type="text" name="name" value=(view.tab_name); }
                    button type="submit" formaction="/admin/tabs/rename" { "Rename" }
                }

                table {
                    thead {
                        tr {
                            th { "Button title" }
                            th { "URL (https://...)" }
                            th { "Icon (emoji)" }
                            th { "Image file" }
                            th { "Remove" }
                        }
                    }
                    tbody {
                        @for (index, item) in view.items.iter().enumerate() {
                            tr {
                                td { input type="text" name="label" value=(item.label); }
                                td { input type="text" name="url" value=(item.url); }
                                td { input type="text" name="icon" value=(item.icon.as_deref().unwrap_or_default()); }
                                td { input type="text" name="arquivo" value=(item.arquivo.as_deref().unwrap_or_default()); }
                                td { input type="checkbox" name="remove" value=(index); }
                            }
                        }
                    }
                }
                button type="submit" name="action" value="apply" { "Apply rows" }
                " "
                button type="submit" name="action" value="add" { "Add row" }

                h4 { "Actions" }
                div.actions {
                    button type="submit" formaction="/admin/tabs" { "➕ Create new tab" }
                    @if view.can_delete_tab {
                        button type="submit" formaction="/admin/tabs/delete" { "🗑️ Delete this tab" }
                    }
                }
                hr;
                div.actions {
                    button type="submit" formaction="/admin/save" { "💾 Save changes" }
                    button type="submit" formaction="/admin/discard" { "Discard changes" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRef;
    use linktabs_protocol::{Item, Site};

    fn view() -> PageView {
        PageView {
            title: "Loja <Muniz>".to_string(),
            subtitle: "Canais".to_string(),
            logo: Some(AssetRef {
                mime: "image/png",
                data_uri: "data:image/png;base64,eA==".to_string(),
            }),
            tabs: vec![
                TabView {
                    index: 0,
                    name: "Main".to_string(),
                    active: true,
                    columns: vec![vec![
                        CardView::Link {
                            label: "Site".to_string(),
                            url: "https://example.com".to_string(),
                            visual: Visual::Glyph("🔗".to_string()),
                        },
                        CardView::Invalid {
                            label: "FTP".to_string(),
                        },
                    ]],
                },
                TabView {
                    index: 1,
                    name: "Other".to_string(),
                    active: false,
                    columns: vec![vec![]],
                },
            ],
            sidebar: SidebarView::Login,
            admin: None,
            flash: None,
        }
    }

    #[test]
    fn public_page() {
        let html = page(&view()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Loja &lt;Muniz&gt;"));
        assert!(html.contains(r#"src="data:image/png;base64,eA==""#));
        assert!(html.contains(
            r#"<a class="link-card" href="https://example.com" target="_blank" rel="noopener noreferrer">"#
        ));
        assert!(html.contains("↗"));
        assert!(html.contains("Invalid URL in: FTP"));
        assert!(html.contains(r#"href="/?tab=1""#));
        assert!(html.contains(r#"formaction="/auth/clear""#));
        assert!(!html.contains("Admin panel"));
    }

    #[test]
    fn admin_page() {
        let mut view = view();
        view.sidebar = SidebarView::LoggedIn { show_admin: true };
        view.flash = Some(Flash {
            kind: FlashKind::Error,
            message: "Fix before saving".to_string(),
        });
        view.admin = Some(AdminView {
            site: Site::default(),
            tab_names: vec!["Main".to_string(), "Other".to_string()],
            selected: 1,
            tab_name: "Other".to_string(),
            items: vec![Item::new("Shop", "https://shop.example").with_icon("🛒")],
            can_delete_tab: false,
        });

        let html = page(&view).into_string();
        assert!(html.contains(r#"class="flash error""#));
        assert!(html.contains(r#"<option value="1" selected>Other</option>"#));
        assert!(html.contains(r#"value="https://shop.example""#));
        assert!(html.contains(r#"action="/auth/logout""#));
        assert!(!html.contains("/admin/tabs/delete"));

        // Save and Select submit the form that holds the items table.
        let editor = html
            .split(r#"<form id="editor""#)
            .nth(1)
            .and_then(|rest| rest.split("</form>").next())
            .unwrap();
        assert!(editor.contains(r#"name="label" value="Shop""#));
        assert!(editor.contains(r#"name="title""#));
        assert!(editor.contains(r#"formaction="/admin/save""#));
        assert!(editor.contains(r#"formaction="/admin/tabs/select""#));
        assert!(editor.contains(r#"formaction="/admin/tabs/rename""#));
    }
}
