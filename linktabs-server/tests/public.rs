use linktabs_protocol::{Document, Item, Tab};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use test_log::test;
use linktabs_server::test_utils::TestApp;

fn document_with(columns: i64, items: Vec<Item>) -> Document {
    let mut document = Document::default();
    document.site.title = "Loja Exemplo".to_string();
    document.site.subtitle = "Canais oficiais".to_string();
    document.site.columns = columns;
    document.tabs[0].items = items;
    document
}

#[test(tokio::test)]
async fn missing_file_renders_default_document() {
    let app = TestApp::new().await;

    let response = app.client().get(app.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();

    assert!(page.contains("<h1>Links</h1>"));
    assert!(page.contains("Our official channels"));
    assert!(page.contains(r#"<a class="active" href="/?tab=0">Main</a>"#));
    assert!(!app.data_file().exists(), "rendering must not write the document");
}

#[test(tokio::test)]
async fn link_cards() {
    let app = TestApp::new().await;
    app.write_document(&document_with(
        1,
        vec![
            Item::new("Site", "https://example.com").with_icon("🌐"),
            Item::new("", " https://blank-label.example "),
        ],
    ));

    let page = app.get_page().await;
    assert!(page.contains(
        r#"<a class="link-card" href="https://example.com" target="_blank" rel="noopener noreferrer">"#
    ));
    assert!(page.contains("🌐"));
    assert!(page.contains(r#"href="https://blank-label.example""#));
    assert!(page.contains(r#"<span class="link-text">Link</span>"#));
    assert!(page.contains("↗"));
}

#[test(tokio::test)]
async fn invalid_url_shows_warning_instead_of_link() {
    let app = TestApp::new().await;
    app.write_document(&document_with(1, vec![Item::new("Old FTP", "ftp://x")]));

    let page = app.get_page().await;
    assert!(page.contains("Invalid URL in: Old FTP"));
    assert!(!page.contains(r#"href="ftp://x""#));
}

#[test(tokio::test)]
async fn missing_image_falls_back_to_default_glyph() {
    let app = TestApp::new().await;
    app.write_document(&document_with(
        1,
        vec![Item::new("Shop", "https://shop.example").with_arquivo("missing.png")],
    ));

    let page = app.get_page().await;
    assert!(page.contains(r#"<span class="link-icon">🔗</span>"#));
    assert!(!page.contains("<img"));
}

#[test(tokio::test)]
async fn image_and_logo_are_inlined() {
    let app = TestApp::new().await;
    app.write_file("icons/shop.png", b"png-bytes");
    app.write_file("logo.png", b"logo");
    app.write_document(&document_with(
        1,
        vec![
            Item::new("Shop", "https://shop.example")
                .with_icon("🛒")
                .with_arquivo("./icons/shop.png"),
        ],
    ));

    let page = app.get_page().await;
    assert!(page.contains(r#"<img src="data:image/png;base64,cG5nLWJ5dGVz" alt="">"#));
    assert!(page.contains(r#"<img src="data:image/png;base64,bG9nbw==" alt="Logo">"#));
    assert!(!page.contains("🛒"));
}

#[test(tokio::test)]
async fn items_are_laid_out_round_robin() {
    let app = TestApp::new().await;
    let items = (0..5)
        .map(|i| Item::new(format!("card-{i}"), "https://example.com"))
        .collect();
    app.write_document(&document_with(2, items));

    let page = app.get_page().await;
    let position = |label: &str| page.find(label).unwrap();
    let order = ["card-0", "card-2", "card-4", "card-1", "card-3"];
    for pair in order.windows(2) {
        assert!(
            position(pair[0]) < position(pair[1]),
            "{} should render before {}",
            pair[0],
            pair[1]
        );
    }
    assert_eq!(page.matches(r#"<div class="column">"#).count(), 2);
}

#[test(tokio::test)]
async fn tab_query_selects_visible_tab() {
    let app = TestApp::new().await;
    let mut document = Document::default();
    document.tabs.push(Tab::new("Social"));
    app.write_document(&document);

    let page = app.get_page_with(app.client(), "/?tab=1").await;
    assert!(page.contains(r#"<a class="active" href="/?tab=1">Social</a>"#));
    assert!(page.contains(r#"<a href="/?tab=0">Main</a>"#));

    let page = app.get_page_with(app.client(), "/?tab=7").await;
    assert!(page.contains(r#"<a class="active" href="/?tab=0">Main</a>"#));
}

#[test(tokio::test)]
async fn hand_written_column_counts_are_coerced() {
    let app = TestApp::new().await;
    for (columns, expected) in [(r#""3""#, 3), ("1.0", 1), ("2.9", 2)] {
        let json = format!(
            r#"{{ "site": {{ "columns": {columns} }}, "tabs": [{{ "name": "Main", "items": [] }}] }}"#
        );
        app.write_file("links.json", json.as_bytes());

        let response = app.client().get(app.url("/")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{columns}");
        let page = response.text().await.unwrap();
        assert_eq!(page.matches(r#"<div class="column">"#).count(), expected, "{columns}");
    }
}

#[test(tokio::test)]
async fn malformed_document_fails_loudly() {
    let app = TestApp::new().await;
    app.write_file("links.json", b"{ \"tabs\": [");

    let response = app.client().get(app.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap();
    assert!(!body.contains("links.json"), "internal details must not leak");

    let response = app.client().get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test(tokio::test)]
async fn health_and_unknown_routes() {
    let app = TestApp::new().await;

    let response = app.client().get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");

    let response = app.client().get(app.url("/nope")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
