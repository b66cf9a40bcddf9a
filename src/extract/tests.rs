use super::*;
use crate::metrics::ResourceKind;
use url::Url;

fn page() -> Result<Url, String> {
    Url::parse("http://example.com/blog/post.html").map_err(|err| err.to_string())
}

fn collect(html: &str, foreign_only: bool) -> Result<Vec<(ResourceKind, String)>, String> {
    let page = page()?;
    Ok(scan_resources(html, &page, foreign_only)
        .map(|resource| (resource.kind, resource.url.to_string()))
        .collect())
}

#[test]
fn finds_images_stylesheets_and_scripts_in_order() -> Result<(), String> {
    let html = r#"
<html><head>
  <link rel="stylesheet" href="/css/site.css">
  <script src="app.js"></script>
</head><body>
  <img src="https://cdn.example.net/logo.png" alt="logo">
</body></html>"#;

    let found = collect(html, false)?;
    let expected = vec![
        (
            ResourceKind::Stylesheet,
            "http://example.com/css/site.css".to_owned(),
        ),
        (
            ResourceKind::Script,
            "http://example.com/blog/app.js".to_owned(),
        ),
        (
            ResourceKind::Image,
            "https://cdn.example.net/logo.png".to_owned(),
        ),
    ];
    if found != expected {
        return Err(format!("Unexpected resources: {:?}", found));
    }
    Ok(())
}

#[test]
fn duplicates_are_reported_once() -> Result<(), String> {
    let html = r#"<img src="/a.png"><img src='/a.png'><img src=/a.png#top><img src="/b.png">"#;
    let found = collect(html, false)?;
    if found.len() != 2 {
        return Err(format!("Expected 2 distinct resources, got {:?}", found));
    }
    Ok(())
}

#[test]
fn tag_and_attribute_names_are_case_insensitive() -> Result<(), String> {
    let html = r#"<IMG SRC="/x.gif"><LINK REL="Stylesheet" HREF="/y.css"><SCRIPT SRC="/z.js"></SCRIPT>"#;
    let found = collect(html, false)?;
    if found.len() != 3 {
        return Err(format!("Expected 3 resources, got {:?}", found));
    }
    Ok(())
}

#[test]
fn non_stylesheet_links_and_inline_scripts_are_ignored() -> Result<(), String> {
    let html = r#"
<link rel="icon" href="/favicon.ico">
<link rel="canonical" href="/post">
<link rel="alternate stylesheet" href="/alt.css">
<script>document.write('<img src="/from-js.png">');</script>
<img alt="no source">"#;
    let found = collect(html, false)?;
    let expected = vec![(
        ResourceKind::Stylesheet,
        "http://example.com/alt.css".to_owned(),
    )];
    if found != expected {
        return Err(format!("Unexpected resources: {:?}", found));
    }
    Ok(())
}

#[test]
fn comments_are_skipped() -> Result<(), String> {
    let html = r#"<!-- <img src="/hidden.png"> --><img src="/shown.png"><!-- unterminated <img src="/also-hidden.png">"#;
    let found = collect(html, false)?;
    let expected = vec![(
        ResourceKind::Image,
        "http://example.com/shown.png".to_owned(),
    )];
    if found != expected {
        return Err(format!("Unexpected resources: {:?}", found));
    }
    Ok(())
}

#[test]
fn non_http_references_are_skipped() -> Result<(), String> {
    let html = r#"
<img src="data:image/png;base64,AAAA">
<img src="javascript:void(0)">
<script src="   "></script>
<img src="http://[::1">
<img src="//static.example.org/ok.png">"#;
    let found = collect(html, false)?;
    let expected = vec![(
        ResourceKind::Image,
        "http://static.example.org/ok.png".to_owned(),
    )];
    if found != expected {
        return Err(format!("Unexpected resources: {:?}", found));
    }
    Ok(())
}

#[test]
fn base_href_changes_resolution() -> Result<(), String> {
    let html = r#"<img src="before.png"><base href="https://assets.example.com/v2/"><img src="after.png"><base href="/ignored/"><img src="last.png">"#;
    let found = collect(html, false)?;
    let urls: Vec<&str> = found.iter().map(|(_, url)| url.as_str()).collect();
    let expected = [
        "http://example.com/blog/before.png",
        "https://assets.example.com/v2/after.png",
        "https://assets.example.com/v2/last.png",
    ];
    if urls != expected {
        return Err(format!("Unexpected resolution: {:?}", urls));
    }
    Ok(())
}

#[test]
fn entities_in_attribute_values_are_decoded() -> Result<(), String> {
    let html = r#"<script src="/load.js?a=1&amp;b=2"></script>"#;
    let found = collect(html, false)?;
    let expected = vec![(
        ResourceKind::Script,
        "http://example.com/load.js?a=1&b=2".to_owned(),
    )];
    if found != expected {
        return Err(format!("Unexpected resources: {:?}", found));
    }
    Ok(())
}

#[test]
fn foreign_only_drops_same_host_resources() -> Result<(), String> {
    let html = r#"<img src="/local.png"><img src="http://EXAMPLE.com/upper.png"><img src="https://cdn.example.net/remote.png">"#;
    let found = collect(html, true)?;
    let expected = vec![(
        ResourceKind::Image,
        "https://cdn.example.net/remote.png".to_owned(),
    )];
    if found != expected {
        return Err(format!("Unexpected resources: {:?}", found));
    }
    Ok(())
}

#[test]
fn malformed_markup_is_tolerated() -> Result<(), String> {
    let html = "<img src=\"/ok.png\"><img src=\"/broken.png<<<><script src=/x.js></script><link rel=stylesheet href=/s.css";
    let found = collect(html, false)?;
    let has_ok = found
        .iter()
        .any(|(_, url)| url == "http://example.com/ok.png");
    if !has_ok {
        return Err(format!("Expected the well-formed image, got {:?}", found));
    }
    Ok(())
}

#[test]
fn quoted_greater_than_does_not_end_the_tag() -> Result<(), String> {
    let html = r#"<img alt="1 > 0" src="/a.png">
<link title='x>y' rel="stylesheet" href="/s.css">
<script data-x="a>b" src="/j.js"></script>"#;

    let found = collect(html, false)?;
    let expected = vec![
        (ResourceKind::Image, "http://example.com/a.png".to_owned()),
        (ResourceKind::Stylesheet, "http://example.com/s.css".to_owned()),
        (ResourceKind::Script, "http://example.com/j.js".to_owned()),
    ];
    if found != expected {
        return Err(format!("Expected 3 resources, got {:?}", found));
    }
    Ok(())
}

#[test]
fn scanner_is_lazy() -> Result<(), String> {
    let page = page()?;
    let html = r#"<img src="/1.png"><img src="/2.png"><img src="/3.png">"#;
    let mut scanner = scan_resources(html, &page, false);
    let first = scanner.next().ok_or("Expected first resource")?;
    if first.url.path() != "/1.png" {
        return Err(format!("Unexpected first resource: {}", first.url));
    }
    if scanner.count() != 2 {
        return Err("Expected two remaining resources".to_owned());
    }
    Ok(())
}

#[test]
fn html_content_type_detection() -> Result<(), String> {
    if !is_html(None) || !is_html(Some("text/html; charset=utf-8")) {
        return Err("Expected HTML".to_owned());
    }
    if !is_html(Some("application/XHTML+xml")) {
        return Err("Expected XHTML to count as HTML".to_owned());
    }
    if is_html(Some("application/json")) {
        return Err("JSON is not HTML".to_owned());
    }
    Ok(())
}
