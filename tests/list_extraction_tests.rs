//! End-to-end list extraction over parsed markup and rendered snapshots
use std::collections::BTreeMap;

use listing_inference::infrastructure::{PageSnapshot, Rect, SnapshotNode};
use listing_inference::{
    Extraction, ExtractionConfig, ExtractOptions, ListExtractor, NodeId, PolicyKind, RenderedPage, SeedPoint,
    StaticHtmlTree, TreeAccessor,
};

const CATALOG: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Watches</title></head>
  <body>
    <nav class="menu"><a href="/">Home</a></nav>
    <div id="catalog">
      <div class="grid">
        <div class="card"><h3>Aviator</h3><span class="price">$120</span></div>
        <div class="card"><h3>Diver</h3><span class="price">$340</span></div>
        <div class="card"><h3>Dress</h3><span class="price">$210</span></div>
        <div class="card"><h3>Field</h3><span class="price">$99</span></div>
        <div class="card"><h3>Pilot</h3><span class="price">$150</span></div>
        <div class="ad-banner">Summer sale</div>
      </div>
    </div>
  </body>
</html>"#;

fn seeds_for(page: &StaticHtmlTree, css: &str, picks: &[usize]) -> Vec<SeedPoint> {
    let matches = page.select(css).expect("valid selector");
    picks.iter().map(|&i| SeedPoint::node(matches[i])).collect()
}

fn element(tag: &str, parent: Option<usize>, class: &str, text: &str, rect: Rect) -> SnapshotNode {
    let mut attributes = BTreeMap::new();
    if !class.is_empty() {
        attributes.insert("class".to_string(), class.to_string());
    }
    SnapshotNode {
        tag: tag.to_string(),
        parent,
        attributes,
        text: text.to_string(),
        outer_html: String::new(),
        rect: Some(rect),
    }
}

/// Five 200px cards side by side plus an ad tile, each card with a heading
fn rendered_catalog() -> RenderedPage {
    let mut nodes = vec![
        element("html", None, "", "", Rect::new(0.0, 0.0, 1200.0, 800.0)),
        element("body", Some(0), "", "", Rect::new(0.0, 0.0, 1200.0, 800.0)),
        element("div", Some(1), "catalog", "", Rect::new(0.0, 0.0, 1200.0, 400.0)),
        element("div", Some(2), "grid", "", Rect::new(0.0, 0.0, 1200.0, 400.0)),
    ];
    for i in 0..5 {
        let x = f64::from(i) * 200.0;
        let card = nodes.len();
        nodes.push(element("div", Some(3), "card", &format!("Card {i}"), Rect::new(x, 0.0, 200.0, 300.0)));
        nodes.push(element("h3", Some(card), "", &format!("Card {i}"), Rect::new(x + 10.0, 10.0, 180.0, 40.0)));
    }
    nodes.push(element("div", Some(3), "ad-banner", "Ad", Rect::new(1000.0, 0.0, 200.0, 300.0)));

    RenderedPage::from_snapshot(PageSnapshot {
        url: Some("https://shop.example/watches".to_string()),
        device_pixel_ratio: None,
        nodes,
    })
    .expect("well-formed snapshot")
}

#[test]
fn static_cards_are_extracted_without_the_banner() {
    let page = StaticHtmlTree::parse(CATALOG);
    let outcome = ListExtractor::default()
        .extract(&page, &seeds_for(&page, "div.card h3", &[0, 2, 4]))
        .unwrap();

    let list = outcome.into_list().expect("a list");
    assert_eq!(list.container_identity.as_deref(), Some("grid"));
    assert_eq!(list.len(), 5);
    for name in ["Aviator", "Diver", "Dress", "Field", "Pilot"] {
        assert!(list.items.iter().any(|item| item.contains(name)), "missing {name}");
    }
    assert!(list.items.iter().all(|item| !item.contains("Summer sale")));
}

#[test]
fn rendered_cards_are_extracted_from_points() {
    let page = rendered_catalog();
    let seeds = vec![
        SeedPoint::point(5.0, 5.0),
        SeedPoint::point(405.0, 5.0),
        // lands on the heading inside the fifth card
        SeedPoint::point(850.0, 20.0),
    ];

    let list = ListExtractor::default().extract(&page, &seeds).unwrap().into_list().expect("a list");
    assert_eq!(list.container_identity.as_deref(), Some("grid"));
    assert_eq!(list.votes, 3);
    assert_eq!(list.len(), 5);
    assert!(list.items.contains(&r#"<div class="card">Card 3</div>"#.to_string()));
}

#[test]
fn extraction_is_idempotent() {
    let page = StaticHtmlTree::parse(CATALOG);
    let seeds = seeds_for(&page, "div.card", &[1, 3]);
    let extractor = ListExtractor::default();

    let first = extractor.extract(&page, &seeds).unwrap();
    let second = extractor.extract(&page, &seeds).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_seed_list_is_not_found() {
    let page = rendered_catalog();
    assert_eq!(ListExtractor::default().extract(&page, &[]).unwrap(), Extraction::NotFound);
}

#[test]
fn seeds_at_the_boundary_are_not_found() {
    let page = StaticHtmlTree::parse(CATALOG);
    let seeds = seeds_for(&page, "body", &[0]);
    assert_eq!(ListExtractor::default().extract(&page, &seeds).unwrap(), Extraction::NotFound);

    // a point in the empty area under the grid hits <body>
    let rendered = rendered_catalog();
    assert_eq!(
        ListExtractor::default().extract(&rendered, &[SeedPoint::point(600.0, 700.0)]).unwrap(),
        Extraction::NotFound
    );
}

#[test]
fn identical_markup_containers_are_told_apart() {
    let list = r#"<ul class="list"><li class="row">A</li><li class="row">B</li></ul>"#;
    let page = StaticHtmlTree::parse(&format!("<html><body>{list}{list}</body></html>"));
    let containers = page.select("ul.list").unwrap();
    assert_eq!(containers.len(), 2);

    // two votes for the first list, one for the second
    let seeds = seeds_for(&page, "li.row", &[0, 1, 2]);
    let found = ListExtractor::default().extract(&page, &seeds).unwrap().into_list().unwrap();

    assert_eq!(found.container, containers[0]);
    assert_eq!(found.votes, 2);
}

#[test]
fn vote_tie_goes_to_first_seen_container() {
    let page = StaticHtmlTree::parse(
        r#"<html><body>
            <ul class="a"><li class="x">1</li><li class="x">2</li></ul>
            <ul class="b"><li class="y">3</li><li class="y">4</li></ul>
        </body></html>"#,
    );
    let containers = page.select("ul").unwrap();
    let seeds = seeds_for(&page, "li", &[2, 0]);

    let found = ListExtractor::default().extract(&page, &seeds).unwrap().into_list().unwrap();
    assert_eq!(found.container, containers[1]);
}

#[test]
fn expected_identity_is_enforced() {
    let page = StaticHtmlTree::parse(CATALOG);
    let seeds = seeds_for(&page, "div.card", &[0, 1]);

    let outcome = ListExtractor::default()
        .extract_with(&page, &seeds, &ExtractOptions::expecting("results"))
        .unwrap();
    assert_eq!(
        outcome,
        Extraction::ContainerMismatch {
            expected: "results".to_string(),
            found: Some("grid".to_string()),
        }
    );
}

#[test]
fn configured_policy_overrides_adapter_default() {
    // drifting generated class names: no shared token, but nearly equal strings
    let page = StaticHtmlTree::parse(
        r#"<html><body><section id="feed">
            <article class="product-tile-8f2a1">One</article>
            <article class="product-tile-8f2a2">Two</article>
            <article class="product-tile-8f2a3">Three</article>
        </section></body></html>"#,
    );
    let seeds = seeds_for(&page, "article", &[0, 1]);

    assert_eq!(page.default_policy(), PolicyKind::SharedClass);
    assert_eq!(ListExtractor::default().extract(&page, &seeds).unwrap(), Extraction::NotFound);

    let extractor = ListExtractor::new(ExtractionConfig {
        policy: Some(PolicyKind::Similarity),
        ..ExtractionConfig::default()
    });
    let list = extractor.extract(&page, &seeds).unwrap().into_list().unwrap();
    assert_eq!(list.container_identity.as_deref(), Some("feed"));
    assert_eq!(list.len(), 3);
}

#[test]
fn scan_falls_back_to_top_level_children() {
    let page = StaticHtmlTree::parse("<div><p>only text</p></div>");
    let scan = ListExtractor::default().scan_document(&page);
    assert_eq!(scan.container, Some(NodeId(1)));
    assert_eq!(scan.container_identity, "");
    assert_eq!(scan.items, vec!["<p>only text</p>"]);

    let scan = ListExtractor::default().scan_document(&StaticHtmlTree::parse(CATALOG));
    assert_eq!(scan.container_identity, "grid");
    assert_eq!(scan.items.len(), 6);
}

#[test]
fn scan_of_a_fragment_returns_its_top_level_cards() {
    let page = StaticHtmlTree::parse(r#"<div class="card">A</div><div class="card">B</div><div class="card">C</div>"#);
    let scan = ListExtractor::default().scan_document(&page);

    assert_eq!(scan.items.len(), 3);
    assert!(scan.items.iter().all(|item| item.starts_with(r#"<div class="card">"#)));
    assert!(scan.items.iter().all(|item| !item.contains("<body") && !item.contains("<head")));
    assert_eq!(scan.container_identity, "");
}
