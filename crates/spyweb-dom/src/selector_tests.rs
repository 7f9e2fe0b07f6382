use super::*;
use crate::node::Namespace;

fn page() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.body().unwrap();

    let main = doc.create_element("main");
    doc.set_attribute(main, "class", "content wide");
    doc.append_child(body, main);

    let first = doc.create_element("p");
    let second = doc.create_element("p");
    doc.set_attribute(second, "data-role", "note");
    doc.append_child(main, first);
    doc.append_child(main, second);

    (doc, main, first, second)
}

#[test]
fn test_type_and_class() {
    let (doc, main, first, second) = page();
    assert_eq!(doc.query_selector_all("main.content").unwrap(), vec![main]);
    assert_eq!(doc.query_selector_all("MAIN.wide.content").unwrap(), vec![main]);
    assert_eq!(doc.query_selector_all("p").unwrap(), vec![first, second]);
    assert!(doc.query_selector_all(".missing").unwrap().is_empty());
}

#[test]
fn test_combinators() {
    let (doc, _, first, second) = page();
    assert_eq!(doc.query_selector_all("body p").unwrap(), vec![first, second]);
    assert_eq!(doc.query_selector_all("main > p").unwrap(), vec![first, second]);
    assert!(doc.query_selector_all("body > p").unwrap().is_empty());
    assert_eq!(doc.query_selector_all("html   main>p").unwrap().len(), 2);
}

#[test]
fn test_nth_of_type() {
    let (doc, _, first, second) = page();
    assert_eq!(doc.query_selector_all("p:nth-of-type(2)").unwrap(), vec![second]);
    assert_eq!(doc.query_selector_all("p:first-of-type").unwrap(), vec![first]);
    assert_eq!(doc.query_selector_all("p:nth-of-type(odd)").unwrap(), vec![first]);
    assert_eq!(doc.query_selector_all("p:nth-of-type(even)").unwrap(), vec![second]);
    assert!(doc.query_selector_all("p:nth-of-type(3)").unwrap().is_empty());
}

#[test]
fn test_attributes() {
    let (doc, _, _, second) = page();
    assert_eq!(doc.query_selector_all("[data-role]").unwrap(), vec![second]);
    assert_eq!(doc.query_selector_all("p[data-role=note]").unwrap(), vec![second]);
    assert_eq!(doc.query_selector_all("p[data-role='note']").unwrap(), vec![second]);
    assert!(doc.query_selector_all("p[data-role=\"other\"]").unwrap().is_empty());
}

#[test]
fn test_selector_list() {
    let (doc, main, first, second) = page();
    let found = doc.query_selector_all("p, main").unwrap();
    assert_eq!(found, vec![main, first, second]);
}

#[test]
fn test_id_with_escapes() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let odd = doc.create_element("div");
    doc.set_attribute(odd, "id", "1st:item.x");
    doc.append_child(body, odd);

    let selector = format!("#{}", css_escape("1st:item.x"));
    assert_eq!(doc.query_selector(&selector).unwrap(), Some(odd));
}

#[test]
fn test_svg_type_is_case_sensitive() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let svg = doc.create_element_ns(Namespace::Svg, "svg");
    let gradient = doc.create_element_ns(Namespace::Svg, "linearGradient");
    doc.append_child(body, svg);
    doc.append_child(svg, gradient);

    assert_eq!(doc.query_selector_all("svg linearGradient").unwrap(), vec![gradient]);
    assert!(doc.query_selector_all("lineargradient").unwrap().is_empty());
}

#[test]
fn test_detached_elements_do_not_match() {
    let (mut doc, _, first, _) = page();
    doc.remove(first);
    assert_eq!(doc.query_selector_all("p").unwrap().len(), 1);
}

#[test]
fn test_invalid_selectors() {
    for input in ["", "div >", "> p", "p:hover", "p::before", "a,", "#", "p)"] {
        let err = Selector::parse(input).unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector { .. }), "{}", input);
    }
}

#[test]
fn test_attribute_operators() {
    let (doc, main, _, _) = page();
    assert_eq!(doc.query_selector_all("[class~=wide]").unwrap(), vec![main]);
    assert_eq!(doc.query_selector_all("[class^=cont]").unwrap(), vec![main]);
    assert!(doc.query_selector_all("[class~=wid]").unwrap().is_empty());
}

#[test]
fn test_css_escape() {
    assert_eq!(css_escape("plain-id_1"), "plain-id_1");
    assert_eq!(css_escape("1abc"), "\\31 abc");
    assert_eq!(css_escape("-1a"), "-\\31 a");
    assert_eq!(css_escape("-"), "\\-");
    assert_eq!(css_escape("a:b.c"), "a\\:b\\.c");
    assert_eq!(css_escape("a b"), "a\\ b");
    assert_eq!(css_escape("héllo"), "héllo");
}

#[test]
fn test_escaped_identifiers_match_back() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    for raw in ["1abc", "-1a", "a:b.c", "x y", "-", "ünï"] {
        let el = doc.create_element("div");
        doc.set_attribute(el, "id", raw);
        doc.append_child(body, el);

        let selector = format!("#{}", css_escape(raw));
        assert_eq!(doc.query_selector_all(&selector).unwrap(), vec![el], "{}", raw);
    }
}

#[test]
fn test_nth_of_type_sees_through_passthrough_container() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let row = doc.create_element("p");
    doc.append_child(body, row);
    let first = doc.create_element("img");
    let second = doc.create_element("img");
    doc.append_child(row, first);
    doc.append_child(row, second);

    let wrapper = doc.create_element("span");
    doc.set_attribute(wrapper, "class", "frame");
    doc.set_passthrough(wrapper, true);
    doc.insert_before(row, wrapper, Some(first));
    doc.append_child(wrapper, first);

    assert_eq!(doc.query_selector_all("p > img:nth-of-type(1)").unwrap(), vec![first]);
    assert_eq!(doc.query_selector_all("p > img:nth-of-type(2)").unwrap(), vec![second]);
    assert_eq!(doc.query_selector_all("img + img").unwrap(), vec![second]);
    assert_eq!(doc.query_selector_all(".frame").unwrap(), vec![wrapper]);
}
