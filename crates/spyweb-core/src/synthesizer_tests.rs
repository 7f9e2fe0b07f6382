use super::*;
use spyweb_dom::Namespace;

fn resolve(doc: &Document, selector: &str) -> Vec<NodeId> {
    doc.query_selector_all(selector).unwrap()
}

#[test]
fn test_id_short_circuits() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let outer = doc.create_element("div");
    let el = doc.create_element("span");
    doc.set_attribute(el, "id", "email");
    doc.set_attribute(el, "class", "field wide");
    doc.append_child(body, outer);
    doc.append_child(outer, el);

    let selector = synthesize(&doc, el);
    assert_eq!(selector, "#email");
    assert_eq!(resolve(&doc, &selector), vec![el]);
}

#[test]
fn test_id_is_escaped() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let el = doc.create_element("div");
    doc.set_attribute(el, "id", "42:main");
    doc.append_child(body, el);

    let selector = synthesize(&doc, el);
    assert_eq!(selector, "#\\34 2\\:main");
    assert_eq!(resolve(&doc, &selector), vec![el]);
}

#[test]
fn test_empty_id_falls_through_to_path() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let el = doc.create_element("p");
    doc.set_attribute(el, "id", "");
    doc.append_child(body, el);

    assert_eq!(synthesize(&doc, el), "html body p");
}

#[test]
fn test_path_with_classes_and_nth_of_type() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let list = doc.create_element("ul");
    doc.set_attribute(list, "class", "menu  spyweb-masked main");
    doc.append_child(body, list);
    let mut items = Vec::new();
    for _ in 0..3 {
        let li = doc.create_element("li");
        doc.append_child(list, li);
        items.push(li);
    }

    let selector = synthesize(&doc, items[1]);
    assert_eq!(selector, "html body ul.menu.main li:nth-of-type(2)");
    assert_eq!(resolve(&doc, &selector), vec![items[1]]);

    // The first of several same-tag siblings is disambiguated too.
    assert_eq!(
        synthesize(&doc, items[0]),
        "html body ul.menu.main li:nth-of-type(1)"
    );
}

#[test]
fn test_depth_is_bounded() {
    let mut doc = Document::new();
    let mut parent = doc.body().unwrap();
    for _ in 0..8 {
        let div = doc.create_element("div");
        doc.append_child(parent, div);
        parent = div;
    }
    let leaf = doc.create_element("em");
    doc.append_child(parent, leaf);

    let selector = synthesize(&doc, leaf);
    assert_eq!(selector, "div div div div em");
    assert!(resolve(&doc, &selector).contains(&leaf));
}

#[test]
fn test_svg_uses_local_name_and_animated_classes() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let button = doc.create_element("button");
    let svg = doc.create_element_ns(Namespace::Svg, "svg");
    doc.set_attribute(svg, "class", "icon spyweb-masked");
    let path = doc.create_element_ns(Namespace::Svg, "svg:path");
    doc.append_child(body, button);
    doc.append_child(button, svg);
    doc.append_child(svg, path);

    let selector = synthesize(&doc, path);
    assert_eq!(selector, "html body button svg.icon path");
    assert_eq!(resolve(&doc, &selector), vec![path]);
}

#[test]
fn test_detached_node_best_effort() {
    let mut doc = Document::new();
    let orphan = doc.create_element("section");
    let child = doc.create_element("p");
    doc.append_child(orphan, child);

    assert_eq!(synthesize(&doc, child), "section p");
    assert!(resolve(&doc, "section p").is_empty());

    let text = doc.create_text("x");
    assert_eq!(synthesize(&doc, text), "");
}

#[test]
fn test_deterministic() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let a = doc.create_element("p");
    let b = doc.create_element("p");
    doc.append_child(body, a);
    doc.append_child(body, b);

    assert_eq!(synthesize(&doc, b), synthesize(&doc, b));
    assert_ne!(synthesize(&doc, a), synthesize(&doc, b));
}

#[test]
fn test_wrapped_media_keeps_unwrapped_path() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let row = doc.create_element("p");
    doc.append_child(body, row);
    let first = doc.create_element("img");
    let second = doc.create_element("img");
    doc.append_child(row, first);
    doc.append_child(row, second);
    let before = synthesize(&doc, first);

    let wrapper = doc.create_element(crate::artifact::WRAPPER_TAG);
    doc.add_class(wrapper, crate::artifact::WRAPPER_CLASS);
    doc.set_passthrough(wrapper, true);
    doc.insert_before(row, wrapper, Some(first));
    doc.append_child(wrapper, first);
    assert_eq!(synthesize(&doc, first), before);
    assert_eq!(before, "html body p img:nth-of-type(1)");
    assert_eq!(resolve(&doc, &before), vec![first]);

    let selector = synthesize(&doc, second);
    assert_eq!(selector, "html body p img:nth-of-type(2)");
    assert_eq!(resolve(&doc, &selector), vec![second]);
}
