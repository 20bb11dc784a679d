//! Integration tests for walking and searching loaded documents.
//!
//! These load realistic configuration-style documents and check the
//! traversal and search guarantees end to end: boundary containment, walk
//! reversibility, resumable searches and path resolution.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use xmlwalk::parser::{parse_str_with_options, LeafType, ParseOptions};
use xmlwalk::search::{parse_path, Descend, ElementQuery, MAX_SEGMENT_LEN};
use xmlwalk::{Document, NodeId, NodeKind};

const CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config version="2">
  <settings>
    <timeout>30</timeout>
    <retries>3</retries>
  </settings>
  <servers>
    <server name="alpha" role="primary">
      <host>alpha.example.org</host>
      <port>8080</port>
    </server>
    <server name="beta" role="replica">
      <host>beta.example.org</host>
      <port>8081</port>
    </server>
    <group name="edge">
      <server name="gamma" role="replica">
        <host>gamma.example.org</host>
      </server>
    </group>
  </servers>
  <notes><!-- maintenance window -->hello world</notes>
</config>
"#;

fn load(input: &str) -> Document {
    Document::parse_str(input).unwrap_or_else(|e| panic!("parse failed: {e}"))
}

fn load_compact(input: &str) -> Document {
    parse_str_with_options(input, &ParseOptions::default().no_blanks(true))
        .unwrap_or_else(|e| panic!("parse failed: {e}"))
}

fn walk_forward(doc: &Document, top: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut node = doc.walk_next(top, top, Descend::Always);
    while let Some(id) = node {
        out.push(id);
        node = doc.walk_next(id, top, Descend::Always);
    }
    out
}

fn find_all(doc: &Document, top: NodeId, query: &ElementQuery<'_>) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut cursor = doc.find_element(top, top, query, Descend::Always);
    while let Some(id) = cursor {
        out.push(id);
        cursor = doc.find_element(id, top, query, Descend::Always);
    }
    out
}

fn names(doc: &Document, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| match doc.node_name(id) {
            Some(name) => name.to_string(),
            None => doc.text_content(id),
        })
        .collect()
}

fn attr_values(doc: &Document, ids: &[NodeId], attr: &str) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| doc.attribute(id, attr))
        .map(str::to_string)
        .collect()
}

// --- Walker ---

#[test]
fn test_walk_visits_every_descendant_once() {
    let doc = load_compact(
        "<r><a><a1/><a2>t</a2></a><b/><c><c1/><!--note--></c></r><!--after-->",
    );
    let r = doc.root_element().unwrap();

    let walked = walk_forward(&doc, r);
    let labels: Vec<&str> = walked
        .iter()
        .map(|&id| {
            doc.node_name(id)
                .or_else(|| doc.node_text(id))
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(labels, ["a", "a1", "a2", "t", "b", "c", "c1", "note"]);

    let mut unique = walked.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), walked.len());
}

#[test]
fn test_walk_never_leaves_inner_top() {
    let doc = load_compact(CONFIG);
    let config = doc.root_element().unwrap();
    let servers = doc.find_path(config, "servers").unwrap();

    for id in walk_forward(&doc, servers) {
        assert_ne!(id, servers);
        assert!(
            doc.ancestors(id).any(|a| a == servers),
            "{id:?} escaped the servers subtree"
        );
    }
}

#[test]
fn test_walk_prev_inverts_walk_next() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();

    for n in walk_forward(&doc, config) {
        if let Some(next) = doc.walk_next(n, config, Descend::Always) {
            assert_eq!(doc.walk_prev(next, config, Descend::Always), Some(n));
        }
    }
}

#[test]
fn test_walk_backward_is_reverse_of_forward() {
    let doc = load_compact(CONFIG);
    let config = doc.root_element().unwrap();
    let forward = walk_forward(&doc, config);

    let mut backward = Vec::new();
    let mut node = forward.last().copied();
    while let Some(id) = node {
        backward.push(id);
        node = doc.walk_prev(id, config, Descend::Always);
    }
    backward.reverse();
    assert_eq!(backward, forward);
}

// --- Element search ---

#[test]
fn test_find_all_servers_anywhere() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();
    let servers = find_all(&doc, config, &ElementQuery::named("server"));
    assert_eq!(attr_values(&doc, &servers, "name"), ["alpha", "beta", "gamma"]);
}

#[test]
fn test_find_by_attribute_value() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();
    let replicas = find_all(
        &doc,
        config,
        &ElementQuery::named("server").with_attr_value("role", "replica"),
    );
    assert_eq!(attr_values(&doc, &replicas, "name"), ["beta", "gamma"]);

    let named = find_all(&doc, config, &ElementQuery::any().with_attr("name"));
    assert_eq!(
        attr_values(&doc, &named, "name"),
        ["alpha", "beta", "edge", "gamma"]
    );
}

#[test]
fn test_find_direct_children_with_descend_first() {
    let doc = load_compact(CONFIG);
    let config = doc.root_element().unwrap();
    let servers = doc.find_path(config, "servers").unwrap();
    let query = ElementQuery::named("server");

    let mut direct = Vec::new();
    let mut cursor = doc.find_element(servers, servers, &query, Descend::First);
    while let Some(id) = cursor {
        direct.push(id);
        cursor = doc.find_element(id, servers, &query, Descend::Never);
    }
    assert_eq!(attr_values(&doc, &direct, "name"), ["alpha", "beta"]);
}

#[test]
fn test_wildcard_query_lists_elements_in_document_order() {
    let doc = load_compact("<r><a><b/></a><c/>text<d/></r>");
    let r = doc.root_element().unwrap();
    let all = find_all(&doc, r, &ElementQuery::any());
    assert_eq!(names(&doc, &all), ["a", "b", "c", "d"]);
}

#[test]
fn test_value_without_attribute_is_rejected() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();
    let query = ElementQuery {
        name: Some("server"),
        attr: None,
        value: Some("alpha"),
    };
    for descend in [Descend::Always, Descend::First, Descend::Never] {
        assert_eq!(doc.find_element(config, config, &query, descend), None);
    }
}

// --- Text search ---

#[test]
fn test_text_search_exact_and_case_sensitive() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();

    let found = doc
        .find_element_text(config, config, "hello world", Descend::Always)
        .unwrap();
    assert_eq!(doc.node_name(doc.parent(found).unwrap()), Some("notes"));

    assert_eq!(doc.find_element_text(config, config, "hello", Descend::Always), None);
    assert_eq!(
        doc.find_element_text(config, config, "Hello World", Descend::Always),
        None
    );
    assert_eq!(
        doc.find_element_text(config, config, " maintenance window ", Descend::Always),
        None
    );
}

#[test]
fn test_text_search_resumes() {
    let doc = load_compact("<r><a>x</a><b>y</b><c>x</c></r>");
    let r = doc.root_element().unwrap();

    let first = doc.find_element_text(r, r, "x", Descend::Always).unwrap();
    let second = doc.find_element_text(first, r, "x", Descend::Always).unwrap();
    assert_eq!(doc.node_name(doc.parent(first).unwrap()), Some("a"));
    assert_eq!(doc.node_name(doc.parent(second).unwrap()), Some("c"));
    assert_eq!(doc.find_element_text(second, r, "x", Descend::Always), None);
}

// --- Paths ---

#[test]
fn test_path_returns_value_node() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();

    let timeout = doc.find_path(config, "settings/timeout").unwrap();
    assert_eq!(doc.node_text(timeout), Some("30"));

    let port = doc.find_path(config, "servers/server/port").unwrap();
    assert_eq!(doc.node_text(port), Some("8080"));
}

#[test]
fn test_path_wildcard_searches_subtree() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();

    assert_eq!(doc.find_path(config, "servers/host"), None);
    let host = doc.find_path(config, "servers/*/host").unwrap();
    assert_eq!(doc.node_text(host), Some("alpha.example.org"));

    let from_document = doc.find_path(doc.root(), "*/retries").unwrap();
    assert_eq!(doc.node_text(from_document), Some("3"));
}

#[test]
fn test_path_nested_wildcard_example() {
    let doc = load("<root><foo><one><two>42</two></one></foo></root>");
    let root = doc.root_element().unwrap();
    let found = doc.find_path(root, "foo/*/two").unwrap();
    assert!(matches!(&doc.node(found).kind, NodeKind::Text { content } if content == "42"));
}

#[test]
fn test_path_to_container_returns_element() {
    let doc = load_compact(CONFIG);
    let config = doc.root_element().unwrap();
    let settings = doc.find_path(config, "settings").unwrap();
    assert_eq!(doc.node_name(settings), Some("settings"));
}

#[test]
fn test_path_to_container_with_leading_whitespace_returns_text() {
    // Without no_blanks the first child of <settings> is indentation, which
    // is returned as the settings' value.
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();
    let found = doc.find_path(config, "settings").unwrap();
    assert!(doc.node(found).kind.is_text());
}

#[test]
fn test_path_with_typed_leaves() {
    let opts = ParseOptions::default()
        .no_blanks(true)
        .leaf_type(LeafType::Integer);
    let doc = parse_str_with_options("<limits><max>512</max></limits>", &opts).unwrap();
    let limits = doc.root_element().unwrap();
    let max = doc.find_path(limits, "max").unwrap();
    assert_eq!(doc.node(max).kind, NodeKind::Integer { value: 512 });
}

#[test]
fn test_overlong_segment_rejected() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();
    let long = "s".repeat(MAX_SEGMENT_LEN);
    let path = format!("settings/{long}");

    assert!(parse_path(&path).is_err());
    assert_eq!(doc.find_path(config, &path), None);

    let just_fits = format!("settings/{}", "s".repeat(MAX_SEGMENT_LEN - 1));
    assert!(parse_path(&just_fits).is_ok());
    assert_eq!(doc.find_path(config, &just_fits), None);
}

#[test]
fn test_malformed_paths() {
    let doc = load(CONFIG);
    let config = doc.root_element().unwrap();
    for path in ["", "/settings", "settings//timeout", "settings/*/"] {
        assert_eq!(doc.find_path(config, path), None, "{path:?}");
    }
    assert!(doc.find_path(config, "settings/").is_some());
}

// --- Detached subtrees ---

#[test]
fn test_search_in_detached_subtree() {
    let mut doc = load_compact(CONFIG);
    let config = doc.root_element().unwrap();
    let servers = doc.find_path(config, "servers").unwrap();
    doc.detach(servers);

    assert_eq!(doc.find_path(config, "servers"), None);
    let found = find_all(&doc, servers, &ElementQuery::named("server"));
    assert_eq!(found.len(), 3);
    assert_eq!(walk_forward(&doc, servers).len(), doc.descendants(servers).count());
}
