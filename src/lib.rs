//! # xmlwalk
//!
//! Bounded depth-first walking and search over an arena-allocated markup
//! tree. Walk forwards or backwards without leaving a chosen subtree, find
//! elements by name and attribute, find text nodes by exact content, and
//! resolve slash-separated element paths with a `*/` wildcard.
//!
//! ## Quick Start
//!
//! ```
//! use xmlwalk::search::{Descend, ElementQuery};
//! use xmlwalk::Document;
//!
//! let doc = Document::parse_str(
//!     r#"<settings><server port="80"/><timeout>30</timeout></settings>"#,
//! ).unwrap();
//! let root = doc.root_element().unwrap();
//!
//! let timeout = doc.find_path(root, "timeout").unwrap();
//! assert_eq!(doc.node_text(timeout), Some("30"));
//!
//! let query = ElementQuery::named("server").with_attr("port");
//! let server = doc.find_element(root, root, &query, Descend::Always).unwrap();
//! assert_eq!(doc.attribute(server, "port"), Some("80"));
//! ```

pub mod encoding;
pub mod error;
pub mod parser;
pub mod search;
pub mod tree;

pub use search::{Descend, ElementQuery};
pub use tree::{Attribute, Document, NodeId, NodeKind};
