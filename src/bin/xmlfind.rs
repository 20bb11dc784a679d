//! Command-line front end for walking and searching markup documents.
//!
//! Loads each input file and runs the requested lookups against it: path
//! resolution, element search, text search, or a full forward/backward walk.
//! Every node found is printed on its own line.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgGroup, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xmlwalk::encoding::decode_to_utf8;
use xmlwalk::parser::{self, LeafType, ParseOptions};
use xmlwalk::search::{parse_path, Descend, ElementQuery};
use xmlwalk::{Document, NodeId, NodeKind};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlfind -- walk and search markup documents.
#[derive(Parser, Debug)]
#[command(name = "xmlfind", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["path", "element", "attr", "text", "walk", "walk_reverse"])
))]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Files to search (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    // -- Lookups -----------------------------------------------------------
    /// Resolve a slash-separated element path from the document node,
    /// e.g. `config/*/port`.
    #[arg(long, value_name = "PATH")]
    path: Option<String>,

    /// Find elements with this name (`*` for any name).
    #[arg(long, value_name = "NAME")]
    element: Option<String>,

    /// Find elements carrying this attribute.
    #[arg(long, value_name = "NAME")]
    attr: Option<String>,

    /// Require the `--attr` attribute to have exactly this value.
    #[arg(long, value_name = "VALUE", requires = "attr")]
    value: Option<String>,

    /// Find text nodes whose content is exactly this string.
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Search the whole root element (`always`) or only its direct
    /// children (`first`).
    #[arg(long, value_enum, default_value_t = DescendArg::Always)]
    descend: DescendArg,

    /// Print every match instead of only the first.
    #[arg(long)]
    all: bool,

    /// Print every node in document order.
    #[arg(long, conflicts_with = "walk_reverse")]
    walk: bool,

    /// Print every node in reverse document order.
    #[arg(long = "walk-reverse")]
    walk_reverse: bool,

    // -- Loading options ---------------------------------------------------
    /// Drop whitespace-only character data.
    #[arg(long)]
    noblanks: bool,

    /// Node kind used for character data.
    #[arg(long, value_enum, default_value_t = LeafArg::Text)]
    leaf_type: LeafArg,

    // -- Diagnostics -------------------------------------------------------
    /// Log loader activity to stderr.
    #[arg(long)]
    verbose: bool,

    /// Print timing information for loading and searching.
    #[arg(long)]
    timing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DescendArg {
    Always,
    First,
}

impl From<DescendArg> for Descend {
    fn from(arg: DescendArg) -> Self {
        match arg {
            DescendArg::Always => Descend::Always,
            DescendArg::First => Descend::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LeafArg {
    Text,
    Opaque,
    Integer,
    Real,
}

impl From<LeafArg> for LeafType {
    fn from(arg: LeafArg) -> Self {
        match arg {
            LeafArg::Text => LeafType::Text,
            LeafArg::Opaque => LeafType::Opaque,
            LeafArg::Integer => LeafType::Integer,
            LeafArg::Real => LeafType::Real,
        }
    }
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_NO_MATCH: u8 = 2;
const EXIT_INVALID_PATH: u8 = 3;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(path) = &cli.path {
        if let Err(e) = parse_path(path) {
            eprintln!("invalid path '{path}': {e}");
            return ExitCode::from(EXIT_INVALID_PATH);
        }
    }

    let mut worst_exit = EXIT_SUCCESS;
    for file in &cli.files {
        worst_exit = worst_exit.max(process_file(&cli, file));
    }
    ExitCode::from(worst_exit)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads one input and runs every requested lookup against it.
fn process_file(cli: &Cli, filename: &str) -> u8 {
    let start_load = Instant::now();
    let doc = match load(cli, filename) {
        Ok(doc) => doc,
        Err(msg) => {
            eprintln!("{filename}: {msg}");
            return EXIT_PARSE_ERROR;
        }
    };
    if cli.timing {
        eprintln!("Loading {filename} took {:?}", start_load.elapsed());
    }

    let start_search = Instant::now();
    let mut found_all = true;
    let top = doc.root();
    let descend = Descend::from(cli.descend);

    if let Some(path) = &cli.path {
        debug!(path = path.as_str(), "resolving path");
        let found = doc.find_path(top, path);
        found_all &= report(filename, &doc, found.into_iter());
    }

    if cli.element.is_some() || cli.attr.is_some() {
        let query = ElementQuery {
            name: cli.element.as_deref().filter(|&name| name != "*"),
            attr: cli.attr.as_deref(),
            value: cli.value.as_deref(),
        };
        let found = search_root_element(&doc, cli.all, descend, |from, scope, mode| {
            doc.find_element(from, scope, &query, mode)
        });
        found_all &= report(filename, &doc, found.into_iter());
    }

    if let Some(text) = &cli.text {
        let found = search_root_element(&doc, cli.all, descend, |from, scope, mode| {
            doc.find_element_text(from, scope, text, mode)
        });
        found_all &= report(filename, &doc, found.into_iter());
    }

    if cli.walk {
        let nodes = resume(true, doc.walk_next(top, top, Descend::Always), |prev| {
            doc.walk_next(prev, top, Descend::Always)
        });
        print_walk(&doc, &nodes);
    }

    if cli.walk_reverse {
        let last = last_descendant(&doc, top);
        let nodes = resume(true, last, |prev| doc.walk_prev(prev, top, Descend::Always));
        print_walk(&doc, &nodes);
    }

    if cli.timing {
        eprintln!("Searching took {:?}", start_search.elapsed());
    }

    if found_all {
        EXIT_SUCCESS
    } else {
        EXIT_NO_MATCH
    }
}

// ---------------------------------------------------------------------------
// Input reading and loading
// ---------------------------------------------------------------------------

/// Reads input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<Vec<u8>> {
    if filename == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(filename)
    }
}

fn load(cli: &Cli, filename: &str) -> Result<Document, String> {
    let bytes = read_input(filename).map_err(|e| format!("failed to read: {e}"))?;
    let text = decode_to_utf8(&bytes).map_err(|e| e.to_string())?;
    let opts = ParseOptions::default()
        .no_blanks(cli.noblanks)
        .leaf_type(cli.leaf_type.into());
    parser::parse_str_with_options(&text, &opts).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Enumeration and output
// ---------------------------------------------------------------------------

/// Collects `first` and, when `all` is set, every node reached by feeding
/// the previous result back into `next`.
fn resume(
    all: bool,
    first: Option<NodeId>,
    mut next: impl FnMut(NodeId) -> Option<NodeId>,
) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = first.into_iter().collect();
    if all {
        while let Some(prev) = out.last().copied() {
            match next(prev) {
                Some(node) => out.push(node),
                None => break,
            }
        }
    }
    out
}

/// Runs a search scoped to the root element, resuming from each match with
/// the policy's resume mode when `all` is set.
fn search_root_element(
    doc: &Document,
    all: bool,
    descend: Descend,
    mut search: impl FnMut(NodeId, NodeId, Descend) -> Option<NodeId>,
) -> Vec<NodeId> {
    let Some(scope) = doc.root_element() else {
        return Vec::new();
    };
    let first = search(scope, scope, descend);
    resume(all, first, |prev| search(prev, scope, descend.resume()))
}

/// The node a backward walk over `top` starts from.
fn last_descendant(doc: &Document, top: NodeId) -> Option<NodeId> {
    let mut node = doc.last_child(top)?;
    while let Some(last) = doc.last_child(node) {
        node = last;
    }
    Some(node)
}

/// Prints matches; returns `false` (after a note on stderr) if there were none.
fn report(filename: &str, doc: &Document, found: impl Iterator<Item = NodeId>) -> bool {
    let mut any = false;
    for node in found {
        any = true;
        println!("{}", describe(doc, node));
    }
    if !any {
        eprintln!("{filename}: no match");
    }
    any
}

fn print_walk(doc: &Document, nodes: &[NodeId]) {
    for &node in nodes {
        // Skip the node itself and the document node.
        let depth = doc.ancestors(node).count().saturating_sub(2);
        println!("{}{}", "  ".repeat(depth), describe(doc, node));
    }
}

/// One-line description of a node.
fn describe(doc: &Document, node: NodeId) -> String {
    match &doc.node(node).kind {
        NodeKind::Element { name, attributes } => {
            let mut out = format!("element {name}");
            for attr in attributes {
                let _ = write!(out, " {}=\"{}\"", attr.name, attr.value);
            }
            out
        }
        NodeKind::Text { content }
        | NodeKind::Opaque { content }
        | NodeKind::CData { content }
        | NodeKind::Comment { content } => {
            format!("{} {content:?}", doc.node(node).kind.label())
        }
        NodeKind::Integer { value } => format!("integer {value}"),
        NodeKind::Real { value } => format!("real {value}"),
        NodeKind::Document => "document".to_string(),
    }
}
