//! Wattle CLI
//!
//! Parse an HTML file or string and print the resulting tree and parse errors.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::debug;
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use wattle_common::warning::ConsoleReporter;
use wattle_common::{Diagnostic, DiagnosticSink};
use wattle_dom::{DomTree, Namespace, NodeId, NodeType};
use wattle_html::{ParserConfig, parse_document, parse_fragment, print_tree};

#[derive(Parser, Debug)]
#[command(name = "wattle")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree of a file
    wattle ./index.html

    # Parse inline HTML
    wattle --html '<p>1<b>2<i>3</p>4</b>5</i>6'

    # Parse as the contents of a <tr>
    wattle --fragment tr --html '<td>a<td>b'

    # Machine-readable output
    wattle --json ./index.html
"#)]
struct Cli {
    /// Path to the HTML file to parse
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse with the scripting flag enabled (affects <noscript>)
    #[arg(long)]
    scripting: bool,

    /// Parse as a fragment in the context of this HTML element
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Print the tree and parse errors as JSON
    #[arg(long)]
    json: bool,

    /// Maximum depth of the stack of open elements
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Do not print parse errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = match (&cli.html, &cli.path) {
        (Some(html), _) => html.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("either FILE or --html is required"),
    };
    debug!("parsing {} bytes", input.len());

    let mut config = ParserConfig::default()
        .with_scripting(cli.scripting)
        .with_exact_errors(true);
    if let Some(depth) = cli.max_depth {
        config = config.with_max_open_elements(depth);
    }

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let (tree, roots, quirks_mode) = if let Some(context) = &cli.fragment {
        let mut tree = DomTree::new();
        let context = tree.alloc_element(&context.to_ascii_lowercase(), Namespace::Html, Vec::new());
        let fragment = parse_fragment(&input, tree, context, &config, &mut diagnostics)
            .context("fragment parse failed")?;
        let quirks_mode = fragment.sink.quirks_mode();
        (fragment.sink, fragment.nodes, quirks_mode)
    } else {
        let document = parse_document(&input, DomTree::new(), &config, &mut diagnostics)
            .context("document parse failed")?;
        (document.sink, vec![document.root], document.quirks_mode)
    };

    if cli.json {
        let output = json!({
            "quirks_mode": quirks_mode.to_string(),
            "nodes": roots.iter().map(|&id| node_to_json(&tree, id)).collect::<Vec<_>>(),
            "diagnostics": diagnostics,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialize tree")?
        );
        return Ok(());
    }

    println!("=== DOM Tree ({quirks_mode}) ===");
    for &root in &roots {
        print_tree(&tree, root, 0);
    }

    if !cli.quiet && !diagnostics.is_empty() {
        println!("\n=== Parse Errors ===");
        let mut reporter = ConsoleReporter::stderr("HTML");
        for diagnostic in &diagnostics {
            reporter.report(diagnostic.clone());
        }
        println!(
            "{} parse errors ({} distinct)",
            reporter.total().yellow(),
            reporter.distinct()
        );
    }

    Ok(())
}

/// A JSON rendering of the subtree at `id`.
fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let children = || -> Vec<Value> {
        tree.children(id)
            .iter()
            .map(|&child| node_to_json(tree, child))
            .collect()
    };
    match &node.node_type {
        NodeType::Document => json!({ "type": "document", "children": children() }),
        NodeType::DocumentFragment => json!({ "type": "fragment", "children": children() }),
        NodeType::Doctype(data) => json!({
            "type": "doctype",
            "name": data.name,
            "public_id": data.public_id,
            "system_id": data.system_id,
        }),
        NodeType::Element(data) => {
            let attributes: serde_json::Map<String, Value> = data
                .attrs
                .iter()
                .map(|attr| (attr.qualified_name(), Value::String(attr.value.clone())))
                .collect();
            let mut element = json!({
                "type": "element",
                "name": data.tag_name,
                "namespace": data.namespace.url(),
                "attributes": attributes,
                "children": children(),
            });
            if let Some(contents) = data.template_contents {
                element["content"] = node_to_json(tree, contents);
            }
            element
        }
        NodeType::Text(text) => json!({ "type": "text", "data": text }),
        NodeType::Comment(text) => json!({ "type": "comment", "data": text }),
    }
}
