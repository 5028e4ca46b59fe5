use clap::Parser;
use kiroku::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;

/// A CLI tool to generate a synthetic workflow history store for kiroku
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated store JSON file to
    #[arg(short, long, default_value = "generated_store.json")]
    output: String,

    /// The workflow id to generate history for
    #[arg(long, default_value = "demo-workflow")]
    workflow: String,

    /// How many versions to generate
    #[arg(long, default_value_t = 12)]
    versions: usize,

    /// Pin roughly one in this many versions (0 disables pinning)
    #[arg(long, default_value_t = 5)]
    pin_every: usize,
}

const NODE_TYPES: &[&str] = &[
    "core.flow.start",
    "core.flow.end",
    "core.logic.branch",
    "core.logic.merge",
    "io.http.request",
    "io.mail.send",
    "transform.data.map",
    "transform.data.filter",
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.versions == 0 {
        eprintln!("Error: --versions must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating {} versions for workflow '{}'...",
        cli.versions, cli.workflow
    );

    let mut store = VersionStore::new();
    let mut graph = Graph::new();
    let mut next_node = 0usize;

    for round in 0..cli.versions {
        mutate_graph(&mut rng, &mut graph, &mut next_node);

        let save_type = if round == 0 || rng.random_bool(0.4) {
            SaveType::Manual
        } else {
            SaveType::Autosave
        };
        let version = store.save_version(&cli.workflow, &graph, save_type, None);

        if cli.pin_every > 0 && version.version_number as usize % cli.pin_every == 0 {
            store.pin_version(&version.id, true);
        }
    }

    store.snapshot().save(&cli.output)?;

    println!(
        "Successfully generated and saved {} versions to '{}'",
        store.get_versions(&cli.workflow).len(),
        cli.output
    );
    Ok(())
}

/// Applies one round of random edits: mostly node additions with occasional
/// edge wiring and payload tweaks.
fn mutate_graph(rng: &mut ThreadRng, graph: &mut Graph, next_node: &mut usize) {
    let additions = rng.random_range(1..=3);
    for _ in 0..additions {
        let node_type = NODE_TYPES[rng.random_range(0..NODE_TYPES.len())];
        let id = format!("node-{}", *next_node);
        *next_node += 1;

        let mut node = Node::new(&id, node_type);
        node.data
            .insert("label".to_string(), json!(format!("Step {}", *next_node)));
        node.data
            .insert("timeout".to_string(), json!(rng.random_range(5..120)));
        node.ui_properties = json!({
            "position": {
                "x": rng.random_range(0..1600),
                "y": rng.random_range(0..900),
            }
        });
        graph.nodes.push(node);

        // Wire the new node to a random existing one.
        if graph.nodes.len() > 1 {
            let source_index = rng.random_range(0..graph.nodes.len() - 1);
            let source = graph.nodes[source_index].id.clone();
            let edge_id = format!("edge-{}-{}", source, id);
            graph.edges.push(Edge::new(edge_id, source, id.clone()));
        }
    }

    // Occasionally tweak an existing node's payload so diffs report
    // modifications, not just additions.
    if !graph.nodes.is_empty() && rng.random_bool(0.5) {
        let index = rng.random_range(0..graph.nodes.len());
        let tweaked = rng.random_range(5..120);
        graph.nodes[index]
            .data
            .insert("timeout".to_string(), json!(tweaked));
    }
}
