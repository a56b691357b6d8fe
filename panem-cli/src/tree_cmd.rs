//! Tree command - admit districts and print the elimination tree

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use panem_core::{DistrictId, EliminationTree, NodeId, Tournament, TournamentConfig};

use crate::run_cmd::load_setup;

#[derive(Args)]
pub struct TreeArgs {
    /// Setup file (districts, then persons)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Admit only these districts, in this order (default: whole catalog)
    #[arg(long, value_delimiter = ',')]
    pub admit: Vec<DistrictId>,

    /// Districts to eliminate after admission
    #[arg(long, value_delimiter = ',')]
    pub eliminate: Vec<DistrictId>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(serde::Serialize)]
struct TreeSummary {
    pre_order: Vec<DistrictId>,
    in_order: Vec<DistrictId>,
    depth: usize,
    /// Districts left in the catalog
    pending: Vec<DistrictId>,
}

pub fn run(args: TreeArgs) -> Result<()> {
    let setup = load_setup(&args.input)?;
    let mut tournament = Tournament::from_setup(setup, TournamentConfig::default());

    if args.admit.is_empty() {
        tournament.admit_all();
    } else {
        for &id in &args.admit {
            tournament.admit_district(id)?;
        }
    }

    for &id in &args.eliminate {
        if tournament.eliminate_district(id).is_none() {
            tracing::warn!("District {} is not in the tree", id);
        }
    }

    let tree = tournament.tree();
    let summary = TreeSummary {
        pre_order: tree.pre_order_ids(),
        in_order: tree.in_order_ids(),
        depth: tree.depth(),
        pending: tournament.catalog().ids(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(tree));
        println!("Pre-order: {:?}", summary.pre_order);
        println!("In-order:  {:?}", summary.in_order);
        println!("Depth:     {}", summary.depth);
        if !summary.pending.is_empty() {
            println!("Pending:   {:?}", summary.pending);
        }
    }

    Ok(())
}

/// Sideways drawing, right subtree on top
fn render(tree: &EliminationTree) -> String {
    let mut out = String::new();
    match tree.root() {
        Some(root) => render_node(tree, root, 0, &mut out),
        None => out.push_str("(empty)\n"),
    }
    out
}

fn render_node(tree: &EliminationTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    if let Some(right) = node.right {
        render_node(tree, right, indent + 1, out);
    }
    out.push_str(&format!(
        "{}{} ({}/{})\n",
        "    ".repeat(indent),
        node.district.id,
        node.district.odd_population().len(),
        node.district.even_population().len()
    ));
    if let Some(left) = node.left {
        render_node(tree, left, indent + 1, out);
    }
}
