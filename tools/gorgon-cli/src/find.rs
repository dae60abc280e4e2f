//! Find command - locate a node by identifier

use anyhow::{Result, bail};
use clap::Args;
use gorgon_resource::{NodeId, ResourceFile};

use crate::container::{ContainerArgs, describe, parse_guid};

/// Arguments for the find command
#[derive(Args)]
pub struct FindArgs {
    #[command(flatten)]
    pub container: ContainerArgs,

    /// Identifier in hex
    #[arg(value_parser = parse_guid)]
    pub guid: gorgon_resource::Guid,

    /// Resolve link aliases before searching
    #[arg(long)]
    pub resolve: bool,
}

/// Execute the find command
pub fn execute(args: FindArgs) -> Result<()> {
    let mut file = args.container.open()?;
    if args.resolve {
        file.resolve_links()?;
    }
    let Some(id) = file.find(args.guid) else {
        bail!("No node with identifier {}", args.guid);
    };
    println!("{}", node_path(&file, id));
    if let Some(node) = file.get(id) {
        println!("{} {}", node.resource().kind_name(), describe(node));
    }
    Ok(())
}

/// Slash-separated identifiers from the root down to `id`
fn node_path(file: &ResourceFile, id: NodeId) -> String {
    let mut parts = Vec::new();
    let mut current = Some(id);
    while let Some(node_id) = current {
        let Some(node) = file.get(node_id) else { break };
        if node.name().is_empty() {
            parts.push(node.guid().to_string());
        } else {
            parts.push(node.name().to_string());
        }
        current = node.parent();
    }
    parts.reverse();
    format!("/{}", parts.join("/"))
}
