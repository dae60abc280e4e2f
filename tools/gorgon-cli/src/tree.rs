//! Tree command - print the resource tree

use std::fmt::Write;

use anyhow::Result;
use clap::Args;
use gorgon_resource::{Link, NodeId, ResourceFile};

use crate::container::{ContainerArgs, describe};

/// Arguments for the tree command
#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub container: ContainerArgs,

    /// Resolve link aliases before printing
    #[arg(long)]
    pub resolve: bool,

    /// Maximum depth to print
    #[arg(long)]
    pub depth: Option<usize>,
}

/// Execute the tree command
pub fn execute(args: TreeArgs) -> Result<()> {
    let mut file = args.container.open()?;
    if args.resolve {
        let stats = file.resolve_links()?;
        tracing::info!(resolved = stats.resolved, dropped = stats.dropped, "Resolved links");
    }
    print!("{}", render(&file, args.depth));
    Ok(())
}

pub fn render(file: &ResourceFile, max_depth: Option<usize>) -> String {
    let mut out = String::new();
    if let Some(root) = file.root() {
        render_node(file, root, Link::Owned, 0, max_depth, &mut out);
    }
    out
}

fn render_node(
    file: &ResourceFile,
    id: NodeId,
    link: Link,
    depth: usize,
    max_depth: Option<usize>,
    out: &mut String,
) {
    let Some(node) = file.get(id) else { return };
    let marker = if link == Link::Shared { "~ " } else { "" };
    let name = if node.name().is_empty() {
        String::new()
    } else {
        format!(" {:?}", node.name())
    };
    let _ = writeln!(
        out,
        "{:indent$}{marker}{} {}{name} ({})",
        "",
        node.resource().kind_name(),
        node.guid(),
        describe(node),
        indent = depth * 2
    );

    // Shared children are owned elsewhere and printed there
    if link == Link::Shared || max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    for child in node.children() {
        render_node(file, child.node, child.link, depth + 1, max_depth, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gorgon_resource::{ChunkWriter, Gid, Guid, LoaderRegistry};
    use std::io::Cursor;

    fn sample() -> ResourceFile {
        let mut w = ChunkWriter::container(Gid(1));
        w.chunk(Gid::FOLDER, |w| {
            w.guid_chunk(Guid::from_u64(1));
            w.chunk(Gid::FOLDER, |w| {
                w.guid_chunk(Guid::from_u64(2));
                w.chunk(Gid::TEXT, |w| {
                    w.guid_chunk(Guid::from_u64(3));
                    w.name_chunk("title");
                    w.chunk(Gid::TEXT_VALUE, |w| w.write_string("Hi"));
                });
            });
            w.chunk(Gid::LINK_NODE, |w| {
                w.guid_chunk(Guid::from_u64(4));
                w.chunk(Gid::LINK_NODE_TARGET, |w| w.write_guid(Guid::from_u64(3)));
            });
        });
        let mut file = ResourceFile::new(LoaderRegistry::game());
        file.load_from_reader(Cursor::new(w.into_bytes())).unwrap();
        file
    }

    #[test]
    fn test_render_before_and_after_resolution() {
        let mut file = sample();
        let before = render(&file, None);
        assert_eq!(
            before,
            "folder 0000000000000001 (2 children)\n\
             \x20 folder 0000000000000002 (1 children)\n\
             \x20   text 0000000000000003 \"title\" (\"Hi\")\n\
             \x20 link 0000000000000004 (-> 0000000000000003)\n"
        );

        file.resolve_links().unwrap();
        let after = render(&file, None);
        assert!(after.ends_with("  ~ text 0000000000000003 \"title\" (\"Hi\")\n"));
    }

    #[test]
    fn test_depth_limit() {
        let file = sample();
        assert_eq!(render(&file, Some(0)).lines().count(), 1);
        assert_eq!(render(&file, Some(1)).lines().count(), 3);
    }
}
