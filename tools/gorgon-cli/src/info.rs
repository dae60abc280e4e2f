//! Info command - header fields and node counts

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use gorgon_resource::ResourceFile;

use crate::container::ContainerArgs;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub container: ContainerArgs,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let file = args.container.open()?;
    print!("{}", render(&file));
    Ok(())
}

fn render(file: &ResourceFile) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut late = 0;
    for (_, node) in file.tree().iter() {
        *counts.entry(node.resource().kind_name()).or_default() += 1;
        if node.resource().as_image().is_some_and(|i| !i.is_loaded()) {
            late += 1;
        }
    }

    let mut out = String::new();
    if let Some(path) = file.path() {
        out.push_str(&format!("file:      {}\n", path.display()));
    }
    if let Some(version) = file.file_version() {
        out.push_str(&format!("version:   {version:#010x}\n"));
    }
    if let Some(file_type) = file.file_type() {
        out.push_str(&format!("type:      {file_type}\n"));
    }
    out.push_str(&format!("nodes:     {}\n", file.tree().len()));
    for (kind, count) in &counts {
        out.push_str(&format!("  {kind:<12} {count}\n"));
    }
    out.push_str(&format!("unloaded images: {late}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gorgon_resource::{ChunkWriter, Gid, Guid, LoaderRegistry};
    use std::io::Cursor;

    #[test]
    fn test_render_counts_kinds() {
        let mut w = ChunkWriter::container(Gid(7));
        w.chunk(Gid::FOLDER, |w| {
            for id in 1..=2u64 {
                w.chunk(Gid::TEXT, |w| w.guid_chunk(Guid::from_u64(id)));
            }
        });
        let mut file = ResourceFile::new(LoaderRegistry::game());
        file.load_from_reader(Cursor::new(w.into_bytes())).unwrap();

        let text = render(&file);
        assert!(text.contains("type:      0x00000007"));
        assert!(text.contains("nodes:     3"));
        assert!(text.contains("  folder       1"));
        assert!(text.contains("  text         2"));
    }
}
