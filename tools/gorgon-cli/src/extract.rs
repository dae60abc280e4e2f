//! Extract command - write an image resource out as PNG

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use gorgon_resource::{Guid, NodeId, ResourceFile};
use tracing::info;

use crate::container::{ContainerArgs, parse_guid};

/// Arguments for the extract command
#[derive(Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub container: ContainerArgs,

    /// Image identifier in hex
    #[arg(value_parser = parse_guid)]
    pub guid: Guid,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute the extract command
pub fn execute(args: ExtractArgs) -> Result<()> {
    let mut file = args.container.open()?;
    file.resolve_links()?;
    let id = image_node(&file, args.guid)?;
    if !file.load_image(id) {
        bail!("Could not load pixels for image {}", args.guid);
    }
    let Some(image) = file.get(id).and_then(|node| node.resource().as_image()) else {
        bail!("{} is not an image", args.guid);
    };
    let Some(rgba) = image.to_rgba8() else {
        bail!("Image {} has no convertible pixels", args.guid);
    };

    image::save_buffer(
        &args.output,
        &rgba,
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "Wrote {}x{} image to {}",
        image.width(),
        image.height(),
        args.output.display()
    );
    Ok(())
}

/// Node of the image named by `guid`
fn image_node(file: &ResourceFile, guid: Guid) -> Result<NodeId> {
    let Some(id) = file.find(guid) else {
        bail!("No node with identifier {guid}");
    };
    let Some(node) = file.get(id) else {
        bail!("No node with identifier {guid}");
    };
    if node.resource().as_image().is_none() {
        bail!("{guid} is a {}, not an image", node.resource().kind_name());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gorgon_resource::{ChunkWriter, ColorMode, Gid, LoaderRegistry};
    use std::io::Cursor;

    fn sample() -> ResourceFile {
        let mut w = ChunkWriter::container(Gid(1));
        w.chunk(Gid::FOLDER, |w| {
            w.chunk(Gid::IMAGE, |w| {
                w.guid_chunk(Guid::from_u64(1));
                w.chunk(Gid::IMAGE_PROPS, |w| {
                    w.write_i32(1);
                    w.write_i32(1);
                    w.write_u32(ColorMode::ALPHA.0);
                    w.write_i32(0);
                });
                w.chunk(Gid::IMAGE_DATA, |w| w.write_u8(0x80));
            });
            w.chunk(Gid::TEXT, |w| w.guid_chunk(Guid::from_u64(2)));
            w.chunk(Gid::LINK_NODE, |w| {
                w.guid_chunk(Guid::from_u64(3));
                w.chunk(Gid::LINK_NODE_TARGET, |w| w.write_guid(Guid::from_u64(1)));
            });
        });
        let mut file = ResourceFile::new(LoaderRegistry::game());
        file.load_from_reader(Cursor::new(w.into_bytes())).unwrap();
        file
    }

    #[test]
    fn test_non_image_is_rejected_by_kind() {
        let file = sample();
        let err = image_node(&file, Guid::from_u64(2)).unwrap_err();
        assert_eq!(err.to_string(), "0000000000000002 is a text, not an image");
        assert!(image_node(&file, Guid::from_u64(9)).is_err());
    }

    #[test]
    fn test_alias_resolves_to_image() {
        let mut file = sample();
        file.resolve_links().unwrap();
        let image = image_node(&file, Guid::from_u64(1)).unwrap();
        assert_eq!(image_node(&file, Guid::from_u64(3)).unwrap(), image);
    }
}
