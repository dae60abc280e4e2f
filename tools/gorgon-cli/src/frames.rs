//! Frames command - frame lookup for an animation

use anyhow::{Context, Result, bail};
use clap::Args;
use gorgon_resource::Guid;

use crate::container::{ContainerArgs, parse_guid};

/// Arguments for the frames command
#[derive(Args)]
pub struct FramesArgs {
    #[command(flatten)]
    pub container: ContainerArgs,

    /// Animation identifier in hex
    #[arg(value_parser = parse_guid)]
    pub animation: Guid,

    /// Time in milliseconds; omit to list every frame
    #[arg(short, long)]
    pub time: Option<u32>,
}

/// Execute the frames command
pub fn execute(args: FramesArgs) -> Result<()> {
    let file = args.container.open()?;
    let Some(id) = file.find(args.animation) else {
        bail!("No node with identifier {}", args.animation);
    };
    let Some(node) = file.get(id) else {
        bail!("No node with identifier {}", args.animation);
    };
    let Some(anim) = node.resource().as_animation() else {
        bail!(
            "{} is a {}, not an animation",
            args.animation,
            node.resource().kind_name()
        );
    };

    match args.time {
        Some(t) => {
            let frame = anim
                .frame_at(t)
                .with_context(|| format!("Frame lookup failed at {t} ms"))?;
            let image = file.frame_image(id, t)?;
            let image_guid = image
                .and_then(|image| file.get(image))
                .map(|image| image.guid().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("frame {frame} image {image_guid}");
        }
        None => {
            println!("{} frames, {} ms", anim.frames().len(), anim.total_length());
            for (i, frame) in anim.frames().frames().iter().enumerate() {
                println!("{i:>4} start {:>6} duration {:>6}", frame.start, frame.duration);
            }
        }
    }
    Ok(())
}
