//! Shared container arguments and config file handling

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use gorgon_resource::{Guid, LoadOptions, LoaderRegistry, Node, ResourceFile};
use serde::Deserialize;
use tracing::debug;

/// Arguments every command takes to open a container
#[derive(Args, Debug, Clone)]
pub struct ContainerArgs {
    /// Container file to read
    pub file: PathBuf,

    /// TOML file with a [load] section of loader options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Apply legacy folder name lists
    #[arg(long)]
    pub load_names: bool,

    /// Accept image payloads whose size does not match their dimensions
    #[arg(long)]
    pub lenient: bool,
}

/// Config file layout
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub load: LoadOptions,
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}

impl ContainerArgs {
    /// Options from the config file with command-line flags applied on top
    pub fn options(&self) -> Result<LoadOptions> {
        let mut options = match &self.config {
            Some(path) => CliConfig::from_file(path)?.load,
            None => LoadOptions::default(),
        };
        if self.load_names {
            options.load_names = true;
        }
        if self.lenient {
            options.strict_image_size = false;
        }
        Ok(options)
    }

    /// Load the container with every built-in loader
    pub fn open(&self) -> Result<ResourceFile> {
        let options = self.options()?;
        debug!(?options, "Opening container");
        let mut file = ResourceFile::new(LoaderRegistry::game()).with_options(options);
        file.load(&self.file)
            .with_context(|| format!("Failed to load container: {}", self.file.display()))?;
        Ok(file)
    }
}

pub fn parse_guid(text: &str) -> Result<Guid> {
    text.parse::<Guid>()
        .with_context(|| format!("Invalid identifier: {text}"))
}

/// One-line summary of a node's payload
pub fn describe(node: &Node) -> String {
    use gorgon_resource::Resource;

    match node.resource() {
        Resource::Folder(_) => format!("{} children", node.children().len()),
        Resource::LinkAlias(link) => format!("-> {}", link.target),
        Resource::Text(text) => format!("{:?}", text.value),
        Resource::Image(image) => {
            let state = match (image.is_loaded(), image.is_late()) {
                (true, _) => "loaded",
                (false, true) => "late",
                (false, false) => "no pixels",
            };
            let compression = image
                .compression()
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| image.compression().to_string());
            format!(
                "{}x{} {} {} {}",
                image.width(),
                image.height(),
                image.mode(),
                compression,
                state
            )
        }
        Resource::Data(data) => format!("{} items", data.len()),
        Resource::Sound(sound) => format!(
            "{} ch {} Hz {} bytes",
            sound.format.channels,
            sound.format.samples_per_sec,
            sound.data().len()
        ),
        Resource::Animation(anim) => format!(
            "{} frames, {} total",
            anim.frames().len(),
            anim.total_length()
        ),
        Resource::Font(font) => format!(
            "{} glyphs, baseline {}",
            node.children().len(),
            font.baseline
        ),
        Resource::FontTheme(_) => "7 styles".to_string(),
        Resource::Raw(raw) => format!("{} bytes", raw.bytes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_config() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[load]\nfirst_only = true\nstrict_image_size = true").unwrap();

        let args = ContainerArgs {
            file: PathBuf::from("unused.gor"),
            config: Some(tmp.path().to_path_buf()),
            load_names: true,
            lenient: true,
        };
        let options = args.options().unwrap();
        assert!(options.first_only);
        assert!(options.load_names);
        assert!(!options.strict_image_size);
    }

    #[test]
    fn test_missing_config_section_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.load, LoadOptions::default());
    }

    #[test]
    fn test_parse_guid() {
        assert_eq!(parse_guid("ff").unwrap(), Guid::from_u64(0xFF));
        assert!(parse_guid("not hex").is_err());
    }
}
