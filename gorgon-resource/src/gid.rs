//! Chunk tags (GIDs)
//!
//! Every chunk starts with a 32-bit tag naming its semantic kind. Tags are
//! grouped by the high 16 bits: `0x0101` system nodes, `0x0202` images,
//! `0x0310` animations and so on. Unknown tags are legal in a stream and are
//! skipped by the loader.

use std::fmt;

/// A 32-bit chunk tag; the default is [`Gid::NONE`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gid(pub u32);

impl Gid {
    // =========================================================================
    // Common node chunks
    // =========================================================================

    /// Long (16 byte) node identifier
    pub const GUID: Gid = Gid(0x0000_0010);
    /// Short (8 byte) node identifier
    pub const SGUID: Gid = Gid(0x0000_0011);
    /// Node name, chunk size bytes of text
    pub const NAME: Gid = Gid(0x0000_0012);

    // =========================================================================
    // System nodes
    // =========================================================================

    pub const FOLDER: Gid = Gid(0x0101_0000);
    pub const FOLDER_NAMES: Gid = Gid(0x0101_0101);
    pub const FOLDER_NAME: Gid = Gid(0x0101_0102);
    pub const FOLDER_PROPS: Gid = Gid(0x0101_0103);

    pub const LINK_NODE: Gid = Gid(0x0102_0000);
    pub const LINK_NODE_TARGET: Gid = Gid(0x0102_0010);

    // =========================================================================
    // Basic resources
    // =========================================================================

    pub const TEXT: Gid = Gid(0x0201_0000);
    pub const TEXT_VALUE: Gid = Gid(0x0201_0501);

    pub const IMAGE: Gid = Gid(0x0202_0000);
    pub const IMAGE_PROPS: Gid = Gid(0x0202_0101);
    pub const IMAGE_CMP_PROPS: Gid = Gid(0x0202_0102);
    pub const IMAGE_DATA: Gid = Gid(0x0202_0501);
    pub const IMAGE_PALETTE: Gid = Gid(0x0202_0502);
    pub const IMAGE_CMP_DATA: Gid = Gid(0x0202_0601);

    pub const DATA: Gid = Gid(0x0203_0000);
    pub const DATA_NAMES: Gid = Gid(0x0203_0101);
    pub const DATA_NAME: Gid = Gid(0x0203_0102);
    pub const DATA_TEXT: Gid = Gid(0x0203_0C01);
    pub const DATA_INT: Gid = Gid(0x0203_0C02);
    pub const DATA_FLOAT: Gid = Gid(0x0203_0C03);
    pub const DATA_POINT: Gid = Gid(0x0203_0C04);
    pub const DATA_RECT: Gid = Gid(0x0203_0C05);
    pub const DATA_LINK: Gid = Gid(0x0203_0C07);
    pub const DATA_POINTF: Gid = Gid(0x0203_0C09);
    pub const DATA_COLOR: Gid = Gid(0x0203_0D02);
    pub const DATA_SIZE: Gid = Gid(0x0203_0D03);
    pub const DATA_BOUNDS: Gid = Gid(0x0203_0D04);
    pub const DATA_MARGINS: Gid = Gid(0x0203_0D05);

    // =========================================================================
    // Extended resources
    // =========================================================================

    pub const SOUND: Gid = Gid(0x0401_0000);
    pub const SOUND_PROPS: Gid = Gid(0x0401_0101);
    pub const SOUND_WAVE: Gid = Gid(0x0401_0801);
    pub const SOUND_CMP_WAVE: Gid = Gid(0x0401_0802);
    pub const SOUND_CMP_PROPS: Gid = Gid(0x0401_0803);

    // =========================================================================
    // Game resources
    // =========================================================================

    pub const ANIMATION: Gid = Gid(0x0310_0000);
    pub const ANIMATION_DURATIONS: Gid = Gid(0x0310_0101);
    pub const ANIMATION_IMAGE: Gid = Gid(0x0311_0000);

    pub const FONT: Gid = Gid(0x0320_0000);
    pub const FONT_CHARMAP: Gid = Gid(0x0320_0101);
    pub const FONT_PROPS: Gid = Gid(0x0320_0804);
    pub const FONT_IMAGE: Gid = Gid(0x0321_0000);

    pub const FONT_THEME: Gid = Gid(0x0330_0000);
    pub const FONT_THEME_FONT: Gid = Gid(0x0330_1001);

    // =========================================================================
    // Compression
    // =========================================================================

    /// Uncompressed payload
    pub const NONE: Gid = Gid(0);
    pub const LZMA: Gid = Gid(0xF003_0100);
    pub const JPEG: Gid = Gid(0xF003_0300);
    pub const PNG: Gid = Gid(0xF003_0400);

    /// Short human-readable name for known top-level tags
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Gid::FOLDER => "folder",
            Gid::LINK_NODE => "link",
            Gid::TEXT => "text",
            Gid::IMAGE => "image",
            Gid::DATA => "data",
            Gid::SOUND => "sound",
            Gid::ANIMATION => "animation",
            Gid::ANIMATION_IMAGE => "animation-image",
            Gid::FONT => "font",
            Gid::FONT_IMAGE => "font-image",
            Gid::FONT_THEME => "font-theme",
            Gid::NONE => "none",
            Gid::LZMA => "lzma",
            Gid::JPEG => "jpeg",
            Gid::PNG => "png",
            _ => return None,
        })
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl From<u32> for Gid {
    fn from(value: u32) -> Self {
        Gid(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_padded_hex() {
        assert_eq!(Gid::FOLDER.to_string(), "0x01010000");
        assert_eq!(Gid::SGUID.to_string(), "0x00000011");
        assert_eq!(Gid::PNG.to_string(), "0xF0030400");
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(Gid::default(), Gid::NONE);
    }

    #[test]
    fn test_names() {
        assert_eq!(Gid::FONT_THEME.name(), Some("font-theme"));
        assert_eq!(Gid(0xDEAD_BEEF).name(), None);
    }
}
