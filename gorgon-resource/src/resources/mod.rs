//! Built-in resource kinds
//!
//! The set of node payloads is closed ([`Resource`]); the set of chunk
//! tags is not. A custom loader registered for an unknown tag can produce
//! any variant, usually [`Resource::Raw`].

pub mod animation;
pub mod data;
pub mod folder;
pub mod font;
pub mod font_theme;
pub mod image;
pub mod link_alias;
pub mod raw;
pub mod sound;
pub mod text;

pub use animation::Animation;
pub use data::{DataArray, DataItem, DataLink};
pub use folder::Folder;
pub use font::Font;
pub use font_theme::{FontStyle, FontTheme};
pub use image::{ColorMode, Image, Payload};
pub use link_alias::LinkAlias;
pub use raw::Raw;
pub use sound::{Sound, WaveFormat};
pub use text::Text;

use crate::gid::Gid;

/// Typed payload of a resource node
#[derive(Debug)]
pub enum Resource {
    Folder(Folder),
    LinkAlias(LinkAlias),
    Text(Text),
    Image(Image),
    Data(DataArray),
    Sound(Sound),
    Animation(Animation),
    Font(Font),
    FontTheme(FontTheme),
    Raw(Raw),
}

macro_rules! accessors {
    ($($variant:ident => $ty:ty, $get:ident, $get_mut:ident;)*) => {
        $(
            pub fn $get(&self) -> Option<&$ty> {
                match self {
                    Resource::$variant(r) => Some(r),
                    _ => None,
                }
            }

            pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Resource::$variant(r) => Some(r),
                    _ => None,
                }
            }
        )*
    };
}

impl Resource {
    /// Tag identifying the concrete kind
    pub fn gid(&self) -> Gid {
        match self {
            Resource::Folder(_) => Gid::FOLDER,
            Resource::LinkAlias(_) => Gid::LINK_NODE,
            Resource::Text(_) => Gid::TEXT,
            Resource::Image(_) => Gid::IMAGE,
            Resource::Data(_) => Gid::DATA,
            Resource::Sound(_) => Gid::SOUND,
            Resource::Animation(_) => Gid::ANIMATION,
            Resource::Font(_) => Gid::FONT,
            Resource::FontTheme(_) => Gid::FONT_THEME,
            Resource::Raw(raw) => raw.gid,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Resource::Folder(_) => "folder",
            Resource::LinkAlias(_) => "link",
            Resource::Text(_) => "text",
            Resource::Image(_) => "image",
            Resource::Data(_) => "data",
            Resource::Sound(_) => "sound",
            Resource::Animation(_) => "animation",
            Resource::Font(_) => "font",
            Resource::FontTheme(_) => "font-theme",
            Resource::Raw(_) => "raw",
        }
    }

    pub fn is_link_alias(&self) -> bool {
        matches!(self, Resource::LinkAlias(_))
    }

    accessors! {
        Folder => Folder, as_folder, as_folder_mut;
        LinkAlias => LinkAlias, as_link_alias, as_link_alias_mut;
        Text => Text, as_text, as_text_mut;
        Image => Image, as_image, as_image_mut;
        Data => DataArray, as_data, as_data_mut;
        Sound => Sound, as_sound, as_sound_mut;
        Animation => Animation, as_animation, as_animation_mut;
        Font => Font, as_font, as_font_mut;
        FontTheme => FontTheme, as_font_theme, as_font_theme_mut;
        Raw => Raw, as_raw, as_raw_mut;
    }
}
