//! Font theme: seven text styles mapped to font nodes
//!
//! Older files store each slot as a 16-byte identifier (112 bytes), newer
//! ones as 8 bytes (56 bytes). The width is picked from the chunk size.

use std::ops::ControlFlow;

use crate::context::{LoadContext, NodeInfo};
use crate::error::Result;
use crate::gid::Gid;
use crate::guid::{Guid, LONG_GUID_SIZE, SHORT_GUID_SIZE};
use crate::resources::Resource;
use crate::tree::NodeId;

pub const STYLE_COUNT: usize = 7;

/// Text style slots, in on-disk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
    Small,
    H1,
    H2,
    H3,
}

impl FontStyle {
    pub const ALL: [FontStyle; STYLE_COUNT] = [
        FontStyle::Normal,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::Small,
        FontStyle::H1,
        FontStyle::H2,
        FontStyle::H3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Styles tried after this one when its slot is empty
    fn fallbacks(self) -> &'static [FontStyle] {
        use FontStyle::*;
        match self {
            Normal => &[],
            Bold | Italic | Small => &[Normal],
            H1 => &[H2, Bold, Normal],
            H2 => &[H1, Bold, Normal],
            H3 => &[Bold, Normal],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontTheme {
    slots: [Guid; STYLE_COUNT],
    renderers: [Option<NodeId>; STYLE_COUNT],
}

impl FontTheme {
    /// Identifier stored for a style
    pub fn slot(&self, style: FontStyle) -> Guid {
        self.slots[style.index()]
    }

    pub(crate) fn slots(&self) -> [Guid; STYLE_COUNT] {
        self.slots
    }

    pub(crate) fn set_renderers(&mut self, renderers: [Option<NodeId>; STYLE_COUNT]) {
        self.renderers = renderers;
    }

    /// Font node for a style, falling back to related styles and finally
    /// to normal. `None` before prepare or when nothing resolves.
    pub fn renderer(&self, style: FontStyle) -> Option<NodeId> {
        std::iter::once(&style)
            .chain(style.fallbacks())
            .find_map(|s| self.renderers[s.index()])
    }
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let mut info = NodeInfo::default();
    let mut theme = FontTheme::default();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        if chunk.gid == Gid::FONT_THEME_FONT {
            let reader = ctx.reader();
            if chunk.size as usize >= LONG_GUID_SIZE * STYLE_COUNT {
                for slot in &mut theme.slots {
                    *slot = reader.read_long_guid()?;
                }
            } else {
                let count = (chunk.size as usize / SHORT_GUID_SIZE).min(STYLE_COUNT);
                for slot in &mut theme.slots[..count] {
                    *slot = reader.read_guid()?;
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(ctx
        .tree_mut()
        .insert(info.into_node(Resource::FontTheme(theme))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_with(resolved: &[FontStyle]) -> FontTheme {
        let mut tree = crate::tree::ResourceTree::new();
        let mut renderers = [None; STYLE_COUNT];
        for &style in resolved {
            let id = tree.insert(crate::tree::Node::new(Resource::Text(Default::default())));
            renderers[style.index()] = Some(id);
        }
        let mut theme = FontTheme::default();
        theme.set_renderers(renderers);
        theme
    }

    #[test]
    fn test_missing_styles_fall_back_to_normal() {
        let theme = theme_with(&[FontStyle::Normal]);
        let normal = theme.renderer(FontStyle::Normal);
        assert!(normal.is_some());
        for style in FontStyle::ALL {
            assert_eq!(theme.renderer(style), normal, "{style:?}");
        }
    }

    #[test]
    fn test_heading_chain() {
        let theme = theme_with(&[FontStyle::Normal, FontStyle::Bold, FontStyle::H2]);
        let bold = theme.renderer(FontStyle::Bold);
        let h2 = theme.renderer(FontStyle::H2);
        assert_ne!(bold, h2);
        assert_eq!(theme.renderer(FontStyle::H1), h2);
        assert_eq!(theme.renderer(FontStyle::H3), bold);
        assert_eq!(theme.renderer(FontStyle::Italic), theme.renderer(FontStyle::Normal));
    }

    #[test]
    fn test_unprepared_theme_has_no_renderers() {
        let theme = FontTheme::default();
        assert_eq!(theme.renderer(FontStyle::Normal), None);
    }
}
