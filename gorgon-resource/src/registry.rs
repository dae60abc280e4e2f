//! Loader registry
//!
//! Maps chunk tags to factories that build resource nodes. Containers never
//! consult a global table; each [`ResourceFile`](crate::ResourceFile) is
//! given its own registry, so differently configured containers can coexist.
//!
//! Registration is layered:
//!
//! - [`LoaderRegistry::basic`]: folder, link alias, text, image, data array
//! - [`LoaderRegistry::extended`]: basic + sound
//! - [`LoaderRegistry::game`]: extended + animation, font, font theme
//!
//! Registering a tag that already has a loader replaces it. The replacement
//! is logged at debug level so plugin overrides remain visible.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::debug;

use crate::context::LoadContext;
use crate::error::Result;
use crate::gid::Gid;
use crate::resources;
use crate::tree::NodeId;

/// Factory that builds a node from a chunk payload
///
/// The reader is positioned at the first payload byte; `size` is the
/// declared payload length. The loader may stop short of `size`; the caller
/// skips any unread remainder.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId>;
}

impl<F> ResourceLoader for F
where
    F: Fn(&mut LoadContext<'_>, u32) -> Result<NodeId> + Send + Sync,
{
    fn load(&self, ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
        self(ctx, size)
    }
}

/// Table of resource loaders keyed by chunk tag
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<Gid, Arc<dyn ResourceLoader>>,
}

impl LoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the basic layer
    pub fn basic() -> Self {
        let mut registry = Self::new();
        registry.register_basic();
        registry
    }

    /// Registry with the basic and extended layers
    pub fn extended() -> Self {
        let mut registry = Self::new();
        registry.register_extended();
        registry
    }

    /// Registry with every built-in loader
    pub fn game() -> Self {
        let mut registry = Self::new();
        registry.register_game();
        registry
    }

    /// Register a loader, replacing any previous loader for `gid`.
    pub fn register<L>(&mut self, gid: Gid, loader: L) -> &mut Self
    where
        L: ResourceLoader + 'static,
    {
        if self.loaders.insert(gid, Arc::new(loader)).is_some() {
            debug!(%gid, "Replaced existing resource loader");
        }
        self
    }

    /// Remove the loader for `gid`; its chunks will be skipped.
    pub fn unregister(&mut self, gid: Gid) -> bool {
        self.loaders.remove(&gid).is_some()
    }

    pub fn register_basic(&mut self) -> &mut Self {
        self.register(Gid::FOLDER, resources::folder::load)
            .register(Gid::LINK_NODE, resources::link_alias::load)
            .register(Gid::TEXT, resources::text::load)
            .register(Gid::IMAGE, resources::image::load)
            .register(Gid::DATA, resources::data::load)
    }

    pub fn register_extended(&mut self) -> &mut Self {
        self.register_basic()
            .register(Gid::SOUND, resources::sound::load)
    }

    pub fn register_game(&mut self) -> &mut Self {
        self.register_extended()
            .register(Gid::ANIMATION, resources::animation::load)
            .register(Gid::FONT, resources::font::load)
            .register(Gid::FONT_THEME, resources::font_theme::load)
    }

    /// Find the loader for a tag
    pub fn get(&self, gid: Gid) -> Option<&dyn ResourceLoader> {
        self.loaders.get(&gid).map(|l| l.as_ref())
    }

    pub fn contains(&self, gid: Gid) -> bool {
        self.loaders.contains_key(&gid)
    }

    /// Registered tags in ascending order
    pub fn gids(&self) -> Vec<Gid> {
        let mut gids: Vec<_> = self.loaders.keys().copied().collect();
        gids.sort();
        gids
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("gids", &self.gids())
            .finish()
    }
}
