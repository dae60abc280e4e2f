//! Per-load parsing state handed to resource loaders

use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::codec::CodecRegistry;
use crate::error::{Error, Result};
use crate::gid::Gid;
use crate::guid::Guid;
use crate::options::LoadOptions;
use crate::reader::{ChunkHeader, ChunkReader};
use crate::registry::LoaderRegistry;
use crate::resources::Resource;
use crate::tree::{Node, NodeId, ResourceTree};

/// Deepest chunk nesting [`LoadContext::load_object`] accepts
pub const MAX_NESTING_DEPTH: usize = 128;

/// State shared by every loader during one container parse
///
/// Loaders read their fields through [`reader`](Self::reader), build nodes
/// into [`tree_mut`](Self::tree_mut) and hand nested chunks back to the
/// registry with [`load_object`](Self::load_object).
pub struct LoadContext<'a> {
    reader: ChunkReader<'a>,
    registry: &'a LoaderRegistry,
    codecs: &'a Arc<CodecRegistry>,
    options: &'a LoadOptions,
    source: Option<Arc<Path>>,
    tree: ResourceTree,
    current: Gid,
    depth: usize,
}

impl<'a> LoadContext<'a> {
    pub(crate) fn new(
        reader: ChunkReader<'a>,
        registry: &'a LoaderRegistry,
        codecs: &'a Arc<CodecRegistry>,
        options: &'a LoadOptions,
        source: Option<Arc<Path>>,
    ) -> Self {
        Self {
            reader,
            registry,
            codecs,
            options,
            source,
            tree: ResourceTree::new(),
            current: Gid::NONE,
            depth: 0,
        }
    }

    pub fn reader(&mut self) -> &mut ChunkReader<'a> {
        &mut self.reader
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ResourceTree {
        &mut self.tree
    }

    pub fn options(&self) -> &LoadOptions {
        self.options
    }

    pub fn codecs(&self) -> &Arc<CodecRegistry> {
        self.codecs
    }

    /// Path of the container being parsed, if it came from a file
    pub fn source(&self) -> Option<&Arc<Path>> {
        self.source.as_ref()
    }

    /// Tag of the chunk whose loader is currently running
    pub fn current_gid(&self) -> Gid {
        self.current
    }

    pub(crate) fn into_tree(self) -> ResourceTree {
        self.tree
    }

    /// Build a node for a chunk through the registry
    ///
    /// Chunks without a registered loader are skipped and yield `None`.
    /// Either way the reader ends up at the chunk's end. Objects nested
    /// deeper than [`MAX_NESTING_DEPTH`] fail with [`Error::NestingTooDeep`].
    pub fn load_object(&mut self, chunk: &ChunkHeader) -> Result<Option<NodeId>> {
        let registry = self.registry;
        let Some(loader) = registry.get(chunk.gid) else {
            trace!(gid = %chunk.gid, size = chunk.size, "Skipping unknown chunk");
            self.reader.finish_chunk(chunk)?;
            return Ok(None);
        };

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep {
                offset: chunk.offset,
                limit: MAX_NESTING_DEPTH,
            });
        }

        trace!(gid = %chunk.gid, offset = chunk.offset, size = chunk.size, "Loading chunk");
        let outer = std::mem::replace(&mut self.current, chunk.gid);
        self.depth += 1;
        let result = loader.load(self, chunk.size);
        self.depth -= 1;
        self.current = outer;
        let id = result?;
        self.reader.finish_chunk(chunk)?;
        Ok(Some(id))
    }

    /// Run `handler` for every sub-chunk of a `size`-byte payload
    ///
    /// The reader is left at each sub-chunk's end after its handler returns,
    /// whatever the handler consumed. Returning `ControlFlow::Break` skips the
    /// rest of the payload.
    pub fn for_each_chunk<F>(&mut self, size: u32, mut handler: F) -> Result<()>
    where
        F: FnMut(&mut Self, &ChunkHeader) -> Result<ControlFlow<()>>,
    {
        let end = self.reader.chunk_end(size)?;
        while self.reader.position() < end {
            let chunk = self.reader.read_chunk_header_within(end)?;
            let flow = handler(self, &chunk)?;
            self.reader.finish_chunk(&chunk)?;
            if flow.is_break() {
                self.reader.skip_to(end)?;
                break;
            }
        }
        Ok(())
    }
}

/// Identifier and name gathered from a node's common chunks
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    pub guid: Guid,
    pub name: String,
}

impl NodeInfo {
    /// Consume a common chunk (`Guid`, `SGuid`, `Name`)
    ///
    /// Returns `false` without reading anything for other tags.
    pub fn read_common(&mut self, reader: &mut ChunkReader<'_>, chunk: &ChunkHeader) -> Result<bool> {
        match chunk.gid {
            Gid::GUID => self.guid = reader.read_guid_sized(chunk.size)?,
            Gid::SGUID => self.guid = reader.read_guid()?,
            Gid::NAME => self.name = reader.read_fixed_string(chunk.size as usize)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn into_node(self, resource: Resource) -> Node {
        Node::new(resource).with_guid(self.guid).with_name(self.name)
    }
}
