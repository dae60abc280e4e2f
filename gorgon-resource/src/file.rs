//! Container file
//!
//! # Format
//!
//! ```text
//! offset  size  field
//! 0       6     signature "GORGON"
//! 6       4     version (u32 LE), rejected if newer than CURRENT_VERSION
//! 10      4     file type tag, not interpreted
//! 14      4     root chunk tag, must be Folder
//! 18      4     root chunk size
//! 22      ...   root folder payload
//! ```
//!
//! A container goes through three stages: [`load`](ResourceFile::load)
//! parses the chunk stream into a tree, link resolution turns aliases into
//! shared references and [`prepare`](ResourceFile::prepare) binds stored
//! identifiers to nodes and uploads textures.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use tracing::debug;

use crate::codec::CodecRegistry;
use crate::context::LoadContext;
use crate::error::{Error, Result};
use crate::gid::Gid;
use crate::guid::Guid;
use crate::options::LoadOptions;
use crate::reader::{ChunkHeader, ChunkReader};
use crate::redirect::RedirectTable;
use crate::registry::LoaderRegistry;
use crate::tree::{Node, NodeId, ResourceTree};
use crate::{CURRENT_VERSION, SIGNATURE};

/// Fixed container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    pub file_type: Gid,
}

impl FileHeader {
    /// Read and validate the signature, version and file type
    pub fn read(reader: &mut ChunkReader<'_>) -> Result<Self> {
        let mut found = [0u8; 6];
        reader.read_into(&mut found)?;
        if &found != SIGNATURE {
            return Err(Error::Signature { found });
        }

        let version = reader.read_u32()?;
        if version > CURRENT_VERSION {
            return Err(Error::VersionMismatch {
                found: version,
                supported: CURRENT_VERSION,
            });
        }

        let file_type = reader.read_gid()?;
        Ok(Self { version, file_type })
    }
}

/// A loaded resource container
///
/// Each container owns its loader registry, codecs, redirect table and
/// identifier index; nothing is shared between containers.
#[derive(Debug)]
pub struct ResourceFile {
    registry: LoaderRegistry,
    codecs: Arc<CodecRegistry>,
    options: LoadOptions,
    path: Option<Arc<Path>>,
    header: Option<FileHeader>,
    pub(crate) tree: ResourceTree,
    pub(crate) root: Option<NodeId>,
    pub(crate) redirects: RedirectTable,
    index: OnceLock<HashMap<Guid, NodeId>>,
    pub(crate) links_resolved: bool,
    pub(crate) prepared: bool,
}

impl ResourceFile {
    /// Create an empty container that will parse with `registry`.
    pub fn new(registry: LoaderRegistry) -> Self {
        Self {
            registry,
            codecs: Arc::new(CodecRegistry::builtin()),
            options: LoadOptions::default(),
            path: None,
            header: None,
            tree: ResourceTree::new(),
            root: None,
            redirects: RedirectTable::new(),
            index: OnceLock::new(),
            links_resolved: false,
            prepared: false,
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = Arc::new(codecs);
        self
    }

    /// Load a container from disk
    ///
    /// Any previously loaded tree is dropped first. On error nothing of the
    /// new file is kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        self.load_stream(BufReader::new(file), Some(Arc::from(path)))
    }

    /// Load a container from any seekable stream
    ///
    /// Late-loaded images of such a container cannot be fetched later, as
    /// there is no file to reopen.
    pub fn load_from_reader<R: Read + Seek>(&mut self, reader: R) -> Result<()> {
        self.load_stream(reader, None)
    }

    fn load_stream<R: Read + Seek>(&mut self, reader: R, source: Option<Arc<Path>>) -> Result<()> {
        self.unload();

        let mut reader = ChunkReader::new(reader)?;
        let header = FileHeader::read(&mut reader)?;

        let gid = reader.read_gid()?;
        if gid != Gid::FOLDER {
            return Err(Error::MissingRootFolder { found: gid });
        }
        let size = reader.read_u32()?;
        let chunk = ChunkHeader {
            gid,
            size,
            offset: reader.position(),
        };

        let mut ctx = LoadContext::new(
            reader,
            &self.registry,
            &self.codecs,
            &self.options,
            source.clone(),
        );
        let root = ctx
            .load_object(&chunk)?
            .ok_or(Error::MissingRootFolder { found: gid })?;
        let tree = ctx.into_tree();

        debug!(
            path = ?source.as_deref(),
            version = header.version,
            file_type = %header.file_type,
            nodes = tree.len(),
            "Loaded resource container"
        );
        self.tree = tree;
        self.root = Some(root);
        self.header = Some(header);
        self.path = source;
        Ok(())
    }

    /// Drop the loaded tree, redirects and index
    pub fn unload(&mut self) {
        self.tree = ResourceTree::new();
        self.root = None;
        self.header = None;
        self.path = None;
        self.redirects.clear();
        self.index.take();
        self.links_resolved = false;
        self.prepared = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    /// Mutable access to a node
    ///
    /// Drops the identifier index, as the caller may change identifiers.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.invalidate_index();
        self.tree.get_mut(id)
    }

    pub fn redirects(&self) -> &RedirectTable {
        &self.redirects
    }

    pub fn registry(&self) -> &LoaderRegistry {
        &self.registry
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Path the container was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file_version(&self) -> Option<u32> {
        self.header.map(|h| h.version)
    }

    pub fn file_type(&self) -> Option<Gid> {
        self.header.map(|h| h.file_type)
    }

    /// Find a node by identifier
    ///
    /// The identifier passes through the redirect table first. The first
    /// match in depth-first order wins. Empty identifiers never match.
    pub fn find(&self, guid: Guid) -> Option<NodeId> {
        if guid.is_empty() {
            return None;
        }
        let guid = self.redirects.resolve(guid);
        self.index().get(&guid).copied()
    }

    /// Identifier index, built on first use
    fn index(&self) -> &HashMap<Guid, NodeId> {
        self.index.get_or_init(|| self.build_index())
    }

    fn build_index(&self) -> HashMap<Guid, NodeId> {
        let mut index = HashMap::new();
        let Some(root) = self.root else {
            return index;
        };
        for id in self.tree.preorder(root) {
            let guid = self.tree[id].guid();
            if !guid.is_empty() {
                index.entry(guid).or_insert(id);
            }
        }
        debug!(entries = index.len(), "Built identifier index");
        index
    }

    pub(crate) fn invalidate_index(&mut self) {
        self.index.take();
    }

    /// Fetch the pixels of one image; see [`Image::load`](crate::Image::load)
    pub fn load_image(&mut self, id: NodeId) -> bool {
        self.tree
            .get_mut(id)
            .and_then(|node| node.resource_mut().as_image_mut())
            .is_some_and(|image| image.load())
    }

    /// Fetch every image whose pixels are not in memory
    ///
    /// Returns the number of images that are still missing pixels.
    pub fn load_late_images(&mut self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut missing = 0;
        for id in self.tree.preorder(root) {
            if let Some(image) = self.tree[id].resource_mut().as_image_mut()
                && !image.load()
            {
                missing += 1;
            }
        }
        missing
    }

    /// Drop pixel buffers of uploaded images; returns how many were dropped
    pub fn discard(&mut self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut dropped = 0;
        for id in self.tree.preorder(root) {
            if let Some(image) = self.tree[id].resource_mut().as_image_mut()
                && image.discard()
            {
                dropped += 1;
            }
        }
        dropped
    }

    /// Frame image of an animation node at time `t`
    pub fn frame_image(&self, animation: NodeId, t: u32) -> Result<Option<NodeId>> {
        let Some(node) = self.tree.get(animation) else {
            return Ok(None);
        };
        let Some(anim) = node.resource().as_animation() else {
            return Ok(None);
        };
        let frame = anim.frame_at(t)?;
        Ok(node.child(frame))
    }
}

impl Default for ResourceFile {
    fn default() -> Self {
        Self::new(LoaderRegistry::game())
    }
}
