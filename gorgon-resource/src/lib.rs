//! Gorgon-Resource: loader for GORGON resource containers
//!
//! A container is a single file holding a tree of typed assets (images,
//! text, data arrays, sounds, animations, fonts, font themes) encoded as
//! nested, tagged, length-prefixed chunks.
//!
//! # Key Features
//!
//! - **Open registration**: chunk tags map to loaders through a
//!   [`LoaderRegistry`]; unknown tags are skipped, never fatal
//! - **Cross references**: link aliases and data links name other nodes by
//!   identifier and are bound after the whole tree exists
//! - **Lazy pixels**: images flagged for late loading keep only the payload
//!   location until [`Image::load`] is called
//! - **Deterministic ownership**: nodes live in an arena; shared references
//!   produced by link resolution never own their target
//!
//! # Usage
//!
//! ```no_run
//! use gorgon_resource::{HeadlessTextures, LoaderRegistry, ResourceFile};
//!
//! let mut file = ResourceFile::new(LoaderRegistry::game());
//! file.load("assets/ui.gor")?;
//! file.load_late_images();
//! file.prepare(&mut HeadlessTextures::new())?;
//!
//! if let Some(id) = file.find("00000000000000a1".parse()?) {
//!     println!("found {}", file.tree()[id].name());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod context;
mod error;
mod file;
mod frame_index;
mod gid;
mod guid;
mod link;
mod options;
mod prepare;
mod reader;
mod redirect;
mod registry;
pub mod resources;
mod texture;
mod tree;
mod writer;

pub use codec::{Codec, CodecRegistry, DecodeRequest, Decoded, JpegCodec, PngCodec};
pub use context::{LoadContext, MAX_NESTING_DEPTH, NodeInfo};
pub use error::{CodecError, Error, Result};
pub use file::{FileHeader, ResourceFile};
pub use frame_index::{Frame, FrameIndex};
pub use gid::Gid;
pub use guid::{Guid, LONG_GUID_SIZE, ParseGuidError, SHORT_GUID_SIZE};
pub use link::LinkStats;
pub use options::LoadOptions;
pub use reader::{CHUNK_HEADER_SIZE, ChunkHeader, ChunkReader, ReadSeek};
pub use redirect::{Redirect, RedirectTable};
pub use registry::{LoaderRegistry, ResourceLoader};
pub use resources::{ColorMode, Image, Resource};
pub use texture::{HeadlessTextures, TextureHandle, TextureSink, TextureUpload};
pub use tree::{Child, Link, Node, NodeId, ResourceTree};
pub use writer::{ChunkMark, ChunkWriter};

// =============================================================================
// Constants
// =============================================================================

/// Container signature
pub const SIGNATURE: &[u8; 6] = b"GORGON";

/// Newest container version this crate reads
pub const CURRENT_VERSION: u32 = 0x0001_0000;
