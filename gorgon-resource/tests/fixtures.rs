//! Programmatic container generation for integration tests.
//!
//! Every builder writes one complete chunk, including its identifier, so
//! tests can compose trees the way a resource editor would save them.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use gorgon_resource::{ChunkWriter, ColorMode, Gid, Guid, LoaderRegistry, ResourceFile};
use tempfile::NamedTempFile;

/// Identifier of the root folder in every fixture
pub const ROOT: u64 = 0x100;

/// File type written into fixture headers
pub const FILE_TYPE: Gid = Gid(0x0000_0042);

pub fn guid(value: u64) -> Guid {
    Guid::from_u64(value)
}

/// Header plus a root folder whose children are written by `body`
pub fn container(body: impl FnOnce(&mut ChunkWriter)) -> Vec<u8> {
    let mut w = ChunkWriter::container(FILE_TYPE);
    folder(&mut w, ROOT, body);
    w.into_bytes()
}

pub fn folder(w: &mut ChunkWriter, id: u64, body: impl FnOnce(&mut ChunkWriter)) {
    w.chunk(Gid::FOLDER, |w| {
        w.guid_chunk(guid(id));
        body(w);
    });
}

pub fn text(w: &mut ChunkWriter, id: u64, value: &str) {
    w.chunk(Gid::TEXT, |w| {
        w.guid_chunk(guid(id));
        w.chunk(Gid::TEXT_VALUE, |w| w.write_string(value));
    });
}

pub fn named_text(w: &mut ChunkWriter, id: u64, name: &str, value: &str) {
    w.chunk(Gid::TEXT, |w| {
        w.guid_chunk(guid(id));
        w.name_chunk(name);
        w.chunk(Gid::TEXT_VALUE, |w| w.write_string(value));
    });
}

pub fn link_alias(w: &mut ChunkWriter, id: u64, target: u64) {
    w.chunk(Gid::LINK_NODE, |w| {
        w.guid_chunk(guid(id));
        w.chunk(Gid::LINK_NODE_TARGET, |w| w.write_guid(guid(target)));
    });
}

pub fn image_props(w: &mut ChunkWriter, width: u32, height: u32, mode: ColorMode, late: bool) {
    w.chunk(Gid::IMAGE_PROPS, |w| {
        w.write_i32(width as i32);
        w.write_i32(height as i32);
        w.write_u32(mode.0);
        w.write_i32(0);
        w.write_u8(late as u8);
    });
}

/// Uncompressed image
pub fn image(w: &mut ChunkWriter, id: u64, width: u32, height: u32, mode: ColorMode, late: bool, pixels: &[u8]) {
    image_chunk(w, Gid::IMAGE, id, width, height, mode, late, pixels);
}

#[allow(clippy::too_many_arguments)]
pub fn image_chunk(
    w: &mut ChunkWriter,
    gid: Gid,
    id: u64,
    width: u32,
    height: u32,
    mode: ColorMode,
    late: bool,
    pixels: &[u8],
) {
    w.chunk(gid, |w| {
        w.guid_chunk(guid(id));
        image_props(w, width, height, mode, late);
        w.chunk(Gid::IMAGE_DATA, |w| w.write_bytes(pixels));
    });
}

/// Image stored with a codec
pub fn compressed_image(
    w: &mut ChunkWriter,
    id: u64,
    width: u32,
    height: u32,
    compression: Gid,
    late: bool,
    payload: &[u8],
) {
    w.chunk(Gid::IMAGE, |w| {
        w.guid_chunk(guid(id));
        image_props(w, width, height, ColorMode::ARGB, late);
        w.chunk(Gid::IMAGE_CMP_PROPS, |w| w.write_gid(compression));
        w.chunk(Gid::IMAGE_CMP_DATA, |w| w.write_bytes(payload));
    });
}

/// Deterministic pixel pattern
pub fn pixels(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

/// A 2x2 RGBA PNG
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 0, 0, 255]) // Red
        } else {
            image::Rgba([0, 255, 0, 255]) // Green
        }
    });
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode png");
    out
}

/// An unregistered chunk with an arbitrary payload
pub fn unknown(w: &mut ChunkWriter, len: usize) {
    w.chunk(Gid(0x0ABC_0000), |w| w.write_bytes(&pixels(len)));
}

/// Parse in memory with every built-in loader
pub fn load_bytes(bytes: &[u8]) -> ResourceFile {
    let mut file = ResourceFile::new(LoaderRegistry::game());
    file.load_from_reader(Cursor::new(bytes.to_vec()))
        .expect("fixture should load");
    file
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(bytes).expect("write temp file");
    tmp.flush().expect("flush temp file");
    tmp
}

/// Identifiers of a node's children in order
pub fn child_guids(file: &ResourceFile, guid_value: u64) -> Vec<u64> {
    let id = file.find(guid(guid_value)).expect("node exists");
    file.tree()[id]
        .children()
        .iter()
        .map(|c| file.tree()[c.node].guid().as_u64())
        .collect()
}
