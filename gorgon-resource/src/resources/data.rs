//! Data array: an ordered list of small typed values
//!
//! Link items store an identifier at parse time and a node reference after
//! prepare. Reading a link before that fails with
//! [`Error::TargetNotSet`].

use std::ops::ControlFlow;

use crate::context::{LoadContext, NodeInfo};
use crate::error::{Error, Result};
use crate::gid::Gid;
use crate::guid::Guid;
use crate::reader::ChunkReader;
use crate::resources::Resource;
use crate::tree::NodeId;

/// Reference from a data array to another node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLink {
    pub guid: Guid,
    target: Option<NodeId>,
}

impl DataLink {
    pub fn new(guid: Guid) -> Self {
        Self { guid, target: None }
    }

    /// The resolved node
    pub fn target(&self) -> Result<NodeId> {
        self.target.ok_or(Error::TargetNotSet { guid: self.guid })
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn set_target(&mut self, target: Option<NodeId>) {
        self.target = target;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataItem {
    Text(String),
    Int(i32),
    Float(f32),
    Point { x: i32, y: i32 },
    PointF { x: f32, y: f32 },
    Size { width: i32, height: i32 },
    Rect { x: i32, y: i32, width: i32, height: i32 },
    Bounds { left: i32, top: i32, right: i32, bottom: i32 },
    Margins { left: i32, top: i32, right: i32, bottom: i32 },
    /// 32-bit ARGB color
    Color(u32),
    Link(DataLink),
}

impl DataItem {
    fn read(reader: &mut ChunkReader<'_>, gid: Gid, size: u32) -> Result<Option<Self>> {
        let item = match gid {
            Gid::DATA_TEXT => DataItem::Text(reader.read_fixed_string(size as usize)?),
            Gid::DATA_INT => DataItem::Int(reader.read_i32()?),
            Gid::DATA_FLOAT => DataItem::Float(reader.read_f32()?),
            Gid::DATA_POINT => DataItem::Point {
                x: reader.read_i32()?,
                y: reader.read_i32()?,
            },
            Gid::DATA_POINTF => DataItem::PointF {
                x: reader.read_f32()?,
                y: reader.read_f32()?,
            },
            Gid::DATA_SIZE => DataItem::Size {
                width: reader.read_i32()?,
                height: reader.read_i32()?,
            },
            Gid::DATA_RECT => DataItem::Rect {
                x: reader.read_i32()?,
                y: reader.read_i32()?,
                width: reader.read_i32()?,
                height: reader.read_i32()?,
            },
            Gid::DATA_BOUNDS => DataItem::Bounds {
                left: reader.read_i32()?,
                top: reader.read_i32()?,
                right: reader.read_i32()?,
                bottom: reader.read_i32()?,
            },
            Gid::DATA_MARGINS => DataItem::Margins {
                left: reader.read_i32()?,
                top: reader.read_i32()?,
                right: reader.read_i32()?,
                bottom: reader.read_i32()?,
            },
            Gid::DATA_COLOR => DataItem::Color(reader.read_u32()?),
            Gid::DATA_LINK => DataItem::Link(DataLink::new(reader.read_guid_sized(size)?)),
            _ => return Ok(None),
        };
        Ok(Some(item))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataArray {
    items: Vec<DataItem>,
    names: Vec<String>,
}

impl DataArray {
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&DataItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Name of item `index`, if the array stores names
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Link item at `index`
    pub fn link(&self, index: usize) -> Option<&DataLink> {
        match self.items.get(index)? {
            DataItem::Link(link) => Some(link),
            _ => None,
        }
    }

    pub(crate) fn links_mut(&mut self) -> impl Iterator<Item = &mut DataLink> {
        self.items.iter_mut().filter_map(|item| match item {
            DataItem::Link(link) => Some(link),
            _ => None,
        })
    }
}

pub fn load(ctx: &mut LoadContext<'_>, size: u32) -> Result<NodeId> {
    let mut info = NodeInfo::default();
    let mut data = DataArray::default();

    ctx.for_each_chunk(size, |ctx, chunk| {
        if info.read_common(ctx.reader(), chunk)? {
            return Ok(ControlFlow::Continue(()));
        }
        if chunk.gid == Gid::DATA_NAMES {
            ctx.for_each_chunk(chunk.size, |ctx, name| {
                if name.gid == Gid::DATA_NAME {
                    data.names
                        .push(ctx.reader().read_fixed_string(name.size as usize)?);
                }
                Ok(ControlFlow::Continue(()))
            })?;
        } else if let Some(item) = DataItem::read(ctx.reader(), chunk.gid, chunk.size)? {
            data.items.push(item);
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(ctx.tree_mut().insert(info.into_node(Resource::Data(data))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_before_resolution_is_not_set() {
        let link = DataLink::new(Guid::from_u64(5));
        assert!(matches!(link.target(), Err(Error::TargetNotSet { .. })));
        assert!(!link.is_resolved());
    }

    #[test]
    fn test_named_lookup() {
        let data = DataArray {
            items: vec![DataItem::Int(1), DataItem::Link(DataLink::new(Guid::from_u64(3)))],
            names: vec!["count".into(), "target".into()],
        };
        assert_eq!(data.index_of("target"), Some(1));
        assert_eq!(data.name_of(0), Some("count"));
        assert!(data.link(0).is_none());
        assert_eq!(data.link(1).unwrap().guid, Guid::from_u64(3));
    }
}
