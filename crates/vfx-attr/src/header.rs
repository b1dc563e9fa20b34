//! Image header: named native attributes.
//!
//! A [`Header`] maps attribute names to [`Attribute`]s, ordered by name.
//! [`Header::new`] fills in the attributes every scanline image needs.

use crate::attribute::Attribute;
use crate::error::{AttrError, AttrResult};
use crate::kind::AttributeKind;
use crate::types::{Box2i, Channel, ChannelList, Compression, LineOrder, V2};
use std::collections::BTreeMap;

/// Name of the channel list attribute.
pub const CHANNELS: &str = "channels";
/// Name of the data window attribute.
pub const DATA_WINDOW: &str = "dataWindow";
/// Name of the display window attribute.
pub const DISPLAY_WINDOW: &str = "displayWindow";
/// Name of the compression attribute.
pub const COMPRESSION: &str = "compression";
/// Name of the line order attribute.
pub const LINE_ORDER: &str = "lineOrder";

/// Named native attributes of one image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    attributes: BTreeMap<String, Attribute>,
}

impl Header {
    /// Header for a `width x height` scanline image with zip compression
    /// and both windows at `(0, 0)`.
    pub fn new(width: usize, height: usize) -> Self {
        let window = Box2i::from_origin_size(0, 0, width, height);
        let mut header = Self::default();
        header.insert(CHANNELS, Attribute::ChannelList(ChannelList::default()));
        header.insert(COMPRESSION, Attribute::Compression(Compression::Zip));
        header.insert(DATA_WINDOW, Attribute::Box2i(window));
        header.insert(DISPLAY_WINDOW, Attribute::Box2i(window));
        header.insert(LINE_ORDER, Attribute::LineOrder(LineOrder::IncreasingY));
        header.insert("pixelAspectRatio", Attribute::Float(1.0));
        header.insert("screenWindowCenter", Attribute::V2f(V2::new(0.0, 0.0)));
        header.insert("screenWindowWidth", Attribute::Float(1.0));
        header
    }

    /// Attribute by name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Inserts or replaces an attribute, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) -> Option<Attribute> {
        self.attributes.insert(name.into(), attribute)
    }

    /// Removes an attribute.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    /// True when an attribute of that name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when the header has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The data window. Must exist and be non-empty.
    pub fn data_window(&self) -> AttrResult<Box2i> {
        let window = self.window(DATA_WINDOW)?;
        if window.width() == 0 || window.height() == 0 {
            return Err(AttrError::InvalidHeader(format!(
                "empty data window {:?}-{:?}",
                (window.min.x, window.min.y),
                (window.max.x, window.max.y)
            )));
        }
        Ok(window)
    }

    /// Moves or resizes the data window.
    pub fn set_data_window(&mut self, window: Box2i) {
        self.insert(DATA_WINDOW, Attribute::Box2i(window));
    }

    /// The display window.
    pub fn display_window(&self) -> AttrResult<Box2i> {
        self.window(DISPLAY_WINDOW)
    }

    fn window(&self, name: &str) -> AttrResult<Box2i> {
        match self.get(name) {
            Some(Attribute::Box2i(window)) => Ok(*window),
            Some(other) => Err(AttrError::AttributeTypeMismatch {
                kind: AttributeKind::Box2i,
                found: other.type_name().to_string(),
            }),
            None => Err(AttrError::MissingAttribute {
                name: name.to_string(),
            }),
        }
    }

    /// The channel list, if present.
    pub fn channels(&self) -> Option<&ChannelList> {
        self.get(CHANNELS).and_then(Attribute::as_channel_list)
    }

    /// Adds a channel descriptor, creating the channel list if needed.
    pub fn add_channel(&mut self, channel: Channel) {
        match self.attributes.get_mut(CHANNELS) {
            Some(Attribute::ChannelList(list)) => list.insert(channel),
            _ => {
                self.insert(CHANNELS, Attribute::ChannelList(ChannelList::new([channel])));
            }
        }
    }

    /// Compression method, zip when absent.
    pub fn compression(&self) -> Compression {
        match self.get(COMPRESSION) {
            Some(Attribute::Compression(c)) => *c,
            _ => Compression::default(),
        }
    }

    /// Line order, increasing y when absent.
    pub fn line_order(&self) -> LineOrder {
        match self.get(LINE_ORDER) {
            Some(Attribute::LineOrder(order)) => *order,
            _ => LineOrder::default(),
        }
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = (&'a String, &'a Attribute);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SampleType;

    #[test]
    fn default_header() {
        let header = Header::new(4, 3);
        let window = header.data_window().unwrap();
        assert_eq!((window.width(), window.height()), (4, 3));
        assert_eq!(header.display_window().unwrap(), window);
        assert_eq!(header.compression(), Compression::Zip);
        assert_eq!(header.line_order(), LineOrder::IncreasingY);
        assert!(header.channels().is_some_and(ChannelList::is_empty));
        assert_eq!(header.get("pixelAspectRatio"), Some(&Attribute::Float(1.0)));
    }

    #[test]
    fn add_channel_creates_list() {
        let mut header = Header::default();
        header.add_channel(Channel::new("Y", SampleType::Half));
        header.add_channel(Channel::new("A", SampleType::Float));
        let names: Vec<_> = header.channels().unwrap().names().collect();
        assert_eq!(names, ["A", "Y"]);
    }

    #[test]
    fn window_errors() {
        let mut header = Header::default();
        assert_eq!(
            header.data_window(),
            Err(AttrError::MissingAttribute {
                name: "dataWindow".into()
            })
        );
        header.insert(DATA_WINDOW, Attribute::Float(0.0));
        assert!(matches!(
            header.data_window(),
            Err(AttrError::AttributeTypeMismatch { .. })
        ));
        header.set_data_window(Box2i::from_origin_size(0, 0, 0, 4));
        assert!(matches!(
            header.data_window(),
            Err(AttrError::InvalidHeader(_))
        ));
    }
}
