//! Attribute type registry.
//!
//! Two process-wide lookup tables, built once via [`AttributeRegistry::global()`]:
//!
//! - native type name <-> [`AttributeKind`], unique in both directions.
//!   Unknown names resolve to [`AttributeKind::Invalid`].
//! - well-known attribute key -> default kind, consulted when a host writes
//!   an attribute without saying what kind it is. Unknown keys are strings.
//!
//! # Example
//!
//! ```rust
//! use vfx_attr::{AttributeKind, AttributeRegistry};
//!
//! let registry = AttributeRegistry::global();
//! assert_eq!(registry.kind_of("chromaticities"), AttributeKind::Chromaticities);
//! assert_eq!(registry.kind_of("m44f"), AttributeKind::Invalid);
//! assert_eq!(registry.default_kind_for("expTime"), AttributeKind::Float);
//! assert_eq!(registry.default_kind_for("shotName"), AttributeKind::String);
//! ```

use crate::kind::AttributeKind;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Type name reported for [`AttributeKind::Invalid`].
pub const UNKNOWN_TYPE_NAME: &str = "unknown";

const NATIVE_TYPES: &[(&str, AttributeKind)] = &[
    ("box2f", AttributeKind::Box2f),
    ("box2i", AttributeKind::Box2i),
    ("chlist", AttributeKind::ChannelList),
    ("chromaticities", AttributeKind::Chromaticities),
    ("compression", AttributeKind::Compression),
    ("double", AttributeKind::Double),
    ("envmap", AttributeKind::Envmap),
    ("float", AttributeKind::Float),
    ("floatvector", AttributeKind::FloatVector),
    ("int", AttributeKind::Int),
    ("intvector", AttributeKind::IntVector),
    ("lineOrder", AttributeKind::LineOrder),
    ("string", AttributeKind::String),
    ("v2f", AttributeKind::V2f),
    ("v2i", AttributeKind::V2i),
];

const KNOWN_KEYS: &[(&str, AttributeKind)] = &[
    // Required header attributes
    ("channels", AttributeKind::ChannelList),
    ("compression", AttributeKind::Compression),
    ("dataWindow", AttributeKind::Box2i),
    ("displayWindow", AttributeKind::Box2i),
    ("lineOrder", AttributeKind::LineOrder),
    ("pixelAspectRatio", AttributeKind::Float),
    ("screenWindowCenter", AttributeKind::V2f),
    ("screenWindowWidth", AttributeKind::Float),
    // Standard optional attributes
    ("gain", AttributeKind::Float),
    ("wavelength", AttributeKind::Float),
    ("extTube", AttributeKind::String),
    ("lens", AttributeKind::String),
    ("material", AttributeKind::String),
    ("chromaticities", AttributeKind::Chromaticities),
    ("whiteLuminance", AttributeKind::Float),
    ("adoptedNeutral", AttributeKind::V2f),
    ("renderingTransform", AttributeKind::String),
    ("lookModTransform", AttributeKind::String),
    ("xDensity", AttributeKind::Float),
    ("owner", AttributeKind::String),
    ("comments", AttributeKind::String),
    ("capDate", AttributeKind::String),
    ("utcOffset", AttributeKind::Float),
    ("longitude", AttributeKind::Float),
    ("latitude", AttributeKind::Float),
    ("altitude", AttributeKind::Float),
    ("focus", AttributeKind::Float),
    ("expTime", AttributeKind::Float),
    ("aperture", AttributeKind::Float),
    ("isoSpeed", AttributeKind::Float),
    ("multExpTimes", AttributeKind::FloatVector),
    ("multApertures", AttributeKind::FloatVector),
    ("multIsoSpeeds", AttributeKind::FloatVector),
    ("multGains", AttributeKind::FloatVector),
    ("envmap", AttributeKind::Envmap),
    ("wrapmodes", AttributeKind::String),
    ("view", AttributeKind::String),
    ("originalDataWindow", AttributeKind::Box2i),
    ("near", AttributeKind::Float),
    ("far", AttributeKind::Float),
    ("fieldOfViewHorizontal", AttributeKind::Float),
    ("fieldOfViewVertical", AttributeKind::Float),
];

/// Native type and known-key lookup tables.
pub struct AttributeRegistry {
    by_name: HashMap<&'static str, AttributeKind>,
    by_kind: HashMap<AttributeKind, &'static str>,
    known_keys: HashMap<&'static str, AttributeKind>,
}

impl AttributeRegistry {
    fn new() -> Self {
        let mut by_name = HashMap::with_capacity(NATIVE_TYPES.len());
        let mut by_kind = HashMap::with_capacity(NATIVE_TYPES.len());
        for &(name, kind) in NATIVE_TYPES {
            by_name.insert(name, kind);
            by_kind.insert(kind, name);
        }
        Self {
            by_name,
            by_kind,
            known_keys: KNOWN_KEYS.iter().copied().collect(),
        }
    }

    /// Returns the global registry instance.
    pub fn global() -> &'static AttributeRegistry {
        static INSTANCE: OnceLock<AttributeRegistry> = OnceLock::new();
        INSTANCE.get_or_init(AttributeRegistry::new)
    }

    /// Kind for a native type name. Total: unknown names are `Invalid`.
    pub fn kind_of(&self, type_name: &str) -> AttributeKind {
        self.by_name
            .get(type_name)
            .copied()
            .unwrap_or(AttributeKind::Invalid)
    }

    /// Native type name for a kind, `"unknown"` for `Invalid`.
    pub fn type_name_of(&self, kind: AttributeKind) -> &'static str {
        self.by_kind.get(&kind).copied().unwrap_or(UNKNOWN_TYPE_NAME)
    }

    /// Kind to use when writing `key` without an explicit kind.
    pub fn default_kind_for(&self, key: &str) -> AttributeKind {
        self.known_keys
            .get(key)
            .copied()
            .unwrap_or(AttributeKind::String)
    }

    /// Well-known keys and their kinds, sorted by key.
    pub fn known_keys(&self) -> Vec<(&'static str, AttributeKind)> {
        let mut keys: Vec<_> = self.known_keys.iter().map(|(k, v)| (*k, *v)).collect();
        keys.sort_unstable();
        keys
    }

    /// Supported native type names, sorted.
    pub fn native_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
