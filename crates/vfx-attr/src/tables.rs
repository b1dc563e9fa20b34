//! Token tables for the enumerated attribute kinds.
//!
//! Each enumeration is described by one literal list of `(value, token)`
//! pairs. Forward and reverse maps are built from it on first use and
//! shared for the life of the process.
//!
//! Encoding never fails: a value without a token becomes `"unknown"`.
//! Decoding an unlisted token is [`AttrError::UnrecognizedEnumToken`].
//!
//! ```rust
//! use vfx_attr::{Compression, TokenEnum};
//!
//! assert_eq!(Compression::Zip.to_token(), "zip");
//! assert_eq!(Compression::from_token("piz").unwrap(), Compression::Piz);
//! assert!(Compression::from_token("lzw").is_err());
//! ```

use crate::error::{AttrError, AttrResult};
use crate::types::{Compression, Envmap, LineOrder};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::OnceLock;

/// Token paired with every `Unknown` sentinel.
pub const UNKNOWN_TOKEN: &str = "unknown";

/// Bidirectional value/token map.
pub struct TokenTable<E: 'static> {
    enumeration: &'static str,
    forward: HashMap<E, &'static str>,
    reverse: HashMap<&'static str, E>,
}

impl<E: Copy + Eq + Hash> TokenTable<E> {
    fn build(enumeration: &'static str, pairs: &'static [(E, &'static str)]) -> Self {
        let mut forward = HashMap::with_capacity(pairs.len());
        let mut reverse = HashMap::with_capacity(pairs.len());
        for &(value, token) in pairs {
            forward.insert(value, token);
            reverse.insert(token, value);
        }
        Self {
            enumeration,
            forward,
            reverse,
        }
    }

    /// Token for a value, `"unknown"` if unlisted.
    pub fn token(&self, value: E) -> &'static str {
        self.forward.get(&value).copied().unwrap_or(UNKNOWN_TOKEN)
    }

    /// Value for a token.
    pub fn value(&self, token: &str) -> AttrResult<E> {
        self.reverse
            .get(token)
            .copied()
            .ok_or_else(|| AttrError::UnrecognizedEnumToken {
                enumeration: self.enumeration,
                token: token.to_string(),
            })
    }

    /// All tokens, in no particular order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reverse.keys().copied()
    }
}

/// Enumerations with a string token form.
pub trait TokenEnum: Sized + Copy + Eq + Hash + 'static {
    /// Enumeration name used in errors.
    const ENUMERATION: &'static str;

    /// Every variant, `Unknown` last.
    const ALL: &'static [Self];

    /// The shared table.
    fn table() -> &'static TokenTable<Self>;

    /// Token for this value.
    fn to_token(self) -> &'static str {
        Self::table().token(self)
    }

    /// Value for a token.
    fn from_token(token: &str) -> AttrResult<Self> {
        Self::table().value(token)
    }
}

macro_rules! token_enum {
    ($ty:ident, $name:literal, [$($variant:ident => $token:literal),* $(,)?]) => {
        impl TokenEnum for $ty {
            const ENUMERATION: &'static str = $name;
            const ALL: &'static [Self] = &[$($ty::$variant),*];

            fn table() -> &'static TokenTable<Self> {
                static PAIRS: &[($ty, &str)] = &[$(($ty::$variant, $token)),*];
                static TABLE: OnceLock<TokenTable<$ty>> = OnceLock::new();
                TABLE.get_or_init(|| TokenTable::build($name, PAIRS))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.to_token())
            }
        }

        impl FromStr for $ty {
            type Err = AttrError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_token(s)
            }
        }
    };
}

token_enum!(Compression, "compression", [
    No => "no",
    Rle => "rle",
    Zips => "zips",
    Zip => "zip",
    Piz => "piz",
    Pxr24 => "pxr24",
    B44 => "b44",
    B44a => "b44a",
    Unknown => "unknown",
]);

token_enum!(LineOrder, "lineOrder", [
    IncreasingY => "increasing_y",
    DecreasingY => "decreasing_y",
    RandomY => "random_y",
    Unknown => "unknown",
]);

token_enum!(Envmap, "envmap", [
    LatLong => "latlong",
    Cube => "cube",
    Unknown => "unknown",
]);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_total<E: TokenEnum + fmt::Debug>() {
        for &value in E::ALL {
            let token = value.to_token();
            assert_eq!(E::from_token(token), Ok(value), "{:?}", value);
        }
        for token in E::table().tokens() {
            let value = E::from_token(token).expect("listed token");
            assert_eq!(value.to_token(), token);
        }
        assert_eq!(E::table().tokens().count(), E::ALL.len());
    }

    #[test]
    fn tables_are_total() {
        assert_total::<Compression>();
        assert_total::<LineOrder>();
        assert_total::<Envmap>();
    }

    #[test]
    fn unknown_sentinels() {
        assert_eq!(Compression::Unknown.to_token(), UNKNOWN_TOKEN);
        assert_eq!(LineOrder::Unknown.to_token(), UNKNOWN_TOKEN);
        assert_eq!(Envmap::from_token("unknown"), Ok(Envmap::Unknown));
    }

    #[test]
    fn unrecognized_token() {
        assert_eq!(
            "dwaa".parse::<Compression>(),
            Err(AttrError::UnrecognizedEnumToken {
                enumeration: "compression",
                token: "dwaa".to_string()
            })
        );
        assert!(LineOrder::from_token("INCREASING_Y").is_err());
    }

    #[test]
    fn display_uses_tokens() {
        assert_eq!(Compression::B44a.to_string(), "b44a");
        assert_eq!(LineOrder::RandomY.to_string(), "random_y");
        assert_eq!(Envmap::LatLong.to_string(), "latlong");
    }
}
