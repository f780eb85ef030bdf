// Copyright 2026 recache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{fmt::Display, str::FromStr};

use recache_common::{
    code::{Key, Value},
    error::{Error, Result},
};
use recache_memory::Mru;
use serde::{Deserialize, Serialize};

/// Property holding the max count of cached records.
pub const CACHE_SIZE: &str = "recache.cache.size";
/// Property selecting the cache type, see [`CacheType`].
pub const CACHE_TYPE: &str = "recache.cache.type";

/// Cache variant in front of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// Fixed-capacity least-recently-used cache.
    #[default]
    Normal,
    /// Soft reference cache. Not implemented.
    Soft,
    /// Weak reference cache. Not implemented.
    Weak,
    /// No cache, every operation goes to the store. Parsed from an empty string or `none`.
    None,
}

impl FromStr for CacheType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::None);
        }
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "soft" => Ok(Self::Soft),
            "weak" => Ok(Self::Weak),
            "none" => Ok(Self::None),
            _ => Err(Error::config(format!("invalid cache type: {s}"))),
        }
    }
}

impl Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Soft => write!(f, "soft"),
            Self::Weak => write!(f, "weak"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Options of the cache in front of a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Max count of cached records. Must be positive.
    ///
    /// The default value is 1000.
    pub size: usize,
    /// Cache variant.
    ///
    /// The default value is [`CacheType::Normal`].
    pub cache_type: CacheType,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            size: 1000,
            cache_type: CacheType::Normal,
        }
    }
}

impl CacheOptions {
    /// Parse options from named string properties.
    ///
    /// Recognised keys are [`CACHE_SIZE`] and [`CACHE_TYPE`]; other keys are ignored and missing
    /// keys keep their default value.
    pub fn from_properties<I, PK, PV>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PK, PV)>,
        PK: AsRef<str>,
        PV: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in properties {
            let value = value.as_ref();
            match key.as_ref() {
                CACHE_SIZE => options.size = parse_size(value)?,
                CACHE_TYPE => options.cache_type = value.parse()?,
                _ => {}
            }
        }
        Ok(options)
    }

    /// Set the max count of cached records.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the cache variant.
    pub fn with_cache_type(mut self, cache_type: CacheType) -> Self {
        self.cache_type = cache_type;
        self
    }

    /// Check the options without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::config(format!("{CACHE_SIZE} must be positive, given: 0")));
        }
        match self.cache_type {
            CacheType::Normal | CacheType::None => Ok(()),
            CacheType::Soft => Err(Error::unsupported("soft reference cache")),
            CacheType::Weak => Err(Error::unsupported("weak reference cache")),
        }
    }

    /// Build the configured cache, or `None` if caching is disabled.
    pub fn build<K, V>(&self) -> Result<Option<Mru<K, V>>>
    where
        K: Key,
        V: Value,
    {
        self.validate()?;
        let cache = match self.cache_type {
            CacheType::Normal => Some(Mru::new(self.size)?),
            _ => None,
        };
        tracing::debug!(size = self.size, cache_type = %self.cache_type, "[options]: build cache");
        Ok(cache)
    }
}

fn parse_size(value: &str) -> Result<usize> {
    let size: i64 = value
        .trim()
        .parse()
        .map_err(|e| Error::config(format!("{CACHE_SIZE} must be an integer, given: {value:?}, reason: {e}")))?;
    if size <= 0 {
        return Err(Error::config(format!("{CACHE_SIZE} must be positive, given: {size}")));
    }
    usize::try_from(size).map_err(|e| Error::config(format!("{CACHE_SIZE} is out of range: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let options = CacheOptions::from_properties(HashMap::<String, String>::new()).unwrap();
        assert_eq!(options, CacheOptions::default());
        assert_eq!(options.size, 1000);
        assert_eq!(options.cache_type, CacheType::Normal);
    }

    #[test]
    fn test_parse_properties() {
        let options = CacheOptions::from_properties([
            (CACHE_SIZE, " 42 "),
            (CACHE_TYPE, "NoRmAl"),
            ("recache.disable_transactions", "true"),
        ])
        .unwrap();
        assert_eq!(options, CacheOptions::default().with_size(42));

        let options = CacheOptions::from_properties([(CACHE_TYPE, "")]).unwrap();
        assert_eq!(options.cache_type, CacheType::None);
    }

    #[test]
    fn test_invalid_size() {
        for size in ["0", "-3", "many", ""] {
            let err = CacheOptions::from_properties([(CACHE_SIZE, size)]).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "size {size:?}: {err}");
        }
        assert!(matches!(
            CacheOptions::default().with_size(0).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_cache_types() {
        assert_eq!("WEAK".parse::<CacheType>().unwrap(), CacheType::Weak);
        assert_eq!("soft".parse::<CacheType>().unwrap(), CacheType::Soft);
        assert!(matches!("lfu".parse::<CacheType>(), Err(Error::Config(_))));

        let err = CacheOptions::default()
            .with_cache_type(CacheType::Soft)
            .build::<u64, u64>()
            .unwrap_err();
        assert_eq!(err.to_string(), "not implemented: soft reference cache");
        let err = CacheOptions::default()
            .with_cache_type(CacheType::Weak)
            .build::<u64, u64>()
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));

        let cache = CacheOptions::default()
            .with_cache_type(CacheType::None)
            .build::<u64, u64>()
            .unwrap();
        assert!(cache.is_none());
    }

    #[test]
    fn test_build() {
        let cache = CacheOptions::default().with_size(7).build::<u64, String>().unwrap().unwrap();
        assert_eq!(cache.capacity(), 7);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_serde() {
        let options: CacheOptions = serde_json::from_str(r#"{ "cache_type": "none" }"#).unwrap();
        assert_eq!(options, CacheOptions::default().with_cache_type(CacheType::None));

        let json = serde_json::to_string(&CacheOptions::default().with_size(3)).unwrap();
        assert_eq!(json, r#"{"size":3,"cache_type":"normal"}"#);
    }
}
