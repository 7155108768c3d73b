use std::fmt::{Debug, Formatter};

use data_encoding::BASE64;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A binary image (candidate photo or party logo), transmitted as base64.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Image(Vec<u8>);

impl Image {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a `data:` URL for embedding. The backend does not record
    /// the media type, so PNG is assumed.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.0))
    }
}

/// Images are large and opaque, so only their size is shown.
impl Debug for Image {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Image {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Image {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Image {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.trim().as_bytes())
            .map(Self)
            .map_err(|e| de::Error::custom(format!("invalid base64 image: {e}")))
    }
}
