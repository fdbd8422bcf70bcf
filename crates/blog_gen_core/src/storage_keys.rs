use sha2::{Digest, Sha256};

pub const DEFAULT_OUTPUT_PREFIX: &str = "blog-output";
pub const TIME_COMPONENT_FORMAT: &str = "%H%M%S";
const OBJECT_EXTENSION: &str = "txt";
const DIGEST_HEX_LEN: usize = 12;

/// What, if anything, follows the `HHMMSS` component of an object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySuffix {
    /// `HHMMSS.txt`; invocations in the same second share a key.
    #[default]
    None,
    /// `HHMMSS-<digest>.txt`, where the digest is taken over the body.
    ContentDigest,
}

impl KeySuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ContentDigest => "content-digest",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "content-digest" => Some(Self::ContentDigest),
            _ => None,
        }
    }
}

pub fn blog_object_key(
    base_prefix: &str,
    time_component: &str,
    suffix: KeySuffix,
    content: &str,
) -> String {
    let stem = match suffix {
        KeySuffix::None => time_component.to_string(),
        KeySuffix::ContentDigest => format!("{time_component}-{}", content_digest(content)),
    };

    let trimmed = base_prefix.trim_matches('/');
    if trimmed.is_empty() {
        format!("{stem}.{OBJECT_EXTENSION}")
    } else {
        format!("{trimmed}/{stem}.{OBJECT_EXTENSION}")
    }
}

pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(DIGEST_HEX_LEN);
    hex
}
