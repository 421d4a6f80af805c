//! Journal identifiers.
//!
//! An identifier is the only key a journal is stored under and the only
//! credential needed to read it. It is seeded from the display name the
//! user typed at the entry flow, so people can recognise their own link.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::{Result, ThanklyError};

/// Separator between the slug and the uniqueness suffix.
pub const SEPARATOR: char = '-';

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque per-user identifier such as `alice-m3k9x2a-7qf`.
///
/// The only syntactic requirement is the presence of [`SEPARATOR`]; anything
/// else is accepted as-is so links produced by older generators keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Parses a raw string (for example a URL fragment without `#`).
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if Self::looks_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ThanklyError::InvalidIdentifier(raw.to_string()))
        }
    }

    /// Parses a URL fragment, with or without the leading `#`.
    ///
    /// Returns `None` for an absent or malformed fragment; both are handled
    /// the same way by the identity session.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let raw = fragment.strip_prefix('#').unwrap_or(fragment);
        Self::parse(raw).ok()
    }

    /// The "looks like an identifier" heuristic.
    pub fn looks_valid(candidate: &str) -> bool {
        candidate.contains(SEPARATOR)
    }

    /// The human-seeded part before the first separator (may be empty).
    pub fn slug(&self) -> &str {
        self.0.split(SEPARATOR).next().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the identifier as a URL fragment (`#alice-...`).
    pub fn to_fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = ThanklyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ThanklyError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

/// Shape of the uniqueness suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IdentifierStyle {
    /// `<slug>-<timestamp base36>-<3 random base36>`
    #[default]
    Timestamped,
    /// `<slug>-<suffix>`: four time digits followed by four random digits.
    Compact,
}

/// Lower-cases the name and strips everything outside `[a-z0-9]`.
///
/// Non-ASCII letters are dropped rather than transliterated, so a name made
/// only of punctuation or non-Latin script yields an empty slug.
pub fn slugify(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Generates a fresh identifier from a display name.
///
/// The caller must reject blank names before calling. Uniqueness is
/// probabilistic only; nothing checks the result against existing journals.
pub fn generate(display_name: &str, style: IdentifierStyle) -> Identifier {
    generate_with(display_name, style, Utc::now(), &mut rand::thread_rng())
}

/// Deterministic core of [`generate`], with time and entropy injected.
pub fn generate_with<R: Rng + ?Sized>(
    display_name: &str,
    style: IdentifierStyle,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Identifier {
    let slug = slugify(display_name);
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();

    let suffix = match style {
        IdentifierStyle::Timestamped => {
            format!("{}{}{}", to_base36(millis), SEPARATOR, random_base36(rng, 3))
        }
        IdentifierStyle::Compact => {
            let time = to_base36(millis);
            let tail = &time[time.len().saturating_sub(4)..];
            format!("{}{}", tail, random_base36(rng, 4))
        }
    };

    Identifier(format!("{slug}{SEPARATOR}{suffix}"))
}

/// Encodes an integer in lower-case base 36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..36usize)] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_slugify_strips_punctuation_and_case() {
        assert_eq!(slugify("Alice O'Brien!"), "aliceobrien");
        assert_eq!(slugify("R2-D2"), "r2d2");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_generated_identifier_keeps_slug_before_separator() {
        let mut rng = StdRng::seed_from_u64(7);
        for name in ["Alice", "Bob Smith", "ZOË 42", "...", "x-y-z"] {
            for style in [IdentifierStyle::Timestamped, IdentifierStyle::Compact] {
                let id = generate_with(name, style, fixed_time(), &mut rng);
                assert!(id.as_str().contains(SEPARATOR));
                assert_eq!(id.slug(), slugify(name), "name {name:?} style {style}");
            }
        }
    }

    #[test]
    fn test_timestamped_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = generate_with("Alice", IdentifierStyle::Timestamped, fixed_time(), &mut rng);
        let parts: Vec<&str> = id.as_str().split(SEPARATOR).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "alice");
        assert_eq!(parts[1], to_base36(fixed_time().timestamp_millis() as u64));
        assert_eq!(parts[2].len(), 3);
    }

    #[test]
    fn test_compact_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = generate_with("Alice", IdentifierStyle::Compact, fixed_time(), &mut rng);
        let parts: Vec<&str> = id.as_str().split(SEPARATOR).collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].len(), 8);
    }

    #[test]
    fn test_punctuation_only_name_degrades_to_bare_suffix() {
        let id = generate("???", IdentifierStyle::Compact);
        assert!(id.as_str().starts_with(SEPARATOR));
        assert_eq!(id.slug(), "");
    }

    #[test]
    fn test_rapid_generation_does_not_collide() {
        let ids: std::collections::HashSet<_> = (0..200)
            .map(|_| generate("alice", IdentifierStyle::Timestamped))
            .collect();
        // 200 draws over 36^3 suffixes per millisecond; collisions are possible
        // in theory but vanishingly rare in practice.
        assert!(ids.len() >= 195);
    }

    #[test]
    fn test_parse_requires_separator() {
        assert!(Identifier::parse("alice-9f2").is_ok());
        assert!(Identifier::parse("  alice-9f2 ").is_ok());
        assert!(matches!(
            Identifier::parse("alice"),
            Err(ThanklyError::InvalidIdentifier(_))
        ));
        assert!(Identifier::parse("").is_err());
    }

    #[test]
    fn test_from_fragment() {
        assert_eq!(
            Identifier::from_fragment("#bob-3k1").map(|id| id.to_string()),
            Some("bob-3k1".to_string())
        );
        assert_eq!(
            Identifier::from_fragment("bob-3k1").map(|id| id.to_string()),
            Some("bob-3k1".to_string())
        );
        assert!(Identifier::from_fragment("#bob").is_none());
        assert!(Identifier::from_fragment("#").is_none());
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let ok: Identifier = serde_json::from_str("\"carol-1\"").unwrap();
        assert_eq!(ok.as_str(), "carol-1");
        assert!(serde_json::from_str::<Identifier>("\"carol\"").is_err());
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
