use crate::error::{DescribeError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const SEMVER_PATTERN: &str = r"^([A-Za-z]+)?([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$";

fn semver_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SEMVER_PATTERN).expect("semver pattern is a valid regex"))
}

/// Semantic version with an optional alphabetic prefix (e.g. the `v` in `v1.2.3`)
///
/// Equality is structural over every field, including prefix and build
/// metadata. Use [`SemVer::precedence_cmp`] for semver.org ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SemVer {
    pub prefix: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<String>,
    pub build_metadata: Vec<String>,
}

impl SemVer {
    /// Create a plain `major.minor.patch` version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemVer {
            major,
            minor,
            patch,
            ..SemVer::default()
        }
    }

    /// Parse a version string such as `v1.2.3-rc.1+build.5`
    ///
    /// Numeric fields are read as plain base-10 integers, so leading zeros
    /// are accepted. Absent prerelease or build metadata parse to empty lists.
    ///
    /// # Returns
    /// * `Ok(SemVer)` - Successfully parsed version
    /// * `Err` - If the input does not match the grammar
    pub fn parse(input: &str) -> Result<Self> {
        let caps = semver_regex().captures(input).ok_or_else(|| {
            DescribeError::version_parse(format!("'{}' is not a semantic version", input))
        })?;

        let number = |idx: usize| -> Result<u64> {
            let digits = &caps[idx];
            digits.parse::<u64>().map_err(|_| {
                DescribeError::version_parse(format!(
                    "version component '{}' in '{}' is out of range",
                    digits, input
                ))
            })
        };

        Ok(SemVer {
            prefix: caps.get(1).map_or("", |m| m.as_str()).to_string(),
            major: number(2)?,
            minor: number(3)?,
            patch: number(4)?,
            prerelease: split_identifiers(caps.get(5).map(|m| m.as_str())),
            build_metadata: split_identifiers(caps.get(6).map(|m| m.as_str())),
        })
    }

    /// Check whether the string parses as a version
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Advance the version to the requested release level
    ///
    /// A prerelease is treated as the upcoming release it precedes: bumping
    /// `1.2.0-rc1` to minor yields `1.2.0`, not `1.3.0`. Every level except
    /// [`NextRelease::None`] clears prerelease and build metadata.
    pub fn bump(&self, level: NextRelease) -> SemVer {
        let pre = self.is_prerelease();
        let (major, minor, patch) = match level {
            NextRelease::None => return self.clone(),
            NextRelease::Patch if pre => (self.major, self.minor, self.patch),
            NextRelease::Patch => (self.major, self.minor, self.patch + 1),
            NextRelease::Minor if pre && self.patch == 0 => (self.major, self.minor, 0),
            NextRelease::Minor => (self.major, self.minor + 1, 0),
            NextRelease::Major if pre && self.minor == 0 && self.patch == 0 => (self.major, 0, 0),
            NextRelease::Major => (self.major + 1, 0, 0),
        };

        SemVer {
            prefix: self.prefix.clone(),
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build_metadata: Vec::new(),
        }
    }

    /// Compare by semver.org precedence
    ///
    /// Prefix and build metadata do not participate. A version without a
    /// prerelease ranks above any prerelease of the same numbers.
    pub fn precedence_cmp(&self, other: &SemVer) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }
}

impl FromStr for SemVer {
    type Err = DescribeError;

    fn from_str(s: &str) -> Result<Self> {
        SemVer::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}.{}.{}", self.prefix, self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease.join("."))?;
        }
        if !self.build_metadata.is_empty() {
            write!(f, "+{}", self.build_metadata.join("."))?;
        }
        Ok(())
    }
}

fn split_identifiers(group: Option<&str>) -> Vec<String> {
    match group {
        Some(s) if !s.is_empty() => s.split('.').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn compare_prerelease(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let (a, b) = (a.join("."), b.join("."));
    match (semver::Prerelease::new(&a), semver::Prerelease::new(&b)) {
        (Ok(pa), Ok(pb)) => pa.cmp(&pb),
        // numeric identifiers with leading zeros are outside semver.org
        _ => a.cmp(&b),
    }
}

/// Release level requested on top of the described version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NextRelease {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl FromStr for NextRelease {
    type Err = DescribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(NextRelease::None),
            "patch" => Ok(NextRelease::Patch),
            "minor" => Ok(NextRelease::Minor),
            "major" => Ok(NextRelease::Major),
            other => Err(DescribeError::config(format!(
                "unknown release level '{}' (expected none, patch, minor or major)",
                other
            ))),
        }
    }
}

impl fmt::Display for NextRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextRelease::None => write!(f, "none"),
            NextRelease::Patch => write!(f, "patch"),
            NextRelease::Minor => write!(f, "minor"),
            NextRelease::Major => write!(f, "major"),
        }
    }
}
