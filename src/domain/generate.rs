use crate::domain::version::{NextRelease, SemVer};
use crate::error::{DescribeError, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Token replaced by the computed version in [GenerateVersionOptions::format]
pub const VERSION_PLACEHOLDER: &str = "<version>";

const DEFAULT_PRERELEASE_PREFIX: &str = "dev";
const SHORT_HASH_LEN: usize = 7;

/// Options controlling how a describe result becomes a version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateVersionOptions {
    /// Version used when no semver tag is reachable
    pub fallback_tag_name: String,
    /// Strip the alphabetic prefix (`v`) from the output
    pub drop_tag_name_prefix: bool,
    /// Appended with a hyphen to the last prerelease segment
    pub prerelease_suffix: String,
    /// First prerelease segment, `dev` by default
    pub prerelease_prefix: String,
    /// Use the current UTC epoch second instead of the commit distance
    pub prerelease_timestamped: bool,
    pub next_release: NextRelease,
    /// Output template; every `<version>` is substituted
    pub format: String,
}

impl Default for GenerateVersionOptions {
    fn default() -> Self {
        GenerateVersionOptions {
            fallback_tag_name: String::new(),
            drop_tag_name_prefix: false,
            prerelease_suffix: String::new(),
            prerelease_prefix: DEFAULT_PRERELEASE_PREFIX.to_string(),
            prerelease_timestamped: false,
            next_release: NextRelease::None,
            format: String::new(),
        }
    }
}

/// Turn a describe result into the final version string
///
/// With a tag at distance zero the tag itself is the version. Further away,
/// a prerelease descriptor `<prefix>.<distance>.g<hash>` is appended to an
/// existing prerelease, or the patch number is raised and the descriptor
/// becomes the prerelease. Without any tag the fallback version carries the
/// descriptor. A requested release level is then applied to tagged versions.
///
/// # Arguments
/// * `tag_name` - Nearest semver tag, `None` if there is none
/// * `distance` - Commits between that tag and HEAD
/// * `head_id` - HEAD commit id in hex
/// * `now` - Clock reading for timestamped prereleases
/// * `opts` - Generation options
///
/// # Example
/// ```
/// use chrono::Utc;
/// use git_describe_semver::domain::{generate_version, GenerateVersionOptions};
///
/// let opts = GenerateVersionOptions::default();
/// let version = generate_version(Some("v1.0.0"), 1, "abc1234def", Utc::now(), &opts).unwrap();
/// assert_eq!(version, "v1.0.1-dev.1.gabc1234");
/// ```
pub fn generate_version(
    tag_name: Option<&str>,
    distance: u64,
    head_id: &str,
    now: DateTime<Utc>,
    opts: &GenerateVersionOptions,
) -> Result<String> {
    let descriptor = dev_prerelease(distance, head_id, now, opts);

    let mut version = match tag_name {
        None => {
            let mut fallback = SemVer::parse(&opts.fallback_tag_name).map_err(|_| {
                DescribeError::version_parse(format!(
                    "unable to parse fallback tag '{}'",
                    opts.fallback_tag_name
                ))
            })?;
            fallback.prerelease = descriptor;
            fallback
        }
        Some(name) => {
            let tagged = SemVer::parse(name).map_err(|_| {
                DescribeError::version_parse(format!("unable to parse tag '{}'", name))
            })?;
            let described = if distance == 0 {
                tagged
            } else if tagged.is_prerelease() {
                let mut prerelease = tagged.prerelease.clone();
                prerelease.extend(descriptor);
                SemVer {
                    prerelease,
                    ..tagged
                }
            } else {
                SemVer {
                    patch: tagged.patch + 1,
                    prerelease: descriptor,
                    ..tagged
                }
            };
            described.bump(opts.next_release)
        }
    };

    if opts.drop_tag_name_prefix {
        version.prefix.clear();
    }

    let formatted = version.to_string();
    debug!(version = %formatted, "generated version");

    if opts.format.is_empty() {
        Ok(formatted)
    } else {
        Ok(opts.format.replace(VERSION_PLACEHOLDER, &formatted))
    }
}

fn dev_prerelease(
    distance: u64,
    head_id: &str,
    now: DateTime<Utc>,
    opts: &GenerateVersionOptions,
) -> Vec<String> {
    let counter = if opts.prerelease_timestamped {
        now.timestamp().to_string()
    } else {
        distance.to_string()
    };
    let short_hash: String = head_id.chars().take(SHORT_HASH_LEN).collect();

    let mut hash_segment = format!("g{}", short_hash);
    if !opts.prerelease_suffix.is_empty() {
        hash_segment.push('-');
        hash_segment.push_str(&opts.prerelease_suffix);
    }

    vec![opts.prerelease_prefix.clone(), counter, hash_segment]
}
