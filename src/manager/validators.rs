//! # Built-in Validators

use crate::channels::{ChannelError, ChannelResult, Release};

use super::extensions::ReleaseValidator;

/// Requires the version to be a semantic version, optionally prefixed by `v`
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverValidator;

impl ReleaseValidator for SemverValidator {
    fn name(&self) -> &str {
        "semver"
    }

    fn validate(&self, release: &Release) -> ChannelResult<()> {
        let raw = release.version.strip_prefix('v').unwrap_or(&release.version);
        semver::Version::parse(raw).map_err(|e| {
            ChannelError::validation(format!(
                "version {} is not semantic: {}",
                release.version, e
            ))
        })?;
        Ok(())
    }
}

/// Requires every artifact checksum to be hex of the length its algorithm
/// produces
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumValidator;

impl ChecksumValidator {
    /// Hex digest length for a checksum algorithm; empty means sha256
    pub fn digest_len(algorithm: &str) -> Option<usize> {
        match algorithm.to_ascii_lowercase().as_str() {
            "" | "sha256" => Some(64),
            "sha512" => Some(128),
            "sha1" => Some(40),
            "md5" => Some(32),
            _ => None,
        }
    }
}

impl ReleaseValidator for ChecksumValidator {
    fn name(&self) -> &str {
        "checksum"
    }

    fn validate(&self, release: &Release) -> ChannelResult<()> {
        for (i, artifact) in release.artifacts.iter().enumerate() {
            let expected = Self::digest_len(&artifact.checksum_alg).ok_or_else(|| {
                ChannelError::validation(format!(
                    "artifact {}: unsupported checksum algorithm {}",
                    i, artifact.checksum_alg
                ))
            })?;

            if artifact.checksum.len() != expected
                || !artifact.checksum.chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(ChannelError::validation(format!(
                    "artifact {}: checksum is not a {}-character hex digest",
                    i, expected
                )));
            }
        }
        Ok(())
    }
}
