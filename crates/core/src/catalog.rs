//! Catalog input rules: releases, tracks, and users.
//!
//! Field-level validation shared by the HTTP handlers. Each validator
//! returns [`CoreError::Validation`] with a human-readable message.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a release or track title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of an ISRC code.
pub const MAX_ISRC_LENGTH: usize = 20;

/// Minimum track duration in seconds.
pub const MIN_TRACK_DURATION_SECS: i32 = 1;

/// Maximum length of a user display name.
pub const MAX_USER_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// ReleaseStatus
// ---------------------------------------------------------------------------

/// Review status of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReleaseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReleaseStatus {
    /// Return the stored string for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parse a status, ignoring ASCII case.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid status value '{s}'. Valid values are: PENDING, APPROVED, REJECTED"
            ))),
        }
    }
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Platform role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Artist,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "artist" => Ok(Self::Artist),
            "admin" => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: artist, admin"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

/// Titles must be non-blank and at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_duration(duration_secs: i32) -> Result<(), CoreError> {
    if duration_secs < MIN_TRACK_DURATION_SECS {
        return Err(CoreError::Validation(format!(
            "Duration must be at least {MIN_TRACK_DURATION_SECS} second(s), got {duration_secs}"
        )));
    }
    Ok(())
}

pub fn validate_isrc(isrc: &str) -> Result<(), CoreError> {
    if isrc.chars().count() > MAX_ISRC_LENGTH {
        return Err(CoreError::Validation(format!(
            "ISRC must be at most {MAX_ISRC_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Stream counters are non-negative.
pub fn validate_streams(streams: i64) -> Result<(), CoreError> {
    if streams < 0 {
        return Err(CoreError::Validation(format!(
            "Streams must not be negative, got {streams}"
        )));
    }
    Ok(())
}

/// URLs must be absolute `http` or `https` URLs with a host part.
pub fn validate_url(field: &str, url: &str) -> Result<(), CoreError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    let has_host = rest.is_some_and(|r| !r.is_empty() && !r.starts_with('/'));
    if has_host && !url.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be an http(s) URL, got '{url}'"
        )))
    }
}

pub fn validate_user_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.chars().count() > MAX_USER_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_USER_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A minimal shape check: one `@` with a non-empty local part and a dotted
/// domain.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid email address '{email}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
