//! Topic hint validation applied at every trigger boundary.
//!
//! A malformed topic is rejected before a run record is created, so it
//! never appears in the ledger.

use crate::error::CoreError;

/// Minimum topic length in characters.
pub const MIN_TOPIC_LEN: usize = 3;

/// Maximum topic length in characters.
pub const MAX_TOPIC_LEN: usize = 160;

/// Validate an optional topic hint.
///
/// `None` is always valid (the script step picks its own topic). When
/// present, the topic must be `MIN_TOPIC_LEN..=MAX_TOPIC_LEN`
/// characters after trimming surrounding whitespace.
pub fn validate_topic(topic: Option<&str>) -> Result<(), CoreError> {
    let Some(topic) = topic else {
        return Ok(());
    };

    let trimmed = topic.trim();
    let len = trimmed.chars().count();

    if len < MIN_TOPIC_LEN {
        return Err(CoreError::Validation(format!(
            "Topic must be at least {MIN_TOPIC_LEN} characters"
        )));
    }
    if len > MAX_TOPIC_LEN {
        return Err(CoreError::Validation(format!(
            "Topic must not exceed {MAX_TOPIC_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
