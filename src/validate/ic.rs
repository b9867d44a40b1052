// Incremental validation for owner identity codes (canonical form
// NNNNNN-NN-NNNN). The same rules back the create, edit, and search-filter
// inputs, so the checkpoint behavior cannot drift between contexts.

/// Canonical IC length, hyphens included
pub const IC_LEN: usize = 14;

const FIRST_HYPHEN: usize = 6;
const SECOND_HYPHEN: usize = 9;

/// Result of feeding one raw input string through the live rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcInput {
    /// Value after truncation of anything that violates a checkpoint
    pub accepted: String,
    /// Error to show while the user is still typing; cleared between
    /// checkpoints
    pub live_error: Option<String>,
}

/// True when the string is exactly `NNNNNN-NN-NNNN`
pub fn is_canonical_ic(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() != IC_LEN {
        return false;
    }
    chars.iter().enumerate().all(|(i, c)| {
        if i == FIRST_HYPHEN || i == SECOND_HYPHEN {
            *c == '-'
        } else {
            c.is_ascii_digit()
        }
    })
}

/// Apply the live (while-typing) rules to a raw input string.
///
/// Checkpoint violations reject the offending tail: a missing hyphen at
/// position 6 truncates back to 6 characters, a missing hyphen at position
/// 9 truncates back to 9. A full-length value that still fails the
/// canonical check is reported but kept, since the user is at the boundary
/// and corrects in place.
pub fn accept_ic_input(raw: &str) -> IcInput {
    let chars: Vec<char> = raw.chars().take(IC_LEN).collect();

    if chars.len() > FIRST_HYPHEN && chars[FIRST_HYPHEN] != '-' {
        return IcInput {
            accepted: chars[..FIRST_HYPHEN].iter().collect(),
            live_error: Some("First hyphen should be after 6 digits (e.g. 123456-)".to_string()),
        };
    }

    if chars.len() > SECOND_HYPHEN && chars[SECOND_HYPHEN] != '-' {
        return IcInput {
            accepted: chars[..SECOND_HYPHEN].iter().collect(),
            live_error: Some(
                "Second hyphen should be after 2 digits (e.g. 123456-78-)".to_string(),
            ),
        };
    }

    let accepted: String = chars.iter().collect();
    if chars.len() == IC_LEN && !is_canonical_ic(&accepted) {
        return IcInput {
            accepted,
            live_error: Some("IC should follow format: 123456-78-9012".to_string()),
        };
    }

    IcInput {
        accepted,
        live_error: None,
    }
}

/// The stricter focus-loss check, distinct from the live rules
pub fn final_ic_error(value: &str) -> Option<String> {
    if value.chars().count() != IC_LEN {
        Some("Number of inputs doesn't match the expected IC format".to_string())
    } else if !is_canonical_ic(value) {
        Some("Invalid IC format".to_string())
    } else {
        None
    }
}

/// One IC input field: last accepted value plus the current live error
#[derive(Debug, Clone, Default)]
pub struct IcField {
    value: String,
    live_error: Option<String>,
}

impl IcField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            live_error: None,
        }
    }

    /// Feed a raw input string through the live rules, keeping the
    /// accepted value
    pub fn input(&mut self, raw: &str) -> &Self {
        let result = accept_ic_input(raw);
        self.value = result.accepted;
        self.live_error = result.live_error;
        self
    }

    /// Focus loss: replace the live error with the final-format verdict
    pub fn blur(&mut self) -> Option<&str> {
        self.live_error = final_ic_error(&self.value);
        self.live_error.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn live_error(&self) -> Option<&str> {
        self.live_error.as_deref()
    }

    pub fn is_canonical(&self) -> bool {
        is_canonical_ic(&self.value)
    }
}
