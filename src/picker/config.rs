//! Picker configuration.

/// Terminals shown inline before the rest move behind the overflow item.
pub const DEFAULT_MAX_INLINE_TERMINALS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerConfig {
    max_inline_terminals: usize,
}

impl PickerConfig {
    /// Build from a raw user setting.
    ///
    /// The threshold must be finite and at least 1; anything else falls
    /// back to [`DEFAULT_MAX_INLINE_TERMINALS`]. A fractional value is
    /// truncated.
    pub fn from_setting(raw: Option<f64>) -> Self {
        let max_inline_terminals = match raw {
            None => DEFAULT_MAX_INLINE_TERMINALS,
            Some(value) if value.is_finite() && value >= 1.0 => value as usize,
            Some(value) => {
                tracing::warn!(
                    value,
                    default = DEFAULT_MAX_INLINE_TERMINALS,
                    "invalid max inline terminals, using default"
                );
                DEFAULT_MAX_INLINE_TERMINALS
            }
        };
        Self {
            max_inline_terminals,
        }
    }

    pub fn max_inline_terminals(&self) -> usize {
        self.max_inline_terminals
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self::from_setting(None)
    }
}
