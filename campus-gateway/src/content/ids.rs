//! Content IDs for gateway prompts. Keep in sync with `prompts/`.

/// content: prompts/system-base.md
pub const PROMPT_SYSTEM_BASE: &str = "system-base";
