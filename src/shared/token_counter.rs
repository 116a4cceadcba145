//! Rough token accounting for advice prompts.
//!
//! Approximation: ~4 characters per token. Good enough to warn before a
//! request that cannot fit the model's context window.

/// Context window of the advice model, in tokens
pub const CONTEXT_WINDOW: usize = 200_000;

pub struct TokenCounter;

impl TokenCounter {
    /// Estimated token count for `text`
    pub fn estimate_tokens(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        (text.chars().count() + 3) / 4
    }

    /// Tokens left for the prompt once the response budget is reserved
    pub fn estimate_remaining(
        used_tokens: usize,
        context_window: usize,
        reserved_for_response: usize,
    ) -> usize {
        context_window
            .saturating_sub(used_tokens)
            .saturating_sub(reserved_for_response)
    }

    /// Whether a prompt plus its response budget fits the window
    pub fn fits_in_context(prompt: &str, max_response_tokens: usize, context_window: usize) -> bool {
        Self::estimate_tokens(prompt) + max_response_tokens <= context_window
    }
}
