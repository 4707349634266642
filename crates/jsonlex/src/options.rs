use crate::line_buffer::DEFAULT_BUFFER_SIZE;

/// Configuration options for the JSON tokenizer.
///
/// # Examples
///
/// ```rust
/// use jsonlex::{Tokenizer, TokenizerOptions};
///
/// let options = TokenizerOptions { buffer_size: 4096 };
/// let lexer = Tokenizer::with_options(&b"[1, 2, 3]"[..], options);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    /// Size in bytes of the line window. Defaults to 2048.
    ///
    /// The window bounds the tokenizer's memory: lines longer than this are
    /// handled by sliding the window forward, never by growing it. Lines
    /// longer than the window cannot be reproduced in error messages, and
    /// tokens that cross a window boundary are copied instead of borrowed.
    /// Values below 16 bytes are rounded up.
    pub buffer_size: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
