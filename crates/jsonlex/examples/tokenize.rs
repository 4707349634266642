//! Tokenizes JSON from stdin and prints one token per line.
//!
//! ```sh
//! echo '{"a": [1, 2.5, null]}' | cargo run --example tokenize
//! ```

use std::io;

use jsonlex::{Tokenizer, TokenizerError};

fn run() -> Result<(), TokenizerError> {
    let stdin = io::stdin();
    let mut lexer = Tokenizer::new(stdin.lock());
    while lexer.has_next()? {
        if let Some(token) = lexer.next_token()? {
            println!(
                "{}:{}\t{:?}\t{}",
                token.line(),
                token.column(),
                token.kind(),
                token.text()
            );
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // The alternate form appends the offending line with a marker.
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
