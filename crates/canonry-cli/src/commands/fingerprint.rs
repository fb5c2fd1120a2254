//! Fingerprint command implementation.

use crate::input;
use canonry_content::{fingerprint, Canonicalizer};

pub fn run(
    input: Option<String>,
    exclude: Vec<String>,
    b64: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::excluding(exclude);

    let text = input::read_text(input.as_deref())?;
    let value = input::parse_document(&text)?;

    let bytes = canonicalizer
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    let fp = fingerprint(&bytes);

    if b64 {
        println!("{}", fp.to_b64());
    } else {
        println!("{}", fp);
    }
    Ok(())
}
