//! Canonicalize command implementation.

use crate::input;
use canonry_content::Canonicalizer;

pub fn run(
    input: Option<String>,
    exclude: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::excluding(exclude);

    let text = input::read_text(input.as_deref())?;
    let value = input::parse_document(&text)?;

    let bytes = canonicalizer
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
