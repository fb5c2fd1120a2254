pub mod canonicalize;
pub mod dedup;
pub mod fingerprint;
