//! Provider-specific wire formats, endpoints and curated tables.

pub mod gemini;
