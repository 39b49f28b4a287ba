//! Fixed selection catalogs. Closed for the lifetime of the process.

pub const MODELS: &[&str] = &[
    "Llama-3.1-8b-Instant",
    "Mixtral-8x7b-32768",
    "Gemma2-9b-It",
    "Gemma-7b-It",
];

pub const LANGUAGES: &[&str] = &["French", "German", "Spanish", "Hindi"];

pub const DEFAULT_MODEL: &str = "Gemma2-9b-It";
pub const DEFAULT_LANGUAGE: &str = "French";

pub fn is_supported_model(name: &str) -> bool {
    MODELS.contains(&name)
}

pub fn is_supported_language(name: &str) -> bool {
    LANGUAGES.contains(&name)
}
