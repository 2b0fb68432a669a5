pub mod context_vector;
pub mod json_extract;
pub mod prompt;
pub mod schema;
pub mod suggestion_service;

pub use context_vector::build_context_vector;
pub use json_extract::{extract_json_object, strip_code_fences};
pub use prompt::{build_fallback_prompt, build_prompt};
pub use schema::suggestion_schema;
pub use suggestion_service::SuggestionService;
