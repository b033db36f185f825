pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod response_parser;
pub mod session;

pub use prompt::PromptBuilder;
pub use providers::{GeminiGenerator, RecommendationGenerator};
pub use recommendations::filter_recommendations;
pub use response_parser::parse_response;
pub use session::{Session, SessionStatus, SessionView};
