pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_PLAN_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_SEARCH_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Largest thinking budget the reasoning model accepts.
pub const MAX_THINKING_BUDGET: u32 = 32_768;

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are a helpful and encouraging AI learning assistant named Learnly AI. Keep answers concise and motivating.";
pub const CHAT_GREETING: &str = "Hi! I am Learnly AI. How can I help you learn today?";
pub const DEFAULT_STUDY_GOAL: &str = "Full Stack Development with AI Integration";

pub const CHAT_EMPTY_REPLY: &str = "I couldn't generate a response.";
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting to the AI right now.";
pub const PLAN_EMPTY_REPLY: &str = "Unable to generate study plan.";
pub const PLAN_FAILED_REPLY: &str = "Failed to generate plan.";
pub const SEARCH_EMPTY_REPLY: &str = "No results found.";
pub const SEARCH_FALLBACK_REPLY: &str = "Error performing search.";
pub const IMAGE_EDIT_ALERT: &str = "Failed to edit image. Try again.";

pub const EDIT_IMAGE_MIME_TYPE: &str = "image/png";

pub fn study_plan_prompt(goal: &str) -> String {
    format!(
        "Create a detailed, step-by-step weekly study plan for a student who wants to learn: {goal}. Structure it with daily focus areas."
    )
}

pub fn search_prompt(query: &str) -> String {
    format!("Find the latest information and trends regarding: {query}.")
}

pub fn image_edit_prompt(instruction: &str) -> String {
    format!("Edit this image: {instruction}. Return the image only.")
}

#[cfg(test)]
mod tests {
    use super::{image_edit_prompt, search_prompt, study_plan_prompt};

    #[test]
    fn interpolates_user_input_into_templates() {
        assert!(study_plan_prompt("Rust").contains("wants to learn: Rust. Structure"));
        assert_eq!(
            search_prompt("AI trends"),
            "Find the latest information and trends regarding: AI trends."
        );
        assert_eq!(
            image_edit_prompt("make it neon"),
            "Edit this image: make it neon. Return the image only."
        );
    }
}
