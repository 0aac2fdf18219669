//! Deterministic, non-model-facing messages for the gateway.

/// Answer given when neither the model nor the knowledge base can help.
pub const ADVISOR_FALLBACK: &str = "I don't have specific information about that right now. \
Please contact the admissions office directly and a human advisor will be happy to help you. \
You can reach them through your college's admissions page or by phone during business hours.";

/// First line of a knowledge-base answer.
pub const FALLBACK_INTRO: &str = "Here's what I found in our admissions information:";

/// Last line of a knowledge-base answer.
pub const FALLBACK_CLOSING: &str =
    "For the most current details, please contact the admissions office directly.";

pub mod http {
    pub const EMPTY_MESSAGE: &str = "Message cannot be empty";
    pub const INTERNAL_ERROR: &str =
        "Sorry, I encountered an error processing your request. Please try again later.";
}
