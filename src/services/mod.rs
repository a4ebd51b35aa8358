pub(crate) mod extraction;
pub(crate) mod gemini;
pub(crate) mod prompts;
pub(crate) mod uploads;
