/// Terminal front-end: numbered prompts and printed summaries.
pub mod prompt;
pub mod report;
