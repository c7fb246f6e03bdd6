pub mod prompts;
pub mod teams;
pub mod waves;
