//! Llama 3 instruction prompt and output cleanup.

pub const SEQUENCE_START_MARKER: &str = "<s>";
pub const INSTRUCTION_START_MARKER: &str = "[INST]";
pub const INSTRUCTION_END_MARKER: &str = "[/INST]";

/// Embeds `topic` verbatim, without escaping, into the blog instruction.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "{SEQUENCE_START_MARKER}{INSTRUCTION_START_MARKER} Write a 200-word blog on the topic: {topic} {INSTRUCTION_END_MARKER}"
    )
}

/// Removes template markers the model sometimes echoes back and trims the
/// surrounding whitespace.
pub fn clean_generation(text: &str) -> String {
    text.replace(INSTRUCTION_END_MARKER, "")
        .replace(SEQUENCE_START_MARKER, "")
        .trim()
        .to_string()
}
