//! Synthesis prompt composition.

/// Maximum prompt length accepted by the synthesizer, in characters.
pub const MAX_PROMPT_CHARS: usize = 4000;

const SCENE_SEPARATOR: &str = "\n\nScene: ";

/// Joins a style instruction and a scene description into one prompt.
///
/// The result never exceeds `max_chars` characters. The instruction has
/// priority: the description tail is dropped first, and the separator is
/// omitted entirely when no room is left for any description text.
pub fn compose_prompt(instruction: &str, description: &str, max_chars: usize) -> String {
    let instruction_len = instruction.chars().count();
    if instruction_len >= max_chars {
        return instruction.chars().take(max_chars).collect();
    }

    let description = description.trim();
    let separator_len = SCENE_SEPARATOR.chars().count();
    let budget = max_chars - instruction_len;
    if description.is_empty() || budget <= separator_len {
        return instruction.to_string();
    }

    let mut prompt = String::with_capacity(instruction.len() + SCENE_SEPARATOR.len() + description.len());
    prompt.push_str(instruction);
    prompt.push_str(SCENE_SEPARATOR);
    prompt.extend(description.chars().take(budget - separator_len));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_is_joined() {
        let prompt = compose_prompt("Make it anime.", "a person smiling", MAX_PROMPT_CHARS);
        assert_eq!(prompt, "Make it anime.\n\nScene: a person smiling");
    }

    #[test]
    fn test_description_tail_is_truncated() {
        let instruction = "i".repeat(100);
        let description = "d".repeat(10_000);
        let prompt = compose_prompt(&instruction, &description, MAX_PROMPT_CHARS);

        assert_eq!(prompt.chars().count(), MAX_PROMPT_CHARS);
        assert!(prompt.starts_with(&instruction));
        assert!(prompt.ends_with('d'));
    }

    #[test]
    fn test_instruction_has_priority() {
        let instruction = "i".repeat(5000);
        let prompt = compose_prompt(&instruction, "a person smiling", MAX_PROMPT_CHARS);

        assert_eq!(prompt.chars().count(), MAX_PROMPT_CHARS);
        assert!(!prompt.contains("Scene"));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let description = "é".repeat(50);
        let prompt = compose_prompt("abc", &description, 20);
        assert_eq!(prompt.chars().count(), 20);
        assert!(prompt.ends_with('é'));
    }

    #[test]
    fn test_empty_description_keeps_instruction_only() {
        assert_eq!(compose_prompt("abc", "   ", 100), "abc");
    }
}
