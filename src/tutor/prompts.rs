//! Prompt templates for the single-shot flows

/// Ask for a definition and an example sentence
pub fn vocabulary(word: &str) -> String {
    format!("Define the word '{}' and use it in a sentence.", word)
}

/// Ask for a corrected sentence and an explanation
pub fn grammar(sentence: &str) -> String {
    format!(
        "Correct the grammar of the following sentence and explain the changes:\n\n{}",
        sentence
    )
}
