//! System prompts sent to the model.

use std::fmt::Write;

/// Prompt asking for a translation into a single `language`, replied as
/// `{"<language>": "translation"}`.
pub fn single_language_prompt(language: &str) -> String {
    format!(
        "You are a helpful assistant whose role is to translate English text to {language}.\n\
         \n\
         Please provide the translation in a valid JSON format like this:\n\
         {{\n    \"{language}\": \"translation\"\n}}\n"
    )
}

/// Prompt asking for translations into every language in `languages` at
/// once, replied as one JSON object keyed by language.
pub fn batch_prompt(languages: &[&str]) -> String {
    let mut prompt = String::from(
        "You are a helpful assistant whose role is to translate English text to the languages below:\n",
    );
    for (i, language) in languages.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(prompt, "{}- {}", i + 1, language);
    }

    prompt.push_str("\nPlease provide the translations in a valid JSON format like this:\n{\n");
    let entries: Vec<String> = languages
        .iter()
        .map(|language| format!("    \"{language}\": \"translation\""))
        .collect();
    prompt.push_str(&entries.join(",\n"));
    prompt.push_str("\n}\n");
    prompt
}
