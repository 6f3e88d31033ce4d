//! Per-user translation session.
//!
//! Holds what the current translate action produced, the user's pending
//! edits, and which languages were saved since. Nothing here is persisted;
//! the session is rebuilt on every translate action.

use std::collections::{HashMap, HashSet};

use crate::error::StoreError;
use crate::store::{SaveOutcome, Store};

#[derive(Debug, Clone, Default)]
pub struct TranslationSession {
    project: String,
    source_text: String,
    order: Vec<String>,
    translations: HashMap<String, String>,
    edits: HashMap<String, String>,
    modified: HashSet<String>,
}

impl TranslationSession {
    pub fn new(project: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            source_text: source_text.into(),
            ..Self::default()
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Drop all translations, edits and modified flags.
    pub fn clear(&mut self) {
        self.order.clear();
        self.translations.clear();
        self.edits.clear();
        self.modified.clear();
    }

    /// Record a fresh translation. Re-inserting keeps the original position.
    pub fn insert(&mut self, language: impl Into<String>, translation: impl Into<String>) {
        let language = language.into();
        if !self.translations.contains_key(&language) {
            self.order.push(language.clone());
        }
        self.translations.insert(language, translation.into());
    }

    /// The fresh translation for `language`, ignoring edits.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    /// Translated languages in the order they were translated.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Replace the text that the next [`save`](Self::save) of `language`
    /// writes. Returns `false` if the language was not translated.
    pub fn edit(&mut self, language: &str, text: impl Into<String>) -> bool {
        if !self.translations.contains_key(language) {
            return false;
        }
        self.edits.insert(language.to_string(), text.into());
        true
    }

    /// Whether `language` was saved during this session.
    pub fn is_modified(&self, language: &str) -> bool {
        self.modified.contains(language)
    }

    /// Text to show for `language`: a pending edit, else what is already
    /// saved for the project, else the fresh translation.
    pub fn display_text(&self, store: &Store, language: &str) -> Result<Option<String>, StoreError> {
        if let Some(edit) = self.edits.get(language) {
            return Ok(Some(edit.clone()));
        }
        if let Some((_, saved)) = store.get_saved_translation(&self.project, language)? {
            if !saved.is_empty() {
                return Ok(Some(saved));
            }
        }
        Ok(self.get(language).map(str::to_string))
    }

    /// Save the displayed text for `language` under this session's project
    /// and mark it modified. Returns `None` if the language was not
    /// translated in this session.
    pub fn save(&mut self, store: &Store, language: &str) -> Result<Option<SaveOutcome>, StoreError> {
        if !self.translations.contains_key(language) {
            return Ok(None);
        }
        let Some(text) = self.display_text(store, language)? else {
            return Ok(None);
        };
        let outcome = store.save_or_update(&self.project, language, &self.source_text, &text)?;
        self.edits.remove(language);
        self.modified.insert(language.to_string());
        Ok(Some(outcome))
    }
}
