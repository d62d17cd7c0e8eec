use crate::model::{Dataset, Email, EmailId};

/// Keyword selection driving visual emphasis. Never affects layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    selected: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self::default();
        for word in selected {
            out.select(word);
        }
        out
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// An empty selection leaves every email emphasized.
    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn select(&mut self, word: impl Into<String>) {
        let word = word.into();
        if word.is_empty() || self.selected.contains(&word) {
            return;
        }
        self.selected.push(word);
    }

    pub fn deselect(&mut self, word: &str) {
        self.selected.retain(|w| w != word);
    }

    /// Adds `word` if absent, removes it otherwise (keyword button click).
    pub fn toggle(&mut self, word: &str) {
        if self.selected.iter().any(|w| w == word) {
            self.deselect(word);
        } else {
            self.select(word);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Case-sensitive substring match against any selected keyword.
    pub fn matches(&self, content: &str) -> bool {
        self.selected.iter().any(|w| content.contains(w.as_str()))
    }

    pub fn is_emphasized(&self, email: &Email) -> bool {
        !self.is_active() || self.matches(&email.content)
    }

    /// Emails drawn at reduced emphasis.
    pub fn dimmed<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = EmailId> + 'a {
        dataset
            .email_ids()
            .zip(dataset.emails())
            .filter(move |(_, e)| !self.is_emphasized(e))
            .map(|(id, _)| id)
    }
}
