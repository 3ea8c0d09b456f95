pub mod card;
pub mod form;

use crate::models::GeneratedImageRecord;
use colored::*;

pub use card::ImageCard;
pub use form::GenerationForm;

/// The "Generated Images" section; empty when there is no history.
pub struct Gallery<'a> {
    records: &'a [GeneratedImageRecord],
}

impl<'a> Gallery<'a> {
    pub fn new(records: &'a [GeneratedImageRecord]) -> Self {
        Self { records }
    }

    pub fn render(&self) -> String {
        if self.records.is_empty() {
            return String::new();
        }

        let mut sections = vec!["Generated Images".bold().underline().to_string()];
        sections.extend(
            self.records
                .iter()
                .enumerate()
                .map(|(i, record)| ImageCard::new(record).numbered(i + 1).render()),
        );
        sections.join("\n\n")
    }
}
