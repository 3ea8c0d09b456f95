use crate::models::GeneratedImageRecord;
use colored::*;

/// Terminal rendition of one generated image.
pub struct ImageCard<'a> {
    record: &'a GeneratedImageRecord,
    index: Option<usize>,
}

impl<'a> ImageCard<'a> {
    pub fn new(record: &'a GeneratedImageRecord) -> Self {
        Self {
            record,
            index: None,
        }
    }

    /// Number shown in front of the card; also what `download <N>` accepts.
    pub fn numbered(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn render(&self) -> String {
        let heading = match self.index {
            Some(index) => format!("#{} {}", index, self.record.prompt),
            None => self.record.prompt.clone(),
        };
        let download_hint = match self.index {
            Some(index) => format!("imagegen download {}", index),
            None => format!("imagegen download {}", self.record.url),
        };

        [
            heading.bold().to_string(),
            format!("  {}", self.record.url.underline()),
            format!(
                "  {}  {} {}",
                self.record.local_timestamp().bright_black(),
                "⬇ Download:".blue(),
                download_hint
            ),
        ]
        .join("\n")
    }
}
