//! Governed documents: ordered lines, each carrying the difficulty fixed when
//! it was inserted.
//!
//! A line's difficulty is the margin any later edit or removal of that line
//! must clear at the difficulty gate. Updating the text never changes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use decree_types::{Difficulty, LineId};

use crate::error::ResourceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub text: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    next_line_id: u64,
    lines: Vec<Line>,
}

impl Document {
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|line| line.id == id)
    }

    fn index_of(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStore {
    documents: BTreeMap<String, Document>,
}

impl DocumentStore {
    pub fn create_document(&mut self, name: &str) -> Result<(), ResourceError> {
        if self.documents.contains_key(name) {
            return Err(ResourceError::DocumentExists(name.to_owned()));
        }
        self.documents.insert(name.to_owned(), Document::default());
        Ok(())
    }

    #[must_use]
    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn line(&self, document: &str, id: LineId) -> Result<&Line, ResourceError> {
        self.get(document)?
            .line(id)
            .ok_or_else(|| ResourceError::UnknownLine {
                document: document.to_owned(),
                line_id: id,
            })
    }

    /// Insert a line before `position` (`position == len` appends).
    pub fn insert_line(
        &mut self,
        document: &str,
        position: u32,
        text: String,
        difficulty: Difficulty,
    ) -> Result<LineId, ResourceError> {
        let doc = self.get_mut(document)?;
        let index = position as usize;
        if index > doc.lines.len() {
            return Err(ResourceError::PositionOutOfRange {
                document: document.to_owned(),
                position,
                len: doc.lines.len(),
            });
        }
        let id = LineId::new(doc.next_line_id);
        doc.next_line_id += 1;
        doc.lines.insert(
            index,
            Line {
                id,
                text,
                difficulty,
            },
        );
        Ok(id)
    }

    pub fn update_line(
        &mut self,
        document: &str,
        id: LineId,
        text: String,
    ) -> Result<(), ResourceError> {
        let doc = self.get_mut(document)?;
        let index = doc
            .index_of(id)
            .ok_or_else(|| unknown_line(document, id))?;
        doc.lines[index].text = text;
        Ok(())
    }

    pub fn remove_line(&mut self, document: &str, id: LineId) -> Result<Line, ResourceError> {
        let doc = self.get_mut(document)?;
        let index = doc
            .index_of(id)
            .ok_or_else(|| unknown_line(document, id))?;
        Ok(doc.lines.remove(index))
    }

    /// Full copy of a document's lines, in order.
    pub fn snapshot(&self, document: &str) -> Result<Vec<Line>, ResourceError> {
        Ok(self.get(document)?.lines.clone())
    }

    fn get(&self, document: &str) -> Result<&Document, ResourceError> {
        self.documents
            .get(document)
            .ok_or_else(|| ResourceError::UnknownDocument(document.to_owned()))
    }

    fn get_mut(&mut self, document: &str) -> Result<&mut Document, ResourceError> {
        self.documents
            .get_mut(document)
            .ok_or_else(|| ResourceError::UnknownDocument(document.to_owned()))
    }
}

fn unknown_line(document: &str, id: LineId) -> ResourceError {
    ResourceError::UnknownLine {
        document: document.to_owned(),
        line_id: id,
    }
}
