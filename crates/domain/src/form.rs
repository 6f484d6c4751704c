//! Owner-authored submission forms.
//!
//! A [`Form`] is an ordered list of [`Question`]s that structures what a
//! visitor types when submitting a new item. Question order is held in the
//! `order` field and kept dense: after every mutation in this module the
//! questions are stored sorted and `order` equals the position, starting at 0.

use serde::{Deserialize, Serialize};

use crate::{FormId, GatewayError, OwnerId, QuestionId, Timestamp};

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// The input a question asks for.
///
/// Closed set: every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Single-line free text.
    #[default]
    #[serde(alias = "short")]
    ShortText,
    /// Multi-line free text.
    #[serde(alias = "long")]
    LongText,
    /// One of the question's `options`.
    #[serde(alias = "dropdown")]
    Choice,
}

/// One question within a [`Form`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Only meaningful for [`QuestionKind::Choice`].
    #[serde(default)]
    pub options: Vec<String>,
    pub order: u32,
}

impl Question {
    /// Creates an optional question of the given kind. Choice questions start
    /// with one empty option.
    pub fn new(kind: QuestionKind, label: impl Into<String>) -> Self {
        Self {
            id: QuestionId::generate(),
            kind,
            label: label.into(),
            placeholder: None,
            required: false,
            options: match kind {
                QuestionKind::Choice => vec![String::new()],
                QuestionKind::ShortText | QuestionKind::LongText => Vec::new(),
            },
            order: 0,
        }
    }

    /// Builder-style helper marking the question required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder-style helper replacing the options.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A partial update to one question. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionUpdate {
    pub label: Option<String>,
    pub kind: Option<QuestionKind>,
    pub required: Option<bool>,
    /// An empty string clears the placeholder.
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// A submission form record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Form {
    /// Creates an empty form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if `name` is blank.
    pub fn new(owner: OwnerId, name: &str) -> Result<Self, GatewayError> {
        let now = Timestamp::now();
        Ok(Self {
            id: FormId::generate(),
            owner,
            name: validated_name(name, "Name is required")?,
            questions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Renames the form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if `name` is blank.
    pub fn rename(&mut self, name: &str) -> Result<(), GatewayError> {
        self.name = validated_name(name, "Name cannot be empty")?;
        Ok(())
    }

    /// Replaces all questions, then restores the dense ordering.
    pub fn replace_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.normalize_order();
    }

    /// Sorts questions by their current `order` (stable for ties) and
    /// renumbers them `0..n`.
    pub fn normalize_order(&mut self) {
        self.questions.sort_by_key(|q| q.order);
        for (position, question) in self.questions.iter_mut().enumerate() {
            question.order = position_to_order(position);
        }
    }

    /// Appends `question` at the end and returns its id.
    pub fn add_question(&mut self, mut question: Question) -> QuestionId {
        question.order = position_to_order(self.questions.len());
        let id = question.id.clone();
        self.questions.push(question);
        id
    }

    /// Removes a question and renumbers the survivors. Returns `false` if no
    /// question has that id.
    pub fn remove_question(&mut self, id: &QuestionId) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| &q.id != id);
        let removed = self.questions.len() != before;
        if removed {
            self.normalize_order();
        }
        removed
    }

    /// Swaps a question with its predecessor. No-op (returning `false`) for the
    /// first question or an unknown id.
    pub fn move_question_up(&mut self, id: &QuestionId) -> bool {
        match self.position_of(id) {
            Some(position) if position > 0 => {
                self.swap(position - 1, position);
                true
            }
            _ => false,
        }
    }

    /// Swaps a question with its successor. No-op (returning `false`) for the
    /// last question or an unknown id.
    pub fn move_question_down(&mut self, id: &QuestionId) -> bool {
        match self.position_of(id) {
            Some(position) if position + 1 < self.questions.len() => {
                self.swap(position, position + 1);
                true
            }
            _ => false,
        }
    }

    /// Applies a partial update. Returns `false` if no question has that id.
    ///
    /// Switching a question to [`QuestionKind::Choice`] seeds a single empty
    /// option when it has none, so the owner always has a row to fill in.
    pub fn update_question(&mut self, id: &QuestionId, update: QuestionUpdate) -> bool {
        let Some(question) = self.questions.iter_mut().find(|q| &q.id == id) else {
            return false;
        };
        if let Some(label) = update.label {
            question.label = label;
        }
        if let Some(required) = update.required {
            question.required = required;
        }
        if let Some(placeholder) = update.placeholder {
            question.placeholder = (!placeholder.is_empty()).then_some(placeholder);
        }
        if let Some(options) = update.options {
            question.options = options;
        }
        if let Some(kind) = update.kind {
            question.kind = kind;
            match kind {
                QuestionKind::Choice if question.options.is_empty() => {
                    question.options.push(String::new());
                }
                QuestionKind::Choice | QuestionKind::ShortText | QuestionKind::LongText => {}
            }
        }
        true
    }

    /// Returns the visitor-facing summary of this form.
    pub fn summary(&self) -> FormSummary {
        FormSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            questions: self.questions.clone(),
        }
    }

    fn position_of(&mut self, id: &QuestionId) -> Option<usize> {
        self.normalize_order();
        self.questions.iter().position(|q| &q.id == id)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.questions.swap(a, b);
        self.questions[a].order = position_to_order(a);
        self.questions[b].order = position_to_order(b);
    }
}

/// What visitors see of a form: enough to render and validate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub name: String,
    pub questions: Vec<Question>,
}

impl FormSummary {
    /// Questions sorted by `order` ascending (stable for ties).
    pub fn ordered_questions(&self) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self.questions.iter().collect();
        questions.sort_by_key(|q| q.order);
        questions
    }

    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}

fn validated_name(name: &str, message: &str) -> Result<String, GatewayError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(GatewayError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}

fn position_to_order(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}
