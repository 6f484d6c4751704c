//! Turning a visitor's submission into an item-creation payload.
//!
//! Two steps with no I/O, split so that bad input is rejected before any
//! upstream call:
//!
//! - [`validate`]: the title must not be blank; with a form selected, every
//!   required question needs a non-blank answer (the first miss, in question
//!   order, fails) and choice answers must be one of the question's options.
//!   The description is either the visitor's free text or, with a form, the
//!   rendered question/answer blocks.
//! - [`assemble`]: picks a default workflow state from the scope's metadata
//!   and builds the payload.
//!
//! Sending the payload and mapping the tracker's answer is the caller's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    FormSummary, GatewayError, ItemPayload, LabelId, Priority, Question, QuestionId,
    QuestionKind, Scope, ScopeMetadata, StateId, StateKind, UserId,
};

/// What a visitor submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub title: String,
    /// Free-text description; replaced by rendered answers when a form is used.
    #[serde(default)]
    pub description: String,
    /// Answers keyed by question id.
    #[serde(default)]
    pub answers: BTreeMap<QuestionId, String>,
    /// State the visitor's client preselected, if any.
    #[serde(default)]
    pub state_id: Option<StateId>,
    /// Name of the board column the visitor started from, if any.
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee: Option<UserId>,
    #[serde(default)]
    pub labels: Vec<LabelId>,
}

/// A submission that passed validation, waiting for scope metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Trimmed title.
    pub title: String,
    /// Final item description.
    pub description: String,
}

/// Validates `submission` against `form` and renders the description.
///
/// # Errors
///
/// [`GatewayError::Validation`] for a blank title, an unanswered required
/// question (naming its label), or a choice answer outside the options.
pub fn validate(
    submission: &Submission,
    form: Option<&FormSummary>,
) -> Result<Draft, GatewayError> {
    let title = submission.title.trim();
    if title.is_empty() {
        return Err(GatewayError::validation("title required"));
    }

    let description = match form.filter(|f| f.has_questions()) {
        Some(form) => {
            let questions = form.ordered_questions();
            validate_answers(&questions, &submission.answers)?;
            render_description(&questions, &submission.answers)
        }
        None => submission.description.clone(),
    };

    Ok(Draft {
        title: title.to_string(),
        description,
    })
}

/// Builds the creation payload for a validated draft.
pub fn assemble(
    submission: &Submission,
    draft: Draft,
    scope: &Scope,
    metadata: &ScopeMetadata,
) -> ItemPayload {
    ItemPayload {
        title: draft.title,
        description: draft.description,
        state: default_state(
            metadata,
            submission.state_id.as_ref(),
            submission.state_name.as_deref(),
        ),
        priority: submission.priority,
        assignee: submission.assignee.clone(),
        labels: submission.labels.clone(),
        team: metadata.team_id.clone(),
        project: match scope {
            Scope::Project(project) => Some(project.clone()),
            Scope::Team(_) => None,
        },
    }
}

/// Fails on the first required question (in order) without a non-blank answer,
/// or on a choice answer that is not one of the options.
fn validate_answers(
    questions: &[&Question],
    answers: &BTreeMap<QuestionId, String>,
) -> Result<(), GatewayError> {
    for question in questions {
        let answer = answers.get(&question.id).map(|a| a.trim()).unwrap_or("");
        if answer.is_empty() {
            if question.required {
                return Err(GatewayError::validation(format!(
                    "Please answer required question: \"{}\"",
                    question.label
                )));
            }
            continue;
        }
        match question.kind {
            QuestionKind::ShortText | QuestionKind::LongText => {}
            QuestionKind::Choice => {
                if !question.options.iter().any(|o| o.trim() == answer) {
                    return Err(GatewayError::validation(format!(
                        "\"{answer}\" is not an option for \"{}\"",
                        question.label
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Renders each question as `**{label}**\n{answer}`, blocks separated by a
/// blank line. Answers are rendered as typed; unanswered optional questions
/// render with an empty answer.
pub fn render_description(
    questions: &[&Question],
    answers: &BTreeMap<QuestionId, String>,
) -> String {
    questions
        .iter()
        .map(|q| {
            let answer = answers.get(&q.id).map(String::as_str).unwrap_or("");
            format!("**{}**\n{}", q.label, answer)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Chooses the state a new item starts in.
///
/// Priority: the triage state when triage is enabled; else a state matching
/// the caller's hint (by id, then by name); else the first `unstarted` state;
/// else the first state. `None` only when the scope has no states at all.
pub fn default_state(
    metadata: &ScopeMetadata,
    hint_id: Option<&StateId>,
    hint_name: Option<&str>,
) -> Option<StateId> {
    if metadata.triage_enabled {
        let triage = metadata
            .triage_state
            .as_ref()
            .or_else(|| metadata.states.iter().find(|s| s.kind == StateKind::Triage));
        if let Some(state) = triage {
            return Some(state.id.clone());
        }
    }

    let states = &metadata.states;
    hint_id
        .and_then(|id| states.iter().find(|s| &s.id == id))
        .or_else(|| hint_name.and_then(|name| states.iter().find(|s| s.name == name)))
        .or_else(|| states.iter().find(|s| s.kind == StateKind::Unstarted))
        .or_else(|| states.first())
        .map(|s| s.id.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FormId, ProjectId, TeamId, WorkflowState};

    fn state(id: &str, name: &str, kind: StateKind) -> WorkflowState {
        WorkflowState {
            id: StateId::new(id).unwrap(),
            name: name.into(),
            kind,
            color: None,
            position: 0.0,
        }
    }

    fn metadata() -> ScopeMetadata {
        ScopeMetadata {
            team_id: TeamId::new("team-1").unwrap(),
            states: vec![
                state("s-backlog", "Backlog", StateKind::Backlog),
                state("s-todo", "Todo", StateKind::Unstarted),
                state("s-doing", "In Progress", StateKind::Started),
            ],
            triage_enabled: false,
            triage_state: None,
            members: Vec::new(),
            labels: Vec::new(),
        }
    }

    fn team_scope() -> Scope {
        Scope::Team(TeamId::new("team-1").unwrap())
    }

    fn bug_form() -> (FormSummary, QuestionId, QuestionId) {
        let mut steps = Question::new(QuestionKind::LongText, "Steps");
        steps.order = 1;
        let mut severity =
            Question::new(QuestionKind::Choice, "Severity").with_options(["Low", "High"]).required();
        severity.order = 0;
        let ids = (severity.id.clone(), steps.id.clone());
        // Stored out of order to prove rendering sorts by `order`.
        let form = FormSummary {
            id: FormId::generate(),
            name: "Bug".into(),
            questions: vec![steps, severity],
        };
        (form, ids.0, ids.1)
    }

    fn build(
        submission: &Submission,
        form: Option<&FormSummary>,
        scope: &Scope,
        metadata: &ScopeMetadata,
    ) -> Result<ItemPayload, GatewayError> {
        let draft = validate(submission, form)?;
        Ok(assemble(submission, draft, scope, metadata))
    }

    fn submission(title: &str) -> Submission {
        Submission {
            title: title.into(),
            description: "free text".into(),
            ..Submission::default()
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = build(&submission("   "), None, &team_scope(), &metadata()).unwrap_err();
        assert_eq!(err, GatewayError::validation("title required"));
    }

    #[test]
    fn without_a_form_the_free_text_is_kept() {
        let payload = build(&submission("Crash"), None, &team_scope(), &metadata()).unwrap();
        assert_eq!(payload.title, "Crash");
        assert_eq!(payload.description, "free text");
        assert_eq!(payload.priority, Priority::NONE);
        assert!(payload.labels.is_empty());
        assert_eq!(payload.project, None);
    }

    #[test]
    fn unanswered_required_question_is_named() {
        let (form, _, steps) = bug_form();
        let mut sub = submission("Crash");
        sub.answers.insert(steps, "click".into());
        let err = build(&sub, Some(&form), &team_scope(), &metadata()).unwrap_err();
        match err {
            GatewayError::Validation { message } => assert!(message.contains("Severity")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn whitespace_answer_counts_as_missing() {
        let (form, severity, _) = bug_form();
        let mut sub = submission("Crash");
        sub.answers.insert(severity, "  ".into());
        assert!(build(&sub, Some(&form), &team_scope(), &metadata()).is_err());
    }

    #[test]
    fn answered_form_replaces_description_with_ordered_blocks() {
        let (form, severity, steps) = bug_form();
        let mut sub = submission("Crash");
        sub.answers.insert(severity, "High".into());
        sub.answers.insert(steps, "Open the app\nTap save".into());
        let payload = build(&sub, Some(&form), &team_scope(), &metadata()).unwrap();
        assert_eq!(
            payload.description,
            "**Severity**\nHigh\n\n**Steps**\nOpen the app\nTap save"
        );
    }

    #[test]
    fn answers_are_rendered_as_typed() {
        let (form, severity, steps) = bug_form();
        let mut sub = submission("Crash");
        sub.answers.insert(severity, "High".into());
        sub.answers.insert(steps, "  1. open\n     2. tap  ".into());
        let draft = validate(&sub, Some(&form)).unwrap();
        assert_eq!(
            draft.description,
            "**Severity**\nHigh\n\n**Steps**\n  1. open\n     2. tap  "
        );
    }

    #[test]
    fn validation_needs_no_metadata() {
        let draft = validate(&submission("  Crash "), None).unwrap();
        assert_eq!(
            draft,
            Draft {
                title: "Crash".into(),
                description: "free text".into(),
            }
        );
    }

    #[test]
    fn unanswered_optional_question_renders_empty() {
        let (form, severity, _) = bug_form();
        let mut sub = submission("Crash");
        sub.answers.insert(severity, "Low".into());
        let payload = build(&sub, Some(&form), &team_scope(), &metadata()).unwrap();
        assert_eq!(payload.description, "**Severity**\nLow\n\n**Steps**\n");
    }

    #[test]
    fn choice_answer_must_be_an_option() {
        let (form, severity, _) = bug_form();
        let mut sub = submission("Crash");
        sub.answers.insert(severity, "Catastrophic".into());
        let err = build(&sub, Some(&form), &team_scope(), &metadata()).unwrap_err();
        assert_eq!(err.class(), crate::FailureClass::Validation);
    }

    #[test]
    fn form_without_questions_keeps_free_text() {
        let form = FormSummary {
            id: FormId::generate(),
            name: "Empty".into(),
            questions: Vec::new(),
        };
        let payload = build(&submission("Idea"), Some(&form), &team_scope(), &metadata()).unwrap();
        assert_eq!(payload.description, "free text");
    }

    #[test]
    fn project_scope_carries_project_and_metadata_team() {
        let scope = Scope::Project(ProjectId::new("proj-1").unwrap());
        let payload = build(&submission("Idea"), None, &scope, &metadata()).unwrap();
        assert_eq!(payload.project, ProjectId::new("proj-1"));
        assert_eq!(payload.team.as_str(), "team-1");
    }

    #[test]
    fn triage_state_wins_when_enabled() {
        let mut meta = metadata();
        meta.triage_enabled = true;
        meta.triage_state = Some(state("s-triage", "Triage", StateKind::Triage));
        let hint = StateId::new("s-doing");
        assert_eq!(
            default_state(&meta, hint.as_ref(), Some("In Progress")),
            StateId::new("s-triage")
        );
    }

    #[test]
    fn triage_disabled_falls_through_to_hints() {
        let mut meta = metadata();
        meta.triage_state = Some(state("s-triage", "Triage", StateKind::Triage));
        assert_eq!(
            default_state(&meta, None, Some("In Progress")),
            StateId::new("s-doing")
        );
    }

    #[test]
    fn unknown_hint_falls_back_to_first_unstarted() {
        assert_eq!(
            default_state(&metadata(), StateId::new("nope").as_ref(), Some("Nope")),
            StateId::new("s-todo")
        );
    }

    #[test]
    fn without_unstarted_state_the_first_state_is_used() {
        let mut meta = metadata();
        meta.states.retain(|s| s.kind != StateKind::Unstarted);
        assert_eq!(default_state(&meta, None, None), StateId::new("s-backlog"));
        meta.states.clear();
        assert_eq!(default_state(&meta, None, None), None);
    }
}
