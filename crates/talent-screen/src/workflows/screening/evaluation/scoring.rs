use super::super::answers::{AnswerValue, CandidateAnswers};
use super::super::domain::{QuestionKind, ScreeningQuestion};
use super::rubric::AnswerRubric;
use super::ScoreComponent;

const MAX_SCORE: f64 = 100.0;

/// Share of a question's weight earned by `answer`, in `0.0..=1.0`.
pub(crate) fn normalized_answer(
    question: &ScreeningQuestion,
    answer: &AnswerValue,
    rubric: &dyn AnswerRubric,
) -> f64 {
    let value = match question.kind() {
        QuestionKind::Scale { bounds } => answer
            .as_number()
            .map(|value| bounds.normalize(value))
            .unwrap_or(0.0),
        QuestionKind::YesNo => match answer.as_flag() {
            Some(true) => 1.0,
            _ => 0.0,
        },
        QuestionKind::MultipleChoice { .. } | QuestionKind::ShortText { .. } => {
            rubric.grade(question, answer).unwrap_or(0.0)
        }
    };
    value.clamp(0.0, 1.0)
}

/// Weighted score over the scored questions, clamped to `0..=100`.
pub(crate) fn score_questions(
    questions: &[ScreeningQuestion],
    answers: &CandidateAnswers,
    rubric: &dyn AnswerRubric,
) -> (Vec<ScoreComponent>, f64) {
    let mut components = Vec::new();
    let mut total = 0.0;

    for question in questions.iter().filter(|question| !question.is_knockout()) {
        let weight = question.weight();
        let normalized = answers
            .answer_for(question.id())
            .map(|answer| normalized_answer(question, answer, rubric))
            .unwrap_or(0.0);
        let contribution = normalized * f64::from(weight);
        total += contribution;

        components.push(ScoreComponent {
            question_id: question.id().clone(),
            weight,
            normalized,
            contribution: round_points(contribution),
        });
    }

    (components, round_points(total.clamp(0.0, MAX_SCORE)))
}

fn round_points(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
