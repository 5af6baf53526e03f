use crate::infra::{parse_template, read_json, CannedSuggestions, InMemoryPostingRepository};
use crate::routes::validate_records;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_screen::config::AppConfig;
use talent_screen::error::AppError;
use talent_screen::workflows::screening::{
    AnswerValue, CandidateAnswers, CandidateId, EvaluationEngine, KnockoutCondition,
    KnockoutValue, QuestionKind, QuestionRecord, QuestionSet, QuestionTemplate, ScreeningQuestion,
    ScreeningService,
};

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON file holding an array of question records
    #[arg(long)]
    pub(crate) questions: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding an array of question records
    #[arg(long)]
    pub(crate) questions: PathBuf,
    /// JSON file mapping question ids to the candidate's answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Starter template: general, software_engineer or customer_support
    #[arg(long, value_parser = parse_template, default_value = "software_engineer")]
    pub(crate) template: QuestionTemplate,
    /// Job title for the demo posting
    #[arg(long, default_value = "Senior Rust Engineer")]
    pub(crate) title: String,
    /// Append generated question suggestions before publishing
    #[arg(long)]
    pub(crate) suggest: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let policy = AppConfig::load()?.screening;
    let records: Vec<QuestionRecord> = read_json(&args.questions)?;
    let report = validate_records(records, &policy)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let records: Vec<QuestionRecord> = read_json(&args.questions)?;
    let answers: CandidateAnswers = read_json(&args.answers)?;
    let questions = QuestionSet::from_records(records)?;

    let missing = answers.missing_required(questions.questions());
    if !missing.is_empty() {
        let ids: Vec<_> = missing.iter().map(|id| id.0.as_str()).collect();
        eprintln!("warning: required questions unanswered: {}", ids.join(", "));
    }

    let result = EvaluationEngine::new().evaluate(questions.questions(), &answers)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        template,
        title,
        suggest,
    } = args;
    let policy = AppConfig::load()?.screening;
    let service = ScreeningService::new(Arc::new(InMemoryPostingRepository::default()), policy);

    println!("Screening question demo");
    let posting = service.create_posting(&title, Some(template))?;
    let posting_id = posting.posting_id.clone();
    println!(
        "- Created draft {} \"{}\" from the {} template",
        posting_id,
        posting.title,
        template.label()
    );

    if suggest {
        let added = service.apply_suggestions(&posting_id, &CannedSuggestions, &title)?;
        println!("- Added {} suggested question(s)", added.len());
    }

    let warnings = service.validate(&posting_id)?;
    if warnings.is_empty() {
        println!("- Validation: no advisory warnings");
    } else {
        println!("- Validation warnings:");
        for warning in &warnings {
            println!("    [{}] {}", warning.code(), warning.message());
        }
    }

    let published = service.publish(&posting_id)?;
    println!(
        "- Published {} questions ({} knockout, total weight {}) at {}",
        published.questions.len(),
        published.questions.knockout_count(),
        published.questions.total_weight(),
        published
            .published_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    );
    for (index, question) in published.questions.questions().iter().enumerate() {
        println!("    Q{} {}", index + 1, describe(question));
    }

    let candidates: Vec<(CandidateId, CandidateAnswers)> = [
        ("cand-ada", Profile::Strong),
        ("cand-lin", Profile::Steady),
        ("cand-max", Profile::Disqualified),
    ]
    .into_iter()
    .map(|(id, profile)| {
        (
            CandidateId(id.to_string()),
            sample_answers(published.questions.questions(), profile),
        )
    })
    .collect();

    println!("\nCandidate evaluations");
    for (candidate_id, answers) in &candidates {
        match service.evaluate(&posting_id, answers) {
            Ok(result) => println!("- {}: {}", candidate_id, result.summary()),
            Err(err) => println!("- {}: evaluation rejected ({})", candidate_id, err),
        }
    }

    println!("\nReview queue");
    for entry in service.rank(&posting_id, &candidates)? {
        let status = if entry.result.is_knocked_out {
            "knocked out"
        } else {
            "eligible"
        };
        println!(
            "  {}. {} ({}, score {:.2})",
            entry.rank, entry.candidate_id, status, entry.result.weighted_score
        );
    }

    let view = service.get(&posting_id)?.view(service.policy());
    println!("\nPosting payload:\n{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    Strong,
    Steady,
    Disqualified,
}

fn describe(question: &ScreeningQuestion) -> String {
    let rule = match question.role().knockout_rule() {
        Some((condition, value)) => format!(
            "knockout if answer {} {}",
            condition.label(),
            value.as_text()
        ),
        None => format!("weight {}", question.weight()),
    };
    let required = if question.required() { ", required" } else { "" };
    format!(
        "[{}{}] {} ({})",
        question.question_type(),
        required,
        question.title(),
        rule
    )
}

fn sample_answers(questions: &[ScreeningQuestion], profile: Profile) -> CandidateAnswers {
    questions
        .iter()
        .fold(CandidateAnswers::new(), |answers, question| {
            match sample_answer(question, profile) {
                Some(answer) => answers.with(question.id(), answer),
                None => answers,
            }
        })
}

fn sample_answer(question: &ScreeningQuestion, profile: Profile) -> Option<AnswerValue> {
    if let Some((condition, value)) = question.role().knockout_rule() {
        return if profile == Profile::Disqualified {
            disqualifying_answer(condition, value)
        } else {
            passing_answer(condition, value)
        };
    }
    if question.is_knockout() {
        return None;
    }

    let answer = match question.kind() {
        QuestionKind::Scale { bounds } => match profile {
            Profile::Steady => AnswerValue::Number((bounds.min() + bounds.max()) as f64 / 2.0),
            Profile::Strong | Profile::Disqualified => AnswerValue::Number(bounds.max() as f64),
        },
        QuestionKind::YesNo => AnswerValue::Flag(profile != Profile::Steady),
        QuestionKind::MultipleChoice { options } => {
            AnswerValue::Text(options.first().cloned().unwrap_or_default())
        }
        QuestionKind::ShortText { .. } => {
            AnswerValue::Text("Led the migration of a billing pipeline.".to_string())
        }
    };
    Some(answer)
}

fn disqualifying_answer(condition: KnockoutCondition, value: &KnockoutValue) -> Option<AnswerValue> {
    match condition {
        KnockoutCondition::Equals | KnockoutCondition::Contains => {
            Some(AnswerValue::Text(value.as_text()))
        }
        KnockoutCondition::LessThan => value.as_number().map(|limit| AnswerValue::Number(limit - 1.0)),
        KnockoutCondition::GreaterThan => {
            value.as_number().map(|limit| AnswerValue::Number(limit + 1.0))
        }
    }
}

fn passing_answer(condition: KnockoutCondition, value: &KnockoutValue) -> Option<AnswerValue> {
    match condition {
        KnockoutCondition::Equals => {
            let text = value.as_text();
            let answer = match text.trim().to_ascii_lowercase().as_str() {
                "no" => "yes",
                "yes" => "no",
                _ => "none of the above",
            };
            Some(AnswerValue::from(answer))
        }
        KnockoutCondition::Contains => Some(AnswerValue::from("none of the above")),
        KnockoutCondition::LessThan => value.as_number().map(|limit| AnswerValue::Number(limit + 1.0)),
        KnockoutCondition::GreaterThan => {
            value.as_number().map(|limit| AnswerValue::Number(limit - 1.0))
        }
    }
}
