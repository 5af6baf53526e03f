use super::common::*;

use crate::workflows::screening::domain::{
    KnockoutCondition, KnockoutValue, QuestionKind, QuestionRole, QuestionType, ScaleBounds,
    ScreeningQuestion, MIN_CHOICE_OPTIONS,
};
use crate::workflows::screening::{
    add_option, create_question, create_question_with, remove_option, update_question,
    QuestionPatch, QuestionSet, QuestionTemplate, ScreeningPolicy, ValidationError,
};

const ALL_TYPES: [QuestionType; 4] = [
    QuestionType::MultipleChoice,
    QuestionType::YesNo,
    QuestionType::Scale,
    QuestionType::ShortText,
];

fn assert_invariants(question: &ScreeningQuestion) {
    if question.is_knockout() {
        assert_eq!(question.weight(), 0, "knockout question carries weight");
    }
    assert!(question.weight() <= 100);
    match question.kind() {
        QuestionKind::MultipleChoice { options } => {
            assert!(options.len() >= MIN_CHOICE_OPTIONS)
        }
        QuestionKind::Scale { bounds } => assert!(bounds.min() < bounds.max()),
        QuestionKind::YesNo | QuestionKind::ShortText { .. } => {}
    }
}

#[test]
fn new_questions_get_type_defaults() {
    for question_type in ALL_TYPES {
        let question = create_question(question_type);
        assert_eq!(question.question_type(), question_type);
        assert_eq!(question.title(), "New question");
        assert!(!question.required());
        assert!(!question.is_knockout());
        assert_eq!(question.weight(), 10);
        assert_invariants(&question);
    }

    match create_question(QuestionType::MultipleChoice).kind() {
        QuestionKind::MultipleChoice { options } => {
            assert_eq!(options, &vec!["Option 1".to_string(), "Option 2".to_string()])
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(
        create_question(QuestionType::Scale).kind(),
        &QuestionKind::Scale {
            bounds: ScaleBounds::default()
        }
    );
}

#[test]
fn default_weight_follows_policy() {
    let policy = ScreeningPolicy {
        default_scored_weight: 25,
        ..ScreeningPolicy::default()
    };
    assert_eq!(create_question_with(QuestionType::YesNo, &policy).weight(), 25);
}

#[test]
fn marking_knockout_zeroes_weight_and_unmarking_restores_default() {
    let question = create_question(QuestionType::YesNo);
    let weighted = update_question(
        &question,
        QuestionPatch {
            weight: Some(40),
            ..QuestionPatch::default()
        },
    )
    .expect("weight accepted");
    assert_eq!(weighted.weight(), 40);

    let knockout = update_question(
        &weighted,
        QuestionPatch {
            is_knockout: Some(true),
            ..QuestionPatch::default()
        },
    )
    .expect("toggle accepted");
    assert!(knockout.is_knockout());
    assert_eq!(knockout.weight(), 0);
    assert_eq!(
        knockout.role(),
        &QuestionRole::Knockout {
            condition: Some(KnockoutCondition::Equals),
            value: None
        }
    );

    let scored = update_question(
        &knockout,
        QuestionPatch {
            is_knockout: Some(false),
            ..QuestionPatch::default()
        },
    )
    .expect("toggle back accepted");
    assert_eq!(scored.weight(), 10);
}

#[test]
fn unmarking_knockout_with_explicit_weight_uses_it() {
    let question = work_authorization();
    let scored = update_question(
        &question,
        QuestionPatch {
            is_knockout: Some(false),
            weight: Some(30),
            ..QuestionPatch::default()
        },
    )
    .expect("patch accepted");
    assert_eq!(scored.weight(), 30);
}

#[test]
fn weight_on_knockout_is_rejected() {
    let question = work_authorization();
    let error = update_question(
        &question,
        QuestionPatch {
            weight: Some(15),
            ..QuestionPatch::default()
        },
    )
    .expect_err("weight must be rejected");
    assert_eq!(error, ValidationError::WeightOnKnockout);

    let unchanged = update_question(
        &question,
        QuestionPatch {
            weight: Some(0),
            ..QuestionPatch::default()
        },
    )
    .expect("zero weight is a no-op");
    assert_eq!(unchanged, question);
}

#[test]
fn weight_above_hundred_is_rejected() {
    let question = create_question(QuestionType::ShortText);
    let error = update_question(
        &question,
        QuestionPatch {
            weight: Some(101),
            ..QuestionPatch::default()
        },
    )
    .expect_err("out of range");
    assert_eq!(error, ValidationError::WeightOutOfRange(101));
}

#[test]
fn knockout_fields_on_scored_question_are_rejected() {
    let question = create_question(QuestionType::YesNo);
    let error = update_question(
        &question,
        QuestionPatch {
            knockout_condition: Some(KnockoutCondition::Contains),
            ..QuestionPatch::default()
        },
    )
    .expect_err("scored question has no condition");
    assert_eq!(
        error,
        ValidationError::KnockoutFieldOnScoredQuestion {
            field: "knockout_condition"
        }
    );
}

#[test]
fn blank_knockout_value_is_rejected() {
    let question = work_authorization();
    let error = update_question(
        &question,
        QuestionPatch {
            knockout_value: Some(KnockoutValue::Text("   ".to_string())),
            ..QuestionPatch::default()
        },
    )
    .expect_err("blank value");
    assert_eq!(error, ValidationError::BlankKnockoutValue);
}

#[test]
fn changing_type_resets_type_specific_fields() {
    let scale = update_question(
        &create_question(QuestionType::Scale),
        QuestionPatch {
            min_value: Some(0),
            max_value: Some(10),
            ..QuestionPatch::default()
        },
    )
    .expect("bounds accepted");

    let choice = update_question(
        &scale,
        QuestionPatch {
            question_type: Some(QuestionType::MultipleChoice),
            ..QuestionPatch::default()
        },
    )
    .expect("type change accepted");
    assert_eq!(choice.question_type(), QuestionType::MultipleChoice);
    assert_invariants(&choice);

    let back = update_question(
        &choice,
        QuestionPatch {
            question_type: Some(QuestionType::Scale),
            ..QuestionPatch::default()
        },
    )
    .expect("type change accepted");
    assert_eq!(
        back.kind(),
        &QuestionKind::Scale {
            bounds: ScaleBounds::default()
        }
    );
    assert_eq!(back.id(), scale.id());
}

#[test]
fn inverted_scale_bounds_leave_question_untouched() {
    let question = create_question(QuestionType::Scale);
    let error = update_question(
        &question,
        QuestionPatch {
            min_value: Some(7),
            max_value: Some(3),
            ..QuestionPatch::default()
        },
    )
    .expect_err("inverted bounds");
    assert_eq!(error, ValidationError::InvalidScaleRange { min: 7, max: 3 });
    assert_eq!(
        question.kind(),
        &QuestionKind::Scale {
            bounds: ScaleBounds::default()
        }
    );
}

#[test]
fn partial_bound_update_is_checked_against_current_range() {
    let question = create_question(QuestionType::Scale);
    let error = update_question(
        &question,
        QuestionPatch {
            min_value: Some(5),
            ..QuestionPatch::default()
        },
    )
    .expect_err("min would equal max");
    assert_eq!(error, ValidationError::InvalidScaleRange { min: 5, max: 5 });

    let widened = update_question(
        &question,
        QuestionPatch {
            max_value: Some(10),
            ..QuestionPatch::default()
        },
    )
    .expect("max raised");
    assert_eq!(
        widened.kind(),
        &QuestionKind::Scale {
            bounds: ScaleBounds::new(1, 10).expect("valid bounds")
        }
    );
}

#[test]
fn fields_for_other_types_are_rejected() {
    let question = create_question(QuestionType::YesNo);
    let error = update_question(
        &question,
        QuestionPatch {
            options: Some(vec!["a".to_string(), "b".to_string()]),
            ..QuestionPatch::default()
        },
    )
    .expect_err("yes/no has no options");
    assert_eq!(
        error,
        ValidationError::NotApplicable {
            field: "options",
            question_type: QuestionType::YesNo
        }
    );
}

#[test]
fn option_list_keeps_two_entry_floor() {
    let question = create_question(QuestionType::MultipleChoice);

    let error = update_question(
        &question,
        QuestionPatch {
            options: Some(vec!["Only".to_string()]),
            ..QuestionPatch::default()
        },
    )
    .expect_err("single option");
    assert_eq!(error, ValidationError::TooFewOptions { remaining: 1 });

    let error = remove_option(&question, 0).expect_err("would leave one option");
    assert_eq!(error, ValidationError::TooFewOptions { remaining: 1 });

    let extended = add_option(&question, "Option 3").expect("option added");
    let trimmed = remove_option(&extended, 0).expect("three options can lose one");
    match trimmed.kind() {
        QuestionKind::MultipleChoice { options } => {
            assert_eq!(options, &vec!["Option 2".to_string(), "Option 3".to_string()])
        }
        other => panic!("unexpected kind {other:?}"),
    }

    assert_eq!(
        remove_option(&extended, 9),
        Err(ValidationError::OptionOutOfRange { index: 9, len: 3 })
    );
    assert_eq!(add_option(&question, "  "), Err(ValidationError::EmptyOption));
}

#[test]
fn empty_title_is_rejected() {
    let question = create_question(QuestionType::ShortText);
    let error = update_question(
        &question,
        QuestionPatch {
            title: Some("   ".to_string()),
            ..QuestionPatch::default()
        },
    )
    .expect_err("blank title");
    assert_eq!(error, ValidationError::EmptyTitle);
}

#[test]
fn short_text_cap_can_be_cleared() {
    let question = create_question(QuestionType::ShortText);
    let capped = update_question(
        &question,
        QuestionPatch {
            max_length: Some(280),
            ..QuestionPatch::default()
        },
    )
    .expect("cap set");
    assert_eq!(
        capped.kind(),
        &QuestionKind::ShortText {
            max_length: Some(280)
        }
    );

    let cleared = update_question(
        &capped,
        QuestionPatch {
            max_length: Some(0),
            ..QuestionPatch::default()
        },
    )
    .expect("cap cleared");
    assert_eq!(cleared.kind(), &QuestionKind::ShortText { max_length: None });
}

#[test]
fn invariants_hold_across_edit_sequences() {
    let patches = [
        QuestionPatch {
            is_knockout: Some(true),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            weight: Some(35),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            options: Some(vec!["x".to_string()]),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            min_value: Some(9),
            max_value: Some(2),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            is_knockout: Some(false),
            weight: Some(60),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            knockout_value: Some("no".into()),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            question_type: Some(QuestionType::Scale),
            ..QuestionPatch::default()
        },
        QuestionPatch {
            question_type: Some(QuestionType::MultipleChoice),
            is_knockout: Some(true),
            ..QuestionPatch::default()
        },
    ];

    for question_type in ALL_TYPES {
        let mut question = create_question(question_type);
        for patch in patches.iter().cloned() {
            if let Ok(updated) = update_question(&question, patch) {
                question = updated;
            }
            assert_invariants(&question);
        }
    }
}

#[test]
fn question_set_tracks_order_and_labels() {
    let policy = policy();
    let mut set = QuestionSet::new();
    let first = set.add_new(QuestionType::YesNo, &policy).id().clone();
    let second = set.add_new(QuestionType::Scale, &policy).id().clone();
    let third = set.add_new(QuestionType::ShortText, &policy).id().clone();

    assert_eq!(set.label_of(&third).as_deref(), Some("Q3"));
    set.move_to(&third, 0).expect("move within range");
    assert_eq!(set.label_of(&third).as_deref(), Some("Q1"));
    assert_eq!(set.label_of(&first).as_deref(), Some("Q2"));

    assert_eq!(
        set.move_to(&second, 3),
        Err(ValidationError::PositionOutOfRange { index: 3, len: 3 })
    );

    let removed = set.remove(&first).expect("remove existing question");
    assert_eq!(removed.id(), &first);
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.remove(&first),
        Err(ValidationError::UnknownQuestion(first.clone()))
    );

    let duplicate = set.get(&second).cloned().expect("question exists");
    assert_eq!(
        set.add(duplicate).map(|question| question.id().clone()),
        Err(ValidationError::DuplicateQuestion(second.clone()))
    );
}

#[test]
fn question_set_update_applies_patch_in_place() {
    let policy = policy();
    let mut set = QuestionSet::new();
    let id = set.add_new(QuestionType::YesNo, &policy).id().clone();

    let updated = set
        .update(
            &id,
            QuestionPatch {
                title: Some("Can you start within two weeks?".to_string()),
                required: Some(true),
                ..QuestionPatch::default()
            },
            &policy,
        )
        .expect("patch applied")
        .clone();
    assert!(updated.required());
    assert_eq!(set.get(&id), Some(&updated));
    assert_eq!(set.total_weight(), 10);
}

#[test]
fn templates_are_balanced_and_complete() {
    let policy = policy();
    for template in [
        QuestionTemplate::General,
        QuestionTemplate::SoftwareEngineer,
        QuestionTemplate::CustomerSupport,
    ] {
        let set = QuestionSet::from_template(template);
        assert!(!set.is_empty(), "{} is empty", template.label());
        assert_eq!(set.total_weight(), 100, "{} is unbalanced", template.label());
        assert!(set.warnings(&policy).is_empty(), "{} warns", template.label());
        assert!(set.check_integrity().is_ok());
        assert!(set.knockout_count() >= 1);
        for question in &set {
            assert_invariants(question);
        }
    }
}
