use super::super::answers::{parse_flag, AnswerValue};
use super::super::domain::{KnockoutCondition, KnockoutValue};

const NUMERIC_EPSILON: f64 = 1e-9;

/// Whether `answer` trips the configured knockout trigger.
///
/// Ordering comparisons only apply to numeric answers; anything that cannot be
/// read as a number never triggers them.
pub(crate) fn triggers(
    condition: KnockoutCondition,
    value: &KnockoutValue,
    answer: &AnswerValue,
) -> bool {
    match condition {
        KnockoutCondition::Equals => equals(value, answer),
        KnockoutCondition::LessThan => numeric_pair(value, answer)
            .map(|(expected, actual)| actual < expected)
            .unwrap_or(false),
        KnockoutCondition::GreaterThan => numeric_pair(value, answer)
            .map(|(expected, actual)| actual > expected)
            .unwrap_or(false),
        KnockoutCondition::Contains => contains(value, answer),
    }
}

fn numeric_pair(value: &KnockoutValue, answer: &AnswerValue) -> Option<(f64, f64)> {
    Some((value.as_number()?, answer.as_number()?))
}

fn equals(value: &KnockoutValue, answer: &AnswerValue) -> bool {
    if let Some((expected, actual)) = numeric_pair(value, answer) {
        return (expected - actual).abs() < NUMERIC_EPSILON;
    }

    let expected = fold(&value.as_text());
    match answer {
        AnswerValue::Flag(flag) => parse_flag(&expected) == Some(*flag),
        AnswerValue::Number(number) => fold(&number.to_string()) == expected,
        AnswerValue::Text(text) => fold(text) == expected,
        AnswerValue::Choices(choices) => match choices.as_slice() {
            [only] => fold(only) == expected,
            _ => false,
        },
    }
}

fn contains(value: &KnockoutValue, answer: &AnswerValue) -> bool {
    let needle = fold(&value.as_text());
    if needle.is_empty() {
        return false;
    }

    match answer {
        AnswerValue::Flag(flag) => {
            let text = if *flag { "yes" } else { "no" };
            text.contains(&needle)
        }
        AnswerValue::Number(number) => number.to_string().contains(&needle),
        AnswerValue::Text(text) => fold(text).contains(&needle),
        AnswerValue::Choices(choices) => choices.iter().any(|choice| fold(choice) == needle),
    }
}

fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_ignores_case_and_whitespace() {
        assert!(triggers(
            KnockoutCondition::Equals,
            &"No".into(),
            &AnswerValue::Text("  no ".to_string())
        ));
        assert!(!triggers(
            KnockoutCondition::Equals,
            &"no".into(),
            &AnswerValue::Text("not sure".to_string())
        ));
    }

    #[test]
    fn equals_compares_numbers_across_representations() {
        assert!(triggers(
            KnockoutCondition::Equals,
            &KnockoutValue::Number(3.0),
            &AnswerValue::Text("3".to_string())
        ));
        assert!(triggers(
            KnockoutCondition::Equals,
            &"2.5".into(),
            &AnswerValue::Number(2.5)
        ));
    }

    #[test]
    fn equals_reads_boolean_answers_as_yes_no() {
        assert!(triggers(
            KnockoutCondition::Equals,
            &"no".into(),
            &AnswerValue::Flag(false)
        ));
        assert!(!triggers(
            KnockoutCondition::Equals,
            &"no".into(),
            &AnswerValue::Flag(true)
        ));
    }

    #[test]
    fn ordering_never_triggers_on_text() {
        assert!(!triggers(
            KnockoutCondition::GreaterThan,
            &KnockoutValue::Number(5.0),
            &AnswerValue::Text("plenty".to_string())
        ));
        assert!(!triggers(
            KnockoutCondition::LessThan,
            &"abc".into(),
            &AnswerValue::Number(1.0)
        ));
    }

    #[test]
    fn ordering_compares_numeric_answers() {
        assert!(triggers(
            KnockoutCondition::LessThan,
            &KnockoutValue::Number(2.0),
            &AnswerValue::Number(1.0)
        ));
        assert!(!triggers(
            KnockoutCondition::LessThan,
            &KnockoutValue::Number(2.0),
            &AnswerValue::Number(2.0)
        ));
        assert!(triggers(
            KnockoutCondition::GreaterThan,
            &KnockoutValue::Number(40.0),
            &AnswerValue::Text("45".to_string())
        ));
    }

    #[test]
    fn contains_checks_substrings_and_membership() {
        assert!(triggers(
            KnockoutCondition::Contains,
            &"visa".into(),
            &AnswerValue::Text("I will need Visa sponsorship".to_string())
        ));
        assert!(triggers(
            KnockoutCondition::Contains,
            &"Night shifts".into(),
            &AnswerValue::Choices(vec!["Weekends".to_string(), "night shifts".to_string()])
        ));
        assert!(!triggers(
            KnockoutCondition::Contains,
            &"night".into(),
            &AnswerValue::Choices(vec!["Night shifts".to_string()])
        ));
    }
}
