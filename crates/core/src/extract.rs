//! Free-text to [`FilterSet`] extraction.
//!
//! Each predicate kind has an ordered list of independent [`Rule`]s. A rule is a
//! compiled pattern plus a function turning its captures into a predicate fragment.
//! The first rule (in list order) that yields a fragment wins for that kind.
//!
//! Extraction is total: text that matches nothing yields an empty [`FilterSet`].

use crate::error::QueryResult;
use crate::intent::{Action, AgeFilter, Condition, FilterSet, Modifier};
use nlq_types::Gender;
use regex::{Captures, Regex};

struct Rule<T> {
    pattern: Regex,
    build: fn(&Captures<'_>) -> Option<T>,
}

impl<T> Rule<T> {
    fn new(pattern: &str, build: fn(&Captures<'_>) -> Option<T>) -> QueryResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            build,
        })
    }

    fn apply(&self, text: &str) -> Option<T> {
        self.pattern
            .captures(text)
            .and_then(|caps| (self.build)(&caps))
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            build: self.build,
        }
    }
}

fn first_match<T>(rules: &[Rule<T>], text: &str) -> Option<T> {
    rules.iter().find_map(|rule| rule.apply(text))
}

/// Digits only reach here, so a parse failure means overflow; saturate.
fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    Some(caps.get(group)?.as_str().parse().unwrap_or(u32::MAX))
}

/// Turns query text into a [`FilterSet`].
#[derive(Clone)]
pub struct IntentExtractor {
    action_rules: Vec<Rule<Action>>,
    age_rules: Vec<Rule<AgeFilter>>,
    gender_rules: Vec<Rule<Gender>>,
    condition_rules: Vec<Rule<Condition>>,
    modifier_rules: Vec<Rule<Modifier>>,
}

impl IntentExtractor {
    /// Compile the rule tables.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::Pattern`] if a rule pattern fails to compile.
    pub fn new() -> QueryResult<Self> {
        let action_rules = vec![
            Rule::new(
                r"\b(?:list|show|get|find|give)\s+(?:me\s+)?([0-9]+)\b",
                |c| number(c, 1).filter(|n| *n > 0).map(Action::List),
            )?,
            Rule::new(r"\b(?:show|display|list|get)\b", |_| Some(Action::Show))?,
            Rule::new(r"\b(?:find|search|locate)\b", |_| Some(Action::Find))?,
            Rule::new(r"\b(?:count|how\s+many|number\s+of)\b", |_| {
                Some(Action::Count)
            })?,
        ];

        let age_rules = vec![
            Rule::new(
                r"\b(?:over|above|older\s+than|greater\s+than)\s+(?:the\s+age\s+of\s+)?([0-9]+)\b",
                |c| number(c, 1).map(AgeFilter::Gt),
            )?,
            Rule::new(
                r"\b(?:under|below|younger\s+than|less\s+than)\s+(?:the\s+age\s+of\s+)?([0-9]+)\b",
                |c| number(c, 1).map(AgeFilter::Lt),
            )?,
            Rule::new(r"\bbetween\s+([0-9]+)\s+(?:and|to)\s+([0-9]+)\b", |c| {
                Some(AgeFilter::range(number(c, 1)?, number(c, 2)?))
            })?,
            Rule::new(r"\baged?\s+([0-9]+)\s*(?:-|to)\s*([0-9]+)\b", |c| {
                Some(AgeFilter::range(number(c, 1)?, number(c, 2)?))
            })?,
            Rule::new(r"\b([0-9]+)\s*(?:-|to)\s*([0-9]+)\s+years?\s+old\b", |c| {
                Some(AgeFilter::range(number(c, 1)?, number(c, 2)?))
            })?,
            Rule::new(r"\baged?\s+([0-9]+)\b", |c| {
                number(c, 1).map(|n| AgeFilter::range(n, n))
            })?,
        ];

        let gender_rules = vec![
            Rule::new(r"\b(?:male|males|men|man)\b", |_| Some(Gender::Male))?,
            Rule::new(r"\b(?:female|females|women|woman)\b", |_| {
                Some(Gender::Female)
            })?,
        ];

        let mut condition_rules = Vec::with_capacity(Condition::ALL.len());
        for condition in Condition::ALL {
            condition_rules.push(Rule::new(condition.pattern(), condition_builder(condition))?);
        }

        let modifier_rules = vec![
            Rule::new(r"\ball\b", |_| Some(Modifier::All))?,
            Rule::new(r"\bactive\b", |_| Some(Modifier::Active))?,
            Rule::new(r"\brecent(?:ly)?\b", |_| Some(Modifier::Recent))?,
        ];

        Ok(Self {
            action_rules,
            age_rules,
            gender_rules,
            condition_rules,
            modifier_rules,
        })
    }

    /// Extract a [`FilterSet`] from `text`. Never fails.
    pub fn extract(&self, text: &str) -> FilterSet {
        let text = text.to_lowercase();

        FilterSet {
            action: first_match(&self.action_rules, &text).unwrap_or_default(),
            age: first_match(&self.age_rules, &text),
            gender: first_match(&self.gender_rules, &text),
            condition: first_match(&self.condition_rules, &text),
            modifiers: self
                .modifier_rules
                .iter()
                .filter_map(|rule| rule.apply(&text))
                .collect(),
        }
    }
}

// Rule builders are plain fn pointers, so each condition gets its own non-capturing closure.
fn condition_builder(condition: Condition) -> fn(&Captures<'_>) -> Option<Condition> {
    match condition {
        Condition::Diabetes => |_| Some(Condition::Diabetes),
        Condition::Hypertension => |_| Some(Condition::Hypertension),
        Condition::Depression => |_| Some(Condition::Depression),
        Condition::HeartDisease => |_| Some(Condition::HeartDisease),
        Condition::Asthma => |_| Some(Condition::Asthma),
        Condition::Copd => |_| Some(Condition::Copd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> FilterSet {
        IntentExtractor::new().expect("patterns compile").extract(text)
    }

    #[test]
    fn diabetic_patients_over_fifty() {
        let filters = extract("Show me all diabetic patients over 50");
        assert_eq!(filters.action, Action::Show);
        assert_eq!(filters.resource_type(), "Patient");
        assert_eq!(filters.condition, Some(Condition::Diabetes));
        assert_eq!(filters.age, Some(AgeFilter::Gt(50)));
        assert_eq!(filters.gender, None);
        assert_eq!(filters.modifiers, vec![Modifier::All]);
    }

    #[test]
    fn female_patients_with_hypertension() {
        let filters = extract("Find female patients with hypertension");
        assert_eq!(filters.action, Action::Find);
        assert_eq!(filters.gender, Some(Gender::Female));
        assert_eq!(filters.condition, Some(Condition::Hypertension));
        assert_eq!(filters.age, None);
    }

    #[test]
    fn active_asthma_patients() {
        let filters = extract("Get all active asthma patients");
        assert_eq!(filters.condition, Some(Condition::Asthma));
        assert_eq!(filters.age, None);
        assert_eq!(filters.gender, None);
        assert!(filters.has_modifier(Modifier::Active));
        assert!(filters.has_modifier(Modifier::All));
    }

    #[test]
    fn comparison_cue_words_map_to_operators() {
        for (text, expected) in [
            ("patients over 40", AgeFilter::Gt(40)),
            ("patients above 41", AgeFilter::Gt(41)),
            ("patients older than 42", AgeFilter::Gt(42)),
            ("patients over the age of 43", AgeFilter::Gt(43)),
            ("patients under 20", AgeFilter::Lt(20)),
            ("patients below 21", AgeFilter::Lt(21)),
            ("patients younger than 22", AgeFilter::Lt(22)),
            ("patients less than 23", AgeFilter::Lt(23)),
        ] {
            assert_eq!(extract(text).age, Some(expected), "{text}");
        }
    }

    #[test]
    fn ranges_and_exact_ages() {
        assert_eq!(
            extract("patients between 60 and 40").age,
            Some(AgeFilter::Range { min: 40, max: 60 })
        );
        assert_eq!(
            extract("patients aged 30-45").age,
            Some(AgeFilter::Range { min: 30, max: 45 })
        );
        assert_eq!(
            extract("patients 18 to 25 years old").age,
            Some(AgeFilter::Range { min: 18, max: 25 })
        );
        assert_eq!(
            extract("patients age 40").age,
            Some(AgeFilter::Range { min: 40, max: 40 })
        );
    }

    #[test]
    fn earlier_age_rule_wins() {
        assert_eq!(extract("patients over 50 and under 70").age, Some(AgeFilter::Gt(50)));
    }

    #[test]
    fn comparison_beats_unrelated_number_ranges() {
        let filters = extract("Show diabetic patients over 50 seen in the last 1-2 years");
        assert_eq!(filters.age, Some(AgeFilter::Gt(50)));
        assert_eq!(
            extract("patients under 30 admitted 3 to 5 years ago").age,
            Some(AgeFilter::Lt(30))
        );
        assert_eq!(extract("patients seen 1-2 years ago").age, None);
    }

    #[test]
    fn large_numbers_are_not_truncated() {
        assert_eq!(extract("patients over 1000").age, Some(AgeFilter::Gt(1000)));
        assert_eq!(
            extract("patients over 99999999999999999999").age,
            Some(AgeFilter::Gt(u32::MAX))
        );
        assert_eq!(extract("list 5000 patients").action, Action::List(5000));
    }

    #[test]
    fn numbers_without_cue_words_are_ignored() {
        assert_eq!(extract("patients seen in room 50").age, None);
        assert_eq!(extract("patients over fifty").age, None);
    }

    #[test]
    fn gender_keywords() {
        assert_eq!(extract("male patients").gender, Some(Gender::Male));
        assert_eq!(extract("Men with asthma").gender, Some(Gender::Male));
        assert_eq!(extract("FEMALE patients").gender, Some(Gender::Female));
        assert_eq!(extract("women over 40").gender, Some(Gender::Female));
        // "female" contains "male" but not on a word boundary.
        assert_ne!(extract("female patients").gender, Some(Gender::Male));
        assert_eq!(extract("patients with asthma").gender, None);
    }

    #[test]
    fn first_gender_rule_wins() {
        assert_eq!(extract("women and men").gender, Some(Gender::Male));
    }

    #[test]
    fn condition_vocabulary() {
        for (text, expected) in [
            ("diabetes", Condition::Diabetes),
            ("diabetic", Condition::Diabetes),
            ("hypertension", Condition::Hypertension),
            ("high blood pressure", Condition::Hypertension),
            ("depression", Condition::Depression),
            ("heart disease", Condition::HeartDisease),
            ("asthma", Condition::Asthma),
            ("COPD", Condition::Copd),
        ] {
            let query = format!("patients with {text}");
            assert_eq!(extract(&query).condition, Some(expected), "{query}");
        }
    }

    #[test]
    fn vocabulary_order_breaks_condition_ties() {
        assert_eq!(
            extract("asthma patients who also have diabetes").condition,
            Some(Condition::Diabetes)
        );
    }

    #[test]
    fn explicit_count_sets_list_action() {
        let filters = extract("List 3 patients under 30 with depression");
        assert_eq!(filters.action, Action::List(3));
        assert_eq!(filters.age, Some(AgeFilter::Lt(30)));
        assert_eq!(filters.condition, Some(Condition::Depression));

        assert_eq!(extract("Show me 12 male patients").action, Action::List(12));
        assert_eq!(extract("List 0 patients").action, Action::Show);
    }

    #[test]
    fn count_verbs() {
        assert_eq!(extract("How many patients have asthma").action, Action::Count);
        assert_eq!(extract("count diabetic patients").action, Action::Count);
    }

    #[test]
    fn default_action_is_show() {
        assert_eq!(extract("asthma").action, Action::Show);
    }

    #[test]
    fn unmatched_text_yields_empty_filter_set() {
        let filters = extract("lorem ipsum dolor sit amet");
        assert!(filters.is_unfiltered());
        assert_eq!(filters, FilterSet::default());
    }

    #[test]
    fn recent_modifier() {
        let filters = extract("patients seen recently with copd");
        assert_eq!(filters.modifiers, vec![Modifier::Recent]);
        assert_eq!(filters.condition, Some(Condition::Copd));
    }
}
