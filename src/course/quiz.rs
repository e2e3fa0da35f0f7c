//! Quiz grading

use std::collections::{BTreeSet, HashMap};

use super::models::QuizQuestion;

/// Score a set of answers as a whole percentage.
///
/// `answers` maps question id to the chosen option ids. A question counts as
/// correct only if the chosen set equals the set of correct options exactly.
pub fn grade_quiz(questions: &[QuizQuestion], answers: &HashMap<String, Vec<String>>) -> u8 {
    if questions.is_empty() {
        return 0;
    }

    let correct = questions
        .iter()
        .filter(|question| {
            let expected: BTreeSet<&str> = question
                .options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id.as_str())
                .collect();
            let chosen: BTreeSet<&str> = answers
                .get(&question.id)
                .map(|ids| ids.iter().map(String::as_str).collect())
                .unwrap_or_default();
            chosen == expected
        })
        .count();

    ((correct as f64 / questions.len() as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::models::{QuizOption, QuizType};

    fn question(id: &str, kind: QuizType, correct: &[&str], wrong: &[&str]) -> QuizQuestion {
        let options = correct
            .iter()
            .map(|o| (o, true))
            .chain(wrong.iter().map(|o| (o, false)))
            .map(|(o, is_correct)| QuizOption {
                id: o.to_string(),
                text: o.to_string(),
                is_correct,
            })
            .collect();
        QuizQuestion {
            id: id.to_string(),
            question: format!("Question {}", id),
            kind,
            options,
            explanation: None,
        }
    }

    fn answers(entries: Vec<(&str, Vec<&str>)>) -> HashMap<String, Vec<String>> {
        entries
            .into_iter()
            .map(|(q, opts)| (q.to_string(), opts.iter().map(|o| o.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_all_correct() {
        let questions = vec![
            question("q1", QuizType::Single, &["a"], &["b"]),
            question("q2", QuizType::Multiple, &["a", "c"], &["b"]),
        ];
        let score = grade_quiz(&questions, &answers(vec![("q1", vec!["a"]), ("q2", vec!["c", "a"])]));
        assert_eq!(score, 100);
    }

    #[test]
    fn test_partial_multiple_choice_is_wrong() {
        let questions = vec![
            question("q1", QuizType::Single, &["a"], &["b"]),
            question("q2", QuizType::Multiple, &["a", "c"], &["b"]),
            question("q3", QuizType::Single, &["b"], &["a"]),
        ];
        let score = grade_quiz(&questions, &answers(vec![("q1", vec!["a"]), ("q2", vec!["a"])]));
        // 1 of 3 correct
        assert_eq!(score, 33);
    }

    #[test]
    fn test_rounds_to_nearest() {
        let questions = vec![
            question("q1", QuizType::Single, &["a"], &["b"]),
            question("q2", QuizType::Single, &["a"], &["b"]),
            question("q3", QuizType::Single, &["a"], &["b"]),
        ];
        let score = grade_quiz(&questions, &answers(vec![("q1", vec!["a"]), ("q2", vec!["a"])]));
        assert_eq!(score, 67);
    }

    #[test]
    fn test_empty_quiz_scores_zero() {
        assert_eq!(grade_quiz(&[], &HashMap::new()), 0);
    }
}
