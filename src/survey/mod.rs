//! Static assessment survey definition.
//!
//! Five scored sub-scales of three scale questions each, followed by a crisis
//! section of yes/no questions that is never scored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flat mapping from question id to stored response.
pub type Answers = BTreeMap<String, i32>;

/// Lowest and highest value of a scale question.
pub const SCALE_MIN: i32 = 1;
pub const SCALE_MAX: i32 = 10;

/// Kind of a survey section.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Intro,
    Questions,
    Completion,
}

/// Kind of a survey question.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// 1–10 rating. Inverted questions are reverse-keyed and stored as `11 - raw`.
    Scale { inverted: bool },
    /// Yes/no, stored as 1/0.
    Boolean,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub questions: &'static [Question],
}

/// A scored sub-scale of the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscale {
    Anxiety,
    Depression,
    Stress,
    Sleep,
    Social,
}

impl Subscale {
    pub const ALL: [Subscale; 5] = [
        Subscale::Anxiety,
        Subscale::Depression,
        Subscale::Stress,
        Subscale::Sleep,
        Subscale::Social,
    ];

    /// Question ids contributing to this sub-scale.
    pub fn question_ids(self) -> [&'static str; 3] {
        match self {
            Subscale::Anxiety => ["anxiety_1", "anxiety_2", "anxiety_3"],
            Subscale::Depression => ["depression_1", "depression_2", "depression_3"],
            Subscale::Stress => ["stress_1", "stress_2", "stress_3"],
            Subscale::Sleep => ["sleep_1", "sleep_2", "sleep_3"],
            Subscale::Social => ["social_1", "social_2", "social_3"],
        }
    }
}

const fn scale(id: &'static str, text: &'static str) -> Question {
    Question {
        id,
        text,
        kind: QuestionKind::Scale { inverted: false },
    }
}

const fn inverted(id: &'static str, text: &'static str) -> Question {
    Question {
        id,
        text,
        kind: QuestionKind::Scale { inverted: true },
    }
}

const fn yes_no(id: &'static str, text: &'static str) -> Question {
    Question {
        id,
        text,
        kind: QuestionKind::Boolean,
    }
}

/// Id of the crisis section.
pub const CRISIS_SECTION_ID: &str = "emergency";

pub static SECTIONS: &[Section] = &[
    Section {
        id: "intro",
        title: "Mental Health Assessment",
        description: "This assessment will help us understand your current mental health status. It takes about 5-10 minutes to complete. Your answers are confidential and will be used to provide personalized recommendations.",
        kind: SectionKind::Intro,
        questions: &[],
    },
    Section {
        id: "anxiety",
        title: "Anxiety Assessment",
        description: "The following questions relate to anxiety symptoms you may have experienced in the past two weeks.",
        kind: SectionKind::Questions,
        questions: &[
            scale("anxiety_1", "How often have you been feeling nervous, anxious, or on edge?"),
            scale("anxiety_2", "How often have you not been able to stop or control worrying?"),
            scale("anxiety_3", "How often have you had trouble relaxing?"),
        ],
    },
    Section {
        id: "depression",
        title: "Depression Assessment",
        description: "The following questions relate to depressive symptoms you may have experienced in the past two weeks.",
        kind: SectionKind::Questions,
        questions: &[
            scale("depression_1", "How often have you had little interest or pleasure in doing things?"),
            scale("depression_2", "How often have you been feeling down, depressed, or hopeless?"),
            scale("depression_3", "How often have you had trouble falling or staying asleep, or sleeping too much?"),
        ],
    },
    Section {
        id: "stress",
        title: "Stress Assessment",
        description: "The following questions relate to stress levels you may have experienced in the past two weeks.",
        kind: SectionKind::Questions,
        questions: &[
            scale("stress_1", "How often have you found it difficult to cope with all the things you had to do?"),
            scale("stress_2", "How often have you felt irritable or angry?"),
            scale("stress_3", "How often have you felt overwhelmed?"),
        ],
    },
    Section {
        id: "sleep",
        title: "Sleep Patterns",
        description: "The following questions relate to your sleep patterns over the past two weeks.",
        kind: SectionKind::Questions,
        questions: &[
            scale("sleep_1", "How would you rate your overall sleep quality?"),
            inverted("sleep_2", "How often have you had trouble falling asleep or staying asleep?"),
            scale("sleep_3", "How rested do you feel when you wake up in the morning?"),
        ],
    },
    Section {
        id: "social",
        title: "Social Relationships",
        description: "The following questions relate to your social relationships and support system.",
        kind: SectionKind::Questions,
        questions: &[
            scale("social_1", "How satisfied are you with your relationships with friends and family?"),
            inverted("social_2", "How often do you feel lonely or isolated?"),
            scale("social_3", "How comfortable do you feel reaching out for support when needed?"),
        ],
    },
    Section {
        id: CRISIS_SECTION_ID,
        title: "Crisis Assessment",
        description: "These questions help us determine if you need immediate support. Please answer honestly.",
        kind: SectionKind::Questions,
        questions: &[
            yes_no("emergency_1", "In the past two weeks, have you had thoughts that you would be better off dead or of hurting yourself in some way?"),
            yes_no("emergency_2", "Do you currently have a plan to harm yourself or end your life?"),
        ],
    },
    Section {
        id: "completion",
        title: "Assessment Complete",
        description: "Thank you for completing the assessment. Your responses will help us provide personalized recommendations for your mental health journey.",
        kind: SectionKind::Completion,
        questions: &[],
    },
];

/// Human-readable label for a scale value.
pub fn scale_label(value: i32) -> Option<&'static str> {
    Some(match value {
        1 => "Not at all",
        2 => "Rarely",
        3 => "Sometimes",
        4 => "Often",
        5 => "Very frequently",
        6 => "Almost constantly",
        7 => "Constantly",
        8 => "Severely",
        9 => "Extremely",
        10 => "Completely",
        _ => return None,
    })
}

pub fn section(id: &str) -> Option<&'static Section> {
    SECTIONS.iter().find(|s| s.id == id)
}

/// Find a question and the section it belongs to.
pub fn locate(question_id: &str) -> Option<(&'static Section, &'static Question)> {
    SECTIONS.iter().find_map(|s| {
        s.questions
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| (s, q))
    })
}

/// Raw user response to a question, before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Scale(i32),
    YesNo(bool),
}

/// Check that a response fits its question: 1–10 for scale questions, a
/// yes/no or 0/1 for boolean ones.
pub fn check_response(question: &Question, response: Response) -> Result<(), String> {
    match (question.kind, response) {
        (QuestionKind::Scale { .. }, Response::Scale(value)) => {
            if (SCALE_MIN..=SCALE_MAX).contains(&value) {
                Ok(())
            } else {
                Err(format!(
                    "Response must be between {} and {}",
                    SCALE_MIN, SCALE_MAX
                ))
            }
        }
        (QuestionKind::Scale { .. }, Response::YesNo(_)) => Err(format!(
            "Question {} expects a number between {} and {}",
            question.id, SCALE_MIN, SCALE_MAX
        )),
        (QuestionKind::Boolean, Response::YesNo(_)) => Ok(()),
        (QuestionKind::Boolean, Response::Scale(0 | 1)) => Ok(()),
        (QuestionKind::Boolean, Response::Scale(_)) => Err(format!(
            "Question {} expects yes/no (0 or 1)",
            question.id
        )),
    }
}

/// Store a response, applying reverse keying for inverted scale questions.
pub fn record_answer(answers: &mut Answers, question: &Question, response: Response) {
    let stored = match (question.kind, response) {
        (QuestionKind::Scale { inverted: true }, Response::Scale(raw)) => 11 - raw,
        (QuestionKind::Scale { .. }, Response::Scale(raw)) => raw,
        (_, Response::YesNo(yes)) => i32::from(yes),
        (QuestionKind::Boolean, Response::Scale(raw)) => i32::from(raw != 0),
    };
    answers.insert(question.id.to_string(), stored);
}

/// Whether every question of the section has an answer.
pub fn section_complete(section: &Section, answers: &Answers) -> bool {
    match section.kind {
        SectionKind::Intro | SectionKind::Completion => true,
        SectionKind::Questions => section
            .questions
            .iter()
            .all(|q| answers.contains_key(q.id)),
    }
}

/// Whether any crisis question was answered "yes".
pub fn crisis_flagged(answers: &Answers) -> bool {
    section(CRISIS_SECTION_ID)
        .map(|s| s.questions.iter().any(|q| answers.get(q.id) == Some(&1)))
        .unwrap_or(false)
}

/// Check a full answer set: every question answered, values within range.
///
/// Returns a message describing the first problem found.
pub fn validate_answers(answers: &Answers) -> Result<(), String> {
    for section in SECTIONS {
        for question in section.questions {
            let Some(&value) = answers.get(question.id) else {
                return Err(format!("Question {} is unanswered", question.id));
            };
            let in_range = match question.kind {
                QuestionKind::Scale { .. } => (SCALE_MIN..=SCALE_MAX).contains(&value),
                QuestionKind::Boolean => value == 0 || value == 1,
            };
            if !in_range {
                return Err(format!(
                    "Answer {} for question {} is out of range",
                    value, question.id
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscale_question_exists_as_scale() {
        for subscale in Subscale::ALL {
            for id in subscale.question_ids() {
                let (section, q) = locate(id).unwrap();
                assert!(matches!(q.kind, QuestionKind::Scale { .. }));
                assert!(id.starts_with(section.id));
            }
        }
    }

    #[test]
    fn inverted_answers_are_reverse_keyed() {
        let mut answers = Answers::new();
        record_answer(&mut answers, locate("sleep_2").unwrap().1, Response::Scale(3));
        record_answer(&mut answers, locate("sleep_1").unwrap().1, Response::Scale(3));
        assert_eq!(answers["sleep_2"], 8);
        assert_eq!(answers["sleep_1"], 3);
    }

    #[test]
    fn responses_must_match_question_kind() {
        let sleep_2 = locate("sleep_2").unwrap().1;
        let crisis = locate("emergency_1").unwrap().1;

        assert!(check_response(sleep_2, Response::Scale(3)).is_ok());
        assert!(check_response(sleep_2, Response::Scale(0)).is_err());
        assert!(check_response(sleep_2, Response::YesNo(true)).is_err());

        assert!(check_response(crisis, Response::YesNo(true)).is_ok());
        assert!(check_response(crisis, Response::Scale(0)).is_ok());
        assert!(check_response(crisis, Response::Scale(1)).is_ok());
        assert!(check_response(crisis, Response::Scale(5)).is_err());
    }

    #[test]
    fn crisis_questions_store_zero_or_one() {
        let mut answers = Answers::new();
        record_answer(&mut answers, locate("emergency_1").unwrap().1, Response::YesNo(false));
        assert!(!crisis_flagged(&answers));
        record_answer(&mut answers, locate("emergency_2").unwrap().1, Response::YesNo(true));
        assert_eq!(answers["emergency_2"], 1);
        assert!(crisis_flagged(&answers));
    }

    #[test]
    fn section_completion() {
        let anxiety = section("anxiety").unwrap();
        let mut answers = Answers::new();
        assert!(section_complete(section("intro").unwrap(), &answers));
        assert!(!section_complete(anxiety, &answers));
        for id in Subscale::Anxiety.question_ids() {
            answers.insert(id.to_string(), 5);
        }
        assert!(section_complete(anxiety, &answers));
    }

    #[test]
    fn validation_rejects_missing_and_out_of_range() {
        let mut answers: Answers = SECTIONS
            .iter()
            .flat_map(|s| s.questions.iter())
            .map(|q| (q.id.to_string(), if q.kind == QuestionKind::Boolean { 0 } else { 5 }))
            .collect();
        assert!(validate_answers(&answers).is_ok());

        answers.insert("stress_2".to_string(), 11);
        assert!(validate_answers(&answers).unwrap_err().contains("stress_2"));

        answers.insert("stress_2".to_string(), 4);
        answers.remove("social_3");
        assert!(validate_answers(&answers).unwrap_err().contains("social_3"));
    }

    #[test]
    fn scale_labels() {
        assert_eq!(scale_label(1), Some("Not at all"));
        assert_eq!(scale_label(10), Some("Completely"));
        assert_eq!(scale_label(0), None);
    }
}
