//! The nine operations the service offers and the prompt each one sends.

use std::fmt;

/// A supported operation. Its name doubles as the route path and the
/// template key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GenerateLesson,
    GenerateQuiz,
    SolveDoubt,
    ExplainConcept,
    SummarizeReport,
    ParentMessage,
    SyllabusPlanner,
    GenerateHomework,
    StudentAnalysis,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::GenerateLesson,
        Operation::GenerateQuiz,
        Operation::SolveDoubt,
        Operation::ExplainConcept,
        Operation::SummarizeReport,
        Operation::ParentMessage,
        Operation::SyllabusPlanner,
        Operation::GenerateHomework,
        Operation::StudentAnalysis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::GenerateLesson => "generate-lesson",
            Operation::GenerateQuiz => "generate-quiz",
            Operation::SolveDoubt => "solve-doubt",
            Operation::ExplainConcept => "explain-concept",
            Operation::SummarizeReport => "summarize-report",
            Operation::ParentMessage => "parent-message",
            Operation::SyllabusPlanner => "syllabus-planner",
            Operation::GenerateHomework => "generate-homework",
            Operation::StudentAnalysis => "student-analysis",
        }
    }

    /// Key wrapping the completion in the response envelope.
    pub fn result_key(self) -> &'static str {
        match self {
            Operation::GenerateLesson => "lesson_plan",
            Operation::GenerateQuiz => "quiz",
            Operation::SolveDoubt => "solution",
            Operation::ExplainConcept => "explanation",
            Operation::SummarizeReport => "summary",
            Operation::ParentMessage => "message",
            Operation::SyllabusPlanner => "weekly_plan",
            Operation::GenerateHomework => "homework",
            Operation::StudentAnalysis => "analysis",
        }
    }

    pub fn path(self) -> String {
        format!("/{}", self.name())
    }

    pub fn template(self) -> &'static str {
        match self {
            Operation::GenerateLesson => LESSON_PLAN,
            Operation::GenerateQuiz => QUIZ,
            Operation::SolveDoubt => SOLVE_DOUBT,
            Operation::ExplainConcept => EXPLANATION,
            Operation::SummarizeReport => REPORT_SUMMARY,
            Operation::ParentMessage => PARENT_MESSAGE,
            Operation::SyllabusPlanner => SYLLABUS_PLANNER,
            Operation::GenerateHomework => HOMEWORK,
            Operation::StudentAnalysis => STUDENT_ANALYSIS,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const LESSON_PLAN: &str = "You are an expert school educator. Generate a detailed lesson plan for the topic \"{topic}\" for Grade {grade}.
Include: learning objectives, materials needed, activities, real-life examples, and short quiz questions.";

const QUIZ: &str = "Generate a 5-question quiz on the topic \"{topic}\" for Grade {grade}. Include 4 options and the correct answer for each.";

const EXPLANATION: &str = "Explain this concept to a Grade 6 level learner in simple terms: \"{question}\".
Include real-life examples and analogies for better understanding.";

const SOLVE_DOUBT: &str = "Act like a friendly educator. Solve this learner's doubt: \"{doubt}\" for a Grade {grade} level.
Make it clear, simple, and relatable.";

const REPORT_SUMMARY: &str = "Summarize this institutional academic report data: \"{report_data}\".
Provide insights in bullet points for school administrators.";

const PARENT_MESSAGE: &str = "Draft a professional message to be sent from a school to parents. Message context: \"{context}\".";

const SYLLABUS_PLANNER: &str = "Break down the following syllabus into a weekly plan over {weeks} weeks:
{syllabus}
Provide bullet points for each week's content.";

const HOMEWORK: &str = "Generate a weekly homework assignment for the topic \"{topic}\" suitable for Grade {grade}. Include exercises, reading, and creative activities.";

const STUDENT_ANALYSIS: &str = "Analyze this student's performance data: \"{performance_data}\".
Provide strengths, weaknesses, and improvement suggestions.";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_result_keys_are_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        let keys: HashSet<_> = Operation::ALL.iter().map(|op| op.result_key()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
        assert_eq!(keys.len(), Operation::ALL.len());
    }

    #[test]
    fn path_prefixes_name_with_slash() {
        assert_eq!(Operation::SyllabusPlanner.path(), "/syllabus-planner");
        assert_eq!(Operation::StudentAnalysis.to_string(), "student-analysis");
    }
}
