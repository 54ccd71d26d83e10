/// Scripted follow-ups, asked in order after the opening question
pub const FOLLOW_UP_QUESTIONS: [&str; 5] = [
    "That's interesting. Can you describe a challenging project you've worked on and how you overcame the obstacles?",
    "Great! Now, let's talk about technical skills. What programming languages and frameworks are you most comfortable with?",
    "Excellent. Can you explain a time when you had to debug a complex issue? What was your approach?",
    "Tell me about your experience working in a team. How do you handle disagreements with team members?",
    "What interests you most about this role, and where do you see yourself in the next 3-5 years?",
];

/// Returned once the scripted questions are exhausted
pub const CLOSING_LINE: &str = "Thank you for your responses. Do you have any questions for me?";

/// First interviewer message of a session
pub fn opening_line(job_role: &str) -> String {
    format!(
        "Hello! I'm your AI Interviewer for the {} position. Let's start with a simple question: \
         Tell me about yourself and your relevant experience for this role.",
        job_role.trim()
    )
}

/// Stateless mapping from conversation progress to the next question
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionEngine;

impl QuestionEngine {
    /// Next interviewer question after `turns_so_far` messages.
    ///
    /// The question index is `turns_so_far / 2`; anything past the scripted
    /// list yields [`CLOSING_LINE`].
    pub fn next_question(turns_so_far: usize) -> &'static str {
        FOLLOW_UP_QUESTIONS
            .get(turns_so_far / 2)
            .copied()
            .unwrap_or(CLOSING_LINE)
    }
}
