//! Task types and their instruction templates

use runcraft_model::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The closed set of task types an agent can be specialised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// Business correspondence
    Email,
    /// Technical / programming help
    Code,
    /// Creative writing
    Creative,
    /// Tutoring
    Tutor,
    /// Analytical work
    Analyst,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Email,
        TaskType::Code,
        TaskType::Creative,
        TaskType::Tutor,
        TaskType::Analyst,
    ];

    /// Lookup key, as accepted by [`FromStr`]
    pub fn key(&self) -> &'static str {
        match self {
            TaskType::Email => "email",
            TaskType::Code => "code",
            TaskType::Creative => "creative",
            TaskType::Tutor => "tutor",
            TaskType::Analyst => "analyst",
        }
    }

    /// Key with the first letter capitalised, used in agent names
    pub fn title(&self) -> &'static str {
        match self {
            TaskType::Email => "Email",
            TaskType::Code => "Code",
            TaskType::Creative => "Creative",
            TaskType::Tutor => "Tutor",
            TaskType::Analyst => "Analyst",
        }
    }

    /// The fixed part of the template
    pub fn preamble(&self) -> &'static str {
        match self {
            TaskType::Email => {
                "You are a professional email assistant.\n\
                 Write clear, polite, and business-appropriate emails.\n\
                 Keep responses concise and actionable."
            }
            TaskType::Code => {
                "You are a senior software engineer.\n\
                 Provide clean, well-commented code with explanations.\n\
                 Focus on best practices and readability."
            }
            TaskType::Creative => {
                "You are a creative writing assistant.\n\
                 Be imaginative, engaging, and descriptive.\n\
                 Use vivid language and compelling narratives."
            }
            TaskType::Tutor => {
                "You are a patient and encouraging tutor.\n\
                 Explain concepts step-by-step with examples.\n\
                 Ask clarifying questions to ensure understanding."
            }
            TaskType::Analyst => {
                "You are a data analyst.\n\
                 Provide structured, logical analysis.\n\
                 Use facts and evidence to support conclusions."
            }
        }
    }

    /// Preamble followed by `context`, appended verbatim
    pub fn instructions(&self, context: &str) -> String {
        format!("{}\n{}", self.preamble(), context)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| Error::unknown_task_type(s))
    }
}

/// Look up `task_type` and render its instructions with `context`
pub fn resolve_instructions(task_type: &str, context: &str) -> Result<String> {
    let task_type: TaskType = task_type
        .parse()
        .map_err(|e: Error| e.with_operation("tasks::resolve_instructions"))?;
    Ok(task_type.instructions(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcraft_model::ErrorKind;

    #[test]
    fn test_creative_with_context() {
        let text = resolve_instructions("creative", "focus on sustainability").unwrap();
        assert!(text.contains(TaskType::Creative.preamble()));
        assert!(text.contains("You are a creative writing assistant."));
        assert!(text.contains("focus on sustainability"));
    }

    #[test]
    fn test_context_appended_verbatim() {
        let context = "  Line one.\n\tLine {two} with $pecial chars  ";
        let text = resolve_instructions("tutor", context).unwrap();
        assert!(text.ends_with(context));
    }

    #[test]
    fn test_empty_context() {
        let text = resolve_instructions("analyst", "").unwrap();
        assert!(text.starts_with("You are a data analyst."));
    }

    #[test]
    fn test_unknown_task_type() {
        let err = resolve_instructions("unknown_type", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTaskType);
        assert!(err.message().contains("unknown_type"));
        assert_eq!(err.operation(), "tasks::resolve_instructions");
    }

    #[test]
    fn test_keys_are_exact() {
        assert!("Creative".parse::<TaskType>().is_err());
        assert!(" email".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_every_task_type_round_trips() {
        for task in TaskType::ALL {
            assert_eq!(task.key().parse::<TaskType>().unwrap(), task);
            assert_eq!(task.title().to_lowercase(), task.key());
        }
    }
}
