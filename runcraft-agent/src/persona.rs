//! Canned personalities

use crate::Agent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Professional,
    Casual,
    Technical,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Professional, Persona::Casual, Persona::Technical];

    pub fn agent_name(&self) -> &'static str {
        match self {
            Persona::Professional => "Professional Assistant",
            Persona::Casual => "Buddy",
            Persona::Technical => "Tech Expert",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Persona::Professional => {
                "You are a professional business assistant.\n\
                 Always be formal, use proper grammar, and provide structured responses.\n\
                 Address users as 'Sir' or 'Madam'."
            }
            Persona::Casual => {
                "You are a casual, friendly helper.\n\
                 Use relaxed language, contractions, and be conversational.\n\
                 Think of yourself as talking to a good friend."
            }
            Persona::Technical => {
                "You are a senior software engineer.\n\
                 Provide technical explanations with code examples when relevant.\n\
                 Use programming terminology and be precise."
            }
        }
    }

    pub fn agent(&self) -> Agent {
        Agent::new(self.agent_name(), self.instructions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_agents() {
        let agent = Persona::Casual.agent();
        assert_eq!(agent.name, "Buddy");
        assert!(agent.instructions.starts_with("You are a casual"));

        let names: Vec<_> = Persona::ALL.iter().map(|p| p.agent_name()).collect();
        assert_eq!(names, ["Professional Assistant", "Buddy", "Tech Expert"]);
    }
}
