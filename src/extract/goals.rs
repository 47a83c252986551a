//! Career-goal extraction for the guidance conversation.

use serde::Deserialize;
use serde::Serialize;

/// Preferred work environment mentioned by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkEnvironment {
    Remote,
    Startup,
    Corporate,
}

impl WorkEnvironment {
    pub fn label(self) -> &'static str {
        match self {
            WorkEnvironment::Remote => "Remote",
            WorkEnvironment::Startup => "Startup",
            WorkEnvironment::Corporate => "Corporate",
        }
    }
}

/// What the user values most in a career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareerPriority {
    FinancialGrowth,
    WorkLifeBalance,
    CareerGrowth,
    SocialImpact,
}

impl CareerPriority {
    pub fn label(self) -> &'static str {
        match self {
            CareerPriority::FinancialGrowth => "Financial Growth",
            CareerPriority::WorkLifeBalance => "Work-Life Balance",
            CareerPriority::CareerGrowth => "Career Growth",
            CareerPriority::SocialImpact => "Social Impact",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareerGoals {
    pub environment: Option<WorkEnvironment>,
    pub priority: Option<CareerPriority>,
}

/// Recognize environment and priority preferences from free text. Absent
/// preferences stay `None`.
pub fn extract_career_goals(text: &str) -> CareerGoals {
    let text_lower = text.to_lowercase();

    let environment = if text_lower.contains("remote") || text_lower.contains("work from home") {
        Some(WorkEnvironment::Remote)
    } else if text_lower.contains("startup") || text_lower.contains("small company") {
        Some(WorkEnvironment::Startup)
    } else if text_lower.contains("corporate") || text_lower.contains("large company") {
        Some(WorkEnvironment::Corporate)
    } else {
        None
    };

    let priority = if text_lower.contains("salary") || text_lower.contains("money") {
        Some(CareerPriority::FinancialGrowth)
    } else if text_lower.contains("balance") {
        Some(CareerPriority::WorkLifeBalance)
    } else if text_lower.contains("growth") || text_lower.contains("career") {
        Some(CareerPriority::CareerGrowth)
    } else if text_lower.contains("impact") || text_lower.contains("meaningful") {
        Some(CareerPriority::SocialImpact)
    } else {
        None
    };

    CareerGoals {
        environment,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_and_balance() {
        let goals = extract_career_goals("I want remote work with good work-life balance");
        assert_eq!(goals.environment, Some(WorkEnvironment::Remote));
        assert_eq!(goals.priority, Some(CareerPriority::WorkLifeBalance));
    }

    #[test]
    fn test_startup_salary() {
        let goals = extract_career_goals("a startup with a high salary");
        assert_eq!(goals.environment, Some(WorkEnvironment::Startup));
        assert_eq!(goals.priority, Some(CareerPriority::FinancialGrowth));
    }

    #[test]
    fn test_nothing_recognized() {
        let goals = extract_career_goals("not sure yet");
        assert!(goals.environment.is_none());
        assert!(goals.priority.is_none());
    }
}
