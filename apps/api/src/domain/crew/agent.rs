use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tool::ToolKind;

/// The roles that make up the travel crew
///
/// Results coming back from the crew are tagged with the role that produced
/// them, so callers select outputs by matching on this enum instead of
/// comparing free-form role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    TravelResearcher,
    ItineraryPlanner,
    LocalExpert,
}

impl AgentRole {
    /// All roles in crew declaration order
    pub const ALL: [AgentRole; 3] = [
        AgentRole::TravelResearcher,
        AgentRole::ItineraryPlanner,
        AgentRole::LocalExpert,
    ];

    /// Human readable role name, as shown to the model and in logs
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::TravelResearcher => "Travel Researcher",
            AgentRole::ItineraryPlanner => "Itinerary Planner",
            AgentRole::LocalExpert => "Local Expert",
        }
    }

    /// Looks a role up by its display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<AgentRole> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(wanted))
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable definition of one agent in the crew
///
/// # Example
/// ```
/// use tripcrew_api::domain::crew::{AgentDescriptor, AgentRole, ToolKind};
///
/// let agent = AgentDescriptor::new(
///     AgentRole::LocalExpert,
///     "Provide insider tips.",
///     "Long-time resident.",
/// )
/// .with_tools([ToolKind::WebSearch]);
///
/// assert!(agent.tools().contains(&ToolKind::WebSearch));
/// assert!(!agent.allow_delegation());
/// ```
#[derive(Debug, Clone)]
pub struct AgentDescriptor {
    role: AgentRole,
    goal: String,
    backstory: String,
    tools: BTreeSet<ToolKind>,
    allow_delegation: bool,
}

impl AgentDescriptor {
    /// Creates an agent without tools and without delegation
    pub fn new(role: AgentRole, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role,
            goal: goal.into(),
            backstory: backstory.into(),
            tools: BTreeSet::new(),
            allow_delegation: false,
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolKind>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn tools(&self) -> &BTreeSet<ToolKind> {
        &self.tools
    }

    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }
}
