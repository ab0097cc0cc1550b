// Static definition of the travel crew: three agents, three tasks.

use super::agent::{AgentDescriptor, AgentRole};
use super::definition::CrewDefinition;
use super::task::TaskDescriptor;
use super::tool::ToolKind;

pub const RESEARCH_TASK: &str = "research";
pub const ITINERARY_TASK: &str = "itinerary";
pub const LOCAL_EXPERT_TASK: &str = "local_expert";

/// Placeholder names every run must supply
pub const INPUT_PLACEHOLDERS: [&str; 5] =
    ["destination", "interests", "start_date", "end_date", "question"];

pub fn travel_researcher() -> AgentDescriptor {
    AgentDescriptor::new(
        AgentRole::TravelResearcher,
        "Gather comprehensive information about a given travel destination.",
        "Seasoned travel researcher. Finds hidden gems and popular hotspots.",
    )
    .with_tools([ToolKind::WebSearch])
    .with_delegation(true)
}

pub fn itinerary_planner() -> AgentDescriptor {
    AgentDescriptor::new(
        AgentRole::ItineraryPlanner,
        "Structure travel information into a day-by-day itinerary and incorporate expert answers.",
        "Meticulous itinerary planner. Creates efficient and enjoyable plans.\n\
         You MUST output a day-by-day itinerary, with specific dates and times and includes expert advice.",
    )
}

pub fn local_expert() -> AgentDescriptor {
    AgentDescriptor::new(
        AgentRole::LocalExpert,
        "Provide insider tips and answer specific questions.",
        "Long-time resident, knows the destination intimately.",
    )
    .with_tools([ToolKind::WebSearch])
}

pub fn research_task() -> TaskDescriptor {
    TaskDescriptor::new(
        RESEARCH_TASK,
        AgentRole::TravelResearcher,
        "Research the best attractions, restaurants, and activities in {{destination}}.\n\
         Consider the user's interests: {{interests}}. Focus on providing a diverse range of options.",
        "A list of attractions, restaurants, and activities.",
    )
    .with_tools([ToolKind::WebSearch, ToolKind::ScrapeWebsite])
    .with_async_execution(true)
}

const ITINERARY_DESCRIPTION: &str = "\
Create a detailed day-by-day itinerary for a trip to {{destination}} from {{start_date}} to {{end_date}}.

First, provide a brief overview of the top recommended places to visit and restaurants to try, based on the research.

Then, create a detailed itinerary. Remember most hotels allow check-in at 4.00pm and checkout at 11.00am.
Format the output as follows:

**Top Recommendations:**

*   **Places to Visit:**
    *   [Place 1] - [Brief Description]
    *   [Place 2] - [Brief Description]
    ...
*   **Restaurants:**
    *   [Restaurant 1] - [Brief Description]
    *   [Restaurant 2] - [Brief Description]
    ...

**Itinerary:**

**Day 1: [Date]**
*   [Time]: [Activity/Location] - [Brief Description]

**Day 2: [Date]**
*   [Time]: [Activity/Location] - [Brief Description]
 ...

**If You Have More Time:**

*   **Places to Visit:**
    *   [Additional Place 1] - [Brief Description]
    *    ...
*   **Restaurants:**
    *   [Additional Restaurant 1] - [Brief Description]
    *   ...
Consider travel times. Be realistic. Prioritize activities for {{interests}}.";

pub fn itinerary_task() -> TaskDescriptor {
    TaskDescriptor::new(
        ITINERARY_TASK,
        AgentRole::ItineraryPlanner,
        ITINERARY_DESCRIPTION,
        "A detailed, well-formatted, day-by-day itinerary with recommendations.",
    )
    .with_context([RESEARCH_TASK])
}

pub fn local_expert_task() -> TaskDescriptor {
    TaskDescriptor::new(
        LOCAL_EXPERT_TASK,
        AgentRole::LocalExpert,
        "Answer specific questions about the travel destination: {{destination}} and question: {{question}}",
        "A detailed answer.",
    )
    .with_tools([ToolKind::WebSearch, ToolKind::ScrapeWebsite])
    .with_async_execution(true)
}

/// The complete travel crew in declaration order
pub fn travel_crew() -> Result<CrewDefinition, String> {
    CrewDefinition::new(
        vec![travel_researcher(), itinerary_planner(), local_expert()],
        vec![research_task(), itinerary_task(), local_expert_task()],
    )
}
