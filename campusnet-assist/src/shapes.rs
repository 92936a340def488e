//! Response shapes of the structured operations, derived from the domain
//! records so the schema and the deserialized type cannot drift apart.

use crate::domain::{ProjectIdea, ResumeOptimization, TeamSelection};
use campusnet_core::schema::SchemaDescriptor;

pub fn project_idea() -> SchemaDescriptor {
    SchemaDescriptor::of::<ProjectIdea>("project_idea")
}

/// An empty selection list is rejected so the team builder never renders an
/// empty team from a successful call.
pub fn team_selection() -> SchemaDescriptor {
    SchemaDescriptor::of::<Vec<TeamSelection>>("team_selection").min_items(1)
}

pub fn resume_optimization() -> SchemaDescriptor {
    SchemaDescriptor::of::<ResumeOptimization>("resume_optimization")
}
