//! Runs all four assistant operations against the configured model.
//!
//! Reads `GEMINI_API_KEY` (or `OPENAI_API_KEY` with
//! `CAMPUSNET_AI_PROVIDER=openai`). Every operation prints a usable result
//! even when the model is unreachable.

use campusnet::assist::{
    AssistConfig, Assistant, Candidate, CandidateRole, ExperienceEntry, ResumeContent,
};
use campusnet::ConversationTurn;

fn candidate(id: &str, name: &str, skills: &[&str]) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        avatar: format!("https://picsum.photos/seed/{}/200", id),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        role: CandidateRole::Student,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AssistConfig::from_env();
    let assistant = Assistant::from_config(&config)?;
    println!("Using {} / {}\n", config.provider, config.model);

    println!("=== Chat ===");
    let history = vec![
        ConversationTurn::user("Are there any hackathons this month?"),
        ConversationTurn::model("HackCampus runs on the 12th. Want help finding a team?"),
    ];
    let reply = assistant.chat("Yes, find me a React dev", &history).await;
    println!("{}", reply.value());
    if let Some(cause) = reply.cause() {
        println!("(fallback, cause: {})", cause);
    }
    println!();

    println!("=== Project idea ===");
    match assistant
        .generate_project_idea(&["React", "Python"], &["AI", "Sustainability"])
        .await
        .into_value()
    {
        Some(idea) => {
            println!("{}: {}", idea.title, idea.description);
            for feature in &idea.features {
                println!("  - {}", feature);
            }
        }
        None => println!("No idea this time."),
    }
    println!();

    println!("=== Team builder ===");
    let pool = vec![
        candidate("1", "Alex Chen", &["React", "TypeScript"]),
        candidate("2", "Sarah Jones", &["Figma", "UI/UX"]),
        candidate("3", "Mike Ross", &["Node.js", "PostgreSQL"]),
        candidate("4", "Priya Patel", &["Python", "Machine Learning"]),
    ];
    let team = assistant
        .generate_team(
            "campus marketplace app",
            &["Frontend Developer", "Backend Developer", "UI/UX Designer"],
            &pool,
        )
        .await;
    if let Some(cause) = team.cause() {
        println!("(fallback team, cause: {})", cause);
    }
    for member in team.value() {
        println!(
            "{:<20} {:<12} {:>3}%  {}",
            member.role, member.candidate.name, member.compatibility, member.reason
        );
    }
    println!();

    println!("=== Resume optimizer ===");
    let resume = ResumeContent {
        summary: "Third-year CS student who likes building web apps.".to_string(),
        experience: vec![ExperienceEntry {
            company: "Campus IT".to_string(),
            role: "Student Developer".to_string(),
            period: "2023 - present".to_string(),
            description: "Worked on the help desk portal.".to_string(),
        }],
        projects: Vec::new(),
    };
    match assistant.optimize_resume(&resume).await.into_value() {
        Some(review) => {
            println!("Score: {}", review.score);
            for suggestion in &review.suggestions {
                println!("  - {}", suggestion);
            }
        }
        None => println!("Could not review the resume. Add more detail and try again."),
    }

    Ok(())
}
