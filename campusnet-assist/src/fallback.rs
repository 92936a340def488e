//! Deterministic results used when a model call cannot be completed.
//!
//! Nothing here fails or touches the network.

use crate::domain::{Candidate, ProjectIdea, ResumeOptimization, TeamMember};
use std::ops::RangeInclusive;

/// Chat reply when the endpoint cannot be used.
pub const CHAT_FALLBACK: &str =
    "I'm having trouble connecting to my brain right now. Please try again later!";

/// Justification attached to every fallback team member.
pub const TEAM_FALLBACK_REASON: &str = "Based on their skill set and past project experience.";

/// Compatibility scores handed out by the fallback team builder.
pub const FALLBACK_COMPATIBILITY: RangeInclusive<u8> = 85..=94;

pub fn chat() -> String {
    CHAT_FALLBACK.to_string()
}

/// No idea; the caller skips the results panel.
pub fn project_idea() -> Option<ProjectIdea> {
    None
}

/// No review; the caller shows its explanatory prompt instead.
pub fn resume_optimization() -> Option<ResumeOptimization> {
    None
}

/// Pair role `i` with `pool[i % pool.len()]`.
///
/// Returns an empty team for an empty pool.
pub fn team<S: AsRef<str>>(roles: &[S], pool: &[Candidate]) -> Vec<TeamMember> {
    if pool.is_empty() {
        return Vec::new();
    }

    roles
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let role = role.as_ref();
            let candidate = &pool[i % pool.len()];
            TeamMember {
                role: role.to_string(),
                candidate: candidate.clone(),
                reason: TEAM_FALLBACK_REASON.to_string(),
                compatibility: compatibility(role, &candidate.id),
            }
        })
        .collect()
}

/// Stable score in [`FALLBACK_COMPATIBILITY`] for a role/candidate pair.
pub fn compatibility(role: &str, candidate_id: &str) -> u8 {
    let start = *FALLBACK_COMPATIBILITY.start();
    let span = u64::from(*FALLBACK_COMPATIBILITY.end() - start) + 1;
    let hash = fnv1a(role.bytes().chain([0u8]).chain(candidate_id.bytes()));
    start + (hash % span) as u8
}

fn fnv1a(bytes: impl Iterator<Item = u8>) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CandidateRole;

    fn pool(n: usize) -> Vec<Candidate> {
        (1..=n)
            .map(|i| Candidate {
                id: i.to_string(),
                name: format!("Student {}", i),
                avatar: format!("https://picsum.photos/seed/{}/200", i),
                skills: vec!["React".to_string()],
                role: CandidateRole::Student,
            })
            .collect()
    }

    #[test]
    fn test_round_robin_over_pool() {
        let roles: Vec<String> = (0..7).map(|i| format!("Role {}", i)).collect();
        for m in 1..=4 {
            let pool = pool(m);
            let team = team(&roles, &pool);

            assert_eq!(team.len(), roles.len());
            for (i, member) in team.iter().enumerate() {
                assert_eq!(member.role, roles[i]);
                assert_eq!(member.candidate, pool[i % m]);
                assert_eq!(member.reason, TEAM_FALLBACK_REASON);
                assert!(FALLBACK_COMPATIBILITY.contains(&member.compatibility));
            }
        }
    }

    #[test]
    fn test_team_is_reproducible() {
        let roles = ["Frontend Developer", "Backend Developer", "UI/UX Designer"];
        assert_eq!(team(&roles, &pool(2)), team(&roles, &pool(2)));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(team(&["Designer"], &[]).is_empty());
        assert!(team::<&str>(&[], &pool(3)).is_empty());
    }

    #[test]
    fn test_scores_cover_range() {
        let scores: std::collections::HashSet<u8> = (0..500)
            .map(|i| compatibility(&format!("role-{}", i), "1"))
            .collect();
        assert!(scores.iter().all(|s| FALLBACK_COMPATIBILITY.contains(s)));
        assert!(scores.len() > 1);
    }

    #[test]
    fn test_fixed_fallbacks() {
        assert_eq!(chat(), CHAT_FALLBACK);
        assert!(project_idea().is_none());
        assert!(resume_optimization().is_none());
    }
}
