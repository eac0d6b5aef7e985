use crate::agent::{Agent, AgentArena};
use crate::brain::Candidate;
use crate::config;

fn adjust(agent: &Agent, candidates: &mut [Candidate], delta: f32) {
    if let Some(candidate) = agent.policy_slot().and_then(|slot| candidates.get_mut(slot)) {
        candidate.fitness += delta;
    }
}

/// Passive reward for staying alive through a tick.
pub fn reward_survival(agent: &Agent, candidates: &mut [Candidate]) {
    adjust(agent, candidates, config::SURVIVAL_REWARD);
}

/// Penalise a collision and retire the agent for the rest of the generation.
pub fn penalize_collision(agent: &mut Agent, candidates: &mut [Candidate]) {
    adjust(agent, candidates, -config::COLLISION_PENALTY);
    agent.alive = false;
}

/// Pass-through reward goes to every agent still alive at this point of the tick.
pub fn reward_pass(arena: &AgentArena, candidates: &mut [Candidate]) {
    for (_idx, agent) in arena.iter_alive() {
        adjust(agent, candidates, config::PASS_REWARD);
    }
}

/// Out-of-bounds death carries no penalty beyond the lost survival reward.
pub fn kill_out_of_bounds(arena: &mut AgentArena) -> usize {
    let mut killed = 0;
    for agent in arena.iter_alive_mut() {
        if agent.out_of_bounds() {
            agent.alive = false;
            killed += 1;
        }
    }
    killed
}
