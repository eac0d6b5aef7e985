use crate::agent::Agent;
use crate::config;

/// Upward impulse: restart the ballistic arc from the current height.
pub fn jump(agent: &mut Agent) {
    agent.velocity = config::JUMP_VELOCITY;
    agent.tick_count = 0;
    agent.reference_height = agent.y;
}

/// Integrate one tick of vertical motion and tilt. Returns the applied displacement.
pub fn advance(agent: &mut Agent) -> f32 {
    agent.prev_y = agent.y;
    agent.tick_count += 1;

    let t = agent.tick_count as f32;
    let mut displacement = agent.velocity * t + config::GRAVITY_TERM * t * t;
    if displacement >= config::TERMINAL_DISPLACEMENT {
        displacement = config::TERMINAL_DISPLACEMENT;
    }
    if displacement < 0.0 {
        displacement -= config::RISE_BOOST;
    }

    agent.y += displacement;

    if displacement < 0.0 || agent.y < agent.reference_height + config::TILT_HOLD_MARGIN {
        agent.tilt = agent.tilt.max(config::MAX_TILT);
    } else {
        agent.tilt = (agent.tilt - config::TILT_RATE).max(config::MIN_TILT);
    }

    displacement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DecisionSource;

    #[test]
    fn post_jump_displacements_match_integrator_table() {
        let mut agent = Agent::new(DecisionSource::Human);
        jump(&mut agent);

        let expected = [-11.0, -17.0, -20.0, -20.0, -17.0, -11.0, 0.0, 12.0, 16.0, 16.0];
        for (i, want) in expected.iter().enumerate() {
            let got = advance(&mut agent);
            assert!(
                (got - want).abs() < 1e-4,
                "tick {}: expected {want}, got {got}",
                i + 1
            );
        }
    }

    #[test]
    fn displacement_never_exceeds_terminal_speed() {
        let mut agent = Agent::at(230.0, 0.0, DecisionSource::Human);
        for _ in 0..200 {
            assert!(advance(&mut agent) <= config::TERMINAL_DISPLACEMENT);
        }
    }

    #[test]
    fn jump_resets_counter_and_velocity_from_any_state() {
        let mut agent = Agent::new(DecisionSource::Human);
        for _ in 0..17 {
            advance(&mut agent);
        }
        jump(&mut agent);
        assert_eq!(agent.tick_count, 0);
        assert_eq!(agent.velocity, config::JUMP_VELOCITY);
        assert_eq!(agent.reference_height, agent.y);

        advance(&mut agent);
        jump(&mut agent);
        assert_eq!(agent.tick_count, 0);
        assert_eq!(agent.velocity, config::JUMP_VELOCITY);
    }

    #[test]
    fn tilt_holds_nose_up_then_dives_to_floor() {
        let mut agent = Agent::new(DecisionSource::Human);
        jump(&mut agent);
        advance(&mut agent);
        assert_eq!(agent.tilt, config::MAX_TILT);

        for _ in 0..60 {
            advance(&mut agent);
            assert!(agent.tilt >= config::MIN_TILT && agent.tilt <= config::MAX_TILT);
        }
        assert_eq!(agent.tilt, config::MIN_TILT);
    }
}
