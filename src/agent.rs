use crate::config;

/// Where an agent's jump decisions come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionSource {
    /// Driven by the "jump pressed" event of the human operator.
    Human,
    /// Driven by the candidate at this index of the optimizer's slice.
    /// The same index addresses the candidate's fitness.
    Policy(usize),
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub x: f32,
    pub y: f32,
    pub prev_y: f32,
    pub velocity: f32,
    pub tick_count: u32,
    /// Height recorded at the last jump; drives the tilt hold.
    pub reference_height: f32,
    pub tilt: f32,
    pub alive: bool,
    pub source: DecisionSource,
}

impl Agent {
    pub fn new(source: DecisionSource) -> Self {
        Self::at(config::AGENT_START_X, config::AGENT_START_Y, source)
    }

    pub fn at(x: f32, y: f32, source: DecisionSource) -> Self {
        Self {
            x,
            y,
            prev_y: y,
            velocity: 0.0,
            tick_count: 0,
            reference_height: y,
            tilt: 0.0,
            alive: true,
            source,
        }
    }

    pub fn policy_slot(&self) -> Option<usize> {
        match self.source {
            DecisionSource::Policy(slot) => Some(slot),
            DecisionSource::Human => None,
        }
    }

    /// Bottom edge touches the ground or the top edge left the screen.
    pub fn out_of_bounds(&self) -> bool {
        self.y + config::AGENT_SPRITE_HEIGHT as f32 >= config::GROUND_Y || self.y < 0.0
    }
}

/// Agent storage for one generation. Slots are never reused: dead agents are
/// marked during a tick and reclaimed in a single sweep afterwards.
pub struct AgentArena {
    pub agents: Vec<Option<Agent>>,
    pub count: usize,
}

impl AgentArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            agents: Vec::with_capacity(capacity),
            count: 0,
        }
    }

    pub fn spawn(&mut self, agent: Agent) -> usize {
        self.agents.push(Some(agent));
        self.count += 1;
        self.agents.len() - 1
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index).and_then(|a| a.as_ref())
    }

    pub fn get_mut_by_index(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index).and_then(|a| a.as_mut())
    }

    /// Remove agents marked dead. Returns the swept slot indices.
    pub fn sweep_dead(&mut self) -> Vec<usize> {
        let mut swept = Vec::new();
        for (idx, slot) in self.agents.iter_mut().enumerate() {
            if matches!(slot, Some(agent) if !agent.alive) {
                *slot = None;
                self.count -= 1;
                swept.push(idx);
            }
        }
        swept
    }

    /// Iterate over (index, &Agent) for all alive agents.
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &Agent)> {
        self.agents.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .and_then(|a| if a.alive { Some((i, a)) } else { None })
        })
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents
            .iter_mut()
            .filter_map(|slot| slot.as_mut().filter(|a| a.alive))
    }

    /// First alive agent in slot order; every agent shares the same x.
    pub fn lead(&self) -> Option<&Agent> {
        self.iter_alive().next().map(|(_, a)| a)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
