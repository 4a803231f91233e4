//! Coordinator facade - the boundary the rest of the game calls into
//!
//! Owns all per-agent perception state (suspicion, alert level, target
//! memory) and orchestrates the subsystems: detection fusion, cooperative
//! fan-out, and the frame-budgeted decay/prune scheduler. Everything runs
//! on the host's single simulation thread; a detection call fully
//! completes (including cooperative fan-out) before returning, and
//! scheduler passes never interleave with an in-progress detection.

use ahash::AHashMap;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::alert::{AlertLevel, SuspicionMeter};
use crate::cooperative::{ShareLog, ShareRecord, SHARE_DAMPENING};
use crate::core::config::PerceptionConfig;
use crate::core::error::{Result, VigilError};
use crate::core::types::{AgentId, SimTime, TargetId};
use crate::host::{AuditorySensor, PerceptionHost, VisualSensor};
use crate::memory::TargetMemoryStore;
use crate::perception::channel::DetectionChannel;
use crate::perception::event::{DetectionEvent, DetectionEventPool};
use crate::perception::processor::{detection_chance, suspicion_increase, DEFAULT_STEALTH_LEVEL};
use crate::perception::{DetectionFact, TargetObservation};
use crate::scheduler::FrameScheduler;

/// Everything the engine tracks for one registered agent
#[derive(Debug, Clone)]
struct AgentState {
    suspicion: SuspicionMeter,
    memory: TargetMemoryStore,
    /// When this agent's suspicion was last decayed; budgeted scheduler
    /// visits charge the full elapsed interval, so skipped frames never
    /// lose decay time
    last_decay_at: SimTime,
    active: bool,
}

impl AgentState {
    fn new(now: SimTime) -> Self {
        Self {
            suspicion: SuspicionMeter::new(),
            memory: TargetMemoryStore::new(),
            last_decay_at: now,
            active: true,
        }
    }
}

/// Read-only snapshot of engine health counters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PerceptionStats {
    pub registered: usize,
    pub active: usize,
    pub average_suspicion: f32,
    pub processed_last_tick: usize,
    pub pooled_events_free: usize,
    pub share_records: usize,
}

/// The detection-coordination engine
///
/// Constructed once by the host and passed by reference to collaborators;
/// all per-agent state is mutated only through this API.
pub struct PerceptionCoordinator {
    config: PerceptionConfig,
    /// Registration order; the scheduler's round-robin cursor walks this
    roster: Vec<AgentId>,
    states: AHashMap<AgentId, AgentState>,
    shares: ShareLog,
    pool: DetectionEventPool,
    scheduler: FrameScheduler,
    rng: ChaCha8Rng,
    cooperative_enabled: bool,
    processed_last_tick: usize,
    sensor_scratch: Vec<DetectionFact>,
}

impl PerceptionCoordinator {
    pub fn new(config: PerceptionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Engine with documented defaults, for hosts that never supply a
    /// configuration
    pub fn with_defaults() -> Self {
        Self::from_validated(PerceptionConfig::default())
    }

    fn from_validated(config: PerceptionConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let pool = DetectionEventPool::new(config.event_pool_capacity);
        Self {
            config,
            roster: Vec::new(),
            states: AHashMap::new(),
            shares: ShareLog::new(),
            pool,
            scheduler: FrameScheduler::new(),
            rng,
            cooperative_enabled: true,
            processed_last_tick: 0,
            sensor_scratch: Vec::new(),
        }
    }

    // === REGISTRATION LIFECYCLE ===

    /// Track a new agent with zero suspicion, Unaware, and empty memory
    ///
    /// Idempotent: re-registering a tracked agent changes nothing.
    pub fn register(&mut self, agent: AgentId) -> Result<()> {
        if self.states.contains_key(&agent) {
            tracing::trace!(?agent, "agent already registered");
            return Ok(());
        }
        if self.roster.len() >= self.config.max_agents {
            tracing::warn!(
                ?agent,
                max = self.config.max_agents,
                "registration refused, capacity exceeded"
            );
            return Err(VigilError::CapacityExceeded {
                max: self.config.max_agents,
            });
        }
        self.roster.push(agent);
        self.states.insert(agent, AgentState::new(self.scheduler.now()));
        tracing::debug!(?agent, registered = self.roster.len(), "agent registered");
        Ok(())
    }

    /// Remove all per-agent state; no-op for unknown handles
    pub fn unregister(&mut self, agent: AgentId) {
        if self.states.remove(&agent).is_none() {
            return;
        }
        self.roster.retain(|&id| id != agent);
        self.shares.forget_agent(agent);
        tracing::debug!(?agent, registered = self.roster.len(), "agent unregistered");
    }

    pub fn is_registered(&self, agent: AgentId) -> bool {
        self.states.contains_key(&agent)
    }

    pub fn registered_count(&self) -> usize {
        self.roster.len()
    }

    // === CONFIGURATION ===

    /// Hot-swap tunables without touching agent state
    ///
    /// A changed seed reseeds the gate RNG; a changed pool capacity
    /// rebuilds the event pool (live events are dropped).
    pub fn apply_configuration(&mut self, config: PerceptionConfig) -> Result<()> {
        config.validate()?;
        if config.seed != self.config.seed {
            self.rng = ChaCha8Rng::seed_from_u64(config.seed);
        }
        if config.event_pool_capacity != self.config.event_pool_capacity {
            self.pool = DetectionEventPool::new(config.event_pool_capacity);
        }
        tracing::debug!("configuration applied");
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    /// Global toggle for cooperative sharing
    ///
    /// When disabled, detections still update the detecting agent but the
    /// fan-out is skipped entirely.
    pub fn set_cooperative_detection_enabled(&mut self, enabled: bool) {
        self.cooperative_enabled = enabled;
    }

    pub fn cooperative_detection_enabled(&self) -> bool {
        self.cooperative_enabled
    }

    // === DETECTION INGESTION ===

    /// Process a raw sensory fact through the stochastic detection gate
    pub fn on_detection(
        &mut self,
        host: &mut impl PerceptionHost,
        agent: AgentId,
        observation: &TargetObservation,
        channel: DetectionChannel,
        strength: f32,
    ) {
        self.process_detection(host, agent, observation, channel, strength, false);
    }

    /// Process a direct detection, bypassing the stochastic gate
    ///
    /// For unmistakable contacts (touched the target, scripted reveals)
    /// and for callers that need deterministic outcomes.
    pub fn on_direct_detection(
        &mut self,
        host: &mut impl PerceptionHost,
        agent: AgentId,
        observation: &TargetObservation,
        channel: DetectionChannel,
        strength: f32,
    ) {
        self.process_detection(host, agent, observation, channel, strength, true);
    }

    /// Poll a visual sensor and process everything it resolved this frame
    pub fn ingest_visual(
        &mut self,
        host: &mut impl PerceptionHost,
        sensor: &mut impl VisualSensor,
    ) {
        let mut facts = std::mem::take(&mut self.sensor_scratch);
        facts.clear();
        sensor.poll_sightings(&mut facts);
        self.ingest_facts(host, &facts);
        self.sensor_scratch = facts;
    }

    /// Poll an auditory sensor and process everything it resolved this frame
    pub fn ingest_auditory(
        &mut self,
        host: &mut impl PerceptionHost,
        sensor: &mut impl AuditorySensor,
    ) {
        let mut facts = std::mem::take(&mut self.sensor_scratch);
        facts.clear();
        sensor.poll_sounds(&mut facts);
        self.ingest_facts(host, &facts);
        self.sensor_scratch = facts;
    }

    fn ingest_facts(&mut self, host: &mut impl PerceptionHost, facts: &[DetectionFact]) {
        for fact in facts {
            let observation = TargetObservation::new(fact.target, fact.position);
            self.process_detection(host, fact.agent, &observation, fact.channel, fact.strength, false);
        }
    }

    /// A sensor lost contact with a target it had been tracking
    ///
    /// Refreshes the memory timestamp without deleting, so last-known
    /// position queries stay answerable after detection ends.
    pub fn on_target_lost(&mut self, agent: AgentId, target: TargetId) {
        let now = self.scheduler.now();
        if let Some(state) = self.states.get_mut(&agent) {
            state.memory.record_target_lost(target, now);
        }
    }

    fn process_detection(
        &mut self,
        host: &mut impl PerceptionHost,
        agent: AgentId,
        observation: &TargetObservation,
        channel: DetectionChannel,
        strength: f32,
        forced: bool,
    ) {
        let Some(current_level) = self.states.get(&agent).map(|s| s.suspicion.level()) else {
            tracing::debug!(?agent, "detection from unregistered agent ignored");
            return;
        };
        if !host.agent_active(agent) {
            tracing::trace!(?agent, "detection from inactive agent ignored");
            return;
        }

        let stealth = host
            .stealth_level(observation.target)
            .unwrap_or(DEFAULT_STEALTH_LEVEL);
        let chance = detection_chance(stealth, channel, current_level);
        if !forced {
            let roll: f32 = self.rng.gen();
            if roll >= chance {
                tracing::trace!(?agent, chance, roll, "detection failed the gate");
                return;
            }
        }

        let increase = suspicion_increase(channel, strength, observation.confidence);
        let now = self.scheduler.now();

        let new_suspicion = {
            // Presence checked above; a vanished entry means nothing to update
            let Some(state) = self.states.get_mut(&agent) else {
                return;
            };
            if let Some(transition) = state.suspicion.raise(increase) {
                tracing::debug!(?agent, from = ?transition.from, to = ?transition.to, "alert level changed");
                host.alert_changed(agent, transition);
            }
            state.memory.record_detection(
                observation.target,
                channel,
                channel.reliability(),
                observation.position,
                now,
            );
            state.suspicion.value()
        };

        let slot = self.pool.acquire();
        self.pool.get_mut(slot).initialize(
            agent,
            observation.target,
            observation.position,
            channel,
            new_suspicion,
            now,
        );

        // Secondhand facts never re-share; the fan-out bump is applied
        // directly, so there is no cascade either way
        if self.cooperative_enabled && channel != DetectionChannel::Cooperative {
            self.share_detection(host, agent, observation, channel, increase, new_suspicion, now);
        }

        host.detection_occurred();
        tracing::debug!(
            ?agent,
            target = ?observation.target,
            ?channel,
            increase,
            suspicion = new_suspicion,
            "detection processed"
        );
    }

    /// Propagate a dampened share of a detection to peers in range
    #[allow(clippy::too_many_arguments)]
    fn share_detection(
        &mut self,
        host: &mut impl PerceptionHost,
        detector: AgentId,
        observation: &TargetObservation,
        channel: DetectionChannel,
        increase: f32,
        detector_suspicion: f32,
        now: SimTime,
    ) {
        let Some(origin) = host.agent_position(detector) else {
            return;
        };
        let peer_increase = increase * SHARE_DAMPENING;
        let mut recipients = 0;

        // O(registered) sweep; fine at the documented <=50 ceiling
        for i in 0..self.roster.len() {
            let peer = self.roster[i];
            if peer == detector {
                continue;
            }
            let Some(peer_pos) = host.agent_position(peer) else {
                continue;
            };
            if origin.distance(peer_pos) > self.config.cooperative_range {
                continue;
            }
            if !host.agent_active(peer) {
                continue;
            }
            let Some(state) = self.states.get_mut(&peer) else {
                continue;
            };
            if let Some(transition) = state.suspicion.raise(peer_increase) {
                host.alert_changed(peer, transition);
            }
            state.memory.record_detection(
                observation.target,
                DetectionChannel::Cooperative,
                DetectionChannel::Cooperative.reliability(),
                observation.position,
                now,
            );
            recipients += 1;
        }

        self.shares.push(ShareRecord {
            detector,
            target: observation.target,
            channel,
            suspicion: detector_suspicion,
            timestamp: now,
            recipients,
        });
        tracing::trace!(?detector, recipients, "detection shared");
    }

    // === SCHEDULER ===

    /// Advance simulated time; when a pass is due, decay and prune a
    /// bounded slice of the roster
    ///
    /// Must be called once per frame by the host. Never blocks, never
    /// aborts on a bad agent: invalid handles are skipped and lazily
    /// unregistered.
    pub fn tick(&mut self, host: &mut impl PerceptionHost, dt: f32) {
        let Some(indices) = self.scheduler.advance(
            SimTime::from(dt),
            self.roster.len(),
            self.config.max_processing_per_frame,
            self.config.update_frequency,
        ) else {
            return;
        };
        let now = self.scheduler.now();
        let mut stale: Vec<AgentId> = Vec::new();

        self.processed_last_tick = indices.len();
        for idx in indices {
            let agent = self.roster[idx];
            if host.agent_position(agent).is_none() {
                stale.push(agent);
                continue;
            }
            let Some(state) = self.states.get_mut(&agent) else {
                continue;
            };
            state.active = host.agent_active(agent);
            let elapsed = (now - state.last_decay_at) as f32;
            state.last_decay_at = now;
            if let Some(transition) = state.suspicion.decay(self.config.decay_rate, elapsed) {
                tracing::debug!(?agent, from = ?transition.from, to = ?transition.to, "alert level decayed");
                host.alert_changed(agent, transition);
            }
            state.memory.prune_expired(now, self.config.memory_retention);
        }

        for agent in stale {
            tracing::warn!(?agent, "handle invalid, lazily unregistering");
            self.unregister(agent);
        }

        self.shares.sweep(now, self.config.share_ttl);
        self.pool.sweep_expired(now, self.config.event_ttl);
    }

    /// Drop every agent back to zero suspicion / Unaware
    pub fn reset_all_suspicion(&mut self, host: &mut impl PerceptionHost) {
        for i in 0..self.roster.len() {
            let agent = self.roster[i];
            let Some(state) = self.states.get_mut(&agent) else {
                continue;
            };
            if let Some(transition) = state.suspicion.reset() {
                host.alert_changed(agent, transition);
            }
        }
        tracing::debug!("all suspicion reset");
    }

    // === QUERIES ===

    /// Current suspicion of an agent; 0.0 for unknown handles
    pub fn suspicion_of(&self, agent: AgentId) -> f32 {
        self.states
            .get(&agent)
            .map(|state| state.suspicion.value())
            .unwrap_or(0.0)
    }

    /// Current alert level of an agent; `Unaware` for unknown handles
    pub fn alert_level_of(&self, agent: AgentId) -> AlertLevel {
        self.states
            .get(&agent)
            .map(|state| state.suspicion.level())
            .unwrap_or(AlertLevel::Unaware)
    }

    /// Where the agent last knew the target to be
    pub fn last_known_position_of(&self, agent: AgentId, target: TargetId) -> Option<Vec3> {
        self.states
            .get(&agent)?
            .memory
            .last_known_position(target)
    }

    /// How many targets the agent currently remembers
    pub fn memory_count_of(&self, agent: AgentId) -> usize {
        self.states
            .get(&agent)
            .map(|state| state.memory.len())
            .unwrap_or(0)
    }

    /// Live pooled detection events, oldest first
    ///
    /// This is the richer payload behind the payload-free
    /// `detection_occurred` notification.
    pub fn recent_events(&self) -> impl Iterator<Item = &DetectionEvent> {
        self.pool.live_events()
    }

    /// Cooperative share records still inside their TTL
    pub fn share_records(&self) -> impl Iterator<Item = &ShareRecord> {
        self.shares.iter()
    }

    pub fn performance_stats(&self) -> PerceptionStats {
        let registered = self.roster.len();
        let active = self.states.values().filter(|state| state.active).count();
        let average_suspicion = if registered == 0 {
            0.0
        } else {
            self.states
                .values()
                .map(|state| state.suspicion.value())
                .sum::<f32>()
                / registered as f32
        };
        PerceptionStats {
            registered,
            active,
            average_suspicion,
            processed_last_tick: self.processed_last_tick,
            pooled_events_free: self.pool.available(),
            share_records: self.shares.len(),
        }
    }
}
