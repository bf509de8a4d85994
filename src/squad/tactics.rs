//! Squad state: membership, alert level, focus target and formation slots.
//!
//! A [`Squad`] is mutated only by the coordinator pass
//! ([`crate::systems::squad_coordination_system`]). Agents see it through the
//! immutable [`SquadOrders`] view built for them each tick.

use super::formation::{flank_vector, formation_offset, FormationType};
use crate::components::{AgentId, SquadId, TargetId, Vec2};
use crate::config::SimConfig;
use crate::rng::SimRng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Share of a squad sent to flank, rounded up, at least one.
pub const FLANK_FRACTION: f32 = 0.4;

/// What one member contributes to a coordinator pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberView {
    pub id: AgentId,
    pub position: Vec2,
    pub facing: Vec2,
    pub target: Option<TargetId>,
    /// Role aggression, used to pick flankers.
    pub aggression: f32,
    /// Role raises squad alert on sighting.
    pub raises_alert: bool,
}

/// Outcome of a focus-target selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// The current focus (or lack of one) stands.
    Unchanged,
    /// A new focus was picked.
    Selected(TargetId),
    /// The previous focus was dropped and nothing replaced it.
    Cleared,
}

impl FocusChange {
    pub fn changed(&self) -> bool {
        !matches!(self, FocusChange::Unchanged)
    }
}

/// Read-only view of squad state for one member during an agent tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SquadOrders {
    pub squad: SquadId,
    pub alert: f32,
    pub focus: Option<TargetId>,
    pub focus_position: Option<Vec2>,
    pub is_leader: bool,
    /// World-space slot to hold; `None` for the leader.
    pub formation_slot: Option<Vec2>,
    /// World-space flank point when this member is flanking a known focus.
    pub flank_point: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Squad {
    pub id: SquadId,
    /// Member ids in ascending order; the first is the leader.
    pub members: Vec<AgentId>,
    pub formation: FormationType,
    pub origin: Vec2,
    pub centroid: Vec2,
    pub facing: Vec2,
    /// Always within [0, 1].
    pub alert: f32,
    pub focus: Option<TargetId>,
    pub focus_position: Option<Vec2>,
    pub flanking: BTreeSet<AgentId>,
    pub slots: BTreeMap<AgentId, Vec2>,
    pub flank_points: BTreeMap<AgentId, Vec2>,
}

impl Squad {
    pub fn new(id: SquadId, formation: FormationType) -> Self {
        Self {
            id,
            members: Vec::new(),
            formation,
            origin: Vec2::ZERO,
            centroid: Vec2::ZERO,
            facing: Vec2::X,
            alert: 0.0,
            focus: None,
            focus_position: None,
            flanking: BTreeSet::new(),
            slots: BTreeMap::new(),
            flank_points: BTreeMap::new(),
        }
    }

    pub fn leader(&self) -> Option<AgentId> {
        self.members.first().copied()
    }

    pub fn is_flanking(&self, id: AgentId) -> bool {
        self.flanking.contains(&id)
    }

    // ------------------------------------------------------------------------
    // Alert
    // ------------------------------------------------------------------------

    pub fn raise_alert(&mut self, amount: f32) {
        self.alert = clamp_unit(self.alert + amount.max(0.0));
    }

    /// Decay by `rate_per_second * seconds`, floored at 0.
    pub fn decay_alert(&mut self, rate_per_second: f32, seconds: f32) {
        self.alert = clamp_unit(self.alert - (rate_per_second * seconds).max(0.0));
    }

    // ------------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------------

    /// Arbitrate the squad's focus among `candidates`.
    ///
    /// An existing focus that is still a candidate is kept. Otherwise a
    /// candidate is drawn uniformly from `rng`.
    pub fn select_focus(&mut self, candidates: &[TargetId], rng: &mut SimRng) -> FocusChange {
        if candidates.is_empty() {
            return match self.focus.take() {
                Some(_) => FocusChange::Cleared,
                None => FocusChange::Unchanged,
            };
        }

        if self.focus.is_some_and(|current| candidates.contains(&current)) {
            return FocusChange::Unchanged;
        }

        let pick = candidates[rng.range(0, candidates.len())];
        self.focus = Some(pick);
        FocusChange::Selected(pick)
    }

    // ------------------------------------------------------------------------
    // Coordinator pass
    // ------------------------------------------------------------------------

    /// One coordinator pass over this squad.
    ///
    /// `members` must be this squad's currently observed members.
    /// `resolve` maps a target id to its world position. `elapsed` is the
    /// time in seconds since the previous pass.
    pub fn update<F>(&mut self, members: &[MemberView], resolve: F, config: &SimConfig, elapsed: f32, rng: &mut SimRng)
    where
        F: Fn(TargetId) -> Option<Vec2>,
    {
        let mut members: Vec<MemberView> = members.to_vec();
        members.sort_by_key(|m| m.id);
        self.members = members.iter().map(|m| m.id).collect();

        let Some(leader) = members.first().copied() else {
            self.slots.clear();
            self.flanking.clear();
            self.flank_points.clear();
            return;
        };

        let candidates: Vec<TargetId> = members
            .iter()
            .filter_map(|m| m.target)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let change = self.select_focus(&candidates, rng);
        if change.changed() {
            tracing::debug!(squad = self.id.0, ?change, "squad focus target changed");
        }
        self.focus_position = self.focus.and_then(&resolve);

        if candidates.is_empty() {
            self.decay_alert(config.alert_decay_per_second, elapsed);
        } else {
            let spotter = members.iter().any(|m| m.raises_alert && m.target.is_some());
            let raise = if spotter { config.alert_raise * 2.0 } else { config.alert_raise };
            self.raise_alert(raise);
        }

        self.update_formation(&members, leader, config.formation_spacing);
        self.update_flankers(&members, config.flank_distance);

        tracing::trace!(
            squad = self.id.0,
            members = self.members.len(),
            alert = self.alert,
            focus = ?self.focus,
            "squad updated"
        );
    }

    fn update_formation(&mut self, members: &[MemberView], leader: MemberView, spacing: f32) {
        let n = members.len() as f32;
        let sum = members.iter().fold(Vec2::ZERO, |acc, m| acc + m.position);
        self.centroid = sum.scale(1.0 / n);
        self.origin = leader.position;

        let toward_focus = self
            .focus_position
            .map(|f| (f - leader.position).normalized())
            .filter(|d| *d != Vec2::ZERO);
        self.facing = toward_focus.unwrap_or_else(|| {
            let f = leader.facing.normalized();
            if f == Vec2::ZERO {
                Vec2::X
            } else {
                f
            }
        });

        self.slots.clear();
        for (i, follower) in members.iter().skip(1).enumerate() {
            let slot = self.origin + formation_offset(i, self.formation, self.facing, spacing);
            self.slots.insert(follower.id, slot);
        }
    }

    fn update_flankers(&mut self, members: &[MemberView], flank_distance: f32) {
        let count = ((members.len() as f32 * FLANK_FRACTION).ceil() as usize).clamp(1, members.len());

        let mut ranked: Vec<&MemberView> = members.iter().collect();
        ranked.sort_by(|a, b| b.aggression.total_cmp(&a.aggression).then(a.id.cmp(&b.id)));

        self.flanking = ranked.iter().take(count).map(|m| m.id).collect();
        self.flank_points.clear();

        if let Some(focus) = self.focus_position {
            let flank = flank_vector(focus, self.centroid, flank_distance);
            for (i, m) in ranked.iter().take(count).enumerate() {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                self.flank_points.insert(m.id, focus + flank.scale(sign));
            }
        }
    }

    /// Orders for one member, or `None` if `id` is not in this squad.
    pub fn orders_for(&self, id: AgentId) -> Option<SquadOrders> {
        if !self.members.contains(&id) {
            return None;
        }
        Some(SquadOrders {
            squad: self.id,
            alert: self.alert,
            focus: self.focus,
            focus_position: self.focus_position,
            is_leader: self.leader() == Some(id),
            formation_slot: self.slots.get(&id).copied(),
            flank_point: self.flank_points.get(&id).copied(),
        })
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
