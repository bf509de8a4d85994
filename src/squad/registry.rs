//! Registry of all squads seen so far.

use super::formation::FormationType;
use super::tactics::{Squad, SquadOrders};
use crate::components::{AgentId, SquadId};
use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

/// All squads, keyed by id. Written only by the squad coordinator pass.
#[derive(Resource, Debug, Default)]
pub struct SquadRegistry {
    squads: BTreeMap<SquadId, Squad>,
    /// Formations requested before the squad was first observed.
    pending_formations: BTreeMap<SquadId, FormationType>,
    /// Tick of the last coordinator pass.
    pub last_update: Option<u64>,
}

impl SquadRegistry {
    pub fn get(&self, id: SquadId) -> Option<&Squad> {
        self.squads.get(&id)
    }

    /// Squad for `id`, created on first sight.
    pub fn get_or_create(&mut self, id: SquadId, default_formation: FormationType) -> &mut Squad {
        let pending = &mut self.pending_formations;
        self.squads.entry(id).or_insert_with(|| {
            let formation = pending.remove(&id).unwrap_or(default_formation);
            tracing::debug!(squad = id.0, ?formation, "squad created");
            Squad::new(id, formation)
        })
    }

    /// Change a squad's formation; applies when it is first created if unseen.
    pub fn set_formation(&mut self, id: SquadId, formation: FormationType) {
        match self.squads.get_mut(&id) {
            Some(squad) => squad.formation = formation,
            None => {
                self.pending_formations.insert(id, formation);
            }
        }
    }

    pub fn orders_for(&self, squad: SquadId, agent: AgentId) -> Option<SquadOrders> {
        self.squads.get(&squad).and_then(|s| s.orders_for(agent))
    }

    pub fn ids(&self) -> Vec<SquadId> {
        self.squads.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Squad> {
        self.squads.values()
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }
}
