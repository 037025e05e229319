use std::collections::BTreeMap;

use battle_grid::BattleSide;

use crate::defs::FormationDef;
use crate::formation::{Formation, FormationKind, SquadId};

/// Index of a pooled formation slot. Stable for the pool's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormationHandle(u32);

impl FormationHandle {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Arena of formation slots with per-kind free lists.
///
/// `acquire` re-issues a released slot of the requested kind before growing
/// the arena, so steady-state battles churn no allocations. Everything takes
/// `&mut self`: the pool belongs to the single simulation thread driving the
/// tick, and that is the whole synchronization story.
#[derive(Debug, Default)]
pub struct FormationPool {
    arena: Vec<Formation>,
    free: BTreeMap<FormationKind, Vec<FormationHandle>>,
}

impl FormationPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a formation of the def's kind, recycled if possible.
    ///
    /// A recycled slot is fully `init`-ed before it is returned; nothing of
    /// the previous owner survives except the buffer capacity.
    pub fn acquire(
        &mut self,
        def: &FormationDef,
        side: BattleSide,
        owner: SquadId,
    ) -> FormationHandle {
        if let Some(handle) = self.free.get_mut(&def.kind).and_then(Vec::pop) {
            self.arena[handle.0 as usize].init(def, side, owner);
            return handle;
        }

        let handle = FormationHandle(self.arena.len() as u32);
        self.arena.push(Formation::from_def(def, side, owner));
        handle
    }

    /// Return a slot to its kind's free list.
    ///
    /// The slot must not be touched again until `acquire` re-issues it.
    pub fn release(&mut self, handle: FormationHandle) {
        let kind = self.arena[handle.0 as usize].kind();
        let list = self.free.entry(kind).or_default();
        debug_assert!(!list.contains(&handle), "formation released twice");
        list.push(handle);
    }

    pub fn get(&self, handle: FormationHandle) -> &Formation {
        &self.arena[handle.0 as usize]
    }

    pub fn get_mut(&mut self, handle: FormationHandle) -> &mut Formation {
        &mut self.arena[handle.0 as usize]
    }

    /// Total slots ever created, free or issued.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
