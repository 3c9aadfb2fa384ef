//! Generational slot storage for entity groups
//!
//! Slots are never removed while a tick is running: collision resolution marks
//! entities dead in place and `sweep` recycles their slots afterwards. Reusing
//! a slot bumps its generation, so a stale `SlotId` never sees a new occupant.

use super::entity::Collidable;

/// Stable handle to an arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl SlotId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: T,
}

/// Entity group with stable slots
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T: Collidable> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity, reusing a swept slot when one is available
    pub fn insert(&mut self, value: T) -> SlotId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = value;
            SlotId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value,
            });
            SlotId {
                index,
                generation: 0,
            }
        }
    }

    /// Entity behind `id`, dead or alive, until its slot is reused
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .map(|slot| &mut slot.value)
    }

    /// True if `id` still refers to a live entity
    pub fn is_alive(&self, id: SlotId) -> bool {
        self.get(id).is_some_and(|e| e.body().alive)
    }

    /// Mark an entity dead; returns false if it already was
    pub fn kill(&mut self, id: SlotId) -> bool {
        match self.get_mut(id) {
            Some(e) if e.body().alive => {
                e.body_mut().alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.value.body().alive)
            .map(|(i, slot)| {
                (
                    SlotId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    &slot.value,
                )
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.value.body().alive)
            .map(|(i, slot)| {
                (
                    SlotId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    &mut slot.value,
                )
            })
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand dead slots back to the free list
    pub fn sweep(&mut self) {
        for (i, slot) in self.slots.iter().enumerate() {
            let index = i as u32;
            if !slot.value.body().alive && !self.free.contains(&index) {
                self.free.push(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Projectile;
    use glam::Vec2;

    fn bullet(x: f32) -> Projectile {
        Projectile::new(x, 100.0, Vec2::new(10.0, 20.0))
    }

    #[test]
    fn test_insert_and_kill() {
        let mut arena = Arena::new();
        let a = arena.insert(bullet(10.0));
        let b = arena.insert(bullet(20.0));
        assert_eq!(arena.len(), 2);

        assert!(arena.kill(a));
        assert!(!arena.kill(a));
        assert_eq!(arena.len(), 1);
        assert!(!arena.is_alive(a));
        assert!(arena.is_alive(b));

        // Dead entity data stays readable until the slot is reused
        assert!(arena.get(a).is_some());
    }

    #[test]
    fn test_dead_slots_reused_only_after_sweep() {
        let mut arena = Arena::new();
        let a = arena.insert(bullet(10.0));
        arena.kill(a);

        let b = arena.insert(bullet(20.0));
        assert_ne!(a.index(), b.index());

        arena.sweep();
        let c = arena.insert(bullet(30.0));
        assert_eq!(a.index(), c.index());

        // Stale handle never sees the new occupant
        assert!(arena.get(a).is_none());
        assert!(!arena.is_alive(a));
        assert!(arena.is_alive(c));
    }

    #[test]
    fn test_iter_skips_dead() {
        let mut arena = Arena::new();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(bullet(i as f32))).collect();
        arena.kill(ids[1]);
        arena.kill(ids[3]);

        let live: Vec<_> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(live, vec![ids[0], ids[2]]);
    }
}
