//! Game simulation module
//!
//! All gameplay logic lives here:
//! - Fixed-rate tick driven by millisecond timestamps
//! - Gameplay randomness only through the session's seeded spawner
//! - No rendering, audio or terminal dependencies; effects leave as `GameEvent`s

pub mod arena;
pub mod collision;
pub mod entity;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod vitals;

pub use arena::{Arena, SlotId};
pub use collision::{Hit, intersects, resolve_against, resolve_group};
pub use entity::{
    Advance, AdvanceCtx, Body, Collidable, EntityMut, EntityRef, Explosion, ExplosionKind, HitShape, Obstacle,
    PowerUp, PowerUpKind, Projectile, advance,
};
pub use player::{Player, Volley};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameSession};
pub use tick::{Game, TickInput};
pub use vitals::{Score, Vitals};
