//! Property tests for the simulation invariants

use std::collections::HashSet;

use asteroid_rush::Tuning;
use asteroid_rush::assets::SpriteAtlas;
use asteroid_rush::platform::{InputEvent, Key};
use asteroid_rush::sim::{Arena, Game, GamePhase, Obstacle, Projectile, Spawner, TickInput, Vitals, resolve_group};
use glam::Vec2;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum HealthOp {
    Damage(f32),
    Heal(i32),
    Restore,
}

fn health_op() -> impl Strategy<Value = HealthOp> {
    prop_oneof![
        (-20.0..200.0f32).prop_map(HealthOp::Damage),
        (-20..200i32).prop_map(HealthOp::Heal),
        Just(HealthOp::Restore),
    ]
}

proptest! {
    #[test]
    fn health_stays_in_bounds(max in 1..500i32, ops in prop::collection::vec(health_op(), 0..64)) {
        let mut vitals = Vitals::new(max, 3);
        for op in ops {
            match op {
                HealthOp::Damage(n) => {
                    let depleted = vitals.damage(n);
                    prop_assert_eq!(depleted, vitals.health() == 0);
                }
                HealthOp::Heal(n) => vitals.heal(n),
                HealthOp::Restore => vitals.restore(),
            }
            prop_assert!((0..=max).contains(&vitals.health()));
        }
    }

    #[test]
    fn recycle_keeps_identity_and_ranges(seed in any::<u64>(), rounds in 1..50usize) {
        let atlas = SpriteAtlas::default();
        let mut spawner = Spawner::new(seed, &atlas, 500.0);
        let mut rock = spawner.spawn_obstacle();
        let (sprite, radius) = (rock.sprite, rock.radius());

        for _ in 0..rounds {
            spawner.recycle(&mut rock);
            prop_assert_eq!(rock.sprite, sprite);
            prop_assert_eq!(rock.radius(), radius);
            prop_assert!((0.0..500.0).contains(&rock.body.pos.x));
            prop_assert!((-200.0..-80.0).contains(&rock.body.pos.y));
            prop_assert!((-3.0..3.0).contains(&rock.body.vel.x));
            prop_assert!((2.0..10.0).contains(&rock.body.vel.y));
            prop_assert!((-3.0..3.0).contains(&rock.rotation_step));
        }
    }

    #[test]
    fn group_hits_are_one_to_one(
        shots in prop::collection::vec((0.0..500.0f32, 0.0..600.0f32), 0..20),
        rocks in prop::collection::vec((0.0..500.0f32, 0.0..600.0f32), 0..20),
    ) {
        let mut projectiles: Arena<Projectile> = Arena::new();
        for (x, y) in shots {
            projectiles.insert(Projectile::new(x, y, Vec2::new(9.0, 54.0)));
        }
        let mut obstacles: Arena<Obstacle> = Arena::new();
        for (x, y) in rocks {
            obstacles.insert(Obstacle::new(0, Vec2::splat(50.0), Vec2::new(x, y), Vec2::ZERO, 0.0));
        }
        let (shots_before, rocks_before) = (projectiles.len(), obstacles.len());

        let hits = resolve_group(&mut projectiles, &mut obstacles, true, true);

        let a: HashSet<_> = hits.iter().map(|h| h.a).collect();
        let b: HashSet<_> = hits.iter().map(|h| h.b).collect();
        prop_assert_eq!(a.len(), hits.len());
        prop_assert_eq!(b.len(), hits.len());
        prop_assert_eq!(projectiles.len(), shots_before - hits.len());
        prop_assert_eq!(obstacles.len(), rocks_before - hits.len());

        // Everything that matched is dead, so a second pass finds nothing new
        prop_assert!(resolve_group(&mut projectiles, &mut obstacles, true, true).is_empty());
    }

    #[test]
    fn rock_population_is_constant(seed in any::<u64>(), fire in prop::collection::vec(any::<bool>(), 1..300)) {
        let mut game = Game::new(Tuning::default(), SpriteAtlas::default(), seed);
        let start = TickInput::new(vec![InputEvent::KeyUp(Key::Space)], HashSet::new());
        game.tick(&start, 0);

        let mut now = 0;
        for shoot in fire {
            now += 16;
            let events = if shoot { vec![InputEvent::KeyDown(Key::Space)] } else { Vec::new() };
            game.tick(&TickInput::new(events, HashSet::new()), now);
            if game.phase() != GamePhase::Playing {
                break;
            }
            prop_assert_eq!(game.session().obstacles.len(), 10);
            prop_assert!(game.session().player.vitals.health() >= 0);
        }
    }
}
