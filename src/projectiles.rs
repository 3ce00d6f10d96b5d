//! Player bullets.
//!
//! Unlike hazards, a bullet is consumed only when the boss accepts its
//! damage. A refused hit leaves it flying so it can connect next tick.

use crate::core::combat::DamageTarget;
use crate::core::config::{BulletConfig, WorldConfig};
use crate::core::constants::Millis;
use crate::core::events::DamageSource;
use crate::core::geometry::Hitbox;
use serde::{Deserialize, Serialize};

/// One bullet. `(x, y)` is the centre of its bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct BulletManager {
    config: BulletConfig,
    world_height: f64,
    bullets: Vec<Bullet>,
    next_id: u32,
}

impl BulletManager {
    pub fn new(config: BulletConfig, world: &WorldConfig) -> Self {
        Self {
            config,
            world_height: world.height,
            bullets: Vec::new(),
            next_id: 1,
        }
    }

    pub fn spawn(&mut self, x: f64, y: f64) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.bullets.push(Bullet { id, x, y });
        tracing::trace!(id, x, y, "bullet fired");
        id
    }

    /// Move every bullet, drop those that left the play area, then resolve
    /// hits against `target`. Returns how many bullets connected.
    pub fn update(
        &mut self,
        now: Millis,
        delta_ms: Millis,
        target: &mut impl DamageTarget,
    ) -> u32 {
        let travel = self.config.speed * delta_ms as f64 / 1000.0;
        let (height, world_height) = (self.config.height, self.world_height);
        for bullet in &mut self.bullets {
            bullet.y -= travel;
        }
        self.bullets
            .retain(|b| b.y + height >= 0.0 && b.y <= world_height + height);

        let config = self.config;
        let mut hits = 0;
        self.bullets.retain(|bullet| {
            let hitbox = Self::bullet_hitbox(&config, bullet);
            if !hitbox.intersects(&target.hitbox()) {
                return true;
            }
            if target.apply_damage(config.damage, DamageSource::Bullet, now) {
                tracing::trace!(id = bullet.id, now, "bullet hit");
                hits += 1;
                false
            } else {
                true
            }
        });
        hits
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    pub fn hitbox(&self, bullet: &Bullet) -> Hitbox {
        Self::bullet_hitbox(&self.config, bullet)
    }

    fn bullet_hitbox(config: &BulletConfig, bullet: &Bullet) -> Hitbox {
        Hitbox::new(
            bullet.x - config.width / 2.0,
            bullet.y - config.height,
            config.width,
            config.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::combat::stub::StubTarget;

    fn manager() -> BulletManager {
        BulletManager::new(BulletConfig::default(), &WorldConfig::default())
    }

    fn boss_box() -> Hitbox {
        Hitbox::from_center(160.0, 48.0, 164.0, 48.0)
    }

    #[test]
    fn test_bullets_travel_up() {
        let mut bullets = manager();
        let mut target = StubTarget::at(Hitbox::new(0.0, 0.0, 0.0, 0.0));
        bullets.spawn(20.0, 100.0);
        bullets.update(0, 100, &mut target);
        assert!((bullets.bullets()[0].y - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_offscreen_bullets_are_dropped() {
        let mut bullets = manager();
        let mut target = StubTarget::at(Hitbox::new(0.0, 0.0, 0.0, 0.0));
        bullets.spawn(20.0, 2.0);
        bullets.update(0, 16, &mut target);
        assert_eq!(bullets.len(), 1);
        bullets.update(16, 16, &mut target);
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_accepted_hit_consumes_bullet() {
        let mut bullets = manager();
        let mut target = StubTarget::at(boss_box());
        bullets.spawn(160.0, 70.0);
        assert_eq!(bullets.update(5, 16, &mut target), 1);
        assert!(bullets.is_empty());
        assert_eq!(target.damage_calls, vec![(1, DamageSource::Bullet, 5)]);
    }

    #[test]
    fn test_refused_hit_keeps_bullet() {
        let mut bullets = manager();
        let mut target = StubTarget::at(boss_box());
        target.accept = false;
        bullets.spawn(160.0, 70.0);
        assert_eq!(bullets.update(0, 16, &mut target), 0);
        assert_eq!(bullets.len(), 1);

        target.accept = true;
        assert_eq!(bullets.update(16, 16, &mut target), 1);
        assert!(bullets.is_empty());
        assert_eq!(target.damage_calls.len(), 2);
    }

    #[test]
    fn test_each_bullet_hits_independently() {
        let mut bullets = manager();
        let mut target = StubTarget::at(boss_box());
        bullets.spawn(150.0, 70.0);
        bullets.spawn(170.0, 70.0);
        bullets.spawn(10.0, 170.0);
        assert_eq!(bullets.update(0, 16, &mut target), 2);
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut bullets = manager();
        bullets.spawn(1.0, 1.0);
        bullets.spawn(2.0, 2.0);
        bullets.clear();
        assert!(bullets.is_empty());
    }
}
