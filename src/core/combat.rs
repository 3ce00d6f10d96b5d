//! The two narrow contracts through which actors affect each other.
//!
//! Hazards and bullets only ever see a target through these traits, so each
//! side can be exercised against a stub.

use super::constants::Millis;
use super::events::DamageSource;
use super::geometry::Hitbox;

/// Something that can be struck.
pub trait DamageTarget {
    fn hitbox(&self) -> Hitbox;

    /// Returns whether the damage was accepted. `false` means the attack must
    /// not be consumed.
    fn apply_damage(&mut self, amount: u32, source: DamageSource, now: Millis) -> bool;
}

/// A target that magnets can also grab.
pub trait GrabTarget: DamageTarget {
    fn apply_magnet_grab(&mut self, source: DamageSource, now: Millis) -> bool;
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;

    /// Records every call and accepts or refuses on demand.
    #[derive(Debug, Clone)]
    pub struct StubTarget {
        pub hitbox: Hitbox,
        pub accept: bool,
        pub damage_calls: Vec<(u32, DamageSource, Millis)>,
        pub grab_calls: Vec<(DamageSource, Millis)>,
    }

    impl StubTarget {
        pub fn at(hitbox: Hitbox) -> Self {
            Self {
                hitbox,
                accept: true,
                damage_calls: Vec::new(),
                grab_calls: Vec::new(),
            }
        }
    }

    impl DamageTarget for StubTarget {
        fn hitbox(&self) -> Hitbox {
            self.hitbox
        }

        fn apply_damage(&mut self, amount: u32, source: DamageSource, now: Millis) -> bool {
            self.damage_calls.push((amount, source, now));
            self.accept
        }
    }

    impl GrabTarget for StubTarget {
        fn apply_magnet_grab(&mut self, source: DamageSource, now: Millis) -> bool {
            self.grab_calls.push((source, now));
            self.accept
        }
    }
}
