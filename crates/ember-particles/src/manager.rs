//! Owns a pool of particle systems, reclaiming finished ones

use crate::info::ParticleSystemInfo;
use crate::particle::ParticleInstance;
use crate::rand::ParticleRng;
use crate::system::ParticleSystem;

/// Maximum number of concurrently live systems
pub const MAX_SYSTEMS: usize = 100;

/// Arena of particle systems using the same index-swap reclaim the
/// particle pool uses: finished systems are swap-removed during update,
/// live systems stay contiguous.
pub struct ParticleManager {
    systems: Vec<ParticleSystem>,
    rng: ParticleRng,
}

impl ParticleManager {
    pub fn new(seed: u32) -> Self {
        Self {
            systems: Vec::with_capacity(MAX_SYSTEMS),
            rng: ParticleRng::new(seed),
        }
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Total live particles across all systems
    pub fn total_alive(&self) -> usize {
        self.systems.iter().map(|s| s.alive_count()).sum()
    }

    /// Fire a new system at `(x, y)`. Returns None when the arena is
    /// full — like pool exhaustion, this is a silent cap, not an error.
    pub fn spawn(
        &mut self,
        info: ParticleSystemInfo,
        x: f32,
        y: f32,
    ) -> Option<&mut ParticleSystem> {
        if self.systems.len() >= MAX_SYSTEMS {
            return None;
        }
        let mut system = ParticleSystem::new(info, self.rng.fork());
        system.fire_at(x, y);
        self.systems.push(system);
        self.systems.last_mut()
    }

    /// Advance every system and reclaim the ones that have drained
    pub fn update(&mut self, delta_time: f32) {
        let mut i = 0;
        while i < self.systems.len() {
            self.systems[i].update(delta_time);
            if self.systems[i].is_done() {
                // Swap-remove; re-examine the slot that now holds the
                // previously-last system
                self.systems.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Shift the render-space transposition of every system
    pub fn transpose(&mut self, x: f32, y: f32) {
        for system in &mut self.systems {
            system.transpose(x, y);
        }
    }

    /// Hard-stop and reclaim everything immediately
    pub fn kill_all(&mut self) {
        self.systems.clear();
    }

    /// Pack instance data for every live particle, grouped by system
    pub fn pack_instances(&self, out: &mut Vec<ParticleInstance>) {
        for system in &self.systems {
            system.pack_instances(out);
        }
    }

    pub fn systems(&self) -> &[ParticleSystem] {
        &self.systems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::LIFETIME_INFINITE;

    fn one_shot_info() -> ParticleSystemInfo {
        ParticleSystemInfo {
            emission: 50.0,
            lifetime: 0.5,
            particle_life_min: 0.2,
            particle_life_max: 0.2,
            ..Default::default()
        }
    }

    #[test]
    fn reclaims_finished_systems() {
        let mut mgr = ParticleManager::new(7);
        mgr.spawn(one_shot_info(), 0.0, 0.0).unwrap();
        assert_eq!(mgr.system_count(), 1);

        mgr.update(0.1);
        assert!(mgr.total_alive() > 0);

        // Run past the system lifetime plus the particle lifetime: the
        // system drains and is reclaimed
        for _ in 0..10 {
            mgr.update(0.1);
        }
        assert_eq!(mgr.system_count(), 0);
        assert_eq!(mgr.total_alive(), 0);
    }

    #[test]
    fn spawn_caps_at_max_systems() {
        let mut mgr = ParticleManager::new(7);
        let mut info = one_shot_info();
        info.lifetime = LIFETIME_INFINITE;
        for _ in 0..MAX_SYSTEMS {
            assert!(mgr.spawn(info.clone(), 0.0, 0.0).is_some());
        }
        assert!(mgr.spawn(info, 0.0, 0.0).is_none());
        assert_eq!(mgr.system_count(), MAX_SYSTEMS);

        mgr.kill_all();
        assert_eq!(mgr.system_count(), 0);
    }

    #[test]
    fn pack_instances_covers_all_systems() {
        let mut mgr = ParticleManager::new(3);
        let mut info = one_shot_info();
        info.lifetime = LIFETIME_INFINITE;
        info.particle_life_min = 10.0;
        info.particle_life_max = 10.0;
        mgr.spawn(info.clone(), 0.0, 0.0).unwrap();
        mgr.spawn(info, 100.0, 0.0).unwrap();

        mgr.update(0.5);
        let mut instances = Vec::new();
        mgr.pack_instances(&mut instances);
        assert_eq!(instances.len(), mgr.total_alive());
        assert!(!instances.is_empty());
    }
}
