//! Particle state and the fixed-size population that owns it.

use flowfield_core::UniformSource;
use glam::DVec2;

/// One tracked point.
///
/// `origin` is fixed at construction; `position` returns to it on every
/// reset. `active` is cleared once the particle leaves the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    origin: DVec2,
    position: DVec2,
    active: bool,
}

impl Particle {
    /// An active particle sitting at its origin.
    pub fn new(origin: DVec2) -> Self {
        Self {
            origin,
            position: origin,
            active: true,
        }
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn move_to(&mut self, position: DVec2) {
        self.position = position;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    fn reset(&mut self) {
        self.position = self.origin;
        self.active = true;
    }
}

/// Ordered set of particles. Cardinality is fixed once spawned; particles
/// are only ever reset in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    particles: Vec<Particle>,
}

impl Population {
    /// Spawns `count` particles uniformly in `[0, width) x [0, height)`.
    ///
    /// Each particle draws its x then its y from `rng`.
    pub fn spawn<R: UniformSource + ?Sized>(
        count: usize,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Self {
        let (w, h) = (width as f64, height as f64);
        let particles = (0..count)
            .map(|_| {
                let x = rng.next_range(0.0, w);
                let y = rng.next_range(0.0, h);
                Particle::new(DVec2::new(x, y))
            })
            .collect();
        Self { particles }
    }

    /// Builds a population with particles at the given origins, in order.
    pub fn from_origins<I: IntoIterator<Item = DVec2>>(origins: I) -> Self {
        Self {
            particles: origins.into_iter().map(Particle::new).collect(),
        }
    }

    /// Returns every particle to its origin and marks it active.
    pub fn reset_all(&mut self) {
        self.particles.iter_mut().for_each(Particle::reset);
    }

    /// True iff no particle is active. Vacuously true when empty.
    pub fn all_inactive(&self) -> bool {
        self.particles.iter().all(|p| !p.active)
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> + '_ {
        self.particles.iter_mut()
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }
}
