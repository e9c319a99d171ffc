use rand::Rng;

use crate::motion::Point;

const JITTER_SPAN: f64 = 8.0;
const LIFE_DECAY_PER_FRAME: f64 = 0.035;
const HUE_DIVISOR_MS: f64 = 18.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub position: Point,
    pub life: f64,
    pub hue: f64,
}

impl Particle {
    pub fn opacity(&self) -> f64 {
        self.life * 0.9
    }

    pub fn scale(&self) -> f64 {
        0.5 + self.life * 0.6
    }

    pub fn background(&self) -> String {
        format!(
            "conic-gradient(from 0deg, hsl({:.1} 85% 60%) 0 30%, transparent 30% 100%)",
            self.hue
        )
    }
}

/// Short-lived sparks left behind the pointer, one per frame.
#[derive(Default)]
pub struct Trail {
    particles: Vec<Particle>,
    next_id: u64,
}

impl Trail {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn advance<R: Rng>(&mut self, pointer: Point, now_ms: f64, rng: &mut R) {
        let jitter_x = (rng.random::<f64>() - 0.5) * JITTER_SPAN;
        let jitter_y = (rng.random::<f64>() - 0.5) * JITTER_SPAN;

        self.particles.push(Particle {
            id: self.next_id,
            position: Point::new(pointer.x + jitter_x, pointer.y + jitter_y),
            life: 1.0,
            hue: hue_at(now_ms),
        });
        self.next_id += 1;

        for particle in &mut self.particles {
            particle.life -= LIFE_DECAY_PER_FRAME;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }
}

pub fn hue_at(now_ms: f64) -> f64 {
    (now_ms / HUE_DIVISOR_MS).rem_euclid(360.0)
}
