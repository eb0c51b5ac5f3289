use nalgebra::Vector3;
use std::ops::Add;

/// A Lorentz four-momentum with the beam along the z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourMomentum {
    pub p: Vector3<f64>,
    pub e: f64,
}

impl FourMomentum {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self {
            p: Vector3::new(px, py, pz),
            e,
        }
    }

    /// Magnitude of the momentum component transverse to the beam axis.
    pub fn pt(&self) -> f64 {
        self.p.x.hypot(self.p.y)
    }

    pub fn mass_squared(&self) -> f64 {
        self.e * self.e - self.p.norm_squared()
    }

    /// Invariant mass. A space-like vector yields `-sqrt(-m^2)`.
    pub fn mass(&self) -> f64 {
        let m2 = self.mass_squared();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            p: self.p + rhs.p,
            e: self.e + rhs.e,
        }
    }
}

pub fn invariant_mass(a: &FourMomentum, b: &FourMomentum) -> f64 {
    (*a + *b).mass()
}
