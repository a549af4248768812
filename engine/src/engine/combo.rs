// src/combo.rs
use std::fmt;

/// Identity tag shared by interchangeable pieces: indices into the shape,
/// color and animal catalogs. Equality is component-wise.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Combo {
    pub shape: u8,
    pub color: u8,
    pub animal: u8,
}

impl Combo {
    pub fn new(shape: u8, color: u8, animal: u8) -> Self {
        Self {
            shape,
            color,
            animal,
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shape, self.color, self.animal)
    }
}

/// Catalog sizes the generator draws from. The valid universe is the full
/// cross-product of the three axes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Catalog {
    pub shapes: usize,
    pub colors: usize,
    pub animals: usize,
}

impl Catalog {
    pub fn new(shapes: usize, colors: usize, animals: usize) -> Self {
        Self {
            shapes,
            colors,
            animals,
        }
    }

    pub fn cross_size(&self) -> usize {
        self.shapes * self.colors * self.animals
    }

    /// Every (shape, color, animal) triple, shape-major order.
    /// Axis sizes above 256 are clamped away by config normalization.
    pub fn cross_product(&self) -> Vec<Combo> {
        debug_assert!(self.shapes <= 256 && self.colors <= 256 && self.animals <= 256);
        let mut all = Vec::with_capacity(self.cross_size());
        for s in 0..self.shapes {
            for c in 0..self.colors {
                for a in 0..self.animals {
                    all.push(Combo::new(s as u8, c as u8, a as u8));
                }
            }
        }
        all
    }

    pub fn contains(&self, combo: Combo) -> bool {
        (combo.shape as usize) < self.shapes
            && (combo.color as usize) < self.colors
            && (combo.animal as usize) < self.animals
    }
}
