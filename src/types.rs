use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Single detector hit in a 2D projection (Y is zero for XZ views).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaloHit {
    pub position: Vector3<f32>,
    /// Deposited energy (GeV).
    #[serde(default)]
    pub energy: f32,
}

impl CaloHit {
    pub fn new(position: Vector3<f32>, energy: f32) -> Self {
        Self { position, energy }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vector3::new(x, y, z), 0.0)
    }
}

/// Hits believed to belong to one trajectory. Order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub hits: Vec<CaloHit>,
}

impl Cluster {
    pub fn new(hits: Vec<CaloHit>) -> Self {
        Self { hits }
    }

    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        Self {
            hits: positions
                .into_iter()
                .map(|p| CaloHit::new(p, 0.0))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Vector3<f32>> + '_ {
        self.hits.iter().map(|h| &h.position)
    }

    pub fn total_energy(&self) -> f32 {
        self.hits.iter().map(|h| h.energy).sum()
    }
}
