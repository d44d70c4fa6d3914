//! Scene container: primitives plus the material table they reference.

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, MaterialId};
use crate::material::Material;
use crate::sphere::Primitive;
use tessera_math::{Interval, Ray};

/// An append-only list of primitives and the materials they share.
///
/// Built once before rendering and then only read, so a `&Scene` can be
/// handed to every worker without synchronization.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: Vec<Material>,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add a primitive to the scene.
    ///
    /// Fails if the primitive references a material this scene does not
    /// own, or if its geometry is degenerate.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> RenderResult<()> {
        let primitive = primitive.into();
        primitive.validate()?;
        let id = primitive.material();
        if id.index() >= self.materials.len() {
            return Err(RenderError::UnknownMaterial(id.index()));
        }
        self.primitives.push(primitive);
        Ok(())
    }

    /// Look up a material by handle.
    ///
    /// Handles in hit records always resolve, since `add` rejects unknown ids.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Get the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Check if the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Nearest hit across all primitives, by linear scan.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest_so_far = ray_t.max;
        let mut nearest = None;

        for primitive in &self.primitives {
            if let Some(rec) = primitive.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                nearest = Some(rec);
            }
        }

        nearest
    }
}
