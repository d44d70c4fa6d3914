//! Built-in demo scenes.

use crate::config::SceneKind;
use crate::error::RenderResult;
use crate::material::Material;
use crate::random::{gen_f32, gen_range, random_color};
use crate::scene::Scene;
use crate::sphere::Sphere;
use crate::texture::Texture;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tessera_math::{Color, Vec3};

/// Build the scene selected by `kind`.
pub fn build(kind: SceneKind) -> RenderResult<Scene> {
    let scene = match kind {
        SceneKind::Random {
            seed,
            checkered_ground,
        } => {
            let mut rng = StdRng::seed_from_u64(seed);
            random_scene(&mut rng, checkered_ground)?
        }
        SceneKind::ThreeSpheres => three_spheres()?,
        SceneKind::Ground => ground_only()?,
    };

    log::info!(
        "Built {:?} scene with {} spheres and {} materials",
        kind,
        scene.len(),
        scene.material_count()
    );
    Ok(scene)
}

/// Field of small random spheres around three large ones.
pub fn random_scene(rng: &mut dyn RngCore, checkered_ground: bool) -> RenderResult<Scene> {
    let mut scene = Scene::new();

    // Ground
    let ground_albedo = if checkered_ground {
        Texture::checker(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9))
    } else {
        Texture::solid(Color::new(0.5, 0.5, 0.5))
    };
    let ground = scene.add_material(Material::textured(ground_albedo));
    scene.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground))?;

    let glass = scene.add_material(Material::dielectric(1.5));

    // Small random spheres
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                scene.add_material(Material::lambertian(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                scene.add_material(Material::metal(albedo, fuzz))
            } else {
                glass
            };
            scene.add(Sphere::new(center, 0.2, material))?;
        }
    }

    // Three main spheres
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass))?;

    let diffuse = scene.add_material(Material::lambertian(Color::new(0.4, 0.2, 0.1)));
    scene.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, diffuse))?;

    let metal = scene.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, metal))?;

    Ok(scene)
}

/// Ground, diffuse center, hollow glass left, polished metal right.
pub fn three_spheres() -> RenderResult<Scene> {
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::lambertian(Color::new(0.8, 0.8, 0.0)));
    let center = scene.add_material(Material::lambertian(Color::new(0.1, 0.2, 0.5)));
    let left = scene.add_material(Material::dielectric(1.5));
    let right = scene.add_material(Material::metal(Color::new(0.8, 0.6, 0.2), 0.0));

    scene.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground))?;
    scene.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, center))?;
    scene.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, left))?;
    // Negative radius flips the normals, making the glass a thin shell
    scene.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, left))?;
    scene.add(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, right))?;

    Ok(scene)
}

/// A single large grey ground sphere.
pub fn ground_only() -> RenderResult<Scene> {
    let mut scene = Scene::new();
    let ground = scene.add_material(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    scene.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground))?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Primitive;

    fn radii(scene: &Scene) -> Vec<f32> {
        scene
            .primitives()
            .iter()
            .map(|p| match p {
                Primitive::Sphere(s) => s.radius(),
            })
            .collect()
    }

    #[test]
    fn test_random_scene_is_seeded() {
        let a = build(SceneKind::Random {
            seed: 7,
            checkered_ground: false,
        })
        .unwrap();
        let b = build(SceneKind::Random {
            seed: 7,
            checkered_ground: false,
        })
        .unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.primitives(), b.primitives());
    }

    #[test]
    fn test_random_scene_layout() {
        let mut rng = StdRng::seed_from_u64(42);
        let scene = random_scene(&mut rng, false).unwrap();

        // Ground + at most 22x22 small spheres + 3 large
        assert!(scene.len() > 4);
        assert!(scene.len() <= 1 + 22 * 22 + 3);

        let radii = radii(&scene);
        assert_eq!(radii[0], 1000.0);
        assert_eq!(&radii[radii.len() - 3..], &[1.0, 1.0, 1.0]);
        assert!(radii[1..radii.len() - 3].iter().all(|&r| r == 0.2));
    }

    #[test]
    fn test_checkered_ground() {
        let mut rng = StdRng::seed_from_u64(1);
        let scene = random_scene(&mut rng, true).unwrap();
        let ground = scene.primitives()[0].material();
        assert!(matches!(
            scene.material(ground),
            Material::Lambertian {
                albedo: Texture::Checker { .. }
            }
        ));
    }

    #[test]
    fn test_three_spheres_has_hollow_glass() {
        let scene = three_spheres().unwrap();
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.material_count(), 4);
        assert_eq!(radii(&scene), vec![100.0, 0.5, 0.5, -0.45, 0.5]);

        // Outer and inner glass shells share one material
        let prims = scene.primitives();
        assert_eq!(prims[2].material(), prims[3].material());
    }

    #[test]
    fn test_ground_only() {
        let scene = build(SceneKind::Ground).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.material_count(), 1);
    }
}
