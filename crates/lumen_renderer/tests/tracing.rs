//! End-to-end tracing through hand-built scene graphs.

use std::sync::Arc;

use lumen_core::{Color, Light, Texture};
use lumen_renderer::{
    background, render, Camera, Material, PhongMaterial, Polygon, Primitive, RenderConfig,
    SamplingMode, Scene, SceneNode, Shape, Sphere, TextureMaterial, Tracer, Cube, Ray, Vec3,
    MAX_RECURSION_DEPTH,
};

fn camera(width: u32, height: u32) -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, Vec3::Y, 45.0, width, height).unwrap()
}

fn red() -> Arc<dyn Material> {
    Arc::new(PhongMaterial::new(Color::new(0.8, 0.1, 0.1), Color::splat(0.3), 20.0))
}

fn square(z: f32) -> Shape {
    Shape::Polygon(
        Polygon::new(
            vec![
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
            None,
            None,
        )
        .unwrap(),
    )
}

/// Textured with a single texel of the given alpha.
fn decal(alpha: f32) -> Arc<dyn Material> {
    let texture = Texture::new(1, 1, vec![[1.0, 1.0, 1.0, alpha]], "decal").unwrap();
    Arc::new(TextureMaterial::new(Arc::new(texture), Color::ZERO, 1.0))
}

fn sphere_scene_root() -> SceneNode {
    SceneNode::group("root")
        .with_child(SceneNode::geometry("ball", Shape::Sphere(Sphere), red()))
        .unwrap()
}

#[test]
fn test_unit_sphere_render() {
    let _ = env_logger::builder().is_test(true).try_init();

    let root = sphere_scene_root();
    let lights = vec![Light::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE)];
    let scene = Scene::new(&root, camera(32, 32), Color::splat(0.1), lights).unwrap();

    let config = RenderConfig {
        threads: 2,
        sampling: SamplingMode::Center,
        seed: 0,
    };
    let image = render(&scene, &config).unwrap();
    assert_eq!(image.pixels.len(), 32 * 32);

    let centre = image.get(16, 16);
    assert!(centre.x > 0.5, "centre should be lit red, got {:?}", centre);
    assert!(centre.x > centre.y);

    assert_eq!(image.get(0, 0), background(0, 32));
    assert_eq!(image.get(31, 31), background(31, 32));
    assert!(image.get(0, 31).z > 0.9);
}

#[test]
fn test_render_independent_of_thread_count() {
    let root = sphere_scene_root();
    let lights = vec![Light::new(Vec3::new(3.0, 3.0, 6.0), Color::ONE)];
    let scene = Scene::new(&root, camera(12, 8), Color::ZERO, lights).unwrap();

    let config = |threads| RenderConfig {
        threads,
        sampling: SamplingMode::Stochastic { rays_per_pixel: 4 },
        seed: 42,
    };
    let one = render(&scene, &config(1)).unwrap();
    let three = render(&scene, &config(3)).unwrap();
    assert_eq!(one.pixels, three.pixels);
}

#[test]
fn test_facing_mirrors_stop_at_depth_cap() {
    let mirror: Arc<dyn Material> = Arc::new(PhongMaterial::mirror());
    let mut root = SceneNode::group("root")
        .with_child(SceneNode::geometry("back", square(0.0), mirror.clone()))
        .unwrap()
        .with_child(SceneNode::geometry("front", square(2.0), mirror))
        .unwrap();
    root.rebuild_caches().unwrap();

    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![]).unwrap();
    let tracer = Tracer::new(&scene, Color::ONE);

    let colour = tracer.trace_primary(&Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z));
    // Every bounce hits the other mirror, so the chain ends in black
    assert_eq!(colour, Some(Color::ZERO));
    assert_eq!(tracer.deepest(), MAX_RECURSION_DEPTH);
}

#[test]
fn test_escaping_reflection_sees_background() {
    let mirror: Arc<dyn Material> = Arc::new(PhongMaterial::mirror());
    let root = SceneNode::group("root")
        .with_child(SceneNode::geometry("front", square(2.0), mirror))
        .unwrap();
    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![]).unwrap();
    let tracer = Tracer::new(&scene, Color::new(0.0, 0.0, 0.5));

    let colour = tracer
        .trace_primary(&Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z))
        .unwrap();
    assert!((colour - Color::new(0.0, 0.0, 0.5)).length() < 1e-6);
    assert_eq!(tracer.deepest(), 1);
}

fn occluder_scene(material: Arc<dyn Material>) -> SceneNode {
    let mut block = SceneNode::geometry("block", Shape::Cube(Cube), material);
    block.translate(Vec3::new(-0.5, 2.0, -0.5));

    let mut root = SceneNode::group("root").with_child(block).unwrap();
    root.rebuild_caches().unwrap();
    root
}

#[test]
fn test_opaque_occluder_casts_shadow() {
    let root = occluder_scene(red());
    let light = Vec3::new(0.0, 5.0, 0.0);
    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![Light::new(light, Color::ONE)]).unwrap();
    let tracer = Tracer::new(&scene, Color::ZERO);

    assert!(tracer.in_shadow(Vec3::ZERO, light));
    assert!(!tracer.in_shadow(Vec3::new(3.0, 0.0, 0.0), light));
    // Light between the point and the block
    assert!(!tracer.in_shadow(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)));
}

#[test]
fn test_transparent_occluder_lets_light_through() {
    let glass: Arc<dyn Material> = Arc::new(
        PhongMaterial::new(Color::ZERO, Color::ONE, 50.0).with_transparency(0.9, 1.5),
    );
    let root = occluder_scene(glass);
    let light = Vec3::new(0.0, 5.0, 0.0);
    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![Light::new(light, Color::ONE)]).unwrap();
    let tracer = Tracer::new(&scene, Color::ZERO);

    assert!(!tracer.in_shadow(Vec3::ZERO, light));
}

#[test]
fn test_cutout_texel_lets_light_through() {
    let light = Vec3::new(0.0, 5.0, 0.0);

    let root = occluder_scene(decal(0.0));
    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![Light::new(light, Color::ONE)]).unwrap();
    assert!(!Tracer::new(&scene, Color::ZERO).in_shadow(Vec3::ZERO, light));

    let root = occluder_scene(decal(1.0));
    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![Light::new(light, Color::ONE)]).unwrap();
    assert!(Tracer::new(&scene, Color::ZERO).in_shadow(Vec3::ZERO, light));
}

#[test]
fn test_cutout_surface_shows_what_is_behind() {
    let mut root = SceneNode::group("root")
        .with_child(SceneNode::geometry("back", square(0.0), red()))
        .unwrap()
        .with_child(SceneNode::geometry("front", square(2.0), decal(0.0)))
        .unwrap();
    root.rebuild_caches().unwrap();

    // Ambient only, so each surface shows its diffuse colour
    let scene = Scene::new(&root, camera(4, 4), Color::ONE, vec![]).unwrap();
    let tracer = Tracer::new(&scene, Color::new(0.0, 0.0, 0.5));

    let colour = tracer
        .trace_primary(&Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z))
        .unwrap();
    assert!((colour - Color::new(0.8, 0.1, 0.1)).length() < 1e-5, "got {:?}", colour);
}

#[test]
fn test_unmapped_texture_surface_is_hit_and_occludes() {
    // Up parallel to the normal leaves no texture basis
    let triangle = Polygon::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        None,
        Some(Vec3::Z),
    )
    .unwrap();
    let root = SceneNode::group("root")
        .with_child(SceneNode::geometry("decal", Shape::Polygon(triangle), decal(0.0)))
        .unwrap();
    let light = Vec3::new(0.2, 0.2, 5.0);
    let scene = Scene::new(&root, camera(4, 4), Color::ONE, vec![Light::new(light, Color::ONE)]).unwrap();
    let tracer = Tracer::new(&scene, Color::ONE);

    // Black rather than see-through
    let colour = tracer.trace_primary(&Ray::new(Vec3::new(0.2, 0.2, 5.0), -Vec3::Z));
    assert_eq!(colour, Some(Color::ZERO));
    assert!(tracer.in_shadow(Vec3::new(0.2, 0.2, -1.0), light));
}

#[test]
fn test_thin_slab_visible_at_large_image_size() {
    let mut slab = SceneNode::geometry("slab", Shape::Cube(Cube), red());
    slab.translate(Vec3::new(-1.0, -1.0, -0.025));
    slab.scale(Vec3::new(2.0, 2.0, 0.05));
    let mut root = SceneNode::group("root").with_child(slab).unwrap();
    root.rebuild_caches().unwrap();

    for size in [32, 512] {
        let cam = camera(size, size);
        let ray = cam.pixel_ray(size as f32 / 2.0, size as f32 / 2.0);
        let lights = vec![Light::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE)];
        let scene = Scene::new(&root, cam, Color::ZERO, lights).unwrap();
        let tracer = Tracer::new(&scene, Color::ZERO);

        let colour = tracer.trace_primary(&ray);
        assert!(
            colour.map_or(false, |c| c.x > 0.5),
            "slab missed at {}px: {:?}",
            size,
            colour
        );
    }
}

#[test]
fn test_glass_sphere_shows_what_is_behind() {
    let glass: Arc<dyn Material> = Arc::new(
        PhongMaterial::new(Color::ZERO, Color::ZERO, 1.0).with_transparency(1.0, 1.5),
    );
    let root = SceneNode::group("root")
        .with_child(SceneNode::geometry("lens", Shape::Sphere(Sphere), glass))
        .unwrap();
    let scene = Scene::new(&root, camera(4, 4), Color::ZERO, vec![]).unwrap();
    let tracer = Tracer::new(&scene, Color::ONE);

    // Straight through the centre: refracted twice at normal incidence, out
    // to the white background, minus what the two interfaces reflect
    let colour = tracer
        .trace_primary(&Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z))
        .unwrap();
    assert!(colour.x > 0.85 && colour.x <= 1.0 + 1e-5, "got {:?}", colour);
    assert!(tracer.deepest() >= 2);
}

#[test]
fn test_grazing_rays_give_even_hit_counts() {
    let shapes = [
        Shape::Sphere(Sphere),
        Shape::Cube(Cube),
        Shape::Cylinder(lumen_renderer::Cylinder::new()),
        Shape::Cone(lumen_renderer::Cone::new()),
    ];
    let rays = [
        // Tangent to the sphere
        Ray::new(Vec3::new(-3.0, 1.0, 0.0), Vec3::X),
        // Along a cube face and a cube edge
        Ray::new(Vec3::new(-1.0, 0.0, 0.5), Vec3::X),
        Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X),
        // Along the cylinder wall and the cone's apex
        Ray::new(Vec3::new(1.0, 0.0, -2.0), Vec3::Z),
        Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X),
        // Through a corner of the cube
        Ray::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE),
    ];

    for shape in &shapes {
        for ray in &rays {
            let hits = shape.filtered_intersect(ray, 0.0);
            assert_eq!(
                hits.len() % 2,
                0,
                "{} gave {} hits for {:?}",
                shape.kind_name(),
                hits.len(),
                ray
            );
        }
    }
}
