//! End-to-end lattice pass and combine behaviour.

use glam::{Affine3A, Quat, Vec3};
use noise::{NoiseFn, Perlin};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tecton_config::{Axis, GenerationConfig, MaterialId, MaterialPalette, Placement};
use tecton_lattice::{
    GenerateError, MeshElementFactory, SeededStreams, generate, generate_seeded, run,
};
use tecton_mesh::{MeshCombiner, combined_group_name};

struct ConstNoise(f64);

impl NoiseFn<f64, 3> for ConstNoise {
    fn get(&self, _point: [f64; 3]) -> f64 {
        self.0
    }
}

const TOP: MaterialId = MaterialId(1);
const RARE: MaterialId = MaterialId(2);
const BOTTOM: MaterialId = MaterialId(3);

fn base_config() -> GenerationConfig {
    let mut config = GenerationConfig::default();
    config.lattice.count = [8, 6, 8];
    config.noise.scale = [0.23, 0.31, 0.19];
    config.noise.threshold = 0.45;
    config.materials.palette = MaterialPalette::from_slots([Some(TOP), Some(RARE), Some(BOTTOM)]);
    config
}

fn cube_factory() -> MeshElementFactory {
    MeshElementFactory::cube(Vec3::ONE)
}

#[test]
fn test_determinism_across_runs() {
    let mut config = base_config();
    config.noise.randomize_offset = true;
    config.explosion.enabled = true;
    config.explosion.strength = 3.0;
    config.explosion.direction_jitter_degrees = 12.0;
    config.explosion.magnitude_jitter = 0.3;
    config.explosion.rotation_scale = 0.5;
    let noise = Perlin::new(7);

    let mut combiner_a = MeshCombiner::new();
    let mut combiner_b = MeshCombiner::new();
    let a = run(&config, &noise, &mut cube_factory(), &mut combiner_a, Affine3A::IDENTITY).unwrap();
    let b = run(&config, &noise, &mut cube_factory(), &mut combiner_b, Affine3A::IDENTITY).unwrap();

    assert!(!a.generation.decisions.is_empty());
    assert_eq!(a.generation.decisions, b.generation.decisions);
    assert_eq!(a.generation.digest(), b.generation.digest());
    assert_eq!(a.generation.noise_offset, b.generation.noise_offset);
    assert_eq!(combiner_a.groups(), combiner_b.groups());
}

#[test]
fn test_seed_change_changes_output() {
    let config = base_config();
    let mut other = config.clone();
    other.seeds.material = 1234;
    let noise = Perlin::new(7);

    let a = generate_seeded(&config, &noise, &mut cube_factory()).unwrap();
    let b = generate_seeded(&other, &noise, &mut cube_factory()).unwrap();
    // Survival does not depend on any stream.
    let cells_a: Vec<_> = a.decisions.iter().map(|d| d.cell).collect();
    let cells_b: Vec<_> = b.decisions.iter().map(|d| d.cell).collect();
    assert_eq!(cells_a, cells_b);
    assert_ne!(a.digest(), b.digest());
}

#[test]
fn test_hole_exclusion_auto_center() {
    let mut config = base_config();
    config.lattice.count = [15, 3, 15];
    config.noise.threshold = 0.0;
    config.hole.enabled = true;
    config.hole.radius = 4.0;

    let result = generate_seeded(&config, &Perlin::new(1), &mut cube_factory()).unwrap();
    assert!(result.stats.carved > 0);
    for d in &result.decisions {
        let r2 = d.position.x * d.position.x + d.position.z * d.position.z;
        assert!(r2 >= 16.0, "{:?} inside the hole", d.position);
    }
}

#[test]
fn test_hole_exclusion_manual_placement() {
    let mut config = base_config();
    config.lattice.count = [9, 2, 9];
    config.lattice.spacing = [0.0; 3];
    config.lattice.placement = Placement::Manual;
    config.lattice.base_position = [50.0, 0.0, -20.0];
    config.noise.threshold = 0.0;
    config.hole.enabled = true;
    config.hole.radius = 2.5;

    let result = generate_seeded(&config, &Perlin::new(1), &mut cube_factory()).unwrap();
    let center = Vec3::new(54.0, 0.5, -16.0);
    assert!(result.stats.carved > 0);
    for d in &result.decisions {
        let dx = d.position.x - center.x;
        let dz = d.position.z - center.z;
        assert!(dx * dx + dz * dz >= 6.25);
    }
}

#[test]
fn test_threshold_monotonicity() {
    let noise = Perlin::new(99);
    let mut config = base_config();
    let mut previous = u64::MAX;
    for step in 0..=10 {
        config.noise.threshold = f64::from(step) / 10.0;
        let result = generate_seeded(&config, &noise, &mut cube_factory()).unwrap();
        assert!(result.stats.produced <= previous);
        previous = result.stats.produced;
    }
}

#[test]
fn test_edge_row_policy() {
    let mut config = base_config();
    config.noise.threshold = 0.0;
    config.materials.rare_probability = 0.3;
    let count_y = config.lattice.count[1];

    let result = generate_seeded(&config, &Perlin::new(3), &mut cube_factory()).unwrap();
    for d in &result.decisions {
        if d.cell.j == 0 {
            assert_ne!(d.material, Some(TOP));
        }
        if d.cell.j == count_y - 1 {
            assert_ne!(d.material, Some(BOTTOM));
        }
    }
}

#[test]
fn test_palette_cycle_rotates_roles_per_row() {
    let mut config = base_config();
    config.lattice.count = [6, 3, 6];
    config.noise.threshold = 0.0;
    config.materials.rare_probability = 0.0;
    config.materials.cycle.enabled = true;
    config.materials.cycle.axis = Axis::Y;
    config.materials.cycle.length = 3;
    config.materials.cycle.offset = 0;

    let result = generate_seeded(&config, &Perlin::new(12), &mut cube_factory()).unwrap();
    let mut middle = Vec::new();
    for d in &result.decisions {
        match d.cell.j {
            // Unrotated, bottom role.
            0 => assert_eq!(d.material, Some(BOTTOM)),
            // Rotated by two, the top role holds the base bottom material.
            2 => assert_eq!(d.material, Some(BOTTOM)),
            _ => middle.push(d.material),
        }
    }
    // Rotated by one: top role is the base rare material, bottom role the base top.
    assert!(middle.iter().all(|m| *m == Some(RARE) || *m == Some(TOP)));
    assert!(middle.contains(&Some(RARE)));
    assert!(middle.contains(&Some(TOP)));
}

#[test]
fn test_combine_idempotence() {
    let mut config = base_config();
    config.combine.discard_sources = false;
    let noise = Perlin::new(5);

    let mut result = generate_seeded(&config, &noise, &mut cube_factory()).unwrap();
    let mut combiner = MeshCombiner::new();

    let first = combiner
        .combine(Affine3A::IDENTITY, &mut result.elements, &config.combine)
        .unwrap();
    let groups_after_first = combiner.groups().to_vec();
    let second = combiner
        .combine(Affine3A::IDENTITY, &mut result.elements, &config.combine)
        .unwrap();

    assert_eq!(second.groups_removed, first.groups_created);
    assert_eq!(second.groups_created, first.groups_created);
    assert_eq!(second.source_elements, first.source_elements);
    assert_eq!(combiner.groups(), groups_after_first.as_slice());
    assert_eq!(first.source_elements as u64, result.stats.produced);
}

#[test]
fn test_combined_geometry_is_parent_independent() {
    let config = base_config();
    let noise = Perlin::new(11);
    let parent = Affine3A::from_rotation_translation(
        Quat::from_rotation_y(1.1),
        Vec3::new(-40.0, 12.0, 300.0),
    );

    let mut at_origin = MeshCombiner::new();
    let mut moved = MeshCombiner::new();
    run(&config, &noise, &mut cube_factory(), &mut at_origin, Affine3A::IDENTITY).unwrap();
    run(&config, &noise, &mut cube_factory(), &mut moved, parent).unwrap();

    assert_eq!(at_origin.groups().len(), moved.groups().len());
    for (a, b) in at_origin.groups().iter().zip(moved.groups()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.mesh.vertex_count(), b.mesh.vertex_count());
        for (va, vb) in a.mesh.vertices.iter().zip(&b.mesh.vertices) {
            let pa = Vec3::from_array(va.position);
            let pb = Vec3::from_array(vb.position);
            assert!((pa - pb).length() < 1e-3, "{pa} vs {pb}");
        }
    }
}

#[test]
fn test_groups_named_per_material() {
    let mut config = base_config();
    config.noise.threshold = 0.0;
    config.materials.rare_probability = 0.5;
    let mut combiner = MeshCombiner::new();
    let out = run(
        &config,
        &Perlin::new(2),
        &mut cube_factory(),
        &mut combiner,
        Affine3A::IDENTITY,
    )
    .unwrap();

    let report = out.combine.unwrap();
    assert_eq!(report.groups_created, 3);
    for material in [TOP, RARE, BOTTOM] {
        let group = combiner.group(material).unwrap();
        assert_eq!(group.name, combined_group_name(material));
        assert!(group.collision.is_some());
    }
    // Discarding is on by default.
    assert!(out.generation.elements.iter().all(|e| e.mesh.is_none()));
}

#[test]
fn test_scenario_single_cell() {
    let mut config = base_config();
    config.lattice.count = [1, 1, 1];
    config.noise.threshold = 0.0;
    config.hole.enabled = false;

    let result = generate_seeded(&config, &Perlin::new(0), &mut cube_factory()).unwrap();
    assert_eq!(result.decisions.len(), 1);
    assert_eq!(result.decisions[0].position, Vec3::ZERO);
    // A single row is the top row.
    assert_eq!(result.decisions[0].material, Some(TOP));
}

#[test]
fn test_scenario_height_bias_rows() {
    let mut config = base_config();
    config.lattice.count = [6, 3, 6];
    config.noise.threshold = 0.0;
    config.materials.rare_probability = 0.0;
    config.materials.height_bias = 2.0;

    let result = generate_seeded(&config, &Perlin::new(4), &mut cube_factory()).unwrap();
    let mut middle = Vec::new();
    for d in &result.decisions {
        match d.cell.j {
            0 => assert_eq!(d.material, Some(BOTTOM)),
            2 => assert_eq!(d.material, Some(TOP)),
            _ => middle.push(d.material),
        }
    }
    assert!(middle.iter().all(|m| *m == Some(TOP) || *m == Some(BOTTOM)));
    assert!(middle.contains(&Some(TOP)));
    assert!(middle.contains(&Some(BOTTOM)));
    assert_eq!(result.stats.slot_picks[MaterialPalette::RARE], 0);
}

#[test]
fn test_scenario_zero_strength_explosion() {
    let mut with_explosion = base_config();
    with_explosion.explosion.enabled = true;
    with_explosion.explosion.strength = 0.0;
    with_explosion.explosion.rotation_scale = 2.0;
    with_explosion.explosion.direction_jitter_degrees = 30.0;
    let without = base_config();
    let noise = Perlin::new(8);

    let a = generate_seeded(&with_explosion, &noise, &mut cube_factory()).unwrap();
    let b = generate_seeded(&without, &noise, &mut cube_factory()).unwrap();
    assert_eq!(a.decisions, b.decisions);
}

#[test]
fn test_scenario_zero_hole_radius() {
    let mut config = base_config();
    config.noise.threshold = 0.0;
    config.hole.enabled = true;
    config.hole.radius = 0.0;

    let result = generate_seeded(&config, &Perlin::new(6), &mut cube_factory()).unwrap();
    assert_eq!(result.stats.carved, 0);
    assert_eq!(result.stats.produced, 8 * 6 * 8);
}

#[test]
fn test_missing_template_leaves_no_output() {
    let config = base_config();
    let mut combiner = MeshCombiner::new();
    let err = run(
        &config,
        &ConstNoise(1.0),
        &mut MeshElementFactory::empty(),
        &mut combiner,
        Affine3A::IDENTITY,
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::MissingTemplate));
    assert!(combiner.groups().is_empty());
}

#[test]
fn test_empty_palette_produces_unmaterialized_elements() {
    let mut config = base_config();
    config.noise.threshold = 0.0;
    config.materials.palette = MaterialPalette::from_slots([None, None, None]);
    let mut combiner = MeshCombiner::new();

    let out = run(
        &config,
        &ConstNoise(0.0),
        &mut cube_factory(),
        &mut combiner,
        Affine3A::IDENTITY,
    )
    .unwrap();
    let stats = out.generation.stats;
    assert_eq!(stats.produced, 8 * 6 * 8);
    assert_eq!(stats.unmaterialized, stats.produced);
    assert_eq!(out.combine.unwrap().groups_created, 0);
    // Elements that were not merged keep their geometry.
    assert!(out.generation.elements.iter().all(|e| e.mesh.is_some()));
}

#[test]
fn test_injected_streams_match_seeded() {
    let config = base_config();
    let noise = Perlin::new(21);
    let mut streams = SeededStreams::new(
        ChaCha8Rng::seed_from_u64(config.seeds.noise_offset),
        ChaCha8Rng::seed_from_u64(config.seeds.material),
        ChaCha8Rng::seed_from_u64(config.seeds.jitter),
        ChaCha8Rng::seed_from_u64(config.seeds.explosion),
    );

    let injected = generate(&config, &noise, &mut cube_factory(), &mut streams).unwrap();
    let seeded = generate_seeded(&config, &noise, &mut cube_factory()).unwrap();
    assert_eq!(injected.digest(), seeded.digest());
}

#[test]
fn test_out_of_range_config_is_clamped() {
    let mut config = base_config();
    config.lattice.count = [0, 0, 0];
    config.noise.threshold = 7.0;
    config.noise.scale = [-1.0, f64::NAN, 0.0];
    config.jitter.max_degrees = 90.0;
    config.materials.rare_probability = -3.0;

    let result = generate_seeded(&config, &ConstNoise(1.0), &mut cube_factory()).unwrap();
    assert_eq!(result.stats.visited, 1);
    assert_eq!(result.stats.produced, 1);
    let angle = result.decisions[0].rotation.angle_between(Quat::IDENTITY);
    assert!(angle < 3.0_f32.to_radians());
}
