// Particle system integration tests
//
// Settings file -> emitter -> per-pass uniform blocks, as a renderer would
// drive it every frame.

use std::io::Write;

use glam::{Mat4, Vec3};

use particle_engine::{EmitterSettings, ParticleSystem, StylePalette, UniformLayout};

fn read_vec4(bytes: &[u8], offset: usize) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (i, value) in out.iter_mut().enumerate() {
        let start = offset + i * 4;
        *value = f32::from_ne_bytes(bytes[start..start + 4].try_into().unwrap());
    }
    out
}

#[test]
fn test_settings_file_to_uniforms() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max_particles = 32
styles_count = 3
particles_per_second = 20.0
life_length_seconds = 1.0
origin = [0.0, 0.0, 10.0]
emit_cube_half_size = 0.25
velocity = [0.0, 2.0, 0.0]
max_time_delta = 0.25
"#
    )
    .unwrap();

    let settings = EmitterSettings::load(file.path()).unwrap();
    let mut system = ParticleSystem::from_settings(settings, StylePalette::column()).unwrap();

    let layout = system.layout();
    assert_eq!(
        layout,
        UniformLayout {
            max_particles: 32,
            styles_count: 3
        }
    );
    assert_eq!(system.final_render_uniform().len(), layout.size_in_bytes());

    let camera = Mat4::look_at_rh(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 10.0), Vec3::Y);
    let light = Mat4::look_at_rh(Vec3::new(10.0, 20.0, 10.0), Vec3::new(0.0, 0.0, 10.0), Vec3::Y);

    for _ in 0..120 {
        let update = system.update(1.0 / 60.0, &camera, &light).unwrap();
        assert!(update.instance_count <= 32);
    }

    let alive = system.emitter().alive_particles_count();
    assert!(alive > 0);

    for uniform in [system.final_render_uniform(), system.shadow_map_uniform()] {
        // Live positions sit in the spawn column, padding lanes stay zero
        for slot in 0..alive {
            let [x, y, z, pad] = read_vec4(uniform, layout.positions_offset() + slot * 16);
            assert!(x.abs() <= 0.25 + 1e-4);
            assert!((z - 10.0).abs() <= 0.25 + 1e-4);
            assert!(y >= -0.25 - 1e-4);
            assert_eq!(pad, 0.0);

            let [age, style, pad0, pad1] =
                read_vec4(uniform, layout.time_and_style_offset() + slot * 16);
            assert!((0.0..=1.0).contains(&age));
            assert!(style < 3.0);
            assert_eq!((pad0, pad1), (0.0, 0.0));
        }

        // Green style entry of the column palette
        assert_eq!(read_vec4(uniform, layout.styles_offset() + 16), [0.0, 1.0, 0.0, 0.8]);
        assert_eq!(read_vec4(uniform, layout.life_length_offset())[0], 1.0);
    }
}

#[test]
fn test_invalid_time_delta_surfaces_from_system() {
    let mut system =
        ParticleSystem::from_settings(EmitterSettings::fountain(), StylePalette::fountain()).unwrap();

    let result = system.update(-1.0, &Mat4::IDENTITY, &Mat4::IDENTITY);
    assert!(result.is_err());
    assert_eq!(system.emitter().alive_particles_count(), 0);
}
