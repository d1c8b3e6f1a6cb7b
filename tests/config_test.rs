use tiled_isle::{
    SceneConfig,
    config::{ISLAND_TEXTURE_URL, MOVEMENT_SPEED, SKY_COLOUR},
    data_structures::mesh::{PLANE_INDICES, plane_vertices},
};

#[test]
fn defaults_describe_the_tiled_island() {
    let config = SceneConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.sky_colour, SKY_COLOUR);
    assert_eq!(config.movement_speed, MOVEMENT_SPEED);
    assert_eq!(config.camera.position, [0.0, 5.0, 7.0]);
    assert_eq!(config.camera.fovy, 70.0);
    assert_eq!(config.terrain.grid_size, 4);
    assert_eq!(config.terrain.tile_size, 50.0);
    assert_eq!(config.terrain.extent(), 200.0);
    assert!(config.controls.enable_damping);
    assert_eq!(config.controls.damping_factor, 0.05);
}

#[test]
fn single_plane_uses_the_island_texture() {
    let config = SceneConfig::single_plane();
    assert!(config.validate().is_ok());
    assert_eq!(config.terrain.land_texture, ISLAND_TEXTURE_URL);
    assert_eq!(config.terrain.grass_texture, ISLAND_TEXTURE_URL);
    assert_eq!(config.terrain.extent(), 200.0);
}

#[test]
fn invalid_configs_are_rejected() {
    let invalid = [
        SceneConfig::default().with_grid(0, 50.0),
        SceneConfig::default().with_grid(4, 0.0),
        SceneConfig::default().with_grid(4, f32::NAN),
        SceneConfig::default().with_movement_speed(-1.0),
        {
            let mut c = SceneConfig::default();
            c.camera.znear = 200.0;
            c
        },
        {
            let mut c = SceneConfig::default();
            c.camera.fovy = 180.0;
            c
        },
        {
            let mut c = SceneConfig::default();
            c.controls.damping_factor = 0.0;
            c
        },
        {
            let mut c = SceneConfig::default();
            c.controls.min_polar_angle = 2.0;
            c
        },
        {
            let mut c = SceneConfig::default();
            c.terrain.texture_repeat = -1.0;
            c
        },
    ];
    for config in invalid {
        assert!(config.validate().is_err(), "{:?} should be rejected", config);
    }
}

#[test]
fn zero_speed_is_allowed() {
    assert!(SceneConfig::default().with_movement_speed(0.0).validate().is_ok());
}

#[test]
fn sky_clear_colour_is_linear() {
    let colour = SceneConfig::default().clear_colour();
    assert!(colour.r < colour.g && colour.g < colour.b);
    assert!((colour.b - 1.0).abs() < 1e-9);
    assert!((colour.r - 0.4233).abs() < 1e-3, "{}", colour.r);
    assert_eq!(colour.a, 1.0);

    let black = SceneConfig::default().with_sky_colour(0x000000).clear_colour();
    assert_eq!((black.r, black.g, black.b), (0.0, 0.0, 0.0));
}

#[test]
fn plane_is_front_facing_towards_z() {
    let vertices = plane_vertices(50.0, 20.0);
    for triangle in PLANE_INDICES.chunks(3) {
        let [a, b, c] = [0, 1, 2].map(|i| vertices[triangle[i] as usize].position);
        let cross_z = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(cross_z > 0.0);
    }
    for v in vertices {
        assert_eq!(v.position[0].abs(), 25.0);
        assert_eq!(v.position[1].abs(), 25.0);
        assert!(v.tex_coords.iter().all(|&t| t == 0.0 || t == 20.0));
        assert_eq!(v.normal, [0.0, 0.0, 1.0]);
    }
}
