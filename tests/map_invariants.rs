//! Layout invariants of generated maps.

use delvegen::{
    check_collision, create_rng, DelveResult, Direction, GenerationConfig, Generator, Map,
    MapGenerator, Position,
};

fn assert_no_collisions(map: &Map) {
    for (i, a) in map.rooms.iter().enumerate() {
        for (j, b) in map.rooms.iter().enumerate() {
            if i != j {
                assert!(!check_collision(a, b), "rooms {i} and {j} overlap");
            }
        }
    }
}

#[test]
fn test_twenty_room_maps_hold_their_invariants() -> DelveResult<()> {
    let config = GenerationConfig::for_testing(0);
    for seed in 0..3 {
        let generator = MapGenerator::new(20);
        let map = generator.generate(&config, &mut create_rng(seed))?;
        generator.validate(&map, &config)?;

        assert!(map.room_count() >= 1 && map.room_count() <= 20);
        assert_no_collisions(&map);
        map.check_integrity()?;

        let seed_room = &map.rooms[0];
        assert_eq!(seed_room.position, Position::origin());
        assert_eq!(seed_room.entrance, None);
        assert_eq!(seed_room.exits, vec![Direction::North]);
        assert!(seed_room.size.width <= config.seed_room_max_size);
        assert!(seed_room.size.height <= config.seed_room_max_size);
    }
    Ok(())
}

#[test]
fn test_every_room_is_entered_from_its_predecessor() -> DelveResult<()> {
    let config = GenerationConfig::for_testing(6);
    let map = MapGenerator::new(12)
        .with_connectivity(0.8)
        .with_start_level(4)
        .with_level_step(3)
        .generate(&config, &mut create_rng(6))?;

    assert_eq!(map.level, 4);
    for pair in map.rooms.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let entrance = next.entrance.expect("grown rooms have an entrance");
        assert!(prev.exits.contains(&entrance.opposite()));
        assert!(next.doors.is_open(entrance));
        assert!(!next.exits.contains(&entrance));
        assert!(prev.rect().shares_edge_with(&next.rect()));
        assert_eq!(next.level, prev.level + 3);
    }
    Ok(())
}

#[test]
fn test_rooms_are_populated_after_layout() -> DelveResult<()> {
    let config = GenerationConfig::for_testing(21);
    let map = MapGenerator::new(6)
        .with_start_level(20)
        .generate(&config, &mut create_rng(21))?;
    for room in &map.rooms {
        assert!(room.placements_in_bounds());
    }
    let enemies: usize = map.rooms.iter().map(|room| room.enemies.len()).sum();
    assert!(enemies > 0);
    Ok(())
}

#[test]
fn test_same_seed_same_map() -> DelveResult<()> {
    let config = GenerationConfig::for_testing(13);
    let generator = MapGenerator::new(7);
    let a = generator.generate(&config, &mut create_rng(13))?;
    let b = generator.generate(&config, &mut create_rng(13))?;
    assert_eq!(a, b);
    assert_eq!(a.to_ascii(), b.to_ascii());
    Ok(())
}

#[test]
fn test_ascii_preview_covers_bounds() -> DelveResult<()> {
    let config = GenerationConfig::for_testing(2);
    let map = MapGenerator::new(5).generate(&config, &mut create_rng(2))?;
    let bounds = map.bounds().expect("map has rooms");
    let preview = map.to_ascii();

    let lines: Vec<&str> = preview.lines().collect();
    assert_eq!(lines.len(), bounds.size.height as usize);
    assert!(lines.iter().all(|line| line.len() <= bounds.size.width as usize));

    let cells = preview.chars().filter(|c| !c.is_whitespace()).count() as i32;
    let area: i32 = map.rooms.iter().map(|room| room.area()).sum();
    assert_eq!(cells, area);
    Ok(())
}
