//! Round trips through JSON and save snapshots on disk.

use delvegen::{
    create_rng, CombatClass, DelveError, DelveResult, GenerationConfig, Generator, Item,
    MapGenerator, PlayerGenerator, Room, RoomGenerator, SaveData, WeaponGenerator, WeaponType,
};
use serde_json::Value;
use tempfile::TempDir;

fn sample_room(seed: u64) -> DelveResult<Room> {
    let config = GenerationConfig::for_testing(seed);
    RoomGenerator::new()
        .with_level(25.0)
        .with_loot_budget(2500.0)
        .with_enemy_budget(2000.0)
        .generate(&config, &mut create_rng(seed))
}

#[test]
fn test_room_round_trip_is_exact() -> DelveResult<()> {
    let room = sample_room(4)?;
    let json = serde_json::to_string(&room)?;
    let back: Room = serde_json::from_str(&json)?;

    assert_eq!(back, room);
    assert_eq!(back.level, room.level);
    assert_eq!(back.doors, room.doors);
    for (a, b) in back.items.iter().zip(&room.items) {
        assert_eq!(a.position, b.position);
    }
    Ok(())
}

#[test]
fn test_json_shape_is_self_describing() -> DelveResult<()> {
    let room = sample_room(9)?;
    let value: Value = serde_json::to_value(&room)?;

    assert!(value["position"]["x"].is_i64());
    assert!(value["position"]["y"].is_i64());
    assert!(value["doors"]["north"].is_boolean());
    for item in value["items"].as_array().into_iter().flatten() {
        let tag = item["entity"]["item_type"].as_str();
        assert!(matches!(tag, Some("weapon" | "armour" | "chest")), "{item}");
    }
    for enemy in value["enemies"].as_array().into_iter().flatten() {
        assert_eq!(enemy["entity"]["kind"]["kind"], "enemy");
    }

    let weapon = WeaponGenerator::new()
        .with_rarity(3.0)
        .with_type(WeaponType::Spear)
        .generate(&GenerationConfig::default(), &mut create_rng(1))?;
    let value = serde_json::to_value(Item::from(weapon))?;
    assert_eq!(value["item_type"], "weapon");
    assert_eq!(value["weapon_type"], "spear");
    assert!(value["stats"]["damage"]["true"].is_u64());
    Ok(())
}

#[test]
fn test_save_snapshot_round_trip() -> DelveResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("save.json");
    let config = GenerationConfig::for_testing(31);
    let mut rng = create_rng(31);

    let mut save = SaveData::load(&path)?;
    assert_eq!(save, SaveData::new());

    save.add_player(PlayerGenerator::new("Ayla", CombatClass::Samurai).generate(&config, &mut rng)?)?;
    let mut fallen = PlayerGenerator::new("Bren", CombatClass::Thug).generate(&config, &mut rng)?;
    fallen.take_damage(1_000);
    save.add_player(fallen)?;
    assert_eq!(save.bury_dead_players(), 1);

    save.rooms = MapGenerator::new(4).generate(&config, &mut rng)?.rooms;
    save.game_state
        .insert("turn".to_string(), serde_json::json!(12));
    save.save(&path)?;

    let loaded = SaveData::load(&path)?;
    assert_eq!(loaded, save);
    assert_eq!(loaded.dead_players[0].name, "Bren");
    assert!(loaded.find_player("Ayla").is_some());
    Ok(())
}

#[test]
fn test_tampered_snapshot_is_rejected() -> DelveResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("save.json");

    let mut save = SaveData::new();
    save.rooms.push(sample_room(2)?);
    let mut value = serde_json::to_value(&save)?;
    value["rooms"][0]["size"]["width"] = serde_json::json!(0);
    std::fs::write(&path, value.to_string())?;

    assert!(matches!(
        SaveData::load(&path),
        Err(DelveError::InvalidState(_))
    ));
    Ok(())
}
