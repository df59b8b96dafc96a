mod common;

use rusqlite::Connection;
use umptrack_core::models::{FieldValue, Game, GameField, LeagueTable};
use umptrack_core::TrackerError;

use common::{date, references, setup_db};

fn game_count(path: &std::path::Path) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_initialize_is_idempotent() {
    let (_dir, db) = setup_db();
    db.initialize().unwrap();
    db.initialize().unwrap();
    assert!(db.list_games().unwrap().is_empty());
}

#[test]
fn test_add_game_round_trip() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive(
        "Centennial HS",
        "tssaa_hs",
        Some(date(2026, 4, 2)),
        &refs.leagues,
        14.3,
    )
    .with_volunteer(true);

    let id = db.add_game(&refs, &game).unwrap();
    let stored = db.get_game(id).unwrap().expect("game should exist");

    assert_eq!(stored.id, Some(id));
    assert_eq!(Game { id: None, ..stored }, game);
    assert_eq!(game.league, "TSSAA_HS");
    assert_eq!(game.assignor, "CCUA");
    assert_eq!(game.game_fee, 90);
}

#[test]
fn test_add_game_unknown_site_is_rejected() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Unknown Field", "mtaba", Some(date(2026, 5, 1)), &refs.leagues, 0.0);

    let err = db.add_game(&refs, &game).unwrap_err();
    assert!(matches!(err, TrackerError::UnknownSite(ref s) if s == "Unknown Field"));
    assert!(err.is_validation());
    assert_eq!(game_count(db.path()), 0);
}

#[test]
fn test_add_game_unknown_league_is_rejected() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "beer_league", Some(date(2026, 5, 1)), &refs.leagues, 0.0);

    let err = db.add_game(&refs, &game).unwrap_err();
    assert!(matches!(err, TrackerError::UnknownLeague(_)));
    assert_eq!(err.to_string(), "BEER_LEAGUE not recognized");
    assert_eq!(game_count(db.path()), 0);
}

#[test]
fn test_add_game_creates_reference_rows() {
    let (_dir, db) = setup_db();
    let refs = references();
    for league in ["mtaba", "mtaba", "ll_minors"] {
        let game = Game::derive("Sevier Park", league, Some(date(2026, 5, 1)), &refs.leagues, 3.0);
        db.add_game(&refs, &game).unwrap();
    }

    assert_eq!(db.list_leagues().unwrap(), vec!["LL_MINORS", "MTABA"]);
    assert_eq!(db.list_assignors().unwrap(), vec!["4 STAR"]);
    let sites = db.list_sites().unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "Sevier Park");
}

#[test]
fn test_update_fields() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "ll_majors", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let id = db.add_game(&refs, &game).unwrap();

    let updates = [
        (GameField::Mileage, "11.5"),
        (GameField::GameFee, "60"),
        (GameField::FeePaid, "y"),
        (GameField::Volunteer, "true"),
        (GameField::Date, "2026-06-03"),
        (GameField::Site, "Centennial HS"),
        (GameField::League, "ovl"),
        (GameField::Assignor, "TruBlu"),
    ];
    for (field, raw) in updates {
        let value = field.parse(raw).unwrap();
        db.update_field(&refs, id, &value).unwrap();
    }

    let stored = db.get_game(id).unwrap().unwrap();
    assert_eq!(stored.mileage, 11.5);
    assert_eq!(stored.game_fee, 60);
    assert!(stored.fee_paid);
    assert!(stored.is_volunteer);
    assert_eq!(stored.date, date(2026, 6, 3));
    assert_eq!(stored.site, "Centennial HS");
    assert_eq!(stored.league, "OVL");
    assert_eq!(stored.assignor, "TruBlu");
}

#[test]
fn test_league_update_does_not_rederive() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "ll_minors", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let id = db.add_game(&refs, &game).unwrap();

    db.update_field(&refs, id, &FieldValue::League("ovl".to_string()))
        .unwrap();
    let stored = db.get_game(id).unwrap().unwrap();
    assert_eq!(stored.league, "OVL");
    assert_eq!(stored.game_fee, 45);
    assert_eq!(stored.assignor, "4 Star");

    let recomputed = db.recompute_derived(&refs.leagues, id).unwrap();
    assert_eq!(recomputed.game_fee, 150);
    assert_eq!(recomputed.assignor, "TruBlu");
    assert_eq!(db.get_game(id).unwrap().unwrap(), recomputed);
}

#[test]
fn test_recompute_uses_injected_table() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let id = db.add_game(&refs, &game).unwrap();

    let recomputed = db.recompute_derived(&LeagueTable::default(), id).unwrap();
    assert_eq!(recomputed.game_fee, 0);
    assert_eq!(recomputed.assignor, "TBD");
}

#[test]
fn test_update_rejects_unknown_values() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let id = db.add_game(&refs, &game).unwrap();

    let err = db
        .update_field(&refs, id, &FieldValue::Site("Unknown Field".to_string()))
        .unwrap_err();
    assert!(matches!(err, TrackerError::UnknownSite(_)));

    let err = db
        .update_field(&refs, 999, &FieldValue::Mileage(2.0))
        .unwrap_err();
    assert!(matches!(err, TrackerError::GameNotFound(999)));

    assert_eq!(db.get_game(id).unwrap().unwrap().site, "Sevier Park");
}

#[test]
fn test_delete_game_reports_removal() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let id = db.add_game(&refs, &game).unwrap();

    assert!(db.delete_game(id).unwrap());
    assert!(!db.delete_game(id).unwrap());
    assert!(db.get_game(id).unwrap().is_none());
}

#[test]
fn test_fetch_unpaid_ids() {
    let (_dir, db) = setup_db();
    let refs = references();
    let mut ids = Vec::new();
    for paid in [false, true, false] {
        let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0)
            .with_fee_paid(paid);
        ids.push(db.add_game(&refs, &game).unwrap());
    }
    assert_eq!(db.fetch_unpaid_ids().unwrap(), vec![ids[0], ids[2]]);
}

#[test]
fn test_mark_unpaid_paid_updates_all() {
    let (_dir, db) = setup_db();
    let refs = references();
    let mut ids = Vec::new();
    for _ in 0..3 {
        let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
        ids.push(db.add_game(&refs, &game).unwrap());
    }

    assert_eq!(db.mark_unpaid_paid(&ids[..2]).unwrap(), 2);
    assert_eq!(db.fetch_unpaid_ids().unwrap(), vec![ids[2]]);
}

#[test]
fn test_mark_unpaid_paid_is_all_or_nothing() {
    let (_dir, db) = setup_db();
    let refs = references();
    let unpaid = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let paid = unpaid.clone().with_fee_paid(true);
    let a = db.add_game(&refs, &unpaid).unwrap();
    let b = db.add_game(&refs, &paid).unwrap();
    let c = db.add_game(&refs, &unpaid).unwrap();

    let err = db.mark_unpaid_paid(&[a, b, c]).unwrap_err();
    assert!(matches!(err, TrackerError::NotUnpaid(ref bad) if bad == &vec![b]));
    assert_eq!(db.fetch_unpaid_ids().unwrap(), vec![a, c]);

    let err = db.mark_unpaid_paid(&[a, 4242]).unwrap_err();
    assert!(matches!(err, TrackerError::NotUnpaid(ref bad) if bad == &vec![4242]));
    assert_eq!(db.fetch_unpaid_ids().unwrap(), vec![a, c]);

    assert!(matches!(db.mark_unpaid_paid(&[]), Err(TrackerError::NoGameIds)));
}

#[test]
fn test_validate_unpaid_writes_nothing() {
    let (_dir, db) = setup_db();
    let refs = references();
    let unpaid = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    let a = db.add_game(&refs, &unpaid).unwrap();
    let b = db.add_game(&refs, &unpaid.clone().with_fee_paid(true)).unwrap();

    db.validate_unpaid(&[a]).unwrap();
    assert!(matches!(
        db.validate_unpaid(&[a, b]),
        Err(TrackerError::NotUnpaid(ref bad)) if bad == &vec![b]
    ));
    assert!(matches!(db.validate_unpaid(&[]), Err(TrackerError::NoGameIds)));
    assert_eq!(db.fetch_unpaid_ids().unwrap(), vec![a]);
}

#[test]
fn test_bulk_mark_paid_can_unmark() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0)
        .with_fee_paid(true);
    let id = db.add_game(&refs, &game).unwrap();

    assert_eq!(db.bulk_mark_paid(&[id], false).unwrap(), 1);
    assert_eq!(db.fetch_unpaid_ids().unwrap(), vec![id]);
    assert_eq!(db.bulk_mark_paid(&[], true).unwrap(), 0);
}

#[test]
fn test_rebuild_clears_everything() {
    let (_dir, db) = setup_db();
    let refs = references();
    let game = Game::derive("Sevier Park", "mtaba", Some(date(2026, 6, 1)), &refs.leagues, 4.0);
    db.add_game(&refs, &game).unwrap();
    db.save_site_mileage("Centennial HS", 9.9).unwrap();

    db.rebuild().unwrap();
    assert!(db.list_games().unwrap().is_empty());
    assert!(db.list_sites().unwrap().is_empty());
    assert!(db.list_leagues().unwrap().is_empty());
}

#[test]
fn test_drop_then_create_tables() {
    let (_dir, db) = setup_db();
    db.drop_tables().unwrap();
    assert!(matches!(db.list_games(), Err(TrackerError::Storage(_))));

    db.create_games_table().unwrap();
    db.create_reference_tables().unwrap();
    assert!(db.list_games().unwrap().is_empty());
    assert!(db.list_sites().unwrap().is_empty());
}

#[test]
fn test_site_mileage_cache() {
    let (_dir, db) = setup_db();
    assert_eq!(db.site_mileage("Sevier Park").unwrap(), None);

    db.save_site_mileage("Sevier Park", 0.0).unwrap();
    db.save_site_mileage("Centennial HS", 18.2).unwrap();
    assert_eq!(db.site_mileage("Sevier Park").unwrap(), Some(0.0));
    assert_eq!(db.sites_with_zero_mileage().unwrap(), vec!["Sevier Park"]);

    db.save_site_mileage("Sevier Park", 3.4).unwrap();
    assert_eq!(db.site_mileage("Sevier Park").unwrap(), Some(3.4));
    assert!(db.sites_with_zero_mileage().unwrap().is_empty());
}
