use chrono::{NaiveDate, TimeZone, Utc};
use habit_core::{habit_stats, Habit, HabitId, ValidationError};

#[test]
fn serialization_uses_expected_wire_fields() {
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    let mut habit = Habit::with_id(HabitId::parse("1717234200000").unwrap(), "Read", created_at)
        .unwrap();
    habit.complete_on(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    habit.complete_on(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());

    let json = serde_json::to_value(&habit).unwrap();
    assert_eq!(json["id"], "1717234200000");
    assert_eq!(json["name"], "Read");
    assert_eq!(json["createdAt"], "2024-06-01T09:30:00Z");
    assert_eq!(json["completions"], serde_json::json!(["2024-06-02", "2024-06-03"]));
    assert!(json.get("created_at").is_none());

    let decoded: Habit = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, habit);
}

#[test]
fn browser_blob_with_duplicate_dates_loads_deduplicated() {
    let value = serde_json::json!({
        "id": "1718000000000",
        "name": "Meditate",
        "createdAt": "2024-06-10T06:13:20.000Z",
        "completions": ["2024-06-10", "2024-06-09", "2024-06-10"]
    });

    let habit: Habit = serde_json::from_value(value).unwrap();
    assert_eq!(habit.id.as_str(), "1718000000000");
    assert_eq!(habit.total_completions(), 2);

    let stats = habit_stats(&habit, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    assert_eq!(stats.streak, 2);
    assert_eq!(stats.total_completions, 2);
    assert!(stats.completed_today);
}

#[test]
fn deserialize_rejects_blank_name() {
    let value = serde_json::json!({
        "id": "7",
        "name": "   ",
        "createdAt": "2024-06-10T06:13:20Z",
        "completions": []
    });

    let err = serde_json::from_value::<Habit>(value).unwrap_err();
    assert!(
        err.to_string().contains("habit name cannot be empty"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_malformed_dates() {
    let value = serde_json::json!({
        "id": "7",
        "name": "Run",
        "createdAt": "2024-06-10T06:13:20Z",
        "completions": ["10/06/2024"]
    });

    assert!(serde_json::from_value::<Habit>(value).is_err());
}

#[test]
fn with_id_rejects_blank_name() {
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    let err = Habit::with_id(HabitId::generate(), " ", created_at).unwrap_err();
    assert_eq!(err, ValidationError::EmptyName);
}

#[test]
fn stats_serialize_in_camel_case() {
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    let habit = Habit::new("Read", created_at).unwrap();
    let stats = habit_stats(&habit, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"streak": 0, "totalCompletions": 0, "completedToday": false})
    );
}
