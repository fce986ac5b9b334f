use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use itinorm::parsers;
use itinorm::{
    AccessGate, Category, ContentSource, ExpansionState, StaticSource, Tab, View, filter_by_view,
    normalize, render, sort_chronological,
};

const EXPORT: &str = r#"{
  "results": [
    {"id": "meta", "properties": {
      "type": {"select": {"name": "country"}},
      "title": {"title": [{"plain_text": "Korea"}]},
      "date": {"date": {"start": "2026-03-01", "end": "2026-03-03"}}}},
    {"id": "fx", "properties": {
      "type": {"select": {"name": "exchange"}},
      "title": {"title": [{"plain_text": "KRW"}]}}},
    {"id": "tz", "properties": {
      "type": {"select": {"name": "gmt"}},
      "title": {"title": [{"plain_text": "GMT+9"}]}}},
    {"id": "pw", "properties": {
      "type": {"select": {"name": "password"}},
      "title": {"title": [{"plain_text": "kimchi"}]}}},
    {"id": "market", "properties": {
      "type": {"select": {"name": "journey"}},
      "title": {"title": [{"plain_text": "Gwangjang Market"}]},
      "category": {"select": {"name": "restaurant"}},
      "date": {"date": {"start": "2026-03-02T12:00:00.000+09:00"}}}},
    {"id": "arrival", "properties": {
      "type": {"select": {"name": "journey"}},
      "title": {"title": [{"plain_text": "Arrive ICN"}]},
      "category": {"select": {"name": "transport"}},
      "date": {"date": {"start": "2026-03-01T23:30:00.000+09:00"}}}},
    {"id": "palace", "properties": {
      "type": {"select": {"name": "journey"}},
      "title": {"title": [{"plain_text": "Gyeongbokgung"}]},
      "category": {"select": {"name": "visit"}},
      "date": {"date": {"start": "2026-03-02T09:00:00.000+09:00"}}}},
    {"id": "stay", "properties": {
      "type": {"select": {"name": "journey"}},
      "title": {"title": [{"plain_text": "Hanok stay"}]},
      "category": {"select": {"name": "hotel"}},
      "date": {"date": {"start": "2026-03-02"}}}},
    {"id": "myeongdong", "properties": {
      "type": {"select": {"name": "journey"}},
      "title": {"title": [{"plain_text": "Myeongdong"}]},
      "category": {"select": {"name": "shopping"}},
      "date": {"date": {"start": "2026-03-03T15:00:00.000+09:00"}}}}
  ]
}"#;

fn local(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn source() -> StaticSource {
    StaticSource::new(parsers::parse("notion", EXPORT).unwrap())
}

#[test]
fn export_normalizes_into_days() {
    let trip = source().fetch().unwrap();
    assert_eq!(trip.metadata.currency, "KRW");
    assert_eq!(trip.metadata.timezone, "GMT+9");

    let buckets = normalize(trip.itinerary);
    let keys: Vec<&str> = buckets.iter().map(|b| b.date_key.as_str()).collect();
    assert_eq!(keys, vec!["2026-03-01", "2026-03-02", "2026-03-03"]);

    let day2: Vec<&str> = buckets[1].items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(day2, vec!["stay", "palace", "market"]);
}

#[test]
fn home_tab_midday() {
    let trip = source().fetch().unwrap();
    let mut expansion = ExpansionState::new();
    let dash = render(&trip, Tab::Home.view(), local(2, 10, 30), &mut expansion, false);

    assert_eq!(dash.header.title, "Korea");
    assert_eq!(dash.header.subtitle, "3/1 - 3/3");
    assert_eq!(dash.classification.today_key.as_deref(), Some("2026-03-02"));

    let today = &dash.days[1];
    assert!(today.is_today && today.expanded);
    let past: Vec<(&str, bool)> = today
        .items
        .iter()
        .map(|i| (i.id.as_str(), i.is_past))
        .collect();
    assert_eq!(
        past,
        vec![("stay", true), ("palace", true), ("market", false)]
    );
    assert!(!dash.days[0].expanded);
    assert!(dash.days[0].items[0].is_past);
    assert!(!dash.days[2].items[0].is_past);
}

#[test]
fn visit_tab_groups_visit_shopping_restaurant() {
    let trip = source().fetch().unwrap();
    let sorted = sort_chronological(trip.itinerary.clone());
    let picked: Vec<Category> = filter_by_view(&sorted, View::VisitGroup)
        .iter()
        .map(|r| r.category)
        .collect();
    assert_eq!(
        picked,
        vec![Category::Visit, Category::Restaurant, Category::Shopping]
    );

    let mut expansion = ExpansionState::new();
    let dash = render(&trip, Tab::Visit.view(), local(9, 0, 0), &mut expansion, false);
    let keys: Vec<&str> = dash.days.iter().map(|d| d.date_key.as_str()).collect();
    assert_eq!(keys, vec!["2026-03-02", "2026-03-03"]);
    assert!(dash.days.iter().all(|d| d.expanded));
}

#[test]
fn source_password_gates_access() {
    let trip = source().fetch().unwrap();
    let gate = AccessGate::new(trip.password.clone());
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();

    assert!(gate.login("bibimbap", now).is_err());
    let session = gate.login("kimchi", now).unwrap();
    assert!(gate.validate(&session.value, now));
}
