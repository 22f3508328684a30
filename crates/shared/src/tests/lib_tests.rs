use crate::{
    domain::{format_creation_date, Color, Country, Location, Person, PersonId},
    error::ServiceErrorBody,
    protocol::{PageBody, PageMeta},
};

fn sample_person_json() -> serde_json::Value {
    serde_json::json!({
        "id": 12,
        "name": "Alice",
        "coordinates": { "x": 3.0, "y": 600.0 },
        "creationDate": "2024-03-05T10:15:00Z",
        "height": null,
        "weight": 55.5,
        "hairColor": "BROWN",
        "eyeColor": "GREEN",
        "nationality": "SOUTH_KOREA",
        "location": null
    })
}

#[test]
fn person_deserializes_camel_case_wire_format() {
    let person: Person = serde_json::from_value(sample_person_json()).expect("person");
    assert_eq!(person.id, PersonId(12));
    assert_eq!(person.hair_color, Color::Brown);
    assert_eq!(person.nationality, Country::SouthKorea);
    assert_eq!(person.height, None);
    assert_eq!(person.creation_date_label(), "05.03.2024");
    assert_eq!(person.location_label(), "N/A");
    assert_eq!(person.height_label(), "N/A");
}

#[test]
fn enum_parsing_accepts_loose_spelling() {
    assert_eq!("south-korea".parse::<Country>(), Ok(Country::SouthKorea));
    assert_eq!(" green ".parse::<Color>(), Ok(Color::Green));
    let err = "PURPLE".parse::<Color>().expect_err("unknown color");
    assert_eq!(err.to_string(), "unknown color 'PURPLE'");
}

#[test]
fn country_order_follows_backend_declaration() {
    assert!(Country::France < Country::Spain);
    assert!(Country::Thailand < Country::SouthKorea);
}

#[test]
fn creation_date_accepts_naive_and_date_only_values() {
    assert_eq!(
        format_creation_date("2023-12-31T23:59:59.123").as_deref(),
        Some("31.12.2023")
    );
    assert_eq!(format_creation_date("2023-01-02").as_deref(), Some("02.01.2023"));
    assert_eq!(format_creation_date("yesterday"), None);
}

#[test]
fn location_label_requires_name() {
    let mut location = Location {
        x: 1.0,
        y: 2.5,
        z: -3.0,
        name: Some("Depot".into()),
    };
    assert_eq!(location.label().as_deref(), Some("Depot (1, 2.5, -3)"));
    location.name = None;
    assert_eq!(location.label(), None);
}

#[test]
fn first_field_error_keeps_server_order() {
    let body: ServiceErrorBody = serde_json::from_str(
        r#"{"message":"invalid","errors":{"weight":"must be positive","name":"blank"}}"#,
    )
    .expect("body");
    assert_eq!(
        body.first_field_error().as_deref(),
        Some("weight: must be positive")
    );
    assert!(!body.is_invalid_enum());
}

#[test]
fn page_body_defaults_missing_fields() {
    let body: PageBody<Person> = serde_json::from_str(r#"{"content":[]}"#).expect("page");
    assert!(body.content.is_empty());
    assert_eq!(body.number, None);
    assert_eq!(body.total_pages, None);
}

#[test]
fn page_meta_boundaries() {
    let meta = PageMeta {
        current_page: 0,
        total_pages: 3,
        total_count: Some(25),
    };
    assert!(meta.is_first());
    assert!(!meta.is_last());

    let last = PageMeta {
        current_page: 2,
        ..meta
    };
    assert!(last.is_last());
    assert!(PageMeta::default().is_last());
}

#[test]
fn page_meta_at_index_limit_is_last() {
    let meta = PageMeta {
        current_page: u32::MAX,
        total_pages: 3,
        total_count: None,
    };
    assert!(meta.is_last());
}
