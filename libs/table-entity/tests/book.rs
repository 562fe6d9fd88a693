use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use table_entity::store::{get_entity, put_entity};
use table_entity::{
    ClockZone, ConverterConfig, Entity, EntityConverter, ErrorKind, MemoryTable, Record, TableStore,
    decode, encode,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Entity)]
struct Book {
    #[entity(required)]
    partition_key: Option<String>,
    #[entity(required)]
    row_key: Option<String>,
    #[entity(required)]
    title: Option<String>,
    #[entity(required)]
    author: Option<String>,
    published_date: DateTime<Utc>,
    is_best_seller: bool,
    chapters: Option<Vec<Chapter>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Chapter {
    title: String,
    number_of_pages: i32,
}

#[derive(Debug, Default, Entity)]
struct Pamphlet {
    row_key: String,
    #[entity(required)]
    title: Option<String>,
}

fn grant() -> Book {
    Book {
        partition_key: None,
        row_key: None,
        title: Some("Grant".into()),
        author: Some("Ron Chernow".into()),
        published_date: Utc.with_ymd_and_hms(2017, 10, 10, 0, 0, 0).unwrap(),
        is_best_seller: false,
        chapters: Some(vec![
            Chapter { title: "Chapter 1".into(), number_of_pages: 10 },
            Chapter { title: "Chapter 2".into(), number_of_pages: 14 },
        ]),
    }
}

#[test]
fn full_book_converts() {
    let before = Local::now();
    let record = encode(&grant()).unwrap();
    let after = Local::now();

    assert_eq!(
        record.column_names().collect::<Vec<_>>(),
        vec!["author", "chapters", "isbestseller", "publisheddate", "title"]
    );
    assert_eq!(record.get_string("title"), Some("Grant"));
    assert_eq!(record.get_string("author"), Some("Ron Chernow"));
    assert_eq!(record.get_bool("isbestseller"), Some(false));
    assert_eq!(
        record.get_datetime("publisheddate"),
        Some(Utc.with_ymd_and_hms(2017, 10, 10, 0, 0, 0).unwrap())
    );

    let chapters: serde_json::Value =
        serde_json::from_str(record.get_string("chapters").unwrap()).unwrap();
    assert_eq!(
        chapters,
        serde_json::json!([
            {"title": "Chapter 1", "number_of_pages": 10},
            {"title": "Chapter 2", "number_of_pages": 14},
        ])
    );

    let expected: Vec<String> = [before, after]
        .iter()
        .map(|now| format!("{}-{}", now.year(), now.month()))
        .collect();
    assert!(expected.contains(&record.partition_key().to_string()));
    assert!(Uuid::parse_str(record.row_key()).is_ok());
}

#[test]
fn full_book_round_trips() {
    let record = encode(&grant()).unwrap();
    let back: Book = decode(&record).unwrap();

    let mut expected = grant();
    expected.partition_key = Some(record.partition_key().to_string());
    expected.row_key = Some(record.row_key().to_string());
    assert_eq!(back, expected);

    // Keys now set: encoding again keeps them.
    let again = encode(&back).unwrap();
    assert_eq!(again, record);
}

#[test]
fn successive_encodes_get_distinct_row_keys() {
    let a = encode(&grant()).unwrap();
    let b = encode(&grant()).unwrap();
    assert_ne!(a.row_key(), b.row_key());
}

#[test]
fn utc_clock_from_config() {
    let config = ConverterConfig::parse("clock = \"utc\"").unwrap();
    assert_eq!(config.clock, ClockZone::Utc);
    let converter = EntityConverter::new(config);

    let before = Utc::now();
    let record = converter.encode(&grant()).unwrap();
    let after = Utc::now();
    let candidates = [before, after].map(|now| format!("{}-{}", now.year(), now.month()));
    assert!(candidates.iter().any(|k| k == record.partition_key()));
}

#[test]
fn book_without_chapters_is_sparse() {
    let mut book = grant();
    book.chapters = None;
    let record = encode(&book).unwrap();
    assert!(!record.contains_key("chapters"));

    let back: Book = decode(&record).unwrap();
    assert_eq!(back.chapters, None);
}

#[test]
fn missing_author_is_rejected_both_ways() {
    let mut book = grant();
    book.author = None;
    let err = encode(&book).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("author"));

    let mut record = encode(&grant()).unwrap();
    record.remove("author");
    let err = decode::<Book>(&record).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("Book"));
}

#[test]
fn corrupted_chapters_fail_to_decode() {
    let mut record = encode(&grant()).unwrap();
    record.insert("chapters", r#"{"title":"not a list"}"#).unwrap();
    let err = decode::<Book>(&record).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert!(err.to_string().contains("'chapters'"));
    assert!(err.to_string().contains("Option<Vec<Chapter>>"));
}

#[test]
fn type_without_partition_key_is_rejected() {
    // Rejected for the missing key before the null required title is looked at.
    let err = encode(&Pamphlet::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("Pamphlet"));

    let err = decode::<Pamphlet>(&Record::new("p", "r")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn empty_keys_survive_round_trip() {
    let mut book = grant();
    book.partition_key = Some(String::new());
    book.row_key = Some(String::new());
    let record = encode(&book).unwrap();
    assert_eq!(record.partition_key(), "");
    assert_eq!(record.row_key(), "");

    let back: Book = decode(&record).unwrap();
    assert_eq!(back, book);
}

#[test]
fn stored_book_reads_back() {
    let table = MemoryTable::new();
    let converter = EntityConverter::default();

    let stored = put_entity(&table, &converter, &grant()).unwrap();
    let back: Book = get_entity(&table, &converter, stored.partition_key(), stored.row_key())
        .unwrap()
        .unwrap();
    assert_eq!(back.title.as_deref(), Some("Grant"));
    assert_eq!(back.chapters.as_ref().map(Vec::len), Some(2));

    let missing: Option<Book> = get_entity(&table, &converter, "1999-1", "nope").unwrap();
    assert!(missing.is_none());
}

#[test]
fn stored_book_survives_wire_payload() {
    let table = MemoryTable::new();
    let record = encode(&grant()).unwrap();

    let payload = record.to_odata();
    assert_eq!(payload["publisheddate@odata.type"], "Edm.DateTime");
    assert_eq!(payload["publisheddate"], "2017-10-10T00:00:00Z");
    table.put(Record::from_odata(&payload).unwrap()).unwrap();

    let fetched = table.get(record.partition_key(), record.row_key()).unwrap().unwrap();
    assert_eq!(fetched, record);
    let back: Book = decode(&fetched).unwrap();
    assert_eq!(back.author.as_deref(), Some("Ron Chernow"));
}

#[test]
fn schema_lists_fields_in_declaration_order() {
    let names: Vec<_> = Book::schema().fields.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        vec![
            "partition_key",
            "row_key",
            "title",
            "author",
            "published_date",
            "is_best_seller",
            "chapters"
        ]
    );
}
