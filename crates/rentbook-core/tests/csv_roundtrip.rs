use rentbook_core::csv::{self, HeaderMap};

// Interchange-level round trip: awkward field content (embedded commas,
// quotes, newlines) must survive a write followed by a parse.

#[test]
fn roundtrip_preserves_count_and_values() {
    let headers = ["name", "address", "description"];
    let rows = vec![
        vec![
            "Harbor Flats".to_string(),
            "12 Harbor Lane, Unit \"B\"".to_string(),
            "two floors\nriver view".to_string(),
        ],
        vec![
            "Mill House".to_string(),
            "3 Mill Road".to_string(),
            String::new(),
        ],
    ];

    let out = csv::write_rows(&headers, &rows);
    let records = csv::parse(&out).expect("parse exported csv");

    assert_eq!(records.len(), rows.len() + 1);
    let map = HeaderMap::new(&records[0]);

    for (row, record) in rows.iter().zip(&records[1..]) {
        assert_eq!(map.get(record, "name"), Some(row[0].as_str()));
        assert_eq!(map.get(record, "address"), Some(row[1].as_str()));
        assert_eq!(map.get(record, "description"), Some(row[2].as_str()));
    }
}

#[test]
fn import_maps_columns_by_lowercased_header() {
    let input = "Name,MONTHLY_RENT,Email\r\nAda Okafor,900,ada@example.com\r\n";
    let records = csv::parse(input).expect("parse");
    let map = HeaderMap::new(&records[0]);

    assert_eq!(map.get(&records[1], "name"), Some("Ada Okafor"));
    assert_eq!(map.get(&records[1], "monthly_rent"), Some("900"));
    assert_eq!(map.get(&records[1], "email"), Some("ada@example.com"));
}

#[test]
fn parse_accepts_unix_line_endings() {
    let records = csv::parse("a,b\n1,2\n3,4\n").expect("parse");
    assert_eq!(records.len(), 3);
    assert_eq!(records[2], vec!["3", "4"]);
}
