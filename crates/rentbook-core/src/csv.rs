use std::collections::HashMap;

use anyhow::anyhow;

// RFC 4180: fields containing the delimiter, a quote or a line break are
// quoted, and embedded quotes are doubled.

pub fn write_rows(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();

    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_row);
    for row in rows {
        push_row(&mut out, row);
    }

    out
}

fn push_row(out: &mut String, fields: &[String]) {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&escape(field));
    }
    out.push_str("\r\n");
}

fn escape(field: &str) -> String {
    let needs_quoting = field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');
    if !needs_quoting {
        return field.to_string();
    }

    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push('"');
    for ch in field.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

pub fn parse(input: &str) -> anyhow::Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;

    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                other => field.push(other),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() && !field_started => {
                in_quotes = true;
                field_started = true;
            }
            '"' => return Err(anyhow!("unexpected quote inside unquoted field")),
            ',' => {
                fields.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
                field_started = false;
            }
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
                field_started = false;
            }
            other => {
                field.push(other);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(anyhow!("unterminated quoted field"));
    }

    // input without a trailing newline still ends its last record
    if field_started || !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }

    Ok(records)
}

#[derive(Debug, Clone)]
pub struct HeaderMap {
    indexes: HashMap<String, usize>,
}

impl HeaderMap {
    pub fn new(header_row: &[String]) -> Self {
        let mut indexes = HashMap::new();
        for (idx, name) in header_row.iter().enumerate() {
            indexes.insert(name.trim().to_ascii_lowercase(), idx);
        }
        Self { indexes }
    }

    pub fn get<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = *self.indexes.get(name)?;
        row.get(idx).map(String::as_str)
    }

    pub fn require<'a>(&self, row: &'a [String], name: &str) -> anyhow::Result<&'a str> {
        self.get(row, name)
            .ok_or_else(|| anyhow!("missing column: {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{HeaderMap, parse, write_rows};

    #[test]
    fn writes_and_parses_plain_fields() {
        let out = write_rows(&["a", "b"], &[vec!["1".to_string(), "2".to_string()]]);
        assert_eq!(out, "a,b\r\n1,2\r\n");

        let records = parse(&out).expect("parse");
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn quotes_fields_with_delimiters_and_doubles_quotes() {
        let row = vec!["Main St, Unit \"B\"".to_string(), "plain".to_string()];
        let out = write_rows(&["address", "note"], &[row.clone()]);
        assert_eq!(out, "address,note\r\n\"Main St, Unit \"\"B\"\"\",plain\r\n");

        let records = parse(&out).expect("parse");
        assert_eq!(records[1][0], row[0]);
        assert_eq!(records[1][1], row[1]);
    }

    #[test]
    fn parses_embedded_newlines() {
        let records = parse("a,b\r\n\"line one\nline two\",x\r\n").expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1][0], "line one\nline two");
    }

    #[test]
    fn parses_final_record_without_trailing_newline() {
        let records = parse("a,b\n1,2").expect("parse");
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn parses_empty_fields() {
        let records = parse("a,,c\n,,\n").expect("parse");
        assert_eq!(records, vec![vec!["a", "", "c"], vec!["", "", ""]]);
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(parse("\"never closed").is_err());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let header = vec!["Name".to_string(), " Email ".to_string()];
        let map = HeaderMap::new(&header);
        let row = vec!["Ada".to_string(), "ada@example.com".to_string()];

        assert_eq!(map.get(&row, "name"), Some("Ada"));
        assert_eq!(map.get(&row, "email"), Some("ada@example.com"));
        assert!(map.get(&row, "phone").is_none());
        assert!(map.require(&row, "phone").is_err());
    }
}
