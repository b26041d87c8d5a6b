/// Comma-separated input.
///
/// A small RFC 4180 reader: quoted fields may contain commas, newlines and
/// `""` escapes; CRLF and LF line endings are both accepted; a leading
/// UTF-8 byte-order mark is ignored. Blank lines are skipped. Field text is
/// kept verbatim, and an empty field becomes an absent value.
use crate::error::ImportError;
use crate::table::{Table, TableRow, TableSource};

/// One physical record: the line it starts on and its raw fields.
type RawRecord = (usize, Vec<String>);

/// Parses CSV text into a [`Table`].
///
/// # Errors
///
/// Returns [`ImportError::EmptyInput`] when there is no header line and
/// [`ImportError::UnterminatedQuote`] when a quoted field runs to the end
/// of the input.
pub fn parse_csv(text: &str) -> Result<Table, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text)?
        .into_iter()
        .filter(|(_, fields)| !is_blank(fields));

    let (_, headers) = records.next().ok_or(ImportError::EmptyInput)?;
    let rows = records
        .map(|(line, fields)| TableRow {
            position: line,
            cells: fields
                .into_iter()
                .map(|f| (!f.is_empty()).then_some(f))
                .collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(columns = headers.len(), rows = rows.len(), "csv parsed");
    Ok(Table {
        source: TableSource::Csv,
        headers,
        first_column: 0,
        rows,
    })
}

fn is_blank(fields: &[String]) -> bool {
    matches!(fields, [only] if only.trim().is_empty())
}

fn split_records(text: &str) -> Result<Vec<RawRecord>, ImportError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut record_start = 1usize;
    let mut quote_start = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(ch);
                }
                _ => current.push(ch),
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                quote_start = line;
            }
            ',' => fields.push(std::mem::take(&mut current)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut current));
                records.push((record_start, std::mem::take(&mut fields)));
                line += 1;
                record_start = line;
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote {
            location: format!("line {quote_start}"),
        });
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push((record_start, fields));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use super::*;

    #[test]
    fn parses_header_and_rows_with_line_numbers() {
        let table = parse_csv("a,b\n1,2\n\n3,4\n").expect("parse");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].position, 2);
        assert_eq!(table.rows[1].position, 4);
        assert_eq!(table.rows[1].cells[1].as_deref(), Some("4"));
    }

    #[test]
    fn empty_fields_are_absent() {
        let table = parse_csv("a,b,c\n1,,3\n").expect("parse");
        assert_eq!(
            table.rows[0].cells,
            vec![Some("1".to_owned()), None, Some("3".to_owned())]
        );
    }

    #[test]
    fn whitespace_fields_are_kept_verbatim() {
        let table = parse_csv("a,b\n1,  x \n").expect("parse");
        assert_eq!(table.rows[0].cells[1].as_deref(), Some("  x "));
    }

    #[test]
    fn quoted_fields_keep_commas_escapes_and_newlines() {
        let table = parse_csv("name,note\n\"Das, Rohan\",\"said \"\"hi\"\"\nthen left\"\n9,z\n")
            .expect("parse");
        assert_eq!(table.rows[0].cells[0].as_deref(), Some("Das, Rohan"));
        assert_eq!(
            table.rows[0].cells[1].as_deref(),
            Some("said \"hi\"\nthen left")
        );
        assert_eq!(table.rows[1].position, 4);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let table = parse_csv("a,b\r\n1,2\r\n").expect("parse");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0].cells[1].as_deref(), Some("2"));
    }

    #[test]
    fn missing_final_newline_keeps_last_row() {
        let table = parse_csv("a\n1").expect("parse");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let table = parse_csv("\u{feff}Client_ID\n1\n").expect("parse");
        assert_eq!(table.headers, vec!["Client_ID"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(parse_csv(""), Err(ImportError::EmptyInput));
        assert_eq!(parse_csv("\n\n  \n"), Err(ImportError::EmptyInput));
    }

    #[test]
    fn unterminated_quote_reports_its_line() {
        match parse_csv("a,b\n1,\"open\n2,3\n") {
            Err(ImportError::UnterminatedQuote { location }) => assert_eq!(location, "line 2"),
            other => panic!("expected UnterminatedQuote, got {other:?}"),
        }
    }
}
