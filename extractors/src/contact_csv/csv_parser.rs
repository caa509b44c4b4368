use super::CsvError;
use csv::{ReaderBuilder, Trim};

const UTF8_BOM: &str = "\u{feff}";

/// Parses into (headers, rows). A leading BOM is dropped and cells are trimmed.
/// Rows that fail to parse are counted and skipped.
pub(crate) fn parse_rows(content: &[u8]) -> Result<ParsedCsv, CsvError> {
    let text = std::str::from_utf8(content).map_err(|e| CsvError::Encoding(e.to_string()))?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0;

    for result in reader.records() {
        match result {
            Ok(record) => {
                if record.iter().all(|field| field.is_empty()) {
                    continue;
                }
                rows.push(record.iter().map(|f| f.to_string()).collect());
            }
            Err(e) => {
                tracing::warn!("Failed to parse CSV row: {}", e);
                skipped += 1;
            }
        }
    }

    Ok(ParsedCsv {
        headers,
        rows,
        skipped,
    })
}

pub(crate) struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_drops_bom_and_blank_lines() {
        let content = "\u{feff}Prénom,Nom\r\n Jean , Dupont\r\n,\r\nMarie,Martin,extra\r\n";
        let parsed = parse_rows(content.as_bytes()).unwrap();

        assert_eq!(parsed.headers, vec!["Prénom", "Nom"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0], vec!["Jean", "Dupont"]);
        assert_eq!(parsed.rows[1].len(), 3);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_parse_rows_rejects_invalid_utf8() {
        assert!(matches!(
            parse_rows(b"Pr\xE9nom,Nom\n"),
            Err(CsvError::Encoding(_))
        ));
    }
}
