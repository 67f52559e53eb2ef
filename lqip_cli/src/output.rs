use std::fmt::Write;

use clap::ValueEnum;
use lqip::{BatchItem, PlaceholderCode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `path<TAB>code`
    Plain,
    /// `path<TAB>--lqip:code`, ready for an inline style attribute
    Css,
    /// One JSON array for the whole run
    Json,
}

#[derive(Serialize)]
struct BatchEntry {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct FieldsEntry {
    code: i32,
    brightness: [u32; 6],
    lightness: u32,
    a: u32,
    b: u32,
}

/// Formats the successful items of a batch. Failures only show up in JSON output;
/// the other formats leave them to stderr.
pub fn render_batch(items: &[BatchItem], format: OutputFormat) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Plain | OutputFormat::Css => {
            let prefix = if format == OutputFormat::Css { "--lqip:" } else { "" };
            for item in items {
                if let Ok(code) = &item.result {
                    writeln!(out, "{}\t{prefix}{code}", item.source)?;
                }
            }
        }
        OutputFormat::Json => {
            let entries: Vec<BatchEntry> = items
                .iter()
                .map(|item| BatchEntry {
                    path: item.source.to_string(),
                    code: item.result.as_ref().ok().map(PlaceholderCode::value),
                    error: item.result.as_ref().err().map(ToString::to_string),
                })
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
    }
    Ok(out)
}

pub fn render_fields(code: &PlaceholderCode, format: OutputFormat) -> anyhow::Result<String> {
    let fields = code.fields();
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            let entry = FieldsEntry {
                code: code.value(),
                brightness: fields.brightness,
                lightness: fields.lightness,
                a: fields.a,
                b: fields.b,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
        }
        OutputFormat::Plain | OutputFormat::Css => {
            let [c0, c1, c2, c3, c4, c5] = fields.brightness;
            writeln!(out, "code        {code}")?;
            writeln!(out, "brightness  {c0} {c1} {c2}")?;
            writeln!(out, "            {c3} {c4} {c5}")?;
            writeln!(out, "lightness   {}", fields.lightness)?;
            writeln!(out, "a           {}", fields.a)?;
            writeln!(out, "b           {}", fields.b)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lqip::{ImageSource, PlaceholderError};
    use std::path::PathBuf;

    fn items() -> Vec<BatchItem> {
        vec![
            BatchItem {
                source: ImageSource::Path(PathBuf::from("a.png")),
                result: Ok("-174757".parse().unwrap()),
            },
            BatchItem {
                source: ImageSource::Path(PathBuf::from("broken.png")),
                result: Err(PlaceholderError::EmptyImage),
            },
        ]
    }

    #[test]
    fn plain_lists_successes() {
        let out = render_batch(&items(), OutputFormat::Plain).unwrap();
        assert_eq!(out, "a.png\t-174757\n");
    }

    #[test]
    fn css_prefixes_custom_property() {
        let out = render_batch(&items(), OutputFormat::Css).unwrap();
        assert_eq!(out, "a.png\t--lqip:-174757\n");
    }

    #[test]
    fn json_includes_failures() {
        let out = render_batch(&items(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["path"], "a.png");
        assert_eq!(value[0]["code"], -174757);
        assert!(value[0].get("error").is_none());
        assert_eq!(value[1]["path"], "broken.png");
        assert_eq!(value[1]["error"], "image has no pixels");
        assert!(value[1].get("code").is_none());
    }

    #[test]
    fn inspect_shows_every_field() {
        let code: PlaceholderCode = "-174757".parse().unwrap();
        let out = render_fields(&code, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["brightness"], serde_json::json!([1, 1, 1, 1, 1, 1]));
        assert_eq!(value["lightness"], 1);
        assert_eq!(value["a"], 3);
        assert_eq!(value["b"], 3);

        let plain = render_fields(&code, OutputFormat::Plain).unwrap();
        assert!(plain.starts_with("code        -174757\n"));
    }
}
