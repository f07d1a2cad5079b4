//! Source loading and session setup shared by the inspecting commands.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use treelens_core::Point;
use treelens_langs::Lang;
use treelens_lib::layers::{Document, InjectionPoint, LayerSource};
use treelens_lib::{Inspector, InspectorOptions};

use super::lang_resolver::require_lang;

pub struct SourceArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub lang: Option<String>,
    pub inject: Vec<String>,
}

/// Print `error: <message>` and exit.
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(1)
}

/// Load source code from file, stdin, or inline text.
pub fn load_source(args: &SourceArgs) -> String {
    let text = read_source(args);
    debug!(bytes = text.len(), "source loaded");
    text
}

fn read_source(args: &SourceArgs) -> String {
    if let Some(text) = &args.source_text {
        return text.clone();
    }
    let Some(path) = &args.source_path else {
        fail("source required (positional SOURCE or -s/--source)");
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            fail(format_args!("failed to read stdin: {}", e));
        }
        return buf;
    }
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format_args!("failed to read '{}': {}", path.display(), e)))
}

/// Resolve source language from --lang flag or file extension.
pub fn resolve_lang(lang_name: Option<&str>, source_path: Option<&Path>) -> Lang {
    if let Some(name) = lang_name {
        return require_lang(name);
    }

    if let Some(path) = source_path
        && path.as_os_str() != "-"
        && let Some(ext) = path.extension().and_then(|e| e.to_str())
    {
        return treelens_langs::from_ext(ext).unwrap_or_else(|| {
            fail(format_args!(
                "cannot infer language from extension '.{}', use -l/--lang",
                ext
            ))
        });
    }

    fail("-l/--lang is required (cannot infer from input)")
}

/// Parses `KIND=LANG` or `KIND=LANG:REGEX`.
pub fn parse_injection(spec: &str) -> Result<InjectionPoint, String> {
    let Some((kind, rule)) = spec.split_once('=') else {
        return Err(format!("invalid injection '{}', expected KIND=LANG[:REGEX]", spec));
    };
    if kind.is_empty() {
        return Err(format!("invalid injection '{}', node kind is empty", spec));
    }
    let (lang_name, pattern) = match rule.split_once(':') {
        Some((lang, pattern)) => (lang, Some(pattern)),
        None => (rule, None),
    };
    let lang = treelens_langs::from_name(lang_name)
        .ok_or_else(|| format!("unknown language: '{}'", lang_name))?;
    match pattern {
        Some(pattern) => {
            InjectionPoint::when_matches(kind, lang, pattern).map_err(|e| e.to_string())
        }
        None => Ok(InjectionPoint::new(kind, lang)),
    }
}

/// Parses `ROW:COL`.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let invalid = || format!("invalid position '{}', expected ROW:COL", s);
    let (row, column) = s.split_once(':').ok_or_else(invalid)?;
    let row = row.trim().parse().map_err(|_| invalid())?;
    let column = column.trim().parse().map_err(|_| invalid())?;
    Ok(Point::new(row, column))
}

/// Parses `START..END` (rows, end exclusive).
pub fn parse_rows(s: &str) -> Result<(usize, usize), String> {
    let invalid = || format!("invalid row range '{}', expected START..END", s);
    let (start, end) = s.split_once("..").ok_or_else(invalid)?;
    let start: usize = start.trim().parse().map_err(|_| invalid())?;
    let end: usize = end.trim().parse().map_err(|_| invalid())?;
    if end < start {
        return Err(invalid());
    }
    Ok((start, end))
}

/// Parses the source and its injections.
pub fn load_document(args: &SourceArgs) -> Document {
    let source = load_source(args);
    let lang = resolve_lang(args.lang.as_deref(), args.source_path.as_deref());

    let mut document = Document::new(lang);
    for spec in &args.inject {
        let point = parse_injection(spec).unwrap_or_else(|msg| fail(msg));
        document = document.with_injection_point(point);
    }
    if let Err(e) = document.set_text(source) {
        fail(e);
    }
    debug!(
        grammar = document.lang().name(),
        injection_points = args.inject.len(),
        "document parsed"
    );
    document
}

/// Opens a session on the document, selects `layer` and renders it.
pub fn open_inspector(
    args: &SourceArgs,
    options: InspectorOptions,
    layer: Option<u64>,
) -> Inspector {
    let document = load_document(args);
    let mut inspector = Inspector::new(document.snapshot(), options);

    if let Some(id) = layer
        && let Err(e) = inspector.set_active_layer(treelens_core::LayerId(id))
    {
        eprintln!("error: {}", e);
        eprintln!();
        eprintln!("hint: run 'treelens layers' with the same arguments to list layers");
        std::process::exit(1);
    }
    if let Err(e) = inspector.update() {
        fail(e);
    }
    debug!(
        layer = %inspector.active_layer().id(),
        rows = inspector.rows().len(),
        "inspector ready"
    );
    inspector
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points() {
        assert_eq!(parse_point("3:8"), Ok(Point::new(3, 8)));
        assert_eq!(parse_point(" 0 : 0 "), Ok(Point::ZERO));
        assert_eq!(
            parse_point("3"),
            Err("invalid position '3', expected ROW:COL".to_owned())
        );
        assert!(parse_point("a:1").is_err());
    }

    #[test]
    fn row_ranges() {
        assert_eq!(parse_rows("10..20"), Ok((10, 20)));
        assert_eq!(parse_rows("4..4"), Ok((4, 4)));
        assert!(parse_rows("5..2").is_err());
        assert!(parse_rows("5").is_err());
    }

    #[test]
    fn injection_syntax_errors() {
        assert!(parse_injection("string").is_err());
        assert!(parse_injection("=json").is_err());
        assert_eq!(
            parse_injection("string=klingon").err().as_deref(),
            Some("unknown language: 'klingon'")
        );
    }

    #[test]
    #[cfg(feature = "lang-json")]
    fn injection_specs() {
        assert!(parse_injection("string=json").is_ok());
        assert!(parse_injection(r"string=json:\bTODO\b").is_ok());
        // the regex keeps everything after the first colon
        assert!(parse_injection("string=json:a:b").is_ok());
        assert!(
            parse_injection("string=json:(")
                .err()
                .is_some_and(|e| e.starts_with("invalid injection pattern '('"))
        );
    }

    #[test]
    #[cfg(feature = "lang-json")]
    fn loading_logs_at_debug() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let args = SourceArgs {
            source_path: None,
            source_text: Some("[1]".to_owned()),
            lang: Some("json".to_owned()),
            inject: Vec::new(),
        };
        tracing::subscriber::with_default(subscriber, || {
            load_document(&args);
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("source loaded"), "{logs}");
        assert!(logs.contains("document parsed"), "{logs}");
    }
}
