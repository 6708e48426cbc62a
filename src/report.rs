use std::collections::BTreeMap;
use std::io;
use ariadne::{Color, Config, Label, Report, ReportKind, sources};
use rowan::TextSize;
use crate::{
    ast::Pos,
    binding::BindingKind,
    dead_code::DeadCode,
};

/// Collects results by position
#[derive(Debug, Default)]
pub struct Reporter {
    results: BTreeMap<Pos, DeadCode>,
}

impl Reporter {
    pub fn add(&mut self, dead: DeadCode) {
        self.results.insert(dead.pos, dead);
    }

    pub fn extend(&mut self, dead: impl IntoIterator<Item = DeadCode>) {
        for dead in dead {
            self.add(dead);
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&DeadCode) -> bool) {
        self.results.retain(|_, dead| keep(dead));
    }

    /// sorted by file, then by offset
    pub fn into_sorted(self) -> Vec<DeadCode> {
        self.results.into_values().collect()
    }
}

impl BindingKind {
    fn color(&self) -> Color {
        match self {
            BindingKind::Const => Color::Cyan,
            BindingKind::Var => Color::Blue,
            BindingKind::Type => Color::Magenta,
            BindingKind::Func => Color::Yellow,
        }
    }
}

/// `ariadne` report of all `results` of one file
///
/// assumes results to be sorted by occurrence in file
pub fn print(file: String, content: &str, results: &[DeadCode]) -> io::Result<()> {
    let Some(first) = results.first() else {
        return Ok(());
    };
    let mut builder = Report::build(
        ReportKind::Warning,
        file.clone(),
        usize::from(first.pos.offset)
    )
        .with_config(
            Config::default()
                .with_compact(true)
        )
        .with_message("Unused declarations were found.");

    // advance into content to convert byte offsets into char offsets
    let mut content_bytes = 0;
    let mut content_chars = 0usize;
    let mut char_bytes = content.chars()
        .map(|c| usize::from(TextSize::of(c)));
    // reverse order to avoid overlapping lanes
    let mut order = results.len();
    for result in results {
        order -= 1;

        let range = result.pos.range();
        let start_byte = usize::from(range.start());
        while content_bytes < start_byte {
            let Some(bytes) = char_bytes.next() else { break };
            content_bytes += bytes;
            content_chars += 1;
        }
        let start_char = content_chars;
        let end_byte = usize::from(range.end());
        while content_bytes < end_byte {
            let Some(bytes) = char_bytes.next() else { break };
            content_bytes += bytes;
            content_chars += 1;
        }
        let end_char = content_chars;

        builder = builder.with_label(Label::new((file.clone(), start_char..end_char))
            .with_message(format!("{}", result))
            .with_color(result.kind.color())
            .with_order(order as i32)
        );
    }

    builder.finish()
        .eprint(sources(vec![
            (file, content)
        ]))
}

/// `path:line:column: name is unused`, one line per result
pub fn print_plain(file: &str, results: &[DeadCode]) {
    for result in results {
        eprintln!("deadgo: {}", plain_line(file, result));
    }
}

fn plain_line(file: &str, result: &DeadCode) -> String {
    format!("{}:{}:{}: {} is unused", file, result.pos.line, result.pos.column, result.name)
}

#[cfg(feature = "json-out")]
pub fn print_json(file: &str, results: &[DeadCode]) -> serde_json::Result<()> {
    println!("{}", json_line(file, results)?);
    Ok(())
}

#[cfg(feature = "json-out")]
fn json_line(file: &str, results: &[DeadCode]) -> serde_json::Result<String> {
    #[derive(serde::Serialize)]
    struct JsonFile<'a> {
        file: &'a str,
        results: Vec<JsonResult<'a>>,
    }

    #[derive(serde::Serialize)]
    struct JsonResult<'a> {
        name: &'a str,
        kind: BindingKind,
        line: u32,
        column: u32,
        offset: u32,
    }

    serde_json::to_string(&JsonFile {
        file,
        results: results.iter()
            .map(|result| JsonResult {
                name: &result.name,
                kind: result.kind,
                line: result.pos.line,
                column: result.pos.column,
                offset: result.pos.offset.into(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::ast::FileId;

    fn dead(name: &str, file: u32, offset: u32) -> DeadCode {
        DeadCode {
            name: name.to_string(),
            kind: BindingKind::Const,
            pos: Pos {
                file: FileId(file),
                offset: TextSize::from(offset),
                len: TextSize::of(name),
                line: offset / 10 + 1,
                column: offset % 10 + 1,
            },
        }
    }

    fn names(results: Vec<DeadCode>) -> Vec<String> {
        results.into_iter().map(|dead| dead.name).collect()
    }

    #[test]
    fn sorted_by_file_then_offset() {
        let mut reporter = Reporter::default();
        reporter.extend([dead("c", 1, 5), dead("b", 0, 40), dead("a", 0, 3)]);
        assert_eq!(names(reporter.into_sorted()), ["a", "b", "c"]);
    }

    #[test]
    fn deduplicated_by_position() {
        let mut reporter = Reporter::default();
        reporter.add(dead("a", 0, 3));
        reporter.add(dead("a", 0, 3));
        assert_eq!(names(reporter.into_sorted()), ["a"]);
    }

    #[test]
    fn retain() {
        let mut reporter = Reporter::default();
        reporter.extend([dead("a", 0, 3), dead("b", 0, 4)]);
        reporter.retain(|dead| dead.name != "a");
        assert_eq!(names(reporter.into_sorted()), ["b"]);
    }

    #[test]
    fn plain_format() {
        assert_eq!(plain_line("p/a.go", &dead("unused", 0, 12)), "p/a.go:2:3: unused is unused");
    }

    #[cfg(feature = "json-out")]
    #[test]
    fn json_format() {
        let line = json_line("a.go", &[dead("x", 0, 0)]).expect("json");
        assert_eq!(
            line,
            r#"{"file":"a.go","results":[{"name":"x","kind":"const","line":1,"column":1,"offset":0}]}"#
        );
    }
}
