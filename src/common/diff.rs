use colored::*;
use similar::{ChangeTag, TextDiff};

/// Line-level difference between two texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    lines: Vec<(ChangeTag, String)>,
}

impl LineDiff {
    pub fn compute(old: &str, new: &str) -> Self {
        let diff = TextDiff::from_lines(old, new);
        let lines = diff
            .iter_all_changes()
            .map(|change| (change.tag(), change.value().trim_end_matches('\n').to_string()))
            .collect();
        Self { lines }
    }

    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|(tag, _)| *tag != ChangeTag::Equal)
    }

    pub fn insertions(&self) -> usize {
        self.lines.iter().filter(|(tag, _)| *tag == ChangeTag::Insert).count()
    }

    pub fn deletions(&self) -> usize {
        self.lines.iter().filter(|(tag, _)| *tag == ChangeTag::Delete).count()
    }

    pub fn to_plain(&self) -> String {
        self.lines
            .iter()
            .map(|(tag, line)| format!("{}{}", marker(*tag), line))
            .collect::<Vec<_>>()
            .join("\n")
    }

}

/// Colours a rendered diff by the marker at the start of each line.
pub fn colorize(plain: &str) -> String {
    plain
        .lines()
        .map(|line| match line.chars().next() {
            Some('-') => line.red().to_string(),
            Some('+') => line.green().to_string(),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shapes captured output the way `echo "$(cmd)"` does: trailing newlines
/// collapse to exactly one.
pub fn as_echoed(text: &str) -> String {
    format!("{}\n", text.trim_end_matches('\n'))
}

fn marker(tag: ChangeTag) -> &'static str {
    match tag {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
    }
}

/// Drops every line mentioning any of `needles`, like `grep -v`.
pub fn strip_lines_containing(text: &str, needles: &[&str]) -> String {
    text.lines()
        .filter(|line| !needles.iter().any(|needle| line.contains(needle)))
        .map(|line| format!("{}\n", line))
        .collect()
}
