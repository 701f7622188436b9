//! Table rendering - plain text, GitHub Markdown, LaTeX and JSON

use clap::ValueEnum;
use serde::Serialize;

/// Output format for reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text columns
    #[default]
    Plain,
    /// GitHub-flavoured Markdown tables
    Github,
    /// LaTeX tabular environments
    Latex,
    /// JSON array of tables
    Json,
}

/// A titled grid of preformatted cells; the first column is the row label
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn columns(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Render all tables, separated by blank lines
pub fn render(tables: &[Table], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(tables)?);
    }

    let rendered: Vec<String> = tables
        .iter()
        .map(|t| match format {
            OutputFormat::Github => render_github(t),
            OutputFormat::Latex => render_latex(t),
            _ => render_plain(t),
        })
        .collect();
    Ok(rendered.join("\n"))
}

fn cell(row: &[String], i: usize) -> &str {
    row.get(i).map(String::as_str).unwrap_or("")
}

fn render_plain(table: &Table) -> String {
    let columns = table.columns();
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            std::iter::once(&table.headers)
                .chain(&table.rows)
                .map(|r| cell(r, i).chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |row: &[String]| -> String {
        let cells: Vec<String> = (0..columns)
            .map(|i| {
                if i == 0 {
                    format!("{:<w$}", cell(row, i), w = widths[i])
                } else {
                    format!("{:>w$}", cell(row, i), w = widths[i])
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    };

    let total: usize = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);
    let mut out = String::new();
    out.push_str(&table.title);
    out.push('\n');
    out.push_str(&line(&table.headers));
    out.push('\n');
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

fn render_github(table: &Table) -> String {
    let columns = table.columns();
    let escape = |s: &str| s.replace('|', "\\|");
    let line = |row: &[String]| -> String {
        let cells: Vec<String> = (0..columns).map(|i| escape(cell(row, i))).collect();
        format!("| {} |", cells.join(" | "))
    };

    let mut out = format!("### {}\n\n", escape(&table.title));
    out.push_str(&line(&table.headers));
    out.push('\n');
    let align: Vec<&str> = (0..columns)
        .map(|i| if i == 0 { ":---" } else { "---:" })
        .collect();
    out.push_str(&format!("| {} |\n", align.join(" | ")));
    for row in &table.rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

fn render_latex(table: &Table) -> String {
    let columns = table.columns();
    let line = |row: &[String]| -> String {
        let cells: Vec<String> = (0..columns).map(|i| escape_latex(cell(row, i))).collect();
        format!("{} \\\\\n", cells.join(" & "))
    };
    let spec: String = (0..columns).map(|i| if i == 0 { 'l' } else { 'r' }).collect();

    let mut out = String::new();
    out.push_str("\\begin{table}[ht]\n\\centering\n");
    out.push_str(&format!("\\caption{{{}}}\n", escape_latex(&table.title)));
    out.push_str(&format!("\\begin{{tabular}}{{{}}}\n\\hline\n", spec));
    out.push_str(&line(&table.headers));
    out.push_str("\\hline\n");
    for row in &table.rows {
        out.push_str(&line(row));
    }
    out.push_str("\\hline\n\\end{tabular}\n\\end{table}\n");
    out
}

fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
