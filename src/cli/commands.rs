//! Command implementations for the `tabio` binary.

use crate::error::{TabioError, TabioResult};
use crate::exporter::{self, FileType};
use crate::importer::{CsvParser, Parser, SpreadsheetParser};
use crate::table::{Table, TableCell};
use colored::Colorize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Options for the `convert` command.
pub struct ConvertOptions {
    pub to: Option<FileType>,
    pub separator: char,
    pub charset: String,
    pub sheet: usize,
    pub header_rows: usize,
    pub verbose: bool,
}

/// Convert a tabular file (CSV/TXT/XLSX/XLS) into another encoding.
pub fn convert(input: PathBuf, output: PathBuf, opts: ConvertOptions) -> TabioResult<()> {
    println!("{}", "tabio - convert".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let lines = read_lines(&input, &opts)?;
    if opts.verbose {
        println!("   {} rows read", lines.len());
    }

    let mut table = Table::new(table_name(&input));
    for row in lines.into_iter().skip(opts.header_rows) {
        table.add_row(row.into_iter().map(TableCell::text).collect());
    }

    let file_type = opts
        .to
        .or_else(|| FileType::from_path(&output))
        .ok_or_else(|| {
            TabioError::Validation(format!(
                "cannot infer output format from {}; pass --to",
                output.display()
            ))
        })?;

    let file = File::create(&output)?;
    exporter::write_data(
        std::slice::from_ref(&table),
        file_type,
        file,
        &opts.charset,
        opts.separator,
    )?;

    println!("{}", "Done.".bold().green());
    println!("   {} file: {}\n", file_type, output.display());
    Ok(())
}

/// List the sheets of a workbook with their visibility.
pub fn sheets(file: PathBuf) -> TabioResult<()> {
    let parser = SpreadsheetParser::<Vec<String>>::open(&file)?;
    let info = parser.sheet_info();
    println!("{}", format!("{} ({} sheets)", file.display(), info.len()).bold());
    for (idx, sheet) in info.iter().enumerate() {
        let marker = if sheet.visible {
            "visible".green()
        } else {
            "hidden".yellow()
        };
        println!("   {} {} [{}]", idx, sheet.name.bright_blue(), marker);
    }
    Ok(())
}

fn read_lines(input: &Path, opts: &ConvertOptions) -> TabioResult<Vec<Vec<String>>> {
    match FileType::from_path(input) {
        Some(FileType::Csv) | Some(FileType::Txt) => {
            let mut parser = CsvParser::<Vec<String>>::open(input)?
                .with_separator(opts.separator)
                .with_charset(opts.charset.clone());
            parser.lines()
        }
        Some(FileType::Xlsx) | Some(FileType::Sxlsx) | Some(FileType::Xls) => {
            let mut parser = SpreadsheetParser::<Vec<String>>::open(input)?;
            parser.set_sheet_number(opts.sheet);
            parser.lines()
        }
        None => Err(TabioError::Validation(format!(
            "unrecognized input format: {}",
            input.display()
        ))),
    }
}

fn table_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .chars()
        .take(31)
        .collect()
}
