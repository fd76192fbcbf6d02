use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tabio::cli::commands::{self, ConvertOptions};
use tabio::exporter::FileType;

#[derive(Parser)]
#[command(name = "tabio")]
#[command(about = "Tabular data converter: spreadsheets (XLSX/XLS) and delimited text (CSV/TXT)")]
#[command(long_about = "tabio - tabular data import/export

Converts between spreadsheet and delimited-text encodings. The output
format is inferred from the output file extension, or forced with --to
(xlsx, sxlsx, csv, txt). Use sxlsx for large tables: rows are streamed
to disk instead of being held in memory.

EXAMPLES:
  tabio convert data.csv data.xlsx              # CSV to Excel
  tabio convert data.xlsx data.csv -s ','       # first sheet to comma CSV
  tabio convert big.csv big.xlsx --to sxlsx     # streaming Excel write
  tabio sheets workbook.xlsx                    # list sheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a tabular file between formats
    Convert {
        /// Input file (csv, txt, xlsx, xls)
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Output format (inferred from the output extension when omitted)
        #[arg(long)]
        to: Option<FileType>,

        /// Field separator for CSV/TXT
        #[arg(short, long, default_value_t = ';')]
        separator: char,

        /// Charset for CSV/TXT (WHATWG label, e.g. UTF-8, ISO-8859-1)
        #[arg(short, long, default_value = "UTF-8")]
        charset: String,

        /// Sheet index to read from spreadsheet input
        #[arg(long, default_value_t = 0)]
        sheet: usize,

        /// Header rows to drop before writing
        #[arg(long, default_value_t = 0)]
        header_rows: usize,

        /// Show progress details
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Workbook file (xlsx, xls)
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            to,
            separator,
            charset,
            sheet,
            header_rows,
            verbose,
        } => commands::convert(
            input,
            output,
            ConvertOptions {
                to,
                separator,
                charset,
                sheet,
                header_rows,
                verbose,
            },
        ),
        Commands::Sheets { file } => commands::sheets(file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".bold().red(), e);
        std::process::exit(1);
    }
}
